//! Output drivers.

pub mod indicators;
