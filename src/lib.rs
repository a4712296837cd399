//! Firewatch monitor library.
//!
//! Exposes the pure-logic modules for integration testing and for board
//! crates that wire real peripherals into the adapters.  Nothing here
//! blocks; the caller owns the loop and the clock.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod safety;
pub mod scheduler;
pub mod sensors;
