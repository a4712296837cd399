//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                     |
//! |------------|--------------------|---------------------------------|
//! | `hardware` | SensorPort         | ADC channel, PIR input          |
//! |            | ActuatorPort       | LED / buzzer / relay GPIO       |
//! | `sim`      | (pins, ADC)        | Scripted host-side peripherals  |
//! | `console`  | CommandChannel     | stdin / stdout                  |
//! | `log_sink` | EventSink          | `log` facade                    |
//! | `time`     | Clock              | `std::time::Instant`            |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod time;
