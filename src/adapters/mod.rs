//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements   | Connects to                   |
//! |-----------------|--------------|-------------------------------|
//! | `log_sink`      | EventSink    | `log` facade                  |
//! | `profile_store` | ProfilePort  | JSON file / in-memory map     |
//! | `relay`         | HeaterPort   | `embedded-hal` output pin     |
//! | `sim`           | SensorPort   | Simulated drum thermal model  |
//! |                 | HeaterPort   |                               |
//! | `time`          | TimePort     | `std::time::Instant`          |
//!
//! The MAX31855 thermocouple driver lives in [`crate::sensors::max31855`].

pub mod log_sink;
pub mod profile_store;
pub mod relay;
pub mod sim;
pub mod time;
