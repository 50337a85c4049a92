//! Sump pit beacon: float switches and a temperature sensor broadcast as
//! BTHome service data over BLE advertisements.
//!
//! Everything outside `hardware` and `radio` is hardware independent and
//! runs on the host.

#![cfg_attr(not(test), no_std)]

pub mod beacon;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod payload;
pub mod sensor;
pub mod traits;

#[cfg(feature = "firmware")]
pub mod hardware;
#[cfg(feature = "firmware")]
pub mod radio;

#[cfg(test)]
mod testing;

pub use beacon::Beacon;
pub use config::BeaconConfig;
pub use error::{RadioError, SensorError};
pub use logic::{CycleReport, SampleLoop, TemperatureEvent};
pub use model::{AdvertisementSession, MilliCelsius, TemperatureAvailability, TemperatureScale};
pub use payload::{Field, PayloadBuffer};
pub use sensor::SensorPort;
