//! Hardware abstraction traits

use embassy_time::{Duration, Instant};

use crate::error::{RadioError, SensorError};
use crate::model::{AdvertisementSession, MilliCelsius};

/// Trait for digital inputs such as float switches
pub trait DigitalInput {
    /// Raw logic level, no debouncing
    fn read_digital(&mut self) -> bool;
}

/// Trait for temperature sensors
pub trait TemperatureSource {
    /// Bring the sensor up. Called once at startup; an error disables
    /// temperature for the life of the process.
    fn probe(&mut self) -> Result<(), SensorError>;

    /// Read temperature in thousandths of a degree Celsius
    fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError>;
}

/// Trait for a status output that mirrors a sensor
pub trait IndicatorOutput {
    fn set_indicator(&mut self, on: bool);
}

/// Trait for the BLE advertiser
pub trait Radio {
    /// Apply the session's data and parameters. Takes effect on the next
    /// [`start`](Radio::start).
    fn configure(&mut self, session: &AdvertisementSession<'_>) -> Result<(), RadioError>;

    /// Begin advertising with the last configuration
    fn start(&mut self) -> impl Future<Output = Result<(), RadioError>>;

    /// End the current advertisement
    fn stop(&mut self) -> impl Future<Output = Result<(), RadioError>>;
}

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Suspends the loop between advertise and stop
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()>;
}

/// Board without a temperature sensor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTemperature;

impl TemperatureSource for NoTemperature {
    fn probe(&mut self) -> Result<(), SensorError> {
        Err(SensorError::Unavailable)
    }

    fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError> {
        Err(SensorError::Unavailable)
    }
}

/// Board without an indicator.
impl IndicatorOutput for () {
    fn set_indicator(&mut self, _on: bool) {}
}

/// A sensor that failed to construct reads as absent.
impl<T: TemperatureSource> TemperatureSource for Option<T> {
    fn probe(&mut self) -> Result<(), SensorError> {
        match self {
            Some(sensor) => sensor.probe(),
            None => Err(SensorError::Unavailable),
        }
    }

    fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError> {
        match self {
            Some(sensor) => sensor.read_temperature(),
            None => Err(SensorError::Unavailable),
        }
    }
}
