//! The beacon's sensor inputs

use log::{info, warn};

use crate::error::SensorError;
use crate::model::{MilliCelsius, TemperatureAvailability};
use crate::traits::{DigitalInput, TemperatureSource};

/// Both float switches and the temperature source of one board.
pub struct SensorPort<A, B, T> {
    pub float1: A,
    pub float2: B,
    pub temperature: T,
}

impl<A, B, T> SensorPort<A, B, T>
where
    A: DigitalInput,
    B: DigitalInput,
    T: TemperatureSource,
{
    pub fn new(float1: A, float2: B, temperature: T) -> Self {
        Self {
            float1,
            float2,
            temperature,
        }
    }

    pub fn read_float1(&mut self) -> bool {
        self.float1.read_digital()
    }

    pub fn read_float2(&mut self) -> bool {
        self.float2.read_digital()
    }

    /// Probe the temperature source once. Absence is final.
    pub fn probe_temperature(&mut self) -> TemperatureAvailability {
        match self.temperature.probe() {
            Ok(()) => {
                info!("[SENSOR] temperature sensor present");
                TemperatureAvailability::Present
            }
            Err(e) => {
                warn!("[SENSOR] temperature disabled ({}), broadcasting 0", e);
                TemperatureAvailability::Absent
            }
        }
    }

    pub fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError> {
        self.temperature.read_temperature()
    }
}
