//! Compile-time beacon configuration

use embassy_time::Duration;

use crate::model::TemperatureScale;

/// Tunables for the sample loop and the advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconConfig {
    /// Complete local name in the advertisement and scan response
    pub local_name: &'static str,
    /// Time between sensor polls; also how long each advertisement runs
    pub sample_interval: Duration,
    /// Minimum time between temperature reads
    pub temperature_interval: Duration,
    /// Advertising interval handed to the controller
    pub adv_interval: Duration,
    /// Wire unit of the temperature field
    pub temperature_scale: TemperatureScale,
    /// Static random BLE address, little-endian
    pub address: [u8; 6],
}

impl BeaconConfig {
    pub const DEFAULT: Self = Self {
        local_name: "Sump Sensor",
        sample_interval: Duration::from_millis(100),
        temperature_interval: Duration::from_secs(5),
        adv_interval: Duration::from_millis(100),
        temperature_scale: TemperatureScale::Tenths,
        address: [0x5a, 0x3e, 0x91, 0x07, 0xc4, 0xf3],
    };

    pub const fn with_local_name(mut self, local_name: &'static str) -> Self {
        self.local_name = local_name;
        self
    }

    pub const fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub const fn with_temperature_interval(mut self, interval: Duration) -> Self {
        self.temperature_interval = interval;
        self
    }

    pub const fn with_adv_interval(mut self, interval: Duration) -> Self {
        self.adv_interval = interval;
        self
    }

    pub const fn with_temperature_scale(mut self, scale: TemperatureScale) -> Self {
        self.temperature_scale = scale;
        self
    }

    pub const fn with_address(mut self, address: [u8; 6]) -> Self {
        self.address = address;
        self
    }
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_deployed_beacon() {
        let config = BeaconConfig::default();
        assert_eq!(config.local_name, "Sump Sensor");
        assert_eq!(config.sample_interval, Duration::from_millis(100));
        assert_eq!(config.temperature_interval, Duration::from_secs(5));
        assert_eq!(config.temperature_scale, TemperatureScale::Tenths);
    }

    #[test]
    fn static_random_address_has_top_bits_set() {
        // Static random addresses require the two most significant bits set
        assert_eq!(BeaconConfig::DEFAULT.address[5] & 0xc0, 0xc0);
    }

    #[test]
    fn builders_override_single_fields() {
        let config = BeaconConfig::DEFAULT
            .with_local_name("Pit 2")
            .with_temperature_scale(TemperatureScale::Hundredths);
        assert_eq!(config.local_name, "Pit 2");
        assert_eq!(config.temperature_scale, TemperatureScale::Hundredths);
        assert_eq!(config.sample_interval, BeaconConfig::DEFAULT.sample_interval);
    }
}
