// Model of the data sampled and broadcast by the beacon

use core::fmt;

use embassy_time::Duration;

use crate::error::RadioError;

/// BTHome registered 16-bit service UUID.
pub const SERVICE_UUID_16: u16 = 0xFCD2;

/// Payload limit of a legacy advertising PDU.
pub const LEGACY_ADV_DATA_MAX: usize = 31;

/// Shortest advertising interval allowed by Bluetooth Core.
pub const ADV_INTERVAL_MIN: Duration = Duration::from_millis(20);

/// Longest advertising interval allowed by Bluetooth Core.
pub const ADV_INTERVAL_MAX: Duration = Duration::from_millis(10_240);

// Flags AD structure: length, type, value
const FLAGS_AD_LEN: usize = 3;
// Length, type and the 16-bit UUID in front of the service data
const SERVICE_DATA_AD_OVERHEAD: usize = 4;
// Length and type in front of the local name
const NAME_AD_OVERHEAD: usize = 2;

/// Temperature as reported by the sensor, in thousandths of a degree Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MilliCelsius(pub i32);

impl MilliCelsius {
    pub const ZERO: Self = Self(0);

    pub const fn from_centi(centi: i32) -> Self {
        Self(centi.saturating_mul(10))
    }
}

impl fmt::Display for MilliCelsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}°C", sign, abs / 1000, (abs % 1000) / 10)
    }
}

/// Fixed-point unit of the temperature field on the wire.
///
/// Each unit has its own BTHome object id, written into the byte in front of
/// the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    /// 0.1 °C per count, object id `0x45`
    Tenths,
    /// 0.01 °C per count, object id `0x02`
    Hundredths,
}

impl TemperatureScale {
    pub const fn object_id(self) -> u8 {
        match self {
            Self::Tenths => 0x45,
            Self::Hundredths => 0x02,
        }
    }

    const fn divisor(self) -> i32 {
        match self {
            Self::Tenths => 100,
            Self::Hundredths => 10,
        }
    }

    /// Convert a sensor reading into the wire value.
    ///
    /// Truncates toward zero and saturates at the `i16` bounds.
    pub fn encode(self, temperature: MilliCelsius) -> i16 {
        let scaled = temperature.0 / self.divisor();
        scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }

    /// Inverse of [`encode`](Self::encode), up to its truncation.
    pub fn decode(self, raw: i16) -> MilliCelsius {
        MilliCelsius(raw as i32 * self.divisor())
    }
}

/// Whether a temperature source answered its startup probe.
///
/// Decided once and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureAvailability {
    Present,
    Absent,
}

/// Advertising PDU type used for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisementKind {
    /// Broadcast only, answers scan requests
    NonconnectableScannable,
}

/// Everything the radio needs for one advertise cycle.
///
/// Borrows the payload bytes, so a session cannot outlive the buffer state
/// it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisementSession<'a> {
    pub local_name: &'a str,
    pub service_uuid: u16,
    pub interval: Duration,
    pub kind: AdvertisementKind,
    pub service_data: &'a [u8],
}

impl<'a> AdvertisementSession<'a> {
    /// Bytes the flags, service data and local name AD structures take.
    pub fn adv_data_len(&self) -> usize {
        FLAGS_AD_LEN
            + SERVICE_DATA_AD_OVERHEAD
            + self.service_data.len()
            + NAME_AD_OVERHEAD
            + self.local_name.len()
    }

    /// Longest local name that fits next to this session's service data.
    pub fn max_name_len(&self) -> usize {
        LEGACY_ADV_DATA_MAX.saturating_sub(
            FLAGS_AD_LEN + SERVICE_DATA_AD_OVERHEAD + self.service_data.len() + NAME_AD_OVERHEAD,
        )
    }

    /// Reject sessions no BLE controller would accept.
    pub fn validate(&self) -> Result<(), RadioError> {
        if self.interval < ADV_INTERVAL_MIN || self.interval > ADV_INTERVAL_MAX {
            return Err(RadioError::InvalidInterval(self.interval.as_millis()));
        }

        let max = self.max_name_len();
        if max == 0 {
            return Err(RadioError::PayloadTooLarge {
                needed: self.adv_data_len(),
                max: LEGACY_ADV_DATA_MAX,
            });
        }

        if self.local_name.is_empty() || self.local_name.len() > max {
            return Err(RadioError::InvalidName { max });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DATA: [u8; 8] = [0x40, 0x20, 0x00, 0x20, 0x00, 0x45, 0x00, 0x00];

    fn session(name: &str, interval_ms: u64) -> AdvertisementSession<'_> {
        AdvertisementSession {
            local_name: name,
            service_uuid: SERVICE_UUID_16,
            interval: Duration::from_millis(interval_ms),
            kind: AdvertisementKind::NonconnectableScannable,
            service_data: &DATA,
        }
    }

    #[test]
    fn tenths_truncate_toward_zero() {
        assert_eq!(TemperatureScale::Tenths.encode(MilliCelsius(2350)), 23);
        assert_eq!(TemperatureScale::Tenths.encode(MilliCelsius(2399)), 23);
        assert_eq!(TemperatureScale::Tenths.encode(MilliCelsius(-2399)), -23);
    }

    #[test]
    fn hundredths_keep_one_more_digit() {
        assert_eq!(TemperatureScale::Hundredths.encode(MilliCelsius(2350)), 235);
        assert_eq!(TemperatureScale::Hundredths.decode(235), MilliCelsius(2350));
    }

    #[test]
    fn encode_saturates() {
        assert_eq!(TemperatureScale::Hundredths.encode(MilliCelsius(400_000)), i16::MAX);
        assert_eq!(TemperatureScale::Hundredths.encode(MilliCelsius(-400_000)), i16::MIN);
    }

    #[test]
    fn object_ids_match_bthome() {
        assert_eq!(TemperatureScale::Tenths.object_id(), 0x45);
        assert_eq!(TemperatureScale::Hundredths.object_id(), 0x02);
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MilliCelsius(23_456).to_string(), "23.45°C");
        assert_eq!(MilliCelsius(-1_500).to_string(), "-1.50°C");
        assert_eq!(MilliCelsius(-50).to_string(), "-0.05°C");
        assert_eq!(MilliCelsius::ZERO.to_string(), "0.00°C");
    }

    #[test]
    fn default_session_is_valid() {
        assert_eq!(session("Sump Sensor", 100).validate(), Ok(()));
        assert_eq!(session("Sump Sensor", 100).adv_data_len(), 28);
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        assert_eq!(session("s", 20).validate(), Ok(()));
        assert_eq!(session("s", 10_240).validate(), Ok(()));
        assert_eq!(session("s", 19).validate(), Err(RadioError::InvalidInterval(19)));
        assert_eq!(
            session("s", 10_241).validate(),
            Err(RadioError::InvalidInterval(10_241))
        );
    }

    #[test]
    fn rejects_names_that_do_not_fit() {
        assert_eq!(session("", 100).validate(), Err(RadioError::InvalidName { max: 14 }));
        assert_eq!(session("Sump Sensor 123", 100).validate(), Err(RadioError::InvalidName { max: 14 }));
        assert_eq!(session("Sump Sensor 12", 100).validate(), Ok(()));
    }

    #[test]
    fn rejects_service_data_that_leaves_no_room() {
        let data = [0u8; 22];
        let session = AdvertisementSession {
            service_data: &data,
            ..session("s", 100)
        };
        assert_eq!(
            session.validate(),
            Err(RadioError::PayloadTooLarge { needed: 32, max: 31 })
        );
    }
}
