//! BTHome v2 service data with fixed field offsets
//!
//! Layout for two binary sensors and one temperature:
//!
//! | offset | content                          |
//! |--------|----------------------------------|
//! | 0      | device info (`0x40`, v2, plain)  |
//! | 1      | object id, binary sensor 1       |
//! | 2      | binary sensor 1                  |
//! | 3      | object id, binary sensor 2       |
//! | 4      | binary sensor 2                  |
//! | 5      | object id, temperature           |
//! | 6..8   | temperature, `i16` little-endian |
//!
//! Only the value bytes are ever written after construction.

use crate::model::TemperatureScale;

pub const PAYLOAD_LEN: usize = 8;

/// BTHome v2 device info byte: no encryption, regular interval.
pub const DEVICE_INFO: u8 = 0x40;

/// BTHome object id for the "moisture" binary sensor.
pub const OBJECT_ID_MOISTURE: u8 = 0x20;

/// A value slot in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BinarySensor1,
    BinarySensor2,
    Temperature,
}

impl Field {
    pub const ALL: [Field; 3] = [Self::BinarySensor1, Self::BinarySensor2, Self::Temperature];

    pub const fn offset(self) -> usize {
        match self {
            Self::BinarySensor1 => 2,
            Self::BinarySensor2 => 4,
            Self::Temperature => 6,
        }
    }

    pub const fn width(self) -> usize {
        match self {
            Self::BinarySensor1 | Self::BinarySensor2 => 1,
            Self::Temperature => 2,
        }
    }

    const fn range(self) -> core::ops::Range<usize> {
        self.offset()..self.offset() + self.width()
    }
}

/// Returns true when `index` is a constant header or object id byte.
pub fn is_fixed_byte(index: usize) -> bool {
    !Field::ALL.iter().any(|field| field.range().contains(&index))
}

/// Service data handed to the radio every cycle.
///
/// The backing array lives as long as the buffer; setters mutate it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBuffer {
    bytes: [u8; PAYLOAD_LEN],
}

impl PayloadBuffer {
    /// Fresh payload with all values zero.
    pub const fn new(scale: TemperatureScale) -> Self {
        Self {
            bytes: [
                DEVICE_INFO,
                OBJECT_ID_MOISTURE,
                0x00,
                OBJECT_ID_MOISTURE,
                0x00,
                scale.object_id(),
                0x00,
                0x00,
            ],
        }
    }

    /// Start from an existing image, header bytes included.
    pub const fn with_bytes(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_bool(&mut self, field: Field, value: bool) {
        debug_assert_eq!(field.width(), 1, "{:?} is not a binary field", field);
        self.bytes[field.offset()] = u8::from(value);
    }

    pub fn get_bool(&self, field: Field) -> bool {
        debug_assert_eq!(field.width(), 1, "{:?} is not a binary field", field);
        self.bytes[field.offset()] != 0
    }

    pub fn set_int16(&mut self, field: Field, value: i16) {
        debug_assert_eq!(field.width(), 2, "{:?} is not a 16-bit field", field);
        self.bytes[field.range()].copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_int16(&self, field: Field) -> i16 {
        debug_assert_eq!(field.width(), 2, "{:?} is not a 16-bit field", field);
        let offset = field.offset();
        i16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIELD_IMAGE: [u8; PAYLOAD_LEN] = [0x40, 0x20, 0x01, 0x20, 0x01, 0x45, 0x00, 0x00];

    fn header(buf: &PayloadBuffer) -> [u8; 4] {
        let b = buf.as_bytes();
        [b[0], b[1], b[3], b[5]]
    }

    #[test]
    fn new_writes_bthome_header() {
        let buf = PayloadBuffer::new(TemperatureScale::Tenths);
        assert_eq!(buf.as_bytes(), &[0x40, 0x20, 0x00, 0x20, 0x00, 0x45, 0x00, 0x00]);

        let buf = PayloadBuffer::new(TemperatureScale::Hundredths);
        assert_eq!(buf.as_bytes()[5], 0x02);
    }

    #[test]
    fn bool_round_trip() {
        let mut buf = PayloadBuffer::with_bytes(FIELD_IMAGE);
        for field in [Field::BinarySensor1, Field::BinarySensor2] {
            for value in [true, false, true] {
                buf.set_bool(field, value);
                assert_eq!(buf.get_bool(field), value);
            }
        }
    }

    // Regression guard: an earlier encoder wrote 0x01 for both states, so a
    // dry sump looked identical to a flooded one on the receiver.
    #[test]
    fn false_is_encoded_as_zero() {
        let mut buf = PayloadBuffer::with_bytes(FIELD_IMAGE);
        buf.set_bool(Field::BinarySensor1, false);
        buf.set_bool(Field::BinarySensor2, false);
        assert_eq!(buf.as_bytes()[2], 0x00);
        assert_eq!(buf.as_bytes()[4], 0x00);

        buf.set_bool(Field::BinarySensor1, true);
        assert_eq!(buf.as_bytes()[2], 0x01);
        assert_eq!(buf.as_bytes()[4], 0x00);
    }

    #[test]
    fn int16_round_trip_at_edges() {
        let mut buf = PayloadBuffer::with_bytes(FIELD_IMAGE);
        for value in [i16::MIN, -32_767, -256, -1, 0, 1, 255, 256, 2_350, i16::MAX] {
            buf.set_int16(Field::Temperature, value);
            assert_eq!(buf.get_int16(Field::Temperature), value);
        }
    }

    #[test]
    fn int16_is_little_endian() {
        let mut buf = PayloadBuffer::with_bytes(FIELD_IMAGE);
        buf.set_int16(Field::Temperature, 0x1234);
        assert_eq!(&buf.as_bytes()[6..8], &[0x34, 0x12]);

        buf.set_int16(Field::Temperature, -2);
        assert_eq!(&buf.as_bytes()[6..8], &[0xFE, 0xFF]);
    }

    #[test]
    fn writes_never_touch_header() {
        let mut buf = PayloadBuffer::with_bytes(FIELD_IMAGE);
        let before = header(&buf);

        for i in 0..64i16 {
            buf.set_bool(Field::BinarySensor1, i % 2 == 0);
            buf.set_bool(Field::BinarySensor2, i % 3 == 0);
            buf.set_int16(Field::Temperature, i.wrapping_mul(-997));
            buf.set_int16(Field::Temperature, if i % 2 == 0 { i16::MIN } else { i16::MAX });
            assert_eq!(header(&buf), before);
        }
    }

    #[test]
    fn fields_do_not_overlap() {
        let mut buf = PayloadBuffer::with_bytes(FIELD_IMAGE);
        buf.set_int16(Field::Temperature, -1);
        buf.set_bool(Field::BinarySensor1, false);
        buf.set_bool(Field::BinarySensor2, true);
        assert_eq!(buf.get_int16(Field::Temperature), -1);
        assert!(!buf.get_bool(Field::BinarySensor1));
        assert!(buf.get_bool(Field::BinarySensor2));
    }

    #[test]
    fn fixed_bytes_are_header_and_object_ids() {
        let fixed: Vec<usize> = (0..PAYLOAD_LEN).filter(|&i| is_fixed_byte(i)).collect();
        assert_eq!(fixed, vec![0, 1, 3, 5]);
    }
}
