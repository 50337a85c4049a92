//! ESP32-S3 implementations of the sensor, indicator and timing traits

use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::AnyPin;
use esp_hal::{
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::I2C0,
    time::Rate,
};

use crate::error::SensorError;
use crate::model::MilliCelsius;
use crate::traits::{Clock, DigitalInput, IndicatorOutput, Sleeper, TemperatureSource};

const BMP280_ADDRESS: u8 = 0x76;
const BMP280_CHIP_ID: u8 = 0x58;

/// Float switch wired between the pin and ground, pulled up internally.
pub struct FloatSwitch<'a> {
    input: Input<'a>,
}

impl<'a> FloatSwitch<'a> {
    pub fn new<P>(pin: P) -> Self
    where
        P: Into<AnyPin<'a>>,
    {
        let input = Input::new(pin.into(), InputConfig::default().with_pull(Pull::Up));
        Self { input }
    }
}

impl DigitalInput for FloatSwitch<'_> {
    fn read_digital(&mut self) -> bool {
        self.input.is_high()
    }
}

/// LED mirroring float switch 1.
pub struct StatusLed<'a> {
    output: Output<'a>,
}

impl<'a> StatusLed<'a> {
    pub fn new<P>(pin: P) -> Self
    where
        P: Into<AnyPin<'a>>,
    {
        let output = Output::new(pin.into(), Level::Low, OutputConfig::default());
        Self { output }
    }
}

impl IndicatorOutput for StatusLed<'_> {
    fn set_indicator(&mut self, on: bool) {
        self.output.set_level(Level::from(on));
    }
}

/// Embassy time driver as the loop's clock and sleeper.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl Sleeper for SystemClock {
    async fn sleep(&mut self, duration: Duration) {
        Timer::after(duration).await;
    }
}

#[derive(Debug, Clone, Copy)]
struct CalibrationData {
    dig_t1: u16,
    dig_t2: i16,
    dig_t3: i16,
}

pub struct BMP280Hardware<'a> {
    i2c: I2c<'a, esp_hal::Blocking>,
    calibration: Option<CalibrationData>,
    address: u8,
}

impl<'a> BMP280Hardware<'a> {
    pub fn new<SDA, SCL>(i2c_periph: I2C0<'a>, sda: SDA, scl: SCL) -> Result<Self, SensorError>
    where
        SDA: Into<AnyPin<'a>>,
        SCL: Into<AnyPin<'a>>,
    {
        let i2c = I2c::new(
            i2c_periph,
            I2cConfig::default().with_frequency(Rate::from_khz(100)),
        )
        .map_err(|_| SensorError::Unavailable)?
        .with_sda(sda.into())
        .with_scl(scl.into());

        Ok(Self {
            i2c,
            calibration: None,
            address: BMP280_ADDRESS,
        })
    }

    pub fn scan(&mut self) {
        esp_println::println!("I2C scan start");
        for addr in 0x03..=0x77 {
            if self.i2c.write(addr, &[]).is_ok() {
                esp_println::println!("Found device at 0x{:02X}", addr);
            }
        }
        esp_println::println!("I2C scan done");
    }

    pub fn read_chip_id(&mut self) -> Result<u8, SensorError> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(self.address, &[0xD0], &mut id)
            .map_err(|_| SensorError::Read)?;
        Ok(id[0])
    }

    pub fn init(&mut self) -> Result<(), SensorError> {
        let delay = Delay::new();

        // Soft reset; no ACK here means nothing is fitted
        self.i2c
            .write(self.address, &[0xE0, 0xB6])
            .map_err(|_| SensorError::Unavailable)?;

        delay.delay_millis(100);

        // Wait for NVM data to be copied (status bit 0 must be 0)
        for _ in 0..50 {
            let mut status = [0u8];
            if self
                .i2c
                .write_read(self.address, &[0xF3], &mut status)
                .is_ok()
                && status[0] & 0x01 == 0
            {
                break;
            }
            delay.delay_millis(20);
        }

        let chip_id = self.read_chip_id()?;
        esp_println::println!("[BMP280] Chip ID: 0x{:02X}", chip_id);
        if chip_id != BMP280_CHIP_ID {
            return Err(SensorError::Unavailable);
        }

        let mut calib_data = [0u8; 6];
        self.i2c
            .write_read(self.address, &[0x88], &mut calib_data)
            .map_err(|_| SensorError::Read)?;

        let calibration = CalibrationData {
            dig_t1: u16::from_le_bytes([calib_data[0], calib_data[1]]),
            dig_t2: i16::from_le_bytes([calib_data[2], calib_data[3]]),
            dig_t3: i16::from_le_bytes([calib_data[4], calib_data[5]]),
        };

        esp_println::println!(
            "[BMP280] Calibration: T1={}, T2={}, T3={}",
            calibration.dig_t1,
            calibration.dig_t2,
            calibration.dig_t3
        );

        self.calibration = Some(calibration);

        // Config register: standby 1000 ms, filter off
        self.i2c
            .write(self.address, &[0xF5, 0xA0])
            .map_err(|_| SensorError::Read)?;

        delay.delay_millis(10);

        // Control register: temp oversampling x1, pressure skipped, normal mode
        self.i2c
            .write(self.address, &[0xF4, 0x23])
            .map_err(|_| SensorError::Read)?;

        delay.delay_millis(100);

        esp_println::println!("[BMP280] Initialized - ready to measure");

        Ok(())
    }

    pub fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError> {
        let calib = self.calibration.ok_or(SensorError::Unavailable)?;

        // Read temperature data (registers 0xFA, 0xFB, 0xFC)
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(self.address, &[0xFA], &mut buf)
            .map_err(|_| SensorError::Read)?;

        let adc_t: i32 = ((buf[0] as i32) << 12) | ((buf[1] as i32) << 4) | ((buf[2] as i32) >> 4);

        // Bosch BMP280 datasheet compensation formula (integer version),
        // result in hundredths of a degree
        let var1 = (((adc_t >> 3) - ((calib.dig_t1 as i32) << 1)) * (calib.dig_t2 as i32)) >> 11;
        let var2 = (((((adc_t >> 4) - (calib.dig_t1 as i32))
            * ((adc_t >> 4) - (calib.dig_t1 as i32)))
            >> 12)
            * (calib.dig_t3 as i32))
            >> 14;
        let t_fine = var1 + var2;
        let centi = (t_fine * 5 + 128) >> 8;

        Ok(MilliCelsius::from_centi(centi))
    }
}

impl TemperatureSource for BMP280Hardware<'_> {
    fn probe(&mut self) -> Result<(), SensorError> {
        self.init()
    }

    fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError> {
        BMP280Hardware::read_temperature(self)
    }
}
