//! Business logic layer (hardware-independent)
//!
//! One cycle: read sensors, update the payload, advertise for one sample
//! interval, stop. Repeats until reset.

use core::convert::Infallible;

use embassy_time::Instant;
use log::{error, info, warn};

use crate::beacon::Beacon;
use crate::config::BeaconConfig;
use crate::error::{RadioError, SensorError};
use crate::model::{MilliCelsius, TemperatureAvailability};
use crate::payload::{Field, PayloadBuffer};
use crate::sensor::SensorPort;
use crate::traits::{Clock, DigitalInput, IndicatorOutput, Radio, Sleeper, TemperatureSource};

/// Remembers the last reported value so only changes get logged.
#[derive(Debug, Clone, Copy)]
pub struct ChangeTracker<T> {
    last: T,
}

impl<T: Copy + PartialEq> ChangeTracker<T> {
    pub const fn new(initial: T) -> Self {
        Self { last: initial }
    }

    /// Record `value`; true when it differs from the previous one.
    pub fn update(&mut self, value: T) -> bool {
        let changed = value != self.last;
        self.last = value;
        changed
    }

    pub fn last(&self) -> T {
        self.last
    }
}

/// What happened to the temperature field during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureEvent {
    /// Sensor absent since startup, field pinned at zero
    Unavailable,
    /// Throttled, previous value kept
    NotDue,
    Unchanged(MilliCelsius),
    Changed(MilliCelsius),
    /// First good read after a failure
    Recovered(MilliCelsius),
    /// Read failed after a good one; field reset to zero
    Failed(SensorError),
    /// Read failed again; field stays zero, nothing logged
    StillFailing(SensorError),
}

impl TemperatureEvent {
    pub fn attempted(&self) -> bool {
        !matches!(self, Self::Unavailable | Self::NotDue)
    }

    pub fn logged(&self) -> bool {
        matches!(self, Self::Changed(_) | Self::Recovered(_) | Self::Failed(_))
    }
}

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub float1: bool,
    pub float2: bool,
    pub float1_changed: bool,
    pub float2_changed: bool,
    pub temperature: TemperatureEvent,
}

impl CycleReport {
    /// True when this cycle wrote at least one log line.
    pub fn logged(&self) -> bool {
        self.float1_changed || self.float2_changed || self.temperature.logged()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemperatureState {
    Absent,
    /// Holds the last logged reading
    Healthy(MilliCelsius),
    Failing,
}

/// Drives sampling and advertising for the life of the process.
pub struct SampleLoop<A, B, T, L, R, C, S> {
    config: BeaconConfig,
    sensors: SensorPort<A, B, T>,
    indicator: L,
    beacon: Beacon<R>,
    clock: C,
    sleeper: S,
    availability: TemperatureAvailability,
    last_temperature_read: Option<Instant>,
    float1: ChangeTracker<bool>,
    float2: ChangeTracker<bool>,
    temperature: TemperatureState,
}

impl<A, B, T, L, R, C, S> SampleLoop<A, B, T, L, R, C, S>
where
    A: DigitalInput,
    B: DigitalInput,
    T: TemperatureSource,
    L: IndicatorOutput,
    R: Radio,
    C: Clock,
    S: Sleeper,
{
    /// Probes the temperature source; that is the only probe for the
    /// lifetime of the loop.
    pub fn new(
        config: BeaconConfig,
        mut sensors: SensorPort<A, B, T>,
        indicator: L,
        beacon: Beacon<R>,
        clock: C,
        sleeper: S,
    ) -> Self {
        let availability = sensors.probe_temperature();
        let temperature = match availability {
            TemperatureAvailability::Present => TemperatureState::Healthy(MilliCelsius::ZERO),
            TemperatureAvailability::Absent => TemperatureState::Absent,
        };

        let mut this = Self {
            config,
            sensors,
            indicator,
            beacon,
            clock,
            sleeper,
            availability,
            last_temperature_read: None,
            float1: ChangeTracker::new(false),
            float2: ChangeTracker::new(false),
            temperature,
        };
        this.beacon.payload_mut().set_int16(Field::Temperature, 0);
        this
    }

    pub fn availability(&self) -> TemperatureAvailability {
        self.availability
    }

    pub fn payload(&self) -> &PayloadBuffer {
        self.beacon.payload()
    }

    pub fn beacon(&self) -> &Beacon<R> {
        &self.beacon
    }

    pub fn sensors(&self) -> &SensorPort<A, B, T> {
        &self.sensors
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    /// Read the sensors and write the payload. No radio activity.
    pub fn sample(&mut self) -> CycleReport {
        let now = self.clock.now();

        let float1 = self.sensors.read_float1();
        let float1_changed = self.float1.update(float1);
        if float1_changed {
            info!("float sensor 1: {}", float1);
        }
        self.indicator.set_indicator(float1);
        self.beacon
            .payload_mut()
            .set_bool(Field::BinarySensor1, float1);

        let float2 = self.sensors.read_float2();
        let float2_changed = self.float2.update(float2);
        if float2_changed {
            info!("float sensor 2: {}", float2);
        }
        self.beacon
            .payload_mut()
            .set_bool(Field::BinarySensor2, float2);

        let temperature = self.sample_temperature(now);

        CycleReport {
            float1,
            float2,
            float1_changed,
            float2_changed,
            temperature,
        }
    }

    fn temperature_due(&self, now: Instant) -> bool {
        match self.last_temperature_read {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed > self.config.temperature_interval),
        }
    }

    fn sample_temperature(&mut self, now: Instant) -> TemperatureEvent {
        if self.temperature == TemperatureState::Absent {
            return TemperatureEvent::Unavailable;
        }
        if !self.temperature_due(now) {
            return TemperatureEvent::NotDue;
        }
        self.last_temperature_read = Some(now);

        match self.sensors.read_temperature() {
            Ok(reading) => {
                let event = match self.temperature {
                    TemperatureState::Failing => {
                        info!("temperature recovered: {}", reading);
                        TemperatureEvent::Recovered(reading)
                    }
                    TemperatureState::Healthy(last) if last != reading => {
                        info!("temperature: {}", reading);
                        TemperatureEvent::Changed(reading)
                    }
                    _ => TemperatureEvent::Unchanged(reading),
                };
                self.temperature = TemperatureState::Healthy(reading);
                let raw = self.config.temperature_scale.encode(reading);
                self.beacon.payload_mut().set_int16(Field::Temperature, raw);
                event
            }
            Err(e) => {
                self.beacon.payload_mut().set_int16(Field::Temperature, 0);
                let event = if self.temperature == TemperatureState::Failing {
                    TemperatureEvent::StillFailing(e)
                } else {
                    warn!("error reading temperature: {}", e);
                    TemperatureEvent::Failed(e)
                };
                self.temperature = TemperatureState::Failing;
                event
            }
        }
    }

    /// One full cycle: sample, then advertise for one sample interval.
    pub async fn cycle(&mut self) -> Result<CycleReport, RadioError> {
        let report = self.sample();

        self.beacon.configure()?;
        self.beacon.start().await?;
        self.sleeper.sleep(self.config.sample_interval).await;
        self.beacon.stop().await?;

        Ok(report)
    }

    /// Cycle forever. Only a radio failure ends the loop.
    pub async fn run(&mut self) -> Result<Infallible, RadioError> {
        info!(
            "[BEACON] '{}' sampling every {} ms",
            self.config.local_name,
            self.config.sample_interval.as_millis()
        );
        loop {
            if let Err(e) = self.cycle().await {
                error!("[BEACON] radio failure: {}", e);
                return Err(e);
            }
        }
    }
}
