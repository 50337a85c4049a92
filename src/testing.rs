//! Fakes shared by the unit tests

use core::cell::Cell;
use std::collections::VecDeque;

use embassy_time::{Duration, Instant};

use crate::error::{RadioError, SensorError};
use crate::model::{AdvertisementSession, MilliCelsius};
use crate::traits::{Clock, DigitalInput, IndicatorOutput, Radio, Sleeper, TemperatureSource};

/// Simulated clock; sleeping through it advances time instantly.
#[derive(Debug)]
pub struct FakeClock {
    now: Cell<Instant>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::from_ticks(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for &FakeClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl Sleeper for &FakeClock {
    async fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    Configure(Vec<u8>),
    Start,
    Stop,
}

#[derive(Debug, Default)]
pub struct FakeRadio {
    pub calls: Vec<RadioCall>,
    pub fail_configure: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
}

impl FakeRadio {
    /// Service data of every configure call, in order.
    pub fn configured_payloads(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RadioCall::Configure(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Radio for FakeRadio {
    fn configure(&mut self, session: &AdvertisementSession<'_>) -> Result<(), RadioError> {
        if self.fail_configure {
            return Err(RadioError::Configuration);
        }
        self.calls.push(RadioCall::Configure(session.service_data.to_vec()));
        Ok(())
    }

    async fn start(&mut self) -> Result<(), RadioError> {
        if self.fail_start {
            return Err(RadioError::Start);
        }
        self.calls.push(RadioCall::Start);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), RadioError> {
        if self.fail_stop {
            return Err(RadioError::Stop);
        }
        self.calls.push(RadioCall::Stop);
        Ok(())
    }
}

/// Replays a fixed sequence of levels, then holds the last one.
#[derive(Debug)]
pub struct ScriptedInput {
    levels: VecDeque<bool>,
    last: bool,
}

impl ScriptedInput {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            last: false,
        }
    }

    pub fn constant(level: bool) -> Self {
        Self {
            levels: VecDeque::new(),
            last: level,
        }
    }
}

impl DigitalInput for ScriptedInput {
    fn read_digital(&mut self) -> bool {
        if let Some(level) = self.levels.pop_front() {
            self.last = level;
        }
        self.last
    }
}

/// Replays scripted read results and counts the attempts.
#[derive(Debug)]
pub struct ScriptedTemperature {
    probe: Result<(), SensorError>,
    reads: VecDeque<Result<MilliCelsius, SensorError>>,
    fallback: Result<MilliCelsius, SensorError>,
    pub probes: usize,
    pub attempts: usize,
}

impl ScriptedTemperature {
    pub fn new(reads: &[Result<i32, SensorError>]) -> Self {
        Self {
            probe: Ok(()),
            reads: reads.iter().map(|r| r.map(MilliCelsius)).collect(),
            fallback: Ok(MilliCelsius::ZERO),
            probes: 0,
            attempts: 0,
        }
    }

    pub fn constant(milli: i32) -> Self {
        Self {
            fallback: Ok(MilliCelsius(milli)),
            ..Self::new(&[])
        }
    }

    pub fn absent() -> Self {
        Self {
            probe: Err(SensorError::Unavailable),
            fallback: Err(SensorError::Unavailable),
            ..Self::new(&[])
        }
    }
}

impl TemperatureSource for ScriptedTemperature {
    fn probe(&mut self) -> Result<(), SensorError> {
        self.probes += 1;
        self.probe
    }

    fn read_temperature(&mut self) -> Result<MilliCelsius, SensorError> {
        self.attempts += 1;
        self.reads.pop_front().unwrap_or(self.fallback)
    }
}

/// Records every indicator write.
#[derive(Debug, Default)]
pub struct FakeIndicator {
    pub history: Vec<bool>,
}

impl IndicatorOutput for FakeIndicator {
    fn set_indicator(&mut self, on: bool) {
        self.history.push(on);
    }
}
