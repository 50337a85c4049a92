//! Advertises the payload buffer one cycle at a time

use embassy_time::Duration;
use log::debug;

use crate::error::RadioError;
use crate::model::{AdvertisementKind, AdvertisementSession, SERVICE_UUID_16};
use crate::payload::PayloadBuffer;
use crate::traits::Radio;

fn session<'a>(
    local_name: &'a str,
    interval: Duration,
    payload: &'a PayloadBuffer,
) -> AdvertisementSession<'a> {
    AdvertisementSession {
        local_name,
        service_uuid: SERVICE_UUID_16,
        interval,
        kind: AdvertisementKind::NonconnectableScannable,
        service_data: payload.as_bytes(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Configured,
    Advertising,
}

/// Owns the payload and drives the radio through configure, start and stop.
///
/// The radio is reconfigured every cycle: a running advertisement is not
/// guaranteed to pick up changes to the buffer.
pub struct Beacon<R> {
    radio: R,
    payload: PayloadBuffer,
    local_name: &'static str,
    interval: Duration,
    phase: Phase,
}

impl<R: Radio> Beacon<R> {
    pub fn new(
        radio: R,
        payload: PayloadBuffer,
        local_name: &'static str,
        interval: Duration,
    ) -> Self {
        Self {
            radio,
            payload,
            local_name,
            interval,
            phase: Phase::Idle,
        }
    }

    pub fn payload(&self) -> &PayloadBuffer {
        &self.payload
    }

    /// Only the sample loop writes through this, and never while advertising.
    pub fn payload_mut(&mut self) -> &mut PayloadBuffer {
        &mut self.payload
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Session for the current buffer contents.
    pub fn session(&self) -> AdvertisementSession<'_> {
        session(self.local_name, self.interval, &self.payload)
    }

    pub fn configure(&mut self) -> Result<(), RadioError> {
        let session = session(self.local_name, self.interval, &self.payload);
        session.validate()?;
        self.radio.configure(&session)?;
        self.phase = Phase::Configured;
        debug!("[BEACON] configured {:02x?}", self.payload.as_bytes());
        Ok(())
    }

    pub async fn start(&mut self) -> Result<(), RadioError> {
        if self.phase != Phase::Configured {
            return Err(RadioError::Start);
        }
        self.radio.start().await?;
        self.phase = Phase::Advertising;
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), RadioError> {
        if self.phase != Phase::Advertising {
            return Ok(());
        }
        self.radio.stop().await?;
        self.phase = Phase::Idle;
        Ok(())
    }
}
