//! Error types for sensors and the radio

use thiserror_no_std::Error;

/// Failures reported by a temperature source.
///
/// These never leave the sample loop: the affected reading degrades to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The peripheral is not fitted on this board or failed to come up.
    #[error("sensor unavailable")]
    Unavailable,

    /// A single bus transaction failed.
    #[error("sensor read failed")]
    Read,
}

/// Failures configuring or driving advertisements.
///
/// All of these are fatal for the beacon and propagate out of
/// [`SampleLoop::run`](crate::logic::SampleLoop::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RadioError {
    /// Advertising interval outside what BLE allows.
    #[error("advertising interval of {0} ms is outside 20..=10240 ms")]
    InvalidInterval(u64),

    /// Local name empty or too long for a legacy advertisement.
    #[error("local name must be 1..={max} bytes")]
    InvalidName {
        /// Longest name that still fits next to the service data
        max: usize,
    },

    /// Advertisement data does not fit in a legacy PDU.
    #[error("advertisement data needs {needed} bytes, only {max} available")]
    PayloadTooLarge {
        /// Bytes required by the encoded AD structures
        needed: usize,
        /// Legacy advertisement data limit
        max: usize,
    },

    /// The radio stack rejected the configuration.
    #[error("radio rejected advertisement configuration")]
    Configuration,

    /// Advertising could not be started.
    #[error("failed to start advertising")]
    Start,

    /// Advertising could not be stopped.
    #[error("failed to stop advertising")]
    Stop,
}

impl RadioError {
    /// True for failures raised while building or applying a session.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidInterval(_)
                | Self::InvalidName { .. }
                | Self::PayloadTooLarge { .. }
                | Self::Configuration
        )
    }
}
