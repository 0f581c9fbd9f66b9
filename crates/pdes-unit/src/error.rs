use pdes_core::{SimTime, UnitId};
use pdes_queue::QueueError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// The fatal error the horizon exists to prevent: a message earlier than
    /// what every worker may already have delivered.
    #[error(
        "causality violation: unit {origin} scheduled {payload} for {target} at {time}, \
         earlier than horizon {horizon}"
    )]
    Causality {
        origin:  UnitId,
        target:  UnitId,
        time:    SimTime,
        horizon: SimTime,
        payload: String,
    },

    #[error("invalid message time {0}: must be finite")]
    InvalidTime(f64),

    #[error("message target {0} is not a registered unit")]
    UnknownTarget(UnitId),

    /// Raised by unit logic itself.
    #[error("model error: {0}")]
    Model(String),
}

impl From<QueueError> for UnitError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::UnknownUnit(id) => UnitError::UnknownTarget(id),
        }
    }
}

pub type UnitResult<T> = Result<T, UnitError>;
