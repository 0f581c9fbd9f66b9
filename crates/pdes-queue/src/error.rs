use pdes_core::UnitId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueueError {
    #[error("no registered unit {0}")]
    UnknownUnit(UnitId),
}

pub type QueueResult<T> = Result<T, QueueError>;
