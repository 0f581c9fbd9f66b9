use pdes_core::{LinkId, VehicleId};
use pdes_network::NetworkError;
use pdes_sched::SchedError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("scheduler error: {0}")]
    Sched(#[from] SchedError),

    #[error("the network has no links")]
    EmptyNetwork,

    #[error("no connected origin/destination pair found after {0} attempts")]
    Unroutable(usize),

    #[error("invalid departure window [{start}, {end})")]
    InvalidWindow { start: f64, end: f64 },

    #[error("vehicle {vehicle} has an empty route")]
    EmptyRoute { vehicle: VehicleId },

    #[error("worker assignment covers {got} links, network has {expected}")]
    Assignment { got: usize, expected: usize },

    #[error("road for {link} registered as a different unit id")]
    UnitMismatch { link: LinkId },
}

pub type TrafficResult<T> = Result<T, TrafficError>;
