use pdes_core::{CoreError, SimTime, UnitId, WorkerId};
use pdes_unit::UnitError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedError {
    #[error("scheduler configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("the run has already started")]
    AlreadyStarted,

    #[error("worker {worker} out of range: the pool has {num_workers} workers")]
    WorkerOutOfRange {
        worker:      WorkerId,
        num_workers: usize,
    },

    #[error("unit {unit} declares lookahead {lookahead}: must be finite and > 0")]
    InvalidLookahead {
        unit:      UnitId,
        lookahead: f64,
    },

    #[error("no registered unit {0}")]
    UnknownUnit(UnitId),

    #[error("too many units: ids are 32-bit")]
    TooManyUnits,

    /// A seed scheduled by the harness was rejected.
    #[error("setup error: {0}")]
    Setup(#[from] UnitError),

    #[error("unit {unit} failed to initialize: {source}")]
    Initialize {
        unit:   UnitId,
        #[source]
        source: UnitError,
    },

    /// `process` returned an error or scheduled something illegal.
    #[error("unit {unit} on worker {worker} failed at {time} processing {payload}: {source}")]
    UnitFailed {
        unit:    UnitId,
        worker:  WorkerId,
        time:    SimTime,
        payload: String,
        #[source]
        source:  UnitError,
    },

    #[error("worker {worker} panicked{}: {message}", .context.as_deref().unwrap_or(""))]
    WorkerPanicked {
        worker:  WorkerId,
        /// " at <time> in <unit> processing <payload>" when the panic came
        /// from inside `process`.
        context: Option<String>,
        message: String,
    },

    /// `current + delta` rounded back to `current`: the lookahead is too
    /// small for the magnitude of the simulation time.
    #[error("horizon cannot advance past {current} (next would be {next}): lookahead below time resolution")]
    HorizonStalled {
        current: SimTime,
        next:    SimTime,
    },

    #[error("failed to spawn worker {worker}: {message}")]
    Spawn {
        worker:  WorkerId,
        message: String,
    },

    #[error("worker {0} stopped without reporting")]
    WorkerLost(WorkerId),
}

pub type SchedResult<T> = Result<T, SchedError>;
