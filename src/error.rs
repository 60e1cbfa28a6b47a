use crate::field::FieldIndex;
use crate::sphere::SphereId;

/// Every way a GEOF operation can fail.
///
/// Per-field evaluation failures are contained: the sphere that produced them remains usable
/// afterwards (see [`crate::registry::Registry::start_frame`]). A [`GeofError::FrameTimeout`] is
/// not contained — the sphere that produced it is torn down and every later operation against it
/// fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum GeofError {
    #[error("divisions must be at least 1, got {0}")]
    InvalidDivisions(u32),

    #[error("sphere {0} is not registered")]
    UnknownSphere(SphereId),

    #[error("sphere {0} is already in a frame")]
    AlreadyInFrame(SphereId),

    #[error("no function is registered under the name {0:?}")]
    UnknownFunctionRef(String),

    #[error("per-field evaluation failed at {field:?}: {cause}")]
    PerFieldEvaluationFailed { field: FieldIndex, cause: String },

    #[error("frame on sphere {0} exceeded its wall-clock timeout")]
    FrameTimeout(SphereId),

    #[error("worker for panel {panel} of sphere {sphere} is unreachable")]
    WorkerUnreachable { sphere: SphereId, panel: usize },
}

pub type Result<T> = std::result::Result<T, GeofError>;
