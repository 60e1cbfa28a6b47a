//! Sphere-level identifiers, configuration, and the small data types the frame engine passes
//! across its API boundary.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::field::FieldIndex;

/// Signature every named or literal per-field function must have.
pub type PerFieldFn<T, S> = Arc<dyn Fn(FieldIndex, &T, &Adjacents<T>, &S) -> T + Send + Sync>;

/// Signature a `sphere_data_fn` must have: evaluated once per frame before the broadcast.
pub type SphereDataFn<S> = Arc<dyn Fn() -> S + Send + Sync>;

/// Opaque, globally unique handle to a sphere. Minted by [`crate::registry::Registry::create`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SphereId(u64);

impl SphereId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for SphereId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SphereId({})", self.0)
    }
}

impl fmt::Display for SphereId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) fn next_sphere_id() -> SphereId {
    SphereId::next()
}

/// Creation-time parameters for a sphere.
///
/// `Default` matches the richer of the two coordinator variants the source carried (the one with
/// inactivity hibernation and a parent-notification channel): both timeouts are armed by default.
#[derive(Copy, Clone, Debug)]
pub struct SphereConfig {
    pub divisions: u32,
    pub inactivity_timeout: Option<Duration>,
    pub frame_timeout: Option<Duration>,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            divisions: 1,
            inactivity_timeout: Some(Duration::from_secs(30)),
            frame_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl SphereConfig {
    pub fn new(divisions: u32) -> Self {
        Self { divisions, ..Self::default() }
    }
}

/// A field's up-to-six neighbours, with values in place of indices. Mirrors
/// [`crate::field::Adjacency`]; `ne` is absent exactly for pentagonal fields.
#[derive(Clone, Debug)]
pub struct Adjacents<T> {
    pub nw: T,
    pub w: T,
    pub sw: T,
    pub se: T,
    pub e: T,
    pub ne: Option<T>,
}

impl<T> Adjacents<T> {
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.nw)
            .chain(std::iter::once(&self.w))
            .chain(std::iter::once(&self.sw))
            .chain(std::iter::once(&self.se))
            .chain(std::iter::once(&self.e))
            .chain(self.ne.iter())
    }

    pub fn len(&self) -> usize {
        5 + self.ne.is_some() as usize
    }
}

/// Outcome delivered to a `start_frame` caller's reply channel once the frame finishes (or fails).
#[derive(Debug)]
pub enum FrameOutcome {
    Complete { sphere: SphereId },
    Failed { sphere: SphereId, field: FieldIndex, cause: String },
    /// The frame exceeded `frame_timeout`. The sphere is torn down as a result; any later
    /// operation against it fails with `GeofError::FrameTimeout`.
    TimedOut { sphere: SphereId },
}

/// Emitted to a sphere's parent when its coordinator has been idle past `inactivity_timeout`.
#[derive(Copy, Clone, Debug)]
pub struct InactiveEvent {
    pub sphere: SphereId,
}
