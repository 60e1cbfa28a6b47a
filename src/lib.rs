//! A parallel stencil engine over a geodesic (icosahedral) sphere grid.
//!
//! A sphere is subdivided into fields — mostly hexagons, with twelve pentagons at the original
//! icosahedron vertices — partitioned into panels that are evaluated concurrently. A frame applies
//! a user-supplied function to every field and its neighbours, reading a consistent pre-frame
//! snapshot and becoming visible only once every panel has committed.
//!
//! ```
//! use std::sync::Arc;
//! use geof::{Sphere, SphereConfig};
//!
//! let sphere = Sphere::<i32>::create(SphereConfig::new(1), |_field| 0).unwrap();
//!
//! let increment: geof::PerFieldFn<i32, ()> =
//!     Arc::new(|_field, current, _adjacents, _data| current + 1);
//! let (done_tx, done_rx) = crossbeam_channel::bounded(1);
//! sphere.start_frame(increment, Arc::new(()), done_tx).unwrap();
//! done_rx.recv().unwrap();
//!
//! assert!(sphere.get_all_field_data().unwrap().values().all(|&v| v == 1));
//! ```

pub mod coordinator;
pub mod error;
pub mod field;
pub mod geometry;
mod interpolation;
pub mod iter;
pub mod panel;
pub mod patterns;
pub mod registry;
pub mod shape;
pub mod sphere;
pub mod vector;
pub mod worker;

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::Sender;

pub use error::{GeofError, Result};
pub use field::{Adjacency, Direction, Divisions, FieldIndex};
pub use sphere::{Adjacents, FrameOutcome, InactiveEvent, PerFieldFn, SphereConfig, SphereDataFn, SphereId};

use coordinator::SphereDataSource;
use geometry::Centroids;
use patterns::FunctionRegistry;
use registry::Registry;

/// A live geodesic sphere: its topology, panel partition, and running frame engine, generic over
/// the per-field value type `T` and the per-frame sphere-data type `S` (default `()`).
///
/// Each `Sphere` owns its own single-sphere [`Registry`]; construct one `Sphere` per simulation
/// instance. Cloning is not supported — `shutdown` consumes the sphere and tears down its threads.
pub struct Sphere<T, S = ()> {
    registry: Arc<Registry<T, S>>,
    id: SphereId,
}

impl<T, S> Sphere<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    /// Creates a sphere with the given configuration, seeding every field's value from `initial`.
    pub fn create(config: SphereConfig, initial: impl Fn(FieldIndex) -> T) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let id = registry.create(config, initial)?;
        Ok(Self { registry, id })
    }

    /// Like [`Sphere::create`], but `inactive` is notified once the coordinator has been idle past
    /// its configured `inactivity_timeout`.
    pub fn create_with_inactivity_notifications(
        config: SphereConfig,
        initial: impl Fn(FieldIndex) -> T,
        inactive: Sender<InactiveEvent>,
    ) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let id = registry.create_with_parent(config, initial, Some(inactive))?;
        Ok(Self { registry, id })
    }

    pub fn id(&self) -> SphereId {
        self.id
    }

    /// Starts a frame with a literal `sphere_data` value, shared by every panel's evaluation.
    /// Returns once the frame has been accepted; `on_complete` receives the asynchronous
    /// [`FrameOutcome`] once every panel has committed (or the frame has failed).
    pub fn start_frame(
        &self,
        per_field_fn: PerFieldFn<T, S>,
        sphere_data: Arc<S>,
        on_complete: Sender<FrameOutcome>,
    ) -> Result<()> {
        self.registry.start_frame(self.id, per_field_fn, SphereDataSource::Literal(sphere_data), on_complete)
    }

    /// Starts a frame whose `sphere_data` is computed once, by the coordinator, immediately before
    /// broadcasting to panels.
    pub fn start_frame_with(
        &self,
        per_field_fn: PerFieldFn<T, S>,
        sphere_data_fn: SphereDataFn<S>,
        on_complete: Sender<FrameOutcome>,
    ) -> Result<()> {
        self.registry.start_frame(self.id, per_field_fn, SphereDataSource::Generated(sphere_data_fn), on_complete)
    }

    /// Starts a frame by resolving `name` against a function registry instead of passing a
    /// callable directly. Fails with [`GeofError::UnknownFunctionRef`] if `name` isn't registered.
    pub fn start_frame_by_name(
        &self,
        functions: &FunctionRegistry<T, S>,
        name: &str,
        sphere_data: Arc<S>,
        on_complete: Sender<FrameOutcome>,
    ) -> Result<()> {
        let per_field_fn =
            functions.resolve(name).ok_or_else(|| GeofError::UnknownFunctionRef(name.to_string()))?;
        self.start_frame(per_field_fn, sphere_data, on_complete)
    }

    /// Snapshot of every field's current value. Safe to call at any time, including mid-frame, in
    /// which case it returns the pre-frame state.
    pub fn get_all_field_data(&self) -> Result<HashMap<FieldIndex, T>> {
        self.registry.get_all_field_data(self.id)
    }

    pub fn in_frame(&self) -> Result<bool> {
        self.registry.in_frame(self.id)
    }

    /// The sphere's immutable per-field centroid positions, computed once at creation.
    pub fn centroids(&self) -> Result<Arc<Centroids>> {
        self.registry.centroids(self.id)
    }

    /// Tears down the sphere's coordinator and panel worker threads.
    pub fn shutdown(self) -> Result<()> {
        self.registry.teardown(self.id)
    }
}
