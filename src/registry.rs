//! Registry (component H): process-wide directory from `SphereId` to its coordinator's mailbox.
//!
//! The worker-handle half of "`(sphereId, panelIndex) → worker handle`" lives inside each
//! coordinator instead of in this table: workers are never addressed directly by an external
//! caller (every `start_frame`/`get_all_field_data` already funnels through the owning
//! coordinator), so exposing them process-wide would just be an unused extra indirection. Backed
//! by `dashmap` for the `sphereId → coordinator handle` half, matching the corpus's convention for
//! a lock-free concurrently-read-and-written map.


use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use dashmap::DashMap;

use crate::coordinator::{self, CoordinatorMsg, SphereDataSource};
use crate::error::{GeofError, Result};
use crate::field::FieldIndex;
use crate::geometry::Centroids;
use crate::sphere::{FrameOutcome, InactiveEvent, PerFieldFn, SphereConfig, SphereId};

struct Entry<T, S> {
    mailbox: Sender<CoordinatorMsg<T, S>>,
    centroids: Arc<Centroids>,
    poisoned: Arc<AtomicBool>,
}

impl<T, S> Clone for Entry<T, S> {
    fn clone(&self) -> Self {
        Self { mailbox: self.mailbox.clone(), centroids: self.centroids.clone(), poisoned: self.poisoned.clone() }
    }
}

impl<T, S> Entry<T, S> {
    /// Maps a disconnected-mailbox send/recv failure to the right error: a sphere that timed out
    /// a frame stays registered as a zombie so callers learn why it died, rather than looking
    /// identical to an id that was never minted.
    fn disconnected_error(&self, id: SphereId) -> GeofError {
        if self.poisoned.load(Ordering::Acquire) {
            GeofError::FrameTimeout(id)
        } else {
            GeofError::UnknownSphere(id)
        }
    }
}

/// Process-wide table of live spheres, keyed by the id the registry itself mints.
pub struct Registry<T, S> {
    coordinators: DashMap<SphereId, Entry<T, S>>,
}

impl<T, S> Registry<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self { coordinators: DashMap::new() }
    }

    /// Computes centroids and the panel partition, spawns one worker thread per panel plus the
    /// coordinator thread, and registers the result. `initial` supplies each field's starting
    /// value.
    pub fn create(&self, config: SphereConfig, initial: impl Fn(FieldIndex) -> T) -> Result<SphereId> {
        self.create_with_parent(config, initial, None)
    }

    pub fn create_with_parent(
        &self,
        config: SphereConfig,
        initial: impl Fn(FieldIndex) -> T,
        parent: Option<Sender<InactiveEvent>>,
    ) -> Result<SphereId> {
        if config.divisions < 1 {
            return Err(GeofError::InvalidDivisions(config.divisions));
        }

        let d = config.divisions;
        let (seed, centroids) = coordinator::seed::<T, S>(config, initial, parent);
        let id = seed.id;
        let (mailbox_tx, mailbox_rx) = crossbeam_channel::unbounded();

        let poisoned = seed.poisoned.clone();
        thread::spawn(move || coordinator::run(seed, d, mailbox_rx));

        self.coordinators.insert(id, Entry { mailbox: mailbox_tx, centroids: Arc::new(centroids), poisoned });
        Ok(id)
    }

    fn entry(&self, id: SphereId) -> Result<Entry<T, S>> {
        self.coordinators.get(&id).map(|entry| entry.clone()).ok_or(GeofError::UnknownSphere(id))
    }

    pub fn centroids(&self, id: SphereId) -> Result<Arc<Centroids>> {
        self.entry(id).map(|entry| entry.centroids)
    }

    pub fn start_frame(
        &self,
        id: SphereId,
        per_field_fn: PerFieldFn<T, S>,
        sphere_data: SphereDataSource<S>,
        on_complete: Sender<FrameOutcome>,
    ) -> Result<()> {
        let entry = self.entry(id)?;
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);

        entry
            .mailbox
            .send(CoordinatorMsg::StartFrame { per_field_fn, sphere_data, ack: ack_tx, on_complete })
            .map_err(|_| entry.disconnected_error(id))?;

        ack_rx.recv().map_err(|_| entry.disconnected_error(id))?
    }

    pub fn get_all_field_data(&self, id: SphereId) -> Result<HashMap<FieldIndex, T>> {
        let entry = self.entry(id)?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);

        entry
            .mailbox
            .send(CoordinatorMsg::GetAllFieldData { reply: reply_tx })
            .map_err(|_| entry.disconnected_error(id))?;

        reply_rx.recv().map_err(|_| entry.disconnected_error(id))
    }

    pub fn in_frame(&self, id: SphereId) -> Result<bool> {
        let entry = self.entry(id)?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);

        entry
            .mailbox
            .send(CoordinatorMsg::InFrame { reply: reply_tx })
            .map_err(|_| entry.disconnected_error(id))?;

        reply_rx.recv().map_err(|_| entry.disconnected_error(id))
    }

    pub fn teardown(&self, id: SphereId) -> Result<()> {
        let entry = self.entry(id)?;
        let _ = entry.mailbox.send(CoordinatorMsg::Shutdown);
        self.coordinators.remove(&id);
        Ok(())
    }
}

impl<T, S> Default for Registry<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
