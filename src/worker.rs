//! Panel worker (component F): owns one panel's data double-buffer on its own OS thread, evaluates
//! the per-field function over its field set, and reads neighbours directly from peer panels.
//!
//! Cross-panel neighbour reads are the one exception to "message passing is the only
//! cross-component coupling" (§5): a worker mid-evaluation cannot also answer a peer's `read`
//! request on its mailbox without either a second thread per panel or a request/reply protocol
//! prone to deadlock (A blocks waiting on B's reply while B blocks waiting on A's). §5 already
//! says `current` is "logically immutable between commits, eliminating the need for locks on
//! reads" — read literally, that licenses a lock-free-to-the-caller shared read path instead of a
//! round trip through B's mailbox. Each panel's `current` buffer is an `Arc<RwLock<...>>` visible
//! to every worker; only `commit` takes the write lock, and only the owning panel ever takes it.


use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;

use crate::field::{adjacency, Divisions, FieldIndex};
use crate::panel::PanelAssignment;
use crate::sphere::{Adjacents, PerFieldFn};

/// A panel's field-data buffer, shared for direct read access by every other panel's worker.
pub type PanelData<T> = Arc<RwLock<HashMap<FieldIndex, T>>>;

/// Messages a coordinator sends to a panel worker.
pub enum WorkerMsg<T, S> {
    StartFrame { per_field_fn: PerFieldFn<T, S>, sphere_data: Arc<S> },
    Commit,
    /// Sent to every panel when a frame fails anywhere, so panels that finished (or never
    /// started) evaluating drop any pending `next` and return to idle uniformly.
    Discard,
    Shutdown,
}

/// Events a panel worker reports back to its coordinator.
pub enum WorkerEvent {
    ReadyToCommit(usize),
    Committed(usize),
    FrameFailed { panel: usize, field: FieldIndex, cause: String },
}

/// What a coordinator holds to address and monitor one panel worker.
pub struct WorkerHandle<T, S> {
    pub panel: usize,
    pub mailbox: Sender<WorkerMsg<T, S>>,
    pub current: PanelData<T>,
}

/// Reads field `idx`'s current value from whichever panel owns it.
fn read_field<T: Clone>(
    peers: &[PanelData<T>],
    assignment: &PanelAssignment,
    idx: FieldIndex,
) -> T {
    let panel = assignment.panel_of(idx);
    peers[panel]
        .read()
        .expect("panel lock poisoned")
        .get(&idx)
        .cloned()
        .expect("every field is present in its owning panel's buffer")
}

fn build_adjacents<T: Clone>(
    idx: FieldIndex,
    d: Divisions,
    peers: &[PanelData<T>],
    assignment: &PanelAssignment,
) -> Adjacents<T> {
    let adj = adjacency(idx, d);
    Adjacents {
        nw: read_field(peers, assignment, adj.nw),
        w: read_field(peers, assignment, adj.w),
        sw: read_field(peers, assignment, adj.sw),
        se: read_field(peers, assignment, adj.se),
        e: read_field(peers, assignment, adj.e),
        ne: adj.ne.map(|n| read_field(peers, assignment, n)),
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "per-field function panicked with a non-string payload".to_string()
    }
}

/// Runs a panel worker's message loop on the calling thread. Intended to be the body of a
/// dedicated `thread::spawn` closure; kept as a free function so a respawn can re-invoke it on a
/// fresh thread against the same `current` buffer.
pub fn run_worker<T, S>(
    panel: usize,
    fields: Vec<FieldIndex>,
    d: Divisions,
    current: PanelData<T>,
    peers: Arc<Vec<PanelData<T>>>,
    assignment: Arc<PanelAssignment>,
    events: Sender<WorkerEvent>,
    mailbox: Receiver<WorkerMsg<T, S>>,
) where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let mut pending: Option<HashMap<FieldIndex, T>> = None;

    while let Ok(msg) = mailbox.recv() {
        match msg {
            WorkerMsg::StartFrame { per_field_fn, sphere_data } => {
                let outcome: Result<Vec<(FieldIndex, T)>, (FieldIndex, String)> = fields
                    .par_iter()
                    .map(|&idx| {
                        let here = read_field(&peers, &assignment, idx);
                        let adjacents = build_adjacents(idx, d, &peers, &assignment);
                        let per_field_fn = &per_field_fn;
                        let sphere_data = &sphere_data;

                        catch_unwind(AssertUnwindSafe(|| per_field_fn(idx, &here, &adjacents, sphere_data)))
                            .map(|value| (idx, value))
                            .map_err(|payload| (idx, panic_message(payload)))
                    })
                    .collect();

                match outcome {
                    Ok(pairs) => {
                        pending = Some(pairs.into_iter().collect());
                        let _ = events.send(WorkerEvent::ReadyToCommit(panel));
                    }
                    Err((field, cause)) => {
                        pending = None;
                        let _ = events.send(WorkerEvent::FrameFailed { panel, field, cause });
                    }
                }
            }
            WorkerMsg::Commit => {
                if let Some(next) = pending.take() {
                    *current.write().expect("panel lock poisoned") = next;
                    let _ = events.send(WorkerEvent::Committed(panel));
                }
            }
            WorkerMsg::Discard => {
                pending = None;
            }
            WorkerMsg::Shutdown => break,
        }
    }
}

/// Spawns a panel worker on its own OS thread, wiring its mailbox and shared buffer.
pub fn spawn<T, S>(
    panel: usize,
    fields: Vec<FieldIndex>,
    d: Divisions,
    current: PanelData<T>,
    peers: Arc<Vec<PanelData<T>>>,
    assignment: Arc<PanelAssignment>,
    events: Sender<WorkerEvent>,
) -> WorkerHandle<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let (mailbox, rx) = crossbeam_channel::unbounded();
    let handle_current = current.clone();

    thread::spawn(move || run_worker(panel, fields, d, current, peers, assignment, events, rx));

    WorkerHandle { panel, mailbox, current: handle_current }
}
