//! Sphere coordinator (component G): spawns panel workers, starts frames, collects ready-to-commit
//! and committed acknowledgements, and surfaces `frame_complete` / inactivity events.


use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crossbeam_channel::{Receiver, Select, Sender};
use tracing::{debug, info, warn};

use crate::error::GeofError;
use crate::field::{Divisions, FieldIndex};
use crate::geometry::Centroids;
use crate::panel::{choose_polyhedron, PanelAssignment};
use crate::sphere::{FrameOutcome, InactiveEvent, PerFieldFn, SphereConfig, SphereId};
use crate::worker::{self, PanelData, WorkerEvent, WorkerHandle, WorkerMsg};

/// Where `start_frame`'s `sphere_data` argument comes from: a value computed up front by the
/// caller, or a generator evaluated once by the coordinator before broadcasting (§4.G).
pub enum SphereDataSource<S> {
    Literal(Arc<S>),
    Generated(Arc<dyn Fn() -> S + Send + Sync>),
}

/// Messages the coordinator's external API sends to its own thread.
pub enum CoordinatorMsg<T, S> {
    StartFrame {
        per_field_fn: PerFieldFn<T, S>,
        sphere_data: SphereDataSource<S>,
        ack: Sender<Result<(), GeofError>>,
        on_complete: Sender<FrameOutcome>,
    },
    GetAllFieldData { reply: Sender<HashMap<FieldIndex, T>> },
    InFrame { reply: Sender<bool> },
    Shutdown,
}

/// Everything the coordinator thread needs to come alive, built once at `create`.
pub struct CoordinatorSeed<T, S> {
    pub id: SphereId,
    pub config: SphereConfig,
    pub workers: Vec<WorkerHandle<T, S>>,
    pub peers: Arc<Vec<PanelData<T>>>,
    pub assignment: Arc<PanelAssignment>,
    pub worker_events_tx: Sender<WorkerEvent>,
    pub worker_events_rx: Receiver<WorkerEvent>,
    pub parent: Option<Sender<InactiveEvent>>,
    pub poisoned: Arc<AtomicBool>,
}

/// Builds the initial panel buffers, partitions the sphere, and spawns one worker thread per
/// panel. Does not spawn the coordinator thread itself; see [`spawn`].
pub fn seed<T, S>(
    config: SphereConfig,
    initial: impl Fn(FieldIndex) -> T,
    parent: Option<Sender<InactiveEvent>>,
) -> (CoordinatorSeed<T, S>, Centroids)
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let id = crate::sphere::next_sphere_id();
    let d: Divisions = config.divisions;
    let centroids = Centroids::compute(d);
    let polyhedron = choose_polyhedron(std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
    let assignment = Arc::new(PanelAssignment::build(d, &centroids, polyhedron));

    let (worker_events_tx, worker_events_rx) = crossbeam_channel::unbounded();

    let peers: Vec<PanelData<T>> = (0..assignment.panel_count())
        .map(|panel| {
            let data: HashMap<FieldIndex, T> =
                assignment.fields_of(panel).iter().map(|&f| (f, initial(f))).collect();
            Arc::new(RwLock::new(data))
        })
        .collect();
    let peers = Arc::new(peers);

    let workers = (0..assignment.panel_count())
        .map(|panel| {
            worker::spawn(
                panel,
                assignment.fields_of(panel).to_vec(),
                d,
                peers[panel].clone(),
                peers.clone(),
                assignment.clone(),
                worker_events_tx.clone(),
            )
        })
        .collect();

    info!(sphere = %id, divisions = d, panels = assignment.panel_count(), "sphere created");

    let poisoned = Arc::new(AtomicBool::new(false));

    (
        CoordinatorSeed { id, config, workers, peers, assignment, worker_events_tx, worker_events_rx, parent, poisoned },
        centroids,
    )
}

fn respawn<T, S>(
    w: &mut WorkerHandle<T, S>,
    d: Divisions,
    assignment: &Arc<PanelAssignment>,
    peers: &Arc<Vec<PanelData<T>>>,
    events: Sender<WorkerEvent>,
) where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    warn!(panel = w.panel, "worker unreachable, respawning from last known panel state");
    let fields = assignment.fields_of(w.panel).to_vec();
    let fresh = worker::spawn(w.panel, fields, d, w.current.clone(), peers.clone(), assignment.clone(), events);
    w.mailbox = fresh.mailbox;
}

/// Runs the coordinator's message loop on the calling thread. Spawn this as the body of a
/// dedicated `thread::spawn` closure.
pub fn run<T, S>(seed: CoordinatorSeed<T, S>, d: Divisions, mailbox: Receiver<CoordinatorMsg<T, S>>)
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let CoordinatorSeed {
        id,
        config,
        mut workers,
        peers,
        assignment,
        worker_events_tx,
        worker_events_rx,
        parent,
        poisoned,
    } = seed;
    let panel_count = workers.len();

    let mut in_frame = false;
    let mut ready_set = HashSet::new();
    let mut commit_set = HashSet::new();
    let mut on_complete: Option<Sender<FrameOutcome>> = None;
    let mut hibernated = false;
    let mut frame_deadline: Option<Instant> = None;

    loop {
        let mut select = Select::new();
        let mbox_token = select.recv(&mailbox);
        let event_token = select.recv(&worker_events_rx);

        let wait = if in_frame {
            frame_deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
        } else if !hibernated {
            config.inactivity_timeout
        } else {
            None
        };

        let oper = match wait {
            Some(timeout) => match select.select_timeout(timeout) {
                Ok(oper) => oper,
                Err(_) if in_frame => {
                    warn!(sphere = %id, "frame exceeded its wall-clock timeout, tearing sphere down");
                    for w in &workers {
                        let _ = w.mailbox.send(WorkerMsg::Discard);
                        let _ = w.mailbox.send(WorkerMsg::Shutdown);
                    }
                    poisoned.store(true, Ordering::Release);
                    if let Some(reply_to) = on_complete.take() {
                        let _ = reply_to.send(FrameOutcome::TimedOut { sphere: id });
                    }
                    break;
                }
                Err(_) => {
                    if let Some(parent) = &parent {
                        let _ = parent.send(InactiveEvent { sphere: id });
                    }
                    debug!(sphere = %id, "coordinator hibernating after inactivity timeout");
                    hibernated = true;
                    continue;
                }
            },
            None => select.select(),
        };

        if oper.index() == mbox_token {
            let msg = match oper.recv(&mailbox) {
                Ok(msg) => msg,
                Err(_) => break,
            };
            hibernated = false;

            match msg {
                CoordinatorMsg::StartFrame { per_field_fn, sphere_data, ack, on_complete: reply_to } => {
                    if in_frame {
                        let _ = ack.send(Err(GeofError::AlreadyInFrame(id)));
                        continue;
                    }

                    let sphere_data = match sphere_data {
                        SphereDataSource::Literal(value) => value,
                        SphereDataSource::Generated(f) => Arc::new(f()),
                    };

                    let mut unreachable_panel = None;
                    for w in workers.iter_mut() {
                        let send = |w: &WorkerHandle<T, S>| {
                            w.mailbox.send(WorkerMsg::StartFrame {
                                per_field_fn: per_field_fn.clone(),
                                sphere_data: sphere_data.clone(),
                            })
                        };
                        if send(w).is_err() {
                            respawn(w, d, &assignment, &peers, worker_events_tx.clone());
                            if send(w).is_err() {
                                unreachable_panel = Some(w.panel);
                                break;
                            }
                        }
                    }

                    if let Some(panel) = unreachable_panel {
                        let _ = ack.send(Err(GeofError::WorkerUnreachable { sphere: id, panel }));
                        continue;
                    }

                    in_frame = true;
                    ready_set.clear();
                    commit_set.clear();
                    on_complete = Some(reply_to);
                    frame_deadline = config.frame_timeout.map(|timeout| Instant::now() + timeout);
                    debug!(sphere = %id, "frame started");
                    let _ = ack.send(Ok(()));
                }
                CoordinatorMsg::GetAllFieldData { reply } => {
                    let mut snapshot = HashMap::new();
                    for panel in peers.iter() {
                        for (field, value) in panel.read().expect("panel lock poisoned").iter() {
                            snapshot.insert(*field, value.clone());
                        }
                    }
                    let _ = reply.send(snapshot);
                }
                CoordinatorMsg::InFrame { reply } => {
                    let _ = reply.send(in_frame);
                }
                CoordinatorMsg::Shutdown => {
                    for w in &workers {
                        let _ = w.mailbox.send(WorkerMsg::Shutdown);
                    }
                    info!(sphere = %id, "sphere torn down");
                    break;
                }
            }
        } else if oper.index() == event_token {
            let event = match oper.recv(&worker_events_rx) {
                Ok(event) => event,
                Err(_) => continue,
            };
            hibernated = false;

            if !in_frame {
                continue;
            }

            match event {
                WorkerEvent::ReadyToCommit(panel) => {
                    ready_set.insert(panel);
                    if ready_set.len() == panel_count {
                        for w in &workers {
                            let _ = w.mailbox.send(WorkerMsg::Commit);
                        }
                    }
                }
                WorkerEvent::Committed(panel) => {
                    commit_set.insert(panel);
                    if commit_set.len() == panel_count {
                        if let Some(reply_to) = on_complete.take() {
                            let _ = reply_to.send(FrameOutcome::Complete { sphere: id });
                        }
                        in_frame = false;
                        frame_deadline = None;
                        debug!(sphere = %id, "frame complete");
                    }
                }
                WorkerEvent::FrameFailed { panel, field, cause } => {
                    warn!(sphere = %id, panel, field = ?field, %cause, "frame failed");
                    for w in &workers {
                        let _ = w.mailbox.send(WorkerMsg::Discard);
                    }
                    if let Some(reply_to) = on_complete.take() {
                        let _ = reply_to.send(FrameOutcome::Failed { sphere: id, field, cause });
                    }
                    in_frame = false;
                    frame_deadline = None;
                }
            }
        }
    }
}
