//! Property tests and end-to-end scenarios that exercise the full actor system: sphere creation,
//! frame execution, and teardown across real OS threads.

use std::collections::HashMap;
use std::sync::Arc;

use assert2::check;
use ntest::timeout;

use geof::field::{adjacency, Direction, FieldIndex};
use geof::iter::{field_count, flatten, unflatten, FieldCursor};
use geof::{FrameOutcome, GeofError, PerFieldFn, Sphere, SphereConfig};

const DIVISIONS: [u32; 5] = [1, 2, 3, 8, 16];

fn run_frame<T, S>(sphere: &Sphere<T, S>, per_field_fn: PerFieldFn<T, S>, sphere_data: Arc<S>) -> FrameOutcome
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    sphere.start_frame(per_field_fn, sphere_data, tx).unwrap();
    rx.recv().unwrap()
}

// --- Property 1: field count -------------------------------------------------------------

#[test]
fn property_field_count() {
    for d in DIVISIONS {
        let count = FieldCursor::new(d).count();
        check!(count == field_count(d), "d={d}");
    }
}

// --- Property 2: adjacency symmetry -------------------------------------------------------

#[test]
fn property_adjacency_symmetry() {
    for d in DIVISIONS {
        for a in FieldCursor::new(d) {
            let adj_a = adjacency(a, d);
            for (_, b) in adj_a.iter() {
                let adj_b = adjacency(b, d);
                let points_back = adj_b.iter().any(|(_, candidate)| candidate == a);
                check!(points_back, "d={d}: {b:?} should have {a:?} among its neighbours");
            }
        }
    }
}

// --- Property 3: pentagon count ------------------------------------------------------------

#[test]
fn property_pentagon_count() {
    for d in DIVISIONS {
        let pentagons = FieldCursor::new(d).filter(|f| f.is_pentagonal(d)).count();
        check!(pentagons == 12, "d={d}");
    }
}

// --- Property 5: flattened-index bijection --------------------------------------------------

#[test]
fn property_flattened_index_bijection() {
    for d in DIVISIONS {
        let mut seen = vec![false; field_count(d)];
        for idx in FieldCursor::new(d) {
            let i = flatten(idx, d);
            check!(!seen[i], "d={d}: index {i} produced twice");
            seen[i] = true;
            check!(unflatten(i, d) == idx, "d={d}: unflatten(flatten(x)) should recover x");
        }
        check!(seen.into_iter().all(|s| s), "d={d}: every dense index should be reached");
    }
}

// --- Property 6: frame isolation ------------------------------------------------------------

#[test]
#[timeout(20000)]
fn property_frame_isolation() {
    let d = 3;
    let initial: HashMap<FieldIndex, i64> =
        FieldCursor::new(d).map(|idx| (idx, flatten(idx, d) as i64)).collect();
    let initial_for_sphere = initial.clone();

    let sphere = Sphere::<i64>::create(SphereConfig::new(d), move |idx| initial_for_sphere[&idx]).unwrap();

    let sum_with_neighbours: PerFieldFn<i64, ()> = Arc::new(|_idx, current, adjacents, _data| {
        *current + adjacents.iter().sum::<i64>()
    });

    match run_frame(&sphere, sum_with_neighbours, Arc::new(())) {
        FrameOutcome::Complete { .. } => {}
        FrameOutcome::Failed { cause, .. } => panic!("frame failed: {cause}"),
        FrameOutcome::TimedOut { .. } => panic!("frame timed out"),
    }

    let after = sphere.get_all_field_data().unwrap();
    for idx in FieldCursor::new(d) {
        let expected = initial[&idx] + adjacency(idx, d).iter().map(|(_, n)| initial[&n]).sum::<i64>();
        check!(after[&idx] == expected, "d={d}: {idx:?} should only see pre-frame neighbour values");
    }

    sphere.shutdown().unwrap();
}

// --- Property 7: commutativity of panel order ------------------------------------------------

#[test]
#[timeout(20000)]
fn property_commutativity_of_panel_order() {
    let d = 4;
    let initial: HashMap<FieldIndex, i64> =
        FieldCursor::new(d).map(|idx| (idx, flatten(idx, d) as i64)).collect();

    let compute = |seed: HashMap<FieldIndex, i64>| {
        let sphere = Sphere::<i64>::create(SphereConfig::new(d), move |idx| seed[&idx]).unwrap();
        let sum_with_neighbours: PerFieldFn<i64, ()> = Arc::new(|_idx, current, adjacents, _data| {
            *current + adjacents.iter().sum::<i64>()
        });
        run_frame(&sphere, sum_with_neighbours, Arc::new(()));
        let result = sphere.get_all_field_data().unwrap();
        sphere.shutdown().unwrap();
        result
    };

    let first = compute(initial.clone());
    let second = compute(initial);

    check!(first == second, "two independently scheduled runs should agree exactly");
}

// --- Property 8: idempotence of get_all_field_data --------------------------------------------

#[test]
#[timeout(10000)]
fn property_get_all_field_data_is_idempotent_between_frames() {
    let sphere = Sphere::<i32>::create(SphereConfig::new(2), |_| 5).unwrap();

    let a = sphere.get_all_field_data().unwrap();
    let b = sphere.get_all_field_data().unwrap();
    check!(a == b);

    sphere.shutdown().unwrap();
}

// --- Scenario S1: tetrahedron pattern on a one-division sphere --------------------------------

#[test]
#[timeout(10000)]
fn scenario_s1_tetrahedron_pattern_on_one_division() {
    use geof::patterns::{FunctionRegistry, PatternContext, Rgb};

    let d = 1;
    let sphere = Sphere::<Rgb, PatternContext>::create(SphereConfig::new(d), |_| [0, 0, 0]).unwrap();
    let centroids = sphere.centroids().unwrap();
    let registry = FunctionRegistry::with_builtins();
    let tetrahedron = registry.resolve("tetrahedron").unwrap();

    run_frame(&sphere, tetrahedron, Arc::new(PatternContext { divisions: d, centroids }));

    let result = sphere.get_all_field_data().unwrap();
    check!(result.len() == 12);
    check!(result.keys().all(|f| f.is_pentagonal(d)));

    sphere.shutdown().unwrap();
}

// --- Name-based function resolution ----------------------------------------------------------

#[test]
#[timeout(10000)]
fn start_frame_by_name_resolves_registered_functions_and_rejects_unknown_ones() {
    use geof::patterns::{FunctionRegistry, PatternContext, Rgb};

    let d = 1;
    let sphere = Sphere::<Rgb, PatternContext>::create(SphereConfig::new(d), |_| [0, 0, 0]).unwrap();
    let centroids = sphere.centroids().unwrap();
    let registry = FunctionRegistry::with_builtins();
    let data = Arc::new(PatternContext { divisions: d, centroids });

    let (tx, rx) = crossbeam_channel::bounded(1);
    sphere.start_frame_by_name(&registry, "octahedron", data.clone(), tx).unwrap();
    match rx.recv().unwrap() {
        FrameOutcome::Complete { .. } => {}
        other => panic!("unexpected outcome: {other:?}"),
    }

    let (tx, _rx) = crossbeam_channel::bounded(1);
    let err = sphere.start_frame_by_name(&registry, "does-not-exist", data, tx);
    check!(matches!(err, Err(GeofError::UnknownFunctionRef(_))));

    sphere.shutdown().unwrap();
}

// --- Scenario S2: exact adjacency of Sxy(0,0,0) at d=2 ------------------------------------------

#[test]
fn scenario_s2_exact_adjacency_at_two_divisions() {
    let d = 2;
    check!(field_count(d) == 42);

    let adj = adjacency(FieldIndex::sxy(0, 0, 0), d);
    check!(adj.nw == FieldIndex::North);
    check!(adj.w == FieldIndex::sxy(4, 0, 0));
    check!(adj.sw == FieldIndex::sxy(0, 0, 1));
    check!(adj.se == FieldIndex::sxy(0, 1, 0));
    check!(adj.e == FieldIndex::sxy(1, 0, 1));
    check!(adj.get(Direction::Ne) == Some(FieldIndex::sxy(1, 0, 0)));
}

// --- Scenario S3: identity function leaves the map unchanged across frames ---------------------

#[test]
#[timeout(20000)]
fn scenario_s3_identity_function_is_stable_across_frames() {
    let d = 3;
    let initial: HashMap<FieldIndex, i32> =
        FieldCursor::new(d).map(|idx| (idx, flatten(idx, d) as i32)).collect();
    let seed = initial.clone();

    let sphere = Sphere::<i32>::create(SphereConfig::new(d), move |idx| seed[&idx]).unwrap();
    let identity: PerFieldFn<i32, ()> = Arc::new(|_idx, current, _adjacents, _data| *current);

    for _ in 0..3 {
        run_frame(&sphere, identity.clone(), Arc::new(()));
        check!(sphere.get_all_field_data().unwrap() == initial);
    }

    sphere.shutdown().unwrap();
}

// --- Scenario S4: neighbour-count colouring at d=4 ----------------------------------------------

#[test]
#[timeout(20000)]
fn scenario_s4_neighbour_count_at_four_divisions() {
    let d = 4;
    check!(field_count(d) == 162);

    let sphere = Sphere::<u8>::create(SphereConfig::new(d), |_| 0).unwrap();
    let count_neighbours: PerFieldFn<u8, ()> =
        Arc::new(|_idx, _current, adjacents, _data| adjacents.len() as u8);

    run_frame(&sphere, count_neighbours, Arc::new(()));
    let result = sphere.get_all_field_data().unwrap();

    let pentagons = result.values().filter(|&&v| v == 5).count();
    let hexagons = result.values().filter(|&&v| v == 6).count();
    check!(pentagons == 12);
    check!(hexagons == 150);

    sphere.shutdown().unwrap();
}

// --- Scenario S5: concurrent get_all_field_data during an in-flight frame ------------------------

#[test]
#[timeout(20000)]
fn scenario_s5_concurrent_reads_see_pre_and_post_frame_snapshots() {
    let d = 5;
    let sphere = Arc::new(Sphere::<i32>::create(SphereConfig::new(d), |_| 1).unwrap());

    let slow_increment: PerFieldFn<i32, ()> = Arc::new(|_idx, current, _adjacents, _data| {
        std::thread::sleep(std::time::Duration::from_millis(1));
        current + 1
    });

    let before = sphere.get_all_field_data().unwrap();
    check!(before.values().all(|&v| v == 1));

    let (tx, rx) = crossbeam_channel::bounded(1);
    sphere.start_frame(slow_increment, Arc::new(()), tx).unwrap();

    // The per-field function sleeps, so a read issued right after start_frame returns lands well
    // within panel computation, before any panel has had a chance to commit: it must see the
    // pre-frame snapshot exactly.
    let during = sphere.get_all_field_data().unwrap();
    check!(during == before);

    rx.recv().unwrap();
    let after = sphere.get_all_field_data().unwrap();
    check!(after.values().all(|&v| v == 2));
}

// --- Scenario S6: AlreadyInFrame, then the in-flight frame completes normally --------------------

#[test]
#[timeout(20000)]
fn scenario_s6_already_in_frame_then_completes_normally() {
    let d = 2;
    let sphere = Sphere::<i32>::create(SphereConfig::new(d), |_| 0).unwrap();
    let slow_increment: PerFieldFn<i32, ()> = Arc::new(|_idx, current, _adjacents, _data| {
        std::thread::sleep(std::time::Duration::from_millis(20));
        current + 1
    });

    let (tx1, rx1) = crossbeam_channel::bounded(1);
    sphere.start_frame(slow_increment.clone(), Arc::new(()), tx1).unwrap();

    let (tx2, _rx2) = crossbeam_channel::bounded(1);
    let second_attempt = sphere.start_frame(slow_increment, Arc::new(()), tx2);
    check!(matches!(second_attempt, Err(GeofError::AlreadyInFrame(_))));

    match rx1.recv().unwrap() {
        FrameOutcome::Complete { .. } => {}
        FrameOutcome::Failed { cause, .. } => panic!("unexpected failure: {cause}"),
        FrameOutcome::TimedOut { .. } => panic!("unexpected timeout"),
    }
    check!(sphere.get_all_field_data().unwrap().values().all(|&v| v == 1));

    sphere.shutdown().unwrap();
}
