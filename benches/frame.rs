use std::sync::Arc;

use geof::{Sphere, SphereConfig};

fn main() {
    divan::main();
}

#[divan::bench(args = [1, 2, 4, 8])]
fn one_frame(d: u32) {
    let sphere = Sphere::<u32>::create(SphereConfig::new(d), |_field| 0).unwrap();

    let increment: geof::PerFieldFn<u32, ()> = Arc::new(|_field, current, _adjacents, _data| current + 1);
    let (done_tx, done_rx) = crossbeam_channel::bounded(1);

    sphere.start_frame(increment, Arc::new(()), done_tx).unwrap();
    done_rx.recv().unwrap();

    sphere.shutdown().unwrap();
}
