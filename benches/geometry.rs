use geof::geometry::Centroids;

fn main() {
    divan::main();
}

#[divan::bench(args = [1, 2, 4, 8, 16, 32])]
fn relax_centroids(d: u32) {
    Centroids::compute(d);
}
