use geof::field::adjacency;
use geof::iter::FieldCursor;

fn main() {
    divan::main();
}

#[divan::bench(args = [1, 2, 4, 8, 16, 32])]
fn adjacency_of_every_field(d: u32) {
    for idx in FieldCursor::new(d) {
        adjacency(idx, d);
    }
}
