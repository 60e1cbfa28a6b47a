use assert2::check;
use crate::field::{adjacency, FieldIndex};
use crate::geometry::Centroids;
use crate::iter::FieldCursor;

#[test]
fn centroids_lie_on_the_unit_sphere() {
    for d in [1, 2, 3] {
        let centroids = Centroids::compute(d);

        for idx in FieldCursor::new(d) {
            let length = centroids.get(idx).length();
            check!((length - 1.0).abs() <= 1.0e-3, "d={d}: centroid of {idx:?} should have unit length, got {length}.");
        }
    }
}

#[test]
fn poles_stay_near_the_y_axis() {
    let centroids = Centroids::compute(3);

    check!(centroids.get(FieldIndex::North).y > 0.9, "North should remain close to (0, 1, 0).");
    check!(centroids.get(FieldIndex::South).y < -0.9, "South should remain close to (0, -1, 0).");
}

#[test]
fn adjacent_fields_are_nearer_than_a_distant_field() {
    let d = 3;
    let centroids = Centroids::compute(d);

    for idx in FieldCursor::new(d) {
        let here = centroids.get(idx);
        let adj = adjacency(idx, d);

        let farthest_neighbour = adj.iter()
            .map(|(_, n)| here.distance(centroids.get(n)))
            .fold(0.0f32, f32::max);

        // South is never adjacent to North, and is the most distant field on the sphere from it.
        let unrelated = if matches!(idx, FieldIndex::North) {
            FieldIndex::South
        } else {
            FieldIndex::North
        };
        let unrelated_distance = here.distance(centroids.get(unrelated));

        check!(
            farthest_neighbour < unrelated_distance + 1.0e-3,
            "d={d}: {idx:?}'s farthest neighbour ({farthest_neighbour}) should not be farther than its distance to the opposite pole ({unrelated_distance})."
        );
    }
}
