use assert2::check;
use std::collections::HashSet;
use crate::field::FieldIndex;
use crate::geometry::Centroids;
use crate::iter::{field_count, FieldCursor};
use crate::panel::{choose_polyhedron, PanelAssignment};
use crate::shape::Polyhedron;

#[test]
fn chooses_octahedron_only_with_enough_parallelism() {
    check!(choose_polyhedron(1) == Polyhedron::Tetrahedron);
    check!(choose_polyhedron(7) == Polyhedron::Tetrahedron);
    check!(choose_polyhedron(8) == Polyhedron::Octahedron);
    check!(choose_polyhedron(32) == Polyhedron::Octahedron);
}

#[test]
fn partition_covers_every_field_exactly_once() {
    for d in [1, 2, 3, 8] {
        for polyhedron in [Polyhedron::Tetrahedron, Polyhedron::Octahedron] {
            let centroids = Centroids::compute(d);
            let assignment = PanelAssignment::build(d, &centroids, polyhedron);

            let mut seen = HashSet::new();
            for panel in 0..assignment.panel_count() {
                for &field in assignment.fields_of(panel) {
                    check!(seen.insert(field), "d={d}: field {field:?} assigned to more than one panel.");
                    check!(assignment.panel_of(field) == panel, "d={d}: panel_of should agree with fields_of.");
                }
            }

            check!(seen.len() == field_count(d), "d={d}: every field should be assigned to exactly one panel.");

            for idx in FieldCursor::new(d) {
                check!(seen.contains(&idx), "d={d}: {idx:?} missing from the partition.");
            }
        }
    }
}

#[test]
fn no_panel_is_empty() {
    for d in [1, 2, 3, 8] {
        for polyhedron in [Polyhedron::Tetrahedron, Polyhedron::Octahedron] {
            let centroids = Centroids::compute(d);
            let assignment = PanelAssignment::build(d, &centroids, polyhedron);

            for panel in 0..assignment.panel_count() {
                check!(!assignment.fields_of(panel).is_empty(), "d={d}, {polyhedron:?}: panel {panel} should not be empty.");
            }
        }
    }
}

#[test]
fn poles_are_always_assigned() {
    let centroids = Centroids::compute(2);
    let assignment = PanelAssignment::build(2, &centroids, Polyhedron::Octahedron);

    check!(assignment.panel_of(FieldIndex::North) < assignment.panel_count());
    check!(assignment.panel_of(FieldIndex::South) < assignment.panel_count());
}
