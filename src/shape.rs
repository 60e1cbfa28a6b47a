//! Classifies a unit-sphere point onto a face of a regular tetrahedron or octahedron. Used by the
//! panel partitioner (`panel.rs`) to turn a field's centroid into a panel index.


use glam::Vec3;
use crate::vector::{line_triangle_intersect, Line, Triangle};

/// Either of the two polyhedra the partitioner can classify against, named by their face count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polyhedron {
    Tetrahedron,
    Octahedron,
}

impl Polyhedron {
    pub const fn face_count(self) -> usize {
        match self {
            Polyhedron::Tetrahedron => 4,
            Polyhedron::Octahedron => 8,
        }
    }

    fn faces(self) -> Vec<Triangle> {
        match self {
            Polyhedron::Tetrahedron => tetrahedron_faces(),
            Polyhedron::Octahedron => octahedron_faces(),
        }
    }
}

// Regular tetrahedron inscribed in the unit sphere, vertices at alternating cube corners.
fn tetrahedron_vertices() -> [Vec3; 4] {
    [
        Vec3::new(1.0, 1.0, 1.0).normalize(),
        Vec3::new(1.0, -1.0, -1.0).normalize(),
        Vec3::new(-1.0, 1.0, -1.0).normalize(),
        Vec3::new(-1.0, -1.0, 1.0).normalize(),
    ]
}

fn tetrahedron_faces() -> Vec<Triangle> {
    let v = tetrahedron_vertices();
    vec![
        Triangle::new(v[1], v[2], v[3]),
        Triangle::new(v[0], v[3], v[2]),
        Triangle::new(v[0], v[1], v[3]),
        Triangle::new(v[0], v[2], v[1]),
    ]
}

// Regular octahedron: the six signed unit axes.
fn octahedron_vertices() -> [Vec3; 6] {
    [
        Vec3::X, Vec3::NEG_X,
        Vec3::Y, Vec3::NEG_Y,
        Vec3::Z, Vec3::NEG_Z,
    ]
}

fn octahedron_faces() -> Vec<Triangle> {
    let [px, nx, py, ny, pz, nz] = octahedron_vertices();
    vec![
        Triangle::new(px, py, pz),
        Triangle::new(px, pz, ny),
        Triangle::new(px, ny, nz),
        Triangle::new(px, nz, py),
        Triangle::new(nx, pz, py),
        Triangle::new(nx, ny, pz),
        Triangle::new(nx, nz, ny),
        Triangle::new(nx, py, nz),
    ]
}

/// Classifies `point` (expected to lie on or near the unit sphere) onto a face of `polyhedron`.
///
/// Tests the ray from the origin through `point` against each face in a fixed order, returning
/// the index of the first face it crosses. The ray, not the infinite line, is what's tested: for
/// a centrally symmetric polyhedron like the octahedron, every point's antipodal face also lies
/// on the same line, and only gating on the forward direction keeps the two from being confused.
/// Returns `None` if `point` crosses no face at all, which is unreachable for points that are
/// exactly on the unit sphere but can happen under floating-point drift for points very close to
/// a shared edge.
pub fn classify(point: Vec3, polyhedron: Polyhedron) -> Option<usize> {
    let line = Line::new(Vec3::ZERO, point);

    polyhedron.faces()
        .into_iter()
        .position(|face| line_triangle_intersect(line, face))
}

/// [`classify`] with the fallback the spec's open question calls for: when strict classification
/// misses every face, fall back to whichever face's centroid is angularly nearest `point`. Always
/// returns a definite index, never an unassigned field.
pub fn classify_or_nearest(point: Vec3, polyhedron: Polyhedron) -> usize {
    if let Some(face) = classify(point, polyhedron) {
        return face;
    }

    polyhedron.faces()
        .into_iter()
        .map(|face| face.centroid())
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = a.dot(point);
            let db = b.dot(point);
            db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .expect("a polyhedron always has at least one face")
}
