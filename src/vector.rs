//! Pure numeric primitives on 3-vectors, plus the line/triangle intersection test the panel
//! partitioner (`panel.rs`) builds on. Thin wrappers around [`glam::Vec3`]; GEOF doesn't need its
//! own vector type, just a couple of predicates glam doesn't ship.


use glam::Vec3;

/// Ray from `a` through `b` and beyond. Unlike a line, direction matters: a triangle behind `a`
/// (on the far side from `b`) does not count as a crossing.
#[derive(Copy, Clone, Debug)]
pub struct Line {
    pub a: Vec3,
    pub b: Vec3,
}

impl Line {
    pub const fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }
}

/// Triangle given by three vertices in no particular winding order (classification only cares
/// about containment, not orientation).
#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl Triangle {
    pub const fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self { p0, p1, p2 }
    }

    /// Unit-sphere centroid of this triangle's three vertices.
    pub fn centroid(&self) -> Vec3 {
        ((self.p0 + self.p1 + self.p2) / 3.0).normalize()
    }
}

/// Tests whether the ray from `line.a` through `line.b` crosses `triangle`.
///
/// Only the forward direction counts: the parameter `t` such that `line.a + t * (line.b - line.a)`
/// lands on the triangle must be non-negative. This is what lets `classify` tell apart a centrally
/// symmetric polyhedron's antipodal face pairs, which a true infinite-line test cannot.
pub fn line_triangle_intersect(line: Line, triangle: Triangle) -> bool {
    ray_parameter(line, triangle).is_some()
}

/// Same crossing test as [`line_triangle_intersect`], returning the ray parameter `t` at the hit.
fn ray_parameter(line: Line, triangle: Triangle) -> Option<f32> {
    let e1 = triangle.p1 - triangle.p0;
    let e2 = triangle.p2 - triangle.p0;
    let dir = line.b - line.a;
    let h = dir.cross(e2);
    let det = e1.dot(h);

    if det == 0.0 {
        return None;
    }

    let s = line.a - triangle.p0;
    let u = s.dot(h) / det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = dir.dot(q) / det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) / det;
    (t >= 0.0).then_some(t)
}
