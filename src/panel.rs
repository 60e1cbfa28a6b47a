//! Panel partitioner (component E): assigns every field to a panel by classifying its centroid
//! against a tetrahedron or octahedron, chosen from available hardware parallelism.

#[cfg(test)]
mod tests;

use crate::field::{Divisions, FieldIndex};
use crate::geometry::Centroids;
use crate::iter::{field_count, flatten};
use crate::shape::{classify_or_nearest, Polyhedron};

/// `N ∈ {4, 8}`: tetrahedron if fewer than 8 worker threads are available, else octahedron.
pub fn choose_polyhedron(available_parallelism: usize) -> Polyhedron {
    if available_parallelism >= 8 {
        Polyhedron::Octahedron
    } else {
        Polyhedron::Tetrahedron
    }
}

/// A disjoint assignment of every field of a `d`-division sphere to one of `panel_count` panels.
#[derive(Clone, Debug)]
pub struct PanelAssignment {
    d: Divisions,
    /// Panel index of field `i`, indexed by [`flatten`].
    panel_of: Vec<usize>,
    /// Fields owned by each panel, indexed by panel index.
    fields_of: Vec<Vec<FieldIndex>>,
}

impl PanelAssignment {
    pub fn build(d: Divisions, centroids: &Centroids, polyhedron: Polyhedron) -> Self {
        let mut panel_of = vec![0usize; field_count(d)];
        let mut fields_of = vec![Vec::new(); polyhedron.face_count()];

        for (idx, position) in centroids.iter() {
            let panel = classify_or_nearest(position, polyhedron);
            panel_of[flatten(idx, d)] = panel;
            fields_of[panel].push(idx);
        }

        Self { d, panel_of, fields_of }
    }

    pub fn panel_count(&self) -> usize {
        self.fields_of.len()
    }

    pub fn panel_of(&self, idx: FieldIndex) -> usize {
        self.panel_of[flatten(idx, self.d)]
    }

    pub fn fields_of(&self, panel: usize) -> &[FieldIndex] {
        &self.fields_of[panel]
    }
}
