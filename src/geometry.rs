//! Centroid geometry (component D): the unit-sphere position of every field, derived once at
//! sphere creation and held immutable afterwards.
//!
//! The spec leaves the derivation open as long as adjacent fields land nearer each other than
//! non-adjacent ones. Rather than re-deriving which icosahedral face each `Sxy` cell belongs to,
//! centroids are seeded at a deterministic longitude/colatitude guess and then relaxed directly
//! against the adjacency graph: each round replaces every field's position with the spherical
//! (Karcher) mean of its neighbours from the previous round. That satisfies the "nearer than
//! non-adjacent" requirement by construction.

#[cfg(test)]
mod tests;

use glam::Vec3;
use crate::field::{adjacency, Divisions, FieldIndex};
use crate::interpolation::slerp::slerp_weighted;
use crate::iter::{flatten, for_all_fields, field_count};

const RELAXATION_ROUNDS: u32 = 40;

/// Unit-sphere centroid of every field of a `d`-division sphere, indexed by [`flatten`].
#[derive(Clone, Debug)]
pub struct Centroids {
    d: Divisions,
    positions: Vec<Vec3>,
}

impl Centroids {
    pub fn compute(d: Divisions) -> Self {
        let mut positions = seed_positions(d);
        let neighbours = neighbour_indices(d);

        // Double-buffered relaxation: every round reads only the previous round's `positions` and
        // writes into `next`, so one round never observes another round's partial results.
        for _ in 0..RELAXATION_ROUNDS {
            let mut next = positions.clone();

            for (i, neighbours_i) in neighbours.iter().enumerate() {
                if neighbours_i.is_empty() {
                    continue;
                }
                let weight = 1.0 / neighbours_i.len() as f32;
                let weights = vec![weight; neighbours_i.len()];
                let points: Vec<Vec3> = neighbours_i.iter().map(|&n| positions[n]).collect();
                next[i] = slerp_weighted(&weights, &points);
            }

            positions = next;
        }

        Self { d, positions }
    }

    pub fn get(&self, idx: FieldIndex) -> Vec3 {
        self.positions[flatten(idx, self.d)]
    }

    pub fn divisions(&self) -> Divisions {
        self.d
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldIndex, Vec3)> + '_ {
        for_all_fields(self.d, Vec::new(), |mut acc, idx| {
            acc.push(idx);
            acc
        })
        .into_iter()
        .map(move |idx| (idx, self.get(idx)))
    }
}

fn neighbour_indices(d: Divisions) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new(); field_count(d)];

    for_all_fields(d, (), |_, idx| {
        let i = flatten(idx, d);
        out[i] = adjacency(idx, d).iter().map(|(_, n)| flatten(n, d)).collect();
    });

    out
}

// North and south pin the poles; everything else starts from a longitude derived from its
// section and x-offset, and a colatitude derived from how far (x, y) has progressed from the
// pole-adjacent edge of its section towards the pole-adjacent edge of the next one.
fn seed_positions(d: Divisions) -> Vec<Vec3> {
    let mut positions = vec![Vec3::ZERO; field_count(d)];
    let max_x = (2 * d - 1) as f32;
    let max_y = (d - 1).max(1) as f32;

    for_all_fields(d, (), |_, idx| {
        let i = flatten(idx, d);
        positions[i] = match idx {
            FieldIndex::North => Vec3::new(0.0, 1.0, 0.0),
            FieldIndex::South => Vec3::new(0.0, -1.0, 0.0),
            FieldIndex::Sxy(s, x, y) => {
                let longitude = (s as f32 + x as f32 / (2.0 * d as f32)) * std::f32::consts::TAU / 5.0;
                let progress = ((x as f32 / max_x) + (y as f32 / max_y)) / 2.0;
                let colatitude = progress.clamp(0.0, 1.0) * std::f32::consts::PI;

                let radius = colatitude.sin();
                Vec3::new(radius * longitude.cos(), colatitude.cos(), radius * longitude.sin())
            }
        };
    });

    positions
}
