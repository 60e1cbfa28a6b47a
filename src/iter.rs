//! Enumerates every field of a sphere exactly once, and flattens a [`FieldIndex`] to a dense
//! `usize` in `[0, 10·d² + 2)` (component C).


use crate::field::{Divisions, FieldIndex};

/// Total number of fields on a sphere with `d` divisions.
pub const fn field_count(d: Divisions) -> usize {
    10 * (d as usize) * (d as usize) + 2
}

/// Deterministic total order over every field of a `d`-division sphere: `North`, `South`, then
/// every `Sxy(s, x, y)` with `s` outermost and `y` innermost.
pub struct FieldCursor {
    d: Divisions,
    next: Option<FieldIndex>,
}

impl FieldCursor {
    pub fn new(d: Divisions) -> Self {
        Self { d, next: Some(FieldIndex::North) }
    }
}

impl Iterator for FieldCursor {
    type Item = FieldIndex;

    fn next(&mut self) -> Option<FieldIndex> {
        let current = self.next?;

        self.next = match current {
            FieldIndex::North => Some(FieldIndex::South),
            FieldIndex::South => {
                if self.d == 0 {
                    None
                } else {
                    Some(FieldIndex::Sxy(0, 0, 0))
                }
            }
            FieldIndex::Sxy(s, x, y) => {
                let max_x = 2 * self.d - 1;
                let max_y = self.d - 1;

                if y < max_y {
                    Some(FieldIndex::Sxy(s, x, y + 1))
                } else if x < max_x {
                    Some(FieldIndex::Sxy(s, x + 1, 0))
                } else if s < 4 {
                    Some(FieldIndex::Sxy(s + 1, 0, 0))
                } else {
                    None
                }
            }
        };

        Some(current)
    }
}

/// Visits every field of a `d`-division sphere exactly once, folding `f` over an accumulator.
/// Visit order matches [`FieldCursor`] and is deterministic across calls.
pub fn for_all_fields<A>(d: Divisions, init: A, mut f: impl FnMut(A, FieldIndex) -> A) -> A {
    FieldCursor::new(d).fold(init, |acc, idx| f(acc, idx))
}

/// Maps a field to its dense index in `[0, field_count(d))`.
pub fn flatten(idx: FieldIndex, d: Divisions) -> usize {
    match idx {
        FieldIndex::North => 0,
        FieldIndex::South => 1,
        FieldIndex::Sxy(s, x, y) => {
            let d = d as usize;
            (s as usize) * 2 * d * d + (x as usize) * d + (y as usize) + 2
        }
    }
}

/// Inverse of [`flatten`]: recovers the field whose dense index is `i` on a `d`-division sphere.
///
/// Not part of the spec's external surface, but every component that stores per-field state in a
/// flat `Vec` (panels, patterns) needs it to go the other way.
pub fn unflatten(i: usize, d: Divisions) -> FieldIndex {
    match i {
        0 => FieldIndex::North,
        1 => FieldIndex::South,
        i => {
            let d = d as usize;
            let rest = i - 2;
            let s = rest / (2 * d * d);
            let rem = rest % (2 * d * d);
            let x = rem / d;
            let y = rem % d;
            FieldIndex::Sxy(s as u8, x as u32, y as u32)
        }
    }
}
