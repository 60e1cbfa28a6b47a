//! Field identity and adjacency (components B and C): the `Sxy` coordinate scheme, the six
//! directional neighbours of a field, and the flattening to a dense `usize` index.


use crate::error::GeofError;

/// Number of edge subdivisions of each icosahedral edge. Immutable per sphere.
pub type Divisions = u32;

/// Identity of one field of the tiling: either pole, or a `(section, x, y)` triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldIndex {
    North,
    South,
    /// `section ∈ 0..5`, `x ∈ 0..2·divisions`, `y ∈ 0..divisions`.
    Sxy(u8, u32, u32),
}

impl FieldIndex {
    pub const fn sxy(section: u8, x: u32, y: u32) -> Self {
        Self::Sxy(section, x, y)
    }

    /// `true` for the 12 fields with only 5 neighbours (the icosahedron's original vertices).
    pub fn is_pentagonal(self, d: Divisions) -> bool {
        match self {
            FieldIndex::North | FieldIndex::South => true,
            FieldIndex::Sxy(_, x, y) => is_pent(x, y, d),
        }
    }

    /// Returns `Err` if `x`/`y`/`section` fall outside the ranges valid for `d`.
    pub fn validate(self, d: Divisions) -> Result<(), GeofError> {
        match self {
            FieldIndex::North | FieldIndex::South => Ok(()),
            FieldIndex::Sxy(s, x, y) => {
                if s < 5 && x < 2 * d && y < d {
                    Ok(())
                } else {
                    Err(GeofError::InvalidDivisions(d))
                }
            }
        }
    }
}

const fn is_pent(x: u32, y: u32, d: Divisions) -> bool {
    y == 0 && (x + 1) % d == 0
}

/// One of the six directions a field can have a neighbour in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Nw,
    W,
    Sw,
    Se,
    E,
    Ne,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Nw,
        Direction::W,
        Direction::Sw,
        Direction::Se,
        Direction::E,
        Direction::Ne,
    ];
}

/// The up-to-six neighbours of a field. `nw`, `w`, `sw`, `se`, `e` are always present; `ne` is
/// absent exactly for pentagonal fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    pub nw: FieldIndex,
    pub w: FieldIndex,
    pub sw: FieldIndex,
    pub se: FieldIndex,
    pub e: FieldIndex,
    pub ne: Option<FieldIndex>,
}

impl Adjacency {
    pub fn get(&self, dir: Direction) -> Option<FieldIndex> {
        match dir {
            Direction::Nw => Some(self.nw),
            Direction::W => Some(self.w),
            Direction::Sw => Some(self.sw),
            Direction::Se => Some(self.se),
            Direction::E => Some(self.e),
            Direction::Ne => self.ne,
        }
    }

    /// Iterates over the present `(direction, neighbour)` pairs, skipping absent `ne`.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, FieldIndex)> + '_ {
        Direction::ALL.into_iter().filter_map(move |dir| self.get(dir).map(|f| (dir, f)))
    }
}

/// Computes the adjacency record of `idx` on a sphere with `d` divisions.
///
/// See the field-index-and-adjacency component of the design for the derivation of each slot;
/// this is a direct transcription of that table, first matching row per slot wins.
pub fn adjacency(idx: FieldIndex, d: Divisions) -> Adjacency {
    match idx {
        FieldIndex::North => {
            let ring = |k: u8| FieldIndex::Sxy(k, 0, 0);
            Adjacency {
                nw: ring(0),
                w: ring(1),
                sw: ring(2),
                se: ring(3),
                e: ring(4),
                ne: None,
            }
        }
        FieldIndex::South => {
            let max_x = 2 * d - 1;
            let max_y = d - 1;
            let ring = |k: u8| FieldIndex::Sxy(k, max_x, max_y);
            Adjacency {
                nw: ring(0),
                w: ring(1),
                sw: ring(2),
                se: ring(3),
                e: ring(4),
                ne: None,
            }
        }
        FieldIndex::Sxy(s, x, y) => sxy_adjacency(s, x, y, d),
    }
}

fn sxy_adjacency(s: u8, x: u32, y: u32, d: Divisions) -> Adjacency {
    let max_x = 2 * d - 1;
    let max_y = d - 1;
    let next_s = (s + 1) % 5;
    let prev_s = (s + 4) % 5;
    let pent = is_pent(x, y, d);
    let sxy = FieldIndex::Sxy;

    let nw = if x > 0 {
        sxy(s, x - 1, y)
    } else if y == 0 {
        FieldIndex::North
    } else {
        sxy(prev_s, y - 1, 0)
    };

    let w = if x == 0 {
        sxy(prev_s, y, 0)
    } else if y == max_y && x > d {
        sxy(prev_s, max_x, x - d)
    } else if y == max_y {
        sxy(prev_s, x + d - 1, 0)
    } else {
        sxy(s, x - 1, y + 1)
    };

    let sw = if y < max_y {
        sxy(s, x, y + 1)
    } else if x == max_x && y == max_y {
        FieldIndex::South
    } else if x >= d {
        sxy(prev_s, max_x, x - d + 1)
    } else {
        sxy(prev_s, x + d, 0)
    };

    let se = if pent && x == d - 1 {
        sxy(s, x + 1, 0)
    } else if pent && x == max_x {
        sxy(next_s, d, max_y)
    } else if x == max_x {
        sxy(next_s, y + d, max_y)
    } else {
        sxy(s, x + 1, y)
    };

    let e = if pent && x == d - 1 {
        sxy(next_s, 0, max_y)
    } else if pent && x == max_x {
        sxy(next_s, d - 1, max_y)
    } else if x == max_x {
        sxy(next_s, y + d - 1, max_y)
    } else if y == 0 && x < d {
        sxy(next_s, 0, x + 1)
    } else if y == 0 {
        sxy(next_s, x - d + 1, max_y)
    } else {
        sxy(s, x + 1, y - 1)
    };

    let ne = if pent {
        None
    } else if y > 0 {
        Some(sxy(s, x, y - 1))
    } else if y == 0 && x < d {
        Some(sxy(next_s, 0, x))
    } else {
        Some(sxy(next_s, x - d, max_y))
    };

    Adjacency { nw, w, sw, se, e, ne }
}
