//! Function references (§6.1) and the three built-in pattern frames: `highlight_icosahedron`,
//! `tetrahedron`, `octahedron`. These exist both as demo fixtures and as end-to-end test fixtures
//! (scenario S1 runs `tetrahedron` over a one-division sphere).


use std::sync::Arc;

use dashmap::DashMap;

use crate::field::Divisions;
use crate::geometry::Centroids;
use crate::shape::{classify_or_nearest, Polyhedron};
use crate::sphere::PerFieldFn;

/// An 8-bit RGB triple, the field-data type the built-in patterns operate on.
pub type Rgb = [u8; 3];

/// Sphere-wide data the built-in patterns need: each field's precomputed centroid, so a per-field
/// function (which only sees its own field's data and its neighbours') can still classify itself
/// against a polyhedron.
#[derive(Clone)]
pub struct PatternContext {
    pub divisions: Divisions,
    pub centroids: Arc<Centroids>,
}

const TETRAHEDRON_PALETTE: [Rgb; 5] = [
    [220, 50, 47],   // red
    [38, 139, 210],  // blue
    [133, 153, 0],   // green
    [181, 137, 0],   // yellow
    [108, 113, 196], // violet, reserved: unused by a 4-face classification, kept for palette parity
];

const OCTAHEDRON_PALETTE: [Rgb; 8] = [
    [220, 50, 47],
    [38, 139, 210],
    [133, 153, 0],
    [181, 137, 0],
    [108, 113, 196],
    [42, 161, 152],
    [211, 54, 130],
    [203, 75, 22],
];

const PENTAGON_COLOR: Rgb = [255, 215, 0];
const HEXAGON_COLOR: Rgb = [38, 38, 38];

fn classify_fn(polyhedron: Polyhedron, palette: &'static [Rgb]) -> PerFieldFn<Rgb, PatternContext> {
    Arc::new(move |field, _current, _adjacents, ctx: &PatternContext| {
        let position = ctx.centroids.get(field);
        let face = classify_or_nearest(position, polyhedron);
        palette[face]
    })
}

fn highlight_icosahedron_fn() -> PerFieldFn<Rgb, PatternContext> {
    Arc::new(|field, _current, _adjacents, ctx: &PatternContext| {
        if field.is_pentagonal(ctx.divisions) {
            PENTAGON_COLOR
        } else {
            HEXAGON_COLOR
        }
    })
}

/// A process-wide table resolving `(module, function)`-style names to typed per-field callables.
///
/// Mirrors the host code registry the source language resolves function references through:
/// unknown names fail explicitly (`UnknownFunctionRef`) rather than silently doing nothing.
pub struct FunctionRegistry<T, S> {
    functions: DashMap<&'static str, PerFieldFn<T, S>>,
}

impl<T, S> FunctionRegistry<T, S> {
    pub fn new() -> Self {
        Self { functions: DashMap::new() }
    }

    pub fn register(&self, name: &'static str, f: PerFieldFn<T, S>) {
        self.functions.insert(name, f);
    }

    pub fn resolve(&self, name: &str) -> Option<PerFieldFn<T, S>> {
        self.functions.get(name).map(|entry| entry.value().clone())
    }
}

impl<T, S> Default for FunctionRegistry<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry<Rgb, PatternContext> {
    /// A registry pre-populated with the three built-in pattern frames.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register("tetrahedron", classify_fn(Polyhedron::Tetrahedron, &TETRAHEDRON_PALETTE));
        registry.register("octahedron", classify_fn(Polyhedron::Octahedron, &OCTAHEDRON_PALETTE));
        registry.register("highlight_icosahedron", highlight_icosahedron_fn());
        registry
    }
}
