use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::ModuleConfig;

/// Physical mounting orientation of a tile module.
///
/// The orientation determines the direction the LED strip snakes through
/// the tile, and therefore the order its pixels appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Orientation {
    /// Footprint of a module on the floor, in floor cells. East and west
    /// mountings lie on their side, so width and height swap roles.
    pub fn footprint(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Orientation::North | Orientation::South => (width, height),
            Orientation::East | Orientation::West => (height, width),
        }
    }

    /// Traversal parameters for this orientation. A single parameterised
    /// walk replaces four near-duplicate loop nests; the exact orders are
    /// dictated by the physical wiring and must not change.
    fn traversal(self) -> Traversal {
        match self {
            // Row-major, left to right, top to bottom.
            Orientation::North => Traversal {
                outer_along_x: false,
                outer_reversed: false,
                inner_reversed: false,
            },
            Orientation::East => Traversal {
                outer_along_x: true,
                outer_reversed: false,
                inner_reversed: true,
            },
            Orientation::South => Traversal {
                outer_along_x: false,
                outer_reversed: true,
                inner_reversed: true,
            },
            Orientation::West => Traversal {
                outer_along_x: true,
                outer_reversed: true,
                inner_reversed: false,
            },
        }
    }
}

/// How one tile module is walked when assigning wire indices. The outer
/// range always spans the module's `height` cells and the inner range its
/// `width` cells; `outer_along_x` says which floor axis the outer range
/// runs along.
#[derive(Debug, Clone, Copy)]
struct Traversal {
    outer_along_x: bool,
    outer_reversed: bool,
    inner_reversed: bool,
}

/// A coordinate claimed by two modules while resolving the floor.
///
/// The later module (in name order) keeps the cell; the earlier index is
/// orphaned. Reported so the operator can fix the configuration, never
/// treated as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// Module whose assignment overwrote the cell.
    pub module: String,
    pub x: u32,
    pub y: u32,
    /// Wire index that previously occupied the cell.
    pub previous: u32,
    /// Wire index now stored in the cell.
    pub assigned: u32,
}

/// Outcome of resolving a module arrangement: the mapping itself plus any
/// non-fatal findings encountered on the way.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub layout: FloorLayout,
    pub collisions: Vec<Collision>,
}

/// Mapping from logical floor coordinates to wire indices.
///
/// `Some(i)` means the cell is the i-th pixel transmitted on the wire;
/// `None` means no tile populates the cell. Immutable once resolved — a
/// reconfiguration must rebuild the whole layout, since indices are
/// assigned order-dependently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorLayout {
    size_x: u32,
    size_y: u32,
    pixel_count: u32,
    mapping: Vec<Vec<Option<u32>>>,
}

/// Resolve the configured modules into a complete floor mapping.
///
/// Modules are processed in name order (the `BTreeMap` iteration order),
/// so wire indices never depend on how the configuration source happened
/// to order its entries. Overlapping assignments are recorded and the
/// later module wins.
pub fn resolve(modules: &BTreeMap<String, ModuleConfig>) -> Resolution {
    let (size_x, size_y) = floor_extent(modules);
    let mut mapping = vec![vec![None; size_y as usize]; size_x as usize];
    let mut collisions = Vec::new();
    let mut next_index = 0u32;

    for (name, module) in modules {
        for (x, y) in module_cells(module) {
            let cell = &mut mapping[x as usize][y as usize];
            if let Some(previous) = *cell {
                collisions.push(Collision {
                    module: name.clone(),
                    x,
                    y,
                    previous,
                    assigned: next_index,
                });
            }
            *cell = Some(next_index);
            next_index += 1;
        }
    }

    Resolution {
        layout: FloorLayout {
            size_x,
            size_y,
            pixel_count: next_index,
            mapping,
        },
        collisions,
    }
}

/// Total floor extent described by the modules: the furthest reach on
/// each axis, not the tile count. Gaps and overlaps are both legal here.
fn floor_extent(modules: &BTreeMap<String, ModuleConfig>) -> (u32, u32) {
    let mut x_extent = 0;
    let mut y_extent = 0;
    for module in modules.values() {
        let (w, h) = module.orientation.footprint(module.width, module.height);
        x_extent = x_extent.max(module.x_position + w);
        y_extent = y_extent.max(module.y_position + h);
    }
    (x_extent, y_extent)
}

/// Enumerate one module's cells in wiring order.
fn module_cells(module: &ModuleConfig) -> Vec<(u32, u32)> {
    let traversal = module.orientation.traversal();
    let (outer_start, inner_start) = if traversal.outer_along_x {
        (module.x_position, module.y_position)
    } else {
        (module.y_position, module.x_position)
    };

    let outer = axis_range(outer_start, module.height, traversal.outer_reversed);
    let inner = axis_range(inner_start, module.width, traversal.inner_reversed);

    let mut cells = Vec::with_capacity((module.width * module.height) as usize);
    for &o in &outer {
        for &i in &inner {
            let (x, y) = if traversal.outer_along_x { (o, i) } else { (i, o) };
            cells.push((x, y));
        }
    }
    cells
}

fn axis_range(start: u32, len: u32, reversed: bool) -> Vec<u32> {
    let mut values: Vec<u32> = (start..start + len).collect();
    if reversed {
        values.reverse();
    }
    values
}

impl FloorLayout {
    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Number of pixels transmitted per frame.
    pub fn pixel_count(&self) -> u32 {
        self.pixel_count
    }

    /// Wire index of the cell at (x, y), or `None` when the coordinate is
    /// out of range or no tile populates it.
    pub fn position_of(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size_x || y >= self.size_y {
            return None;
        }
        self.mapping[x as usize][y as usize]
    }

    /// Every populated cell as `(x, y, wire_index)`, in grid order.
    pub fn assigned_cells(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.mapping.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .filter_map(move |(y, cell)| cell.map(|index| (x as u32, y as u32, index)))
        })
    }

    /// Rotate the whole floor by `turns` quarter turns clockwise.
    ///
    /// Re-orients the mapping to account for the floor being physically
    /// rotated relative to the logical coordinate system client code
    /// draws in. Wire indices are never altered, only re-addressed.
    pub fn rotate(self, turns: u32) -> FloorLayout {
        let mut layout = self;
        for _ in 0..turns % 4 {
            layout = layout.rotate_once();
        }
        layout
    }

    // Classic 90 degree clockwise matrix rotation: transpose plus
    // reversed row order. Sizes swap on every step.
    fn rotate_once(self) -> FloorLayout {
        let FloorLayout {
            size_x,
            size_y,
            pixel_count,
            mapping,
        } = self;

        let mut rotated = vec![vec![None; size_x as usize]; size_y as usize];
        for (x, column) in rotated.iter_mut().enumerate() {
            for (y, cell) in column.iter_mut().enumerate() {
                *cell = mapping[size_x as usize - 1 - y][x];
            }
        }

        FloorLayout {
            size_x: size_y,
            size_y: size_x,
            pixel_count,
            mapping: rotated,
        }
    }

    /// Render the mapping as an aligned text grid, one row per floor row,
    /// unpopulated cells shown as dots. Meant for operator debugging when
    /// a floor lights up in the wrong order.
    pub fn render_map(&self) -> String {
        let mut out = String::new();
        for y in 0..self.size_y {
            for x in 0..self.size_x {
                match self.mapping[x as usize][y as usize] {
                    Some(index) => {
                        let _ = write!(out, "{index:>4} ");
                    }
                    None => out.push_str("   . "),
                }
            }
            out.push('\n');
        }
        out
    }
}
