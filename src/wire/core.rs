use crate::error::{FloorError, Result};
use crate::layout::FloorLayout;

/// Canonical transmission order for the floor: position `i` holds the
/// logical coordinate of the pixel with wire index `i`.
///
/// Derived data. Recomputed whenever the layout or rotation changes and
/// otherwise immutable, so it can be shared freely across frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireOrder {
    coords: Vec<(u32, u32)>,
}

impl WireOrder {
    /// Invert a resolved layout into wire-index order.
    ///
    /// Placement assigns consecutive indices, so every index below
    /// `pixel_count` should have exactly one cell. A missing index means
    /// the mapping lost an assignment (an overlapping tile swallowed it)
    /// and no transmission order exists; that is fatal.
    pub fn extract(layout: &FloorLayout) -> Result<Self> {
        let pixel_count = layout.pixel_count() as usize;
        let mut slots: Vec<Option<(u32, u32)>> = vec![None; pixel_count];
        for (x, y, index) in layout.assigned_cells() {
            slots[index as usize] = Some((x, y));
        }

        let mut coords = Vec::with_capacity(pixel_count);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(coord) => coords.push(coord),
                None => {
                    return Err(FloorError::WireOrderGap {
                        index: index as u32,
                        pixel_count: pixel_count as u32,
                    });
                }
            }
        }
        Ok(Self { coords })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.coords.iter().copied()
    }

    pub fn coords(&self) -> &[(u32, u32)] {
        &self.coords
    }
}
