//! Region decomposition: connected labeled components of a 2D slice.
//!
//! Flood-fill decomposition over the slice plane. The connectivity rule
//! is supplied by the geometry kernel so that decomposition and contour
//! tracing agree on what "connected" means.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::slicer::Slice;
use crate::types::Label;

/// Pixel connectivity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Edge-adjacent neighbors only.
    Four,
    /// Edge- and corner-adjacent neighbors.
    #[default]
    Eight,
}

impl Connectivity {
    /// Neighbor offsets for this rule.
    #[must_use]
    pub const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Four => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            Self::Eight => &[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ],
        }
    }
}

/// Label-free geometry of one region: its pixel positions in slice
/// coordinates, plus the bounding box.
///
/// Non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSet {
    points: Vec<(u32, u32)>,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl PixelSet {
    /// Build a pixel set from positions. Returns `None` for an empty set.
    #[must_use]
    pub fn new(points: Vec<(u32, u32)>) -> Option<Self> {
        let (&(first_x, first_y), rest) = points.split_first()?;
        let mut bounds = (first_x, first_y, first_x, first_y);
        for &(x, y) in rest {
            bounds.0 = bounds.0.min(x);
            bounds.1 = bounds.1.min(y);
            bounds.2 = bounds.2.max(x);
            bounds.3 = bounds.3.max(y);
        }
        Some(Self {
            points,
            min_x: bounds.0,
            min_y: bounds.1,
            max_x: bounds.2,
            max_y: bounds.3,
        })
    }

    /// Pixel positions, in no guaranteed order.
    #[must_use]
    pub fn points(&self) -> &[(u32, u32)] {
        &self.points
    }

    /// Number of pixels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: pixel sets are non-empty by construction.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box as `(min_x, min_y, max_x, max_y)`, inclusive.
    #[must_use]
    pub const fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Consumes the pixel set and returns the underlying positions.
    #[must_use]
    pub fn into_points(self) -> Vec<(u32, u32)> {
        self.points
    }
}

/// A set of positions sharing a label within a slice.
///
/// [`decompose`] produces one connected component per region;
/// [`merge_by_label`] may unify several components into one region
/// whose pixel set is disconnected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<L> {
    /// The shared label value.
    pub label: L,
    /// The component's geometry.
    pub pixels: PixelSet,
}

/// Extract every connected labeled region in a slice.
///
/// Positions holding the background label belong to no region. The
/// enumeration order of the returned regions is not part of the
/// contract; identities derive from label and slice index only.
#[must_use]
pub fn decompose<L: Label>(
    slice: &Slice<'_, L>,
    background: &L,
    connectivity: Connectivity,
) -> Vec<Region<L>> {
    let (width, height) = slice.plane.dim();
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        log::error!("slice {} exceeds the supported plane extent", slice.index);
        return Vec::new();
    };

    let mut visited = vec![false; width * height];
    let mut regions = Vec::new();
    let at = |x: u32, y: u32| (y as usize) * width + x as usize;

    for start_y in 0..h {
        for start_x in 0..w {
            if visited[at(start_x, start_y)] {
                continue;
            }
            let label = &slice.plane[[start_x as usize, start_y as usize]];
            if label == background {
                continue;
            }

            // Flood fill the component containing (start_x, start_y).
            let mut points = Vec::new();
            let mut stack = vec![(start_x, start_y)];
            visited[at(start_x, start_y)] = true;
            while let Some((x, y)) = stack.pop() {
                points.push((x, y));
                for &(dx, dy) in connectivity.offsets() {
                    let Some(nx) = x.checked_add_signed(dx) else {
                        continue;
                    };
                    let Some(ny) = y.checked_add_signed(dy) else {
                        continue;
                    };
                    if nx >= w || ny >= h || visited[at(nx, ny)] {
                        continue;
                    }
                    if &slice.plane[[nx as usize, ny as usize]] == label {
                        visited[at(nx, ny)] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if let Some(pixels) = PixelSet::new(points) {
                regions.push(Region {
                    label: label.clone(),
                    pixels,
                });
            }
        }
    }

    regions
}

/// Merge regions sharing a label within one slice into a single region
/// per label.
///
/// Output identities derive from `(label, slice index)` alone, so every
/// occurrence of a label in a slice must map to exactly one region for
/// row keys to stay unique. The merged pixel set may be disconnected.
#[must_use]
pub fn merge_by_label<L: Label>(regions: Vec<Region<L>>) -> Vec<Region<L>> {
    let mut by_label: HashMap<L, Vec<(u32, u32)>> = HashMap::new();
    for region in regions {
        by_label
            .entry(region.label)
            .or_default()
            .extend(region.pixels.into_points());
    }
    by_label
        .into_iter()
        .filter_map(|(label, points)| {
            PixelSet::new(points).map(|pixels| Region { label, pixels })
        })
        .collect()
}
