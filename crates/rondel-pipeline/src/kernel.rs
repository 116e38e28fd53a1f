//! Geometry kernel: centroid and boundary-contour primitives.
//!
//! This module defines the [`GeometryKernel`] trait for pluggable
//! geometry backends and the default [`BorderKernel`] implementation.
//!
//! The kernel is constructed once per scan, before any region task is
//! handed to the worker pool, and shared by reference with all workers.
//! Kernels therefore hold no mutable state after construction.

use image::{GrayImage, Luma};

use crate::regions::{Connectivity, PixelSet};
use crate::types::{Point, RadiusError};

/// Trait for geometry backends.
///
/// Both operators take the label-free geometry of one region. The
/// connectivity the kernel assumes is exposed so region decomposition
/// can match it.
pub trait GeometryKernel: Sync {
    /// The connectivity rule this kernel's contour tracing assumes.
    fn connectivity(&self) -> Connectivity;

    /// The real-valued geometric center of a region.
    fn centroid(&self, pixels: &PixelSet) -> Point;

    /// The region's boundary polygon vertices.
    ///
    /// # Errors
    ///
    /// Returns [`RadiusError::EmptyContour`] if tracing yields no
    /// vertices.
    fn contour(&self, pixels: &PixelSet) -> Result<Vec<Point>, RadiusError>;
}

/// Default kernel: Suzuki-Abe border following via
/// `imageproc::contours::find_contours` over the region's rendered mask.
///
/// The raw border is a chain of every boundary pixel; collinear chain
/// points are pruned so straight edges contribute only their corner
/// vertices. A 3x3 square region therefore yields exactly its four
/// corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderKernel;

impl GeometryKernel for BorderKernel {
    fn connectivity(&self) -> Connectivity {
        // Suzuki-Abe follows 8-connected borders.
        Connectivity::Eight
    }

    #[allow(clippy::cast_precision_loss)]
    fn centroid(&self, pixels: &PixelSet) -> Point {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for &(x, y) in pixels.points() {
            sum_x += f64::from(x);
            sum_y += f64::from(y);
        }
        let count = pixels.len() as f64;
        Point::new(sum_x / count, sum_y / count)
    }

    fn contour(&self, pixels: &PixelSet) -> Result<Vec<Point>, RadiusError> {
        let (min_x, min_y, max_x, max_y) = pixels.bounds();

        // Render the region into a mask with a one-pixel background
        // border on every side.
        let mut mask = GrayImage::new(max_x - min_x + 3, max_y - min_y + 3);
        for &(x, y) in pixels.points() {
            mask.put_pixel(x - min_x + 1, y - min_y + 1, Luma([255]));
        }

        let contours: Vec<imageproc::contours::Contour<u32>> =
            imageproc::contours::find_contours(&mask);
        let outer = contours
            .into_iter()
            .filter(|c| matches!(c.border_type, imageproc::contours::BorderType::Outer))
            .max_by_key(|c| c.points.len())
            .ok_or(RadiusError::EmptyContour)?;

        // Map mask coordinates back into slice coordinates.
        let chain: Vec<Point> = outer
            .points
            .iter()
            .map(|p| {
                Point::new(
                    f64::from(p.x - 1 + min_x),
                    f64::from(p.y - 1 + min_y),
                )
            })
            .collect();

        let vertices = prune_collinear(&chain);
        if vertices.is_empty() {
            return Err(RadiusError::EmptyContour);
        }
        Ok(vertices)
    }
}

/// Remove chain points that are collinear with their closed-loop
/// neighbors, keeping only true polygon corners.
///
/// Chains shorter than three points, and fully collinear chains (a
/// one-pixel-wide line region traced out and back), are returned as-is.
fn prune_collinear(chain: &[Point]) -> Vec<Point> {
    let n = chain.len();
    if n < 3 {
        return chain.to_vec();
    }

    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let prev = chain[(i + n - 1) % n];
        let cur = chain[i];
        let next = chain[(i + 1) % n];
        let cross = (cur.x - prev.x) * (next.y - cur.y) - (cur.y - prev.y) * (next.x - cur.x);
        if cross.abs() > 1e-9 {
            corners.push(cur);
        }
    }

    if corners.is_empty() {
        chain.to_vec()
    } else {
        corners
    }
}
