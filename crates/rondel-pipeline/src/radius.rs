//! Min/max radius: distance from a region's centroid to its boundary.

use crate::kernel::GeometryKernel;
use crate::regions::PixelSet;
use crate::types::RadiusError;

/// Compute the minimum and maximum Euclidean distance from the region's
/// centroid to its boundary-contour vertices.
///
/// Ties among equal distances are immaterial; any tied value is an
/// acceptable min or max.
///
/// # Errors
///
/// Returns [`RadiusError::EmptyContour`] if the kernel yields no
/// boundary vertices.
pub fn min_max_radius<K: GeometryKernel + ?Sized>(
    kernel: &K,
    pixels: &PixelSet,
) -> Result<(f64, f64), RadiusError> {
    let centroid = kernel.centroid(pixels);
    let vertices = kernel.contour(pixels)?;
    if vertices.is_empty() {
        return Err(RadiusError::EmptyContour);
    }

    let mut min = f64::INFINITY;
    let mut max = 0.0_f64;
    for vertex in &vertices {
        let distance = centroid.distance(*vertex);
        min = min.min(distance);
        max = max.max(distance);
    }
    Ok((min, max))
}
