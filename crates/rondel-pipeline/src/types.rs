//! Shared types for the rondel scan pipeline.

use std::fmt;
use std::hash::Hash;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// A 2D point in slice coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Position along the first selected axis.
    pub x: f64,
    /// Position along the second selected axis.
    pub y: f64,
}

impl Point {
    /// Construct a point from slice coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to `other`, in slice units.
    ///
    /// Cheaper than [`distance`](Self::distance) when only comparing
    /// magnitudes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to `other`; this is the radius when `self`
    /// is a centroid and `other` a boundary vertex.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Capability bound for region labels.
///
/// Labels are comparable and displayable but not necessarily numeric;
/// any type meeting these bounds works (`u32`, `char`, `String`, ...).
/// `Send + Sync` is required because region tasks cross worker threads.
pub trait Label: Clone + Eq + Hash + fmt::Display + Send + Sync {}

impl<T: Clone + Eq + Hash + fmt::Display + Send + Sync> Label for T {}

/// Semantic tag of a volume axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisTag {
    /// First spatial axis.
    X,
    /// Second spatial axis.
    Y,
    /// Third spatial axis.
    Z,
    /// Time axis.
    Time,
    /// Channel axis.
    Channel,
}

impl fmt::Display for AxisTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Time => "Time",
            Self::Channel => "Channel",
        };
        f.write_str(name)
    }
}

/// Ordered pair of axis tags identifying the slicing plane.
///
/// The first tag maps to the slice `x` axis and the second to `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    /// Axis mapped to slice `x`.
    pub first: AxisTag,
    /// Axis mapped to slice `y`.
    pub second: AxisTag,
}

impl AxisSelection {
    /// Create a new axis selection.
    #[must_use]
    pub const fn new(first: AxisTag, second: AxisTag) -> Self {
        Self { first, second }
    }

    /// Check that the selection names two distinct axes.
    ///
    /// This catches selections that can never resolve to a 2D plane
    /// before any row is read. Resolution against a concrete volume's
    /// axis metadata happens later, in the slicer.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Configuration`] if both tags are equal.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.first == self.second {
            return Err(ScanError::Configuration(format!(
                "axis selection must name two distinct axes, got {} twice",
                self.first
            )));
        }
        Ok(())
    }
}

impl Default for AxisSelection {
    fn default() -> Self {
        Self::new(AxisTag::X, AxisTag::Y)
    }
}

/// Configuration for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Which two axes to slice along.
    pub axis_selection: AxisSelection,

    /// Number of worker threads for region tasks (0 = one per logical CPU).
    pub worker_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            axis_selection: AxisSelection::default(),
            worker_threads: 0,
        }
    }
}

/// An n-dimensional labeled volume with axis metadata.
///
/// Each position holds a label identifying which object it belongs to;
/// positions holding the background label belong to no object. Immutable
/// once constructed.
#[derive(Debug, Clone)]
pub struct LabeledVolume<L> {
    data: ArrayD<L>,
    axes: Vec<AxisTag>,
    background: L,
}

impl<L: Label> LabeledVolume<L> {
    /// Create a labeled volume from label data, axis metadata, and the
    /// background label value.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Configuration`] if the number of axis tags
    /// does not match the array rank, or if an axis tag repeats.
    pub fn new(data: ArrayD<L>, axes: Vec<AxisTag>, background: L) -> Result<Self, ScanError> {
        if axes.len() != data.ndim() {
            return Err(ScanError::Configuration(format!(
                "volume has {} dimensions but {} axis tags",
                data.ndim(),
                axes.len()
            )));
        }
        for (i, tag) in axes.iter().enumerate() {
            if axes[..i].contains(tag) {
                return Err(ScanError::Configuration(format!(
                    "axis tag {tag} appears more than once"
                )));
            }
        }
        Ok(Self {
            data,
            axes,
            background,
        })
    }

    /// The underlying label array.
    #[must_use]
    pub const fn data(&self) -> &ArrayD<L> {
        &self.data
    }

    /// Axis tags, in array-dimension order.
    #[must_use]
    pub fn axes(&self) -> &[AxisTag] {
        &self.axes
    }

    /// The background label value.
    #[must_use]
    pub const fn background(&self) -> &L {
        &self.background
    }

    /// Resolve an axis tag to its array-dimension index.
    #[must_use]
    pub fn axis_index(&self, tag: AxisTag) -> Option<usize> {
        self.axes.iter().position(|&a| a == tag)
    }
}

/// Result of one region-slice radius computation.
///
/// `identity` is unique within the owning input row: slice index
/// disambiguates the same label appearing in several slices.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusResult {
    /// `"Region<label>_Slice<slice index>"`.
    pub identity: String,
    /// Minimum centroid-to-boundary distance.
    pub min_radius: f64,
    /// Maximum centroid-to-boundary distance.
    pub max_radius: f64,
}

/// One output table row: a key plus the two radius columns, or the
/// missing-value sentinel pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    /// Unique row key, prefixed by the owning input row's key.
    pub key: String,
    /// Minimum radius, or `None` for the missing sentinel.
    pub min_radius: Option<f64>,
    /// Maximum radius, or `None` for the missing sentinel.
    pub max_radius: Option<f64>,
}

impl OutputRow {
    /// A row carrying computed values.
    #[must_use]
    pub const fn values(key: String, min_radius: f64, max_radius: f64) -> Self {
        Self {
            key,
            min_radius: Some(min_radius),
            max_radius: Some(max_radius),
        }
    }

    /// A row with both values marked missing.
    #[must_use]
    pub const fn missing(key: String) -> Self {
        Self {
            key,
            min_radius: None,
            max_radius: None,
        }
    }

    /// Returns `true` if both values are the missing sentinel.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.min_radius.is_none() && self.max_radius.is_none()
    }
}

/// Output column names, fixed for host-table compatibility.
pub const OUTPUT_COLUMNS: [&str; 2] = ["Min Radius", "Max Radius"];

/// Fatal scan-level errors.
///
/// Everything else (missing cells, per-task computation failures) is
/// recovered locally and logged; these two abort the scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Axis selection, volume metadata, or worker-pool setup is invalid.
    #[error("invalid scan configuration: {0}")]
    Configuration(String),

    /// Cancellation observed at a row boundary.
    #[error("scan canceled")]
    Canceled,
}

impl From<Canceled> for ScanError {
    fn from(_: Canceled) -> Self {
        Self::Canceled
    }
}

/// Marker error reported by a [`ScanMonitor`](crate::driver::ScanMonitor)
/// when the scan should stop.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("scan canceled")]
pub struct Canceled;

/// Recoverable per-task errors.
///
/// A task failing with one of these drops its result only; the rest of
/// the row is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum RadiusError {
    /// The region's boundary produced no vertices.
    #[error("region boundary produced no vertices")]
    EmptyContour,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn axis_selection_default_is_x_y() {
        let sel = AxisSelection::default();
        assert_eq!(sel.first, AxisTag::X);
        assert_eq!(sel.second, AxisTag::Y);
        assert!(sel.validate().is_ok());
    }

    #[test]
    fn axis_selection_duplicate_tag_is_rejected() {
        let sel = AxisSelection::new(AxisTag::Z, AxisTag::Z);
        assert!(matches!(sel.validate(), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn labeled_volume_rank_mismatch_is_rejected() {
        let data = ArrayD::from_elem(vec![2, 2], 0_u32);
        let result = LabeledVolume::new(data, vec![AxisTag::X], 0);
        assert!(matches!(result, Err(ScanError::Configuration(_))));
    }

    #[test]
    fn labeled_volume_duplicate_axis_is_rejected() {
        let data = ArrayD::from_elem(vec![2, 2], 0_u32);
        let result = LabeledVolume::new(data, vec![AxisTag::X, AxisTag::X], 0);
        assert!(matches!(result, Err(ScanError::Configuration(_))));
    }

    #[test]
    fn labeled_volume_axis_index() {
        let data = ArrayD::from_elem(vec![2, 3, 4], 0_u32);
        let volume =
            LabeledVolume::new(data, vec![AxisTag::Z, AxisTag::X, AxisTag::Y], 0).unwrap();
        assert_eq!(volume.axis_index(AxisTag::X), Some(1));
        assert_eq!(volume.axis_index(AxisTag::Time), None);
    }

    #[test]
    fn output_row_missing_sentinel() {
        let row = OutputRow::missing("Row3".to_owned());
        assert!(row.is_missing());
        assert!(!OutputRow::values("Row0_x".to_owned(), 1.0, 2.0).is_missing());
    }

    #[test]
    fn output_columns_are_fixed() {
        assert_eq!(OUTPUT_COLUMNS, ["Min Radius", "Max Radius"]);
    }

    #[test]
    fn scan_config_serde_round_trip() {
        let config = ScanConfig {
            axis_selection: AxisSelection::new(AxisTag::X, AxisTag::Z),
            worker_threads: 4,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
