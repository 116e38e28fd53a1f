//! rondel-pipeline: min/max region-radius extraction (sans-IO).
//!
//! Given a table of n-dimensional labeled-region volumes, each row's
//! volume is sliced along two selected axes into 2D slices, every
//! connected labeled region in each slice is extracted, and the minimum
//! and maximum distance from each region's centroid to its boundary
//! contour is computed concurrently. Results flow into a two-column
//! output table ("Min Radius" / "Max Radius") with one uniquely keyed
//! row per region-slice occurrence.
//!
//! This crate has **no I/O dependencies** — the host table engine is
//! abstracted behind [`InputRow`], [`OutputSink`], and [`ScanMonitor`].
//! Geometry primitives are consumed through the [`GeometryKernel`]
//! trait; [`BorderKernel`] is the default backend.
//!
//! # Structure
//!
//! - [`slicer`]: deterministic 2D slice sequence along two axes
//! - [`regions`]: connected-component decomposition of a slice
//! - [`kernel`]: centroid / boundary-contour capability
//! - [`radius`]: min/max centroid-to-boundary distance
//! - [`dispatch`]: bounded parallel task group per row
//! - [`aggregate`]: uniquely keyed output-row assembly
//! - [`driver`]: per-row orchestration, cancellation, progress

pub mod aggregate;
pub mod dispatch;
pub mod driver;
pub mod kernel;
pub mod radius;
pub mod regions;
pub mod slicer;
pub mod types;

pub use dispatch::{RegionTask, TaskDispatcher};
pub use driver::{InputRow, NullMonitor, OutputSink, ScanDriver, ScanMonitor};
pub use kernel::{BorderKernel, GeometryKernel};
pub use regions::{Connectivity, PixelSet, Region};
pub use slicer::{Slice, SliceSequence};
pub use types::{
    AxisSelection, AxisTag, Canceled, Label, LabeledVolume, OUTPUT_COLUMNS, OutputRow, Point,
    RadiusError, RadiusResult, ScanConfig, ScanError,
};
