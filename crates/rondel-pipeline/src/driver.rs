//! Scan driver: sequential per-row traversal with cancellation checks
//! and progress reporting.
//!
//! Rows are processed strictly sequentially; within one row, every
//! region task from every slice is submitted to the worker pool and
//! jointly awaited before the row's output is emitted. Cancellation is
//! observed only at row boundaries, never mid-task, and is the sole
//! fatal runtime failure: missing cells and per-task errors are
//! recovered locally.

use crate::aggregate;
use crate::dispatch::{RegionTask, TaskDispatcher};
use crate::kernel::GeometryKernel;
use crate::regions;
use crate::slicer::SliceSequence;
use crate::types::{Canceled, Label, LabeledVolume, OutputRow, ScanConfig, ScanError};

/// One input table row: a unique key plus an optional labeled-volume
/// cell. `None` is the missing-cell sentinel.
#[derive(Debug, Clone)]
pub struct InputRow<L> {
    /// The row's unique key within the input table.
    pub key: String,
    /// The labeled-volume cell, if present.
    pub cell: Option<LabeledVolume<L>>,
}

/// Sink for emitted output rows, standing in for the host table's
/// output container.
pub trait OutputSink {
    /// Append one row to the output table.
    fn append(&mut self, row: OutputRow);
}

impl OutputSink for Vec<OutputRow> {
    fn append(&mut self, row: OutputRow) {
        self.push(row);
    }
}

/// Host-side execution monitor: cancellation checks and progress.
pub trait ScanMonitor {
    /// Check whether the scan should stop.
    ///
    /// # Errors
    ///
    /// Returns [`Canceled`] to abort the scan at the current row
    /// boundary. Rows already emitted remain.
    fn check_canceled(&self) -> Result<(), Canceled>;

    /// Report scan progress as a fraction in `[0, 1]`, updated once per
    /// input row.
    fn set_progress(&self, fraction: f64);
}

/// Monitor that never cancels and discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl ScanMonitor for NullMonitor {
    fn check_canceled(&self) -> Result<(), Canceled> {
        Ok(())
    }

    fn set_progress(&self, _fraction: f64) {}
}

/// Per-scan orchestrator.
///
/// Construction validates the axis selection, builds the worker pool,
/// and takes ownership of the geometry kernel — all before any row is
/// read, so configuration errors fail fast and the kernel is never
/// initialized from inside a worker.
pub struct ScanDriver<K> {
    config: ScanConfig,
    kernel: K,
    dispatcher: TaskDispatcher,
}

impl<K: GeometryKernel> ScanDriver<K> {
    /// Build a driver for one scan session.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Configuration`] if the axis selection names
    /// a duplicate axis or the worker pool cannot be built.
    pub fn new(config: ScanConfig, kernel: K) -> Result<Self, ScanError> {
        config.axis_selection.validate()?;
        let dispatcher = TaskDispatcher::new(config.worker_threads)?;
        Ok(Self {
            config,
            kernel,
            dispatcher,
        })
    }

    /// Run the scan over the given input rows.
    ///
    /// Missing cells emit a single missing-valued row and a warning;
    /// failed region tasks drop their result only. Progress advances
    /// monotonically once per row.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Canceled`] if the monitor reports
    /// cancellation at a row boundary, or [`ScanError::Configuration`]
    /// if a row's volume does not resolve the axis selection.
    #[allow(clippy::cast_precision_loss)]
    pub fn run<L, I, M, S>(&self, rows: I, monitor: &M, sink: &mut S) -> Result<(), ScanError>
    where
        L: Label,
        I: IntoIterator<Item = InputRow<L>>,
        I::IntoIter: ExactSizeIterator,
        M: ScanMonitor,
        S: OutputSink,
    {
        let rows = rows.into_iter();
        let total = rows.len();

        for (done, row) in rows.enumerate() {
            monitor.check_canceled()?;

            match row.cell {
                None => {
                    log::warn!("missing cell in row {}; missing row inserted", row.key);
                    sink.append(aggregate::missing_row(&row.key));
                }
                Some(volume) => self.process_row(&row.key, &volume, sink)?,
            }

            monitor.set_progress((done + 1) as f64 / total as f64);
        }

        Ok(())
    }

    /// Slice one row's volume, decompose every slice into regions,
    /// dispatch the full task group, and emit the assembled rows.
    fn process_row<L: Label>(
        &self,
        key: &str,
        volume: &LabeledVolume<L>,
        sink: &mut impl OutputSink,
    ) -> Result<(), ScanError> {
        let slices = SliceSequence::new(volume, self.config.axis_selection)?;

        let mut tasks = Vec::new();
        for slice in slices {
            let found = regions::decompose(&slice, volume.background(), self.kernel.connectivity());
            // One region per label per slice, so row keys cannot collide.
            for region in regions::merge_by_label(found) {
                tasks.push(RegionTask {
                    slice_index: slice.index,
                    region,
                });
            }
        }

        let results = self.dispatcher.dispatch(&self.kernel, tasks);
        for row in aggregate::assemble(key, results) {
            sink.append(row);
        }
        Ok(())
    }
}
