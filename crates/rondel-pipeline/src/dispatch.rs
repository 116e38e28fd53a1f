//! Task dispatch: bounded parallel execution of per-region radius tasks.
//!
//! One task per `(slice, region)` pair. Tasks are mutually independent
//! and share no mutable state, so a whole row's task group is submitted
//! at once and joined once. Result order follows resolution order, not
//! submission order; identities keep results traceable.

use rayon::prelude::*;

use crate::kernel::GeometryKernel;
use crate::radius::min_max_radius;
use crate::regions::Region;
use crate::types::{Label, RadiusResult, ScanError};

/// One unit of concurrent work: a region paired with its slice ordinal.
#[derive(Debug, Clone)]
pub struct RegionTask<L> {
    /// Ordinal of the slice the region was found in.
    pub slice_index: usize,
    /// The region itself.
    pub region: Region<L>,
}

impl<L: Label> RegionTask<L> {
    /// Unique identity within a row.
    ///
    /// Depends only on the label and slice index, never on enumeration
    /// order. The slice index disambiguates the same label appearing in
    /// several slices; within a slice, task creation feeds one region
    /// per label (see [`merge_by_label`](crate::regions::merge_by_label)),
    /// so identities never repeat.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("Region{}_Slice{}", self.region.label, self.slice_index)
    }
}

/// Bounded worker pool for region tasks.
pub struct TaskDispatcher {
    pool: rayon::ThreadPool,
}

impl TaskDispatcher {
    /// Build a dispatcher with the given number of worker threads
    /// (0 = one per logical CPU).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Configuration`] if the pool cannot be built.
    pub fn new(worker_threads: usize) -> Result<Self, ScanError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .build()
            .map_err(|e| ScanError::Configuration(format!("failed to build worker pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Execute a row's task group, blocking until every task resolves.
    ///
    /// A task that fails is logged and its result dropped entirely; the
    /// other tasks are unaffected. The returned results are unordered
    /// relative to submission.
    pub fn dispatch<L, K>(&self, kernel: &K, tasks: Vec<RegionTask<L>>) -> Vec<RadiusResult>
    where
        L: Label,
        K: GeometryKernel,
    {
        self.pool.install(|| {
            tasks
                .into_par_iter()
                .filter_map(|task| {
                    let identity = task.identity();
                    match min_max_radius(kernel, &task.region.pixels) {
                        Ok((min_radius, max_radius)) => Some(RadiusResult {
                            identity,
                            min_radius,
                            max_radius,
                        }),
                        Err(err) => {
                            log::error!("dropping region task {identity}: {err}");
                            None
                        }
                    }
                })
                .collect()
        })
    }
}
