//! Dimension slicing: project an n-dimensional labeled volume onto a
//! deterministic sequence of 2D slices along two selected axes.
//!
//! The sequence is finite, restartable (`Clone` the sequence to start
//! over), and side-effect-free. Slice ordinals follow raster order over
//! the non-selected axes: the first non-selected axis varies slowest.

use ndarray::{ArrayView2, Axis, Ix2};

use crate::types::{AxisSelection, Label, LabeledVolume, ScanError};

/// A 2D cross-section of a volume at fixed coordinates along every
/// non-selected axis.
///
/// `plane` axis 0 corresponds to the first selected axis and axis 1 to
/// the second, regardless of their order in the volume.
#[derive(Debug)]
pub struct Slice<'a, L> {
    /// 0-based ordinal in raster iteration order.
    pub index: usize,
    /// The 2D label view.
    pub plane: ArrayView2<'a, L>,
}

/// Deterministic sequence of 2D slices of one volume.
#[derive(Debug, Clone)]
pub struct SliceSequence<'a, L> {
    volume: &'a LabeledVolume<L>,
    first_axis: usize,
    second_axis: usize,
    fixed_axes: Vec<usize>,
    fixed_shape: Vec<usize>,
    next: usize,
    total: usize,
}

impl<'a, L: Label> SliceSequence<'a, L> {
    /// Resolve an axis selection against a volume and build the slice
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Configuration`] if the selection does not
    /// resolve to exactly two distinct axes present in the volume.
    pub fn new(volume: &'a LabeledVolume<L>, selection: AxisSelection) -> Result<Self, ScanError> {
        selection.validate()?;
        let resolve = |tag| {
            volume.axis_index(tag).ok_or_else(|| {
                ScanError::Configuration(format!(
                    "selected axis {tag} is not present in the volume"
                ))
            })
        };
        let first_axis = resolve(selection.first)?;
        let second_axis = resolve(selection.second)?;

        let mut fixed_axes = Vec::new();
        let mut fixed_shape = Vec::new();
        for (axis, &len) in volume.data().shape().iter().enumerate() {
            if axis != first_axis && axis != second_axis {
                fixed_axes.push(axis);
                fixed_shape.push(len);
            }
        }
        let total = fixed_shape.iter().product();

        Ok(Self {
            volume,
            first_axis,
            second_axis,
            fixed_axes,
            fixed_shape,
            next: 0,
            total,
        })
    }

    /// Number of slices not yet yielded.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.total - self.next
    }

    /// Returns `true` if no slices remain (including a zero-length axis).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates along the fixed axes for a given ordinal, in raster
    /// order (first fixed axis slowest).
    fn fixed_coords(&self, ordinal: usize) -> Vec<usize> {
        let mut coords = vec![0; self.fixed_shape.len()];
        let mut rem = ordinal;
        for (coord, &len) in coords.iter_mut().zip(&self.fixed_shape).rev() {
            *coord = rem % len;
            rem /= len;
        }
        coords
    }
}

impl<'a, L: Label> Iterator for SliceSequence<'a, L> {
    type Item = Slice<'a, L>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let coords = self.fixed_coords(index);
        let mut view = self.volume.data().view();
        // Remove fixed axes from highest to lowest so earlier indices
        // stay valid as the rank shrinks.
        for (&axis, &coord) in self.fixed_axes.iter().zip(&coords).rev() {
            view = view.index_axis_move(Axis(axis), coord);
        }

        // Exactly two axes remain by construction.
        let mut plane = match view.into_dimensionality::<Ix2>() {
            Ok(plane) => plane,
            Err(err) => {
                debug_assert!(false, "slice {index} did not reduce to two axes: {err}");
                log::error!("slice {index} did not reduce to two axes: {err}");
                return None;
            }
        };
        if self.first_axis > self.second_axis {
            plane = plane.reversed_axes();
        }

        Some(Slice { index, plane })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl<L: Label> ExactSizeIterator for SliceSequence<'_, L> {}
