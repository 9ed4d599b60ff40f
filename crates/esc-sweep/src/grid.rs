use esc_core::errors::{ErrorInfo, EscError};
use serde::{Deserialize, Serialize};

/// Row-major enumeration of a Cartesian product, last axis fastest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepGrid {
    cardinalities: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

/// One selection of a value index per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SweepCombination {
    /// Row in `[0, grid.len())`.
    pub row: usize,
    /// Selected value index per axis, in axis order.
    pub indices: Vec<usize>,
}

impl SweepGrid {
    /// Builds the grid for the given axis cardinalities.
    pub fn new(cardinalities: Vec<usize>) -> Result<Self, EscError> {
        if let Some(axis) = cardinalities.iter().position(|&card| card == 0) {
            return Err(EscError::Configuration(
                ErrorInfo::new("grid-empty-axis", "axis has no values")
                    .with_context("axis_index", axis.to_string()),
            ));
        }
        let mut strides = vec![1; cardinalities.len()];
        let mut len: usize = 1;
        for (axis, card) in cardinalities.iter().enumerate().rev() {
            strides[axis] = len;
            len = len.checked_mul(*card).ok_or_else(|| {
                EscError::Configuration(
                    ErrorInfo::new("grid-overflow", "sweep has too many combinations")
                        .with_context("axes", cardinalities.len().to_string()),
                )
            })?;
        }
        Ok(Self {
            cardinalities,
            strides,
            len,
        })
    }

    /// Number of combinations (product of cardinalities).
    pub fn len(&self) -> usize {
        self.len
    }

    /// A grid without axes still holds the single empty combination, and
    /// empty axes are rejected, so this is false for every constructed grid.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Axis cardinalities.
    pub fn cardinalities(&self) -> &[usize] {
        &self.cardinalities
    }

    /// Per-axis value indices for `row`.
    ///
    /// For axis `j` with stride `P_j = Π_{m>j} card_m` the index is
    /// `(ceil((row + 1) / P_j) - 1) mod card_j`, which for non-negative
    /// integers equals `(row / P_j) mod card_j`; the last axis has `P = 1`.
    pub fn indices(&self, row: usize) -> Result<Vec<usize>, EscError> {
        if row >= self.len {
            return Err(EscError::IndexOutOfBounds(
                ErrorInfo::new("grid-row", "row out of bounds of the sweep")
                    .with_context("row", row.to_string())
                    .with_context("len", self.len.to_string()),
            ));
        }
        Ok(self.indices_unchecked(row))
    }

    fn indices_unchecked(&self, row: usize) -> Vec<usize> {
        self.cardinalities
            .iter()
            .zip(&self.strides)
            .map(|(card, stride)| (row / stride) % card)
            .collect()
    }

    /// Combination at `row`.
    pub fn combination(&self, row: usize) -> Result<SweepCombination, EscError> {
        Ok(SweepCombination {
            row,
            indices: self.indices(row)?,
        })
    }

    /// Iterates every combination in row order.
    pub fn combinations(&self) -> impl Iterator<Item = SweepCombination> + '_ {
        (0..self.len).map(move |row| SweepCombination {
            row,
            indices: self.indices_unchecked(row),
        })
    }
}
