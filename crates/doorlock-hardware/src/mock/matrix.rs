//! Simulated key matrix.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::{mock::lock_state, traits::MatrixLines};

#[derive(Debug)]
struct MatrixState {
    rows_driven: Vec<bool>,
    cols: usize,
    pressed: BTreeSet<(usize, usize)>,
    max_rows_driven: usize,
    crowded_reads: usize,
    column_reads: usize,
}

impl MatrixState {
    fn rows_driven_count(&self) -> usize {
        self.rows_driven.iter().filter(|&&d| d).count()
    }
}

/// In-memory key matrix.
///
/// A column reads active when a pressed key joins it to a driven row. The
/// matrix also keeps count of how many rows were ever driven at once, so
/// tests can check the one-row-at-a-time scan discipline.
///
/// ```
/// use doorlock_hardware::mock::MockMatrix;
/// use doorlock_hardware::traits::MatrixLines;
///
/// let (mut matrix, handle) = MockMatrix::new(4, 4);
/// handle.press(1, 2);
///
/// matrix.set_row(1, true);
/// assert!(matrix.column_active(2));
/// matrix.set_row(1, false);
/// assert!(!matrix.column_active(2));
/// ```
#[derive(Debug)]
pub struct MockMatrix {
    state: Arc<Mutex<MatrixState>>,
}

impl MockMatrix {
    /// Create a matrix with all rows inactive and no keys pressed.
    pub fn new(rows: usize, cols: usize) -> (Self, MockMatrixHandle) {
        let state = Arc::new(Mutex::new(MatrixState {
            rows_driven: vec![false; rows],
            cols,
            pressed: BTreeSet::new(),
            max_rows_driven: 0,
            crowded_reads: 0,
            column_reads: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockMatrixHandle { state },
        )
    }
}

impl MatrixLines for MockMatrix {
    fn set_row(&mut self, row: usize, active: bool) {
        let mut state = lock_state(&self.state);
        if let Some(line) = state.rows_driven.get_mut(row) {
            *line = active;
        }
        let driven = state.rows_driven_count();
        state.max_rows_driven = state.max_rows_driven.max(driven);
    }

    fn column_active(&mut self, col: usize) -> bool {
        let mut state = lock_state(&self.state);
        state.column_reads += 1;
        if state.rows_driven_count() > 1 {
            state.crowded_reads += 1;
        }
        if col >= state.cols {
            return false;
        }
        state
            .pressed
            .iter()
            .any(|&(r, c)| c == col && state.rows_driven.get(r).copied().unwrap_or(false))
    }
}

/// Handle for pressing keys on, and inspecting, a [`MockMatrix`].
#[derive(Debug, Clone)]
pub struct MockMatrixHandle {
    state: Arc<Mutex<MatrixState>>,
}

impl MockMatrixHandle {
    /// Close the switch at `(row, col)`.
    pub fn press(&self, row: usize, col: usize) {
        lock_state(&self.state).pressed.insert((row, col));
    }

    /// Open the switch at `(row, col)`.
    pub fn release(&self, row: usize, col: usize) {
        lock_state(&self.state).pressed.remove(&(row, col));
    }

    pub fn release_all(&self) {
        lock_state(&self.state).pressed.clear();
    }

    /// Indices of rows currently driven active.
    pub fn active_rows(&self) -> Vec<usize> {
        lock_state(&self.state)
            .rows_driven
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| d.then_some(i))
            .collect()
    }

    /// Largest number of rows ever driven at the same time.
    pub fn max_rows_driven(&self) -> usize {
        lock_state(&self.state).max_rows_driven
    }

    /// Column reads taken while more than one row was driven.
    pub fn crowded_reads(&self) -> usize {
        lock_state(&self.state).crowded_reads
    }

    pub fn column_reads(&self) -> usize {
        lock_state(&self.state).column_reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_reads_require_driven_row() {
        let (mut matrix, handle) = MockMatrix::new(4, 4);
        handle.press(3, 0);

        assert!(!matrix.column_active(0));

        matrix.set_row(3, true);
        assert!(matrix.column_active(0));
        assert!(!matrix.column_active(1));
        assert_eq!(handle.active_rows(), vec![3]);
    }

    #[test]
    fn test_out_of_range_lines_are_ignored() {
        let (mut matrix, handle) = MockMatrix::new(2, 2);
        handle.press(0, 1);

        matrix.set_row(7, true);
        matrix.set_row(0, true);
        assert!(!matrix.column_active(9));
        assert!(handle.active_rows() == vec![0]);
    }

    #[test]
    fn test_crowded_reads_are_counted() {
        let (mut matrix, handle) = MockMatrix::new(4, 4);

        matrix.set_row(0, true);
        matrix.set_row(1, true);
        matrix.column_active(0);

        assert_eq!(handle.max_rows_driven(), 2);
        assert_eq!(handle.crowded_reads(), 1);
    }

    #[test]
    fn test_release_opens_switch() {
        let (mut matrix, handle) = MockMatrix::new(4, 4);
        handle.press(2, 2);
        matrix.set_row(2, true);
        assert!(matrix.column_active(2));

        handle.release(2, 2);
        assert!(!matrix.column_active(2));
    }
}
