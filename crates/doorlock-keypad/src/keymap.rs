//! Key matrix geometry and symbol table.

use doorlock_core::constants::{KEYPAD_LAYOUT, NULL_SYMBOL};
use doorlock_core::{Error, LockConfig, Result};

/// Symbol table of an R x C key matrix, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    symbols: Vec<Vec<char>>,
    cols: usize,
}

impl KeyMap {
    /// Build a key map from its rows.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGeometry` if there are no rows, no columns or the
    /// rows differ in length, and `Error::InvalidKeySymbol` if the table
    /// contains the null symbol.
    ///
    /// ```
    /// use doorlock_keypad::KeyMap;
    ///
    /// let map = KeyMap::new(vec![vec!['1', '2'], vec!['*', '#']]).unwrap();
    /// assert_eq!((map.rows(), map.cols()), (2, 2));
    ///
    /// assert!(KeyMap::new(vec![]).is_err());
    /// assert!(KeyMap::new(vec![vec!['1', '2'], vec!['3']]).is_err());
    /// ```
    pub fn new(symbols: Vec<Vec<char>>) -> Result<Self> {
        let Some(first) = symbols.first() else {
            return Err(Error::InvalidGeometry("keypad has no rows".to_string()));
        };

        let cols = first.len();
        if cols == 0 {
            return Err(Error::InvalidGeometry("keypad has no columns".to_string()));
        }

        if let Some((row, len)) = symbols
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(Error::InvalidGeometry(format!(
                "row {row} has {len} keys, expected {cols}"
            )));
        }

        if symbols.iter().flatten().any(|&s| s == NULL_SYMBOL) {
            return Err(Error::InvalidKeySymbol(NULL_SYMBOL));
        }

        Ok(Self { symbols, cols })
    }

    /// Key map described by a controller configuration.
    pub fn from_config(config: &LockConfig) -> Result<Self> {
        Self::new(config.keymap_rows())
    }

    /// The reference `123A / 456B / 789C / *0#D` layout.
    pub fn standard_4x4() -> Self {
        Self {
            symbols: KEYPAD_LAYOUT.iter().map(|row| row.to_vec()).collect(),
            cols: KEYPAD_LAYOUT[0].len(),
        }
    }

    pub fn rows(&self) -> usize {
        self.symbols.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Symbol at `(row, col)`, if inside the matrix.
    pub fn symbol(&self, row: usize, col: usize) -> Option<char> {
        self.symbols.get(row)?.get(col).copied()
    }

    /// First position (row-major) carrying `symbol`.
    pub fn position(&self, symbol: char) -> Option<(usize, usize)> {
        self.symbols.iter().enumerate().find_map(|(row, keys)| {
            keys.iter()
                .position(|&s| s == symbol)
                .map(|col| (row, col))
        })
    }
}
