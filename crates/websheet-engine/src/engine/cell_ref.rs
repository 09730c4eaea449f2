//! Cell identifier parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style identifiers
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//!
//! # Examples
//!
//! ```
//! use websheet_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!(cell.row, 2); // 0-indexed
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse an identifier like "A1" or "ab12". Returns None if the input is invalid
    /// or names row 0.
    pub fn parse(id: &str) -> Option<CellRef> {
        let caps = id_re().captures(id.trim())?;
        let col = column_index(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(row, col))
    }

    /// The canonical (uppercase) identifier for this cell.
    pub fn id(&self) -> String {
        cell_id(self.row, self.col)
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), self.row + 1)
    }
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("cell identifier regex must compile")
    })
}

/// Convert a zero-based column index to letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Decode column letters back to a zero-based index (A -> 0, AA -> 26).
/// Case-insensitive. Returns None for empty input, non-letters or overflow.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

/// Identifier for a zero-based (row, col) pair: `column_name(col) + (row + 1)`.
pub fn cell_id(row: usize, col: usize) -> String {
    format!("{}{}", column_name(col), row + 1)
}

/// Uppercase the column letters of an identifier for lookups.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}
