// In: src/frame/table.rs

//! The seam between the codec and whatever table container a caller uses.

use crate::column::Column;
use crate::error::Result;

/// A table the v2 codec can read from and build.
///
/// The encoder only needs counts, ordered columns and the nullability flag;
/// the decoder hands over the decoded columns through `from_columns`.
pub trait Table {
    /// Number of rows; every column has exactly this many elements.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn columns(&self) -> usize;

    /// The column at `index`, in table order.
    fn column_at(&self, index: usize) -> Result<&Column>;

    /// Whether this is a nullable table. A nullable table holds only nullable
    /// column kinds and a default table only non-nullable ones.
    fn is_nullable(&self) -> bool;

    /// Builds a table of the given flavour from decoded columns.
    fn from_columns(nullable: bool, columns: Vec<Column>) -> Result<Self>
    where
        Self: Sized;
}
