//! Models module
//!
//! Data structures shared by the flattener, the tabularizer and the exporters.

pub mod column;
pub mod row;
pub mod table;

pub use column::{ColumnKind, ColumnRole, TableColumn};
pub use row::{FlatRow, NULL_MARKER, scalar_to_text};
pub use table::{Cell, Table};
