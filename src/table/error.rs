//! Error types for table assembly

use thiserror::Error;

use crate::schema::SchemaError;

/// Errors that abort building a table
#[derive(Error, Debug)]
pub enum TableError {
    /// A numeric column holds a value that does not parse as a number
    #[error("Column {column} is numeric but row {row} holds {value:?}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
    },

    /// The column spec itself is invalid
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl TableError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            TableError::TypeCoercion { column, row, value } => format!(
                "Cannot read {value:?} as a number in column {column} (row {row}).\n\n\
                Hint: Declare the column as categorical or string in the column spec."
            ),
            TableError::Schema(e) => e.user_message(),
        }
    }
}
