//! Tabularization
//!
//! Assembles flattened rows of one resource type into a typed [`Table`].
//! The steps, in order:
//!
//! 1. prefix every key with `<resourceType>_` and apply the column spec's renames,
//! 2. derive the `urn:uuid:` reference column when the column spec asks for it,
//! 3. union the rows, filling absent cells with the `"nan"` marker,
//! 4. type the columns declared in the column spec (numeric, categorical, string),
//! 5. order them numeric, categorical, string.

mod builder;
mod error;

pub use builder::{TableBuilder, build_table};
pub use error::TableError;
