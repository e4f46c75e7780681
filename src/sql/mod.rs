//! Parameterized SQL fragment builder.
//!
//! Condition structs append one fragment per filter, values travel beside
//! the text as [`SqlValue`]s, and the separator (`and`, `or`, none) is picked
//! when the template is consumed. Nothing here performs I/O.

mod batch_insert;
mod builder;
mod errors;
mod template;
mod value;

pub use batch_insert::sql_batch_insert;
pub use builder::{Separator, SqlBuilder};
pub use errors::SqlTemplateError;
pub use template::{count_placeholders, in_placeholders, SqlTemplate};
pub use value::SqlValue;
