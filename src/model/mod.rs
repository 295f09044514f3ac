//! Data model for tabular data representation

mod key;
mod table;

pub use key::{KeySpec, KeyValue};
pub use table::{Row, Table};
