//! Input tables and the CSV loader that produces them

pub mod loader;

pub use loader::{
    load_table, load_table_from_reader, FillPolicy, RawTable, SourceTable, DEFAULT_DATA_DIR,
};
