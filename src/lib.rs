//! Exact-match symbol lookup over generated documentation search indexes.
//!
//! An [`IndexTable`] is built once from a static definition (a Doxygen
//! `searchData` script or canonical JSON) and then only read. Lookups are
//! exact key matches; an absent key is `None`, not an error.
//!
//! ```no_run
//! use symdex::{IndexTable, SourceOptions};
//!
//! let table = IndexTable::from_category("docs/html/search", "functions", &SourceOptions::default())?;
//! if let Some(occurrences) = table.lookup("face_2515") {
//!     for occ in occurrences {
//!         println!("{} -> {}", occ.qualified_name, occ.location);
//!     }
//! }
//! # Ok::<(), symdex::IndexError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod source;
pub mod table;
pub mod types;

pub use config::Settings;
pub use error::{IndexError, IndexResult, MalformedIndex};
pub use source::{RawOccurrence, RawRecord, SourceFormat, SourceOptions};
pub use table::{IndexTable, Keys};
pub use types::{IndexEntry, LocationRef, Occurrence};
