//! # OBJ Cleaner
//!
//! Removes named objects from Wavefront OBJ files and rewrites a compact,
//! self-consistent copy of what remains.
//!
//! ## Pipeline
//!
//! - **Parser**: attribute pools, `mtllib` references and faces tagged with
//!   the object and material active when they were declared
//! - **Filter**: drops faces whose object name contains the keyword
//!   (case-insensitive)
//! - **Reindexer**: renumbers the attributes still referenced to a dense range
//! - **Writer**: emits the compacted pools and the surviving faces
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use obj_cleaner::ObjCleaner;
//!
//! fn main() -> Result<(), obj_cleaner::ObjError> {
//!     let stats = ObjCleaner::new("Cube.001").clean_file("CLASSROOM.obj", "CLASSROOM_.obj")?;
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod parser;
pub mod reindex;
pub mod writer;

pub use cleaner::{CleanOutput, CleanStats, ObjCleaner};
pub use config::{CleanerConfig, Config, ConfigError, ConfigFormat};
pub use error::ObjError;
pub use filter::KeywordFilter;
pub use parser::{AttributeKind, AttributePool, FaceRecord, LineKind, ObjModel, ObjParser, VertexRef};
pub use reindex::{IndexMap, IndexMaps, Reindexed, Reindexer, ResolvedFace};
pub use writer::ObjWriter;
