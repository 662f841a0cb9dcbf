//! Map script codec.
//!
//! [`MapCodec::parse`] turns a document into a [`ParsedDocument`]; a bad
//! record never aborts the document, it is skipped and reported as a
//! [`Diagnostic`]. [`serialize`] is the inverse for any document that parsed
//! without diagnostics.
//!
//! # Example
//!
//! ```
//! use rcmap_script::prelude::*;
//!
//! let assets = AssetCatalog::permissive();
//! let codec = MapCodec::new(&assets);
//!
//! let parsed = codec.parse("map,disablebounds;\nbase,house,0,0,0,0,0,0,1;\nbogus;");
//! assert!(parsed.document.bounds_disabled);
//! assert_eq!(parsed.document.records.len(), 1);
//! assert_eq!(parsed.diagnostics.len(), 1);
//! assert_eq!(parsed.diagnostics[0].line, 2);
//!
//! assert_eq!(
//!     serialize(true, &parsed.document.records),
//!     "map,disablebounds;\nbase,house,0,0,0,0,0,0,1;\n",
//! );
//! ```

mod parse;
mod serialize;

pub use parse::{
    split_records, strip_whitespace, Diagnostic, MapCodec, ParsedDocument, RegionLabel,
    RegionLabels,
};
pub use serialize::serialize;
