//! rcmap-script -- the map script text format.
//!
//! A map script is a flat list of `;`-terminated records, each a
//! comma-separated list of fields. The first field is a type token that
//! selects a [`Category`](category::Category); together with the object name
//! and the field count it selects one of five record [`Variant`](schema::Variant)s,
//! which fixes the meaning of every remaining field.
//!
//! Parsing resolves each object through an [`AssetStore`](assets::AssetStore)
//! and applies its presentation properties. Records that fail are skipped and
//! reported; the rest of the document still loads.
//!
//! # Quick Start
//!
//! ```
//! use rcmap_script::prelude::*;
//!
//! let assets = AssetCatalog::permissive();
//! let parsed = MapCodec::new(&assets).parse("racing,startline,5,1,5,0,10,0,0,0,0,1;");
//!
//! let record = &parsed.document.records[0];
//! assert_eq!(record.category(), Category::Racing);
//! assert_eq!(record.variant(), Variant::Scaled);
//! assert_eq!(record.to_string(), "racing,startline,5,1,5,0,10,0,0,0,0,1;");
//! ```

#![deny(unsafe_code)]

pub mod assets;
pub mod category;
pub mod codec;
pub mod document;
pub mod record;
pub mod schema;
pub mod values;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while reading or editing map script records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// The type token does not start with any known category token.
    #[error("unknown type '{token}'")]
    UnknownType { token: String },

    /// The record has fewer fields than its variant needs.
    #[error("record has {found} fields, at least {required} required")]
    TooFewFields { found: usize, required: usize },

    /// A field could not be parsed as its expected type.
    #[error("field {index} ({field}) has malformed value '{value}'")]
    FieldFormat {
        index: usize,
        field: &'static str,
        value: String,
    },

    /// The asset store has nothing for this object.
    #[error("no asset for {category} object '{name}'")]
    AssetNotFound {
        category: category::Category,
        name: String,
    },

    /// A property was set on a record whose variant does not have it.
    #[error("property '{property}' does not exist on {variant} records")]
    PropertyNotInVariant {
        property: &'static str,
        variant: &'static str,
    },

    /// The document bytes are not UTF-8.
    #[error("map script is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::assets::{
        asset_key, AssetCatalog, AssetKey, AssetLibrary, AssetStore, MaterialHandle, SpawnHandle,
        SurfaceDesc,
    };
    pub use crate::category::Category;
    pub use crate::codec::{
        serialize, strip_whitespace, Diagnostic, MapCodec, ParsedDocument, RegionLabel,
        RegionLabels,
    };
    pub use crate::document::{Document, DISABLE_BOUNDS_DIRECTIVE};
    pub use crate::record::{EntityRecord, Surface, Texturing, VariantData};
    pub use crate::schema::{SchemaRegistry, Variant};
    pub use crate::values::Color;
    pub use crate::ScriptError;
}
