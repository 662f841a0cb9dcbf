//! rcmap-editor -- a map editing session over the map script format.
//!
//! [`MapEditor`](map::MapEditor) ties the codec from `rcmap-script` to the
//! selection aggregate from `rcmap-select`: it loads and exports maps, hands
//! out [`RecordId`](entity::RecordId)s, and implements the clipboard, delete,
//! and click-to-select behavior of the editor.
//!
//! # Quick Start
//!
//! ```
//! use glam::Vec3;
//! use rcmap_editor::prelude::*;
//! use rcmap_script::assets::AssetCatalog;
//!
//! let mut map = MapEditor::new(AssetCatalog::permissive());
//! let ids = map.load_map("base,house,0,0,0,0,0,0,1;base,tree,2,0,0,0,0,0,1;");
//!
//! map.click(Some(PickHit::selectable(ids[1])), false);
//! map.drag(GroupTransform::Translate(Vec3::new(0.0, 0.0, 3.0)));
//!
//! assert_eq!(
//!     map.export(),
//!     "base,house,0,0,0,0,0,0,1;\nbase,tree,2,0,3,0,0,0,1;\n",
//! );
//! ```

#![deny(unsafe_code)]

pub mod collaborators;
pub mod config;
pub mod entity;
pub mod map;

use rcmap_script::ScriptError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The id is stale or was never handed out by this editor.
    #[error("record {id} does not exist (stale or never allocated)")]
    UnknownRecord { id: entity::RecordId },

    /// A record-level script error.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The editor configuration could not be read.
    #[error("invalid editor configuration: {details}")]
    Config { details: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::collaborators::{FlatHierarchy, GroupHierarchy, ParentKind, PickHit, PickSurface};
    pub use crate::config::EditorConfig;
    pub use crate::entity::{RecordAllocator, RecordId};
    pub use crate::map::MapEditor;
    pub use crate::EditorError;
    pub use rcmap_select::prelude::{GroupTransform, Pivot, PivotSignal, Tool};
}
