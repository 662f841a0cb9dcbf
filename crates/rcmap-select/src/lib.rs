//! rcmap-select -- multi-entity selection with a shared transform pivot.
//!
//! A [`SelectionAggregate`](selection::SelectionAggregate) tracks which
//! entities can be selected and which are, keeps the centroid of the
//! selection as a running average, and applies translate, rotate, and scale
//! drags to every selected entity about that centroid. Entity transforms
//! live elsewhere and are reached through the
//! [`Placements`](placements::Placements) trait.
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//!
//! use glam::Vec3;
//! use rcmap_select::prelude::*;
//!
//! let mut placements: HashMap<u32, Placement> = HashMap::new();
//! placements.insert(1, Placement::at(Vec3::new(0.0, 0.0, 0.0)));
//! placements.insert(2, Placement::at(Vec3::new(4.0, 0.0, 0.0)));
//!
//! let mut selection = SelectionAggregate::new();
//! selection.add_selectable(1);
//! selection.add_selectable(2);
//! selection.select_all(&placements);
//! assert_eq!(selection.average(), Some(Vec3::new(2.0, 0.0, 0.0)));
//!
//! selection.apply_group_transform(GroupTransform::Translate(Vec3::Y), &mut placements);
//! assert_eq!(selection.average(), Some(Vec3::new(2.0, 1.0, 0.0)));
//! assert_eq!(placements[&2].position, Vec3::new(4.0, 1.0, 0.0));
//! ```

#![deny(unsafe_code)]

pub mod pivot;
pub mod placements;
pub mod selection;
pub mod tool;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::pivot::{Pivot, PivotSignal};
    pub use crate::placements::{Placement, Placements};
    pub use crate::selection::SelectionAggregate;
    pub use crate::tool::{GroupTransform, Tool};
}
