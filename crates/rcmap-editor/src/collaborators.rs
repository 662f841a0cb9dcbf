//! Interfaces to the scene layer the editor does not own: picking and the
//! grouping hierarchy.

use std::collections::HashMap;

use glam::Vec3;

use crate::entity::RecordId;

/// What a pick hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickHit {
    pub id: RecordId,
    /// Whether the hit surface belongs to a selectable map object.
    pub selectable: bool,
}

impl PickHit {
    pub fn selectable(id: RecordId) -> Self {
        Self {
            id,
            selectable: true,
        }
    }
}

/// Resolves a world point to the entity under it.
pub trait PickSurface {
    fn pick(&self, point: Vec3) -> Option<PickHit>;
}

/// The parent an entity hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    /// Directly under the map root.
    MapRoot,
    /// Under a user-made group; members are selected individually.
    Group,
    /// Part of a composite object, which is selected as a whole.
    Composite(RecordId),
}

/// One level of grouping above map entities.
pub trait GroupHierarchy {
    fn parent(&self, id: RecordId) -> ParentKind;

    /// The id a click on `id` selects: `id` itself under the map root or a
    /// group, otherwise its composite parent.
    fn selection_root(&self, id: RecordId) -> RecordId {
        match self.parent(id) {
            ParentKind::MapRoot | ParentKind::Group => id,
            ParentKind::Composite(parent) => parent,
        }
    }
}

/// Every entity sits directly under the map root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHierarchy;

impl GroupHierarchy for FlatHierarchy {
    fn parent(&self, _id: RecordId) -> ParentKind {
        ParentKind::MapRoot
    }
}

/// Explicit parents; unlisted entities sit under the map root.
impl GroupHierarchy for HashMap<RecordId, ParentKind> {
    fn parent(&self, id: RecordId) -> ParentKind {
        self.get(&id).copied().unwrap_or(ParentKind::MapRoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_children_select_their_parent() {
        let parent = RecordId::new(0, 0);
        let child = RecordId::new(1, 0);
        let grouped = RecordId::new(2, 0);
        let hierarchy: HashMap<RecordId, ParentKind> = [
            (child, ParentKind::Composite(parent)),
            (grouped, ParentKind::Group),
        ]
        .into_iter()
        .collect();

        assert_eq!(hierarchy.selection_root(child), parent);
        assert_eq!(hierarchy.selection_root(grouped), grouped);
        assert_eq!(hierarchy.selection_root(parent), parent);
        assert_eq!(FlatHierarchy.selection_root(child), child);
    }
}
