//! Read/write access to the placement of selectable entities.
//!
//! The aggregate never owns entities. It reads and writes their transforms
//! through [`Placements`], which the map editor implements over its document.

use std::collections::HashMap;
use std::hash::Hash;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform storage keyed by entity id.
///
/// Getters return `None` for unknown ids. Setters on unknown ids do nothing.
pub trait Placements<Id> {
    fn position(&self, id: Id) -> Option<Vec3>;
    fn rotation(&self, id: Id) -> Option<Quat>;
    fn scale(&self, id: Id) -> Option<Vec3>;

    fn set_position(&mut self, id: Id, position: Vec3);
    fn set_rotation(&mut self, id: Id, rotation: Quat);
    fn set_scale(&mut self, id: Id, scale: Vec3);
}

/// A bare transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Placement {
    /// Unrotated, unit scale, at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl<Id: Copy + Eq + Hash> Placements<Id> for HashMap<Id, Placement> {
    fn position(&self, id: Id) -> Option<Vec3> {
        self.get(&id).map(|p| p.position)
    }

    fn rotation(&self, id: Id) -> Option<Quat> {
        self.get(&id).map(|p| p.rotation)
    }

    fn scale(&self, id: Id) -> Option<Vec3> {
        self.get(&id).map(|p| p.scale)
    }

    fn set_position(&mut self, id: Id, position: Vec3) {
        if let Some(p) = self.get_mut(&id) {
            p.position = position;
        }
    }

    fn set_rotation(&mut self, id: Id, rotation: Quat) {
        if let Some(p) = self.get_mut(&id) {
            p.rotation = rotation;
        }
    }

    fn set_scale(&mut self, id: Id, scale: Vec3) {
        if let Some(p) = self.get_mut(&id) {
            p.scale = scale;
        }
    }
}
