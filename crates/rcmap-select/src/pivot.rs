//! The transform pivot and the signals that drive its gizmo.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A change to the pivot, for the gizmo-rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PivotSignal {
    Show,
    Hide,
    SetPosition(Vec3),
    SetRotation(Quat),
}

/// Current pivot state: where the gizmo is and whether it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub visible: bool,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pivot {
    /// Fold a signal into the state.
    pub fn apply(&mut self, signal: PivotSignal) {
        match signal {
            PivotSignal::Show => self.visible = true,
            PivotSignal::Hide => self.visible = false,
            PivotSignal::SetPosition(position) => self.position = position,
            PivotSignal::SetRotation(rotation) => self.rotation = rotation,
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Self {
            visible: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}
