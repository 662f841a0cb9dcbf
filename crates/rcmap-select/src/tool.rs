//! Transform tools and the group transforms they produce.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The active gizmo tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl Tool {
    /// Whether the pivot takes the orientation of a lone selected entity.
    pub fn orients_pivot(self) -> bool {
        matches!(self, Tool::Rotate | Tool::Scale)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tool::Translate => "translate",
            Tool::Rotate => "rotate",
            Tool::Scale => "scale",
        })
    }
}

/// One frame's worth of gizmo drag, applied to the whole selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GroupTransform {
    /// Move every selected entity by this offset.
    Translate(Vec3),
    /// Orbit every selected entity about the pivot, `angle` radians around
    /// `axis`, and turn it by the same rotation.
    Rotate { axis: Vec3, angle: f32 },
    /// Multiply every selected entity's scale and pivot offset per axis.
    Scale(Vec3),
}

impl GroupTransform {
    /// The tool that produces this transform.
    pub fn tool(&self) -> Tool {
        match self {
            GroupTransform::Translate(_) => Tool::Translate,
            GroupTransform::Rotate { .. } => Tool::Rotate,
            GroupTransform::Scale(_) => Tool::Scale,
        }
    }
}
