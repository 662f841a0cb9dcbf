//! Scalar and vector values as they appear in map script fields.
//!
//! Every numeric field is plain decimal text. Floats are written with Rust's
//! shortest round-trip formatting (`1.0` prints as `1`), so re-parsing a
//! serialized value always reproduces the same `f32`. Booleans are integers:
//! `0` is false, anything else is true, and `1` is written back.

use std::fmt;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::ScriptError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A flat RGBA color applied to every vertex of a textured entity.
///
/// Only the RGB channels are ever written to a map script. The alpha channel
/// is derived from the material name (see
/// [`transparent_alpha`](crate::record::transparent_alpha)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque white, the color of every entity with coloring disabled.
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// Positional, typed access to the comma-separated fields of one record.
///
/// Indices are absolute positions in the record, so error messages point at
/// the same column a map author sees.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    fields: &'a [&'a str],
}

impl<'a> Fields<'a> {
    pub(crate) fn new(fields: &'a [&'a str]) -> Self {
        Self { fields }
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn text(&self, index: usize) -> Result<&'a str, ScriptError> {
        self.fields
            .get(index)
            .copied()
            .ok_or(ScriptError::TooFewFields {
                found: self.fields.len(),
                required: index + 1,
            })
    }

    pub(crate) fn float(&self, index: usize, field: &'static str) -> Result<f32, ScriptError> {
        let raw = self.text(index)?;
        parse_float(raw).ok_or_else(|| ScriptError::FieldFormat {
            index,
            field,
            value: raw.to_owned(),
        })
    }

    pub(crate) fn flag(&self, index: usize, field: &'static str) -> Result<bool, ScriptError> {
        let raw = self.text(index)?;
        raw.parse::<i32>()
            .map(|v| v != 0)
            .map_err(|_| ScriptError::FieldFormat {
                index,
                field,
                value: raw.to_owned(),
            })
    }

    pub(crate) fn vec2(&self, index: usize, field: &'static str) -> Result<Vec2, ScriptError> {
        Ok(Vec2::new(
            self.float(index, field)?,
            self.float(index + 1, field)?,
        ))
    }

    pub(crate) fn vec3(&self, index: usize, field: &'static str) -> Result<Vec3, ScriptError> {
        Ok(Vec3::new(
            self.float(index, field)?,
            self.float(index + 1, field)?,
            self.float(index + 2, field)?,
        ))
    }

    /// Reads `x,y,z,w` verbatim. The quaternion is not normalized so that the
    /// authored components survive a round trip.
    pub(crate) fn quat(&self, index: usize, field: &'static str) -> Result<Quat, ScriptError> {
        Ok(Quat::from_xyzw(
            self.float(index, field)?,
            self.float(index + 1, field)?,
            self.float(index + 2, field)?,
            self.float(index + 3, field)?,
        ))
    }
}

/// Parse one decimal float field.
pub fn parse_float(raw: &str) -> Option<f32> {
    raw.parse::<f32>().ok()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub(crate) fn write_flag(f: &mut fmt::Formatter<'_>, value: bool) -> fmt::Result {
    f.write_str(if value { "1" } else { "0" })
}

pub(crate) fn write_vec2(f: &mut fmt::Formatter<'_>, v: Vec2) -> fmt::Result {
    write!(f, "{},{}", v.x, v.y)
}

pub(crate) fn write_vec3(f: &mut fmt::Formatter<'_>, v: Vec3) -> fmt::Result {
    write!(f, "{},{},{}", v.x, v.y, v.z)
}

pub(crate) fn write_quat(f: &mut fmt::Formatter<'_>, q: Quat) -> fmt::Result {
    write!(f, "{},{},{},{}", q.x, q.y, q.z, q.w)
}

pub(crate) fn write_rgb(f: &mut fmt::Formatter<'_>, c: Color) -> fmt::Result {
    write!(f, "{},{},{}", c.r, c.g, c.b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
