//! The in-memory form of one map script record.
//!
//! An [`EntityRecord`] carries the fields every record has (type, name,
//! position, rotation, scale) plus a [`VariantData`] holding exactly the
//! fields of its [`Variant`]. The variant is chosen once, at parse or
//! construction time, and never changes afterwards: renaming a record does not
//! turn it into a region.
//!
//! Setters keep the record's presentation state (its [`Surface`]s) in sync:
//!
//! - [`set_material`](EntityRecord::set_material) retextures every surface.
//!   The first `"default"` assignment captures the surfaces' current materials
//!   as a baseline, later ones restore it. Particle emitters on supply stations
//!   are never retextured.
//! - [`set_tiling`](EntityRecord::set_tiling) multiplies each surface's
//!   current texture scale, unless the material is `"default"`.
//! - [`set_color`](EntityRecord::set_color) floods every vertex with one color.
//! - [`set_rotation`](EntityRecord::set_rotation) is ignored by regions.
//! - [`set_scale`](EntityRecord::set_scale) is ignored by `spawnpoint` and
//!   `photon` records.

use std::fmt;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::assets::{AssetStore, MaterialHandle, SpawnHandle, SurfaceDesc};
use crate::category::Category;
use crate::schema::{SchemaRegistry, Variant};
use crate::values::{self, Color};
use crate::ScriptError;

/// The material name that stands for "whatever the asset shipped with".
pub const DEFAULT_MATERIAL: &str = "default";

/// Materials named `transparent<opacity>` encode their alpha in the suffix.
pub const TRANSPARENT_PREFIX: &str = "transparent";

/// Object names starting with this are supply stations.
const SUPPLY_STATION_PREFIX: &str = "aot_supply";

/// Alpha encoded in a material name, if it is a transparent material.
///
/// Returns `None` for opaque materials and `Some(Err(suffix))` when the
/// suffix after `transparent` is not a number.
pub fn transparent_alpha(material: &str) -> Option<Result<f32, String>> {
    let suffix = material.strip_prefix(TRANSPARENT_PREFIX)?;
    Some(values::parse_float(suffix).ok_or_else(|| suffix.to_owned()))
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Presentation state of one renderable sub-surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub material: String,
    pub texture_scale: Vec2,
    pub particle_emitter: bool,
    pub vertex_count: usize,
    /// Per-vertex colors. Empty until a color is applied.
    pub vertex_colors: Vec<Color>,
}

impl Surface {
    fn assign_material(&mut self, material: &MaterialHandle) {
        self.material = material.name.clone();
        self.texture_scale = material.texture_scale;
    }
}

impl From<&SurfaceDesc> for Surface {
    fn from(desc: &SurfaceDesc) -> Self {
        Self {
            name: desc.name.clone(),
            material: desc.material.name.clone(),
            texture_scale: desc.material.texture_scale,
            particle_emitter: desc.particle_emitter,
            vertex_count: desc.vertex_count,
            vertex_colors: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Variant data
// ---------------------------------------------------------------------------

/// Texturing fields of a [`Variant::Textured`] record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texturing {
    material: String,
    color_enabled: bool,
    color: Color,
    tiling: Vec2,
    /// Raw color text of a record loaded with coloring disabled, written back
    /// unchanged.
    dormant_rgb: Option<[String; 3]>,
    /// Surface materials captured by the first `"default"` assignment.
    default_materials: Option<Vec<String>>,
}

impl Texturing {
    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn tiling(&self) -> Vec2 {
        self.tiling
    }

    pub fn default_materials(&self) -> Option<&[String]> {
        self.default_materials.as_deref()
    }
}

impl Default for Texturing {
    fn default() -> Self {
        Self {
            material: DEFAULT_MATERIAL.to_owned(),
            color_enabled: false,
            color: Color::WHITE,
            tiling: Vec2::ONE,
            dormant_rgb: None,
            default_materials: None,
        }
    }
}

/// Variant-specific fields. One arm per [`Variant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantData {
    Spawner {
        spawn_timer: f32,
        endless_spawn: bool,
    },
    Region {
        region_name: String,
    },
    Textured(Texturing),
    Scaled,
    Bare,
}

impl VariantData {
    pub fn variant(&self) -> Variant {
        match self {
            VariantData::Spawner { .. } => Variant::Spawner,
            VariantData::Region { .. } => Variant::Region,
            VariantData::Textured(_) => Variant::Textured,
            VariantData::Scaled => Variant::Scaled,
            VariantData::Bare => Variant::Bare,
        }
    }

    fn empty(variant: Variant) -> Self {
        match variant {
            Variant::Spawner => VariantData::Spawner {
                spawn_timer: 0.0,
                endless_spawn: false,
            },
            Variant::Region => VariantData::Region {
                region_name: String::new(),
            },
            Variant::Textured => VariantData::Textured(Texturing::default()),
            Variant::Scaled => VariantData::Scaled,
            Variant::Bare => VariantData::Bare,
        }
    }
}

// ---------------------------------------------------------------------------
// EntityRecord
// ---------------------------------------------------------------------------

/// One placeable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    full_type_name: String,
    category: Category,
    object_name: String,
    data: VariantData,
    position: Vec3,
    rotation: Quat,
    /// Authored scale factor, relative to `default_scale`.
    scale: Vec3,
    default_scale: Vec3,
    surfaces: Vec<Surface>,
    raw_field_count: usize,
}

impl EntityRecord {
    /// Place a new entity with default property values.
    ///
    /// The variant is resolved as if the record had the minimum field count,
    /// so `base` and `photon` objects are untextured. Use
    /// [`new_textured`](Self::new_textured) for textured geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownType`] for an unrecognized type token.
    pub fn new(
        full_type_name: &str,
        object_name: &str,
        spawn: &SpawnHandle,
    ) -> Result<Self, ScriptError> {
        Self::placed(full_type_name, object_name, spawn, SchemaRegistry::MIN_RECORD_FIELDS)
    }

    /// Place a new entity, treating `base`/`photon` objects as textured.
    pub fn new_textured(
        full_type_name: &str,
        object_name: &str,
        spawn: &SpawnHandle,
    ) -> Result<Self, ScriptError> {
        Self::placed(full_type_name, object_name, spawn, Variant::Textured.arity())
    }

    fn placed(
        full_type_name: &str,
        object_name: &str,
        spawn: &SpawnHandle,
        field_count: usize,
    ) -> Result<Self, ScriptError> {
        let category = Category::from_type_token(full_type_name)?;
        let variant = SchemaRegistry::resolve(category, object_name, field_count);
        let mut record = Self::instantiate(
            full_type_name,
            category,
            object_name,
            variant,
            variant.arity(),
            spawn,
        );
        if let VariantData::Textured(texturing) = &mut record.data {
            texturing.default_materials =
                Some(record.surfaces.iter().map(|s| s.material.clone()).collect());
        }
        Ok(record)
    }

    /// A record with the given schema and empty variant fields, presenting
    /// `spawn`'s surfaces.
    pub(crate) fn instantiate(
        full_type_name: &str,
        category: Category,
        object_name: &str,
        variant: Variant,
        raw_field_count: usize,
        spawn: &SpawnHandle,
    ) -> Self {
        Self {
            full_type_name: full_type_name.to_owned(),
            category,
            object_name: object_name.to_owned(),
            data: VariantData::empty(variant),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            default_scale: spawn.default_scale,
            surfaces: spawn.surfaces.iter().map(Surface::from).collect(),
            raw_field_count,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// The type token as written, including any suffix after the category.
    pub fn full_type_name(&self) -> &str {
        &self.full_type_name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn variant(&self) -> Variant {
        self.data.variant()
    }

    pub fn data(&self) -> &VariantData {
        &self.data
    }

    /// Number of fields the record was parsed (or is written) with.
    pub fn raw_field_count(&self) -> usize {
        self.raw_field_count
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The record's orientation. Always identity for regions.
    pub fn rotation(&self) -> Quat {
        match self.data {
            VariantData::Region { .. } => Quat::IDENTITY,
            _ => self.rotation,
        }
    }

    /// The authored scale factor.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// The asset's intrinsic scale.
    pub fn default_scale(&self) -> Vec3 {
        self.default_scale
    }

    /// World scale: intrinsic scale times the authored factor.
    pub fn local_scale(&self) -> Vec3 {
        self.default_scale * self.scale
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn texturing(&self) -> Option<&Texturing> {
        match &self.data {
            VariantData::Textured(t) => Some(t),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&str> {
        self.texturing().map(Texturing::material)
    }

    pub fn tiling(&self) -> Option<Vec2> {
        self.texturing().map(Texturing::tiling)
    }

    pub fn color_enabled(&self) -> Option<bool> {
        self.texturing().map(Texturing::color_enabled)
    }

    pub fn color(&self) -> Option<Color> {
        self.texturing().map(Texturing::color)
    }

    pub fn spawn_timer(&self) -> Option<f32> {
        match self.data {
            VariantData::Spawner { spawn_timer, .. } => Some(spawn_timer),
            _ => None,
        }
    }

    pub fn endless_spawn(&self) -> Option<bool> {
        match self.data {
            VariantData::Spawner { endless_spawn, .. } => Some(endless_spawn),
            _ => None,
        }
    }

    pub fn region_name(&self) -> Option<&str> {
        match &self.data {
            VariantData::Region { region_name } => Some(region_name),
            _ => None,
        }
    }

    // -- setters ------------------------------------------------------------

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set the orientation. Regions stay at identity.
    pub fn set_rotation(&mut self, rotation: Quat) {
        if !matches!(self.data, VariantData::Region { .. }) {
            self.rotation = rotation;
        }
    }

    /// Set the authored scale factor. Spawn markers stay at unit scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        if !self.category.pins_unit_scale() {
            self.scale = scale;
        }
    }

    /// Rename the object. The record keeps its variant.
    pub fn set_object_name(&mut self, object_name: &str) {
        self.object_name = object_name.to_owned();
    }

    fn not_in_variant(&self, property: &'static str) -> ScriptError {
        ScriptError::PropertyNotInVariant {
            property,
            variant: self.variant().name(),
        }
    }

    pub fn set_spawn_timer(&mut self, seconds: f32) -> Result<(), ScriptError> {
        match &mut self.data {
            VariantData::Spawner { spawn_timer, .. } => {
                *spawn_timer = seconds;
                Ok(())
            }
            _ => Err(self.not_in_variant("spawn_timer")),
        }
    }

    pub fn set_endless_spawn(&mut self, endless: bool) -> Result<(), ScriptError> {
        match &mut self.data {
            VariantData::Spawner { endless_spawn, .. } => {
                *endless_spawn = endless;
                Ok(())
            }
            _ => Err(self.not_in_variant("endless_spawn")),
        }
    }

    pub fn set_region_name(&mut self, name: &str) -> Result<(), ScriptError> {
        match &mut self.data {
            VariantData::Region { region_name } => {
                *region_name = name.to_owned();
                Ok(())
            }
            _ => Err(self.not_in_variant("region_name")),
        }
    }

    /// Retexture the entity.
    ///
    /// `"default"` captures the current surface materials the first time and
    /// restores them every time after. Any other name is loaded from `assets`
    /// and applied to every surface except a supply station's particles.
    pub fn set_material(
        &mut self,
        material: &str,
        assets: &dyn AssetStore,
    ) -> Result<(), ScriptError> {
        let variant = self.variant();
        let VariantData::Textured(texturing) = &mut self.data else {
            return Err(ScriptError::PropertyNotInVariant {
                property: "material",
                variant: variant.name(),
            });
        };
        texturing.material = material.to_owned();

        if material == DEFAULT_MATERIAL {
            match &texturing.default_materials {
                None => {
                    texturing.default_materials =
                        Some(self.surfaces.iter().map(|s| s.material.clone()).collect());
                }
                Some(baseline) => {
                    for (surface, name) in self.surfaces.iter_mut().zip(baseline) {
                        surface.assign_material(&assets.load_shared_material(name));
                    }
                }
            }
        } else {
            let shared = assets.load_shared_material(material);
            let supply_station = self.object_name.starts_with(SUPPLY_STATION_PREFIX);
            for surface in &mut self.surfaces {
                if surface.particle_emitter && supply_station {
                    continue;
                }
                surface.assign_material(&shared);
            }
        }
        Ok(())
    }

    /// Set the texture tiling.
    ///
    /// Tiling is relative: every surface's current texture scale is multiplied
    /// by `tiling`. Nothing is rescaled while the material is `"default"`.
    pub fn set_tiling(&mut self, tiling: Vec2) -> Result<(), ScriptError> {
        let variant = self.variant();
        let VariantData::Textured(texturing) = &mut self.data else {
            return Err(ScriptError::PropertyNotInVariant {
                property: "tiling",
                variant: variant.name(),
            });
        };
        texturing.tiling = tiling;
        if texturing.material == DEFAULT_MATERIAL {
            return Ok(());
        }
        for surface in &mut self.surfaces {
            surface.texture_scale *= tiling;
        }
        Ok(())
    }

    pub fn set_color_enabled(&mut self, enabled: bool) -> Result<(), ScriptError> {
        let variant = self.variant();
        let VariantData::Textured(texturing) = &mut self.data else {
            return Err(ScriptError::PropertyNotInVariant {
                property: "color_enabled",
                variant: variant.name(),
            });
        };
        texturing.color_enabled = enabled;
        if enabled {
            texturing.dormant_rgb = None;
        }
        Ok(())
    }

    /// Set the flat vertex color of every surface.
    pub fn set_color(&mut self, color: Color) -> Result<(), ScriptError> {
        let variant = self.variant();
        let VariantData::Textured(texturing) = &mut self.data else {
            return Err(ScriptError::PropertyNotInVariant {
                property: "color",
                variant: variant.name(),
            });
        };
        texturing.color = color;
        texturing.dormant_rgb = None;
        for surface in &mut self.surfaces {
            surface.vertex_colors = vec![color; surface.vertex_count];
        }
        Ok(())
    }

    /// Keep the raw color text of a record loaded with coloring disabled.
    pub(crate) fn retain_dormant_rgb(&mut self, rgb: [String; 3]) {
        if let VariantData::Textured(texturing) = &mut self.data {
            texturing.dormant_rgb = Some(rgb);
        }
    }

    /// Fill the texturing of a record written without it from the surfaces
    /// it presents. Coloring is disabled and the color reset to white.
    ///
    /// The first retexturable surface supplies the material and tiling. When
    /// another retexturable surface disagrees with it, the material is empty
    /// and the tiling zero.
    pub(crate) fn adopt_surface_texturing(&mut self) {
        let supply_station = self.object_name.starts_with(SUPPLY_STATION_PREFIX);
        let mut retexturable = self
            .surfaces
            .iter()
            .filter(|surface| !(surface.particle_emitter && supply_station));
        let adopted = retexturable.next().map(|first| {
            let uniform = retexturable.all(|surface| {
                surface.material == first.material && surface.texture_scale == first.texture_scale
            });
            if uniform {
                (first.material.clone(), first.texture_scale)
            } else {
                (String::new(), Vec2::ZERO)
            }
        });

        let VariantData::Textured(texturing) = &mut self.data else {
            return;
        };
        texturing.color_enabled = false;
        texturing.color = Color::WHITE;
        texturing.dormant_rgb = None;
        if let Some((material, tiling)) = adopted {
            texturing.material = material;
            texturing.tiling = tiling;
        }
        for surface in &mut self.surfaces {
            surface.vertex_colors = vec![Color::WHITE; surface.vertex_count];
        }
    }
}

/// Writes the record as one map script line, including the trailing `;`.
impl fmt::Display for EntityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.full_type_name, self.object_name)?;

        match &self.data {
            VariantData::Spawner {
                spawn_timer,
                endless_spawn,
            } => {
                write!(f, ",{spawn_timer},")?;
                values::write_flag(f, *endless_spawn)?;
            }
            VariantData::Region { region_name } => {
                write!(f, ",{region_name},")?;
                values::write_vec3(f, self.scale)?;
            }
            VariantData::Textured(texturing) => {
                write!(f, ",{},", texturing.material)?;
                values::write_vec3(f, self.scale)?;
                f.write_str(",")?;
                values::write_flag(f, texturing.color_enabled)?;
                f.write_str(",")?;
                match (&texturing.dormant_rgb, texturing.color_enabled) {
                    (Some([r, g, b]), false) => write!(f, "{r},{g},{b}")?,
                    _ => values::write_rgb(f, texturing.color)?,
                }
                f.write_str(",")?;
                values::write_vec2(f, texturing.tiling)?;
            }
            VariantData::Scaled => {
                f.write_str(",")?;
                values::write_vec3(f, self.scale)?;
            }
            VariantData::Bare => {}
        }

        f.write_str(",")?;
        values::write_vec3(f, self.position)?;
        f.write_str(",")?;
        values::write_quat(f, self.rotation())?;
        f.write_str(";")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
