//! The asset collaborator consumed while loading a map.
//!
//! The codec never instantiates anything itself. It asks an [`AssetStore`] to
//! resolve a `(category, name)` pair to a [`SpawnHandle`], which describes the
//! entity's intrinsic scale and its renderable surfaces. A failed lookup
//! rejects the record with [`ScriptError::AssetNotFound`](crate::ScriptError).

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::category::Category;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// A shared material as returned by [`AssetStore::load_shared_material`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialHandle {
    pub name: String,
    /// The material's own texture scale before any tiling is applied.
    pub texture_scale: Vec2,
}

impl MaterialHandle {
    /// A material with unit texture scale.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_scale: Vec2::ONE,
        }
    }
}

/// One renderable sub-surface of a spawnable asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDesc {
    pub name: String,
    pub material: MaterialHandle,
    pub vertex_count: usize,
    /// Particle emitters are skipped when retexturing supply stations.
    pub particle_emitter: bool,
}

impl SurfaceDesc {
    pub fn mesh(name: impl Into<String>, material: MaterialHandle, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            material,
            vertex_count,
            particle_emitter: false,
        }
    }

    pub fn particles(name: impl Into<String>, material: MaterialHandle) -> Self {
        Self {
            name: name.into(),
            material,
            vertex_count: 0,
            particle_emitter: true,
        }
    }
}

/// Everything the codec needs from an instantiated asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnHandle {
    /// The asset's intrinsic scale. Authored scale multiplies this.
    pub default_scale: Vec3,
    pub surfaces: Vec<SurfaceDesc>,
}

impl Default for SpawnHandle {
    /// A unit-scale asset with a single 24-vertex mesh.
    fn default() -> Self {
        Self {
            default_scale: Vec3::ONE,
            surfaces: vec![SurfaceDesc::mesh("mesh", MaterialHandle::new("prefab"), 24)],
        }
    }
}

// ---------------------------------------------------------------------------
// Asset keys
// ---------------------------------------------------------------------------

/// Which asset library an object is instantiated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetLibrary {
    /// The base game's level geometry.
    Vanilla,
    /// The mod's asset bundle.
    Mod,
}

/// Library and asset name an object resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    pub library: AssetLibrary,
    pub name: String,
}

/// Map a `(category, object name)` pair to the asset to instantiate.
///
/// `base` objects come from the vanilla library. Barriers and regions are
/// invisible in game, so the editor swaps in `barrierEditor`/`regionEditor`.
pub fn asset_key(category: Category, object_name: &str) -> AssetKey {
    if category == Category::Base {
        AssetKey {
            library: AssetLibrary::Vanilla,
            name: object_name.to_owned(),
        }
    } else if object_name == "barrier" || object_name == "region" {
        AssetKey {
            library: AssetLibrary::Mod,
            name: format!("{object_name}Editor"),
        }
    } else {
        AssetKey {
            library: AssetLibrary::Mod,
            name: object_name.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// AssetStore
// ---------------------------------------------------------------------------

/// Resolves object names to spawnable assets and material names to shared
/// materials.
pub trait AssetStore {
    /// Resolve an object, or `None` if no such asset exists.
    fn resolve(&self, category: Category, object_name: &str) -> Option<SpawnHandle>;

    /// Load a shared material by name. Unknown names yield a blank material.
    fn load_shared_material(&self, name: &str) -> MaterialHandle;
}

/// A `HashMap`-backed [`AssetStore`].
///
/// Objects are registered under their [`AssetKey`]. An optional fallback
/// handle is returned for any unregistered object, which is useful when only
/// the text format matters.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    objects: HashMap<AssetKey, SpawnHandle>,
    materials: HashMap<String, MaterialHandle>,
    fallback: Option<SpawnHandle>,
}

impl AssetCatalog {
    /// An empty catalog that resolves nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that resolves every object to [`SpawnHandle::default`].
    pub fn permissive() -> Self {
        Self {
            fallback: Some(SpawnHandle::default()),
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, handle: SpawnHandle) -> Self {
        self.fallback = Some(handle);
        self
    }

    /// Register an object.
    pub fn insert_object(&mut self, library: AssetLibrary, name: &str, handle: SpawnHandle) {
        self.objects.insert(
            AssetKey {
                library,
                name: name.to_owned(),
            },
            handle,
        );
    }

    /// Register a shared material.
    pub fn insert_material(&mut self, material: MaterialHandle) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl AssetStore for AssetCatalog {
    fn resolve(&self, category: Category, object_name: &str) -> Option<SpawnHandle> {
        self.objects
            .get(&asset_key(category, object_name))
            .or(self.fallback.as_ref())
            .cloned()
    }

    fn load_shared_material(&self, name: &str) -> MaterialHandle {
        self.materials
            .get(name)
            .cloned()
            .unwrap_or_else(|| MaterialHandle::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_objects_come_from_vanilla_library() {
        let key = asset_key(Category::Base, "house1");
        assert_eq!(key.library, AssetLibrary::Vanilla);
        assert_eq!(key.name, "house1");
    }

    #[test]
    fn barriers_and_regions_use_editor_stand_ins() {
        assert_eq!(asset_key(Category::Misc, "region").name, "regionEditor");
        assert_eq!(asset_key(Category::Misc, "barrier").name, "barrierEditor");
        // Only the exact names are swapped.
        assert_eq!(asset_key(Category::Misc, "regionA").name, "regionA");
        // A vanilla object named region stays vanilla.
        assert_eq!(asset_key(Category::Base, "region").name, "region");
    }

    #[test]
    fn catalog_lookup_and_fallback() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_object(AssetLibrary::Mod, "cuboid", SpawnHandle::default());
        assert!(catalog.resolve(Category::Custom, "cuboid").is_some());
        assert!(catalog.resolve(Category::Custom, "sphere").is_none());
        // Registered under the mod library, so a base lookup misses.
        assert!(catalog.resolve(Category::Base, "cuboid").is_none());

        let permissive = AssetCatalog::permissive();
        assert!(permissive.resolve(Category::Base, "anything").is_some());
    }

    #[test]
    fn unknown_materials_are_blank() {
        let mut catalog = AssetCatalog::new();
        catalog.insert_material(MaterialHandle {
            name: "grass".to_owned(),
            texture_scale: Vec2::new(2.0, 2.0),
        });
        assert_eq!(
            catalog.load_shared_material("grass").texture_scale,
            Vec2::new(2.0, 2.0)
        );
        assert_eq!(
            catalog.load_shared_material("stone").texture_scale,
            Vec2::ONE
        );
    }
}
