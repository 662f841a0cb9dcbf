//! Per-record field schemas.
//!
//! Every record starts with `type,name` and ends with
//! `px,py,pz,rx,ry,rz,rw`. What sits in between depends on the record's
//! [`Variant`], which [`SchemaRegistry::resolve`] picks from the category, the
//! object name and the number of fields the record was written with. The
//! field count is part of the key: a `base` record with 15 or more fields is
//! textured, the same record with 9 is not.

use serde::{Deserialize, Serialize};

use crate::category::Category;

// ---------------------------------------------------------------------------
// Field slots
// ---------------------------------------------------------------------------

/// How a single text field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Decimal `f32`.
    Float,
    /// Integer flag, `0` is false.
    Flag,
    /// Verbatim text.
    Text,
}

/// One positional field of a variant's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn slot(name: &'static str, kind: FieldKind) -> FieldSlot {
    FieldSlot { name, kind }
}

const SPAWNER_FIELDS: &[FieldSlot] = &[
    slot("spawn_timer", FieldKind::Float),
    slot("endless_spawn", FieldKind::Flag),
];

const REGION_FIELDS: &[FieldSlot] = &[
    slot("region_name", FieldKind::Text),
    slot("scale_x", FieldKind::Float),
    slot("scale_y", FieldKind::Float),
    slot("scale_z", FieldKind::Float),
];

const TEXTURED_FIELDS: &[FieldSlot] = &[
    slot("material", FieldKind::Text),
    slot("scale_x", FieldKind::Float),
    slot("scale_y", FieldKind::Float),
    slot("scale_z", FieldKind::Float),
    slot("color_enabled", FieldKind::Flag),
    slot("color_r", FieldKind::Float),
    slot("color_g", FieldKind::Float),
    slot("color_b", FieldKind::Float),
    slot("tiling_x", FieldKind::Float),
    slot("tiling_y", FieldKind::Float),
];

const SCALED_FIELDS: &[FieldSlot] = &[
    slot("scale_x", FieldKind::Float),
    slot("scale_y", FieldKind::Float),
    slot("scale_z", FieldKind::Float),
];

/// Fields shared by every variant: two leading, seven trailing.
pub const HEADER_FIELDS: usize = 2;
pub const TRANSFORM_FIELDS: usize = 7;

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// The schema a record was parsed with. Fixed for the record's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Networked titan spawner: `spawnTimer, endlessSpawn`.
    Spawner,
    /// Named region volume: `regionName, scale`. Rotation is always identity.
    Region,
    /// Textured geometry: `material, scale, colorEnabled, rgb, tiling`.
    Textured,
    /// Scaled prop: `scale`.
    Scaled,
    /// Position and rotation only.
    Bare,
}

impl Variant {
    /// The variant-specific fields between the name and the position.
    pub fn fields(self) -> &'static [FieldSlot] {
        match self {
            Variant::Spawner => SPAWNER_FIELDS,
            Variant::Region => REGION_FIELDS,
            Variant::Textured => TEXTURED_FIELDS,
            Variant::Scaled => SCALED_FIELDS,
            Variant::Bare => &[],
        }
    }

    /// Index of the first position field.
    pub fn position_offset(self) -> usize {
        HEADER_FIELDS + self.fields().len()
    }

    /// Number of fields a record of this variant is written with.
    pub fn arity(self) -> usize {
        self.position_offset() + TRANSFORM_FIELDS
    }

    /// Whether the variant carries an authored scale.
    pub fn has_scale(self) -> bool {
        matches!(self, Variant::Region | Variant::Textured | Variant::Scaled)
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Spawner => "spawner",
            Variant::Region => "region",
            Variant::Textured => "textured",
            Variant::Scaled => "scaled",
            Variant::Bare => "bare",
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// Selects the [`Variant`] for a record.
///
/// All schema decisions live here so adding a variant only means adding a
/// rule to [`resolve`](Self::resolve).
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Records shorter than this are rejected before any variant is chosen.
    pub const MIN_RECORD_FIELDS: usize = 9;
    /// `base` and `photon` records with at least this many fields are textured.
    pub const TEXTURED_FIELD_THRESHOLD: usize = 15;

    /// Pick the variant for `(category, object_name, raw_field_count)`.
    ///
    /// Rules, first match wins:
    ///
    /// 1. `photon` named `spawn*` is a [`Variant::Spawner`].
    /// 2. Anything named `region*` is a [`Variant::Region`].
    /// 3. `custom`, or `base`/`photon` with at least
    ///    [`TEXTURED_FIELD_THRESHOLD`](Self::TEXTURED_FIELD_THRESHOLD) fields,
    ///    is [`Variant::Textured`].
    /// 4. `racing` and `misc` are [`Variant::Scaled`].
    /// 5. Everything else is [`Variant::Bare`].
    pub fn resolve(category: Category, object_name: &str, raw_field_count: usize) -> Variant {
        if category == Category::Networked && object_name.starts_with("spawn") {
            Variant::Spawner
        } else if object_name.starts_with("region") {
            Variant::Region
        } else if category == Category::Custom
            || (raw_field_count >= Self::TEXTURED_FIELD_THRESHOLD
                && matches!(category, Category::Base | Category::Networked))
        {
            Variant::Textured
        } else if matches!(category, Category::Racing | Category::Misc) {
            Variant::Scaled
        } else {
            Variant::Bare
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_offsets_match_the_format() {
        assert_eq!(Variant::Spawner.position_offset(), 4);
        assert_eq!(Variant::Region.position_offset(), 6);
        assert_eq!(Variant::Textured.position_offset(), 12);
        assert_eq!(Variant::Scaled.position_offset(), 5);
        assert_eq!(Variant::Bare.position_offset(), 2);
        assert_eq!(Variant::Textured.arity(), 19);
        assert_eq!(Variant::Bare.arity(), SchemaRegistry::MIN_RECORD_FIELDS);
    }

    #[test]
    fn field_count_selects_textured_base() {
        assert_eq!(
            SchemaRegistry::resolve(Category::Base, "wall1", 19),
            Variant::Textured
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::Base, "wall1", 15),
            Variant::Textured
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::Base, "wall1", 14),
            Variant::Bare
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::Base, "wall1", 9),
            Variant::Bare
        );
    }

    #[test]
    fn custom_is_always_textured() {
        assert_eq!(
            SchemaRegistry::resolve(Category::Custom, "cuboid", 9),
            Variant::Textured
        );
    }

    #[test]
    fn spawner_needs_networked_category() {
        assert_eq!(
            SchemaRegistry::resolve(Category::Networked, "spawnTitan", 11),
            Variant::Spawner
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::Misc, "spawnTitan", 12),
            Variant::Scaled
        );
        // A networked spawner wins over the field-count rule.
        assert_eq!(
            SchemaRegistry::resolve(Category::Networked, "spawnTitan", 19),
            Variant::Spawner
        );
    }

    #[test]
    fn region_name_beats_category() {
        assert_eq!(
            SchemaRegistry::resolve(Category::Misc, "region", 13),
            Variant::Region
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::Custom, "regionA", 13),
            Variant::Region
        );
    }

    #[test]
    fn scaled_and_bare_fallbacks() {
        assert_eq!(
            SchemaRegistry::resolve(Category::Racing, "startline", 12),
            Variant::Scaled
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::SpawnPoint, "playerC", 9),
            Variant::Bare
        );
        assert_eq!(
            SchemaRegistry::resolve(Category::Networked, "aot_supply", 9),
            Variant::Bare
        );
    }

    #[test]
    fn scale_presence_per_variant() {
        assert!(Variant::Region.has_scale());
        assert!(Variant::Textured.has_scale());
        assert!(Variant::Scaled.has_scale());
        assert!(!Variant::Spawner.has_scale());
        assert!(!Variant::Bare.has_scale());
    }
}
