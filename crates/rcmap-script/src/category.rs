//! Coarse entity classification derived from a record's type token.
//!
//! A type token such as `base_wall` or `custom` belongs to the first
//! [`Category`] (in declaration order) whose token is a prefix of it. The
//! remainder of the token is kept verbatim on the record for round-tripping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ScriptError;

/// The category of a placeable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Vanilla level geometry (`base`).
    Base,
    /// Player spawn markers (`spawnpoint`).
    SpawnPoint,
    /// Networked actors such as titan spawners (`photon`).
    Networked,
    /// Textured custom geometry (`custom`).
    Custom,
    /// Racing props: start/finish gates, kill planes (`racing`).
    Racing,
    /// Everything else, including regions (`misc`).
    Misc,
}

impl Category {
    /// All categories in declaration order, which is also match priority.
    pub const ALL: [Category; 6] = [
        Category::Base,
        Category::SpawnPoint,
        Category::Networked,
        Category::Custom,
        Category::Racing,
        Category::Misc,
    ];

    /// The token this category is written as in a map script.
    pub fn token(self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::SpawnPoint => "spawnpoint",
            Category::Networked => "photon",
            Category::Custom => "custom",
            Category::Racing => "racing",
            Category::Misc => "misc",
        }
    }

    /// Resolve the category of a full type token.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownType`] if no category token is a prefix
    /// of `type_token`.
    pub fn from_type_token(type_token: &str) -> Result<Self, ScriptError> {
        Self::ALL
            .into_iter()
            .find(|category| type_token.starts_with(category.token()))
            .ok_or_else(|| ScriptError::UnknownType {
                token: type_token.to_owned(),
            })
    }

    /// Spawn markers ignore any authored scale.
    pub fn pins_unit_scale(self) -> bool {
        matches!(self, Category::SpawnPoint | Category::Networked)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_tokens_resolve() {
        for category in Category::ALL {
            assert_eq!(Category::from_type_token(category.token()), Ok(category));
        }
    }

    #[test]
    fn suffixed_tokens_resolve_by_prefix() {
        assert_eq!(Category::from_type_token("base_wall"), Ok(Category::Base));
        assert_eq!(
            Category::from_type_token("photonextra"),
            Ok(Category::Networked)
        );
        assert_eq!(
            Category::from_type_token("spawnpointx"),
            Ok(Category::SpawnPoint)
        );
    }

    #[test]
    fn unknown_token_is_an_error() {
        assert_eq!(
            Category::from_type_token("map"),
            Err(ScriptError::UnknownType {
                token: "map".to_owned()
            })
        );
        // Matching is case sensitive.
        assert!(Category::from_type_token("Base").is_err());
    }

    #[test]
    fn spawn_categories_pin_scale() {
        assert!(Category::SpawnPoint.pins_unit_scale());
        assert!(Category::Networked.pins_unit_scale());
        assert!(!Category::Custom.pins_unit_scale());
    }
}
