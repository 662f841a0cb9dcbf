//! Map script parsing with per-record fault isolation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assets::AssetStore;
use crate::category::Category;
use crate::document::Document;
use crate::record::{transparent_alpha, EntityRecord};
use crate::schema::{SchemaRegistry, Variant};
use crate::values::{Color, Fields};
use crate::ScriptError;

/// Characters removed from the whole document before splitting.
const INSIGNIFICANT: [char; 4] = ['\n', '\r', '\t', ' '];

/// Records starting with this are comments.
const COMMENT_MARKER: &str = "//";

/// Remove every newline, carriage return, tab and space.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !INSIGNIFICANT.contains(c)).collect()
}

/// Split stripped document text into raw records, dropping empty segments.
pub fn split_records(stripped: &str) -> impl Iterator<Item = &str> {
    stripped.split(';').filter(|segment| !segment.is_empty())
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// A record that was skipped during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Index of the record among the document's non-empty `;`-separated
    /// segments, starting at 0.
    pub line: usize,
    /// The record text, whitespace already stripped.
    pub raw: String,
    pub error: ScriptError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipping record {} ({}): {}", self.line, self.raw, self.error)
    }
}

// ---------------------------------------------------------------------------
// Region labels
// ---------------------------------------------------------------------------

/// A floating label requested for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLabel {
    /// Index of the region in [`Document::records`].
    pub record_index: usize,
    pub text: String,
}

/// Receives the labels the codec requests for `misc,region` records.
pub trait RegionLabels {
    fn spawn_label(&mut self, record_index: usize, region_name: &str);
}

impl RegionLabels for Vec<RegionLabel> {
    fn spawn_label(&mut self, record_index: usize, region_name: &str) {
        self.push(RegionLabel {
            record_index,
            text: region_name.to_owned(),
        });
    }
}

// ---------------------------------------------------------------------------
// ParsedDocument
// ---------------------------------------------------------------------------

/// The result of parsing one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Every valid record, in document order, and the bounds flag.
    pub document: Document,
    /// One entry per skipped record, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedDocument {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// What a single raw record turned out to be.
enum Parsed {
    Directive,
    Entity(EntityRecord),
}

// ---------------------------------------------------------------------------
// MapCodec
// ---------------------------------------------------------------------------

/// Parses map script documents, resolving objects through an [`AssetStore`].
#[derive(Clone, Copy)]
pub struct MapCodec<'a> {
    assets: &'a dyn AssetStore,
    log_skipped: bool,
}

impl<'a> MapCodec<'a> {
    pub fn new(assets: &'a dyn AssetStore) -> Self {
        Self {
            assets,
            log_skipped: true,
        }
    }

    /// Whether skipped records are also logged at `warn` level.
    pub fn log_skipped(mut self, enabled: bool) -> Self {
        self.log_skipped = enabled;
        self
    }

    /// Parse a document. Region labels are discarded.
    pub fn parse(&self, text: &str) -> ParsedDocument {
        let mut labels: Vec<RegionLabel> = Vec::new();
        self.parse_with_labels(text, &mut labels)
    }

    /// Parse raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::InvalidUtf8`] if `bytes` is not UTF-8. This is
    /// the only error that escapes parsing; record errors become diagnostics.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedDocument, ScriptError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.parse(text))
    }

    /// Parse a document, requesting a label for every `misc,region` record.
    pub fn parse_with_labels(
        &self,
        text: &str,
        labels: &mut dyn RegionLabels,
    ) -> ParsedDocument {
        let stripped = strip_whitespace(text);
        let mut parsed = ParsedDocument::default();

        for (line, raw) in split_records(&stripped).enumerate() {
            if raw.starts_with(COMMENT_MARKER) {
                continue;
            }

            match self.parse_record(raw) {
                Ok(Parsed::Directive) => parsed.document.bounds_disabled = true,
                Ok(Parsed::Entity(record)) => {
                    if record.category() == Category::Misc && record.object_name() == "region" {
                        if let Some(region_name) = record.region_name() {
                            labels.spawn_label(parsed.document.records.len(), region_name);
                        }
                    }
                    parsed.document.records.push(record);
                }
                Err(error) => {
                    if self.log_skipped {
                        warn!(line, raw = %raw, error = %error, "skipping map script record");
                    }
                    parsed.diagnostics.push(Diagnostic {
                        line,
                        raw: raw.to_owned(),
                        error,
                    });
                }
            }
        }

        debug!(
            records = parsed.document.records.len(),
            diagnostics = parsed.diagnostics.len(),
            bounds_disabled = parsed.document.bounds_disabled,
            "parsed map script"
        );
        parsed
    }

    fn parse_record(&self, raw: &str) -> Result<Parsed, ScriptError> {
        let split: Vec<&str> = raw.split(',').collect();
        let fields = Fields::new(&split);

        if is_bounds_directive(&split) {
            return Ok(Parsed::Directive);
        }
        if fields.len() < SchemaRegistry::MIN_RECORD_FIELDS {
            return Err(ScriptError::TooFewFields {
                found: fields.len(),
                required: SchemaRegistry::MIN_RECORD_FIELDS,
            });
        }

        let type_token = fields.text(0)?;
        let object_name = fields.text(1)?;
        let category = Category::from_type_token(type_token)?;
        let variant = SchemaRegistry::resolve(category, object_name, fields.len());
        // Short textured records carry only a transform.
        let partial = fields.len() < variant.arity();
        if partial && variant != Variant::Textured {
            return Err(ScriptError::TooFewFields {
                found: fields.len(),
                required: variant.arity(),
            });
        }

        let spawn = self
            .assets
            .resolve(category, object_name)
            .ok_or_else(|| ScriptError::AssetNotFound {
                category,
                name: object_name.to_owned(),
            })?;

        let mut record = EntityRecord::instantiate(
            type_token,
            category,
            object_name,
            variant,
            fields.len().max(variant.arity()),
            &spawn,
        );
        let offset = if partial {
            record.adopt_surface_texturing();
            Variant::Bare.position_offset()
        } else {
            self.read_variant_fields(&mut record, &fields)?;
            variant.position_offset()
        };

        record.set_position(fields.vec3(offset, "position")?);
        record.set_rotation(fields.quat(offset + 3, "rotation")?);
        Ok(Parsed::Entity(record))
    }

    /// Populate the fields between the name and the position.
    fn read_variant_fields(
        &self,
        record: &mut EntityRecord,
        fields: &Fields<'_>,
    ) -> Result<(), ScriptError> {
        match record.variant() {
            Variant::Spawner => {
                record.set_spawn_timer(fields.float(2, "spawn_timer")?)?;
                record.set_endless_spawn(fields.flag(3, "endless_spawn")?)?;
            }
            Variant::Region => {
                record.set_region_name(fields.text(2)?)?;
                record.set_scale(fields.vec3(3, "scale")?);
            }
            Variant::Textured => {
                let material = fields.text(2)?;
                record.set_material(material, self.assets)?;
                record.set_scale(fields.vec3(3, "scale")?);

                let color_enabled = fields.flag(6, "color_enabled")?;
                record.set_color_enabled(color_enabled)?;
                if color_enabled {
                    let alpha = match transparent_alpha(material) {
                        None => 1.0,
                        Some(Ok(alpha)) => alpha,
                        Some(Err(_)) => {
                            return Err(ScriptError::FieldFormat {
                                index: 2,
                                field: "material",
                                value: material.to_owned(),
                            })
                        }
                    };
                    let rgb = fields.vec3(7, "color")?;
                    record.set_color(Color::rgba(rgb.x, rgb.y, rgb.z, alpha))?;
                } else {
                    record.set_color(Color::WHITE)?;
                    record.retain_dormant_rgb([
                        fields.text(7)?.to_owned(),
                        fields.text(8)?.to_owned(),
                        fields.text(9)?.to_owned(),
                    ]);
                }

                record.set_tiling(fields.vec2(10, "tiling")?)?;
            }
            Variant::Scaled => {
                record.set_scale(fields.vec3(2, "scale")?);
            }
            Variant::Bare => {}
        }
        Ok(())
    }
}

impl fmt::Debug for MapCodec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCodec")
            .field("log_skipped", &self.log_skipped)
            .finish_non_exhaustive()
    }
}

/// `map,disablebounds`, matched by prefix on both fields.
fn is_bounds_directive(fields: &[&str]) -> bool {
    matches!(
        fields,
        [first, second, ..] if first.starts_with("map") && second.starts_with("disablebounds")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
