//! Map script serialization.

use crate::document::ScriptWriter;
use crate::record::EntityRecord;

/// Serialize records, in the given order, as map script text.
///
/// With `bounds_disabled` the `map,disablebounds;` directive comes first.
/// Every line, directive included, ends with a newline.
pub fn serialize(bounds_disabled: bool, records: &[EntityRecord]) -> String {
    ScriptWriter::new(bounds_disabled, records).to_string()
}
