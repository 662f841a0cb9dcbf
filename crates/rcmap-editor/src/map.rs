//! The map editor session.
//!
//! [`MapEditor`] owns the loaded map: its records in document order, the
//! region labels, the bounds flag, a clipboard, and the selection. It is the
//! only place where the codec and the selection aggregate meet. Records are
//! addressed by [`RecordId`]; an id stays valid until its record is removed.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};
use rcmap_script::assets::AssetStore;
use rcmap_script::codec::{serialize, Diagnostic, MapCodec, ParsedDocument, RegionLabel};
use rcmap_script::document::Document;
use rcmap_script::record::EntityRecord;
use rcmap_select::pivot::PivotSignal;
use rcmap_select::placements::Placements;
use rcmap_select::selection::SelectionAggregate;
use rcmap_select::tool::{GroupTransform, Tool};
use tracing::debug;

use crate::collaborators::{FlatHierarchy, GroupHierarchy, PickHit, PickSurface};
use crate::config::EditorConfig;
use crate::entity::{RecordAllocator, RecordId};
use crate::EditorError;

// ---------------------------------------------------------------------------
// RecordTable
// ---------------------------------------------------------------------------

/// Records keyed by id, plus their document order.
#[derive(Debug, Default)]
struct RecordTable {
    records: HashMap<RecordId, EntityRecord>,
    order: Vec<RecordId>,
}

impl RecordTable {
    fn insert(&mut self, id: RecordId, record: EntityRecord) {
        self.records.insert(id, record);
        self.order.push(id);
    }

    fn remove(&mut self, id: RecordId) -> Option<EntityRecord> {
        let record = self.records.remove(&id)?;
        self.order.retain(|&other| other != id);
        Some(record)
    }

    /// Remove every id in `ids`, returning the removed records in document
    /// order.
    fn remove_all(&mut self, ids: &HashSet<RecordId>) -> Vec<(RecordId, EntityRecord)> {
        let removed: Vec<(RecordId, EntityRecord)> = self
            .order
            .iter()
            .filter(|id| ids.contains(*id))
            .filter_map(|&id| self.records.remove(&id).map(|record| (id, record)))
            .collect();
        self.order.retain(|id| !ids.contains(id));
        removed
    }

    fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
    }

    fn in_order(&self) -> impl Iterator<Item = (RecordId, &EntityRecord)> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| (*id, record)))
    }
}

impl Placements<RecordId> for RecordTable {
    fn position(&self, id: RecordId) -> Option<Vec3> {
        self.records.get(&id).map(EntityRecord::position)
    }

    fn rotation(&self, id: RecordId) -> Option<Quat> {
        self.records.get(&id).map(EntityRecord::rotation)
    }

    fn scale(&self, id: RecordId) -> Option<Vec3> {
        self.records.get(&id).map(EntityRecord::scale)
    }

    fn set_position(&mut self, id: RecordId, position: Vec3) {
        if let Some(record) = self.records.get_mut(&id) {
            record.set_position(position);
        }
    }

    fn set_rotation(&mut self, id: RecordId, rotation: Quat) {
        if let Some(record) = self.records.get_mut(&id) {
            record.set_rotation(rotation);
        }
    }

    fn set_scale(&mut self, id: RecordId, scale: Vec3) {
        if let Some(record) = self.records.get_mut(&id) {
            record.set_scale(scale);
        }
    }
}

/// A copied record and the label it carried.
#[derive(Debug, Clone)]
struct ClipboardEntry {
    record: EntityRecord,
    label: Option<String>,
}

// ---------------------------------------------------------------------------
// MapEditor
// ---------------------------------------------------------------------------

/// One editing session over one map.
pub struct MapEditor<A> {
    assets: A,
    config: EditorConfig,
    hierarchy: Box<dyn GroupHierarchy>,
    ids: RecordAllocator,
    table: RecordTable,
    labels: HashMap<RecordId, String>,
    selection: SelectionAggregate<RecordId>,
    clipboard: Vec<ClipboardEntry>,
    bounds_disabled: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<A: AssetStore> MapEditor<A> {
    pub fn new(assets: A) -> Self {
        Self::with_config(assets, EditorConfig::default())
    }

    pub fn with_config(assets: A, config: EditorConfig) -> Self {
        Self {
            assets,
            selection: SelectionAggregate::with_tool(config.initial_tool),
            config,
            hierarchy: Box::new(FlatHierarchy),
            ids: RecordAllocator::new(),
            table: RecordTable::default(),
            labels: HashMap::new(),
            clipboard: Vec::new(),
            bounds_disabled: false,
            diagnostics: Vec::new(),
        }
    }

    /// Replace the grouping hierarchy used to resolve clicks.
    pub fn with_hierarchy(mut self, hierarchy: impl GroupHierarchy + 'static) -> Self {
        self.hierarchy = Box::new(hierarchy);
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.table.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.order.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.table.records.contains_key(&id)
    }

    pub fn record(&self, id: RecordId) -> Option<&EntityRecord> {
        self.table.records.get(&id)
    }

    /// Ids in document order.
    pub fn ids(&self) -> &[RecordId] {
        &self.table.order
    }

    /// Records in document order.
    pub fn records(&self) -> impl Iterator<Item = (RecordId, &EntityRecord)> {
        self.table.in_order()
    }

    /// The floating label of a region loaded as `misc,region`.
    pub fn region_label(&self, id: RecordId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn bounds_disabled(&self) -> bool {
        self.bounds_disabled
    }

    pub fn set_bounds_disabled(&mut self, disabled: bool) {
        self.bounds_disabled = disabled;
    }

    /// Records skipped by the most recent load.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn selection(&self) -> &SelectionAggregate<RecordId> {
        &self.selection
    }

    pub fn tool(&self) -> Tool {
        self.selection.tool()
    }

    /// Take the pivot signals queued since the last call.
    pub fn drain_pivot_signals(&mut self) -> Vec<PivotSignal> {
        self.selection.drain_signals()
    }

    /// A snapshot of the map as a [`Document`].
    pub fn document(&self) -> Document {
        Document {
            bounds_disabled: self.bounds_disabled,
            records: self.table.in_order().map(|(_, r)| r.clone()).collect(),
        }
    }

    // -- map lifecycle ------------------------------------------------------

    /// Parse `text` and append its records to the map.
    ///
    /// Every loaded record is selectable. A bounds directive disables the
    /// bounds; an absent one leaves the flag alone. Returns the new ids in
    /// document order.
    pub fn load_map(&mut self, text: &str) -> Vec<RecordId> {
        let codec = MapCodec::new(&self.assets).log_skipped(self.config.log_skipped_records);
        let mut labels: Vec<RegionLabel> = Vec::new();
        let parsed = codec.parse_with_labels(text, &mut labels);
        self.absorb(parsed, labels)
    }

    /// [`load_map`](Self::load_map) from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Script`] if `bytes` is not UTF-8. Nothing is
    /// loaded in that case.
    pub fn load_map_bytes(&mut self, bytes: &[u8]) -> Result<Vec<RecordId>, EditorError> {
        let text = std::str::from_utf8(bytes).map_err(rcmap_script::ScriptError::from)?;
        Ok(self.load_map(text))
    }

    fn absorb(&mut self, parsed: ParsedDocument, labels: Vec<RegionLabel>) -> Vec<RecordId> {
        let ParsedDocument {
            document,
            diagnostics,
        } = parsed;
        self.bounds_disabled |= document.bounds_disabled;
        self.diagnostics = diagnostics;

        let ids: Vec<RecordId> = document
            .records
            .into_iter()
            .map(|record| self.insert(record))
            .collect();
        for label in labels {
            if let Some(&id) = ids.get(label.record_index) {
                self.labels.insert(id, label.text);
            }
        }

        debug!(
            loaded = ids.len(),
            skipped = self.diagnostics.len(),
            total = self.len(),
            bounds_disabled = self.bounds_disabled,
            "loaded map"
        );
        ids
    }

    /// Remove every record and reset the selection and bounds.
    pub fn clear_map(&mut self) {
        let cleared = self.len();
        self.selection.reset();
        self.table.clear();
        self.labels.clear();
        self.ids.clear();
        self.bounds_disabled = false;
        debug!(cleared, "cleared map");
    }

    /// The map as map script text, in document order.
    pub fn export(&self) -> String {
        let records: Vec<EntityRecord> = self.table.in_order().map(|(_, r)| r.clone()).collect();
        serialize(self.bounds_disabled, &records)
    }

    // -- records ------------------------------------------------------------

    fn insert(&mut self, record: EntityRecord) -> RecordId {
        let id = self.ids.allocate();
        self.table.insert(id, record);
        self.selection.add_selectable(id);
        id
    }

    /// Append a record to the map and make it selectable.
    pub fn add_record(&mut self, record: EntityRecord) -> RecordId {
        self.insert(record)
    }

    /// Remove a record from the map and the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownRecord`] for a stale id.
    pub fn remove_record(&mut self, id: RecordId) -> Result<EntityRecord, EditorError> {
        if !self.contains(id) {
            return Err(EditorError::UnknownRecord { id });
        }
        self.selection.remove_selectable(id, &self.table);
        self.labels.remove(&id);
        self.ids.release(id);
        self.table
            .remove(id)
            .ok_or(EditorError::UnknownRecord { id })
    }

    /// Edit one record in place, keeping the selection centroid exact.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownRecord`] for a stale id, or whatever
    /// script error `edit` returns.
    pub fn edit_record<R>(
        &mut self,
        id: RecordId,
        edit: impl FnOnce(&mut EntityRecord, &A) -> Result<R, rcmap_script::ScriptError>,
    ) -> Result<R, EditorError> {
        if !self.contains(id) {
            return Err(EditorError::UnknownRecord { id });
        }
        // Take it out of the running sum while its position may change.
        let was_selected = self.selection.deselect(id, &self.table);
        let result = match self.table.records.get_mut(&id) {
            Some(record) => edit(record, &self.assets).map_err(EditorError::from),
            None => Err(EditorError::UnknownRecord { id }),
        };
        if was_selected {
            self.selection.select(id, &self.table);
        }
        result
    }

    // -- clipboard ----------------------------------------------------------

    /// Copy the selected records, replacing the clipboard. Returns the number
    /// copied; with nothing selected the clipboard is left alone.
    pub fn copy_selection(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let selected = self.selection.selected();
        self.clipboard = self
            .table
            .in_order()
            .filter(|(id, _)| selected.contains(id))
            .map(|(id, record)| ClipboardEntry {
                record: record.clone(),
                label: self.labels.get(&id).cloned(),
            })
            .collect();
        self.clipboard.len()
    }

    pub fn clipboard_len(&self) -> usize {
        self.clipboard.len()
    }

    /// Insert a copy of every clipboard record and select exactly those.
    ///
    /// Switches to the configured paste tool. Returns the new ids.
    pub fn paste(&mut self) -> Vec<RecordId> {
        self.selection.deselect_all();
        let entries = self.clipboard.clone();
        let mut pasted = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = self.insert(entry.record);
            if let Some(label) = entry.label {
                self.labels.insert(id, label);
            }
            self.selection.select(id, &self.table);
            pasted.push(id);
        }
        self.selection.set_tool(self.config.paste_tool, &self.table);
        debug!(pasted = pasted.len(), "pasted clipboard");
        pasted
    }

    /// Remove every selected record from the map and return them in
    /// document order.
    pub fn delete_selection(&mut self) -> Vec<EntityRecord> {
        let removed: HashSet<RecordId> = self.selection.remove_selected();
        let mut records = Vec::with_capacity(removed.len());
        for (id, record) in self.table.remove_all(&removed) {
            self.labels.remove(&id);
            self.ids.release(id);
            records.push(record);
        }
        debug!(deleted = records.len(), remaining = self.len(), "deleted selection");
        records
    }

    // -- selection ----------------------------------------------------------

    pub fn select(&mut self, id: RecordId) -> bool {
        self.selection.select(id, &self.table)
    }

    pub fn deselect(&mut self, id: RecordId) -> bool {
        self.selection.deselect(id, &self.table)
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    /// Resolve a click on the map.
    ///
    /// Missing or unselectable hits clear the selection unless `additive`.
    /// A selectable hit resolves to its selection root, which then replaces
    /// the selection, or is toggled when `additive`.
    pub fn click(&mut self, hit: Option<PickHit>, additive: bool) {
        let hit = match hit {
            Some(hit) if hit.selectable => hit,
            _ => {
                if !additive {
                    self.selection.deselect_all();
                }
                return;
            }
        };

        let root = self.hierarchy.selection_root(hit.id);
        if !additive {
            self.selection.deselect_all();
            self.selection.select(root, &self.table);
        } else if !self.selection.deselect(root, &self.table) {
            self.selection.select(root, &self.table);
        }
    }

    /// Pick at `point` and resolve the result as a click.
    pub fn click_at(&mut self, surface: &dyn PickSurface, point: Vec3, additive: bool) {
        self.click(surface.pick(point), additive);
    }

    /// Deselect everything if anything is selected, else select everything.
    pub fn toggle_select_all(&mut self) {
        if self.selection.is_empty() {
            self.selection.select_all(&self.table);
        } else {
            self.selection.deselect_all();
        }
    }

    pub fn invert_selection(&mut self) {
        self.selection.invert(&self.table);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.selection.set_tool(tool, &self.table);
    }

    /// Apply one frame of gizmo drag to the selected records.
    pub fn drag(&mut self, transform: GroupTransform) {
        self.selection.apply_group_transform(transform, &mut self.table);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
