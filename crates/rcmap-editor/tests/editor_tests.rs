//! Integration tests for editing sessions: load, click selection, clipboard,
//! delete, and export.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use rcmap_editor::prelude::*;
use rcmap_script::assets::{AssetCatalog, AssetLibrary, SpawnHandle};
use rcmap_script::ScriptError;

const ARENA: &str = "
map,disablebounds;
base,house,0,0,0,0,0,0,1;
base,tree,10,0,0,0,0,0,1;
custom,cuboid,stone,1,1,1,1,1,0,0,1,1,0,0,10,0,0,0,1;
misc,region,arena,30,10,30,0,5,0,0,0,0,1;
photon,spawnTitan,30,1,-20,0,0,0,0,0,1;
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn arena() -> (MapEditor<AssetCatalog>, Vec<RecordId>) {
    init_tracing();
    let mut map = MapEditor::new(AssetCatalog::permissive());
    let ids = map.load_map(ARENA);
    assert_eq!(ids.len(), 5);
    assert!(map.diagnostics().is_empty());
    (map, ids)
}

/// Picks whatever is registered at an exact point.
struct PointPicker(Vec<(Vec3, PickHit)>);

impl PickSurface for PointPicker {
    fn pick(&self, point: Vec3) -> Option<PickHit> {
        self.0.iter().find(|(p, _)| *p == point).map(|(_, hit)| *hit)
    }
}

// ---------------------------------------------------------------------------
// Loading and export
// ---------------------------------------------------------------------------

#[test]
fn export_round_trips_loaded_map() {
    let (map, _) = arena();
    assert!(map.bounds_disabled());
    let compact: String = ARENA.split_whitespace().collect();
    let exported: String = map.export().split_whitespace().collect();
    assert_eq!(exported, compact);
}

#[test]
fn bad_records_are_reported_and_skipped() {
    init_tracing();
    let mut map = MapEditor::new(AssetCatalog::permissive());
    let ids = map.load_map("base,a,0,0,0,0,0,0,1;base,b,x,0,0,0,0,0,1;base,c,0,0,0,0,0,0,1;");
    assert_eq!(ids.len(), 2);
    assert_eq!(map.diagnostics().len(), 1);
    assert_eq!(map.diagnostics()[0].line, 1);

    // A clean reload replaces the diagnostics.
    map.load_map("base,d,0,0,0,0,0,0,1;");
    assert!(map.diagnostics().is_empty());
    assert_eq!(map.len(), 3);
}

#[test]
fn missing_assets_are_skipped() {
    let mut assets = AssetCatalog::new();
    assets.insert_object(AssetLibrary::Vanilla, "house", SpawnHandle::default());
    assets.insert_object(AssetLibrary::Mod, "regionEditor", SpawnHandle::default());
    let config = EditorConfig {
        log_skipped_records: false,
        ..EditorConfig::default()
    };
    let mut map = MapEditor::with_config(assets, config);
    let ids = map.load_map(ARENA);
    assert_eq!(ids.len(), 2);
    assert_eq!(map.region_label(ids[1]), Some("arena"));
    assert!(map
        .diagnostics()
        .iter()
        .all(|d| matches!(d.error, ScriptError::AssetNotFound { .. })));
}

#[test]
fn invalid_utf8_loads_nothing() {
    let (mut map, _) = arena();
    let err = map.load_map_bytes(&[0xc3, 0x28]).unwrap_err();
    assert!(matches!(err, EditorError::Script(ScriptError::InvalidUtf8(_))));
    assert_eq!(map.len(), 5);
}

// ---------------------------------------------------------------------------
// Click selection
// ---------------------------------------------------------------------------

#[test]
fn click_replaces_selection() {
    let (mut map, ids) = arena();
    map.click(Some(PickHit::selectable(ids[0])), false);
    map.click(Some(PickHit::selectable(ids[1])), false);
    assert_eq!(map.selection().len(), 1);
    assert!(map.selection().is_selected(ids[1]));
    assert_eq!(map.selection().average(), Some(Vec3::new(10.0, 0.0, 0.0)));
}

#[test]
fn additive_click_toggles() {
    let (mut map, ids) = arena();
    map.click(Some(PickHit::selectable(ids[0])), true);
    map.click(Some(PickHit::selectable(ids[1])), true);
    assert_eq!(map.selection().average(), Some(Vec3::new(5.0, 0.0, 0.0)));
    map.click(Some(PickHit::selectable(ids[0])), true);
    assert_eq!(map.selection().len(), 1);
    assert!(map.selection().is_selected(ids[1]));
}

#[test]
fn empty_or_unselectable_click_clears_unless_additive() {
    let (mut map, ids) = arena();
    map.click(Some(PickHit::selectable(ids[0])), false);

    let terrain = PickHit {
        id: ids[2],
        selectable: false,
    };
    map.click(Some(terrain), true);
    assert_eq!(map.selection().len(), 1);
    map.click(None, true);
    assert_eq!(map.selection().len(), 1);

    map.click(Some(terrain), false);
    assert!(map.selection().is_empty());
    assert!(!map.selection().pivot().visible);
}

#[test]
fn click_selects_composite_parent() {
    init_tracing();
    let mut map = MapEditor::new(AssetCatalog::permissive());
    let ids = map.load_map("base,gate,0,0,0,0,0,0,1;base,gate_door,0,2,0,0,0,0,1;");
    let hierarchy: HashMap<RecordId, ParentKind> =
        [(ids[1], ParentKind::Composite(ids[0]))].into_iter().collect();
    let mut map = map.with_hierarchy(hierarchy);

    map.click(Some(PickHit::selectable(ids[1])), false);
    assert!(map.selection().is_selected(ids[0]));
    assert!(!map.selection().is_selected(ids[1]));
}

#[test]
fn click_at_uses_pick_surface() {
    let (mut map, ids) = arena();
    let picker = PointPicker(vec![(Vec3::new(10.0, 0.0, 0.0), PickHit::selectable(ids[1]))]);
    map.click_at(&picker, Vec3::new(10.0, 0.0, 0.0), false);
    assert!(map.selection().is_selected(ids[1]));
    map.click_at(&picker, Vec3::new(99.0, 0.0, 0.0), false);
    assert!(map.selection().is_empty());
}

#[test]
fn select_all_shortcut_toggles() {
    let (mut map, ids) = arena();
    map.toggle_select_all();
    assert_eq!(map.selection().len(), ids.len());
    map.toggle_select_all();
    assert!(map.selection().is_empty());
}

#[test]
fn invert_swaps_selection() {
    let (mut map, ids) = arena();
    map.select(ids[0]);
    map.invert_selection();
    assert!(!map.selection().is_selected(ids[0]));
    assert_eq!(map.selection().len(), 4);
}

#[test]
fn rotate_tool_orients_pivot_to_lone_selection() {
    let (mut map, ids) = arena();
    map.edit_record(ids[0], |record, _| {
        record.set_rotation(Quat::from_rotation_z(0.5));
        Ok(())
    })
    .unwrap();
    map.select(ids[0]);
    map.drain_pivot_signals();

    map.set_tool(Tool::Rotate);
    assert_eq!(
        map.drain_pivot_signals(),
        vec![PivotSignal::SetRotation(Quat::from_rotation_z(0.5))]
    );
}

// ---------------------------------------------------------------------------
// Clipboard and delete
// ---------------------------------------------------------------------------

#[test]
fn paste_selects_exactly_the_copies() {
    let (mut map, ids) = arena();
    map.set_tool(Tool::Scale);
    map.select(ids[0]);
    map.select(ids[3]);
    assert_eq!(map.copy_selection(), 2);

    let pasted = map.paste();
    assert_eq!(pasted.len(), 2);
    assert_eq!(map.len(), 7);
    assert_eq!(map.selection().len(), 2);
    assert!(pasted.iter().all(|&id| map.selection().is_selected(id)));
    assert_eq!(map.tool(), Tool::Translate);

    // Copies carry values and the region label.
    assert_eq!(map.record(pasted[1]), map.record(ids[3]));
    assert_eq!(map.region_label(pasted[1]), Some("arena"));
}

#[test]
fn paste_tool_comes_from_config() {
    let config = EditorConfig::from_json_str(r#"{ "paste_tool": "rotate" }"#).unwrap();
    let mut map = MapEditor::with_config(AssetCatalog::permissive(), config);
    let ids = map.load_map(ARENA);
    map.select(ids[1]);
    map.copy_selection();
    map.paste();
    assert_eq!(map.tool(), Tool::Rotate);
}

#[test]
fn copy_with_empty_selection_keeps_clipboard() {
    let (mut map, ids) = arena();
    map.select(ids[0]);
    map.copy_selection();
    map.deselect_all();
    assert_eq!(map.copy_selection(), 0);
    assert_eq!(map.clipboard_len(), 1);
}

#[test]
fn delete_removes_selected_records() {
    let (mut map, ids) = arena();
    map.select(ids[1]);
    map.select(ids[3]);
    let removed = map.delete_selection();
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].object_name(), "tree");
    assert_eq!(removed[1].object_name(), "region");

    assert_eq!(map.ids(), &[ids[0], ids[2], ids[4]]);
    assert!(map.record(ids[1]).is_none());
    assert_eq!(map.region_label(ids[3]), None);
    assert!(!map.selection().is_selectable(ids[1]));
    assert!(map.selection().is_empty());
    assert!(matches!(
        map.remove_record(ids[1]),
        Err(EditorError::UnknownRecord { .. })
    ));
}

#[test]
fn delete_everything_empties_the_map() {
    let (mut map, _) = arena();
    map.toggle_select_all();
    assert_eq!(map.delete_selection().len(), 5);
    assert!(map.is_empty());
    assert!(map.selection().selectable().is_empty());
    assert_eq!(map.export(), "map,disablebounds;\n");
}

// ---------------------------------------------------------------------------
// Group transforms through the editor
// ---------------------------------------------------------------------------

#[test]
fn scale_drag_updates_records_about_centroid() {
    let (mut map, ids) = arena();
    map.select(ids[0]);
    map.select(ids[1]);
    map.set_tool(Tool::Scale);
    map.drag(GroupTransform::Scale(Vec3::new(2.0, 1.0, 1.0)));

    assert_eq!(map.record(ids[0]).map(|r| r.position()), Some(Vec3::new(-5.0, 0.0, 0.0)));
    assert_eq!(map.record(ids[1]).map(|r| r.position()), Some(Vec3::new(15.0, 0.0, 0.0)));
    assert!(map.export().contains("base,tree,15,0,0,0,0,0,1;"));
}

#[test]
fn drag_with_empty_selection_is_a_no_op() {
    let (mut map, _) = arena();
    let before = map.export();
    map.drag(GroupTransform::Translate(Vec3::ONE));
    assert_eq!(map.export(), before);
}

#[test]
fn scale_drag_moves_spawners_but_keeps_their_scale() {
    let (mut map, ids) = arena();
    map.select(ids[0]);
    map.select(ids[4]);
    map.set_tool(Tool::Scale);
    map.drag(GroupTransform::Scale(Vec3::splat(2.0)));

    let spawner = map.record(ids[4]).unwrap();
    assert_eq!(spawner.position(), Vec3::new(-30.0, 0.0, 0.0));
    assert_eq!(spawner.scale(), Vec3::ONE);
    assert!(map.export().contains("photon,spawnTitan,30,1,-30,0,0,0,0,0,1;"));
}
