#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::ROTATE_HANDLE_OFFSET;
use crate::scene::TransformPatch;

// =============================================================
// Helpers
// =============================================================

fn catalog() -> Vec<CatalogItem> {
    ["1", "2", "3"]
        .iter()
        .map(|id| CatalogItem {
            id: (*id).to_owned(),
            display_name: format!("Sofa {id}"),
            thumbnail_url: format!("/media/furniture/thumbs/{id}.jpg"),
            full_image_url: format!("/media/furniture/{id}.png"),
        })
        .collect()
}

fn ready_core() -> EngineCore {
    let mut core = EngineCore::new();
    core.apply_catalog(&Ok(catalog()));
    core.set_background("data:image/png;base64,iVBOR", Size::new(800.0, 600.0));
    core
}

fn placed_id(actions: &[Action]) -> InstanceId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ItemPlaced(item) => Some(item.instance_id),
            _ => None,
        })
        .unwrap()
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn cursor(actions: &[Action]) -> Option<&str> {
    actions.iter().find_map(|a| match a {
        Action::SetCursor(c) => Some(c.as_str()),
        _ => None,
    })
}

// =============================================================
// Construction
// =============================================================

#[test]
fn core_new_is_empty() {
    let core = EngineCore::new();
    assert!(core.selection().is_none());
    assert!(core.scene.is_empty());
    assert!(!core.scene.background().has_image());
    assert!(!core.is_manipulating());
}

#[test]
fn core_with_config_uses_placement() {
    let mut config = PlannerConfig::default();
    config.placement.size = 64.0;
    config.placement.inset = 4.0;
    let mut core = EngineCore::with_config(&config);
    core.apply_catalog(&Ok(catalog()));
    core.set_background("blob:room", Size::new(800.0, 600.0));
    let id = placed_id(&core.place_from_picker("1"));
    let item = core.item(&id).unwrap();
    assert_eq!(item.size, Size::new(64.0, 64.0));
    assert_eq!(item.position, pt(4.0, 4.0));
}

// =============================================================
// Placement
// =============================================================

#[test]
fn place_without_background_is_noop() {
    let mut core = EngineCore::new();
    core.apply_catalog(&Ok(catalog()));
    let actions = core.place_from_picker("1");
    assert!(actions.is_empty());
    assert!(core.scene.is_empty());
}

#[test]
fn place_emits_actions_and_selects() {
    let mut core = ready_core();
    let actions = core.place_from_picker("2");
    let id = placed_id(&actions);
    assert!(actions.contains(&Action::SelectionChanged(Some(id))));
    assert!(has_render_needed(&actions));
    assert_eq!(core.selection(), Some(id));
    assert_eq!(core.item(&id).unwrap().catalog_id, "2");
}

#[test]
fn place_unknown_catalog_id_is_noop() {
    let mut core = ready_core();
    assert!(core.place_from_picker("999").is_empty());
    assert!(core.scene.is_empty());
}

#[test]
fn placements_survive_catalog_failure() {
    let mut core = ready_core();
    let id = placed_id(&core.place_from_picker("1"));
    core.apply_catalog(&Err(CatalogError::Unavailable("offline".into())));
    assert!(core.item(&id).is_some());
    // Known ids stay placeable from the last good list.
    assert!(!core.place_from_picker("3").is_empty());
}

#[test]
fn placements_survive_catalog_reload() {
    let mut core = ready_core();
    let id = placed_id(&core.place_from_picker("1"));
    core.apply_catalog(&Err(CatalogError::Empty));
    assert_eq!(core.item(&id).unwrap().image_url, "/media/furniture/1.png");
    assert!(core.place_from_picker("1").is_empty());
}

// =============================================================
// Background
// =============================================================

#[test]
fn set_background_clears_layout_and_reports_deselection() {
    let mut core = ready_core();
    core.place_from_picker("1");
    core.place_from_picker("2");
    let actions = core.set_background("blob:new-room", Size::new(640.0, 480.0));
    assert_eq!(actions, vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.scene.is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn clear_background_drops_image() {
    let mut core = ready_core();
    core.place_from_picker("1");
    core.clear_background();
    assert!(!core.scene.background().has_image());
    assert!(core.place_from_picker("1").is_empty());
}

#[test]
fn set_bounds_requests_render() {
    let mut core = ready_core();
    assert_eq!(core.set_bounds(Size::new(1.0, 2.0)), vec![Action::RenderNeeded]);
    assert_eq!(core.scene.background().bounds(), Size::new(1.0, 2.0));
}

// =============================================================
// Removal
// =============================================================

#[test]
fn remove_selected_item() {
    let mut core = ready_core();
    let id = placed_id(&core.place_from_picker("1"));
    let actions = core.remove(&id);
    assert_eq!(
        actions,
        vec![Action::ItemRemoved { id }, Action::SelectionChanged(None), Action::RenderNeeded]
    );
    assert!(core.scene.is_empty());
}

#[test]
fn remove_unknown_item_is_noop() {
    let mut core = ready_core();
    core.place_from_picker("1");
    assert!(core.remove(&Uuid::new_v4()).is_empty());
    assert_eq!(core.scene.len(), 1);
}

#[test]
fn remove_selected_with_nothing_selected_is_noop() {
    let mut core = ready_core();
    core.place_from_picker("1");
    core.deselect();
    assert!(core.remove_selected().is_empty());
    assert_eq!(core.scene.len(), 1);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn select_reports_change() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    let _b = placed_id(&core.place_from_picker("2"));
    assert_eq!(core.select(&a), vec![Action::SelectionChanged(Some(a)), Action::RenderNeeded]);
    assert_eq!(core.select(&a), vec![Action::RenderNeeded]);
}

#[test]
fn deselect_twice_reports_once() {
    let mut core = ready_core();
    core.place_from_picker("1");
    assert_eq!(core.deselect(), vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.deselect().is_empty());
}

// =============================================================
// Pointer: drag
// =============================================================

#[test]
fn pointer_drag_moves_item() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));

    let down = core.on_pointer_down(pt(50.0, 50.0), Button::Primary);
    assert_eq!(cursor(&down), Some(CURSOR_GRABBING));
    assert!(core.is_manipulating());

    let moved = core.on_pointer_move(pt(70.0, 70.0));
    assert_eq!(moved, vec![Action::ItemTransformed { id: a }, Action::RenderNeeded]);
    assert_eq!(core.item(&a).unwrap().position, pt(30.0, 30.0));

    core.on_pointer_move(pt(90.0, 90.0));
    assert_eq!(core.item(&a).unwrap().position, pt(50.0, 50.0));

    let up = core.on_pointer_up(pt(90.0, 90.0), Button::Primary);
    assert_eq!(up, vec![Action::SetCursor(CURSOR_GRAB.to_owned())]);
    assert!(!core.is_manipulating());
    assert!(core.on_pointer_move(pt(120.0, 120.0)).is_empty());
}

#[test]
fn pointer_down_on_lower_item_selects_and_raises_it() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    let b = placed_id(&core.place_from_picker("2"));
    // Move b out of the way so a is reachable.
    core.scene.update_transform(&b, &TransformPatch::position(pt(400.0, 400.0))).unwrap();

    let actions = core.on_pointer_down(pt(20.0, 20.0), Button::Primary);
    assert!(actions.contains(&Action::SelectionChanged(Some(a))));
    assert_eq!(core.selection(), Some(a));
    assert!(core.item(&a).unwrap().z_index > core.item(&b).unwrap().z_index);
}

#[test]
fn pointer_down_on_empty_surface_deselects() {
    let mut core = ready_core();
    core.place_from_picker("1");
    let actions = core.on_pointer_down(pt(500.0, 500.0), Button::Primary);
    assert_eq!(actions, vec![Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.selection().is_none());
}

#[test]
fn pointer_down_on_empty_surface_with_no_selection_is_quiet() {
    let mut core = ready_core();
    assert!(core.on_pointer_down(pt(500.0, 500.0), Button::Primary).is_empty());
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = ready_core();
    core.place_from_picker("1");
    assert!(core.on_pointer_down(pt(50.0, 50.0), Button::Secondary).is_empty());
    assert!(!core.is_manipulating());
    assert!(core.on_pointer_up(pt(50.0, 50.0), Button::Secondary).is_empty());
}

#[test]
fn pointer_up_without_gesture_is_quiet() {
    let mut core = ready_core();
    assert!(core.on_pointer_up(pt(1.0, 1.0), Button::Primary).is_empty());
}

#[test]
fn remove_mid_drag_makes_moves_noop() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    core.on_pointer_down(pt(50.0, 50.0), Button::Primary);
    core.remove(&a);

    assert!(core.on_pointer_move(pt(70.0, 70.0)).is_empty());
    assert!(core.item(&a).is_none());
    assert!(core.scene.is_empty());
    // The gesture ended abnormally but pointer-up still restores the cursor.
    assert_eq!(core.on_pointer_up(pt(70.0, 70.0), Button::Primary), vec![Action::SetCursor(CURSOR_GRAB.to_owned())]);
}

#[test]
fn background_replaced_mid_drag_cancels() {
    let mut core = ready_core();
    core.place_from_picker("1");
    core.on_pointer_down(pt(50.0, 50.0), Button::Primary);
    core.set_background("blob:other", Size::new(800.0, 600.0));
    assert!(!core.is_manipulating());
    assert!(core.on_pointer_move(pt(70.0, 70.0)).is_empty());
}

// =============================================================
// Pointer: handles
// =============================================================

#[test]
fn pointer_on_resize_handle_resizes() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    // Default box: (10, 10) 100 x 100, SE corner at (110, 110).
    let down = core.on_pointer_down(pt(110.0, 110.0), Button::Primary);
    assert_eq!(cursor(&down), Some("nwse-resize"));
    core.on_pointer_move(pt(160.0, 130.0));
    let item = core.item(&a).unwrap();
    assert_eq!(item.size, Size::new(150.0, 120.0));
    assert_eq!(item.position, pt(10.0, 10.0));
}

#[test]
fn pointer_on_rotate_handle_rotates() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    // Center (60, 60); rotate handle straight above the top edge.
    core.on_pointer_down(pt(60.0, 10.0 - ROTATE_HANDLE_OFFSET), Button::Primary);
    core.on_pointer_move(pt(60.0 - 74.0, 60.0));
    let rotation = core.item(&a).unwrap().rotation;
    assert!((rotation - 270.0).abs() < 1e-9);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn delete_key_removes_selected() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    let actions = core.on_key_down(&Key("Delete".into()));
    assert!(actions.contains(&Action::ItemRemoved { id: a }));
    assert!(core.scene.is_empty());
}

#[test]
fn backspace_also_removes() {
    let mut core = ready_core();
    core.place_from_picker("1");
    core.on_key_down(&Key("Backspace".into()));
    assert!(core.scene.is_empty());
}

#[test]
fn escape_deselects_and_cancels_drag() {
    let mut core = ready_core();
    let a = placed_id(&core.place_from_picker("1"));
    core.on_pointer_down(pt(50.0, 50.0), Button::Primary);
    core.on_key_down(&Key("Escape".into()));
    assert!(core.selection().is_none());
    assert!(core.on_pointer_move(pt(90.0, 90.0)).is_empty());
    assert_eq!(core.item(&a).unwrap().position, pt(10.0, 10.0));
}

#[test]
fn other_keys_are_ignored() {
    let mut core = ready_core();
    core.place_from_picker("1");
    assert!(core.on_key_down(&Key("a".into())).is_empty());
    assert_eq!(core.scene.len(), 1);
}
