//! Browser entry point.
//!
//! [`RoomPlanner`] wraps [`EngineCore`] together with the DOM surface and is
//! the only type exported to JavaScript. The host wires DOM events to the
//! `on_*` methods with coordinates already relative to the room container;
//! the planner handles the returned [`Action`]s itself (cursor changes and
//! re-rendering), so the host never sees them.
//!
//! The planner state sits behind `Rc<RefCell<_>>` so the catalog fetch can
//! publish into it after its await point. No borrow is ever held across an
//! await.

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlElement;

use crate::catalog::{CatalogError, CatalogLoader, HttpCatalogSource};
use crate::config::PlannerConfig;
use crate::dom::{self, DomSurface};
use crate::engine::{Action, EngineCore};
use crate::geom::{Point, Size};
use crate::input::{Button, Key};
use crate::render::RenderSync;
use crate::telemetry;

/// Engine and catalog loader built from one configuration.
pub(crate) fn build_parts(
    config: &PlannerConfig,
) -> Result<(EngineCore, CatalogLoader<HttpCatalogSource>), CatalogError> {
    let source = HttpCatalogSource::new(config)?;
    Ok((EngineCore::with_config(config), CatalogLoader::new(source)))
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

struct PlannerState {
    core: EngineCore,
    sync: RenderSync,
    surface: DomSurface,
    picker_list: Option<HtmlElement>,
}

impl PlannerState {
    fn dispatch(&mut self, actions: &[Action]) -> Result<(), JsValue> {
        let mut render = false;
        for action in actions {
            match action {
                Action::SetCursor(cursor) => self.surface.set_cursor(cursor)?,
                Action::RenderNeeded => render = true,
                Action::ItemPlaced(_)
                | Action::ItemRemoved { .. }
                | Action::ItemTransformed { .. }
                | Action::SelectionChanged(_) => {}
            }
        }
        if render {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), JsValue> {
        self.sync.sync(&self.core.scene, &mut self.surface)
    }

    fn render_picker(&self) -> Result<(), JsValue> {
        match &self.picker_list {
            Some(list) => dom::render_picker(list, &self.core.picker),
            None => Ok(()),
        }
    }
}

/// The room planner bound to a room container element.
#[wasm_bindgen]
pub struct RoomPlanner {
    state: Rc<RefCell<PlannerState>>,
    loader: Rc<CatalogLoader<HttpCatalogSource>>,
}

impl RoomPlanner {
    fn with_state<R>(&self, f: impl FnOnce(&mut PlannerState) -> Result<R, JsValue>) -> Result<R, JsValue> {
        let mut state = self.state.try_borrow_mut().map_err(to_js)?;
        f(&mut state)
    }
}

#[wasm_bindgen]
impl RoomPlanner {
    /// Create a planner that draws into `container`.
    ///
    /// Configuration comes from [`PlannerConfig::from_env`] (defaults in the
    /// browser). `catalog_url`, when given, must be an absolute URL and
    /// overrides the configured one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the page has no document or the configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, catalog_url: Option<String>) -> Result<RoomPlanner, JsValue> {
        telemetry::init();
        let mut config = PlannerConfig::from_env().map_err(to_js)?;
        if let Some(url) = catalog_url {
            config.catalog_url = url;
        }
        let (core, loader) = build_parts(&config).map_err(to_js)?;
        let surface = DomSurface::new(container)?;
        let state = PlannerState { core, sync: RenderSync::new(), surface, picker_list: None };
        Ok(Self { state: Rc::new(RefCell::new(state)), loader: Rc::new(loader) })
    }

    /// Element the catalog thumbnails are rendered into.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the picker cannot be drawn.
    pub fn set_picker_list(&self, list: HtmlElement) -> Result<(), JsValue> {
        self.with_state(|state| {
            state.picker_list = Some(list);
            state.render_picker()
        })
    }

    // --- Background ---

    /// Show a freshly read room photo (a data or object URL).
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn set_background(&self, image: String, width: f64, height: f64) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.set_background(image, Size::new(width, height));
            state.dispatch(&actions)
        })
    }

    /// Reading the photo failed; go back to the placeholder.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn clear_background(&self) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.clear_background();
            state.dispatch(&actions)
        })
    }

    /// The room container changed size.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.set_bounds(Size::new(width, height));
            state.dispatch(&actions)
        })
    }

    // --- Catalog ---

    /// Fetch the catalog from the configured URL and publish it to the
    /// picker. Resolves to whether any items were loaded; a failed fetch
    /// shows the error notice in the picker instead of rejecting.
    pub fn load_catalog(&self) -> Promise {
        let state = Rc::clone(&self.state);
        let loader = Rc::clone(&self.loader);
        future_to_promise(async move {
            let result = loader.fetch_items().await;
            let mut state = state.try_borrow_mut().map_err(to_js)?;
            state.core.apply_catalog(&result);
            state.render_picker()?;
            Ok(JsValue::from_bool(result.is_ok()))
        })
    }

    /// The URL [`Self::load_catalog`] fetches from.
    #[must_use]
    pub fn catalog_url(&self) -> String {
        self.loader.source().url().to_owned()
    }

    // --- Placement ---

    /// Place the picker entry `catalog_id`. Returns the new instance id.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn place(&self, catalog_id: &str) -> Result<Option<String>, JsValue> {
        self.with_state(|state| {
            let actions = state.core.place_from_picker(catalog_id);
            let placed = actions.iter().find_map(|a| match a {
                Action::ItemPlaced(item) => Some(item.instance_id.to_string()),
                _ => None,
            });
            state.dispatch(&actions)?;
            Ok(placed)
        })
    }

    /// Remove the selected item, if any.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn remove_selected(&self) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.remove_selected();
            state.dispatch(&actions)
        })
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn on_pointer_down(&self, x: f64, y: f64, button: i16) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.on_pointer_down(Point::new(x, y), Button::from_dom(button));
            state.dispatch(&actions)
        })
    }

    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn on_pointer_move(&self, x: f64, y: f64) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.on_pointer_move(Point::new(x, y));
            state.dispatch(&actions)
        })
    }

    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn on_pointer_up(&self, x: f64, y: f64, button: i16) -> Result<(), JsValue> {
        self.with_state(|state| {
            let actions = state.core.on_pointer_up(Point::new(x, y), Button::from_dom(button));
            state.dispatch(&actions)
        })
    }

    /// Returns whether the key was consumed, so the host can prevent the
    /// browser default (Backspace navigating back, for instance).
    ///
    /// # Errors
    ///
    /// Returns `Err` if the DOM update fails.
    pub fn on_key_down(&self, key: String) -> Result<bool, JsValue> {
        self.with_state(|state| {
            let actions = state.core.on_key_down(&Key(key));
            state.dispatch(&actions)?;
            Ok(!actions.is_empty())
        })
    }

    // --- Rendering ---

    /// Bring the DOM in line with the scene.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any DOM call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        self.with_state(PlannerState::render)
    }

    // --- Queries ---

    /// Instance id of the selected item, if any.
    ///
    /// # Errors
    ///
    /// Returns `Err` on a re-entrant call from inside a DOM callback.
    pub fn selection(&self) -> Result<Option<String>, JsValue> {
        self.with_state(|state| Ok(state.core.selection().map(|id| id.to_string())))
    }

    /// Number of placed items.
    ///
    /// # Errors
    ///
    /// Returns `Err` on a re-entrant call from inside a DOM callback.
    pub fn item_count(&self) -> Result<usize, JsValue> {
        self.with_state(|state| Ok(state.core.scene.len()))
    }
}
