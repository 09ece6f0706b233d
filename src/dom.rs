//! DOM surface: the browser implementation of [`RenderSurface`].
//!
//! This module is the only place that touches `web_sys` elements. The room
//! photo is the container's CSS background, and every placed item is an
//! absolutely positioned `<img class="sir-furniture-item">` child. All
//! fallible DOM calls propagate as `Result<(), JsValue>`; the caller
//! ([`crate::web::RoomPlanner`]) decides what to do with a failure.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement};

use crate::catalog::Picker;
use crate::render::{NodeAttrs, RenderSurface};
use crate::scene::InstanceId;

const ITEM_CLASS: &str = "sir-furniture-item";
const SELECTED_CLASS: &str = "selected";
const PLACEHOLDER_SELECTOR: &str = ".sir-placeholder-text";

/// A room container element and the item nodes inside it.
pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    nodes: HashMap<InstanceId, HtmlImageElement>,
}

impl DomSurface {
    /// Bind to the room container.
    ///
    /// # Errors
    ///
    /// Returns `Err` when there is no window or document to create nodes in.
    pub fn new(container: HtmlElement) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        Ok(Self { document, container, nodes: HashMap::new() })
    }

    /// Set the CSS cursor on the room container.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the style cannot be written.
    pub fn set_cursor(&self, cursor: &str) -> Result<(), JsValue> {
        self.container.style().set_property("cursor", cursor)
    }

    fn show_placeholder(&self, visible: bool) -> Result<(), JsValue> {
        let Some(placeholder) = self.container.query_selector(PLACEHOLDER_SELECTOR)? else {
            return Ok(());
        };
        let placeholder: HtmlElement = placeholder.dyn_into()?;
        placeholder.style().set_property("display", if visible { "flex" } else { "none" })
    }
}

/// CSS `url("...")` value for an arbitrary image source.
fn css_url(src: &str) -> String {
    let mut out = String::with_capacity(src.len() + 7);
    out.push_str("url(\"");
    for c in src.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push_str("\")");
    out
}

/// Inline style properties that differ between `previous` and `attrs`.
/// Everything is returned for a node that has not been styled yet.
fn style_changes(previous: Option<&NodeAttrs>, attrs: &NodeAttrs) -> Vec<(&'static str, String)> {
    let px = |v: f64| format!("{v}px");
    let wanted = [
        ("left", px(attrs.position.x), previous.map(|p| px(p.position.x))),
        ("top", px(attrs.position.y), previous.map(|p| px(p.position.y))),
        ("width", px(attrs.size.width), previous.map(|p| px(p.size.width))),
        ("height", px(attrs.size.height), previous.map(|p| px(p.size.height))),
        (
            "transform",
            format!("rotate({}deg)", attrs.rotation),
            previous.map(|p| format!("rotate({}deg)", p.rotation)),
        ),
        ("z-index", attrs.stacking.to_string(), previous.map(|p| p.stacking.to_string())),
    ];
    wanted
        .into_iter()
        .filter(|(_, value, before)| before.as_ref() != Some(value))
        .map(|(name, value, _)| (name, value))
        .collect()
}

fn apply_attrs(node: &HtmlImageElement, previous: Option<&NodeAttrs>, attrs: &NodeAttrs) -> Result<(), JsValue> {
    if previous.is_none_or(|p| p.image_url != attrs.image_url) {
        node.set_src(&attrs.image_url);
    }
    if previous.is_none_or(|p| p.label != attrs.label) {
        node.set_alt(&attrs.label);
    }

    let style = node.style();
    for (name, value) in style_changes(previous, attrs) {
        style.set_property(name, &value)?;
    }

    if previous.is_none_or(|p| p.selected != attrs.selected) {
        node.class_list().toggle_with_force(SELECTED_CLASS, attrs.selected)?;
    }
    Ok(())
}

impl RenderSurface for DomSurface {
    type Error = JsValue;

    fn set_background(&mut self, image: Option<&str>) -> Result<(), JsValue> {
        let style = self.container.style();
        match image {
            Some(src) => {
                style.set_property("background-image", &css_url(src))?;
                self.show_placeholder(false)
            }
            None => {
                style.set_property("background-image", "none")?;
                self.show_placeholder(true)
            }
        }
    }

    fn create_node(&mut self, id: &InstanceId, attrs: &NodeAttrs) -> Result<(), JsValue> {
        let node: HtmlImageElement = self.document.create_element("img")?.dyn_into()?;
        node.class_list().add_1(ITEM_CLASS)?;
        node.set_attribute("data-instance-id", &id.to_string())?;
        node.set_draggable(false);
        node.style().set_property("position", "absolute")?;
        apply_attrs(&node, None, attrs)?;
        self.container.append_child(&node)?;
        self.nodes.insert(*id, node);
        Ok(())
    }

    fn update_node(&mut self, id: &InstanceId, previous: &NodeAttrs, attrs: &NodeAttrs) -> Result<(), JsValue> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| JsValue::from_str(&format!("no node for {id}")))?;
        apply_attrs(node, Some(previous), attrs)
    }

    fn remove_node(&mut self, id: &InstanceId) -> Result<(), JsValue> {
        if let Some(node) = self.nodes.remove(id) {
            node.remove();
        }
        Ok(())
    }
}

/// Fill the picker strip: one thumbnail per catalog entry, or the picker's
/// notice in a paragraph.
///
/// Thumbnails carry `data-item-id` so the host can route clicks back to
/// [`crate::web::RoomPlanner::place`].
///
/// # Errors
///
/// Returns `Err` if any DOM call fails.
pub fn render_picker(list: &HtmlElement, picker: &Picker) -> Result<(), JsValue> {
    let document = list
        .owner_document()
        .ok_or_else(|| JsValue::from_str("picker list is detached"))?;
    list.set_inner_html("");

    if let Some(notice) = picker.notice() {
        let p = document.create_element("p")?;
        p.set_text_content(Some(notice));
        list.append_child(&p)?;
        return Ok(());
    }

    for item in picker.items() {
        let thumb: HtmlImageElement = document.create_element("img")?.dyn_into()?;
        thumb.set_src(&item.thumbnail_url);
        thumb.set_alt(&item.display_name);
        thumb.set_title(&item.display_name);
        thumb.set_attribute("data-item-id", &item.id)?;
        thumb.set_attribute("data-image-url", &item.full_image_url)?;
        list.append_child(&thumb)?;
    }
    Ok(())
}
