//! Links between the graph and the surrounding article: documentation
//! sections, in-page anchors and the clipboard.

use js_sys::{Function, Promise, Reflect};
use log::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	Document, Element, HtmlDocument, HtmlElement, HtmlTextAreaElement, ScrollBehavior,
	ScrollIntoViewOptions, ScrollLogicalPosition,
};

use super::deep_link::DeepLink;
use super::error::{GraphError, Result};

pub const NODE_ATTR: &str = "data-graph-node";
pub const EDGE_ATTR: &str = "data-graph-edge";
pub const SCOPE_ATTR: &str = "data-graph-id";
const FLASH_MS: i32 = 2000;

/// The lookups section resolution needs from a document.
pub trait SectionIndex {
	type Handle;

	fn by_id(&self, id: &str) -> Option<Self::Handle>;
	/// First element whose `attr` equals `value`.
	fn by_attribute(&self, attr: &str, value: &str) -> Option<Self::Handle>;
	/// Every heading as `(id, text, handle)`, in document order.
	fn headings(&self) -> Vec<(Option<String>, String, Self::Handle)>;
}

/// Find the element documenting `id`: an element with that id, then one
/// with id `article-{id}`, then one tagged with the node or edge data
/// attribute, then a heading whose id matches or whose text mentions it.
pub fn resolve_section<I: SectionIndex>(index: &I, id: &str) -> Option<I::Handle> {
	if id.is_empty() {
		return None;
	}
	index
		.by_id(id)
		.or_else(|| index.by_id(&format!("article-{id}")))
		.or_else(|| index.by_attribute(NODE_ATTR, id))
		.or_else(|| index.by_attribute(EDGE_ATTR, id))
		.or_else(|| {
			let needle = id.to_lowercase();
			let spaced = needle.replace('-', " ");
			index.headings().into_iter().find_map(|(heading_id, text, handle)| {
				let text = text.to_lowercase();
				let matches = heading_id.as_deref() == Some(id)
					|| text.contains(&needle)
					|| text.contains(&spaced);
				matches.then_some(handle)
			})
		})
}

/// Deep link carried by an anchor's data attributes. Anchors scoped to a
/// different graph are ignored.
pub fn link_from_attributes(
	node: Option<&str>,
	edge: Option<&str>,
	scope: Option<&str>,
	graph_id: &str,
) -> Option<DeepLink> {
	if scope.is_some_and(|s| s != graph_id) {
		return None;
	}
	match (node, edge) {
		(Some(id), _) if !id.is_empty() => Some(DeepLink::Node(id.to_owned())),
		(_, Some(id)) if !id.is_empty() => Some(DeepLink::Edge(id.to_owned())),
		_ => None,
	}
}

/// Deep link of the closest tagged ancestor of a clicked element.
pub fn anchor_link(target: &Element, graph_id: &str) -> Option<DeepLink> {
	let anchor = target
		.closest(&format!("[{NODE_ATTR}],[{EDGE_ATTR}]"))
		.ok()
		.flatten()?;
	link_from_attributes(
		anchor.get_attribute(NODE_ATTR).as_deref(),
		anchor.get_attribute(EDGE_ATTR).as_deref(),
		anchor.get_attribute(SCOPE_ATTR).as_deref(),
		graph_id,
	)
}

fn attribute_selector(attr: &str, value: &str) -> String {
	let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
	format!("[{attr}=\"{escaped}\"]")
}

impl SectionIndex for Document {
	type Handle = Element;

	fn by_id(&self, id: &str) -> Option<Element> {
		self.get_element_by_id(id)
	}

	fn by_attribute(&self, attr: &str, value: &str) -> Option<Element> {
		self.query_selector(&attribute_selector(attr, value)).ok().flatten()
	}

	fn headings(&self) -> Vec<(Option<String>, String, Element)> {
		let Ok(list) = self.query_selector_all("h1, h2, h3, h4, h5, h6") else {
			return Vec::new();
		};
		(0..list.length())
			.filter_map(|i| list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.map(|el| {
				let id = Some(el.id()).filter(|id| !id.is_empty());
				let text = el.text_content().unwrap_or_default();
				(id, text, el)
			})
			.collect()
	}
}

/// Scroll the section documenting `id` to the middle of the viewport and
/// flash its background.
pub fn scroll_to_section(id: &str, flash_color: &str) -> Result<()> {
	let not_found = || GraphError::SectionNotFound { id: id.to_owned() };
	let document = web_sys::window().and_then(|w| w.document()).ok_or_else(not_found)?;
	let section = resolve_section(&document, id).ok_or_else(not_found)?;
	scroll_into_view(&section);
	flash(&section, flash_color);
	Ok(())
}

pub fn scroll_into_view(element: &Element) {
	let options = ScrollIntoViewOptions::new();
	options.set_behavior(ScrollBehavior::Smooth);
	options.set_block(ScrollLogicalPosition::Center);
	element.scroll_into_view_with_scroll_into_view_options(&options);
}

fn flash(element: &Element, color: &str) {
	let Some(element) = element.dyn_ref::<HtmlElement>() else {
		return;
	};
	let style = element.style();
	let _ = style.set_property("transition", "background-color 0.3s ease");
	let _ = style.set_property("background-color", color);

	let reset = element.clone();
	let clear = Closure::once_into_js(move || {
		let _ = reset.style().remove_property("background-color");
	});
	if let Some(window) = web_sys::window() {
		let _ = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(clear.unchecked_ref(), FLASH_MS);
	}
}

/// Copy `text` with the async Clipboard API, falling back to a hidden
/// textarea and `execCommand("copy")`.
pub async fn copy_text(text: &str) -> Result<()> {
	match clipboard_write(text).await {
		Ok(()) => return Ok(()),
		Err(e) => error!("article-graph: clipboard API failed: {e:?}"),
	}
	legacy_copy(text).map_err(|reason| {
		error!("article-graph: fallback copy failed: {reason}");
		GraphError::Clipboard { reason }
	})
}

async fn clipboard_write(text: &str) -> std::result::Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
	if clipboard.is_undefined() || clipboard.is_null() {
		return Err(JsValue::from_str("navigator.clipboard is unavailable"));
	}
	let write: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
	let promise: Promise = write.call1(&clipboard, &JsValue::from_str(text))?.dyn_into()?;
	JsFuture::from(promise).await?;
	Ok(())
}

fn legacy_copy(text: &str) -> std::result::Result<(), String> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| "no document".to_owned())?;
	let body = document.body().ok_or_else(|| "no body".to_owned())?;
	let area: HtmlTextAreaElement = document
		.create_element("textarea")
		.map_err(|e| format!("{e:?}"))?
		.dyn_into()
		.map_err(|_| "not a textarea".to_owned())?;
	area.set_value(text);
	let _ = area.style().set_property("position", "fixed");
	let _ = area.style().set_property("opacity", "0");
	body.append_child(&area).map_err(|e| format!("{e:?}"))?;
	area.select();
	let copied = document
		.dyn_ref::<HtmlDocument>()
		.map(|d| d.exec_command("copy").unwrap_or(false))
		.unwrap_or(false);
	area.remove();
	if copied {
		Ok(())
	} else {
		warn!("article-graph: execCommand(\"copy\") was refused");
		Err("execCommand(\"copy\") was refused".to_owned())
	}
}
