//! Leptos client-side app wiring, routes and graph data loading.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

// Modules
pub mod components;
mod pages;

pub use components::graph::{
	ComparisonDetails, DeepLink, FlatEdge, FlatNode, GraphCanvas, GraphConfig, GraphData,
	GraphError, GraphLink, Theme, TreeNode,
};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("logging initialized");
}

/// Parse graph data embedded as `<script type="application/json" id="{id}">`.
pub fn load_graph_data(id: &str) -> components::graph::Result<GraphData> {
	let invalid = |reason: String| GraphError::InvalidData { reason };
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| invalid("no document".into()))?;
	let element = document
		.get_element_by_id(id)
		.ok_or_else(|| invalid(format!("no element #{id}")))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| invalid(format!("#{id} is not a script element")))?;
	let text = script.text().map_err(|e| invalid(format!("{e:?}")))?;

	match GraphData::from_json(&text) {
		Ok(data) => {
			info!(
				"article-graph: loaded {} root nodes, {} links from #{id}",
				data.nodes.len(),
				data.links.len()
			);
			Ok(data)
		}
		Err(e) => {
			warn!("article-graph: failed to parse graph data: {e}");
			Err(e)
		}
	}
}

/// An app router which renders the demo article and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Agent frameworks, mapped" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
