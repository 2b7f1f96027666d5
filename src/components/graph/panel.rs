//! Presentation around the canvas: menu bar, node context menu and the
//! detail panel. These views only report [`Action`]s; the canvas component
//! carries them out.

use leptos::prelude::*;

use super::flatten::{EdgeKind, FlatEdge, FlatNode};
use super::selection::Coordinator;

/// A user request raised by one of the surrounding views.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	ExpandAll,
	CollapseAll,
	ZoomToFit,
	/// Copy a link to the current selection.
	CopySelectionLink,
	/// Copy a link to one node.
	CopyNodeLink(String),
	ToggleNode(String),
	ShowSection(String),
	CloseMenu,
}

/// What the detail panel shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Details {
	Node(FlatNode),
	Edge {
		edge: FlatEdge,
		/// Display labels of the endpoints.
		source: String,
		target: String,
	},
}

impl Details {
	pub fn from_coordinator(coordinator: &Coordinator) -> Option<Self> {
		if let Some(node) = coordinator.selected_node() {
			return Some(Details::Node(node.clone()));
		}
		let edge = coordinator.selected_edge()?;
		let label = |id: &str| {
			coordinator
				.flat()
				.node(id)
				.map(|n| n.display_label().to_owned())
				.unwrap_or_else(|| id.to_owned())
		};
		Some(Details::Edge {
			source: label(&edge.source),
			target: label(&edge.target),
			edge: edge.clone(),
		})
	}
}

/// Node the context menu was opened on.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuTarget {
	pub id: String,
	pub label: String,
	pub has_children: bool,
	pub is_expanded: bool,
}

impl MenuTarget {
	pub fn of(node: &FlatNode) -> Self {
		Self {
			id: node.id.clone(),
			label: node.display_label().to_owned(),
			has_children: node.has_children,
			is_expanded: node.is_expanded,
		}
	}

	pub fn toggle_label(&self) -> &'static str {
		if self.is_expanded { "Collapse" } else { "Expand" }
	}
}

#[component]
pub fn MenuBar(
	#[prop(into)] has_selection: Signal<bool>,
	on_action: Callback<Action>,
) -> impl IntoView {
	view! {
		<div class="graph-menu-bar">
			<button on:click=move |_| on_action.run(Action::ExpandAll)>"Expand all"</button>
			<button on:click=move |_| on_action.run(Action::CollapseAll)>"Collapse all"</button>
			<button on:click=move |_| on_action.run(Action::ZoomToFit)>"Zoom to fit"</button>
			<button
				disabled=move || !has_selection.get()
				on:click=move |_| on_action.run(Action::CopySelectionLink)
			>
				"Copy link"
			</button>
		</div>
	}
}

#[component]
pub fn ContextMenu(
	#[prop(into)] target: Signal<Option<MenuTarget>>,
	/// Screen position inside the canvas.
	#[prop(into)]
	position: Signal<Option<(f64, f64)>>,
	on_action: Callback<Action>,
) -> impl IntoView {
	move || {
		let menu = target.get()?;
		let (x, y) = position.get()?;
		let (toggle_id, copy_id) = (menu.id.clone(), menu.id.clone());
		Some(view! {
			<div
				class="graph-context-menu"
				style=format!("position: absolute; left: {x}px; top: {y}px;")
			>
				<div class="graph-context-menu-title">{menu.label.clone()}</div>
				{menu.has_children.then(|| {
					let label = menu.toggle_label();
					view! {
						<button on:click=move |_| {
							on_action.run(Action::ToggleNode(toggle_id.clone()))
						}>{label}</button>
					}
				})}
				<button on:click=move |_| {
					on_action.run(Action::CopyNodeLink(copy_id.clone()))
				}>"Copy link"</button>
				<button on:click=move |_| on_action.run(Action::CloseMenu)>"Close"</button>
			</div>
		})
	}
}

fn list(title: &'static str, items: Vec<String>) -> impl IntoView {
	(!items.is_empty()).then(|| {
		view! {
			<h4>{title}</h4>
			<ul>{items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}</ul>
		}
	})
}

fn section_button(section: Option<String>, on_action: Callback<Action>) -> impl IntoView {
	section.map(|id| {
		view! {
			<button
				class="graph-section-link"
				on:click=move |_| on_action.run(Action::ShowSection(id.clone()))
			>
				"Read more"
			</button>
		}
	})
}

fn node_details(node: FlatNode, on_action: Callback<Action>) -> impl IntoView {
	let description =
		(!node.description.is_empty()).then(|| view! { <p>{node.description.clone()}</p> });
	let links = (!node.key_links.is_empty()).then(|| {
		view! {
			<ul class="graph-key-links">
				{node
					.key_links
					.iter()
					.map(|href| {
						view! {
							<li>
								<a href=href.clone() target="_blank" rel="noopener noreferrer">
									{href.clone()}
								</a>
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
	});
	view! {
		<h3>{node.display_label().to_owned()}</h3>
		{description}
		{links}
		{section_button(node.markdown_section.clone(), on_action)}
	}
}

fn edge_details(
	edge: FlatEdge,
	source: String,
	target: String,
	on_action: Callback<Action>,
) -> impl IntoView {
	let heading = match &edge.label {
		Some(label) => format!("{source} → {target}: {label}"),
		None => format!("{source} → {target}"),
	};
	let comparison = match &edge.kind {
		EdgeKind::Comparison(details) => Some(view! {
			{list("Similarities", details.similarities.clone())}
			{list("Only in source", details.source_only.clone())}
			{list("Only in target", details.target_only.clone())}
		}),
		_ => None,
	};
	view! {
		<h3>{heading}</h3>
		{comparison}
		{section_button(edge.markdown_section.clone(), on_action)}
	}
}

#[component]
pub fn DetailPanel(
	#[prop(into)] details: Signal<Option<Details>>,
	on_action: Callback<Action>,
) -> impl IntoView {
	move || {
		details.get().map(|d| {
			let body = match d {
				Details::Node(node) => node_details(node, on_action).into_any(),
				Details::Edge { edge, source, target } => {
					edge_details(edge, source, target, on_action).into_any()
				}
			};
			view! { <aside class="graph-detail-panel">{body}</aside> }
		})
	}
}
