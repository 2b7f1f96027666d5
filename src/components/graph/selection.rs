//! Selection, highlight and expansion state, kept consistent with the URL
//! fragment.
//!
//! Every transition updates the state in one step and returns the side
//! effects the host must carry out. The coordinator itself never touches the
//! DOM or the layout.

use log::{debug, info};

use super::comparison;
use super::deep_link::{self, DeepLink};
use super::error::{GraphError, Result};
use super::expansion::ExpansionSet;
use super::flatten::{self, FlatEdge, FlatGraph, FlatNode};
use super::tree::NodeTree;
use super::types::{GraphData, GraphLink};

/// Drives the detail panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	None,
	Node(String),
	Edge(String),
}

/// Drives the glow and the camera.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
	#[default]
	None,
	Node(String),
	Edge(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
	/// Replace the URL fragment (text without `#`).
	WriteFragment(String),
	/// Notify the host of a selected edge.
	EdgeClicked(FlatEdge),
	/// Scroll the graph container into view.
	ScrollIntoView,
	CenterOnNode(String),
	/// Center on the midpoint of an edge.
	CenterOnEdge(String),
	/// The flattened graph changed and the layout must be synced.
	Relayout,
}

pub struct Coordinator {
	graph_id: String,
	tree: NodeTree,
	links: Vec<GraphLink>,
	expanded: ExpansionSet,
	flat: FlatGraph,
	selection: Selection,
	highlight: Highlight,
	/// Last fragment written, so its echo from the browser is ignored.
	pending_fragment: Option<String>,
}

impl Coordinator {
	pub fn new(
		graph_id: impl Into<String>,
		data: &GraphData,
		initial_expanded: impl IntoIterator<Item = String>,
	) -> Self {
		let tree = NodeTree::new(&data.nodes);
		let expanded: ExpansionSet = initial_expanded
			.into_iter()
			.filter(|id| tree.has_children(id))
			.collect();
		let links = comparison::normalize(&data.links);
		let flat = flatten::flatten(&tree, &links, &expanded);
		Self {
			graph_id: graph_id.into(),
			tree,
			links,
			expanded,
			flat,
			selection: Selection::None,
			highlight: Highlight::None,
			pending_fragment: None,
		}
	}

	pub fn graph_id(&self) -> &str {
		&self.graph_id
	}

	pub fn flat(&self) -> &FlatGraph {
		&self.flat
	}

	pub fn tree(&self) -> &NodeTree {
		&self.tree
	}

	pub fn expanded(&self) -> &ExpansionSet {
		&self.expanded
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn highlight(&self) -> &Highlight {
		&self.highlight
	}

	pub fn selected_node(&self) -> Option<&FlatNode> {
		match &self.selection {
			Selection::Node(id) => self.flat.node(id),
			_ => None,
		}
	}

	pub fn selected_edge(&self) -> Option<&FlatEdge> {
		match &self.selection {
			Selection::Edge(id) => self.flat.edge(id),
			_ => None,
		}
	}

	pub fn highlighted_node(&self) -> Option<&str> {
		match &self.highlight {
			Highlight::Node(id) => Some(id),
			_ => None,
		}
	}

	pub fn is_node_highlighted(&self, id: &str) -> bool {
		matches!(&self.highlight, Highlight::Node(h) if h == id)
	}

	pub fn is_node_selected(&self, id: &str) -> bool {
		matches!(&self.selection, Selection::Node(s) if s == id)
	}

	/// Whether `edge`, or its comparison twin, is highlighted.
	pub fn is_edge_highlighted(&self, edge: &FlatEdge) -> bool {
		let Highlight::Edge(h) = &self.highlight else {
			return false;
		};
		h == &edge.id || self.flat.twin_of(edge).is_some_and(|twin| &twin.id == h)
	}

	/// Current deep link to the selection, if any.
	pub fn selection_link(&self) -> Option<DeepLink> {
		match &self.selection {
			Selection::None => None,
			Selection::Node(id) => Some(DeepLink::Node(id.clone())),
			Selection::Edge(id) => Some(DeepLink::Edge(id.clone())),
		}
	}

	/// Select and highlight a node. A parent that was not selected yet is
	/// expanded; clicking the selected parent again toggles it instead.
	pub fn click_node(&mut self, id: &str) -> Result<Vec<Effect>> {
		let Some(node) = self.flat.node(id) else {
			return Err(GraphError::NodeNotFound { id: id.to_owned() });
		};
		let has_children = node.has_children;
		let was_selected = self.is_node_selected(id);

		let mut effects = Vec::new();
		if has_children {
			let changed = if was_selected {
				self.expanded.toggle(id);
				true
			} else {
				self.expanded.expand(id)
			};
			if changed {
				self.reflatten();
				effects.push(Effect::Relayout);
			}
		}

		self.selection = Selection::Node(id.to_owned());
		self.highlight = Highlight::Node(id.to_owned());
		effects.push(self.write_fragment(DeepLink::Node(id.to_owned())));
		Ok(effects)
	}

	/// Select and highlight an edge, clearing any node selection.
	pub fn click_edge(&mut self, id: &str) -> Result<Vec<Effect>> {
		let Some(edge) = self.flat.edge(id).cloned() else {
			return Err(GraphError::EdgeNotFound { id: id.to_owned() });
		};
		self.selection = Selection::Edge(id.to_owned());
		self.highlight = Highlight::Edge(id.to_owned());
		Ok(vec![
			self.write_fragment(DeepLink::Edge(id.to_owned())),
			Effect::EdgeClicked(edge),
		])
	}

	/// Handle a fragment reported by the browser. Fragments of other graphs,
	/// and the echo of one this coordinator wrote, are ignored.
	pub fn resolve_fragment(&mut self, fragment: &str) -> Result<Vec<Effect>> {
		let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
		// any report settles the pending write, echo or not
		let pending = self.pending_fragment.take();
		if pending.is_some_and(|p| deep_link::decode(&p) == deep_link::decode(fragment)) {
			return Ok(Vec::new());
		}
		let Some(link) = DeepLink::parse(&self.graph_id, fragment) else {
			return Ok(Vec::new());
		};
		self.navigate(&link)
	}

	/// Follow an in-page anchor: navigate, then record the link in the URL.
	pub fn open(&mut self, link: &DeepLink) -> Result<Vec<Effect>> {
		let mut effects = self.navigate(link)?;
		effects.insert(0, self.write_fragment(link.clone()));
		Ok(effects)
	}

	/// Reveal, select and highlight the target of a deep link.
	///
	/// Node targets get every ancestor expanded, and are expanded themselves
	/// when they have children. Edge targets must already be visible; an edge
	/// with a collapsed endpoint reports [`GraphError::EdgeHidden`].
	pub fn navigate(&mut self, link: &DeepLink) -> Result<Vec<Effect>> {
		match link {
			DeepLink::Node(id) => {
				let mut effects = self.reveal(id, true)?;
				self.selection = Selection::Node(id.clone());
				self.highlight = Highlight::Node(id.clone());
				info!("article-graph: opened node {id}");
				effects.extend([Effect::ScrollIntoView, Effect::CenterOnNode(id.clone())]);
				Ok(effects)
			}
			DeepLink::Edge(id) => {
				let Some(edge) = self.flat.edge(id).cloned() else {
					return Err(self.missing_edge(id));
				};
				self.selection = Selection::Edge(id.clone());
				self.highlight = Highlight::Edge(id.clone());
				info!("article-graph: opened edge {id}");
				Ok(vec![
					Effect::ScrollIntoView,
					Effect::CenterOnEdge(id.clone()),
					Effect::EdgeClicked(edge),
				])
			}
		}
	}

	/// Highlight a node without selecting it or scrolling the page, expanding
	/// its ancestors so it is visible.
	pub fn highlight_node(&mut self, id: &str) -> Result<Vec<Effect>> {
		let mut effects = self.reveal(id, false)?;
		self.highlight = Highlight::Node(id.to_owned());
		effects.push(Effect::CenterOnNode(id.to_owned()));
		Ok(effects)
	}

	pub fn highlight_edge(&mut self, id: &str) -> Result<Vec<Effect>> {
		if self.flat.edge(id).is_none() {
			return Err(self.missing_edge(id));
		}
		self.highlight = Highlight::Edge(id.to_owned());
		Ok(vec![Effect::CenterOnEdge(id.to_owned())])
	}

	/// Expand or collapse one node, leaving the selection alone unless it
	/// just became hidden.
	pub fn toggle_expansion(&mut self, id: &str) -> Result<Vec<Effect>> {
		if !self.tree.contains(id) {
			return Err(GraphError::NodeNotFound { id: id.to_owned() });
		}
		if !self.tree.has_children(id) {
			return Ok(Vec::new());
		}
		self.expanded.toggle(id);
		self.reflatten();
		Ok(vec![Effect::Relayout])
	}

	pub fn expand_all(&mut self) -> Vec<Effect> {
		let before = self.expanded.len();
		self.expanded.extend(self.tree.ids_with_children());
		if self.expanded.len() == before {
			return Vec::new();
		}
		self.reflatten();
		vec![Effect::Relayout]
	}

	/// Collapse everything and drop both selection and highlight.
	pub fn collapse_all(&mut self) -> Vec<Effect> {
		self.expanded.clear();
		self.selection = Selection::None;
		self.highlight = Highlight::None;
		self.reflatten();
		vec![Effect::Relayout]
	}

	/// Drop selection and highlight, e.g. on a background click.
	pub fn clear(&mut self) {
		self.selection = Selection::None;
		self.highlight = Highlight::None;
	}

	fn write_fragment(&mut self, link: DeepLink) -> Effect {
		let fragment = link.fragment(&self.graph_id);
		self.pending_fragment = Some(fragment.clone());
		Effect::WriteFragment(fragment)
	}

	/// Expand the ancestors of `id`, and `id` itself when `with_self` is set
	/// and it has children.
	fn reveal(&mut self, id: &str, with_self: bool) -> Result<Vec<Effect>> {
		let Some(path) = self.tree.path_to(id) else {
			return Err(GraphError::NodeNotFound { id: id.to_owned() });
		};
		let mut changed = false;
		for ancestor in &path[..path.len() - 1] {
			changed |= self.expanded.expand(ancestor);
		}
		if with_self && self.tree.has_children(id) {
			changed |= self.expanded.expand(id);
		}
		if !changed {
			return Ok(Vec::new());
		}
		debug!("article-graph: expanded path {}", path.join(" > "));
		self.reflatten();
		Ok(vec![Effect::Relayout])
	}

	fn missing_edge(&self, id: &str) -> GraphError {
		let hidden = self
			.links
			.iter()
			.enumerate()
			.find(|(i, link)| flatten::link_id(link, *i) == id);
		match hidden {
			Some((_, link)) => GraphError::EdgeHidden {
				id: id.to_owned(),
				from: link.source.clone(),
				to: link.target.clone(),
			},
			None => GraphError::EdgeNotFound { id: id.to_owned() },
		}
	}

	fn reflatten(&mut self) {
		self.flat = flatten::flatten(&self.tree, &self.links, &self.expanded);
		let selection_gone = match &self.selection {
			Selection::None => false,
			Selection::Node(id) => !self.flat.contains_node(id),
			Selection::Edge(id) => self.flat.edge(id).is_none(),
		};
		if selection_gone {
			self.selection = Selection::None;
		}
		let highlight_gone = match &self.highlight {
			Highlight::None => false,
			Highlight::Node(id) => !self.flat.contains_node(id),
			Highlight::Edge(id) => self.flat.edge(id).is_none(),
		};
		if highlight_gone {
			self.highlight = Highlight::None;
		}
	}
}
