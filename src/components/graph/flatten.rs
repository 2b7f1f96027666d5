//! Tree + expansion set → the flat node/edge lists the layout consumes.

use std::collections::HashMap;

use log::debug;

use super::comparison;
use super::expansion::ExpansionSet;
use super::tree::NodeTree;
use super::types::{ComparisonDetails, GraphLink, LinkKind};

/// Neo4j-like palette, indexed by sibling position when a node has no color.
pub const PALETTE: [&str; 8] = [
	"#68BDF6", "#60BE86", "#FF6B6B", "#FFD93D", "#A78BFA", "#FB7185", "#34D399", "#FBBF24",
];

#[derive(Clone, Debug, PartialEq)]
pub struct FlatNode {
	pub id: String,
	pub name: String,
	pub title: String,
	pub description: String,
	pub color: String,
	pub group: u32,
	pub has_children: bool,
	pub is_expanded: bool,
	pub parent: Option<String>,
	pub depth: usize,
	pub markdown_section: Option<String>,
	pub key_links: Vec<String>,
}

impl FlatNode {
	/// Text drawn inside the node.
	pub fn display_label(&self) -> &str {
		if !self.title.is_empty() {
			&self.title
		} else if !self.name.is_empty() {
			&self.name
		} else {
			&self.id
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum EdgeKind {
	/// Parent → child, implied by an expanded parent.
	Hierarchy,
	/// Domain edge from the input link list.
	Directed,
	/// One member of a comparison pair.
	Comparison(ComparisonDetails),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlatEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: Option<String>,
	pub value: f64,
	pub markdown_section: Option<String>,
	pub kind: EdgeKind,
}

impl FlatEdge {
	pub fn is_comparison(&self) -> bool {
		matches!(self.kind, EdgeKind::Comparison(_))
	}
}

#[derive(Clone, Debug, Default)]
pub struct FlatGraph {
	pub nodes: Vec<FlatNode>,
	pub edges: Vec<FlatEdge>,
	node_index: HashMap<String, usize>,
	edge_index: HashMap<String, usize>,
}

impl FlatGraph {
	pub fn node(&self, id: &str) -> Option<&FlatNode> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn edge(&self, id: &str) -> Option<&FlatEdge> {
		self.edge_index.get(id).map(|&i| &self.edges[i])
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node_index.contains_key(id)
	}

	/// The other member of a comparison pair, if it is present.
	pub fn twin_of(&self, edge: &FlatEdge) -> Option<&FlatEdge> {
		if !edge.is_comparison() {
			return None;
		}
		comparison::twin_id(&edge.id).and_then(|id| self.edge(&id))
	}

	fn push_node(&mut self, node: FlatNode) {
		self.node_index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
	}

	fn push_edge(&mut self, edge: FlatEdge) {
		if self.edge_index.contains_key(&edge.id) {
			debug!("article-graph: skipping duplicate edge id {}", edge.id);
			return;
		}
		self.edge_index.insert(edge.id.clone(), self.edges.len());
		self.edges.push(edge);
	}
}

/// Id of a link from the input list, synthesized from its position when the
/// link carries none.
pub fn link_id(link: &GraphLink, index: usize) -> String {
	link.id
		.clone()
		.unwrap_or_else(|| format!("{}-{}-{}", link.source, link.target, index))
}

/// Depth-first walk emitting every root, and the children of every expanded
/// node, followed by the input links whose endpoints are both visible.
pub fn flatten(tree: &NodeTree, links: &[GraphLink], expanded: &ExpansionSet) -> FlatGraph {
	let mut graph = FlatGraph::default();
	for root in tree.roots() {
		visit(tree, root, expanded, &mut graph);
	}

	for (index, link) in links.iter().enumerate() {
		if !graph.contains_node(&link.source) || !graph.contains_node(&link.target) {
			continue;
		}
		let kind = match &link.kind {
			LinkKind::Directed => EdgeKind::Directed,
			LinkKind::Comparison(details) => EdgeKind::Comparison(details.clone()),
		};
		graph.push_edge(FlatEdge {
			id: link_id(link, index),
			source: link.source.clone(),
			target: link.target.clone(),
			label: link.label.clone(),
			value: link.value.unwrap_or(1.0),
			markdown_section: link.markdown_section.clone(),
			kind,
		});
	}
	graph
}

fn visit(tree: &NodeTree, id: &str, expanded: &ExpansionSet, graph: &mut FlatGraph) {
	let Some(record) = tree.get(id) else {
		return;
	};
	let info = &record.info;
	let slot = record.sibling_index % PALETTE.len();
	let is_expanded = expanded.contains(id);

	graph.push_node(FlatNode {
		id: info.id.clone(),
		name: info.label.clone(),
		title: info.title.clone().unwrap_or_else(|| info.label.clone()),
		description: info.description.clone().unwrap_or_default(),
		color: info.color.clone().unwrap_or_else(|| PALETTE[slot].to_owned()),
		group: info.group.unwrap_or(slot as u32),
		has_children: !record.children.is_empty(),
		is_expanded,
		parent: record.parent.clone(),
		depth: record.depth,
		markdown_section: info.markdown_section.clone(),
		key_links: info.key_links.clone(),
	});

	if let Some(parent) = &record.parent {
		graph.push_edge(FlatEdge {
			id: format!("{parent}-{id}"),
			source: parent.clone(),
			target: id.to_owned(),
			label: None,
			value: 1.0,
			markdown_section: None,
			kind: EdgeKind::Hierarchy,
		});
	}

	if is_expanded {
		for child in &record.children {
			visit(tree, child, expanded, graph);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::types::TreeNode;

	fn node(id: &str, children: Vec<TreeNode>) -> TreeNode {
		TreeNode {
			id: id.into(),
			label: id.into(),
			children,
			..Default::default()
		}
	}

	fn ids(graph: &FlatGraph) -> (Vec<&str>, Vec<&str>) {
		(
			graph.nodes.iter().map(|n| n.id.as_str()).collect(),
			graph.edges.iter().map(|e| e.id.as_str()).collect(),
		)
	}

	#[test]
	fn collapsed_root_hides_children() {
		let tree = NodeTree::new(&[node("A", vec![node("B", vec![]), node("C", vec![])])]);
		let graph = flatten(&tree, &[], &ExpansionSet::new());
		assert_eq!(ids(&graph), (vec!["A"], vec![]));
		assert!(graph.nodes[0].has_children);
		assert!(!graph.nodes[0].is_expanded);
	}

	#[test]
	fn expanding_root_adds_children_and_hierarchy_edges() {
		let tree = NodeTree::new(&[node("A", vec![node("B", vec![]), node("C", vec![])])]);
		let expanded: ExpansionSet = ["A"].into_iter().collect();
		let graph = flatten(&tree, &[], &expanded);
		assert_eq!(ids(&graph), (vec!["A", "B", "C"], vec!["A-B", "A-C"]));
		assert!(graph.edges.iter().all(|e| e.kind == EdgeKind::Hierarchy));
	}

	#[test]
	fn presence_requires_every_ancestor_expanded() {
		let tree = NodeTree::new(&[node(
			"A",
			vec![node("B", vec![node("D", vec![])]), node("C", vec![])],
		)]);
		let cases: [(&[&str], &[&str]); 4] = [
			(&[], &["A"]),
			(&["B"], &["A"]),
			(&["A"], &["A", "B", "C"]),
			(&["A", "B"], &["A", "B", "D", "C"]),
		];
		for (expanded, expected) in cases {
			let expanded: ExpansionSet = expanded.iter().copied().collect();
			let graph = flatten(&tree, &[], &expanded);
			let (nodes, _) = ids(&graph);
			assert_eq!(nodes, expected, "expanded = {expanded:?}");
			for node in &graph.nodes {
				let path = tree.path_to(&node.id).unwrap();
				assert!(path[..path.len() - 1].iter().all(|a| expanded.contains(a)));
			}
			for edge in graph.edges.iter().filter(|e| e.kind == EdgeKind::Hierarchy) {
				assert!(graph.contains_node(&edge.target));
			}
		}
	}

	#[test]
	fn palette_assignment_is_positional() {
		let children = (0..10).map(|i| node(&format!("n{i}"), vec![])).collect();
		let mut colored = node("root", children);
		colored.children[1].color = Some("#000000".into());
		let tree = NodeTree::new(&[colored]);
		let expanded: ExpansionSet = ["root"].into_iter().collect();
		let graph = flatten(&tree, &[], &expanded);

		assert_eq!(graph.node("n0").unwrap().color, PALETTE[0]);
		assert_eq!(graph.node("n1").unwrap().color, "#000000");
		assert_eq!(graph.node("n9").unwrap().color, PALETTE[1]);
		assert_eq!(graph.node("n9").unwrap().group, 1);
	}

	#[test]
	fn input_links_get_ids_and_need_visible_endpoints() {
		let tree = NodeTree::new(&[node("A", vec![node("B", vec![])]), node("X", vec![])]);
		let links = vec![
			GraphLink {
				source: "A".into(),
				target: "X".into(),
				label: Some("uses".into()),
				..Default::default()
			},
			GraphLink {
				source: "B".into(),
				target: "X".into(),
				id: Some("b-to-x".into()),
				..Default::default()
			},
		];

		let collapsed = flatten(&tree, &links, &ExpansionSet::new());
		assert_eq!(ids(&collapsed).1, vec!["A-X-0"]);
		assert_eq!(collapsed.edge("A-X-0").unwrap().value, 1.0);

		let expanded: ExpansionSet = ["A"].into_iter().collect();
		let open = flatten(&tree, &links, &expanded);
		assert_eq!(ids(&open).1, vec!["A-B", "A-X-0", "b-to-x"]);
		assert_eq!(open.edge("b-to-x").unwrap().kind, EdgeKind::Directed);
	}

	#[test]
	fn display_label_prefers_title() {
		let mut n = node("id-1", vec![]);
		n.label = "Label".into();
		n.title = Some("Title".into());
		let tree = NodeTree::new(&[n]);
		let graph = flatten(&tree, &[], &ExpansionSet::new());
		assert_eq!(graph.nodes[0].display_label(), "Title");

		let bare = NodeTree::new(&[TreeNode {
			id: "only-id".into(),
			..Default::default()
		}]);
		let graph = flatten(&bare, &[], &ExpansionSet::new());
		assert_eq!(graph.nodes[0].display_label(), "only-id");
	}

	#[test]
	fn comparison_twins_resolve() {
		let tree = NodeTree::new(&[node("a", vec![]), node("b", vec![])]);
		let mut pairs = comparison::ComparisonLinks::new();
		pairs.insert("a", "b", None, ComparisonDetails::default());
		let graph = flatten(&tree, &pairs.into_links(), &ExpansionSet::new());
		let forward = graph.edge("compare-a-b-forward").unwrap();
		assert_eq!(graph.twin_of(forward).unwrap().id, "compare-a-b-reverse");
	}
}
