//! Arena view of the input tree.
//!
//! Nodes are stored flat, keyed by id, with parent/child links kept as id
//! relations. Both the flattener and deep-link resolution read from here, so
//! ancestors can be found even while they are collapsed.

use std::collections::{BTreeSet, HashMap};

use log::warn;

use super::types::TreeNode;

/// Node fields without the children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub title: Option<String>,
	pub description: Option<String>,
	pub color: Option<String>,
	pub group: Option<u32>,
	pub markdown_section: Option<String>,
	pub key_links: Vec<String>,
}

impl NodeInfo {
	fn from_tree_node(node: &TreeNode) -> Self {
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			title: node.title.clone(),
			description: node.description.clone(),
			color: node.color.clone(),
			group: node.group,
			markdown_section: node.markdown_section.clone(),
			key_links: node.key_links.clone(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeRecord {
	pub info: NodeInfo,
	pub parent: Option<String>,
	pub children: Vec<String>,
	pub depth: usize,
	/// Position among the parent's children (or among the roots).
	pub sibling_index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct NodeTree {
	records: HashMap<String, TreeRecord>,
	roots: Vec<String>,
}

impl NodeTree {
	pub fn new(roots: &[TreeNode]) -> Self {
		let mut tree = Self::default();
		for (i, node) in roots.iter().enumerate() {
			if tree.insert(node, None, 0, i) {
				tree.roots.push(node.id.clone());
			}
		}
		tree
	}

	fn insert(
		&mut self,
		node: &TreeNode,
		parent: Option<&str>,
		depth: usize,
		index: usize,
	) -> bool {
		if self.records.contains_key(&node.id) {
			warn!("article-graph: duplicate node id {}, keeping the first", node.id);
			return false;
		}
		self.records.insert(
			node.id.clone(),
			TreeRecord {
				info: NodeInfo::from_tree_node(node),
				parent: parent.map(str::to_owned),
				children: Vec::new(),
				depth,
				sibling_index: index,
			},
		);

		let mut children = Vec::with_capacity(node.children.len());
		for (i, child) in node.children.iter().enumerate() {
			if self.insert(child, Some(&node.id), depth + 1, i) {
				children.push(child.id.clone());
			}
		}
		if let Some(record) = self.records.get_mut(&node.id) {
			record.children = children;
		}
		true
	}

	pub fn roots(&self) -> &[String] {
		&self.roots
	}

	pub fn get(&self, id: &str) -> Option<&TreeRecord> {
		self.records.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.records.contains_key(id)
	}

	pub fn children(&self, id: &str) -> &[String] {
		self.records
			.get(id)
			.map(|r| r.children.as_slice())
			.unwrap_or(&[])
	}

	pub fn has_children(&self, id: &str) -> bool {
		!self.children(id).is_empty()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Ids from a root down to `id`, inclusive. `None` if the id is unknown.
	pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
		let mut path = Vec::new();
		let mut cursor = self.records.get(id)?;
		path.push(cursor.info.id.clone());
		while let Some(parent) = cursor.parent.as_deref() {
			cursor = self.records.get(parent)?;
			path.push(cursor.info.id.clone());
		}
		path.reverse();
		Some(path)
	}

	/// Every node that has at least one child.
	pub fn ids_with_children(&self) -> BTreeSet<String> {
		self.records
			.values()
			.filter(|r| !r.children.is_empty())
			.map(|r| r.info.id.clone())
			.collect()
	}
}
