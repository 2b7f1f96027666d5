//! Graph data structures supplied by the host page.

use serde::Deserialize;

/// A node in the input tree. Children are only laid out while the node is
/// expanded.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
	/// Unique identifier, also used in deep-link fragments.
	pub id: String,
	/// Short label, used when no title is set.
	#[serde(default)]
	pub label: String,
	/// Display title.
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	/// CSS color override. Falls back to the palette when unset.
	#[serde(default)]
	pub color: Option<String>,
	/// Palette index override.
	#[serde(default)]
	pub group: Option<u32>,
	#[serde(default)]
	pub children: Vec<TreeNode>,
	/// Id of the article section this node documents.
	#[serde(default)]
	pub markdown_section: Option<String>,
	/// External reference links shown in the detail panel.
	#[serde(default)]
	pub key_links: Vec<String>,
}

/// Side-by-side feature lists carried by a comparison link.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ComparisonDetails {
	/// Features both sides share.
	#[serde(default)]
	pub similarities: Vec<String>,
	/// Features only the source has.
	#[serde(default)]
	pub source_only: Vec<String>,
	/// Features only the target has.
	#[serde(default)]
	pub target_only: Vec<String>,
}

impl ComparisonDetails {
	/// The same comparison seen from the other end.
	pub fn reversed(&self) -> Self {
		Self {
			similarities: self.similarities.clone(),
			source_only: self.target_only.clone(),
			target_only: self.source_only.clone(),
		}
	}
}

/// What an input link means.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LinkKind {
	/// An arbitrary directed, optionally labeled relationship.
	#[default]
	Directed,
	/// One half of an undirected "differs from" pair.
	Comparison(ComparisonDetails),
}

/// A link between two nodes of the tree, in any position of the hierarchy.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawLink")]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	/// Stable id for deep links. Synthesized during flattening when absent.
	pub id: Option<String>,
	pub label: Option<String>,
	/// Weight, drawn as stroke width.
	pub value: Option<f64>,
	pub markdown_section: Option<String>,
	pub kind: LinkKind,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLink {
	source: String,
	target: String,
	#[serde(default)]
	id: Option<String>,
	#[serde(default)]
	label: Option<String>,
	#[serde(default)]
	value: Option<f64>,
	#[serde(default)]
	markdown_section: Option<String>,
	#[serde(default, rename = "type")]
	kind: Option<String>,
	#[serde(default)]
	similarities: Vec<String>,
	#[serde(default)]
	differences: Option<RawDifferences>,
}

#[derive(Default, Deserialize)]
struct RawDifferences {
	#[serde(default)]
	source: Vec<String>,
	#[serde(default)]
	target: Vec<String>,
}

impl From<RawLink> for GraphLink {
	fn from(raw: RawLink) -> Self {
		let kind = match raw.kind.as_deref() {
			Some("differentiating") | Some("comparison") => {
				let differences = raw.differences.unwrap_or_default();
				LinkKind::Comparison(ComparisonDetails {
					similarities: raw.similarities,
					source_only: differences.source,
					target_only: differences.target,
				})
			}
			_ => LinkKind::Directed,
		};
		Self {
			source: raw.source,
			target: raw.target,
			id: raw.id,
			label: raw.label,
			value: raw.value,
			markdown_section: raw.markdown_section,
			kind,
		}
	}
}

/// Complete graph input: a forest of nodes plus cross links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<TreeNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse the `{ nodes, links }` JSON document hosts embed in the page.
	pub fn from_json(text: &str) -> super::error::Result<Self> {
		serde_json::from_str(text).map_err(|e| super::error::GraphError::InvalidData {
			reason: e.to_string(),
		})
	}
}
