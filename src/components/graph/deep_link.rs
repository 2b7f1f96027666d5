//! URL fragments naming a node or edge of one graph instance:
//! `#{graph_id}-node-{id}` and `#{graph_id}-edge-{id}`, with the id
//! percent-encoded.

use std::borrow::Cow;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeepLink {
	Node(String),
	Edge(String),
}

impl DeepLink {
	/// Parse a fragment, with or without the leading `#`, encoded or not.
	/// `None` if it does not belong to `graph_id`.
	pub fn parse(graph_id: &str, fragment: &str) -> Option<Self> {
		let fragment = decode(fragment.strip_prefix('#').unwrap_or(fragment));
		let rest = fragment.strip_prefix(graph_id)?.strip_prefix('-')?;
		if let Some(id) = rest.strip_prefix("node-") {
			(!id.is_empty()).then(|| DeepLink::Node(id.to_owned()))
		} else if let Some(id) = rest.strip_prefix("edge-") {
			(!id.is_empty()).then(|| DeepLink::Edge(id.to_owned()))
		} else {
			None
		}
	}

	/// Fragment text without the leading `#`.
	pub fn fragment(&self, graph_id: &str) -> String {
		match self {
			DeepLink::Node(id) => format!("{graph_id}-node-{}", urlencoding::encode(id)),
			DeepLink::Edge(id) => format!("{graph_id}-edge-{}", urlencoding::encode(id)),
		}
	}

	pub fn id(&self) -> &str {
		match self {
			DeepLink::Node(id) | DeepLink::Edge(id) => id,
		}
	}
}

/// Percent-decode fragment text. Malformed escapes are kept as written.
pub fn decode(fragment: &str) -> Cow<'_, str> {
	urlencoding::decode(fragment).unwrap_or(Cow::Borrowed(fragment))
}

/// Shareable URL for `link`, given the page URL without its fragment.
pub fn anchor_url(page: &str, graph_id: &str, link: &DeepLink) -> String {
	let page = page.split('#').next().unwrap_or(page);
	format!("{page}#{}", link.fragment(graph_id))
}
