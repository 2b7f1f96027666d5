//! Comparison links: undirected "differs from" relations stored as a
//! forward/reverse pair of directed links sharing a base id.

use std::collections::HashSet;

use super::types::{ComparisonDetails, GraphLink, LinkKind};

pub const FORWARD_SUFFIX: &str = "-forward";
pub const REVERSE_SUFFIX: &str = "-reverse";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairSide {
	Forward,
	Reverse,
}

/// Base id for the unordered pair `{a, b}`.
pub fn base_id(a: &str, b: &str) -> String {
	let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
	format!("compare-{lo}-{hi}")
}

/// Split a pair member's id into its base id and side.
pub fn split_id(edge_id: &str) -> Option<(&str, PairSide)> {
	if let Some(base) = edge_id.strip_suffix(FORWARD_SUFFIX) {
		Some((base, PairSide::Forward))
	} else {
		edge_id
			.strip_suffix(REVERSE_SUFFIX)
			.map(|base| (base, PairSide::Reverse))
	}
}

/// Id of the other member of a pair.
pub fn twin_id(edge_id: &str) -> Option<String> {
	split_id(edge_id).map(|(base, side)| match side {
		PairSide::Forward => format!("{base}{REVERSE_SUFFIX}"),
		PairSide::Reverse => format!("{base}{FORWARD_SUFFIX}"),
	})
}

/// Builds comparison pairs without ever emitting the same unordered pair
/// twice.
#[derive(Clone, Debug, Default)]
pub struct ComparisonLinks {
	links: Vec<GraphLink>,
	/// Unordered pairs seen so far, keyed by [`base_id`].
	pairs: HashSet<String>,
}

impl ComparisonLinks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add the pair `a ⇄ b` under the base id `compare-{lo}-{hi}`. Returns
	/// `false` if the pair already exists in either orientation, or if
	/// `a == b`.
	pub fn insert(
		&mut self,
		a: &str,
		b: &str,
		label: Option<String>,
		details: ComparisonDetails,
	) -> bool {
		self.insert_as(&base_id(a, b), a, b, label, details)
	}

	/// Like [`insert`](Self::insert), with a caller-chosen base id.
	pub fn insert_as(
		&mut self,
		base: &str,
		a: &str,
		b: &str,
		label: Option<String>,
		details: ComparisonDetails,
	) -> bool {
		if a == b || !self.pairs.insert(base_id(a, b)) {
			return false;
		}

		self.links.push(GraphLink {
			source: a.to_owned(),
			target: b.to_owned(),
			id: Some(format!("{base}{FORWARD_SUFFIX}")),
			label: label.clone(),
			value: None,
			markdown_section: None,
			kind: LinkKind::Comparison(details.clone()),
		});
		self.links.push(GraphLink {
			source: b.to_owned(),
			target: a.to_owned(),
			id: Some(format!("{base}{REVERSE_SUFFIX}")),
			label,
			value: None,
			markdown_section: None,
			kind: LinkKind::Comparison(details.reversed()),
		});
		true
	}

	pub fn contains(&self, a: &str, b: &str) -> bool {
		self.pairs.contains(&base_id(a, b))
	}

	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	pub fn into_links(self) -> Vec<GraphLink> {
		self.links
	}
}

/// Input links ready for flattening: every link without an id gets its
/// positional id `{source}-{target}-{index}`, and each comparison link
/// without a pair id becomes a forward/reverse pair, based on its own id when
/// it has one. Repeated comparisons of the same unordered pair are dropped.
pub fn normalize(links: &[GraphLink]) -> Vec<GraphLink> {
	let mut out = Vec::with_capacity(links.len());
	let mut pairs = ComparisonLinks::new();
	for (index, link) in links.iter().enumerate() {
		let paired = link.id.as_deref().and_then(split_id).is_some();
		match &link.kind {
			LinkKind::Comparison(details) if !paired => {
				let base = link
					.id
					.clone()
					.unwrap_or_else(|| base_id(&link.source, &link.target));
				let label = link.label.clone();
				if pairs.insert_as(&base, &link.source, &link.target, label, details.clone()) {
					out.extend(pairs.links.drain(..).map(|mut member| {
						member.value = link.value;
						member.markdown_section = link.markdown_section.clone();
						member
					}));
				}
			}
			_ => {
				let mut link = link.clone();
				if link.id.is_none() {
					link.id = Some(format!("{}-{}-{}", link.source, link.target, index));
				}
				out.push(link);
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pairs_share_a_sorted_base_id() {
		let mut links = ComparisonLinks::new();
		let vs = Some("vs.".into());
		assert!(links.insert("LangGraph", "CrewAI", vs, ComparisonDetails::default()));
		let links = links.into_links();

		assert_eq!(links.len(), 2);
		assert_eq!(links[0].id.as_deref(), Some("compare-CrewAI-LangGraph-forward"));
		assert_eq!(links[1].id.as_deref(), Some("compare-CrewAI-LangGraph-reverse"));
		assert_eq!((links[0].source.as_str(), links[0].target.as_str()), ("LangGraph", "CrewAI"));
		assert_eq!((links[1].source.as_str(), links[1].target.as_str()), ("CrewAI", "LangGraph"));
	}

	#[test]
	fn same_unordered_pair_is_suppressed() {
		let mut links = ComparisonLinks::new();
		assert!(links.insert("a", "b", None, ComparisonDetails::default()));
		assert!(!links.insert("b", "a", None, ComparisonDetails::default()));
		assert!(!links.insert("a", "b", None, ComparisonDetails::default()));
		assert!(!links.insert("c", "c", None, ComparisonDetails::default()));
		assert!(links.contains("b", "a"));
		assert_eq!(links.len(), 1);

		let ids: Vec<_> = links.into_links().into_iter().filter_map(|l| l.id).collect();
		let unique: HashSet<_> = ids.iter().collect();
		assert_eq!(ids.len(), unique.len());
	}

	#[test]
	fn reverse_member_swaps_differences() {
		let mut links = ComparisonLinks::new();
		links.insert(
			"a",
			"b",
			None,
			ComparisonDetails {
				similarities: vec![],
				source_only: vec!["only-a".into()],
				target_only: vec!["only-b".into()],
			},
		);
		let links = links.into_links();
		let LinkKind::Comparison(reverse) = &links[1].kind else {
			panic!("reverse member must be a comparison");
		};
		assert_eq!(reverse.source_only, vec!["only-b"]);
	}

	#[test]
	fn normalize_pairs_raw_comparisons_and_pins_ids() {
		let comparison = |a: &str, b: &str| GraphLink {
			source: a.into(),
			target: b.into(),
			markdown_section: Some("versus".into()),
			kind: LinkKind::Comparison(ComparisonDetails::default()),
			..Default::default()
		};
		let links = vec![
			comparison("b", "a"),
			GraphLink {
				source: "a".into(),
				target: "c".into(),
				..Default::default()
			},
			comparison("a", "b"),
		];
		let out = normalize(&links);
		let ids: Vec<_> = out.iter().filter_map(|l| l.id.as_deref()).collect();
		assert_eq!(ids, vec!["compare-a-b-forward", "compare-a-b-reverse", "a-c-1"]);
		assert_eq!(out[0].source, "b");
		assert_eq!(out[1].markdown_section.as_deref(), Some("versus"));
	}

	#[test]
	fn given_comparison_ids_name_the_pair() {
		let comparison = |id: Option<&str>, a: &str, b: &str| GraphLink {
			source: a.into(),
			target: b.into(),
			id: id.map(str::to_owned),
			kind: LinkKind::Comparison(ComparisonDetails::default()),
			..Default::default()
		};
		let links = vec![
			comparison(Some("a-vs-b"), "a", "b"),
			comparison(None, "b", "a"),
			comparison(Some("again"), "a", "b"),
		];
		let out = normalize(&links);
		let ids: Vec<_> = out.iter().filter_map(|l| l.id.as_deref()).collect();
		assert_eq!(ids, vec!["a-vs-b-forward", "a-vs-b-reverse"]);
		assert_eq!(twin_id(ids[0]).as_deref(), Some("a-vs-b-reverse"));
	}

	#[test]
	fn twin_ids() {
		assert_eq!(twin_id("compare-a-b-forward").as_deref(), Some("compare-a-b-reverse"));
		assert_eq!(twin_id("compare-a-b-reverse").as_deref(), Some("compare-a-b-forward"));
		assert_eq!(split_id("a-b"), None);
	}
}
