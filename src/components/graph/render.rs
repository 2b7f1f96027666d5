use std::collections::HashMap;

use super::comparison::{self, PairSide};
use super::config::GraphConfig;
use super::edge_render::{self, EdgeStyle, Endpoint};
use super::flatten::{FlatEdge, FlatGraph};
use super::geometry::{self, Point};
use super::node_render::{self, NodeStyle};
use super::selection::Coordinator;
use super::surface::Surface;
use super::theme::Theme;
use super::viewport::ViewTransform;

/// Everything one frame reads.
pub struct Frame<'a> {
	pub coordinator: &'a Coordinator,
	pub positions: &'a HashMap<String, Point>,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	pub theme: &'a Theme,
	pub config: &'a GraphConfig,
}

/// The reverse member of a comparison pair is drawn by its forward twin.
pub fn drawn_by_twin(flat: &FlatGraph, edge: &FlatEdge) -> bool {
	matches!(comparison::split_id(&edge.id), Some((_, PairSide::Reverse)))
		&& edge.is_comparison()
		&& flat.twin_of(edge).is_some()
}

pub fn render(surface: &impl Surface, frame: &Frame<'_>) {
	surface.fill_rect(0.0, 0.0, frame.width, frame.height, frame.theme.background);
	surface.save();
	surface.translate(frame.transform.x, frame.transform.y);
	surface.scale(frame.transform.k);
	draw_edges(surface, frame);
	draw_nodes(surface, frame);
	surface.restore();
}

fn endpoint(frame: &Frame<'_>, id: &str) -> Option<Endpoint> {
	let node = frame.coordinator.flat().node(id)?;
	let pos = *frame.positions.get(id)?;
	Some(Endpoint {
		pos,
		radius: geometry::node_radius(node.has_children),
	})
}

fn draw_edges(surface: &impl Surface, frame: &Frame<'_>) {
	let flat = frame.coordinator.flat();
	for edge in &flat.edges {
		if drawn_by_twin(flat, edge) {
			continue;
		}
		let (Some(from), Some(to)) =
			(endpoint(frame, &edge.source), endpoint(frame, &edge.target))
		else {
			continue;
		};
		let style = EdgeStyle {
			highlighted: frame.coordinator.is_edge_highlighted(edge),
			min_zoom_for_labels: frame.config.min_zoom_for_labels,
		};
		edge_render::render_edge(surface, edge, from, to, frame.transform.k, frame.theme, style);
	}
}

fn draw_nodes(surface: &impl Surface, frame: &Frame<'_>) {
	let coordinator = frame.coordinator;
	let highlighted = coordinator.highlighted_node();
	let nodes = coordinator.flat().nodes.iter();
	// Highlighted node last so its glow sits on top.
	let ordered = nodes
		.clone()
		.filter(|n| Some(n.id.as_str()) != highlighted)
		.chain(nodes.filter(|n| Some(n.id.as_str()) == highlighted));

	for node in ordered {
		let Some(&pos) = frame.positions.get(&node.id) else {
			continue;
		};
		let style = NodeStyle {
			highlighted: coordinator.is_node_highlighted(&node.id),
			selected: coordinator.is_node_selected(&node.id),
			label_padding: frame.config.label_padding,
		};
		node_render::render_node(surface, node, pos, frame.transform.k, frame.theme, style);
	}
}
