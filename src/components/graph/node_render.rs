use super::flatten::FlatNode;
use super::geometry::{self, Point};
use super::surface::Surface;
use super::text_fit::{self, LabelBox};
use super::theme::Theme;

const EXPANDED_GLYPH: &str = "▼";
const COLLAPSED_GLYPH: &str = "▶";
const LEAF_GLYPH: &str = "🌿";
const PARENT_GLYPH_FRACTION: f64 = 0.2;
const LEAF_GLYPH_FRACTION: f64 = 0.15;
const HIGHLIGHT_GLOW: f64 = 4.0;
const SELECTED_GLOW_RINGS: [(f64, &str); 3] = [
	(3.0, "rgba(255, 215, 0, 0.15)"),
	(2.0, "rgba(255, 215, 0, 0.25)"),
	(1.5, "rgba(255, 215, 0, 0.4)"),
];

/// How one node should look this frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeStyle {
	pub highlighted: bool,
	pub selected: bool,
	/// Inner label padding in graph units.
	pub label_padding: f64,
}

pub fn status_glyph(node: &FlatNode) -> &'static str {
	match (node.has_children, node.is_expanded) {
		(false, _) => LEAF_GLYPH,
		(true, true) => EXPANDED_GLYPH,
		(true, false) => COLLAPSED_GLYPH,
	}
}

/// Draw `node` at `pos` under a transform already scaled by `zoom`.
/// Nothing is drawn at a non-finite position.
pub fn render_node(
	surface: &impl Surface,
	node: &FlatNode,
	pos: Point,
	zoom: f64,
	theme: &Theme,
	style: NodeStyle,
) {
	if !pos.is_finite() || !zoom.is_finite() || zoom <= 0.0 {
		return;
	}
	let r = geometry::node_radius(node.has_children);

	if style.selected {
		for (scale, color) in SELECTED_GLOW_RINGS {
			let outer = r * scale;
			surface.begin_path();
			surface.circle(pos.x, pos.y, outer);
			let stops = [(0.0, color), (1.0, "rgba(255, 215, 0, 0)")];
			surface.fill_radial(pos.x, pos.y, r, outer, &stops);
		}
	}
	if style.highlighted {
		surface.begin_path();
		surface.circle(pos.x, pos.y, r + HIGHLIGHT_GLOW / zoom);
		surface.fill(theme.highlight_glow);
	}

	surface.begin_path();
	surface.circle(pos.x, pos.y, r);
	surface.fill(&node.color);
	if style.highlighted {
		surface.stroke(theme.highlight, 4.0 / zoom);
	} else {
		surface.stroke(theme.node_border, 2.0 / zoom);
	}

	surface.save();
	surface.begin_path();
	surface.circle(pos.x, pos.y, r);
	surface.clip();

	let bounds = LabelBox {
		node_y: pos.y,
		radius: r,
		zoom,
		padding: style.label_padding,
	};
	if let Some(label) = text_fit::fit_label(surface, node.display_label(), bounds) {
		let px = label.font_px / zoom;
		for line in &label.lines {
			surface.fill_text(&line.text, pos.x, line.y, px, theme.node_label);
		}
	}

	let fraction = if node.has_children { PARENT_GLYPH_FRACTION } else { LEAF_GLYPH_FRACTION };
	let glyph_y = geometry::status_band_center_y(pos.y, r);
	surface.fill_text(status_glyph(node), pos.x, glyph_y, r * fraction, theme.node_label);
	surface.restore();
}
