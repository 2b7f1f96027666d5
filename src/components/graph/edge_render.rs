use super::flatten::{EdgeKind, FlatEdge};
use super::geometry::{self, ARROW_LENGTH, EdgeSegment, Point};
use super::surface::Surface;
use super::theme::Theme;

const MIN_WIDTH: f64 = 2.0;
const HIGHLIGHT_WIDTH: f64 = 1.5;
const COMPARISON_WIDTH: f64 = 0.6;
const COMPARISON_DASH: [f64; 2] = [12.0, 8.0];
const LABEL_FONT_PX: f64 = 10.0;
const LABEL_PADDING_PX: f64 = 4.0;

/// A circle an edge attaches to.
#[derive(Clone, Copy, Debug)]
pub struct Endpoint {
	pub pos: Point,
	pub radius: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeStyle {
	pub highlighted: bool,
	/// Label badges are hidden below this zoom.
	pub min_zoom_for_labels: f64,
}

/// Screen-space line width for an edge of weight `value`, before highlight.
pub fn base_width(value: f64) -> f64 {
	let scaled = if value.is_finite() && value > 0.0 { value.sqrt() * 2.0 } else { 0.0 };
	scaled.max(MIN_WIDTH)
}

/// Draw `edge` between two node circles under a transform already scaled by
/// `zoom`. Nothing is drawn when the circles overlap or a position is not
/// finite.
pub fn render_edge(
	surface: &impl Surface,
	edge: &FlatEdge,
	from: Endpoint,
	to: Endpoint,
	zoom: f64,
	theme: &Theme,
	style: EdgeStyle,
) {
	if !zoom.is_finite() || zoom <= 0.0 {
		return;
	}
	let Some(seg) = geometry::edge_segment(from.pos, from.radius, to.pos, to.radius) else {
		return;
	};

	let mut width = base_width(edge.value) / zoom;
	if style.highlighted {
		width *= HIGHLIGHT_WIDTH;
	}

	match &edge.kind {
		EdgeKind::Comparison(_) => {
			let color = if style.highlighted { theme.highlight } else { theme.comparison };
			let dash = [COMPARISON_DASH[0] / zoom, COMPARISON_DASH[1] / zoom];
			surface.set_line_dash(&dash);
			surface.begin_path();
			surface.move_to(seg.start.x, seg.start.y);
			surface.line_to(seg.end.x, seg.end.y);
			surface.stroke(color, width * COMPARISON_WIDTH);
			surface.set_line_dash(&[]);
		}
		EdgeKind::Directed | EdgeKind::Hierarchy => {
			let color = if style.highlighted { theme.highlight } else { theme.link };
			draw_arrow_line(surface, &seg, from.pos, to, color, width);
		}
	}

	if matches!(edge.kind, EdgeKind::Hierarchy) || zoom < style.min_zoom_for_labels {
		return;
	}
	if let Some(label) = edge.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
		draw_badge(surface, label, seg.mid, zoom, theme, style.highlighted);
	}
}

fn draw_arrow_line(
	surface: &impl Surface,
	seg: &EdgeSegment,
	source: Point,
	to: Endpoint,
	color: &str,
	width: f64,
) {
	let rel = geometry::arrow_tip_rel_pos(seg.distance, to.radius);
	let tip = source.lerp(to.pos, rel);
	let (ux, uy) = seg.dir;
	let back = Point::new(tip.x - ux * ARROW_LENGTH, tip.y - uy * ARROW_LENGTH);

	surface.begin_path();
	surface.move_to(seg.start.x, seg.start.y);
	if seg.start.distance(tip) > ARROW_LENGTH {
		surface.line_to(back.x, back.y);
	} else {
		surface.line_to(tip.x, tip.y);
	}
	surface.stroke(color, width);

	let (px, py) = (-uy * ARROW_LENGTH * 0.5, ux * ARROW_LENGTH * 0.5);
	surface.begin_path();
	surface.move_to(tip.x, tip.y);
	surface.line_to(back.x + px, back.y + py);
	surface.line_to(back.x - px, back.y - py);
	surface.close_path();
	surface.fill(color);
}

fn draw_badge(
	surface: &impl Surface,
	label: &str,
	mid: Point,
	zoom: f64,
	theme: &Theme,
	highlighted: bool,
) {
	let px = LABEL_FONT_PX / zoom;
	let pad = LABEL_PADDING_PX / zoom;
	let w = surface.text_width(label, px) + pad * 2.0;
	let h = px + pad * 2.0;
	let (fill, text) = if highlighted {
		(theme.badge_highlight, theme.badge_text_highlight)
	} else {
		(theme.badge, theme.badge_text)
	};
	surface.fill_rect(mid.x - w / 2.0, mid.y - h / 2.0, w, h, fill);
	surface.fill_text(label, mid.x, mid.y, px, text);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::testing::{Op, RecordingSurface};
	use crate::components::graph::types::ComparisonDetails;

	fn edge(kind: EdgeKind, label: Option<&str>) -> FlatEdge {
		FlatEdge {
			id: "a-b-0".into(),
			source: "a".into(),
			target: "b".into(),
			label: label.map(str::to_owned),
			value: 1.0,
			markdown_section: None,
			kind,
		}
	}

	fn ends() -> (Endpoint, Endpoint) {
		(
			Endpoint {
				pos: Point::new(0.0, 0.0),
				radius: 12.0,
			},
			Endpoint {
				pos: Point::new(100.0, 0.0),
				radius: 8.0,
			},
		)
	}

	fn style() -> EdgeStyle {
		EdgeStyle {
			highlighted: false,
			min_zoom_for_labels: 0.5,
		}
	}

	#[test]
	fn directed_edges_touch_the_boundaries() {
		let surface = RecordingSurface::new();
		let (a, b) = ends();
		render_edge(&surface, &edge(EdgeKind::Directed, None), a, b, 1.0, &Theme::light(), style());
		let ops = surface.ops();
		assert_eq!(ops[1], Op::MoveTo(12.0, 0.0));
		let Op::MoveTo(tip_x, _) = ops[5] else {
			panic!("expected arrow tip, got {:?}", ops[5]);
		};
		assert!((tip_x - 92.0).abs() < 1e-9);
		assert_eq!(surface.count(|op| *op == Op::ClosePath), 1);
	}

	#[test]
	fn labels_get_a_badge_behind_them() {
		let surface = RecordingSurface::new();
		let (a, b) = ends();
		let uses = edge(EdgeKind::Directed, Some("uses"));
		render_edge(&surface, &uses, a, b, 1.0, &Theme::light(), style());
		let ops = surface.ops();
		let rect = ops.iter().position(|op| matches!(op, Op::FillRect { .. })).expect("badge");
		let text = ops.iter().position(|op| matches!(op, Op::Text { .. })).expect("label");
		assert!(rect < text);
		assert_eq!(surface.texts(), vec!["uses".to_owned()]);
	}

	#[test]
	fn labels_hide_when_zoomed_out() {
		let surface = RecordingSurface::new();
		let (a, b) = ends();
		let uses = edge(EdgeKind::Directed, Some("uses"));
		render_edge(&surface, &uses, a, b, 0.4, &Theme::light(), style());
		assert!(surface.texts().is_empty());
		assert_eq!(surface.count(|op| matches!(op, Op::FillRect { .. })), 0);
	}

	#[test]
	fn comparisons_are_dashed_without_arrows() {
		let theme = Theme::light();
		let surface = RecordingSurface::new();
		let (a, b) = ends();
		let kind = EdgeKind::Comparison(ComparisonDetails::default());
		render_edge(&surface, &edge(kind, None), a, b, 2.0, &theme, style());
		let ops = surface.ops();
		assert_eq!(ops[0], Op::LineDash(vec![6.0, 4.0]));
		assert_eq!(ops.last(), Some(&Op::LineDash(Vec::new())));
		assert_eq!(surface.count(|op| *op == Op::ClosePath), 0);
		assert!(ops.contains(&Op::Stroke {
			color: theme.comparison.into(),
			width: 1.0 * COMPARISON_WIDTH,
		}));
	}

	#[test]
	fn hierarchy_edges_never_show_labels() {
		let surface = RecordingSurface::new();
		let (a, b) = ends();
		let child = edge(EdgeKind::Hierarchy, Some("child"));
		render_edge(&surface, &child, a, b, 3.0, &Theme::light(), style());
		assert!(surface.texts().is_empty());
	}

	#[test]
	fn overlapping_or_invalid_endpoints_draw_nothing() {
		let surface = RecordingSurface::new();
		let (a, mut b) = ends();
		b.pos = Point::new(15.0, 0.0);
		render_edge(&surface, &edge(EdgeKind::Directed, None), a, b, 1.0, &Theme::light(), style());
		b.pos = Point::new(f64::NAN, 0.0);
		render_edge(&surface, &edge(EdgeKind::Directed, None), a, b, 1.0, &Theme::light(), style());
		assert!(surface.ops().is_empty());
	}

	#[test]
	fn highlight_widens_and_recolors() {
		let theme = Theme::dark();
		let surface = RecordingSurface::new();
		let (a, b) = ends();
		let mut e = edge(EdgeKind::Directed, None);
		e.value = 4.0;
		let highlighted = EdgeStyle {
			highlighted: true,
			..style()
		};
		render_edge(&surface, &e, a, b, 1.0, &theme, highlighted);
		assert!(surface.ops().contains(&Op::Stroke {
			color: theme.highlight.into(),
			width: 6.0,
		}));
	}

	#[test]
	fn widths_have_a_floor() {
		assert_eq!(base_width(0.25), MIN_WIDTH);
		assert_eq!(base_width(f64::NAN), MIN_WIDTH);
		assert_eq!(base_width(9.0), 6.0);
	}
}
