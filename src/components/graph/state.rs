use log::{debug, warn};

use super::config::GraphConfig;
use super::edge_render;
use super::error::Result;
use super::geometry::{self, Point};
use super::layout::ForceLayout;
use super::render::{self, Frame};
use super::selection::{Coordinator, Effect, Highlight};
use super::surface::Surface;
use super::theme::Theme;
use super::types::GraphData;
use super::viewport::{SceneExtent, Viewport, ZoomAnchor, ZoomVerdict};

/// Pointer travel, in screen pixels, after which a press is no longer a click.
pub const CLICK_SLOP: f64 = 3.0;
/// Extra screen pixels around an edge that still count as a hit.
const EDGE_HIT_PX: f64 = 4.0;
/// Screen padding used by zoom to fit.
pub const FIT_PADDING: f64 = 40.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(String),
	Edge(String),
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
enum CenterTarget {
	Node(String),
	Edge(String),
}

/// A pending camera move waiting for its target to get a position.
#[derive(Clone, Debug, PartialEq)]
struct CenterRequest {
	target: CenterTarget,
	attempts_left: u32,
	next_at_ms: f64,
}

pub struct GraphState {
	pub coordinator: Coordinator,
	pub layout: ForceLayout,
	pub viewport: Viewport,
	pub theme: Theme,
	pub config: GraphConfig,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<Hit>,
	/// Set once a press has moved past [`CLICK_SLOP`].
	pub moved: bool,
	centering: Option<CenterRequest>,
}

impl GraphState {
	pub fn new(
		graph_id: &str,
		data: &GraphData,
		initial_expanded: Vec<String>,
		config: GraphConfig,
		theme: Theme,
		width: f64,
		height: f64,
	) -> Self {
		let coordinator = Coordinator::new(graph_id, data, initial_expanded);
		let mut layout = ForceLayout::new(config.layout.clone());
		layout.sync(coordinator.flat());
		Self {
			coordinator,
			layout,
			viewport: Viewport::new(width, height, config.zoom.clone()),
			theme,
			config,
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			moved: false,
			centering: None,
		}
	}

	/// Topmost node under a screen point.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<String> {
		let p = self.viewport.screen_to_graph(sx, sy);
		let highlighted = self.coordinator.highlighted_node();
		let mut found: Option<&str> = None;
		for node in &self.coordinator.flat().nodes {
			let Some(pos) = self.layout.position(&node.id) else {
				continue;
			};
			if pos.distance(p) > geometry::node_radius(node.has_children) {
				continue;
			}
			// highlighted node is drawn on top
			if found.is_none() || found != highlighted {
				found = Some(node.id.as_str());
			}
		}
		found.map(str::to_owned)
	}

	/// Closest drawn edge within a few pixels of a screen point.
	pub fn edge_at(&self, sx: f64, sy: f64) -> Option<String> {
		let p = self.viewport.screen_to_graph(sx, sy);
		let k = self.viewport.transform.k;
		let flat = self.coordinator.flat();
		let mut best: Option<(f64, &str)> = None;
		for edge in &flat.edges {
			if render::drawn_by_twin(flat, edge) {
				continue;
			}
			let (Some(source), Some(target)) =
				(flat.node(&edge.source), flat.node(&edge.target))
			else {
				continue;
			};
			let (Some(a), Some(b)) =
				(self.layout.position(&source.id), self.layout.position(&target.id))
			else {
				continue;
			};
			let Some(seg) = geometry::edge_segment(
				a,
				geometry::node_radius(source.has_children),
				b,
				geometry::node_radius(target.has_children),
			) else {
				continue;
			};
			let d = geometry::distance_to_segment(p, seg.start, seg.end);
			let reach = EDGE_HIT_PX / k + edge_render::base_width(edge.value) / k / 2.0;
			if d <= reach && best.is_none_or(|(bd, _)| d < bd) {
				best = Some((d, edge.id.as_str()));
			}
		}
		best.map(|(_, id)| id.to_owned())
	}

	/// Nodes win over edges.
	pub fn hit(&self, sx: f64, sy: f64) -> Option<Hit> {
		self.node_at(sx, sy)
			.map(Hit::Node)
			.or_else(|| self.edge_at(sx, sy).map(Hit::Edge))
	}

	pub fn set_hover(&mut self, hit: Option<Hit>) {
		self.hover = hit;
	}

	pub fn press(&mut self, sx: f64, sy: f64) {
		self.moved = false;
		if let Some(id) = self.node_at(sx, sy) {
			self.drag = DragState {
				active: true,
				node_start: self.layout.position(&id).unwrap_or_default(),
				node: Some(id),
				start_x: sx,
				start_y: sy,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.viewport.transform.x,
				transform_start_y: self.viewport.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.drag.active && !self.pan.active {
			let hit = self.hit(sx, sy);
			self.set_hover(hit);
			return;
		}
		let (start_x, start_y) = if self.drag.active {
			(self.drag.start_x, self.drag.start_y)
		} else {
			(self.pan.start_x, self.pan.start_y)
		};
		if (sx - start_x).hypot(sy - start_y) > CLICK_SLOP {
			self.moved = true;
		}
		if !self.moved {
			return;
		}

		if self.drag.active {
			if let Some(id) = self.drag.node.clone() {
				let k = self.viewport.transform.k;
				let (dx, dy) = ((sx - self.drag.start_x) / k, (sy - self.drag.start_y) / k);
				self.layout.pin(&id, self.drag.node_start.x + dx, self.drag.node_start.y + dy);
				self.layout.reheat();
			}
		} else {
			self.viewport.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.viewport.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn release(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	pub fn leave(&mut self) {
		self.release();
		self.set_hover(None);
	}

	/// A click that did not drag. Returns the effects the host must run.
	pub fn click(&mut self, sx: f64, sy: f64) -> Result<Vec<Effect>> {
		if self.moved {
			self.moved = false;
			return Ok(Vec::new());
		}
		let effects = match self.hit(sx, sy) {
			Some(Hit::Node(id)) => self.coordinator.click_node(&id)?,
			Some(Hit::Edge(id)) => self.coordinator.click_edge(&id)?,
			None => {
				self.coordinator.clear();
				Vec::new()
			}
		};
		Ok(self.apply(effects))
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64, now_ms: f64) -> ZoomVerdict {
		let factor = self.viewport.wheel_factor(delta_y);
		let anchor = match self.followed_point() {
			Some(p) => ZoomAnchor::Follow(p),
			None => ZoomAnchor::Cursor(sx, sy),
		};
		let extent = self.scene_extent();
		self.viewport.zoom_by(factor, anchor, &extent, now_ms)
	}

	fn followed_point(&self) -> Option<Point> {
		match self.coordinator.highlight() {
			Highlight::Node(id) => self.layout.position(id),
			Highlight::Edge(id) => self.edge_midpoint(id),
			Highlight::None => None,
		}
	}

	pub fn scene_extent(&self) -> SceneExtent {
		SceneExtent::from_circles(self.circles())
	}

	fn circles(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
		self.coordinator.flat().nodes.iter().filter_map(|node| {
			self.layout
				.position(&node.id)
				.map(|p| (p, geometry::node_radius(node.has_children)))
		})
	}

	pub fn zoom_to_fit(&mut self) {
		if let Some(bbox) = geometry::BoundingBox::from_circles(self.circles()) {
			self.viewport.fit_to(&bbox, FIT_PADDING);
		}
	}

	fn edge_midpoint(&self, id: &str) -> Option<Point> {
		let edge = self.coordinator.flat().edge(id)?;
		let a = self.layout.position(&edge.source)?;
		let b = self.layout.position(&edge.target)?;
		Some(a.lerp(b, 0.5))
	}

	/// Carry out the layout and camera effects, returning the ones only the
	/// host can perform.
	pub fn apply(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
		let mut host = Vec::new();
		for effect in effects {
			match effect {
				Effect::Relayout => self.layout.sync(self.coordinator.flat()),
				Effect::CenterOnNode(id) => self.request_center(CenterTarget::Node(id)),
				Effect::CenterOnEdge(id) => self.request_center(CenterTarget::Edge(id)),
				other => host.push(other),
			}
		}
		host
	}

	fn request_center(&mut self, target: CenterTarget) {
		self.centering = Some(CenterRequest {
			target,
			attempts_left: self.config.center.attempts,
			next_at_ms: f64::NEG_INFINITY,
		});
	}

	pub fn is_centering(&self) -> bool {
		self.centering.is_some()
	}

	/// Try the pending camera move. Targets without a position yet are
	/// retried after the configured delay, and dropped once attempts run out.
	pub fn poll_centering(&mut self, now_ms: f64) {
		let Some(request) = self.centering.take() else {
			return;
		};
		if now_ms < request.next_at_ms {
			self.centering = Some(request);
			return;
		}
		let point = match &request.target {
			CenterTarget::Node(id) => self.layout.position(id),
			CenterTarget::Edge(id) => self.edge_midpoint(id),
		};
		if let Some(p) = point {
			self.viewport.center_on(p, Some(self.config.center.zoom));
			return;
		}
		if request.attempts_left <= 1 {
			debug!("article-graph: gave up centering on {:?}", request.target);
			return;
		}
		self.centering = Some(CenterRequest {
			attempts_left: request.attempts_left - 1,
			next_at_ms: now_ms + self.config.center.delay_ms,
			..request
		});
	}

	/// One animation frame: advance the layout, move the camera, draw.
	pub fn frame(&mut self, surface: &impl Surface, dt: f32, now_ms: f64) {
		self.layout.tick(dt);
		self.poll_centering(now_ms);
		self.viewport.settle(now_ms);
		self.render(surface);
	}

	pub fn render(&self, surface: &impl Surface) {
		let frame = Frame {
			coordinator: &self.coordinator,
			positions: self.layout.positions(),
			transform: self.viewport.transform,
			width: self.viewport.width,
			height: self.viewport.height,
			theme: &self.theme,
			config: &self.config,
		};
		render::render(surface, &frame);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
	}

	/// Run a coordinator transition, logging misses instead of failing.
	pub fn run(
		&mut self,
		transition: impl FnOnce(&mut Coordinator) -> Result<Vec<Effect>>,
	) -> Vec<Effect> {
		match transition(&mut self.coordinator) {
			Ok(effects) => self.apply(effects),
			Err(e) => {
				warn!("article-graph: {e}");
				Vec::new()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::selection::Selection;
	use crate::components::graph::testing::RecordingSurface;

	const DATA: &str = r#"{
		"nodes": [
			{ "id": "A", "label": "Agents", "children": [
				{ "id": "B", "label": "Planner" },
				{ "id": "C", "label": "Executor" }
			] }
		],
		"links": [{ "source": "B", "target": "C", "id": "b-c" }]
	}"#;

	fn state(expanded: &[&str]) -> GraphState {
		let data = GraphData::from_json(DATA).expect("data");
		GraphState::new(
			"g",
			&data,
			expanded.iter().map(|s| s.to_string()).collect(),
			GraphConfig::default(),
			Theme::light(),
			800.0,
			600.0,
		)
	}

	fn screen_of(s: &GraphState, id: &str) -> (f64, f64) {
		s.viewport.graph_to_screen(s.layout.position(id).expect("positioned"))
	}

	#[test]
	fn clicking_a_node_selects_and_expands_it() {
		let mut s = state(&[]);
		let (x, y) = screen_of(&s, "A");
		s.press(x, y);
		s.release();
		let host = s.click(x, y).expect("click");
		assert_eq!(host, vec![Effect::WriteFragment("g-node-A".into())]);
		assert_eq!(s.coordinator.selection(), &Selection::Node("A".into()));
		assert!(s.layout.position("B").is_some());
		assert!(s.layout.is_running());
	}

	#[test]
	fn drags_do_not_click() {
		let mut s = state(&[]);
		let (x, y) = screen_of(&s, "A");
		s.press(x, y);
		s.pointer_move(x + 30.0, y);
		s.release();
		assert!(s.click(x + 30.0, y).expect("click").is_empty());
		assert_eq!(s.coordinator.selection(), &Selection::None);
		assert!(s.layout.is_pinned("A"));
		let moved = s.layout.position("A").expect("pinned");
		assert!((moved.x - 30.0).abs() < 1e-6);
	}

	#[test]
	fn background_click_clears_selection() {
		let mut s = state(&[]);
		let (x, y) = screen_of(&s, "A");
		s.click(x, y).expect("click");
		s.click(5.0, 5.0).expect("click");
		assert_eq!(s.coordinator.selection(), &Selection::None);
	}

	#[test]
	fn panning_moves_the_camera() {
		let mut s = state(&[]);
		let before = s.viewport.transform;
		s.press(5.0, 5.0);
		s.pointer_move(25.0, 15.0);
		s.release();
		assert_eq!(s.viewport.transform.x, before.x + 20.0);
		assert_eq!(s.viewport.transform.y, before.y + 10.0);
	}

	#[test]
	fn edges_are_hit_between_their_nodes() {
		let mut s = state(&["A"]);
		s.layout.pin("B", -100.0, 100.0);
		s.layout.pin("C", 100.0, 100.0);
		let (x, y) = s.viewport.graph_to_screen(Point::new(0.0, 100.0));
		assert_eq!(s.hit(x, y), Some(Hit::Edge("b-c".into())));
		let (x, y) = s.viewport.graph_to_screen(Point::new(0.0, 160.0));
		assert_eq!(s.hit(x, y), None);
	}

	#[test]
	fn deep_links_center_once_positioned() {
		let mut s = state(&[]);
		let host = s.run(|c| c.resolve_fragment("#g-node-C"));
		assert!(host.contains(&Effect::ScrollIntoView));
		assert!(s.is_centering());
		s.poll_centering(0.0);
		assert!(!s.is_centering());
		let c = s.layout.position("C").expect("revealed");
		let (cx, cy) = s.viewport.graph_to_screen(c);
		assert!((cx - 400.0).abs() < 1e-6 && (cy - 300.0).abs() < 1e-6);
		assert_eq!(s.viewport.transform.k, s.config.center.zoom);
	}

	#[test]
	fn centering_gives_up_after_its_attempts() {
		let mut s = state(&[]);
		s.config.center.attempts = 2;
		s.request_center(CenterTarget::Node("missing".into()));
		s.poll_centering(0.0);
		assert!(s.is_centering());
		s.poll_centering(50.0);
		assert!(s.is_centering());
		s.poll_centering(100.0);
		assert!(!s.is_centering());
	}

	#[test]
	fn misses_are_logged_not_raised() {
		let mut s = state(&[]);
		assert!(s.run(|c| c.resolve_fragment("#g-edge-b-c")).is_empty());
		assert_eq!(s.coordinator.selection(), &Selection::None);
	}

	#[test]
	fn wheel_follows_the_highlighted_node() {
		let mut s = state(&[]);
		s.layout.pin("A", 40.0, -20.0);
		s.run(|c| c.highlight_node("A"));
		s.poll_centering(0.0);
		let verdict = s.wheel(0.0, 0.0, -1.0, 0.0);
		assert_eq!(verdict, ZoomVerdict::Applied);
		let (x, y) = screen_of(&s, "A");
		assert!((x - 400.0).abs() < 1e-6 && (y - 300.0).abs() < 1e-6);
	}

	#[test]
	fn frames_render_without_panicking() {
		let mut s = state(&["A"]);
		let surface = RecordingSurface::new();
		for i in 0..5 {
			s.frame(&surface, 0.016, i as f64 * 16.0);
		}
		assert!(!surface.texts().is_empty());
	}
}
