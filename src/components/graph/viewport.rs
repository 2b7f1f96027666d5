//! Pan and zoom with semantic limits.
//!
//! Zoom limits depend on what is on screen: zooming out stops once the
//! visible cluster gets too small relative to the viewport, zooming in stops
//! once the largest node would fill it. A rejected zoom keeps the previous
//! transform and briefly suppresses further zoom events through
//! [`ZoomGuard`], so corrections cannot feed back into the event source.

use log::debug;

use super::config::ZoomLimits;
use super::geometry::{BoundingBox, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Same transform at scale `k`, keeping the graph point under `(sx, sy)`
	/// fixed on screen.
	pub fn zoomed_about(&self, sx: f64, sy: f64, k: f64) -> Self {
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	/// Transform at scale `k` that puts `p` at the screen point `(sx, sy)`.
	pub fn centered(p: Point, sx: f64, sy: f64, k: f64) -> Self {
		Self {
			x: sx - p.x * k,
			y: sy - p.y * k,
			k,
		}
	}
}

/// What is currently visible, for the zoom limits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneExtent {
	pub bbox: Option<BoundingBox>,
	/// Diameter of the largest visible node, in graph units.
	pub max_diameter: f64,
}

impl SceneExtent {
	pub fn from_circles(circles: impl IntoIterator<Item = (Point, f64)>) -> Self {
		let circles: Vec<(Point, f64)> = circles
			.into_iter()
			.filter(|(p, r)| p.is_finite() && r.is_finite())
			.collect();
		Self {
			bbox: BoundingBox::from_circles(circles.iter().copied()),
			max_diameter: circles.iter().map(|(_, r)| r * 2.0).fold(0.0, f64::max),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomRejection {
	/// The cluster would cover only `fraction` of the viewport area.
	ClusterTooSmall { fraction: f64 },
	/// The largest node would span `fraction` of the shorter side.
	NodeTooLarge { fraction: f64 },
	/// Only `span` graph units would remain visible.
	ViewportTooSmall { span: f64 },
	/// Already at the numeric bound.
	AtLimit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomVerdict {
	Applied,
	Rejected(ZoomRejection),
	/// Dropped while a previous rejection is settling.
	Suppressed,
}

/// Where the zoom is anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomAnchor {
	/// Keep the point under the cursor fixed.
	Cursor(f64, f64),
	/// Keep a highlighted node centered.
	Follow(Point),
}

/// Re-entrancy guard around zoom corrections.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ZoomGuard {
	#[default]
	Idle,
	Correcting { until_ms: f64 },
}

impl ZoomGuard {
	/// Whether a zoom event arriving at `now_ms` may be handled. An expired
	/// correction re-arms the guard.
	pub fn admit(&mut self, now_ms: f64) -> bool {
		self.settle(now_ms);
		matches!(self, ZoomGuard::Idle)
	}

	pub fn correct(&mut self, now_ms: f64, cooldown_ms: f64) {
		*self = ZoomGuard::Correcting {
			until_ms: now_ms + cooldown_ms,
		};
	}

	pub fn settle(&mut self, now_ms: f64) {
		if let ZoomGuard::Correcting { until_ms } = *self {
			if now_ms >= until_ms {
				*self = ZoomGuard::Idle;
			}
		}
	}
}

/// Reject a zoom-out to `k` that would shrink the cluster below the
/// configured share of the viewport area.
pub fn can_zoom_out(
	extent: &SceneExtent,
	k: f64,
	width: f64,
	height: f64,
	limits: &ZoomLimits,
) -> Result<(), ZoomRejection> {
	let Some(bbox) = extent.bbox else {
		return Ok(());
	};
	let viewport = width * height;
	if viewport <= 0.0 {
		return Ok(());
	}
	let fraction = bbox.area() * k * k / viewport;
	if fraction < limits.min_cluster_fraction {
		return Err(ZoomRejection::ClusterTooSmall { fraction });
	}
	Ok(())
}

/// Reject a zoom-in to `k` that would let the largest node fill the
/// viewport, or leave less than a few node diameters of graph visible.
pub fn can_zoom_in(
	extent: &SceneExtent,
	k: f64,
	width: f64,
	height: f64,
	limits: &ZoomLimits,
) -> Result<(), ZoomRejection> {
	let shorter = width.min(height);
	if shorter <= 0.0 {
		return Ok(());
	}
	let fraction = extent.max_diameter * k / shorter;
	if fraction > limits.max_node_fraction {
		return Err(ZoomRejection::NodeTooLarge { fraction });
	}
	let span = shorter / k;
	let min_span = if extent.max_diameter > 0.0 {
		extent.max_diameter * limits.min_viewport_node_multiple
	} else {
		limits.fallback_min_viewport
	};
	if span < min_span {
		return Err(ZoomRejection::ViewportTooSmall { span });
	}
	Ok(())
}

#[derive(Clone, Debug)]
pub struct Viewport {
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	limits: ZoomLimits,
	guard: ZoomGuard,
}

impl Viewport {
	pub fn new(width: f64, height: f64, limits: ZoomLimits) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
			limits,
			guard: ZoomGuard::Idle,
		}
	}

	pub fn guard(&self) -> ZoomGuard {
		self.guard
	}

	pub fn limits(&self) -> &ZoomLimits {
		&self.limits
	}

	/// Multiply the scale by `factor`, subject to the zoom limits.
	///
	/// `Follow` puts the followed point at the viewport center whichever way
	/// the zoom goes.
	pub fn zoom_by(
		&mut self,
		factor: f64,
		anchor: ZoomAnchor,
		extent: &SceneExtent,
		now_ms: f64,
	) -> ZoomVerdict {
		if !self.guard.admit(now_ms) {
			return ZoomVerdict::Suppressed;
		}
		let current = self.transform.k;
		let k = (current * factor).clamp(self.limits.min_scale, self.limits.max_scale);
		if !k.is_finite() || k == current {
			return ZoomVerdict::Rejected(ZoomRejection::AtLimit);
		}

		let check = if k < current {
			can_zoom_out(extent, k, self.width, self.height, &self.limits)
		} else {
			can_zoom_in(extent, k, self.width, self.height, &self.limits)
		};
		if let Err(rejection) = check {
			debug!("article-graph: zoom to {k:.3} rejected: {rejection:?}");
			self.guard.correct(now_ms, self.limits.correction_cooldown_ms);
			return ZoomVerdict::Rejected(rejection);
		}

		self.transform = match anchor {
			ZoomAnchor::Cursor(sx, sy) => self.transform.zoomed_about(sx, sy, k),
			ZoomAnchor::Follow(p) => {
				ViewTransform::centered(p, self.width / 2.0, self.height / 2.0, k)
			}
		};
		ZoomVerdict::Applied
	}

	/// Scale factor for one wheel notch.
	pub fn wheel_factor(&self, delta_y: f64) -> f64 {
		if delta_y > 0.0 { 1.0 / self.limits.step } else { self.limits.step }
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.transform.x += dx;
		self.transform.y += dy;
	}

	/// Center on `p`, optionally at a new scale. Not subject to the zoom
	/// guards, only to the numeric bounds.
	pub fn center_on(&mut self, p: Point, k: Option<f64>) {
		if !p.is_finite() {
			return;
		}
		let k = k
			.unwrap_or(self.transform.k)
			.clamp(self.limits.min_scale, self.limits.max_scale);
		self.transform = ViewTransform::centered(p, self.width / 2.0, self.height / 2.0, k);
	}

	/// Fit `bbox` into the viewport with `padding` screen pixels around it.
	pub fn fit_to(&mut self, bbox: &BoundingBox, padding: f64) {
		let (w, h) = (
			(self.width - 2.0 * padding).max(1.0),
			(self.height - 2.0 * padding).max(1.0),
		);
		let k = if bbox.width() > 0.0 && bbox.height() > 0.0 {
			(w / bbox.width()).min(h / bbox.height())
		} else {
			self.transform.k
		};
		self.center_on(bbox.center(), Some(k));
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		self.transform.screen_to_graph(sx, sy)
	}

	pub fn graph_to_screen(&self, p: Point) -> (f64, f64) {
		self.transform.graph_to_screen(p)
	}

	pub fn settle(&mut self, now_ms: f64) {
		self.guard.settle(now_ms);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn extent_of(circles: &[(f64, f64, f64)]) -> SceneExtent {
		SceneExtent::from_circles(circles.iter().map(|&(x, y, r)| (Point::new(x, y), r)))
	}

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0, ZoomLimits::default())
	}

	#[test]
	fn zoom_out_stops_at_the_cluster_fraction() {
		// 200 x 200 box; at k = 1 it covers 1/12 of 800 x 600
		let extent = extent_of(&[(-88.0, -88.0, 12.0), (88.0, 88.0, 12.0)]);
		let limits = ZoomLimits::default();
		for k in [0.05, 0.2, 0.5, 1.0, 1.1, 1.2, 2.0, 4.0] {
			let fraction = 40_000.0 * k * k / 480_000.0;
			let verdict = can_zoom_out(&extent, k, 800.0, 600.0, &limits);
			assert_eq!(verdict.is_err(), fraction < limits.min_cluster_fraction, "k = {k}");
		}
	}

	#[test]
	fn zoom_in_stops_before_a_node_fills_the_view() {
		let extent = extent_of(&[(0.0, 0.0, 12.0)]);
		let limits = ZoomLimits::default();
		// 540 / 24 = 22.5 for the node fraction, 600 / 72 = 8.33 for the span
		assert!(can_zoom_in(&extent, 8.0, 800.0, 600.0, &limits).is_ok());
		assert!(matches!(
			can_zoom_in(&extent, 9.0, 800.0, 600.0, &limits),
			Err(ZoomRejection::ViewportTooSmall { .. })
		));
		assert!(matches!(
			can_zoom_in(&extent, 23.0, 800.0, 600.0, &limits),
			Err(ZoomRejection::NodeTooLarge { .. })
		));
		for k in [1.0, 5.0, 10.0, 20.0, 30.0] {
			let fraction = 24.0 * k / 600.0;
			if fraction > limits.max_node_fraction {
				assert!(can_zoom_in(&extent, k, 800.0, 600.0, &limits).is_err());
			}
		}
	}

	#[test]
	fn empty_scene_uses_the_fallback_span() {
		let limits = ZoomLimits::default();
		let empty = SceneExtent::default();
		assert!(can_zoom_in(&empty, 11.0, 800.0, 600.0, &limits).is_ok());
		assert!(can_zoom_in(&empty, 13.0, 800.0, 600.0, &limits).is_err());
		assert!(can_zoom_out(&empty, 0.05, 800.0, 600.0, &limits).is_ok());
	}

	#[test]
	fn rejection_keeps_transform_and_suppresses_until_settled() {
		let mut vp = viewport();
		let extent = extent_of(&[(0.0, 0.0, 12.0)]);
		let before = vp.transform;

		let verdict = vp.zoom_by(1.0 / 1.1, ZoomAnchor::Cursor(10.0, 10.0), &extent, 0.0);
		assert!(matches!(verdict, ZoomVerdict::Rejected(ZoomRejection::ClusterTooSmall { .. })));
		assert_eq!(vp.transform, before);
		assert_eq!(vp.guard(), ZoomGuard::Correcting { until_ms: 10.0 });

		let cursor = ZoomAnchor::Cursor(10.0, 10.0);
		assert_eq!(vp.zoom_by(1.1, cursor, &extent, 5.0), ZoomVerdict::Suppressed);
		assert_eq!(vp.transform, before);

		assert_eq!(vp.zoom_by(1.1, cursor, &extent, 10.0), ZoomVerdict::Applied);
		assert_eq!(vp.guard(), ZoomGuard::Idle);
	}

	#[test]
	fn cursor_anchor_keeps_the_point_under_the_cursor() {
		let mut vp = viewport();
		let extent = extent_of(&[(0.0, 0.0, 12.0), (300.0, 200.0, 8.0)]);
		let under = vp.screen_to_graph(100.0, 50.0);
		let cursor = ZoomAnchor::Cursor(100.0, 50.0);
		assert_eq!(vp.zoom_by(1.1, cursor, &extent, 0.0), ZoomVerdict::Applied);
		let after = vp.screen_to_graph(100.0, 50.0);
		assert!(under.distance(after) < 1e-9);
	}

	#[test]
	fn follow_anchor_centers_the_highlighted_node() {
		let mut vp = viewport();
		let extent = extent_of(&[(0.0, 0.0, 12.0), (300.0, 200.0, 8.0)]);
		let node = Point::new(300.0, 200.0);
		assert_eq!(vp.zoom_by(1.1, ZoomAnchor::Follow(node), &extent, 0.0), ZoomVerdict::Applied);
		let (sx, sy) = vp.graph_to_screen(node);
		assert!((sx - 400.0).abs() < 1e-9 && (sy - 300.0).abs() < 1e-9);
		assert!((vp.transform.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn numeric_bounds_still_apply() {
		let mut vp = viewport();
		vp.center_on(Point::new(0.0, 0.0), Some(100.0));
		assert_eq!(vp.transform.k, ZoomLimits::default().max_scale);
		let verdict = vp.zoom_by(2.0, ZoomAnchor::Cursor(0.0, 0.0), &SceneExtent::default(), 0.0);
		assert_eq!(verdict, ZoomVerdict::Rejected(ZoomRejection::AtLimit));
	}

	#[test]
	fn fit_to_frames_the_box() {
		let mut vp = viewport();
		let bbox = BoundingBox {
			min_x: 0.0,
			min_y: 0.0,
			max_x: 400.0,
			max_y: 100.0,
		};
		vp.fit_to(&bbox, 0.0);
		assert_eq!(vp.transform.k, 2.0);
		assert_eq!(vp.graph_to_screen(bbox.center()), (400.0, 300.0));
	}

	#[test]
	fn guard_state_machine() {
		let mut guard = ZoomGuard::default();
		assert!(guard.admit(0.0));
		guard.correct(100.0, 10.0);
		assert!(!guard.admit(105.0));
		guard.settle(110.0);
		assert_eq!(guard, ZoomGuard::Idle);
	}
}
