//! Circle geometry shared by the renderers, the layout and the viewport.
//!
//! Everything here is a pure function of its arguments. Widths returned by
//! [`available_text_width`] are in screen pixels, every other length is in
//! graph units.

pub const PARENT_RADIUS: f64 = 12.0;
pub const LEAF_RADIUS: f64 = 8.0;

/// Smallest width ever reported for a label line, in screen pixels.
pub const MIN_TEXT_WIDTH: f64 = 2.0;

/// Label lines per node. The diameter is split into five sections: the top
/// one is left empty, the next three hold text and the last holds the status
/// glyph.
pub const LINE_COUNT: usize = 3;
const SECTIONS: f64 = 5.0;

pub const ARROW_LENGTH: f64 = 6.0;
const ARROW_REL_POS_DEFAULT: f64 = 0.98;
const ARROW_REL_POS_MIN: f64 = 0.9;
const ARROW_REL_POS_MAX: f64 = 0.999;

pub fn node_radius(has_children: bool) -> f64 {
	if has_children { PARENT_RADIUS } else { LEAF_RADIUS }
}

/// Width of the horizontal chord `offset` away from the center.
pub fn chord_width(offset: f64, radius: f64) -> f64 {
	2.0 * (radius * radius - offset * offset).max(0.0).sqrt()
}

pub fn section_height(radius: f64) -> f64 {
	radius * 2.0 / SECTIONS
}

/// Vertical centers of the label lines, top to bottom.
pub fn line_positions(node_y: f64, radius: f64) -> [f64; LINE_COUNT] {
	let section = section_height(radius);
	let top = node_y - radius;
	[
		top + section * 1.5,
		top + section * 2.5,
		top + section * 3.5,
	]
}

/// Vertical center of the reserved bottom band.
pub fn status_band_center_y(node_y: f64, radius: f64) -> f64 {
	node_y - radius + section_height(radius) * 4.5
}

/// Screen width a label line centered at `y` may occupy.
///
/// The chord at the line's offset is scaled to the screen, then shrunk by an
/// inner padding plus a safety margin that grows with the radius. Outer lines
/// get the larger margin since the circle narrows faster there. The result is
/// never below [`MIN_TEXT_WIDTH`].
pub fn available_text_width(
	y: f64,
	node_y: f64,
	radius: f64,
	zoom: f64,
	padding: f64,
	line_index: usize,
) -> f64 {
	let chord = chord_width(y - node_y, radius);
	let base = chord * zoom - 2.0 * padding * zoom;

	let middle = line_index == LINE_COUNT / 2;
	let scale = 1.0 + (radius - LEAF_RADIUS) / LEAF_RADIUS * 0.2;
	let margin = if middle { 0.10 } else { 0.15 } * scale;
	let fixed = if middle { 4.0 } else { 5.0 } * (radius / LEAF_RADIUS) * zoom;

	let width = base - base * margin - fixed;
	if width.is_finite() { width.max(MIN_TEXT_WIDTH) } else { MIN_TEXT_WIDTH }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn distance(&self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}

	/// Point `t` of the way from `self` to `other`.
	pub fn lerp(&self, other: Point, t: f64) -> Point {
		Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
	}
}

/// Visible part of an edge, from the source's boundary to the target's.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
	pub start: Point,
	pub end: Point,
	pub mid: Point,
	/// Unit direction, source to target.
	pub dir: (f64, f64),
	/// Center-to-center distance.
	pub distance: f64,
}

/// `None` when either endpoint is not finite or the circles leave no gap
/// between them.
pub fn edge_segment(
	source: Point,
	source_radius: f64,
	target: Point,
	target_radius: f64,
) -> Option<EdgeSegment> {
	if !source.is_finite() || !target.is_finite() {
		return None;
	}
	let distance = source.distance(target);
	if !distance.is_finite() || distance <= source_radius + target_radius {
		return None;
	}
	let (ux, uy) = ((target.x - source.x) / distance, (target.y - source.y) / distance);
	let start = Point::new(source.x + ux * source_radius, source.y + uy * source_radius);
	let end = Point::new(target.x - ux * target_radius, target.y - uy * target_radius);
	Some(EdgeSegment {
		start,
		end,
		mid: start.lerp(end, 0.5),
		dir: (ux, uy),
		distance,
	})
}

/// Relative position along the center-to-center line where the arrow tip
/// touches the target's boundary.
pub fn arrow_tip_rel_pos(distance: f64, target_radius: f64) -> f64 {
	if !distance.is_finite() || distance <= 0.0 {
		return ARROW_REL_POS_DEFAULT;
	}
	((distance - target_radius) / distance).clamp(ARROW_REL_POS_MIN, ARROW_REL_POS_MAX)
}

/// Axis-aligned box around a set of circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl BoundingBox {
	/// Box around every finite circle `(center, radius)`; `None` if there are
	/// none.
	pub fn from_circles(circles: impl IntoIterator<Item = (Point, f64)>) -> Option<Self> {
		let mut bbox: Option<Self> = None;
		for (c, r) in circles {
			if !c.is_finite() || !r.is_finite() {
				continue;
			}
			let circle = Self {
				min_x: c.x - r,
				min_y: c.y - r,
				max_x: c.x + r,
				max_y: c.y + r,
			};
			bbox = Some(match bbox {
				Some(b) => b.union(&circle),
				None => circle,
			});
		}
		bbox
	}

	pub fn union(&self, other: &Self) -> Self {
		Self {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn area(&self) -> f64 {
		self.width() * self.height()
	}

	pub fn center(&self) -> Point {
		Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
	}
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq == 0.0 {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance(a.lerp(b, t))
}
