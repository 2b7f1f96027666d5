//! Deterministic stand-ins for the canvas.

use std::cell::RefCell;

use super::surface::Surface;
use super::text_fit::TextMeasure;

/// Every character is `0.6 * px` wide and glyphs are `0.7 * px` tall.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoMeasure;

impl TextMeasure for MonoMeasure {
	fn text_width(&self, text: &str, font_px: f64) -> f64 {
		text.chars().count() as f64 * font_px * 0.6
	}

	fn glyph_height(&self, font_px: f64) -> f64 {
		font_px * 0.7
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
	Save,
	Restore,
	Translate(f64, f64),
	Scale(f64),
	FillRect { color: String },
	BeginPath,
	MoveTo(f64, f64),
	LineTo(f64, f64),
	ClosePath,
	Circle { x: f64, y: f64, r: f64 },
	Fill { color: String },
	Stroke { color: String, width: f64 },
	Clip,
	FillRadial { outer: f64 },
	LineDash(Vec<f64>),
	Text { text: String, x: f64, y: f64, px: f64, color: String },
}

/// Records every call, measuring text like [`MonoMeasure`].
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub ops: RefCell<Vec<Op>>,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self::default()
	}

	fn push(&self, op: Op) {
		self.ops.borrow_mut().push(op);
	}

	pub fn ops(&self) -> Vec<Op> {
		self.ops.borrow().clone()
	}

	pub fn texts(&self) -> Vec<String> {
		self.ops
			.borrow()
			.iter()
			.filter_map(|op| match op {
				Op::Text { text, .. } => Some(text.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
		self.ops.borrow().iter().filter(|op| pred(op)).count()
	}
}

impl TextMeasure for RecordingSurface {
	fn text_width(&self, text: &str, font_px: f64) -> f64 {
		MonoMeasure.text_width(text, font_px)
	}

	fn glyph_height(&self, font_px: f64) -> f64 {
		MonoMeasure.glyph_height(font_px)
	}
}

impl Surface for RecordingSurface {
	fn save(&self) {
		self.push(Op::Save);
	}

	fn restore(&self) {
		self.push(Op::Restore);
	}

	fn translate(&self, x: f64, y: f64) {
		self.push(Op::Translate(x, y));
	}

	fn scale(&self, k: f64) {
		self.push(Op::Scale(k));
	}

	fn fill_rect(&self, _x: f64, _y: f64, _w: f64, _h: f64, color: &str) {
		self.push(Op::FillRect { color: color.into() });
	}

	fn begin_path(&self) {
		self.push(Op::BeginPath);
	}

	fn move_to(&self, x: f64, y: f64) {
		self.push(Op::MoveTo(x, y));
	}

	fn line_to(&self, x: f64, y: f64) {
		self.push(Op::LineTo(x, y));
	}

	fn close_path(&self) {
		self.push(Op::ClosePath);
	}

	fn circle(&self, x: f64, y: f64, r: f64) {
		self.push(Op::Circle { x, y, r });
	}

	fn fill(&self, color: &str) {
		self.push(Op::Fill { color: color.into() });
	}

	fn stroke(&self, color: &str, width: f64) {
		self.push(Op::Stroke {
			color: color.into(),
			width,
		});
	}

	fn clip(&self) {
		self.push(Op::Clip);
	}

	fn fill_radial(&self, _x: f64, _y: f64, _inner: f64, outer: f64, _stops: &[(f64, &str)]) {
		self.push(Op::FillRadial { outer });
	}

	fn set_line_dash(&self, pattern: &[f64]) {
		self.push(Op::LineDash(pattern.to_vec()));
	}

	fn fill_text(&self, text: &str, x: f64, y: f64, px: f64, color: &str) {
		self.push(Op::Text {
			text: text.into(),
			x,
			y,
			px,
			color: color.into(),
		});
	}
}
