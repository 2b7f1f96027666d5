//! The 2D drawing operations the renderers rely on.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::text_fit::TextMeasure;

pub trait Surface: TextMeasure {
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn scale(&self, k: f64);
	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str);

	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn close_path(&self);
	fn circle(&self, x: f64, y: f64, r: f64);
	fn fill(&self, color: &str);
	fn stroke(&self, color: &str, width: f64);
	/// Intersect the clip region with the current path.
	fn clip(&self);
	/// Fill the current path with a radial gradient centered on `(x, y)`.
	fn fill_radial(&self, x: f64, y: f64, inner: f64, outer: f64, stops: &[(f64, &str)]);
	/// Dash pattern for subsequent strokes, empty for solid lines.
	fn set_line_dash(&self, pattern: &[f64]);

	/// Text is drawn centered on `(x, y)` at `px` graph units.
	fn fill_text(&self, text: &str, x: f64, y: f64, px: f64, color: &str);
}

fn font(px: f64) -> String {
	format!("{px}px Sans-Serif")
}

impl TextMeasure for CanvasRenderingContext2d {
	fn text_width(&self, text: &str, font_px: f64) -> f64 {
		self.set_font(&font(font_px));
		self.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
	}

	fn glyph_height(&self, font_px: f64) -> f64 {
		self.set_font(&font(font_px));
		self.measure_text("M")
			.map(|m| m.actual_bounding_box_ascent() + m.actual_bounding_box_descent())
			.unwrap_or(font_px)
	}
}

impl Surface for CanvasRenderingContext2d {
	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn scale(&self, k: f64) {
		let _ = CanvasRenderingContext2d::scale(self, k, k);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn circle(&self, x: f64, y: f64, r: f64) {
		let _ = self.arc(x, y, r, 0.0, 2.0 * PI);
	}

	fn fill(&self, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self, color: &str, width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		CanvasRenderingContext2d::stroke(self);
	}

	fn clip(&self) {
		CanvasRenderingContext2d::clip(self);
	}

	fn fill_radial(&self, x: f64, y: f64, inner: f64, outer: f64, stops: &[(f64, &str)]) {
		let Ok(gradient) = self.create_radial_gradient(x, y, inner, x, y, outer) else {
			return;
		};
		for &(offset, color) in stops {
			let _ = gradient.add_color_stop(offset as f32, color);
		}
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		CanvasRenderingContext2d::fill(self);
	}

	fn set_line_dash(&self, pattern: &[f64]) {
		let segments = js_sys::Array::new();
		for &d in pattern {
			segments.push(&JsValue::from_f64(d));
		}
		let _ = CanvasRenderingContext2d::set_line_dash(self, &segments);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64, px: f64, color: &str) {
		self.set_font(&font(px));
		self.set_text_align("center");
		self.set_text_baseline("middle");
		self.set_fill_style_str(color);
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}
}
