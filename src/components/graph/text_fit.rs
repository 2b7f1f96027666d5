//! Fitting labels inside circular nodes.
//!
//! All widths and font sizes are screen pixels. Measurements go through
//! [`TextMeasure`] so the fitting logic runs without a canvas.

use super::geometry::{self, LINE_COUNT};

pub trait TextMeasure {
	/// Rendered width of `text` at `font_px`.
	fn text_width(&self, text: &str, font_px: f64) -> f64;
	/// Rendered height of a reference capital glyph at `font_px`.
	fn glyph_height(&self, font_px: f64) -> f64;
}

pub const ELLIPSIS: &str = "...";
/// Characters shown before an ellipsis is allowed.
pub const MIN_CHARS_BEFORE_ELLIPSIS: usize = 20;
/// Labels are capped at this many characters before fitting.
pub const MAX_LABEL_CHARS: usize = 60;
pub const MIN_FONT_PX: f64 = 2.0;

const FONT_TOLERANCE: f64 = 0.1;
/// Glyph height target as a fraction of a line's section.
const GLYPH_SECTION_FRACTION: f64 = 0.3;
/// Font cap as a fraction of the node's screen diameter.
const DIAMETER_FONT_FRACTION: f64 = 0.12;
const SHRINK_STEP: f64 = 0.9;

/// Largest font whose reference glyph stays under 30% of the section height,
/// found by bisection to within 0.1px. Never below `min_font_px`.
pub fn optimal_font_size(
	measure: &impl TextMeasure,
	section_height: f64,
	diameter: f64,
	min_font_px: f64,
) -> f64 {
	if !section_height.is_finite() || !diameter.is_finite() {
		return min_font_px;
	}
	let cap = section_height.min(diameter * DIAMETER_FONT_FRACTION);
	let target = section_height * GLYPH_SECTION_FRACTION;
	let (mut lo, mut hi) = (min_font_px, cap);
	if hi <= lo {
		return min_font_px;
	}
	if measure.glyph_height(hi) <= target {
		return hi;
	}
	while hi - lo > FONT_TOLERANCE {
		let mid = (lo + hi) / 2.0;
		if measure.glyph_height(mid) <= target {
			lo = mid;
		} else {
			hi = mid;
		}
	}
	lo
}

/// First `max - 3` characters followed by an ellipsis, for text longer than
/// `max` characters.
pub fn truncate_to_max_chars(text: &str, max: usize) -> String {
	if text.chars().count() <= max {
		return text.to_owned();
	}
	let keep = max.saturating_sub(ELLIPSIS.len());
	let mut out: String = text.chars().take(keep).collect();
	out.push_str(ELLIPSIS);
	out
}

/// Shorten `line` to fit `max_width`.
///
/// With room for at least [`MIN_CHARS_BEFORE_ELLIPSIS`] characters plus the
/// ellipsis, as many characters as fit are kept before it. With less room the
/// longest fitting prefix is shown without an ellipsis. Returns `None` if no
/// real character fits, so the result is never a bare ellipsis.
pub fn truncate_with_ellipsis(
	measure: &impl TextMeasure,
	line: &str,
	font_px: f64,
	max_width: f64,
) -> Option<String> {
	let line = line.trim();
	if line.is_empty() {
		return None;
	}
	if measure.text_width(line, font_px) <= max_width {
		return Some(line.to_owned());
	}
	if measure.text_width(ELLIPSIS, font_px) > max_width {
		return None;
	}

	let chars: Vec<char> = line.chars().collect();
	let prefix = |n: usize| chars[..n].iter().collect::<String>();
	let fits_with_ellipsis = |n: usize| {
		measure.text_width(&format!("{}{ELLIPSIS}", prefix(n)), font_px) <= max_width
	};

	let min_chars = MIN_CHARS_BEFORE_ELLIPSIS.min(chars.len());
	if !fits_with_ellipsis(min_chars) {
		let mut n = chars.len();
		while n > 0 && measure.text_width(&prefix(n), font_px) > max_width {
			n -= 1;
		}
		let shown = prefix(n);
		let shown = shown.trim_end();
		return (!shown.is_empty()).then(|| shown.to_owned());
	}

	let mut n = min_chars;
	while n < chars.len() && fits_with_ellipsis(n + 1) {
		n += 1;
	}
	Some(format!("{}{ELLIPSIS}", prefix(n).trim_end()))
}

/// Byte offsets where `word` may be split: after each hyphen or underscore,
/// or, when it has neither, before each lower-to-upper case transition.
fn natural_breaks(word: &str) -> Vec<usize> {
	let separators: Vec<usize> = word
		.char_indices()
		.filter(|&(_, c)| c == '-' || c == '_')
		.map(|(i, c)| i + c.len_utf8())
		.filter(|&i| i < word.len())
		.collect();
	if !separators.is_empty() {
		return separators;
	}

	let mut breaks = Vec::new();
	let mut prev: Option<char> = None;
	for (i, c) in word.char_indices() {
		if let Some(p) = prev {
			if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
				breaks.push(i);
			}
		}
		prev = Some(c);
	}
	breaks
}

/// Split an overlong word into pieces at natural boundaries.
///
/// Every piece but the last fits `max_width`; the last is whatever remains
/// once it fits or no further boundary helps. An empty result means the word
/// has no usable boundary and should be truncated instead.
pub fn break_long_word(
	measure: &impl TextMeasure,
	word: &str,
	font_px: f64,
	max_width: f64,
) -> Vec<String> {
	let mut pieces = Vec::new();
	let mut rest = word;
	loop {
		if measure.text_width(rest, font_px) <= max_width {
			pieces.push(rest.to_owned());
			break;
		}
		let head = natural_breaks(rest)
			.into_iter()
			.rev()
			.find(|&b| measure.text_width(&rest[..b], font_px) <= max_width);
		match head {
			Some(b) => {
				pieces.push(rest[..b].to_owned());
				rest = &rest[b..];
			}
			None if pieces.is_empty() => return pieces,
			None => {
				pieces.push(rest.to_owned());
				break;
			}
		}
	}
	pieces
}

/// Result of wrapping: the lines to draw, and whether any had to be cut.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wrapped {
	pub lines: Vec<String>,
	pub truncated: bool,
}

/// Greedy word wrap into at most `widths.len()` lines, line `i` limited to
/// `widths[i]`.
///
/// Overlong words are broken at natural boundaries when possible and
/// truncated otherwise. Words left over after the last line are appended to
/// it and the line is truncated.
pub fn wrap_into_lines(
	measure: &impl TextMeasure,
	text: &str,
	font_px: f64,
	widths: &[f64],
) -> Wrapped {
	let mut out = Wrapped::default();
	let mut words: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
	words.reverse();
	if words.is_empty() || widths.is_empty() {
		return out;
	}
	let last = widths.len() - 1;
	let mut current = String::new();

	while let Some(word) = words.pop() {
		let index = out.lines.len();
		let width = widths[index];
		let candidate = if current.is_empty() { word.clone() } else { format!("{current} {word}") };

		if index == last {
			current = candidate;
			continue;
		}
		if measure.text_width(&candidate, font_px) <= width {
			current = candidate;
			continue;
		}
		if !current.is_empty() {
			out.lines.push(std::mem::take(&mut current));
			words.push(word);
			continue;
		}

		let pieces = break_long_word(measure, &word, font_px, width);
		if pieces.len() > 1 {
			let mut pieces = pieces.into_iter();
			if let Some(head) = pieces.next() {
				out.lines.push(head);
			}
			let tail: String = pieces.collect();
			words.push(tail);
			continue;
		}
		match truncate_with_ellipsis(measure, &word, font_px, width) {
			Some(line) => {
				out.truncated |= line != word;
				out.lines.push(line);
			}
			None => out.truncated = true,
		}
	}

	if !current.is_empty() {
		let width = widths[out.lines.len().min(last)];
		match truncate_with_ellipsis(measure, &current, font_px, width) {
			Some(line) => {
				out.truncated |= line != current;
				out.lines.push(line);
			}
			None => out.truncated = true,
		}
	}
	out
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
	pub text: String,
	/// Vertical center in graph units.
	pub y: f64,
}

/// A label laid out inside a node.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedLabel {
	/// Font size in screen pixels. Under a zoom transform draw at
	/// `font_px / zoom`.
	pub font_px: f64,
	pub lines: Vec<LabelLine>,
}

/// Everything needed to lay out a label inside one node.
#[derive(Clone, Copy, Debug)]
pub struct LabelBox {
	pub node_y: f64,
	pub radius: f64,
	pub zoom: f64,
	/// Inner padding in graph units.
	pub padding: f64,
}

/// Lay out `text` inside the node: cap its length, pick a font from the
/// section height, then shrink the font toward [`MIN_FONT_PX`] while lines
/// still need truncating. `None` for blank labels or when nothing fits.
pub fn fit_label(measure: &impl TextMeasure, text: &str, bounds: LabelBox) -> Option<FittedLabel> {
	let text = truncate_to_max_chars(text.trim(), MAX_LABEL_CHARS);
	if text.is_empty() || !bounds.zoom.is_finite() || bounds.zoom <= 0.0 {
		return None;
	}

	let positions = geometry::line_positions(bounds.node_y, bounds.radius);
	let mut widths = [0.0; LINE_COUNT];
	for (i, y) in positions.iter().enumerate() {
		widths[i] = geometry::available_text_width(
			*y,
			bounds.node_y,
			bounds.radius,
			bounds.zoom,
			bounds.padding,
			i,
		);
	}

	let section = geometry::section_height(bounds.radius) * bounds.zoom;
	let diameter = bounds.radius * 2.0 * bounds.zoom;
	let mut font_px = optimal_font_size(measure, section, diameter, MIN_FONT_PX);
	let mut wrapped = wrap_into_lines(measure, &text, font_px, &widths);
	while wrapped.truncated && font_px > MIN_FONT_PX {
		font_px = (font_px * SHRINK_STEP).max(MIN_FONT_PX);
		wrapped = wrap_into_lines(measure, &text, font_px, &widths);
	}

	if wrapped.lines.is_empty() {
		return None;
	}
	let lines = wrapped
		.lines
		.into_iter()
		.zip(positions)
		.map(|(text, y)| LabelLine { text, y })
		.collect();
	Some(FittedLabel { font_px, lines })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::testing::MonoMeasure;

	const M: MonoMeasure = MonoMeasure;

	/// Width of `n` characters at 10px.
	fn chars(n: usize) -> f64 {
		n as f64 * 6.0
	}

	#[test]
	fn label_cap_keeps_seventeen_characters() {
		let label = "This is a very long title that exceeds twenty characters";
		let capped = truncate_to_max_chars(label, 20);
		assert_eq!(capped.chars().count(), 20);
		assert!(capped.ends_with(ELLIPSIS));
		assert_eq!(&capped[..17], "This is a very lo");
		assert_eq!(truncate_to_max_chars("short", 20), "short");
	}

	#[test]
	fn truncation_keeps_as_much_as_fits() {
		let line = "abcdefghijklmnopqrstuvwxyz0123456789";
		let out = truncate_with_ellipsis(&M, line, 10.0, chars(28)).unwrap();
		assert_eq!(out, "abcdefghijklmnopqrstuvwxy...");
		assert!(M.text_width(&out, 10.0) <= chars(28));
	}

	#[test]
	fn narrow_truncation_drops_the_ellipsis() {
		let line = "abcdefghijklmnopqrstuvwxyz";
		assert_eq!(truncate_with_ellipsis(&M, line, 10.0, chars(5)).as_deref(), Some("abcde"));
		assert_eq!(truncate_with_ellipsis(&M, "Short", 10.0, chars(5)).as_deref(), Some("Short"));
	}

	#[test]
	fn truncation_is_never_only_an_ellipsis() {
		let long = "x".repeat(80);
		let labels = ["a", "ab", "hello world", long.as_str(), "   ", "日本語のラベル"];
		for label in &labels {
			for width in 0..200 {
				let width = width as f64 * 0.5;
				if let Some(out) = truncate_with_ellipsis(&M, label, 10.0, width) {
					assert!(!out.trim_end_matches('.').is_empty(), "{label:?} at {width}: {out:?}");
					assert_ne!(out, ELLIPSIS);
					assert!(M.text_width(&out, 10.0) <= width);
				}
			}
		}
		assert_eq!(truncate_with_ellipsis(&M, "A", 10.0, 5.0), None);
		assert_eq!(truncate_with_ellipsis(&M, "   ", 10.0, 500.0), None);
	}

	#[test]
	fn breaks_at_separators_then_case() {
		assert_eq!(
			break_long_word(&M, "state-of-the-art", 10.0, chars(9)),
			vec!["state-of-", "the-art"]
		);
		assert_eq!(
			break_long_word(&M, "snake_case_name", 10.0, chars(6)),
			vec!["snake_", "case_", "name"]
		);
		assert_eq!(
			break_long_word(&M, "LangGraphAgent", 10.0, chars(9)),
			vec!["LangGraph", "Agent"]
		);
		assert!(break_long_word(&M, "abcdefghijkl", 10.0, chars(5)).is_empty());
	}

	#[test]
	fn break_keeps_unfit_remainder() {
		let pieces = break_long_word(&M, "ab-cdefghijkl", 10.0, chars(4));
		assert_eq!(pieces, vec!["ab-", "cdefghijkl"]);
	}

	#[test]
	fn wraps_greedily_into_three_lines() {
		let widths = [chars(12); 3];
		let out = wrap_into_lines(&M, "one two three four five", 10.0, &widths);
		assert_eq!(out.lines, vec!["one two", "three four", "five"]);
		assert!(!out.truncated);
	}

	#[test]
	fn overflow_goes_to_the_last_line() {
		let widths = [chars(8); 3];
		let out = wrap_into_lines(&M, "aaaa bbbb cccc dddd eeee", 10.0, &widths);
		assert_eq!(out.lines.len(), 3);
		assert_eq!(&out.lines[..2], ["aaaa", "bbbb"]);
		// too narrow for twenty characters and an ellipsis
		assert_eq!(out.lines[2], "cccc ddd");
		assert!(out.truncated);
	}

	#[test]
	fn overlong_word_breaks_across_lines() {
		let widths = [chars(9); 3];
		let out = wrap_into_lines(&M, "LangGraphAgent rocks", 10.0, &widths);
		assert_eq!(out.lines, vec!["LangGraph", "Agent", "rocks"]);
		assert!(!out.truncated);
	}

	#[test]
	fn unbreakable_word_is_truncated() {
		let widths = [chars(5); 3];
		let out = wrap_into_lines(&M, "abcdefghijkl xy", 10.0, &widths);
		assert_eq!(out.lines, vec!["abcde", "xy"]);
		assert!(out.truncated);
	}

	#[test]
	fn blank_text_wraps_to_nothing() {
		assert!(wrap_into_lines(&M, "  \t ", 10.0, &[100.0; 3]).lines.is_empty());
	}

	#[test]
	fn font_size_tracks_section_height() {
		// glyph height 0.7 * px must stay under 0.3 * 20.
		let px = optimal_font_size(&M, 20.0, 1000.0, MIN_FONT_PX);
		assert!(M.glyph_height(px) <= 6.0);
		assert!((px - 6.0 / 0.7).abs() <= FONT_TOLERANCE);
		// capped by the diameter
		assert_eq!(optimal_font_size(&M, 100.0, 50.0, MIN_FONT_PX), 6.0);
		assert_eq!(optimal_font_size(&M, 1.0, 5.0, MIN_FONT_PX), MIN_FONT_PX);
		assert_eq!(optimal_font_size(&M, f64::NAN, 5.0, MIN_FONT_PX), MIN_FONT_PX);
	}

	#[test]
	fn fitted_lines_stay_inside_the_node() {
		let labels = [
			"LangChain",
			"Multi-Agent Orchestration Frameworks",
			"x",
			"supercalifragilisticexpialidocious",
		];
		for label in labels {
			for zoom in [0.1, 0.5, 1.0, 2.0, 5.0, 12.0] {
				let bounds = LabelBox {
					node_y: 0.0,
					radius: 12.0,
					zoom,
					padding: 1.0,
				};
				let Some(fitted) = fit_label(&M, label, bounds) else {
					continue;
				};
				assert!(fitted.font_px >= MIN_FONT_PX);
				assert!(fitted.lines.len() <= LINE_COUNT);
				let positions = geometry::line_positions(0.0, 12.0);
				for (i, line) in fitted.lines.iter().enumerate() {
					assert_eq!(line.y, positions[i]);
					let limit = geometry::available_text_width(line.y, 0.0, 12.0, zoom, 1.0, i);
					assert!(
						M.text_width(&line.text, fitted.font_px) <= limit,
						"{label} @ {zoom}: {line:?}"
					);
					assert_ne!(line.text, ELLIPSIS);
				}
			}
		}
	}

	#[test]
	fn blank_labels_render_nothing() {
		let bounds = LabelBox {
			node_y: 0.0,
			radius: 8.0,
			zoom: 4.0,
			padding: 1.0,
		};
		assert_eq!(fit_label(&M, "   ", bounds), None);
		assert!(fit_label(&M, "Agents", bounds).is_some());
	}
}
