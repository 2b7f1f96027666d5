//! Light and dark color sets, chosen from the host page's `data-theme`.

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub dark: bool,
	pub background: &'static str,
	pub link: &'static str,
	pub node_border: &'static str,
	pub node_label: &'static str,
	/// Border and edge color of the highlighted element.
	pub highlight: &'static str,
	pub highlight_glow: &'static str,
	pub comparison: &'static str,
	pub badge: &'static str,
	pub badge_highlight: &'static str,
	pub badge_text: &'static str,
	pub badge_text_highlight: &'static str,
	/// Background flashed on a document section when it is scrolled to.
	pub section_flash: &'static str,
}

impl Theme {
	pub fn light() -> Self {
		Self {
			dark: false,
			background: "#ffffff",
			link: "rgba(0, 0, 0, 0.8)",
			node_border: "#333333",
			node_label: "#ffffff",
			highlight: "#FFA500",
			highlight_glow: "rgba(255, 215, 0, 0.6)",
			comparison: "#BBBBBB",
			badge: "rgba(255, 255, 255, 0.9)",
			badge_highlight: "rgba(255, 215, 0, 0.9)",
			badge_text: "#1a1a1a",
			badge_text_highlight: "#000000",
			section_flash: "rgba(255, 215, 0, 0.3)",
		}
	}

	pub fn dark() -> Self {
		Self {
			dark: true,
			background: "#1e1e1e",
			link: "rgba(255, 255, 255, 0.9)",
			node_border: "#ffffff",
			node_label: "#ffffff",
			highlight: "#FFD700",
			highlight_glow: "rgba(255, 215, 0, 0.8)",
			comparison: "#CCCCCC",
			badge: "rgba(30, 30, 30, 0.9)",
			badge_highlight: "rgba(255, 215, 0, 0.9)",
			badge_text: "#ffffff",
			badge_text_highlight: "#000000",
			section_flash: "rgba(255, 215, 0, 0.2)",
		}
	}

	/// Theme named by a `data-theme` value; anything but `dark` is light.
	pub fn named(name: &str) -> Self {
		if name.eq_ignore_ascii_case("dark") { Self::dark() } else { Self::light() }
	}

	/// Read `data-theme` from the document's root element.
	pub fn from_document() -> Self {
		web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element())
			.and_then(|el| el.get_attribute("data-theme"))
			.map(|name| Self::named(&name))
			.unwrap_or_else(Self::light)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn named_themes() {
		assert!(Theme::named("dark").dark);
		assert!(Theme::named("DARK").dark);
		assert!(!Theme::named("light").dark);
		assert!(!Theme::named("sepia").dark);
		assert_eq!(Theme::default(), Theme::light());
	}
}
