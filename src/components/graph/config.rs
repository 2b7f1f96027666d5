//! Tunables for layout, zoom limits and camera centering.
//!
//! Every field has a default, so hosts may pass a partial JSON object.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub layout: LayoutParams,
	pub zoom: ZoomLimits,
	pub center: CenterPolicy,
	/// Edge label badges are hidden below this zoom.
	pub min_zoom_for_labels: f64,
	/// Inner padding of node labels, in graph units.
	pub label_padding: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			layout: LayoutParams::default(),
			zoom: ZoomLimits::default(),
			center: CenterPolicy::default(),
			min_zoom_for_labels: 0.5,
			label_padding: 1.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Added to the render radius to get the collision radius.
	pub collision_padding: f64,
	/// Share of an overlap resolved per tick.
	pub collision_strength: f64,
	/// Share of the rest-length error corrected per tick.
	pub link_strength: f64,
	pub node_mass: f32,
	pub spring: f32,
	pub max_force: f32,
	pub node_speed: f32,
	pub damping: f32,
	/// Ticks run after a reheat before the layout is considered stable.
	pub cooldown_ticks: u32,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			link_distance: 50.0,
			charge_strength: -200.0,
			collision_padding: 5.0,
			collision_strength: 0.7,
			link_strength: 0.3,
			node_mass: 10.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			cooldown_ticks: 300,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
	/// Zooming out stops once the visible cluster would cover less than
	/// this share of the viewport area.
	pub min_cluster_fraction: f64,
	/// Zooming in stops once the largest node's diameter would exceed this
	/// share of the viewport's shorter side.
	pub max_node_fraction: f64,
	/// Zooming in also stops once the visible graph span would drop below
	/// this many largest-node diameters.
	pub min_viewport_node_multiple: f64,
	/// Minimum visible graph span when no node is visible.
	pub fallback_min_viewport: f64,
	pub min_scale: f64,
	pub max_scale: f64,
	/// Zoom factor per wheel notch.
	pub step: f64,
	/// How long a reverted zoom suppresses further zoom events.
	pub correction_cooldown_ms: f64,
}

impl Default for ZoomLimits {
	fn default() -> Self {
		Self {
			min_cluster_fraction: 0.10,
			max_node_fraction: 0.90,
			min_viewport_node_multiple: 3.0,
			fallback_min_viewport: 50.0,
			min_scale: 0.05,
			max_scale: 40.0,
			step: 1.1,
			correction_cooldown_ms: 10.0,
		}
	}
}

/// How the camera settles on a deep-linked or highlighted node that may not
/// have a position yet.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CenterPolicy {
	pub zoom: f64,
	pub attempts: u32,
	pub delay_ms: f64,
}

impl Default for CenterPolicy {
	fn default() -> Self {
		Self {
			zoom: 1.5,
			attempts: 30,
			delay_ms: 100.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config: GraphConfig = serde_json::from_str(
			r#"{ "layout": { "link_distance": 80 }, "center": { "zoom": 2 } }"#,
		)
		.unwrap();
		assert_eq!(config.layout.link_distance, 80.0);
		assert_eq!(config.layout.charge_strength, -200.0);
		assert_eq!(config.center.zoom, 2.0);
		assert_eq!(config.center.attempts, 30);
		assert_eq!(config.zoom, ZoomLimits::default());
		assert_eq!(config.min_zoom_for_labels, 0.5);
	}
}
