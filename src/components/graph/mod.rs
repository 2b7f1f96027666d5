//! Zoomable hierarchical graph for articles.
//!
//! A forest of nodes plus cross links is flattened by expansion state, laid
//! out with a force simulation and drawn on a canvas. Selection and highlight
//! are mirrored in the URL fragment (`#{graph_id}-node-{id}`) so any view can
//! be linked to, and in-page anchors tagged with `data-graph-node` or
//! `data-graph-edge` navigate the graph.

pub mod anchors;
pub mod comparison;
mod component;
pub mod config;
pub mod deep_link;
pub mod edge_render;
pub mod error;
pub mod expansion;
pub mod flatten;
pub mod geometry;
pub mod layout;
pub mod node_render;
pub mod panel;
pub mod render;
pub mod selection;
pub mod state;
pub mod surface;
#[cfg(test)]
mod testing;
pub mod text_fit;
pub mod theme;
pub mod tree;
pub mod types;
pub mod viewport;

pub use component::GraphCanvas;
pub use config::GraphConfig;
pub use deep_link::DeepLink;
pub use error::{GraphError, Result};
pub use flatten::{FlatEdge, FlatNode};
pub use theme::Theme;
pub use types::{ComparisonDetails, GraphData, GraphLink, TreeNode};
