//! Force layout over the flattened graph.
//!
//! `force_graph` supplies charge, springs and velocity integration. On top of
//! it each tick relaxes links toward their rest length and pushes apart
//! overlapping nodes, using the render radius plus padding as the collision
//! radius so larger parent nodes get more room.

use std::collections::{HashMap, HashSet};
use std::f64::consts::{PI, TAU};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::comparison::{self, PairSide};
use super::config::LayoutParams;
use super::flatten::FlatGraph;
use super::geometry::{Point, node_radius};

const GOLDEN_ANGLE: f64 = PI * 0.763_932;

#[derive(Clone, Debug)]
struct LayoutNode {
	id: String,
	/// Collision radius.
	radius: f64,
}

/// A node as seen by the position corrections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub anchored: bool,
}

/// Handle returned by [`ForceLayout::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Observer = Box<dyn FnMut(&HashMap<String, Point>)>;

pub struct ForceLayout {
	params: LayoutParams,
	graph: ForceGraph<LayoutNode, ()>,
	index: HashMap<String, DefaultNodeIdx>,
	springs: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	positions: HashMap<String, Point>,
	pinned: HashSet<String>,
	ticks_left: u32,
	observers: Vec<(Subscription, Observer)>,
	next_subscription: u64,
}

impl ForceLayout {
	pub fn new(params: LayoutParams) -> Self {
		Self {
			graph: ForceGraph::new(simulation_parameters(&params)),
			params,
			index: HashMap::new(),
			springs: Vec::new(),
			positions: HashMap::new(),
			pinned: HashSet::new(),
			ticks_left: 0,
			observers: Vec::new(),
			next_subscription: 0,
		}
	}

	/// Rebuild the simulation for a new flattened graph and reheat it.
	///
	/// Surviving nodes keep their position and pin. New children spawn around
	/// their parent, new roots on a circle around the origin.
	pub fn sync(&mut self, flat: &FlatGraph) {
		let mut graph = ForceGraph::new(simulation_parameters(&self.params));
		let mut index = HashMap::with_capacity(flat.nodes.len());
		let mut placed: HashMap<String, Point> = HashMap::with_capacity(flat.nodes.len());
		let mut spawned_children: HashMap<&str, usize> = HashMap::new();

		let roots = flat.nodes.iter().filter(|n| n.parent.is_none()).count().max(1);
		let mut root_slot = 0;

		for node in &flat.nodes {
			let kept = self.positions.get(&node.id).copied().filter(Point::is_finite);
			let parent_pos = node.parent.as_deref().and_then(|p| placed.get(p).copied());
			let pos = match (kept, parent_pos) {
				(Some(p), _) => p,
				(None, Some(parent)) => {
					let slot = spawned_children
						.entry(node.parent.as_deref().unwrap_or_default())
						.or_default();
					let angle = GOLDEN_ANGLE * *slot as f64;
					*slot += 1;
					let d = self.params.link_distance * 0.5;
					Point::new(parent.x + d * angle.cos(), parent.y + d * angle.sin())
				}
				(None, None) => {
					let angle = root_slot as f64 * TAU / roots as f64;
					root_slot += 1;
					let d = if roots == 1 { 0.0 } else { self.params.link_distance * 2.0 };
					Point::new(d * angle.cos(), d * angle.sin())
				}
			};
			placed.insert(node.id.clone(), pos);

			let idx = graph.add_node(NodeData {
				x: pos.x as f32,
				y: pos.y as f32,
				mass: self.params.node_mass,
				is_anchor: self.pinned.contains(&node.id),
				user_data: LayoutNode {
					id: node.id.clone(),
					radius: node_radius(node.has_children) + self.params.collision_padding,
				},
			});
			index.insert(node.id.clone(), idx);
		}

		let mut springs = Vec::new();
		let mut seen = HashSet::new();
		for edge in &flat.edges {
			if edge.is_comparison() && flat.twin_of(edge).is_some() {
				if let Some((_, PairSide::Reverse)) = comparison::split_id(&edge.id) {
					continue;
				}
			}
			let (Some(&a), Some(&b)) = (index.get(&edge.source), index.get(&edge.target)) else {
				continue;
			};
			let key = if edge.source <= edge.target {
				(edge.source.as_str(), edge.target.as_str())
			} else {
				(edge.target.as_str(), edge.source.as_str())
			};
			if a == b || !seen.insert(key) {
				continue;
			}
			graph.add_edge(a, b, EdgeData::default());
			springs.push((a, b));
		}

		self.pinned.retain(|id| index.contains_key(id));
		debug!(
			"article-graph: layout synced with {} nodes, {} springs",
			index.len(),
			springs.len()
		);
		self.graph = graph;
		self.index = index;
		self.springs = springs;
		self.positions = placed;
		self.reheat();
		self.notify();
	}

	/// Restart the cooldown budget.
	pub fn reheat(&mut self) {
		self.ticks_left = self.params.cooldown_ticks;
	}

	pub fn is_running(&self) -> bool {
		self.ticks_left > 0
	}

	/// Advance one step. Returns `false` once the layout has cooled down.
	pub fn tick(&mut self, dt: f32) -> bool {
		if self.ticks_left == 0 {
			return false;
		}
		self.ticks_left -= 1;
		self.graph.update(dt);

		let mut bodies = Vec::with_capacity(self.index.len());
		let mut slots = HashMap::with_capacity(self.index.len());
		let last = &self.positions;
		self.graph.visit_nodes(|node| {
			let (mut x, mut y) = (node.x() as f64, node.y() as f64);
			if !(x.is_finite() && y.is_finite()) {
				if let Some(p) = last.get(&node.data.user_data.id) {
					(x, y) = (p.x, p.y);
				}
			}
			slots.insert(node.index(), bodies.len());
			bodies.push(Body {
				x,
				y,
				radius: node.data.user_data.radius,
				anchored: node.data.is_anchor,
			});
		});

		let springs: Vec<(usize, usize)> = self
			.springs
			.iter()
			.filter_map(|(a, b)| Some((*slots.get(a)?, *slots.get(b)?)))
			.collect();
		relax_links(&mut bodies, &springs, self.params.link_distance, self.params.link_strength);
		separate(&mut bodies, self.params.collision_strength);

		let mut positions = HashMap::with_capacity(bodies.len());
		self.graph.visit_nodes_mut(|node| {
			let Some(&i) = slots.get(&node.index()) else {
				return;
			};
			let body = bodies[i];
			if !node.data.is_anchor {
				node.data.x = body.x as f32;
				node.data.y = body.y as f32;
			}
			let p = Point::new(node.data.x as f64, node.data.y as f64);
			if p.is_finite() {
				positions.insert(node.data.user_data.id.clone(), p);
			}
		});
		self.positions = positions;
		self.notify();
		true
	}

	/// Current position of a node, only while it is finite.
	pub fn position(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}

	pub fn positions(&self) -> &HashMap<String, Point> {
		&self.positions
	}

	/// Move a node and hold it in place.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) {
		let Some(&idx) = self.index.get(id) else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
		self.pinned.insert(id.to_owned());
		let p = Point::new(x, y);
		if p.is_finite() {
			self.positions.insert(id.to_owned(), p);
		}
		self.notify();
	}

	pub fn unpin(&mut self, id: &str) {
		let Some(&idx) = self.index.get(id) else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = false;
			}
		});
		self.pinned.remove(id);
	}

	pub fn is_pinned(&self, id: &str) -> bool {
		self.pinned.contains(id)
	}

	pub fn spring_count(&self) -> usize {
		self.springs.len()
	}

	/// Call `observer` with every node position after each tick, sync and
	/// pin.
	pub fn subscribe(
		&mut self,
		observer: impl FnMut(&HashMap<String, Point>) + 'static,
	) -> Subscription {
		let sub = Subscription(self.next_subscription);
		self.next_subscription += 1;
		self.observers.push((sub, Box::new(observer)));
		sub
	}

	pub fn unsubscribe(&mut self, sub: Subscription) {
		self.observers.retain(|(s, _)| *s != sub);
	}

	fn notify(&mut self) {
		for (_, observer) in &mut self.observers {
			observer(&self.positions);
		}
	}
}

fn simulation_parameters(params: &LayoutParams) -> SimulationParameters {
	SimulationParameters {
		// negative strength repels, as in d3
		force_charge: (-params.charge_strength) as f32,
		force_spring: params.spring,
		force_max: params.max_force,
		node_speed: params.node_speed,
		damping_factor: params.damping,
	}
}

/// Move linked bodies toward `rest` apart, correcting `strength` of the
/// error per call. Anchored bodies do not move.
pub fn relax_links(bodies: &mut [Body], springs: &[(usize, usize)], rest: f64, strength: f64) {
	for &(a, b) in springs {
		let (pa, pb) = (bodies[a], bodies[b]);
		let (dx, dy) = (pb.x - pa.x, pb.y - pa.y);
		let d = dx.hypot(dy);
		if d < 1e-6 || !d.is_finite() {
			continue;
		}
		let shift = (d - rest) / d * strength;
		let (wa, wb) = shares(pa.anchored, pb.anchored);
		bodies[a].x += dx * shift * wa;
		bodies[a].y += dy * shift * wa;
		bodies[b].x -= dx * shift * wb;
		bodies[b].y -= dy * shift * wb;
	}
}

/// Push overlapping bodies apart. Coincident bodies separate along a
/// direction derived from their indices.
pub fn separate(bodies: &mut [Body], strength: f64) {
	for i in 0..bodies.len() {
		for j in (i + 1)..bodies.len() {
			let (a, b) = (bodies[i], bodies[j]);
			let min = a.radius + b.radius;
			let (dx, dy) = (a.x - b.x, a.y - b.y);
			let d = dx.hypot(dy);
			if d >= min || !d.is_finite() {
				continue;
			}
			let (ux, uy) = if d > 1e-4 {
				(dx / d, dy / d)
			} else {
				let angle = (i as f64 * 0.618_034 + j as f64 * 0.414_214) * TAU;
				(angle.cos(), angle.sin())
			};
			let push = (min - d) * strength;
			let (wa, wb) = shares(a.anchored, b.anchored);
			bodies[i].x += ux * push * wa;
			bodies[i].y += uy * push * wa;
			bodies[j].x -= ux * push * wb;
			bodies[j].y -= uy * push * wb;
		}
	}
}

/// How a correction is split between two bodies.
fn shares(a_anchored: bool, b_anchored: bool) -> (f64, f64) {
	match (a_anchored, b_anchored) {
		(false, false) => (0.5, 0.5),
		(true, false) => (0.0, 1.0),
		(false, true) => (1.0, 0.0),
		(true, true) => (0.0, 0.0),
	}
}
