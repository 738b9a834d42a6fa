use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::orbit::OrbitalEngine;
use super::types::{CENTER_ID, GraphData, GraphNode};

const COLORS: &[&str] = &[
	"#8b5cf6", "#06b6d4", "#f59e0b", "#10b981", "#ec4899", "#6366f1", "#f97316", "#14b8a6",
];

const CENTER_COLOR: &str = "#a78bfa";

pub const NODE_RADIUS: f64 = 5.0;
pub const CENTER_RADIUS: f64 = 14.0;

/// Per-node payload carried by the force-graph renderer.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: Option<String>,
	pub color: String,
	pub draw_radius: f64,
	pub is_center: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Graph view state: the caller-owned node records, the orbital engine
/// that drives them, and the force-directed renderer the results are
/// pinned onto. Graph-space is origin-centered; the view transform puts
/// the origin at the canvas center.
pub struct OrbitalGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub bodies: Vec<GraphNode>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	engine: OrbitalEngine<SmallRng>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
}

impl OrbitalGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, seed: u64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut bodies = data.nodes.clone();

		let orbiter_count = bodies.iter().filter(|n| !n.is_center()).count().max(1);
		let mut ring_slot = 0usize;
		for body in &mut bodies {
			if body.is_center() {
				body.x = 0.0;
				body.y = 0.0;
			} else {
				// Starting ring; the engine lerps from here onto the orbit.
				let angle = ring_slot as f64 * 2.0 * PI / orbiter_count as f64;
				body.x = 150.0 * angle.cos();
				body.y = 150.0 * angle.sin();
				ring_slot += 1;
			}
			body.fx = body.x;
			body.fy = body.y;
		}

		for (i, body) in bodies.iter().enumerate() {
			let info = if body.is_center() {
				NodeInfo {
					label: body.label.clone(),
					color: CENTER_COLOR.into(),
					draw_radius: CENTER_RADIUS,
					is_center: true,
				}
			} else {
				NodeInfo {
					label: body.label.clone(),
					color: body
						.color
						.clone()
						.unwrap_or_else(|| COLORS[i % COLORS.len()].into()),
					draw_radius: NODE_RADIUS + body.relevance.unwrap_or(5.0) * 0.6,
					is_center: false,
				}
			};
			let idx = graph.add_node(NodeData {
				x: body.x as f32,
				y: body.y as f32,
				mass: 10.0,
				is_anchor: body.is_center(),
				user_data: info,
			});
			id_to_idx.insert(body.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			graph,
			bodies,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			engine: OrbitalEngine::new(CENTER_ID, SmallRng::seed_from_u64(seed)),
			id_to_idx,
		}
	}

	/// Pause or resume the orbit. Resuming restarts the engine clock;
	/// orbit shapes survive the pause.
	pub fn set_running(&mut self, running: bool) {
		if running && !self.animation_running {
			self.engine.reset();
		}
		self.animation_running = running;
	}

	/// Whether the frame loop should stay armed. A paused graph or an
	/// empty node collection stops scheduling; no orphaned callback
	/// keeps firing against nothing.
	pub fn should_animate(&self) -> bool {
		self.animation_running && !self.bodies.is_empty()
	}

	/// One frame: orbital step first, then pin every driven position
	/// onto the renderer so its own physics cannot move those nodes,
	/// then let the renderer relax whatever is left unpinned.
	pub fn tick(&mut self, dt: f32) {
		self.engine.step(&mut self.bodies);

		let pinned: HashMap<DefaultNodeIdx, (f32, f32)> = self
			.bodies
			.iter()
			.filter_map(|b| {
				self.id_to_idx
					.get(&b.id)
					.map(|&idx| (idx, (b.fx as f32, b.fy as f32)))
			})
			.collect();
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(x, y)) = pinned.get(&node.index()) {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
		});

		self.graph.update(dt);
		self.flow_time += dt as f64;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		// Keep the pan offset, shift the anchor with the canvas center.
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}
