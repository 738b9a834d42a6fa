use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::Rng;

use super::types::GraphNode;

/// Nominal frame delta. The loop assumes uniform 60 fps spacing rather
/// than measuring wall-clock time per frame.
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Fraction of the remaining distance to the orbital target closed per
/// frame.
pub const SMOOTHING: f64 = 0.1;

/// Center pulse amplitudes; the center node never drifts further from
/// the origin than these.
pub const CENTER_PULSE_X: f64 = 3.0;
pub const CENTER_PULSE_Y: f64 = 2.0;

const BASE_RADIUS: f64 = 120.0;
const RADIUS_STEP: f64 = 45.0;
const RADIUS_JITTER: f64 = 30.0;
const RELEVANCE_RADIUS: f64 = 6.0;
const SPEED_SCALE: f64 = 4.0;
const PERTURB_AMPLITUDE: f64 = 3.0;

/// The capability surface the engine needs from a node. The hosting
/// view's `GraphNode` implements it; tests drive the engine with fakes.
pub trait OrbitalNode {
	fn id(&self) -> &str;
	fn relevance(&self) -> Option<f64>;
	fn position(&self) -> (f64, f64);
	fn set_position(&mut self, x: f64, y: f64);
	/// Pin the node so an external force-directed renderer treats the
	/// coordinate as fixed rather than simulated.
	fn set_pinned(&mut self, x: f64, y: f64);
}

impl OrbitalNode for GraphNode {
	fn id(&self) -> &str {
		&self.id
	}

	fn relevance(&self) -> Option<f64> {
		self.relevance
	}

	fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	fn set_position(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}

	fn set_pinned(&mut self, x: f64, y: f64) {
		self.fx = x;
		self.fy = y;
	}
}

/// Per-node orbit shape, rolled once when the node is first seen and
/// never re-rolled while the engine instance lives.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalParams {
	pub radius: f64,
	pub angle: f64,
	pub speed: f64,
	pub eccentricity: f64,
	pub phase_offset: f64,
}

/// Instantaneous orbital radius from the polar ellipse equation.
/// Positive for all angles while `e < 1`.
pub fn ellipse_radius(base: f64, eccentricity: f64, theta: f64) -> f64 {
	base * (1.0 - eccentricity * eccentricity) / (1.0 + eccentricity * theta.cos())
}

/// One smoothing step: close `factor` of the remaining distance.
pub fn lerp_towards(current: (f64, f64), target: (f64, f64), factor: f64) -> (f64, f64) {
	(
		current.0 + (target.0 - current.0) * factor,
		current.1 + (target.1 - current.1) * factor,
	)
}

/// Drives non-center nodes along elliptical orbits around the center
/// node, which itself gently pulses near the origin. Owns one
/// `OrbitalParams` record per non-center node; nothing else reads or
/// writes them.
pub struct OrbitalEngine<R: Rng> {
	center_id: String,
	elapsed: f64,
	params: HashMap<String, OrbitalParams>,
	rng: R,
}

impl<R: Rng> OrbitalEngine<R> {
	pub fn new(center_id: impl Into<String>, rng: R) -> Self {
		Self {
			center_id: center_id.into(),
			elapsed: 0.0,
			params: HashMap::new(),
			rng,
		}
	}

	/// Accumulated simulation time in seconds.
	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}

	/// Restart the time accumulator. Cached orbital parameters are
	/// kept; a re-activated node resumes its old orbit shape.
	pub fn reset(&mut self) {
		self.elapsed = 0.0;
	}

	pub fn params(&self, id: &str) -> Option<&OrbitalParams> {
		self.params.get(id)
	}

	/// Create orbital parameters for any node not yet seen. Idempotent:
	/// nodes that already have a record are skipped, so existing orbits
	/// are never re-rolled. Parameters for nodes absent from `nodes`
	/// are retained; a node that disappears and later reappears reuses
	/// its old orbit.
	pub fn ensure_params<N: OrbitalNode>(&mut self, nodes: &[N]) {
		let mut orbit_index = 0usize;
		for node in nodes {
			if node.id() == self.center_id {
				continue;
			}
			if !self.params.contains_key(node.id()) {
				let params = self.make_params(orbit_index, node.relevance());
				self.params.insert(node.id().to_owned(), params);
			}
			orbit_index += 1;
		}
	}

	fn make_params(&mut self, index: usize, relevance: Option<f64>) -> OrbitalParams {
		let relevance = relevance.unwrap_or(5.0).clamp(0.0, 10.0);
		let radius = BASE_RADIUS
			+ index as f64 * RADIUS_STEP
			+ self.rng.gen_range(0.0..RADIUS_JITTER)
			+ relevance * RELEVANCE_RADIUS;
		// Kepler-ish: angular velocity falls off with 1/sqrt(radius).
		let speed = SPEED_SCALE / radius.sqrt()
			* (0.7 + relevance / 10.0 * 0.6)
			* self.rng.gen_range(0.85..1.15);
		OrbitalParams {
			radius,
			angle: self.rng.gen_range(0.0..TAU),
			speed,
			eccentricity: self.rng.gen_range(0.1..0.4),
			phase_offset: self.rng.gen_range(0.0..TAU),
		}
	}

	/// Advance one nominal frame. The center node is written before any
	/// orbiting node so dependents see its updated coordinates within
	/// the same pass. A missing center node skips the physics for this
	/// frame without stopping the clock.
	pub fn step<N: OrbitalNode>(&mut self, nodes: &mut [N]) {
		self.elapsed += FRAME_DT;
		let t = self.elapsed;

		let Some(center_idx) = nodes.iter().position(|n| n.id() == self.center_id) else {
			return;
		};

		// Distinct phase multipliers and amplitudes keep the pulse from
		// tracing a circle.
		let cx = (t * 0.5).sin() * CENTER_PULSE_X;
		let cy = (t * 0.8).cos() * CENTER_PULSE_Y;
		nodes[center_idx].set_position(cx, cy);
		nodes[center_idx].set_pinned(cx, cy);

		self.ensure_params(nodes);

		for node in nodes.iter_mut() {
			if node.id() == self.center_id {
				continue;
			}
			// ensure_params ran above, so the record exists.
			let Some(params) = self.params.get_mut(node.id()) else {
				continue;
			};
			params.angle += params.speed * FRAME_DT;
			let theta = params.angle + params.phase_offset;
			let e = params.eccentricity;
			let r = ellipse_radius(params.radius, e, theta);

			// Flatten y further so the path reads as an ellipse on
			// screen, then wobble it so orbits are not perfectly clean.
			let mut target_x = cx + theta.cos() * r;
			let mut target_y = cy + theta.sin() * r * (1.0 - e * 0.3);
			target_x += (t * 1.3 + params.phase_offset).sin() * PERTURB_AMPLITUDE;
			target_y += (t * 1.7 + params.phase_offset * 2.0).cos() * PERTURB_AMPLITUDE;

			let (x, y) = lerp_towards(node.position(), (target_x, target_y), SMOOTHING);
			node.set_position(x, y);
			node.set_pinned(x, y);
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::orbital_graph::types::CENTER_ID;

	fn engine(seed: u64) -> OrbitalEngine<SmallRng> {
		OrbitalEngine::new(CENTER_ID, SmallRng::seed_from_u64(seed))
	}

	fn sample_nodes() -> Vec<GraphNode> {
		vec![
			GraphNode::new(CENTER_ID).with_label("Athena"),
			GraphNode::new("habits").with_relevance(8.0),
			GraphNode::new("projects").with_relevance(6.0),
			GraphNode::new("diary"),
		]
	}

	#[test]
	fn seeded_runs_are_deterministic() {
		let (mut a, mut b) = (engine(42), engine(42));
		let (mut nodes_a, mut nodes_b) = (sample_nodes(), sample_nodes());

		// The whole position sequence must match, not just the final frame.
		for frame in 0..120 {
			a.step(&mut nodes_a);
			b.step(&mut nodes_b);
			for (na, nb) in nodes_a.iter().zip(&nodes_b) {
				assert_eq!(na.x, nb.x, "x diverged at frame {frame} for {}", na.id);
				assert_eq!(na.y, nb.y, "y diverged at frame {frame} for {}", na.id);
				assert_eq!(na.fx, nb.fx);
				assert_eq!(na.fy, nb.fy);
			}
		}
	}

	#[test]
	fn center_only_pulses_and_never_gets_params() {
		let mut eng = engine(7);
		let mut nodes = sample_nodes();

		for _ in 0..500 {
			eng.step(&mut nodes);
			let center = &nodes[0];
			assert!(center.x.abs() <= CENTER_PULSE_X + 1e-9);
			assert!(center.y.abs() <= CENTER_PULSE_Y + 1e-9);
		}
		assert!(eng.params(CENTER_ID).is_none());
		assert!(eng.params("habits").is_some());
	}

	#[test]
	fn ellipse_radius_stays_positive() {
		for e_step in 0..30 {
			let e = 0.1 + e_step as f64 * 0.01;
			for theta_step in 0..720 {
				let theta = theta_step as f64 * TAU / 720.0;
				assert!(ellipse_radius(200.0, e, theta) > 0.0);
			}
		}
	}

	#[test]
	fn smoothing_converges_monotonically() {
		let target: (f64, f64) = (100.0, 50.0);
		let mut pos: (f64, f64) = (0.0, 0.0);
		let mut dist = (pos.0 - target.0).hypot(pos.1 - target.1);

		for frame in 0..200 {
			pos = lerp_towards(pos, target, SMOOTHING);
			let next = (pos.0 - target.0).hypot(pos.1 - target.1);
			assert!(next < dist, "distance grew at frame {frame}");
			dist = next;
			if dist < 0.01 {
				return;
			}
		}
		panic!("did not converge within 200 frames, remaining {dist}");
	}

	#[test]
	fn param_creation_is_idempotent() {
		let mut eng = engine(99);
		let nodes = sample_nodes();

		eng.ensure_params(&nodes);
		let before: Vec<OrbitalParams> = nodes
			.iter()
			.filter(|n| !n.is_center())
			.map(|n| eng.params(&n.id).unwrap().clone())
			.collect();

		eng.ensure_params(&nodes);
		for (node, old) in nodes.iter().filter(|n| !n.is_center()).zip(&before) {
			let now = eng.params(&node.id).unwrap();
			assert_eq!(now.radius.to_bits(), old.radius.to_bits());
			assert_eq!(now.angle.to_bits(), old.angle.to_bits());
			assert_eq!(now.speed.to_bits(), old.speed.to_bits());
			assert_eq!(now.eccentricity.to_bits(), old.eccentricity.to_bits());
			assert_eq!(now.phase_offset.to_bits(), old.phase_offset.to_bits());
		}
	}

	#[test]
	fn eccentricity_and_phase_fall_in_documented_ranges() {
		let mut eng = engine(3);
		let nodes: Vec<GraphNode> = (0..50).map(|i| GraphNode::new(format!("n{i}"))).collect();
		eng.ensure_params(&nodes);

		for node in &nodes {
			let p = eng.params(&node.id).unwrap();
			assert!((0.1..0.4).contains(&p.eccentricity));
			assert!((0.0..TAU).contains(&p.phase_offset));
			assert!((0.0..TAU).contains(&p.angle));
			assert!(p.radius >= BASE_RADIUS);
			assert!(p.speed > 0.0);
		}
	}

	#[test]
	fn disappearing_node_keeps_stale_params() {
		let mut eng = engine(11);
		let mut nodes = sample_nodes();
		eng.step(&mut nodes);
		let old = eng.params("diary").unwrap().clone();

		// Node drops out of the collection for a while.
		let mut without: Vec<GraphNode> = nodes.drain(..3).collect();
		for _ in 0..60 {
			eng.step(&mut without);
		}

		// On reappearance the old orbit shape is reused, not re-rolled.
		without.push(GraphNode::new("diary"));
		eng.step(&mut without);
		let now = eng.params("diary").unwrap();
		assert_eq!(now.radius.to_bits(), old.radius.to_bits());
		assert_eq!(now.speed.to_bits(), old.speed.to_bits());
		assert_eq!(now.eccentricity.to_bits(), old.eccentricity.to_bits());
		assert_eq!(now.phase_offset.to_bits(), old.phase_offset.to_bits());
	}

	#[test]
	fn missing_center_skips_physics_but_keeps_clock_running() {
		let mut eng = engine(5);
		let mut nodes = vec![
			GraphNode::new("habits").with_relevance(4.0),
			GraphNode::new("diary"),
		];
		let snapshot: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();

		for _ in 0..30 {
			eng.step(&mut nodes);
		}
		for (node, (x, y)) in nodes.iter().zip(&snapshot) {
			assert_eq!(node.x, *x);
			assert_eq!(node.y, *y);
		}
		assert!(eng.elapsed() > 0.0);
	}

	#[test]
	fn reset_restarts_clock_but_keeps_orbits() {
		let mut eng = engine(8);
		let mut nodes = sample_nodes();
		for _ in 0..10 {
			eng.step(&mut nodes);
		}
		let old = eng.params("habits").unwrap().clone();

		eng.reset();
		assert_eq!(eng.elapsed(), 0.0);
		assert_eq!(eng.params("habits").unwrap().radius, old.radius);
	}

	/// Fake node proving the engine only needs the narrow trait surface.
	struct Probe {
		id: String,
		x: f64,
		y: f64,
		pins: usize,
	}

	impl OrbitalNode for Probe {
		fn id(&self) -> &str {
			&self.id
		}

		fn relevance(&self) -> Option<f64> {
			None
		}

		fn position(&self) -> (f64, f64) {
			(self.x, self.y)
		}

		fn set_position(&mut self, x: f64, y: f64) {
			self.x = x;
			self.y = y;
		}

		fn set_pinned(&mut self, _x: f64, _y: f64) {
			self.pins += 1;
		}
	}

	#[test]
	fn every_node_is_pinned_each_frame() {
		let mut eng = engine(21);
		let mut nodes = vec![
			Probe {
				id: CENTER_ID.into(),
				x: 0.0,
				y: 0.0,
				pins: 0,
			},
			Probe {
				id: "favorites".into(),
				x: 0.0,
				y: 0.0,
				pins: 0,
			},
		];
		for _ in 0..25 {
			eng.step(&mut nodes);
		}
		assert_eq!(nodes[0].pins, 25);
		assert_eq!(nodes[1].pins, 25);
	}
}
