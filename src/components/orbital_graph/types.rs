/// Identifier of the reserved center node (the Athena assistant avatar).
/// Orbiting nodes revolve around it; it only pulses.
pub const CENTER_ID: &str = "athena";

/// Caller-facing record for one visualizable entity (a knowledge cluster
/// or the assistant node). Position and pinned-position fields are
/// mutated in place every frame by the orbital engine while it is
/// active; the caller must not write them concurrently.
#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub label: Option<String>,
	pub color: Option<String>,
	/// Weight in 0..=10 scaling orbital radius and speed.
	pub relevance: Option<f64>,
	/// Live position, read by the renderer every tick.
	pub x: f64,
	pub y: f64,
	/// Pinned position, forced onto the force-directed renderer so its
	/// own physics does not override the orbit.
	pub fx: f64,
	pub fy: f64,
	/// Legacy force-graph velocity fields. The orbital engine never
	/// reads or writes these.
	pub vx: f64,
	pub vy: f64,
}

impl GraphNode {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: None,
			color: None,
			relevance: None,
			x: 0.0,
			y: 0.0,
			fx: 0.0,
			fy: 0.0,
			vx: 0.0,
			vy: 0.0,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_relevance(mut self, relevance: f64) -> Self {
		self.relevance = Some(relevance);
		self
	}

	pub fn is_center(&self) -> bool {
		self.id == CENTER_ID
	}
}

#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
