mod component;
mod fullscreen;
mod orbit;
mod render;
mod state;
mod types;
mod viewport;

pub use component::OrbitalGraphCanvas;
pub use fullscreen::{FullscreenCommand, FullscreenState};
pub use orbit::{OrbitalEngine, OrbitalNode, OrbitalParams};
pub use types::{CENTER_ID, GraphData, GraphLink, GraphNode};
pub use viewport::{CHROME_OFFSET, MIN_HEIGHT, viewport_size};
