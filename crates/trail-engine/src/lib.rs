pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::config::TrailConfig;
pub use api::error::TrailError;
pub use components::trail::{TrailComponent, TrailUpdate};
pub use core::budget::{ribbon_index_count, ribbon_vertex_count, GeometryBudget};
pub use core::window::{SamplePair, SamplePointWindow};
pub use renderer::buffer::{RenderBufferAdapter, VertexBufferBackend, VertexWriter};
pub use renderer::host::{DrawRecord, HostVertexBuffer};
pub use renderer::vertex::RibbonVertex;
pub use systems::spline::{
    catmull_rom, SegmentControls, SegmentSample, SegmentSampler, SplineStitcher,
};

/// Build a trail backed by host memory sized exactly to its planned budget.
pub fn host_trail(config: TrailConfig) -> Result<TrailComponent<HostVertexBuffer>, TrailError> {
    let budget = GeometryBudget::plan(&config)?;
    let backend = HostVertexBuffer::allocate(budget.max_vertices())?;
    TrailComponent::from_budget(budget, backend)
}
