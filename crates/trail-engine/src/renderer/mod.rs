pub mod buffer;
pub mod host;
pub mod vertex;

// Re-export key types for convenient access
pub use buffer::{RenderBufferAdapter, VertexBufferBackend, VertexWriter};
pub use host::{DrawRecord, HostVertexBuffer};
pub use vertex::RibbonVertex;
