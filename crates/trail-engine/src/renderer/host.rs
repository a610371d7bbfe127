use super::buffer::VertexBufferBackend;
use super::vertex::RibbonVertex;
use crate::api::error::TrailError;

/// The most recent draw request, read by an external renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawRecord {
    /// Indices requested by the last draw.
    pub index_count: usize,
    /// Total draws issued since allocation.
    pub draw_calls: u64,
}

/// Host-memory vertex buffer.
///
/// Storage is allocated once and never grows. A renderer living outside Rust
/// (e.g. WebGPU via SharedArrayBuffer) reads vertices and indices through the
/// raw pointers and issues the draw itself using `last_draw()`. While that
/// renderer is still reading it can mark the buffer busy, which makes
/// mapping fail for the tick.
#[derive(Debug)]
pub struct HostVertexBuffer {
    vertices: Vec<RibbonVertex>,
    indices: Vec<u32>,
    mapped: bool,
    busy: bool,
    last_draw: DrawRecord,
}

impl HostVertexBuffer {
    /// Allocate `vertices` zeroed slots.
    pub fn allocate(vertices: usize) -> Result<Self, TrailError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(vertices)
            .map_err(|_| TrailError::BufferAllocation { vertices })?;
        storage.resize(vertices, RibbonVertex::default());
        Ok(Self {
            vertices: storage,
            indices: Vec::new(),
            mapped: false,
            busy: false,
            last_draw: DrawRecord::default(),
        })
    }

    /// Mark the storage as in use by a reader. Mapping fails while set.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn last_draw(&self) -> DrawRecord {
        self.last_draw
    }

    /// Raw pointer to vertex data (5 floats per vertex) for SharedArrayBuffer reads.
    pub fn vertices_ptr(&self) -> *const f32 {
        self.vertices.as_ptr() as *const f32
    }

    /// Raw pointer to the static index pattern.
    pub fn indices_ptr(&self) -> *const u32 {
        self.indices.as_ptr()
    }

    /// Vertex data as flat floats.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl VertexBufferBackend for HostVertexBuffer {
    fn capacity(&self) -> usize {
        self.vertices.len()
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<(), TrailError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(indices.len())
            .map_err(|_| TrailError::BufferAllocation {
                vertices: self.vertices.len(),
            })?;
        storage.extend_from_slice(indices);
        self.indices = storage;
        Ok(())
    }

    fn map_write(&mut self) -> Result<(), TrailError> {
        if self.busy || self.mapped {
            return Err(TrailError::BufferBusy);
        }
        self.mapped = true;
        Ok(())
    }

    fn mapped(&mut self) -> &mut [RibbonVertex] {
        debug_assert!(self.mapped, "vertex buffer written while unmapped");
        &mut self.vertices
    }

    fn unmap(&mut self) {
        self.mapped = false;
    }

    fn draw_indexed(&mut self, index_count: usize) {
        debug_assert!(!self.mapped, "draw issued while vertex buffer is mapped");
        self.last_draw = DrawRecord {
            index_count,
            draw_calls: self.last_draw.draw_calls + 1,
        };
        log::trace!("trail draw: {} indices", index_count);
    }
}
