//! Write-only vertex buffer access for the trail.
//!
//! `VertexBufferBackend` is the seam to whatever owns the GPU-side storage.
//! `RenderBufferAdapter` owns a backend plus the trail's fixed index pattern and
//! hands out `VertexWriter` guards: the buffer is mapped when the guard is
//! created and unmapped when it drops, on every path out of the caller.

use glam::Vec3;

use super::vertex::RibbonVertex;
use crate::api::error::TrailError;
use crate::core::budget::GeometryBudget;

/// Storage the trail writes vertices into and draws from.
///
/// Mapping follows a no-overwrite discipline: the trail rewrites its whole
/// active range every tick, so a mapped region never needs to preserve or
/// double-buffer what the previous draw read.
pub trait VertexBufferBackend {
    /// Number of vertex slots available.
    fn capacity(&self) -> usize;

    /// Store the static index pattern. Called once at construction.
    fn upload_indices(&mut self, indices: &[u32]) -> Result<(), TrailError>;

    /// Acquire write access. Fails with `TrailError::BufferBusy` while the
    /// storage is still in use.
    fn map_write(&mut self) -> Result<(), TrailError>;

    /// Mapped vertex slots. Only meaningful between `map_write` and `unmap`.
    fn mapped(&mut self) -> &mut [RibbonVertex];

    /// Release write access, making prior writes visible to the next draw.
    fn unmap(&mut self);

    /// Draw `index_count` indices starting at offset 0.
    fn draw_indexed(&mut self, index_count: usize);
}

/// Scoped write access to a mapped vertex buffer. Unmaps on drop.
pub struct VertexWriter<'a, B: VertexBufferBackend + ?Sized> {
    backend: &'a mut B,
    max_vertices: usize,
}

impl<'a, B: VertexBufferBackend + ?Sized> VertexWriter<'a, B> {
    /// Write one vertex. The caller keeps `index < max_vertices`.
    pub fn write(&mut self, index: usize, vertex: RibbonVertex) {
        debug_assert!(
            index < self.max_vertices,
            "vertex {index} outside budget of {}",
            self.max_vertices
        );
        if let Some(slot) = self.backend.mapped().get_mut(index) {
            *slot = vertex;
        }
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Finish writing. Equivalent to dropping the writer.
    pub fn end(self) {}
}

impl<B: VertexBufferBackend + ?Sized> Drop for VertexWriter<'_, B> {
    fn drop(&mut self) {
        self.backend.unmap();
    }
}

/// Owns the trail's vertex buffer backend and its static index pattern.
pub struct RenderBufferAdapter<B: VertexBufferBackend> {
    backend: B,
    max_vertices: usize,
    max_indices: usize,
}

impl<B: VertexBufferBackend> RenderBufferAdapter<B> {
    /// Bind a backend to a planned budget and upload the index pattern.
    pub fn new(mut backend: B, budget: &GeometryBudget) -> Result<Self, TrailError> {
        if backend.capacity() < budget.max_vertices() {
            return Err(TrailError::BufferAllocation {
                vertices: budget.max_vertices(),
            });
        }
        backend.upload_indices(budget.indices())?;
        Ok(Self {
            backend,
            max_vertices: budget.max_vertices(),
            max_indices: budget.max_indices(),
        })
    }

    /// Map the vertex buffer for writing.
    pub fn begin_write(&mut self) -> Result<VertexWriter<'_, B>, TrailError> {
        self.backend.map_write()?;
        Ok(VertexWriter {
            backend: &mut self.backend,
            max_vertices: self.max_vertices,
        })
    }

    /// Issue an indexed draw over the first `index_count` indices.
    pub fn render(&mut self, index_count: usize) {
        debug_assert!(index_count <= self.max_indices);
        self.backend.draw_indexed(index_count.min(self.max_indices));
    }

    /// Rewrite every vertex slot to alternate between `low` and `high`, with
    /// `v` spread evenly across the whole buffer.
    pub fn reset_to_points(&mut self, low: Vec3, high: Vec3) -> Result<(), TrailError> {
        let total = self.max_vertices;
        let last = total.saturating_sub(1).max(1) as f32;
        let mut writer = self.begin_write()?;
        for i in 0..total {
            let v = i as f32 / last;
            let vertex = if i % 2 == 0 {
                RibbonVertex::low(low, v)
            } else {
                RibbonVertex::high(high, v)
            };
            writer.write(i, vertex);
        }
        writer.end();
        Ok(())
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
