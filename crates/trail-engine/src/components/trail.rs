use glam::Vec3;

use crate::api::config::TrailConfig;
use crate::api::error::TrailError;
use crate::core::budget::{ribbon_index_count, GeometryBudget};
use crate::core::window::{SamplePair, SamplePointWindow};
use crate::renderer::buffer::{RenderBufferAdapter, VertexBufferBackend};
use crate::systems::spline::SplineStitcher;

/// What a per-tick update did to the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailUpdate {
    /// The ribbon was rebuilt with this many vertices.
    Written { vertices: usize },
    /// Fewer than two points are retained; nothing to draw.
    Empty,
    /// The buffer could not be mapped. The previous frame stays on screen and
    /// the next update rebuilds everything.
    Skipped,
}

/// A ribbon trail fed one low/high sample pair per tick.
///
/// The geometry budget is planned once in `new`; every later update writes
/// into the same fixed-size buffer.
pub struct TrailComponent<B: VertexBufferBackend> {
    config: TrailConfig,
    budget: GeometryBudget,
    window: SamplePointWindow,
    stitcher: SplineStitcher,
    buffer: RenderBufferAdapter<B>,
    current_vertex_count: usize,
    current_index_count: usize,
}

impl<B: VertexBufferBackend> TrailComponent<B> {
    /// Plan the budget and bind the vertex buffer. Any error here is fatal:
    /// the trail must not be used.
    pub fn new(config: TrailConfig, backend: B) -> Result<Self, TrailError> {
        Self::from_budget(GeometryBudget::plan(&config)?, backend)
    }

    /// Bind the vertex buffer to an already planned budget. The configuration
    /// is the one the budget was planned from.
    pub fn from_budget(budget: GeometryBudget, backend: B) -> Result<Self, TrailError> {
        let config = TrailConfig::new(budget.max_points(), budget.samples_per_segment());
        let buffer = RenderBufferAdapter::new(backend, &budget)?;
        Ok(Self {
            window: SamplePointWindow::new(config.max_points)?,
            stitcher: SplineStitcher::new(config.samples_per_segment),
            config,
            budget,
            buffer,
            current_vertex_count: 0,
            current_index_count: 0,
        })
    }

    /// Admit this tick's sample pair and rebuild the ribbon.
    pub fn add_sample(&mut self, low: Vec3, high: Vec3) -> TrailUpdate {
        self.window.push(SamplePair::new(low, high));
        self.refresh()
    }

    /// Forget every retained point and collapse the visible buffer onto
    /// `low`/`high`. Returns false if the buffer was busy; the window is
    /// emptied either way.
    pub fn clear_trail(&mut self, low: Vec3, high: Vec3) -> bool {
        self.window.clear();
        self.current_vertex_count = 0;
        self.current_index_count = 0;

        match self.buffer.reset_to_points(low, high) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("trail clear: buffer not collapsed: {err}");
                false
            }
        }
    }

    /// Draw the current ribbon. Refused when fewer than two points are retained.
    pub fn render(&mut self) -> Result<(), TrailError> {
        let retained = self.window.len();
        if retained < 2 {
            return Err(TrailError::NotEnoughPoints { retained });
        }
        self.buffer.render(self.current_index_count);
        Ok(())
    }

    /// Change how many points the trail retains. Shrinking evicts the oldest
    /// points; growing is capped at the planned budget. Either way the ribbon
    /// is rebuilt from what remains.
    pub fn set_max_points(&mut self, max_points: usize) -> TrailUpdate {
        let planned = self.budget.max_points();
        let max_points = if max_points > planned {
            log::warn!(
                "trail max_points {} exceeds planned budget of {}; clamping",
                max_points,
                planned
            );
            planned
        } else {
            max_points
        };

        self.config.max_points = max_points;
        self.window.set_max_points(max_points);
        self.refresh()
    }

    fn refresh(&mut self) -> TrailUpdate {
        if self.window.len() < 2 {
            self.current_vertex_count = 0;
            self.current_index_count = 0;
            return TrailUpdate::Empty;
        }

        match self.rebuild() {
            Ok(vertices) => {
                self.current_vertex_count = vertices;
                self.current_index_count = ribbon_index_count(vertices);
                log::trace!(
                    "trail rebuilt: {} points -> {} vertices",
                    self.window.len(),
                    vertices
                );
                TrailUpdate::Written { vertices }
            }
            Err(TrailError::BufferBusy) => {
                log::debug!("trail vertex buffer busy; skipping tick");
                TrailUpdate::Skipped
            }
            Err(err) => {
                log::warn!("trail update failed: {err}");
                TrailUpdate::Skipped
            }
        }
    }

    fn rebuild(&mut self) -> Result<usize, TrailError> {
        let mut writer = self.buffer.begin_write()?;
        let vertices = self
            .stitcher
            .stitch(&self.window, |index, vertex| writer.write(index, vertex));
        writer.end();
        Ok(vertices)
    }

    // -- Accessors --

    pub fn current_vertex_count(&self) -> usize {
        self.current_vertex_count
    }

    pub fn current_index_count(&self) -> usize {
        self.current_index_count
    }

    pub fn retained_points(&self) -> usize {
        self.window.len()
    }

    /// Current configuration, including any runtime `max_points` change.
    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn budget(&self) -> &GeometryBudget {
        &self.budget
    }

    pub fn window(&self) -> &SamplePointWindow {
        &self.window
    }

    pub fn buffer(&self) -> &RenderBufferAdapter<B> {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut RenderBufferAdapter<B> {
        &mut self.buffer
    }
}
