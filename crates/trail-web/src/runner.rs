use trail_engine::glam::Vec3;
use trail_engine::{
    host_trail, HostVertexBuffer, TrailComponent, TrailConfig, TrailError, TrailUpdate,
};

/// Owns one host-memory trail on behalf of a browser-side renderer.
///
/// The renderer reads vertices and indices straight out of WASM linear memory
/// through the pointer accessors and issues the draw itself after `render()`
/// reports success.
pub struct TrailRunner {
    trail: TrailComponent<HostVertexBuffer>,
}

impl TrailRunner {
    /// Plan the budget and allocate the buffers for `config`.
    pub fn new(config: TrailConfig) -> Result<Self, TrailError> {
        Ok(Self {
            trail: host_trail(config)?,
        })
    }

    /// Build a runner from a saved JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, TrailError> {
        Self::new(TrailConfig::from_json(json)?)
    }

    pub fn save_config(&self) -> Result<String, TrailError> {
        self.trail.config().to_json()
    }

    pub fn add_sample(&mut self, low: Vec3, high: Vec3) -> TrailUpdate {
        self.trail.add_sample(low, high)
    }

    pub fn clear(&mut self, low: Vec3, high: Vec3) -> bool {
        self.trail.clear_trail(low, high)
    }

    /// Record a draw of the current ribbon. False when there is nothing to draw.
    pub fn render(&mut self) -> bool {
        match self.trail.render() {
            Ok(()) => true,
            Err(err) => {
                log::debug!("trail render refused: {err}");
                false
            }
        }
    }

    pub fn set_max_points(&mut self, max_points: usize) -> TrailUpdate {
        self.trail.set_max_points(max_points)
    }

    /// Mark the vertex buffer as being read by the renderer. Updates issued
    /// while set are skipped and retried on the next tick.
    pub fn set_reading(&mut self, reading: bool) {
        self.trail.buffer_mut().backend_mut().set_busy(reading);
    }

    pub fn trail(&self) -> &TrailComponent<HostVertexBuffer> {
        &self.trail
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn vertices_ptr(&self) -> *const f32 {
        self.trail.buffer().backend().vertices_ptr()
    }

    pub fn indices_ptr(&self) -> *const u32 {
        self.trail.buffer().backend().indices_ptr()
    }

    /// Active vertex range as flat floats (5 per vertex).
    pub fn active_floats(&self) -> &[f32] {
        let floats = self.trail.buffer().backend().as_floats();
        let active = self.trail.current_vertex_count() * trail_engine::RibbonVertex::FLOATS;
        &floats[..active.min(floats.len())]
    }

    pub fn vertex_count(&self) -> u32 {
        self.trail.current_vertex_count() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.trail.current_index_count() as u32
    }

    /// Index count of the last recorded draw.
    pub fn draw_index_count(&self) -> u32 {
        self.trail.buffer().backend().last_draw().index_count as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_vertices(&self) -> u32 {
        self.trail.budget().max_vertices() as u32
    }

    pub fn max_indices(&self) -> u32 {
        self.trail.budget().max_indices() as u32
    }

    pub fn max_points(&self) -> u32 {
        self.trail.config().max_points as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(runner: &mut TrailRunner, count: usize) {
        for i in 0..count {
            let x = i as f32;
            runner.add_sample(Vec3::new(x, 0.0, 0.0), Vec3::new(x, 1.0, 0.0));
        }
    }

    #[test]
    fn runner_exposes_counts() {
        let mut runner = TrailRunner::new(TrailConfig::new(5, 4)).unwrap();
        assert_eq!(runner.max_vertices(), 20);
        assert_eq!(runner.max_indices(), 54);

        feed(&mut runner, 5);
        assert_eq!(runner.vertex_count(), 20);
        assert_eq!(runner.index_count(), 54);
        assert_eq!(runner.active_floats().len(), 100);
        assert!(runner.render());
        assert_eq!(runner.draw_index_count(), 54);
    }

    #[test]
    fn render_refused_until_two_points() {
        let mut runner = TrailRunner::new(TrailConfig::default()).unwrap();
        assert!(!runner.render());
        feed(&mut runner, 1);
        assert!(!runner.render());
        feed(&mut runner, 1);
        assert!(runner.render());
    }

    #[test]
    fn reading_blocks_updates() {
        let mut runner = TrailRunner::new(TrailConfig::new(4, 2)).unwrap();
        feed(&mut runner, 2);
        runner.set_reading(true);
        assert_eq!(
            runner.add_sample(Vec3::ZERO, Vec3::Y),
            TrailUpdate::Skipped
        );
        runner.set_reading(false);
        assert!(matches!(
            runner.add_sample(Vec3::X, Vec3::ONE),
            TrailUpdate::Written { .. }
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut runner = TrailRunner::from_json(r#"{ "max_points": 8, "samples_per_segment": 3 }"#).unwrap();
        runner.set_max_points(6);
        let saved = runner.save_config().unwrap();
        let restored = TrailConfig::from_json(&saved).unwrap();
        assert_eq!(restored, TrailConfig::new(6, 3));
    }
}
