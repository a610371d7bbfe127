//! WASM exports for a single ribbon trail.
//!
//! The host page calls `trail_init` once, then `trail_add_sample` every tick
//! with the blade's low and high edge positions. After each tick it reads the
//! vertex range through `get_vertices_ptr` / `get_vertex_count` and, when
//! `trail_render` returns true, draws `get_draw_index_count` indices from the
//! buffer at `get_indices_ptr`.

pub mod runner;

pub use runner::TrailRunner;

use std::cell::RefCell;

use trail_engine::glam::Vec3;
use trail_engine::{TrailConfig, TrailUpdate};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<TrailRunner>> = const { RefCell::new(None) };
}

fn with_runner<R: Default>(f: impl FnOnce(&mut TrailRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::error!("trail not initialized; call trail_init() first");
            R::default()
        }
    })
}

fn install(runner: Result<TrailRunner, trail_engine::TrailError>) -> bool {
    match runner {
        Ok(runner) => {
            log::info!(
                "trail: initialized ({} max vertices)",
                runner.max_vertices()
            );
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            true
        }
        Err(err) => {
            log::error!("trail: initialization failed: {err}");
            false
        }
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub fn trail_init(max_points: u32, samples_per_segment: u32) -> bool {
    init_logging();
    install(TrailRunner::new(TrailConfig::new(
        max_points as usize,
        samples_per_segment as usize,
    )))
}

#[wasm_bindgen]
pub fn trail_init_from_json(json: &str) -> bool {
    init_logging();
    install(TrailRunner::from_json(json))
}

#[wasm_bindgen]
pub fn trail_save_config() -> String {
    with_runner(|r| match r.save_config() {
        Ok(json) => json,
        Err(err) => {
            log::error!("trail: saving config failed: {err}");
            String::new()
        }
    })
}

/// Returns true when the vertex buffer was rewritten this tick.
#[wasm_bindgen]
pub fn trail_add_sample(lx: f32, ly: f32, lz: f32, hx: f32, hy: f32, hz: f32) -> bool {
    with_runner(|r| {
        matches!(
            r.add_sample(Vec3::new(lx, ly, lz), Vec3::new(hx, hy, hz)),
            TrailUpdate::Written { .. }
        )
    })
}

#[wasm_bindgen]
pub fn trail_clear(lx: f32, ly: f32, lz: f32, hx: f32, hy: f32, hz: f32) -> bool {
    with_runner(|r| r.clear(Vec3::new(lx, ly, lz), Vec3::new(hx, hy, hz)))
}

#[wasm_bindgen]
pub fn trail_render() -> bool {
    with_runner(|r| r.render())
}

#[wasm_bindgen]
pub fn trail_set_max_points(max_points: u32) {
    with_runner(|r| {
        r.set_max_points(max_points as usize);
    })
}

#[wasm_bindgen]
pub fn trail_set_reading(reading: bool) {
    with_runner(|r| r.set_reading(reading))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_vertices_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.vertices_ptr())
    })
}

#[wasm_bindgen]
pub fn get_indices_ptr() -> *const u32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.indices_ptr())
    })
}

/// Copy of the active vertex range, for hosts without shared memory.
#[wasm_bindgen]
pub fn get_vertices() -> js_sys::Float32Array {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(r) => js_sys::Float32Array::from(r.active_floats()),
        None => js_sys::Float32Array::new_with_length(0),
    })
}

#[wasm_bindgen]
pub fn get_vertex_count() -> u32 {
    with_runner(|r| r.vertex_count())
}

#[wasm_bindgen]
pub fn get_index_count() -> u32 {
    with_runner(|r| r.index_count())
}

#[wasm_bindgen]
pub fn get_draw_index_count() -> u32 {
    with_runner(|r| r.draw_index_count())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_vertices() -> u32 {
    with_runner(|r| r.max_vertices())
}

#[wasm_bindgen]
pub fn get_max_indices() -> u32 {
    with_runner(|r| r.max_indices())
}

#[wasm_bindgen]
pub fn get_max_points() -> u32 {
    with_runner(|r| r.max_points())
}
