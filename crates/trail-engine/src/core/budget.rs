//! Geometry budget planning.
//!
//! The budget is computed once from the trail configuration and sizes every
//! buffer the trail will ever write. Nothing is allocated after planning.

use crate::api::config::TrailConfig;
use crate::api::error::TrailError;

/// Indices per quad between two consecutive vertex pairs (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Number of ribbon vertices produced for `points` retained pairs with
/// `samples` spline samples per segment.
///
/// The first segment contributes `samples` pairs; every later segment shares
/// its first sample with the previous segment's last one and contributes
/// `samples - 1`. The trailing segment that reaches the newest pair is one of
/// those later segments once four or more points are retained.
pub fn ribbon_vertex_count(points: usize, samples: usize) -> usize {
    checked_ribbon_vertex_count(points, samples).unwrap_or(usize::MAX)
}

/// `ribbon_vertex_count`, or `None` when the count does not fit in `usize`.
pub fn checked_ribbon_vertex_count(points: usize, samples: usize) -> Option<usize> {
    match points {
        0 | 1 => Some(0),
        2 | 3 => samples.checked_mul(2),
        _ => {
            let curves = points - 3;
            let shared = samples.saturating_sub(1);
            let main = (curves - 1)
                .checked_mul(shared)?
                .checked_add(samples)?
                .checked_mul(2)?;
            main.checked_add(shared.checked_mul(2)?)
        }
    }
}

/// Triangle-list index count needed to draw `vertices` ribbon vertices.
pub fn ribbon_index_count(vertices: usize) -> usize {
    checked_ribbon_index_count(vertices).unwrap_or(usize::MAX)
}

fn checked_ribbon_index_count(vertices: usize) -> Option<usize> {
    let pairs = vertices / 2;
    if pairs < 2 {
        Some(0)
    } else {
        (pairs - 1).checked_mul(INDICES_PER_QUAD)
    }
}

/// Fixed vertex/index capacity and the static index pattern for one trail.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBudget {
    max_points: usize,
    samples_per_segment: usize,
    max_vertices: usize,
    max_indices: usize,
    indices: Vec<u32>,
}

impl GeometryBudget {
    /// Plan the budget for a validated configuration.
    pub fn plan(config: &TrailConfig) -> Result<Self, TrailError> {
        config.validate()?;

        let max_vertices =
            checked_ribbon_vertex_count(config.max_points, config.samples_per_segment)
                .filter(|&vertices| u32::try_from(vertices).is_ok())
                .ok_or_else(|| {
                    TrailError::InvalidConfig(format!(
                        "{} points x {} samples exceed the 32-bit index range",
                        config.max_points, config.samples_per_segment
                    ))
                })?;
        let max_indices = checked_ribbon_index_count(max_vertices).ok_or_else(|| {
            TrailError::InvalidConfig(format!("{max_vertices} vertices need too many indices"))
        })?;

        let mut indices = Vec::new();
        indices
            .try_reserve_exact(max_indices)
            .map_err(|_| TrailError::BufferAllocation {
                vertices: max_vertices,
            })?;
        for pair in 0..(max_vertices / 2).saturating_sub(1) {
            let base = (pair * 2) as u32;
            indices.extend_from_slice(&[
                base,
                base + 2,
                base + 1,
                base + 1,
                base + 2,
                base + 3,
            ]);
        }

        log::debug!(
            "trail budget: {} points x {} samples -> {} vertices, {} indices",
            config.max_points,
            config.samples_per_segment,
            max_vertices,
            max_indices,
        );

        Ok(Self {
            max_points: config.max_points,
            samples_per_segment: config.samples_per_segment,
            max_vertices,
            max_indices,
            indices,
        })
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn samples_per_segment(&self) -> usize {
        self.samples_per_segment
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    /// Static triangle-list pattern over `max_vertices`. A frame with fewer
    /// vertices draws a prefix of it.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}
