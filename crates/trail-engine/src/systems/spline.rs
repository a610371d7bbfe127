//! Catmull-Rom ribbon stitching.
//!
//! The live window of `N` sample pairs is split into segments:
//!
//! ```text
//! N < 2     no segments
//! N = 2, 3  one segment reaching the newest pair
//! N >= 4    N - 3 main segments over points[i..i + 4], then one trailing
//!           segment from points[N - 2] to points[N - 1]
//! ```
//!
//! Each segment is sampled `K` times. Consecutive segments share a boundary
//! sample (t = 1 of one is t = 0 of the next), so every segment after the first
//! skips its first sample. `SegmentSampler` owns that rule.

use glam::Vec3;

use crate::core::budget::ribbon_vertex_count;
use crate::core::window::SamplePointWindow;
use crate::renderer::vertex::RibbonVertex;

/// Uniform Catmull-Rom evaluation. Passes through `p1` at `t = 0` and `p2` at `t = 1`.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Spline parameter for sample `local` of `samples`. A single sample sits at t = 0.
pub fn sample_param(local: usize, samples: usize) -> f32 {
    if samples <= 1 {
        0.0
    } else {
        local as f32 / (samples - 1) as f32
    }
}

/// Number of spline segments stitched for `points` retained pairs.
pub fn segment_count(points: usize) -> usize {
    match points {
        0 | 1 => 0,
        2 | 3 => 1,
        n => n - 2,
    }
}

/// One emitted sample of the ribbon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSample {
    /// Segment the sample belongs to. The last segment is the trailing one.
    pub segment: usize,
    /// Sample index within the segment (0..K).
    pub local: usize,
    /// Buffer index of the low vertex; the high vertex follows it.
    pub vertex: usize,
    /// Spline parameter.
    pub t: f32,
}

/// Walks every sample of every segment, skipping the shared boundary sample
/// at the start of each segment after the first.
#[derive(Debug, Clone)]
pub struct SegmentSampler {
    segments: usize,
    samples: usize,
    segment: usize,
    local: usize,
    emitted: usize,
}

impl SegmentSampler {
    pub fn new(points: usize, samples: usize) -> Self {
        Self {
            segments: segment_count(points),
            samples,
            segment: 0,
            local: 0,
            emitted: 0,
        }
    }
}

impl Iterator for SegmentSampler {
    type Item = SegmentSample;

    fn next(&mut self) -> Option<SegmentSample> {
        loop {
            if self.segment >= self.segments {
                return None;
            }
            if self.local >= self.samples {
                self.segment += 1;
                self.local = 0;
                continue;
            }

            let local = self.local;
            self.local += 1;
            if self.segment > 0 && local == 0 {
                continue;
            }

            let sample = SegmentSample {
                segment: self.segment,
                local,
                vertex: self.emitted * 2,
                t: sample_param(local, self.samples),
            };
            self.emitted += 1;
            return Some(sample);
        }
    }
}

/// Control points for one segment, for both edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentControls {
    pub low: [Vec3; 4],
    pub high: [Vec3; 4],
}

impl SegmentControls {
    /// Controls for `segment` of the window. Requires at least two points.
    pub fn for_segment(window: &SamplePointWindow, segment: usize) -> Self {
        let n = window.len();
        debug_assert!(n >= 2, "segments need at least two points");

        if n >= 4 && segment < n - 3 {
            let [a, b, c, d] = [
                window[segment],
                window[segment + 1],
                window[segment + 2],
                window[segment + 3],
            ];
            return Self {
                low: [a.low, b.low, c.low, d.low],
                high: [a.high, b.high, c.high, d.high],
            };
        }

        // Trailing segment: P1 -> P2 is the newest span.
        let p1 = window[n - 2];
        let p2 = window[n - 1];
        if n == 2 {
            // Straight segment: both outer controls collapse onto the ends.
            Self {
                low: [p1.low, p1.low, p2.low, p2.low],
                high: [p1.high, p1.high, p2.high, p2.high],
            }
        } else {
            let p0 = window[n - 3];
            Self {
                low: [p0.low, p1.low, p2.low, extrapolate(p1.low, p2.low)],
                high: [p0.high, p1.high, p2.high, extrapolate(p1.high, p2.high)],
            }
        }
    }

    /// Interpolated low and high positions at `t`.
    pub fn evaluate(&self, t: f32) -> (Vec3, Vec3) {
        let [l0, l1, l2, l3] = self.low;
        let [h0, h1, h2, h3] = self.high;
        (
            catmull_rom(l0, l1, l2, l3, t),
            catmull_rom(h0, h1, h2, h3, t),
        )
    }
}

/// Mirror `prev` through `last` to stand in for a missing fourth control point.
fn extrapolate(prev: Vec3, last: Vec3) -> Vec3 {
    last + (last - prev)
}

/// Rebuilds the whole ribbon from the current window every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplineStitcher {
    samples_per_segment: usize,
}

impl SplineStitcher {
    pub fn new(samples_per_segment: usize) -> Self {
        Self {
            samples_per_segment,
        }
    }

    pub fn samples_per_segment(&self) -> usize {
        self.samples_per_segment
    }

    /// Vertices produced for `points` retained pairs.
    pub fn vertex_count(&self, points: usize) -> usize {
        ribbon_vertex_count(points, self.samples_per_segment)
    }

    /// Emit every ribbon vertex as `(buffer_index, vertex)`, low before high.
    /// Returns the number of vertices emitted.
    pub fn stitch(
        &self,
        window: &SamplePointWindow,
        mut emit: impl FnMut(usize, RibbonVertex),
    ) -> usize {
        let count = self.vertex_count(window.len());
        if count == 0 {
            return 0;
        }
        let last = (count - 1) as f32;

        let mut current: Option<(usize, SegmentControls)> = None;
        let mut written = 0;
        for sample in SegmentSampler::new(window.len(), self.samples_per_segment) {
            let controls = match current {
                Some((segment, controls)) if segment == sample.segment => controls,
                _ => {
                    let controls = SegmentControls::for_segment(window, sample.segment);
                    current = Some((sample.segment, controls));
                    controls
                }
            };

            let (low, high) = controls.evaluate(sample.t);
            let v = sample.vertex as f32 / last;
            emit(sample.vertex, RibbonVertex::low(low, v));
            emit(sample.vertex + 1, RibbonVertex::high(high, v));
            written = sample.vertex + 2;
        }

        debug_assert_eq!(written, count);
        written
    }

    /// Convenience for callers that want an owned vertex list.
    pub fn stitch_to_vec(&self, window: &SamplePointWindow) -> Vec<RibbonVertex> {
        let mut out = vec![RibbonVertex::default(); self.vertex_count(window.len())];
        self.stitch(window, |index, vertex| out[index] = vertex);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::SamplePair;

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, EPS)
    }

    fn window_of(points: &[f32]) -> SamplePointWindow {
        let mut window = SamplePointWindow::new(points.len()).unwrap();
        for (i, &y) in points.iter().enumerate() {
            let x = i as f32 * 10.0;
            window.push(SamplePair::new(Vec3::new(x, y, 0.0), Vec3::new(x, y + 5.0, 0.0)));
        }
        window
    }

    #[test]
    fn catmull_rom_hits_interior_points() {
        let p = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0), Vec3::new(3.0, 0.0, 0.0)];
        assert!(approx(catmull_rom(p[0], p[1], p[2], p[3], 0.0), p[1]));
        assert!(approx(catmull_rom(p[0], p[1], p[2], p[3], 1.0), p[2]));
    }

    #[test]
    fn single_sample_forces_t_zero() {
        assert_eq!(sample_param(0, 1), 0.0);
        assert_eq!(sample_param(2, 5), 0.5);
        assert_eq!(sample_param(4, 5), 1.0);
    }

    #[test]
    fn sampler_skips_shared_boundaries() {
        let samples: Vec<(usize, usize, usize)> = SegmentSampler::new(5, 3)
            .map(|s| (s.segment, s.local, s.vertex))
            .collect();
        assert_eq!(
            samples,
            vec![
                (0, 0, 0),
                (0, 1, 2),
                (0, 2, 4),
                (1, 1, 6),
                (1, 2, 8),
                (2, 1, 10),
                (2, 2, 12),
            ]
        );
    }

    #[test]
    fn sampler_is_empty_below_two_points() {
        assert_eq!(SegmentSampler::new(0, 4).count(), 0);
        assert_eq!(SegmentSampler::new(1, 4).count(), 0);
    }

    #[test]
    fn fewer_than_two_points_emits_nothing() {
        let stitcher = SplineStitcher::new(4);
        assert!(stitcher.stitch_to_vec(&window_of(&[])).is_empty());
        assert!(stitcher.stitch_to_vec(&window_of(&[1.0])).is_empty());
    }

    #[test]
    fn two_points_is_straight_line() {
        let stitcher = SplineStitcher::new(4);
        let window = window_of(&[0.0, 3.0]);
        let verts = stitcher.stitch_to_vec(&window);
        assert_eq!(verts.len(), 8);

        let (a, b) = (window[0], window[1]);
        assert!(approx(verts[0].position(), a.low));
        assert!(approx(verts[1].position(), a.high));
        assert!(approx(verts[6].position(), b.low));
        assert!(approx(verts[7].position(), b.high));

        for pair in verts.chunks(2) {
            for (vertex, (start, end)) in pair.iter().zip([(a.low, b.low), (a.high, b.high)]) {
                let along = (end - start).normalize();
                let offset = vertex.position() - start;
                assert!(offset.cross(along).length() < EPS, "off the line: {:?}", vertex);
            }
        }
    }

    #[test]
    fn three_points_is_one_segment_from_middle_to_newest() {
        let stitcher = SplineStitcher::new(4);
        let window = window_of(&[0.0, 4.0, 1.0]);
        let verts = stitcher.stitch_to_vec(&window);
        assert_eq!(verts.len(), 8);
        assert!(approx(verts[0].position(), window[1].low));
        assert!(approx(verts[7].position(), window[2].high));
    }

    #[test]
    fn three_points_trailing_segment_starts_at_zero() {
        let window = window_of(&[0.0, 4.0, 1.0]);
        let controls = SegmentControls::for_segment(&window, 0);
        assert_eq!(controls.low[0], window[0].low);
        assert_eq!(controls.low[3], window[2].low + (window[2].low - window[1].low));
        let locals: Vec<usize> = SegmentSampler::new(3, 4).map(|s| s.local).collect();
        assert_eq!(locals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn five_points_four_samples_gives_twenty_vertices() {
        let stitcher = SplineStitcher::new(4);
        let window = window_of(&[0.0, 2.0, -1.0, 3.0, 0.5]);
        let verts = stitcher.stitch_to_vec(&window);
        assert_eq!(verts.len(), 20);
        assert!(approx(verts[0].position(), window[1].low));
        assert!(approx(verts[19].position(), window[4].high));
    }

    #[test]
    fn segment_boundaries_are_not_duplicated() {
        let stitcher = SplineStitcher::new(4);
        let window = window_of(&[0.0, 2.0, -1.0, 3.0, 0.5, 1.0]);
        let verts = stitcher.stitch_to_vec(&window);
        let lows: Vec<Vec3> = verts.iter().step_by(2).map(|v| v.position()).collect();
        for w in lows.windows(2) {
            assert!(!approx(w[0], w[1]), "duplicate sample at {:?}", w[0]);
        }
        // every interior window point appears exactly once
        for i in 1..window.len() {
            let hits = lows.iter().filter(|p| approx(**p, window[i].low)).count();
            assert_eq!(hits, 1, "point {i}");
        }
    }

    #[test]
    fn single_sample_per_segment() {
        let stitcher = SplineStitcher::new(1);
        for n in 2..7 {
            let points: Vec<f32> = (0..n).map(|i| i as f32).collect();
            let window = window_of(&points);
            let verts = stitcher.stitch_to_vec(&window);
            assert_eq!(verts.len(), 2, "n={n}");
            assert!(verts.iter().all(|v| v.position().is_finite()));
        }
    }

    #[test]
    fn v_is_monotonic_within_unit_range() {
        let stitcher = SplineStitcher::new(5);
        let window = window_of(&[0.0, 1.0, 0.0, -1.0, 0.0, 2.0, 1.0]);
        let verts = stitcher.stitch_to_vec(&window);
        assert_eq!(verts[0].v(), 0.0);
        for w in verts.windows(2) {
            assert!(w[1].v() >= w[0].v());
        }
        assert!(verts.iter().all(|v| (0.0..=1.0).contains(&v.v())));
        for pair in verts.chunks(2) {
            assert_eq!(pair[0].u(), 0.0);
            assert_eq!(pair[1].u(), 1.0);
            assert_eq!(pair[0].v(), pair[1].v());
        }
    }

    #[test]
    fn count_matches_budget_formula() {
        for samples in 1..6 {
            let stitcher = SplineStitcher::new(samples);
            for n in 0..12 {
                let points: Vec<f32> = (0..n).map(|i| (i % 3) as f32).collect();
                let window = window_of(&points);
                let mut emitted = 0;
                let count = stitcher.stitch(&window, |_, _| emitted += 1);
                assert_eq!(count, emitted);
                assert_eq!(count, ribbon_vertex_count(n, samples));
            }
        }
    }
}
