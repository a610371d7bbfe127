use std::collections::VecDeque;

use glam::Vec3;

use crate::api::error::TrailError;

/// Low and high edge positions captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePair {
    pub low: Vec3,
    pub high: Vec3,
}

impl SamplePair {
    pub fn new(low: Vec3, high: Vec3) -> Self {
        Self { low, high }
    }
}

/// Bounded, insertion-ordered history of sample pairs.
/// The oldest pair is evicted whenever the window grows past `max_points`.
#[derive(Debug, Clone)]
pub struct SamplePointWindow {
    points: VecDeque<SamplePair>,
    max_points: usize,
}

impl SamplePointWindow {
    /// Create an empty window. Storage for `max_points + 1` pairs is reserved
    /// up front so pushes never reallocate.
    pub fn new(max_points: usize) -> Result<Self, TrailError> {
        let slots = max_points
            .checked_add(1)
            .ok_or(TrailError::WindowAllocation { points: max_points })?;
        let mut points = VecDeque::new();
        points
            .try_reserve_exact(slots)
            .map_err(|_| TrailError::WindowAllocation { points: max_points })?;
        Ok(Self { points, max_points })
    }

    /// Append a pair, then evict from the front until the capacity holds.
    /// Returns the number of evicted pairs.
    pub fn push(&mut self, pair: SamplePair) -> usize {
        self.points.push_back(pair);
        self.evict_overflow()
    }

    /// Change the capacity. Shrinking evicts the oldest pairs immediately.
    /// Growing past the capacity reserved in `new` reallocates on later pushes.
    /// Returns the number of evicted pairs.
    pub fn set_max_points(&mut self, max_points: usize) -> usize {
        self.max_points = max_points;
        self.evict_overflow()
    }

    fn evict_overflow(&mut self) -> usize {
        let mut evicted = 0;
        while self.points.len() > self.max_points {
            self.points.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Pair at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&SamplePair> {
        self.points.get(index)
    }

    /// Most recently admitted pair.
    pub fn newest(&self) -> Option<&SamplePair> {
        self.points.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &SamplePair> {
        self.points.iter()
    }
}

impl std::ops::Index<usize> for SamplePointWindow {
    type Output = SamplePair;

    fn index(&self, index: usize) -> &SamplePair {
        &self.points[index]
    }
}
