use glam::{IVec3, Vec3};
use rayon::prelude::*;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Clone, Debug)]
/// Uniform 3D grid bucketing point indices by cell, for neighbor queries.
///
/// Stores indices in the "offset array" layout (like compressed sparse rows):
/// `entity_indices[cell_ranges[cell]]` lists every entry whose position fell in
/// `cell`. Cells are keyed by integer coordinates rather than a bounded grid
/// because the swim box moves and has no fixed extent.
///
/// The index has no insert or remove operation. [`SpatialHash::rebuild`] is the
/// only mutation, and callers decide how often to run it (see [`RebuildClock`]).
///
/// # Performance Characteristics
/// - Neighbor query: 27 hash lookups + O(entries in those cells)
/// - Rebuild: O(n), cell keys computed with Rayon
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use shoal_core::spatial_hash::SpatialHash;
///
/// let mut index = SpatialHash::new(1.5);
/// index.rebuild(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)]);
///
/// let mut nearby = Vec::new();
/// index.neighbors_into(Vec3::ZERO, &mut nearby);
/// assert_eq!(nearby.len(), 2);
/// ```
pub struct SpatialHash {
    pub cell_size: f32,
    pub cell_ranges: HashMap<IVec3, Range<usize>>,
    pub entity_indices: Vec<usize>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SpatialHash {
    /// Creates an empty index. Non-positive or non-finite sizes fall back to 1.0.
    ///
    /// Size the cells to the separation radius: anything within that radius of
    /// a query point is then guaranteed to be in the 3×3×3 block around it.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            cell_ranges: HashMap::new(),
            entity_indices: Vec::new(),
        }
    }

    /// Computes the grid cell for a world position.
    ///
    /// Returns `None` for non-finite coordinates and for coordinates whose cell
    /// (or a neighbor of it) would overflow `i32`.
    #[inline]
    #[must_use]
    pub fn cell_of(&self, p: Vec3) -> Option<IVec3> {
        if !p.is_finite() {
            return None;
        }
        let scaled = (p / self.cell_size).floor();
        let limit = (i32::MAX - 1) as f32;
        if scaled.abs().max_element() >= limit {
            return None;
        }
        Some(scaled.as_ivec3())
    }

    /// Clears the index and re-buckets every position. The entry for
    /// `positions[i]` is reported as `i` by queries.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        let keys: Vec<Option<IVec3>> = positions.par_iter().map(|&p| self.cell_of(p)).collect();

        let mut counts: HashMap<IVec3, usize> = HashMap::with_capacity(self.cell_ranges.len());
        for key in keys.iter().flatten() {
            *counts.entry(*key).or_insert(0) += 1;
        }

        self.cell_ranges.clear();
        let mut total = 0;
        for (key, count) in counts {
            self.cell_ranges.insert(key, total..total + count);
            total += count;
        }

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);
        let mut cursors: HashMap<IVec3, usize> = self
            .cell_ranges
            .iter()
            .map(|(key, range)| (*key, range.start))
            .collect();

        for (entity_idx, key) in keys.iter().enumerate() {
            if let Some(key) = key {
                if let Some(cursor) = cursors.get_mut(key) {
                    self.entity_indices[*cursor] = entity_idx;
                    *cursor += 1;
                }
            }
        }
    }

    /// Writes into `result` every entry in the 27 cells around `p`.
    ///
    /// Entries farther than one cell size away may be included; callers filter
    /// by exact distance.
    #[inline]
    pub fn neighbors_into(&self, p: Vec3, result: &mut Vec<usize>) {
        result.clear();
        self.for_each_neighbor_cell(p, |range| {
            result.extend_from_slice(&self.entity_indices[range]);
        });
    }

    #[must_use]
    pub fn neighbors(&self, p: Vec3) -> Vec<usize> {
        let mut result = Vec::new();
        self.neighbors_into(p, &mut result);
        result
    }

    #[must_use]
    pub fn count_nearby(&self, p: Vec3) -> usize {
        let mut count = 0;
        self.for_each_neighbor_cell(p, |range| count += range.len());
        count
    }

    fn for_each_neighbor_cell<F>(&self, p: Vec3, mut visit: F)
    where
        F: FnMut(Range<usize>),
    {
        let Some(center) = self.cell_of(p) else {
            return;
        };
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(range) = self.cell_ranges.get(&(center + IVec3::new(dx, dy, dz))) {
                        visit(range.clone());
                    }
                }
            }
        }
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entity_indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_indices.is_empty()
    }

    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cell_ranges.len()
    }
}

/// Fixed-rate throttle for index rebuilds, driven by simulated time rather
/// than by how often frames arrive.
#[derive(Clone, Debug)]
pub struct RebuildClock {
    interval: f32,
    elapsed: f32,
}

impl RebuildClock {
    #[must_use]
    pub fn new(rate_hz: f32) -> Self {
        let interval = if rate_hz.is_finite() && rate_hz > 0.0 {
            1.0 / rate_hz
        } else {
            0.0
        };
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advances the clock; true when a rebuild is due. A long frame triggers
    /// one rebuild, not a backlog of them.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            if self.elapsed >= self.interval {
                self.elapsed = 0.0;
            }
            true
        } else {
            false
        }
    }

    /// Restarts the interval after an out-of-band rebuild.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    #[must_use]
    pub fn interval(&self) -> f32 {
        self.interval
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_query_finds_nearby_across_cell_boundary() {
        let mut sh = SpatialHash::new(1.0);
        sh.rebuild(&[
            Vec3::new(0.9, 0.5, 0.5),
            Vec3::new(1.1, 0.5, 0.5),
            Vec3::new(5.0, 5.0, 5.0),
        ]);
        let mut found = sh.neighbors(Vec3::new(0.9, 0.5, 0.5));
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_query_block_is_one_cell_radius() {
        let mut sh = SpatialHash::new(1.0);
        sh.rebuild(&[Vec3::new(2.5, 0.5, 0.5), Vec3::new(1.5, -0.5, 1.5)]);
        // Query cell (0,0,0): entry 0 lives in cell (2,0,0), entry 1 in (1,-1,1).
        assert_eq!(sh.neighbors(Vec3::new(0.5, 0.5, 0.5)), vec![1]);
        assert_eq!(sh.count_nearby(Vec3::new(0.5, 0.5, 0.5)), 1);
    }

    #[test]
    fn test_negative_coordinates_floor() {
        let sh = SpatialHash::new(1.0);
        assert_eq!(sh.cell_of(Vec3::new(-0.1, 0.0, 0.0)), Some(IVec3::new(-1, 0, 0)));
        assert_eq!(sh.cell_of(Vec3::new(0.1, -2.0, 3.9)), Some(IVec3::new(0, -2, 3)));
    }

    #[test]
    fn test_rebuild_clears_previous_contents() {
        let mut sh = SpatialHash::new(1.0);
        sh.rebuild(&[Vec3::ZERO]);
        assert_eq!(sh.len(), 1);
        sh.rebuild(&[]);
        assert!(sh.is_empty());
        assert!(sh.neighbors(Vec3::ZERO).is_empty());
    }

    #[test]
    fn test_non_finite_positions_are_skipped() {
        let mut sh = SpatialHash::new(1.0);
        sh.rebuild(&[Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO]);
        assert_eq!(sh.len(), 1);
        assert_eq!(sh.neighbors(Vec3::ZERO), vec![1]);
    }

    #[test]
    fn test_invalid_cell_size_falls_back() {
        assert_eq!(SpatialHash::new(0.0).cell_size, 1.0);
        assert_eq!(SpatialHash::new(f32::NAN).cell_size, 1.0);
    }

    #[test]
    fn test_clock_runs_at_configured_rate() {
        let mut clock = RebuildClock::new(30.0);
        let fired = (0..60).filter(|_| clock.tick(1.0 / 60.0)).count();
        assert!((29..=31).contains(&fired), "fired {fired} times");
    }

    #[test]
    fn test_clock_long_frame_fires_once() {
        let mut clock = RebuildClock::new(30.0);
        assert!(clock.tick(1.0));
        assert!(!clock.tick(0.001));
    }
}
