//! Lazily populated cache of quantized point sets.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use crate::core::Point2D;

use super::set::QuantizedPointSet;

/// Cache key with rotation and resolution quantized to integers, so that
/// rotations computed by different arithmetic paths hit the same entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointSetKey {
    /// Pyramid level
    pub level: usize,
    /// Rotation in nanoradians
    pub rotation_nrad: i64,
    /// Resolution in nanometers per pixel
    pub resolution_nm: i64,
}

impl PointSetKey {
    /// Quantize a (resolution, rotation, level) query.
    pub fn new(meters_per_pixel: f32, rotation: f64, level: usize) -> Self {
        Self {
            level,
            rotation_nrad: (rotation * 1e9).round() as i64,
            resolution_nm: (meters_per_pixel as f64 * 1e9).round() as i64,
        }
    }
}

/// An observed scan plus its quantized groupings.
///
/// Lookups take `&self`; groupings are built on first request and shared
/// through `Rc`, so a set handed out stays valid after [`clear`](Self::clear).
#[derive(Debug)]
pub struct QuantizedPointCache {
    points: Vec<Point2D>,
    merge: bool,
    sets: RefCell<HashMap<PointSetKey, Rc<QuantizedPointSet>>>,
}

impl QuantizedPointCache {
    /// Take ownership of a scan. Points falling in the same cell are merged.
    pub fn new(points: Vec<Point2D>) -> Self {
        Self {
            points,
            merge: true,
            sets: RefCell::new(HashMap::new()),
        }
    }

    /// Take ownership of a scan without merging: every point becomes its own
    /// weight-1 entry. Scores are unchanged; only the evaluation cost grows.
    pub fn without_decimation(points: Vec<Point2D>) -> Self {
        Self {
            merge: false,
            ..Self::new(points)
        }
    }

    /// Point set for the given resolution, rotation and pyramid level.
    pub fn get(&self, meters_per_pixel: f32, rotation: f64, level: usize) -> Rc<QuantizedPointSet> {
        let key = PointSetKey::new(meters_per_pixel, rotation, level);
        if let Some(set) = self.sets.borrow().get(&key) {
            return Rc::clone(set);
        }

        let set = Rc::new(QuantizedPointSet::quantize(
            &self.points,
            meters_per_pixel,
            rotation,
            level,
            self.merge,
        ));
        trace!(
            "[PointCache] level {} rot {:.4}: {} points -> {} cells",
            level,
            rotation,
            self.points.len(),
            set.len()
        );
        self.sets.borrow_mut().insert(key, Rc::clone(&set));
        set
    }

    /// Drop every cached grouping. The scan itself is kept.
    pub fn clear(&self) {
        self.sets.borrow_mut().clear();
    }

    /// The original scan.
    #[inline]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Number of points in the scan.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for an empty scan.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of groupings currently cached.
    pub fn cached_sets(&self) -> usize {
        self.sets.borrow().len()
    }
}
