//! Test utilities for vastu-match.
//!
//! Synthetic models and scans. Cell lists are absolute model pixels; scans
//! are built so that the transform needed to line them up is known exactly.

#![allow(dead_code)]

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vastu_match::{CostGrid, Point2D};

/// Resolution used by the synthetic scenarios.
pub const MPP: f32 = 0.05;

/// Square block of `size` cells with its corner at (x, y).
pub fn block_cells(x: i32, y: i32, size: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    for dy in 0..size {
        for dx in 0..size {
            cells.push((x + dx, y + dy));
        }
    }
    cells
}

/// Asymmetric L: a long arm along +x and a short arm along +y.
pub fn l_cells(x: i32, y: i32) -> Vec<(i32, i32)> {
    let mut cells: Vec<(i32, i32)> = (0..7).map(|i| (x + i, y)).collect();
    cells.extend((1..4).map(|i| (x, y + i)));
    cells
}

/// Perimeter of a `w x h` rectangle with its corner at (x, y).
pub fn room_cells(x: i32, y: i32, w: i32, h: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    for i in 0..w {
        cells.push((x + i, y));
        cells.push((x + i, y + h - 1));
    }
    for j in 1..h - 1 {
        cells.push((x, y + j));
        cells.push((x + w - 1, y + j));
    }
    cells
}

/// `size x size` model at origin (0, 0) with `value` on the given cells.
pub fn model_from_cells(size: usize, cells: &[(i32, i32)], value: u8) -> CostGrid {
    let lit: HashSet<(i32, i32)> = cells.iter().copied().collect();
    CostGrid::from_fn(size, size, 0, 0, |x, y| {
        if lit.contains(&(x as i32, y as i32)) { value } else { 0 }
    })
}

/// Model whose cost falls off linearly with distance (in cells) from the
/// nearest listed cell, so refiners have a slope to follow.
pub fn blurred_model(size: usize, cells: &[(i32, i32)], falloff: f64) -> CostGrid {
    CostGrid::from_fn(size, size, 0, 0, |x, y| {
        let d = cells
            .iter()
            .map(|&(cx, cy)| ((cx - x as i32) as f64).hypot((cy - y as i32) as f64))
            .fold(f64::INFINITY, f64::min);
        (255.0 - falloff * d).max(0.0) as u8
    })
}

/// Scan whose points, after a shift of `(sx, sy)` pixels and the search's
/// -0.5 cell correction, sit exactly on the given model cells.
///
/// `frac` is the sub-cell position of each point before the shift; 0.5 puts
/// it in the middle of a quantization cell.
pub fn cells_to_scan(cells: &[(i32, i32)], shift: (i32, i32), frac: f64) -> Vec<Point2D> {
    cells
        .iter()
        .map(|&(x, y)| {
            let px = (x - shift.0) as f64 + frac;
            let py = (y - shift.1) as f64 + frac;
            Point2D::new((px * MPP as f64) as f32, (py * MPP as f64) as f32)
        })
        .collect()
}

/// Rotate every point about the origin.
pub fn rotate(points: &[Point2D], theta: f64) -> Vec<Point2D> {
    let (s, c) = theta.sin_cos();
    points
        .iter()
        .map(|p| {
            let (x, y) = (p.x as f64, p.y as f64);
            Point2D::new((c * x - s * y) as f32, (s * x + c * y) as f32)
        })
        .collect()
}

/// Sparse random model with values 1..=255 on roughly `density` of cells.
pub fn random_model(seed: u64, size: usize, density: f64) -> CostGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    CostGrid::from_fn(size, size, 0, 0, |_, _| {
        if rng.random_bool(density) {
            rng.random_range(1..=255)
        } else {
            0
        }
    })
}

/// Random points inside `[0, extent)²` meters.
pub fn random_scan(seed: u64, n: usize, extent: f32) -> Vec<Point2D> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point2D::new(rng.random_range(0.0..extent), rng.random_range(0.0..extent)))
        .collect()
}
