//! Branch-and-bound search scenarios.

mod common;

use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use approx::assert_relative_eq;
use common::*;
use vastu_match::{
    CostPyramid, GaussianPrior, Pose2D, QuantizedPointCache, SearchEngine, SearchRequest,
};

#[test]
fn test_bias_corrected_round_trip() {
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let cache = QuantizedPointCache::new(cells_to_scan(&block, (3, -2), 0.5));

    let mut engine = SearchEngine::new();
    engine.add(&cache, &pyramid, SearchRequest::around(0, 0, 8));
    let best = engine.next().expect("search found nothing");

    let mpp = MPP as f64;
    assert_relative_eq!(best.pose.x, 2.5 * mpp, epsilon = 1e-9);
    assert_relative_eq!(best.pose.y, -2.5 * mpp, epsilon = 1e-9);
    assert_eq!(best.pose.theta, 0.0);
    assert_relative_eq!(best.score, 16.0 * 200.0);

    // Applying the reported transform puts every point on its block cell center.
    for (p, &(cx, cy)) in cache.points().iter().zip(&block) {
        let q = best.pose.transform_point(p);
        assert_relative_eq!(q.x as f64 / mpp, cx as f64, epsilon = 1e-3);
        assert_relative_eq!(q.y as f64 / mpp, cy as f64, epsilon = 1e-3);
    }
}

#[test]
fn test_quarter_turn() {
    let cells = l_cells(28, 30);
    let pyramid = CostPyramid::build(model_from_cells(64, &cells, 200), MPP, 5);
    // Points that land on the L once rotated by +90° and shifted by (-4, 5).
    let aligned = cells_to_scan(&cells, (-4, 5), 0.5);
    let cache = QuantizedPointCache::new(rotate(&aligned, -FRAC_PI_2));

    let mut engine = SearchEngine::new();
    engine.add(
        &cache,
        &pyramid,
        SearchRequest::around(0, 0, 8).with_rotation(0.0, FRAC_PI_2, FRAC_PI_4),
    );
    let best = engine.next().expect("search found nothing");

    let mpp = MPP as f64;
    assert_eq!(best.pose.theta, FRAC_PI_2);
    assert_relative_eq!(best.pose.x, -4.5 * mpp, epsilon = 1e-9);
    assert_relative_eq!(best.pose.y, 4.5 * mpp, epsilon = 1e-9);
    assert_relative_eq!(best.score, cells.len() as f64 * 200.0);
}

#[test]
fn test_results_descend_and_bound_holds() {
    let pyramid = CostPyramid::build(random_model(1, 80, 0.15), MPP, 6);
    let cache = QuantizedPointCache::new(random_scan(2, 150, 3.0));
    let prior = GaussianPrior::from_std_devs(Pose2D::new(0.1, -0.05, 0.02), 0.3, 0.1);

    let mut engine = SearchEngine::new();
    engine.add(
        &cache,
        &pyramid,
        SearchRequest::around(2, -1, 20)
            .with_rotation(-0.2, 0.2, 0.05)
            .with_scale(1.0 / 150.0)
            .with_prior(prior),
    );

    let scores: Vec<f64> = engine.by_ref().take(25).map(|r| r.score).collect();
    assert_eq!(scores.len(), 25);
    for pair in scores.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9, "{} after {}", pair[1], pair[0]);
    }

    let stats = engine.stats();
    assert!(stats.nodes_expanded > 0);
    assert_eq!(stats.results_returned, 25);
    assert!(stats.max_bound_excess <= 1e-6, "excess {}", stats.max_bound_excess);
}

#[test]
fn test_level_zero_score_includes_exact_prior() {
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let cache = QuantizedPointCache::new(cells_to_scan(&block, (3, -2), 0.5));
    let prior = GaussianPrior::new(
        [0.05, -0.1, 0.0],
        [[400.0, 50.0, 0.0], [50.0, 300.0, 0.0], [0.0, 0.0, 100.0]],
    );

    let mut engine = SearchEngine::new();
    engine.add(
        &cache,
        &pyramid,
        SearchRequest::around(0, 0, 8).with_prior(prior),
    );
    let best = engine.next().expect("search found nothing");

    assert_relative_eq!(best.score, 3200.0 - prior.penalty(&best.pose), epsilon = 1e-6);
}

#[test]
fn test_prior_breaks_tie_between_twins() {
    // Two identical blocks; the scan fits either one.
    let mut cells = block_cells(20, 30, 4);
    cells.extend(block_cells(36, 30, 4));
    let pyramid = CostPyramid::build(model_from_cells(64, &cells, 200), MPP, 5);
    let scan = cells_to_scan(&block_cells(28, 30, 4), (0, 0), 0.5);
    let cache = QuantizedPointCache::new(scan);

    let mpp = MPP as f64;
    for (target, expect_x) in [(-8, -8.5 * mpp), (8, 7.5 * mpp)] {
        let mean = Pose2D::new((target as f64 - 0.5) * mpp, -0.5 * mpp, 0.0);
        let prior = GaussianPrior::from_std_devs(mean, 0.2, 0.1);

        let mut engine = SearchEngine::new();
        engine.add(
            &cache,
            &pyramid,
            SearchRequest::around(0, 0, 10).with_prior(prior),
        );
        let best = engine.next().expect("search found nothing");
        assert_relative_eq!(best.pose.x, expect_x, epsilon = 1e-9);
        assert_relative_eq!(best.score, 3200.0, epsilon = 1e-9);
    }
}

#[test]
fn test_min_score_prunes_everything() {
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let cache = QuantizedPointCache::new(cells_to_scan(&block, (0, 0), 0.5));

    let mut engine = SearchEngine::new();
    engine.add(
        &cache,
        &pyramid,
        SearchRequest::around(0, 0, 8).with_min_score(3201.0),
    );
    assert!(engine.next().is_none());
    assert!(engine.is_empty());
    assert!(engine.stats().children_pruned > 0);
}

#[test]
fn test_exhaustion_visits_every_translation_once() {
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let cache = QuantizedPointCache::new(cells_to_scan(&block, (1, 1), 0.5));

    let mut engine = SearchEngine::new();
    engine.add(&cache, &pyramid, SearchRequest::around(0, 0, 8));

    let mpp = MPP as f64;
    let mut seen = HashSet::new();
    let mut last = f64::INFINITY;
    while let Some(r) = engine.next() {
        assert!(r.score <= last);
        last = r.score;
        let bx = (r.pose.x / mpp + 0.5).round() as i32;
        let by = (r.pose.y / mpp + 0.5).round() as i32;
        assert!((-8..=8).contains(&bx) && (-8..=8).contains(&by));
        assert!(seen.insert((bx, by)), "block ({}, {}) returned twice", bx, by);
    }
    assert_eq!(seen.len(), 17 * 17);
    assert!(engine.next().is_none());
}

#[test]
fn test_unaligned_window_bounds_every_result() {
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let cache = QuantizedPointCache::new(cells_to_scan(&block, (-2, 3), 0.5));

    let mut engine = SearchEngine::new();
    engine.add(&cache, &pyramid, SearchRequest::new(-9, 7, -9, 7));

    let mpp = MPP as f64;
    let mut count = 0;
    for r in engine.by_ref() {
        let bx = (r.pose.x / mpp + 0.5).round() as i32;
        let by = (r.pose.y / mpp + 0.5).round() as i32;
        assert!((-9..=7).contains(&bx), "x block {} outside window", bx);
        assert!((-9..=7).contains(&by), "y block {} outside window", by);
        count += 1;
    }
    assert_eq!(count, 17 * 17);
}

#[test]
fn test_heading_prior_picks_rotation_and_lowers_score() {
    // A centered square scan matches the block at 0 and at 90 degrees.
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let cache = QuantizedPointCache::new(cells_to_scan(&block, (32, 32), 0.5));
    let request = SearchRequest::around(32, 32, 8).with_rotation(0.0, FRAC_PI_2, FRAC_PI_2);

    let mut plain = SearchEngine::new();
    plain.add(&cache, &pyramid, request.clone());
    let unbiased: Vec<f64> = plain.by_ref().take(2).map(|r| r.score).collect();
    assert_eq!(unbiased, vec![3200.0, 3200.0]);

    // Heading-only prior: no information on translation.
    let prior = GaussianPrior::new(
        [0.0, 0.0, FRAC_PI_2],
        [[0.0; 3], [0.0; 3], [0.0, 0.0, 100.0]],
    );
    let mut engine = SearchEngine::new();
    engine.add(&cache, &pyramid, request.with_prior(prior));

    let best = engine.next().expect("search found nothing");
    assert_eq!(best.pose.theta, FRAC_PI_2);
    assert_relative_eq!(best.score, 3200.0, epsilon = 1e-9);

    let other = engine.next().expect("search found only one match");
    assert_eq!(other.pose.theta, 0.0);
    let penalty = prior.penalty(&other.pose);
    assert_relative_eq!(penalty, 100.0 * FRAC_PI_2 * FRAC_PI_2, epsilon = 1e-9);
    assert_relative_eq!(other.score, 3200.0 - penalty, epsilon = 1e-6);
}

#[test]
fn test_interleaved_handles() {
    let block = block_cells(30, 30, 4);
    let pyramid = CostPyramid::build(model_from_cells(64, &block, 200), MPP, 5);
    let full = QuantizedPointCache::new(cells_to_scan(&block, (2, 2), 0.5));
    // Half the block: best possible score is half as large.
    let half = QuantizedPointCache::new(cells_to_scan(&block[..8], (-3, 1), 0.5));

    let mut engine = SearchEngine::new();
    let weak = engine.add(&half, &pyramid, SearchRequest::around(0, 0, 8));
    let strong = engine.add(&full, &pyramid, SearchRequest::around(0, 0, 8));
    assert_ne!(weak, strong);

    let first = engine.next().expect("search found nothing");
    assert_eq!(first.handle, strong);
    assert_relative_eq!(first.score, 3200.0);

    let from_weak = engine
        .by_ref()
        .find(|r| r.handle == weak)
        .expect("weak handle produced nothing");
    assert_relative_eq!(from_weak.score, 1600.0);
    assert_eq!(engine.handle(weak).rotations(), &[0.0]);
}

#[test]
fn test_undecimated_points_score_the_same() {
    let pyramid = CostPyramid::build(random_model(9, 64, 0.2), MPP, 5);
    let points = random_scan(10, 120, 2.0);
    let merged = QuantizedPointCache::new(points.clone());
    let separate = QuantizedPointCache::without_decimation(points);

    let request = SearchRequest::around(5, 5, 6).with_rotation(-0.1, 0.1, 0.05);
    let mut a = SearchEngine::new();
    a.add(&merged, &pyramid, request.clone());
    let mut b = SearchEngine::new();
    b.add(&separate, &pyramid, request);

    let ra = a.next().expect("merged search found nothing");
    let rb = b.next().expect("separate search found nothing");
    assert_relative_eq!(ra.score, rb.score);
}

#[test]
#[should_panic(expected = "tx1 < tx0")]
fn test_inverted_window_panics() {
    let pyramid = CostPyramid::build(random_model(3, 16, 0.1), MPP, 3);
    let cache = QuantizedPointCache::new(random_scan(4, 10, 0.5));
    let mut engine = SearchEngine::new();
    engine.add(&cache, &pyramid, SearchRequest::new(4, 3, 0, 0));
}

#[test]
#[should_panic(expected = "at least two levels")]
fn test_single_level_pyramid_panics() {
    let pyramid = CostPyramid::build(random_model(3, 16, 0.1), MPP, 1);
    let cache = QuantizedPointCache::new(random_scan(4, 10, 0.5));
    let mut engine = SearchEngine::new();
    engine.add(&cache, &pyramid, SearchRequest::around(0, 0, 4));
}
