use zooming::{ScoringMethod, Zooming};

use crate::{bernoulli_bandit, disc_reward, play, unit_square};

fn wavy(x: &[f64]) -> f64 {
    (6.0 * x[0]).sin() * (4.0 * x[1]).cos()
}

#[test]
fn test_pulls_sum_to_time() {
    let mut bandit = unit_square().nu(2.0).rho(0.7).min_pulls_before_zoom(2).build().unwrap();
    for t in 0..300 {
        let x = bandit.pull(t).unwrap();
        assert!(x.iter().all(|v| (0.0..=1.0).contains(v)), "{x:?} left the domain");
        bandit.receive_reward(t, wavy(&x)).unwrap();
        assert_eq!(bandit.total_pulls(), bandit.time());
    }
    assert_eq!(bandit.time(), 300);
}

#[test]
fn test_points_stay_inside_their_cells() {
    let mut bandit = bernoulli_bandit();
    for t in 0..250 {
        let x = bandit.pull(t).unwrap();
        bandit.receive_reward(t, disc_reward(&x, 0.25)).unwrap();
        for view in bandit.active_points() {
            assert!(
                bandit.partition().contains(view.cell, view.coords),
                "{:?} escaped {:?}",
                view.coords,
                view.bounds
            );
            assert!(bandit.partition().cell(view.cell).is_leaf());
        }
    }
}

#[test]
fn test_active_cells_are_disjoint() {
    let mut bandit = unit_square().nu(4.0).rho(0.6).min_pulls_before_zoom(1).build().unwrap();
    play(&mut bandit, 0..200, wavy);

    let cells: Vec<_> = bandit.active_points().map(|v| v.cell).collect();
    let mut sorted = cells.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), cells.len());

    let volume: f64 = bandit
        .active_points()
        .map(|v| v.bounds.iter().map(|(lo, hi)| hi - lo).product::<f64>())
        .sum();
    assert!(volume <= 1.0 + 1e-12);
}

#[test]
fn test_phase_schedule() {
    let mut bandit = unit_square().build().unwrap();
    let mut boundaries = Vec::new();
    let mut phase = bandit.phase();
    for t in 0..130 {
        let x = bandit.pull(t).unwrap();
        bandit.receive_reward(t, x[0]).unwrap();
        assert!(bandit.phase() >= phase);
        if bandit.phase() > phase {
            boundaries.push(bandit.time());
            phase = bandit.phase();
        }
        assert!(bandit.next_phase_boundary() > bandit.time());
    }
    assert_eq!(boundaries, vec![2, 6, 14, 30, 62, 126]);
    assert_eq!(bandit.phase(), 7);
}

#[test]
fn test_partition_only_deepens() {
    let mut bandit = unit_square().nu(4.0).rho(0.6).min_pulls_before_zoom(1).build().unwrap();
    let mut depth = bandit.max_depth();
    let mut points = bandit.n_active_points();
    for t in 0..200 {
        let x = bandit.pull(t).unwrap();
        bandit.receive_reward(t, wavy(&x)).unwrap();
        assert!(bandit.max_depth() >= depth);
        assert!(bandit.n_active_points() >= points);
        depth = bandit.max_depth();
        points = bandit.n_active_points();
    }
}

#[test]
fn test_seeded_runs_replay_exactly() {
    let run = |seed| {
        let mut bandit = unit_square()
            .scoring_method(ScoringMethod::Thompson)
            .seed(seed)
            .build()
            .unwrap();
        let mut pulls = Vec::new();
        for t in 0..120 {
            let x = bandit.pull(t).unwrap();
            bandit.receive_reward(t, wavy(&x)).unwrap();
            pulls.push(x);
        }
        (pulls, bandit.snapshot())
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn test_deterministic_methods_ignore_seed() {
    for method in [ScoringMethod::Ucb, ScoringMethod::TunedUcb, ScoringMethod::Zooming] {
        let run = |seed| {
            let mut bandit = Zooming::builder()
                .domain([(0.0, 1.0)])
                .scoring_method(method)
                .seed(seed)
                .build()
                .unwrap();
            play(&mut bandit, 0..80, |x| 1.0 - (x[0] - 0.3).abs());
            bandit.snapshot()
        };
        assert_eq!(run(1), run(2), "{method}");
    }
}

#[test]
fn test_radius_shrinks_within_phase() {
    let mut bandit = unit_square().build().unwrap();
    play(&mut bandit, 0..20, wavy);
    let mut previous = f64::INFINITY;
    for pulls in 0..100 {
        let r = bandit.confidence_radius(pulls);
        assert!(r < previous);
        previous = r;
    }
    assert!(bandit.confidence_radius(0) > bandit.zoom_threshold(1));
}

#[test]
fn test_lock_in_is_sticky() {
    let mut bandit = bernoulli_bandit();
    play(&mut bandit, 0..200, |x| disc_reward(x, 0.25));
    let first = bandit.locked_in_step().unwrap();
    play(&mut bandit, 200..400, |x| disc_reward(x, 0.25));
    assert_eq!(bandit.locked_in_step(), Some(first));
}
