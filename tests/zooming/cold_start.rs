use zooming::{ScoringMethod, Zooming};

use crate::unit_square;

#[test]
fn test_first_pull_is_last_created_center() {
    // All UCB scores tie at t = 0, so the most recently created point wins.
    let mut bandit = unit_square().build().unwrap();
    assert_eq!(bandit.pull(0).unwrap(), vec![0.75, 0.75]);
}

#[test]
fn test_depth_one_layer_tiles_domain() {
    let bandit = Zooming::new(vec![(-1.0, 1.0), (0.0, 4.0), (10.0, 12.0)]).unwrap();
    assert_eq!(bandit.n_active_points(), 8);
    assert_eq!(bandit.max_depth(), 1);
    assert_eq!(bandit.time(), 0);
    assert_eq!(bandit.phase(), 1);
    assert_eq!(bandit.next_phase_boundary(), 2);
    assert_eq!(bandit.locked_in_step(), None);

    let volume: f64 = bandit
        .active_points()
        .map(|v| v.bounds.iter().map(|(lo, hi)| hi - lo).product::<f64>())
        .sum();
    assert!((volume - 16.0).abs() < 1e-12);
}

#[test]
fn test_unpulled_points_are_tried_before_repeats() {
    let mut bandit = unit_square().build().unwrap();
    let mut seen = Vec::new();
    for t in 0..4 {
        let x = bandit.pull(t).unwrap();
        assert!(!seen.contains(&x), "{x:?} pulled twice during warm-up");
        seen.push(x);
        bandit.receive_reward(t, 0.5).unwrap();
    }
    assert!(bandit.active_points().all(|v| v.stats.pulls == 1));
}

#[test]
fn test_every_scoring_method_runs() {
    for method in [
        ScoringMethod::Ucb,
        ScoringMethod::TunedUcb,
        ScoringMethod::Thompson,
        ScoringMethod::Zooming,
    ] {
        let mut bandit = unit_square().scoring_method(method).seed(9).build().unwrap();
        for t in 0..50 {
            let x = bandit.pull(t).unwrap();
            bandit.receive_reward(t, x[0] * x[1]).unwrap();
        }
        assert_eq!(bandit.total_pulls(), 50, "{method}");
    }
}
