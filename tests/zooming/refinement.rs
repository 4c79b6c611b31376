use zooming::partition::BinarySplit;
use zooming::{Error, ZoomEvent, Zooming};

use crate::unit_square;

#[test]
fn test_refined_point_keeps_statistics() {
    let mut bandit = unit_square().nu(10.0).min_pulls_before_zoom(0).build().unwrap();
    let x = bandit.pull(0).unwrap();
    let before = bandit.n_active_points();

    let event = bandit.receive_reward(0, 0.4).unwrap();
    let ZoomEvent::Refined { new_points, depth, .. } = event else {
        panic!("expected a refinement, got {event:?}");
    };
    assert_eq!(depth, 2);
    assert_eq!(bandit.n_active_points(), before + new_points.len());

    let carried = bandit.find(&x).unwrap();
    assert_eq!(carried.stats.pulls, 1);
    assert!((carried.mean - 0.4).abs() < 1e-12);
    assert_eq!(carried.depth, 2);

    for id in new_points {
        let view = bandit.active_points().find(|v| v.id == id).unwrap();
        assert_eq!(view.stats.pulls, 0);
        assert_eq!(view.depth, 2);
    }
}

#[test]
fn test_new_points_sit_at_child_centers() {
    let mut bandit = unit_square().nu(10.0).min_pulls_before_zoom(0).build().unwrap();
    bandit.pull(0).unwrap();
    bandit.receive_reward(0, 1.0).unwrap();
    for center in [[0.625, 0.625], [0.875, 0.625], [0.625, 0.875]] {
        let view = bandit.find(&center).unwrap();
        assert_eq!(view.depth, 2);
    }
    assert!(bandit.find(&[0.875, 0.875]).is_none());
}

#[test]
fn test_binary_split_refines_widest_dimension() {
    let mut bandit = Zooming::builder()
        .domain([(0.0, 4.0), (0.0, 1.0)])
        .split_rule(BinarySplit)
        .nu(10.0)
        .min_pulls_before_zoom(0)
        .build()
        .unwrap();
    let coords: Vec<Vec<f64>> = bandit.active_points().map(|v| v.coords.to_vec()).collect();
    assert_eq!(coords, vec![vec![1.0, 0.5], vec![3.0, 0.5]]);

    let x = bandit.pull(0).unwrap();
    assert_eq!(x, vec![3.0, 0.5]);
    bandit.receive_reward(0, 1.0).unwrap();
    // [2, 4] x [0, 1] is still widest along the first dimension.
    assert_eq!(bandit.find(&x).unwrap().bounds, &[(3.0, 4.0), (0.0, 1.0)]);
    assert!(bandit.find(&[2.5, 0.5]).is_some());
}

#[test]
fn test_reward_requires_pull() {
    let mut bandit = unit_square().build().unwrap();
    assert!(matches!(
        bandit.receive_reward(0, 1.0),
        Err(Error::NoPendingSelection)
    ));
    assert_eq!(bandit.time(), 0);
}

#[test]
fn test_deep_refinement_saturates_at_coordinate_resolution() {
    let mut bandit = Zooming::builder()
        .domain([(0.0, 1.0)])
        .nu(10.0)
        .rho(0.99)
        .min_pulls_before_zoom(0)
        .build()
        .unwrap();

    let mut saturated = 0;
    for t in 0..200 {
        let x = bandit.pull(t).unwrap();
        if let ZoomEvent::Saturated { .. } = bandit.receive_reward(t, 1.0 - x[0]).unwrap() {
            saturated += 1;
        }
    }

    // Cells below 1e-8 wide cannot hold distinct rounded points.
    assert!(saturated > 0);
    assert!(bandit.max_depth() >= 26);
    assert_eq!(bandit.total_pulls(), bandit.time());

    let partition = bandit.partition();
    for view in bandit.active_points() {
        assert!(partition.cell(view.cell).is_leaf());
        assert!(partition.contains(view.cell, view.coords));
        assert_eq!(bandit.find(view.coords).unwrap().id, view.id);
    }
}
