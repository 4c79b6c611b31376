use zooming::{RewardModel, ZoomEvent};

use crate::{bernoulli_bandit, disc_reward, play, unit_square};

#[test]
fn test_bernoulli_disc_converges() {
    let mut bandit = bernoulli_bandit();
    play(&mut bandit, 0..200, |x| disc_reward(x, 0.25));

    let best = bandit.best_point().unwrap();
    let center: Vec<f64> = best.bounds.iter().map(|(lo, hi)| (lo + hi) / 2.0).collect();
    let d = ((center[0] - 0.9).powi(2) + (center[1] - 0.9).powi(2)).sqrt();
    assert!(d < 0.1, "best cell center {center:?} is {d} from the optimum");
    assert!(best.depth >= 3);
    assert_eq!(best.mean, 1.0);
    assert!(bandit.locked_in_step().is_some());
}

#[test]
fn test_gaussian_model_finds_same_region() {
    let mut bandit = unit_square()
        .nu(3.0)
        .rho(0.8)
        .reward_model(RewardModel::Gaussian)
        .build()
        .unwrap();
    play(&mut bandit, 0..200, |x| disc_reward(x, 0.25));

    let best = bandit.best_point().unwrap();
    let center: Vec<f64> = best.bounds.iter().map(|(lo, hi)| (lo + hi) / 2.0).collect();
    let d = ((center[0] - 0.9).powi(2) + (center[1] - 0.9).powi(2)).sqrt();
    assert!(d < 0.1, "best cell center {center:?} is {d} from the optimum");
}

#[test]
fn test_refinements_concentrate_near_optimum() {
    let mut bandit = bernoulli_bandit();
    let mut refined = Vec::new();
    for t in 0..200 {
        let x = bandit.pull(t).unwrap();
        if let ZoomEvent::Refined { cell, .. } = bandit.receive_reward(t, disc_reward(&x, 0.25)).unwrap() {
            refined.push(cell);
        }
    }
    assert!(!refined.is_empty());

    // Every cell refined at depth two or deeper overlaps the rewarding disc.
    for cell in refined {
        let node = bandit.partition().cell(cell);
        if node.depth() < 2 {
            continue;
        }
        let nearest: Vec<f64> = node
            .bounds()
            .iter()
            .map(|&(lo, hi)| 0.9_f64.clamp(lo, hi))
            .collect();
        assert!(disc_reward(&nearest, 0.25) > 0.0, "refined {:?}", node.bounds());
    }
}
