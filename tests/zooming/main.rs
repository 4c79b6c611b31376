#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::float_cmp
)]

mod builder;
mod cold_start;
mod convergence;
mod invariants;
mod refinement;

use zooming::{RewardModel, Zooming, ZoomingBuilder};

fn unit_square() -> ZoomingBuilder {
    Zooming::builder().domain([(0.0, 1.0), (0.0, 1.0)])
}

/// Bernoulli reward that pays 1 within `radius` of `(0.9, 0.9)`.
fn disc_reward(x: &[f64], radius: f64) -> f64 {
    let d = ((x[0] - 0.9).powi(2) + (x[1] - 0.9).powi(2)).sqrt();
    if d <= radius { 1.0 } else { 0.0 }
}

fn bernoulli_bandit() -> Zooming {
    unit_square()
        .nu(3.0)
        .rho(0.8)
        .reward_model(RewardModel::Bernoulli)
        .build()
        .unwrap()
}

fn play(bandit: &mut Zooming, rounds: core::ops::Range<u64>, mut reward: impl FnMut(&[f64]) -> f64) {
    for t in rounds {
        let x = bandit.pull(t).unwrap();
        bandit.receive_reward(t, reward(&x)).unwrap();
    }
}
