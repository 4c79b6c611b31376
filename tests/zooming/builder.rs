use zooming::partition::BinarySplit;
use zooming::{Error, RewardModel, ScoringMethod, Zooming};

#[test]
fn test_domain_is_required() {
    assert!(matches!(Zooming::builder().build(), Err(Error::MissingDomain)));
}

#[test]
fn test_empty_domain_is_rejected() {
    assert!(matches!(
        Zooming::new(Vec::<(f64, f64)>::new()),
        Err(Error::ZeroDimensions)
    ));
}

#[test]
fn test_inverted_bounds_are_rejected() {
    let result = Zooming::new(vec![(0.0, 1.0), (3.0, 3.0)]);
    assert!(matches!(result, Err(Error::InvalidBounds { dim: 1, .. })));
}

#[test]
fn test_parameter_ranges() {
    let domain = [(0.0, 1.0)];
    assert!(matches!(
        Zooming::builder().domain(domain).nu(-2.0).build(),
        Err(Error::InvalidNu(_))
    ));
    assert!(matches!(
        Zooming::builder().domain(domain).rho(1.0).build(),
        Err(Error::InvalidRho(_))
    ));
}

#[test]
fn test_methods_parse_from_strings() {
    let method: ScoringMethod = "tuned_ucb".parse().unwrap();
    let model: RewardModel = "bernoulli".parse().unwrap();
    let bandit = Zooming::builder()
        .domain([(0.0, 1.0), (0.0, 1.0)])
        .scoring_method(method)
        .reward_model(model)
        .build()
        .unwrap();
    assert_eq!(bandit.scoring_method(), ScoringMethod::TunedUcb);
    assert_eq!(bandit.reward_model(), RewardModel::Bernoulli);

    assert!(matches!(
        "softmax".parse::<ScoringMethod>(),
        Err(Error::UnknownScoringMethod(name)) if name == "softmax"
    ));
    assert!(matches!(
        "poisson".parse::<RewardModel>(),
        Err(Error::UnknownRewardModel(_))
    ));
}

#[test]
fn test_builder_is_reusable_through_clone() {
    let builder = Zooming::builder().domain([(0.0, 1.0)]).nu(2.0).seed(5);
    let a = builder.clone().build().unwrap();
    let b = builder.build().unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.nu(), 2.0);
}

#[test]
fn test_wide_domains_need_a_narrow_split_rule() {
    let domain = vec![(0.0, 1.0); 64];
    assert!(matches!(
        Zooming::new(domain.clone()),
        Err(Error::SplitTooWide { .. })
    ));
    let bandit = Zooming::builder()
        .domain(domain)
        .split_rule(BinarySplit)
        .build()
        .unwrap();
    assert_eq!(bandit.n_active_points(), 2);
}

#[test]
fn test_huge_bounds_are_rejected() {
    assert!(matches!(
        Zooming::new(vec![(0.0, 1e11)]),
        Err(Error::BoundsOutOfRange { dim: 0, .. })
    ));
}
