use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use ql_math::Array;
use ql_methods::finite_differences::{
    d_plus_d_minus, AmericanCondition, BoundaryCondition, BsmOperator, ExplicitEuler,
    FiniteDifferenceModel, StepCondition, TridiagonalOperator,
};
use ql_methods::FdScheme;

#[test]
fn zero_operator_leaves_flat_array_unchanged() {
    let zero = TridiagonalOperator::new(5).unwrap();
    for steps in [1, 7, 100] {
        for from in [0.1, 1.0, 30.0] {
            let mut a = Array::from_element(5, 1.0);
            let mut model = FiniteDifferenceModel::from_operator(zero.clone(), FdScheme::BackwardEuler);
            model.rollback(&mut a, from, 0.0, steps, None).unwrap();
            assert_eq!(a.as_slice(), &[1.0; 5]);
        }
    }
}

#[test]
fn explicit_euler_on_zero_operator_is_identity() {
    let mut a = Array::from_slice(&[3.0, -1.0, 4.0, 1.0]);
    let mut model = FiniteDifferenceModel::new(ExplicitEuler::new(TridiagonalOperator::new(4).unwrap()));
    model.rollback(&mut a, 2.0, 0.0, 13, None).unwrap();
    assert_eq!(a.as_slice(), &[3.0, -1.0, 4.0, 1.0]);
}

/// Error at the centre of the heat equation started from the lowest
/// discrete eigenmode, which isolates the time discretisation error.
fn heat_equation_error(scheme: FdScheme, steps: usize) -> f64 {
    let n = 21;
    let h = 1.0 / (n - 1) as f64;
    let mut d = &d_plus_d_minus(n, h).unwrap() * -1.0;
    d.set_lower_bc(BoundaryCondition::Dirichlet(0.0));
    d.set_upper_bc(BoundaryCondition::Dirichlet(0.0));
    let lambda = 4.0 * (std::f64::consts::PI * h / 2.0).sin().powi(2) / (h * h);
    let t = 0.1;
    let mut a = Array::from_fn(n, |j| (std::f64::consts::PI * j as f64 * h).sin());
    let exact = (-lambda * t).exp() * a[n / 2];
    FiniteDifferenceModel::from_operator(d, scheme)
        .rollback(&mut a, t, 0.0, steps, None)
        .unwrap();
    (a[n / 2] - exact).abs()
}

#[test]
fn crank_nicolson_is_second_order_and_backward_euler_first() {
    let cn: Vec<f64> = [10, 20, 40].iter().map(|&s| heat_equation_error(FdScheme::CrankNicolson, s)).collect();
    let be: Vec<f64> = [10, 20, 40].iter().map(|&s| heat_equation_error(FdScheme::BackwardEuler, s)).collect();
    for w in cn.windows(2) {
        let ratio = w[0] / w[1];
        assert!(ratio > 3.6 && ratio < 4.4, "CN ratio {ratio:.3}");
    }
    for w in be.windows(2) {
        let ratio = w[0] / w[1];
        assert!(ratio > 1.7 && ratio < 2.3, "BE ratio {ratio:.3}");
    }
    assert!(cn[2] < be[2]);
}

struct PutSetup {
    operator: TridiagonalOperator,
    intrinsic: Array,
}

fn log_space_put(n: usize) -> PutSetup {
    let (spot, strike, r, q, sigma) = (100.0, 100.0, 0.06, 0.0, 0.25);
    let half_width = 4.0 * sigma;
    let dx = 2.0 * half_width / (n - 1) as f64;
    let grid = Array::from_fn(n, |i| spot * (-half_width + dx * i as f64).exp());
    let intrinsic = grid.map(|s| (strike - s).max(0.0));
    let mut operator = BsmOperator::log_space(n, dx, r, q, sigma).unwrap();
    operator.set_lower_bc(BoundaryCondition::Neumann(intrinsic[1] - intrinsic[0]));
    operator.set_upper_bc(BoundaryCondition::Neumann(intrinsic[n - 1] - intrinsic[n - 2]));
    PutSetup { operator, intrinsic }
}

#[test]
fn american_dominates_european_everywhere() {
    let n = 101;
    let PutSetup { operator, intrinsic } = log_space_put(n);
    let mut european = intrinsic.clone();
    FiniteDifferenceModel::from_operator(operator.clone(), FdScheme::CrankNicolson)
        .rollback(&mut european, 1.0, 0.0, 100, None)
        .unwrap();
    let mut american = intrinsic.clone();
    let condition = AmericanCondition::new(intrinsic.clone());
    FiniteDifferenceModel::from_operator(operator, FdScheme::CrankNicolson)
        .rollback(&mut american, 1.0, 0.0, 100, Some(&condition as &dyn StepCondition))
        .unwrap();
    for i in 0..n {
        assert!(american[i] >= european[i] - 1e-12, "grid point {i}");
        assert!(american[i] >= intrinsic[i]);
    }
    // early exercise premium at the money
    assert!(american[n / 2] > european[n / 2] + 0.1);
}

#[test]
fn neumann_conditions_hold_after_rollback() {
    let n = 51;
    let PutSetup { operator, intrinsic } = log_space_put(n);
    let lower = intrinsic[1] - intrinsic[0];
    let mut a = intrinsic.clone();
    FiniteDifferenceModel::from_operator(operator, FdScheme::BackwardEuler)
        .rollback(&mut a, 0.5, 0.0, 50, None)
        .unwrap();
    assert_abs_diff_eq!(a[1] - a[0], lower, epsilon = 1e-10);
    assert_abs_diff_eq!(a[n - 1] - a[n - 2], 0.0, epsilon = 1e-10);
}

#[test]
fn time_dependent_operator_with_constant_volatility_matches_constant_operator() {
    let n = 41;
    let dx = 0.05;
    let constant = BsmOperator::log_space(n, dx, 0.03, 0.01, 0.2).unwrap();
    let varying = BsmOperator::time_dependent(n, dx, 0.03, 0.01, std::sync::Arc::new(|_t: f64| 0.2)).unwrap();
    let start = Array::from_fn(n, |i| ((i as f64 - 20.0) * dx).exp());
    let mut a = start.clone();
    let mut b = start;
    FiniteDifferenceModel::from_operator(constant, FdScheme::CrankNicolson)
        .rollback(&mut a, 1.0, 0.0, 20, None)
        .unwrap();
    FiniteDifferenceModel::from_operator(varying, FdScheme::CrankNicolson)
        .rollback(&mut b, 1.0, 0.0, 20, None)
        .unwrap();
    for i in 0..n {
        assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-12);
    }
}

fn diagonally_dominant() -> impl Strategy<Value = (TridiagonalOperator, Array)> {
    (3usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(-1.0f64..1.0, n - 1),
            prop::collection::vec(2.5f64..5.0, n),
            prop::collection::vec(-1.0f64..1.0, n - 1),
            prop::collection::vec(-10.0f64..10.0, n),
        )
            .prop_map(|(l, d, u, b)| {
                let op = TridiagonalOperator::from_bands(Array::from_vec(l), Array::from_vec(d), Array::from_vec(u))
                    .unwrap();
                (op, Array::from_vec(b))
            })
    })
}

proptest! {
    #[test]
    fn solve_then_apply_round_trips((op, b) in diagonally_dominant()) {
        let x = op.solve_for(&b).unwrap();
        let back = op.apply_to(&x).unwrap();
        for i in 0..b.size() {
            prop_assert!((back[i] - b[i]).abs() < 1e-10, "row {}: {} vs {}", i, back[i], b[i]);
        }
    }
}
