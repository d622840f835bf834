mod common;

use approx::assert_abs_diff_eq;

use common::{black_scholes, init_tracing};
use ql_methods::FdScheme;
use ql_pricers::{
    BsmParameters, DividendExercise, FdAmericanOption, FdBermudanOption, FdConfig,
    FdDividendOption, FdEuropeanOption, FdShoutOption, OptionType,
};

fn american_put() -> BsmParameters {
    BsmParameters::new(OptionType::Put, 100.0, 100.0, 0.0, 0.06, 1.0, 0.3)
}

#[test]
fn european_matches_black_scholes() {
    init_tracing();
    for option_type in [OptionType::Call, OptionType::Put, OptionType::Straddle] {
        for (strike, q) in [(90.0, 0.0), (100.0, 0.02), (115.0, 0.04)] {
            let params = BsmParameters::new(option_type, 100.0, strike, q, 0.05, 1.0, 0.25);
            let fd = FdEuropeanOption::new(params, 200, 201, FdConfig::default())
                .unwrap()
                .calculate()
                .unwrap();
            let bs = black_scholes(&params);
            assert_abs_diff_eq!(fd.value, bs.value, epsilon = 0.02);
            assert_abs_diff_eq!(fd.delta, bs.delta, epsilon = 2e-3);
            assert_abs_diff_eq!(fd.gamma, bs.gamma, epsilon = 1e-3);
            assert_abs_diff_eq!(fd.theta, bs.theta, epsilon = 0.1);
        }
    }
}

#[test]
fn schemes_agree_on_a_fine_grid() {
    let params = BsmParameters::new(OptionType::Call, 100.0, 105.0, 0.0, 0.03, 0.5, 0.2);
    let bs = black_scholes(&params).value;
    for scheme in [FdScheme::CrankNicolson, FdScheme::BackwardEuler] {
        let config = FdConfig::default().with_scheme(scheme);
        let v = FdEuropeanOption::new(params, 400, 201, config)
            .unwrap()
            .calculate()
            .unwrap()
            .value;
        assert_abs_diff_eq!(v, bs, epsilon = 0.03);
    }
}

#[test]
fn early_exercise_ordering() {
    init_tracing();
    let c = FdConfig::default();
    let eu = FdEuropeanOption::new(american_put(), 200, 201, c.clone()).unwrap().calculate().unwrap();
    let am = FdAmericanOption::new(american_put(), 200, 201, c.clone()).unwrap().calculate().unwrap();
    let bermudan = FdBermudanOption::new(american_put(), vec![0.25, 0.5, 0.75, 1.0], 50, 201, c.clone())
        .unwrap()
        .calculate()
        .unwrap();
    let shout = FdShoutOption::new(american_put(), 200, 201, c).unwrap().calculate().unwrap();

    assert!(am.value > eu.value + 0.1, "american {} vs european {}", am.value, eu.value);
    assert!(bermudan.value > eu.value + 0.05, "bermudan {} vs european {}", bermudan.value, eu.value);
    assert!(bermudan.value < am.value + 1e-3, "bermudan {} vs american {}", bermudan.value, am.value);
    assert!(shout.value >= eu.value);
}

#[test]
fn american_call_without_dividends_is_european() {
    let params = BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
    let c = FdConfig::default();
    let eu = FdEuropeanOption::new(params, 200, 201, c.clone()).unwrap().calculate().unwrap();
    let am = FdAmericanOption::new(params, 200, 201, c).unwrap().calculate().unwrap();
    assert_abs_diff_eq!(am.value, eu.value, epsilon = 1e-4);
}

#[test]
fn bermudan_exercisable_only_at_expiry_is_european() {
    let c = FdConfig::default();
    let eu = FdEuropeanOption::new(american_put(), 200, 201, c.clone()).unwrap().calculate().unwrap();
    let bermudan = FdBermudanOption::new(american_put(), vec![1.0], 100, 201, c)
        .unwrap()
        .calculate()
        .unwrap();
    assert_abs_diff_eq!(bermudan.value, eu.value, epsilon = 0.01);
}

#[test]
fn zero_dividend_matches_the_plain_option() {
    let c = FdConfig::default();
    let put = american_put();
    let plain_eu = FdEuropeanOption::new(put, 200, 201, c.clone()).unwrap().calculate().unwrap();
    let plain_am = FdAmericanOption::new(put, 200, 201, c.clone()).unwrap().calculate().unwrap();
    let div = |exercise| {
        FdDividendOption::new(put, exercise, vec![0.0], vec![0.5], 100, 201, c.clone())
            .unwrap()
            .calculate()
            .unwrap()
    };
    let eu = div(DividendExercise::European);
    let am = div(DividendExercise::American);
    assert_abs_diff_eq!(eu.value, plain_eu.value, epsilon = 0.02);
    assert_abs_diff_eq!(eu.delta, plain_eu.delta, epsilon = 2e-3);
    assert_abs_diff_eq!(am.value, plain_am.value, epsilon = 0.02);
}

#[test]
fn dividend_right_after_today_lowers_the_spot() {
    let call = BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
    let fd = FdDividendOption::new(call, DividendExercise::European, vec![5.0], vec![0.01], 100, 201, FdConfig::default())
        .unwrap()
        .calculate()
        .unwrap();
    let shifted = BsmParameters {
        underlying: 95.0,
        ..call
    };
    assert_abs_diff_eq!(fd.value, black_scholes(&shifted).value, epsilon = 0.05);
}

#[test]
fn dividends_favour_puts_and_early_exercise_of_calls() {
    let c = FdConfig::default();
    let call = BsmParameters::new(OptionType::Call, 100.0, 100.0, 0.0, 0.05, 1.0, 0.2);
    let put = BsmParameters {
        option_type: OptionType::Put,
        ..call
    };
    let price = |p: BsmParameters, exercise, d: f64| {
        FdDividendOption::new(p, exercise, vec![d, d], vec![0.3, 0.8], 50, 201, c.clone())
            .unwrap()
            .calculate()
            .unwrap()
            .value
    };
    assert!(price(put, DividendExercise::European, 3.0) > price(put, DividendExercise::European, 0.0));
    assert!(price(call, DividendExercise::European, 3.0) < price(call, DividendExercise::European, 0.0));
    let eu = price(call, DividendExercise::European, 3.0);
    let am = price(call, DividendExercise::American, 3.0);
    let shout = price(call, DividendExercise::Shout, 3.0);
    assert!(am > eu && shout >= eu);
}

#[test]
fn invalid_inputs_are_rejected() {
    let c = FdConfig::default();
    let mut p = american_put();
    p.underlying = 0.0;
    assert!(FdEuropeanOption::new(p, 100, 101, c.clone()).is_err());
    p = american_put();
    p.volatility = 0.0;
    assert!(FdAmericanOption::new(p, 100, 101, c.clone()).is_err());
    assert!(FdBermudanOption::new(american_put(), vec![0.5, 0.25], 10, 101, c).is_err());
}
