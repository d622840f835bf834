#![allow(dead_code)]

use ql_math::{normal_cdf, normal_pdf};
use ql_pricers::{BsmParameters, OptionType};

/// Black-Scholes value and Greeks; theta per year of calendar time.
#[derive(Debug, Clone, Copy)]
pub struct Analytic {
    pub value: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
}

pub fn black_scholes(p: &BsmParameters) -> Analytic {
    let (s, k, q, r, t, v) = (
        p.underlying,
        p.strike,
        p.dividend_yield,
        p.risk_free_rate,
        p.residual_time,
        p.volatility,
    );
    let sqrt_t = t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * v * v) * t) / (v * sqrt_t);
    let d2 = d1 - v * sqrt_t;
    let (dq, dr) = ((-q * t).exp(), (-r * t).exp());
    let gamma = dq * normal_pdf(d1) / (s * v * sqrt_t);
    let decay = -s * dq * normal_pdf(d1) * v / (2.0 * sqrt_t);
    let call = Analytic {
        value: s * dq * normal_cdf(d1) - k * dr * normal_cdf(d2),
        delta: dq * normal_cdf(d1),
        gamma,
        theta: decay + q * s * dq * normal_cdf(d1) - r * k * dr * normal_cdf(d2),
    };
    let put = Analytic {
        value: k * dr * normal_cdf(-d2) - s * dq * normal_cdf(-d1),
        delta: -dq * normal_cdf(-d1),
        gamma,
        theta: decay - q * s * dq * normal_cdf(-d1) + r * k * dr * normal_cdf(-d2),
    };
    match p.option_type {
        OptionType::Call => call,
        OptionType::Put => put,
        OptionType::Straddle => Analytic {
            value: call.value + put.value,
            delta: call.delta + put.delta,
            gamma: 2.0 * gamma,
            theta: call.theta + put.theta,
        },
    }
}

/// Route pricer logs to the test harness; set `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
