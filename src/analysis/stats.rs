//! Chi-square goodness-of-fit test.
//!
//! The p-value is the chi-square survival function, computed as the upper
//! regularized incomplete gamma function Q(k/2, x/2). Q uses the series
//! expansion below a+1 and a Lentz continued fraction above it.

const EPS: f64 = 1e-14;
const FPMIN: f64 = 1e-300;
const MAX_ITERATIONS: usize = 1000;

/// Lanczos coefficients, g = 7, n = 9.
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Outcome of a chi-square goodness-of-fit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

/// Runs a chi-square test of `observed` against `expected` frequencies.
///
/// Returns `None` when the slices differ in length, hold fewer than two
/// categories, or any expected frequency is not positive.
pub fn chi_square_test(observed: &[f64], expected: &[f64]) -> Option<ChiSquareTest> {
    if observed.len() != expected.len() || observed.len() < 2 {
        return None;
    }
    if expected.iter().any(|&e| e <= 0.0 || !e.is_finite()) {
        return None;
    }

    let statistic: f64 = observed
        .iter()
        .zip(expected)
        .map(|(&o, &e)| (o - e) * (o - e) / e)
        .sum();
    let degrees_of_freedom = observed.len() - 1;

    Some(ChiSquareTest {
        statistic,
        degrees_of_freedom,
        p_value: chi_square_sf(statistic, degrees_of_freedom as f64),
    })
}

/// P(X > statistic) for X ~ chi-square with `dof` degrees of freedom.
pub fn chi_square_sf(statistic: f64, dof: f64) -> f64 {
    gamma_q(dof / 2.0, statistic / 2.0)
}

/// Natural log of the gamma function.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + 7.5;
    let series = LANCZOS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS[0], |acc, (i, &c)| acc + c / (x + i as f64 + 1.0));

    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Upper regularized incomplete gamma function Q(a, x).
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    let q = if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    };
    q.clamp(0.0, 1.0)
}

/// Lower regularized incomplete gamma P(a, x) by its power series.
fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;

    for _ in 0..MAX_ITERATIONS {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * EPS {
            break;
        }
    }

    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Upper regularized incomplete gamma Q(a, x) by continued fraction.
fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=MAX_ITERATIONS {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;

        d = an * d + b;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = b + an / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }

        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPS {
            break;
        }
    }

    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_ln_gamma_factorials() {
        assert!(close(ln_gamma(1.0), 0.0, 1e-12));
        assert!(close(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(close(ln_gamma(11.0), 3_628_800f64.ln(), 1e-10));
        assert!(close(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn test_gamma_q_exponential_case() {
        // Q(1, x) = e^-x
        for x in [0.1, 1.0, 2.5, 10.0] {
            assert!(close(gamma_q(1.0, x), (-x).exp(), 1e-12), "x = {}", x);
        }
        assert_eq!(gamma_q(3.0, 0.0), 1.0);
    }

    #[test]
    fn test_chi_square_sf_known_values() {
        // Critical values at the 5% level
        assert!(close(chi_square_sf(3.841_458_820_694_124, 1.0), 0.05, 1e-9));
        assert!(close(chi_square_sf(31.410_432_844_230_918, 20.0), 0.05, 1e-9));
        // dof = 2 has a closed form: exp(-x/2)
        assert!(close(chi_square_sf(4.0, 2.0), (-2.0f64).exp(), 1e-12));
    }

    #[test]
    fn test_perfect_fit_has_p_value_one() {
        let observed = [10.0, 10.0, 30.0, 30.0];
        let test = chi_square_test(&observed, &observed).unwrap();
        assert_eq!(test.statistic, 0.0);
        assert_eq!(test.degrees_of_freedom, 3);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_poor_fit_has_small_p_value() {
        let observed = [100.0, 0.0, 100.0, 0.0];
        let expected = [50.0, 50.0, 50.0, 50.0];
        let test = chi_square_test(&observed, &expected).unwrap();
        assert_eq!(test.statistic, 200.0);
        assert!(test.p_value < 1e-20);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(chi_square_test(&[1.0, 2.0], &[1.0]).is_none());
        assert!(chi_square_test(&[1.0], &[1.0]).is_none());
        assert!(chi_square_test(&[1.0, 2.0], &[0.0, 3.0]).is_none());
    }
}
