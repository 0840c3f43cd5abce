use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, FRAC_PI_8, PI};

/// Euler–Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Above this argument the asymptotic expansion is more accurate than the
/// power series, whose terms grow like `exp(x / √2)`.
const SERIES_LIMIT: f64 = 8.0;

const MAX_TERMS: usize = 64;

/// Kelvin function `kei(x)` of order zero, for `x ≥ 0`.
///
/// `kei(0) = −π/4`; the function oscillates with decaying amplitude and
/// first crosses zero near `x = 3.91`. Negative arguments are treated as
/// distances and folded onto `|x|`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn kei(x: f64) -> f64 {
    let x = x.abs();
    if x == 0.0 {
        return -FRAC_PI_4;
    }
    if x <= SERIES_LIMIT {
        kei_series(x)
    } else {
        kei_asymptotic(x)
    }
}

/// Ascending series:
/// `kei x = −ln(x/2) bei x − (π/4) ber x + Σ (−1)^k ψ(2k+2) (x²/4)^(2k+1) / ((2k+1)!)²`.
#[allow(clippy::cast_precision_loss)]
fn kei_series(x: f64) -> f64 {
    let q = 0.25 * x * x;

    let mut ber: f64 = 0.0;
    let mut bei: f64 = 0.0;
    let mut tail = 0.0;

    // (−1)^k q^(2k) / ((2k)!)², and ψ(2k+1).
    let mut even: f64 = 1.0;
    let mut psi = -EULER_GAMMA;

    for k in 0..MAX_TERMS {
        let n = (2 * k) as f64;
        let odd = even * q / ((n + 1.0) * (n + 1.0));
        let psi_odd = psi + 1.0 / (n + 1.0);

        ber += even;
        bei += odd;
        tail += psi_odd * odd;

        psi = psi_odd + 1.0 / (n + 2.0);
        even = -odd * q / ((n + 2.0) * (n + 2.0));

        if k > 2 && even.abs() < 1e-17 * (ber.abs() + bei.abs()) {
            break;
        }
    }

    -(0.5 * x).ln() * bei - FRAC_PI_4 * ber + tail
}

/// Large-argument expansion of `ker x + i kei x = K₀(x e^(iπ/4))`.
#[allow(clippy::cast_precision_loss)]
fn kei_asymptotic(x: f64) -> f64 {
    let mut sum_re = 0.0;
    let mut sum_im = 0.0;

    // c_k / x^k with c_0 = 1, c_k = −c_(k−1) (2k − 1)² / (8k).
    let mut term: f64 = 1.0;
    let mut previous = f64::INFINITY;

    for k in 0..MAX_TERMS {
        // Stop once the divergent tail starts to grow.
        if term.abs() > previous {
            break;
        }
        let angle = k as f64 * FRAC_PI_4;
        sum_re += term * angle.cos();
        sum_im -= term * angle.sin();
        previous = term.abs();
        if previous < 1e-17 {
            break;
        }
        let m = (2 * k + 1) as f64;
        term *= -m * m / (8.0 * (k + 1) as f64 * x);
    }

    let scale = (PI / (2.0 * x)).sqrt() * (-x * FRAC_1_SQRT_2).exp();
    let phase = x * FRAC_1_SQRT_2 + FRAC_PI_8;
    scale * (sum_im * phase.cos() - sum_re * phase.sin())
}
