// Standard-normal variates via the Box–Muller transform.

use rand::Rng;
use std::f64::consts::PI;

/// Draw one sample from N(0, 1) using the basic (trigonometric) Box–Muller
/// transform over two uniform draws from `rng`.
///
/// `u` is redrawn while it is exactly zero so `ln(u)` stays finite. Only the
/// cosine branch is returned; nothing is cached between calls.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let mut u: f64 = rng.gen();
    while u == 0.0 {
        u = rng.gen();
    }
    let v: f64 = rng.gen();
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}
