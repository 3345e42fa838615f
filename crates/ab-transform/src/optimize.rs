//! Scalar minimisation: downhill bracketing followed by Brent's method

use ab_core::{Error, Result};

const GOLDEN: f64 = 1.618_034;
const GROW_LIMIT: f64 = 110.0;
const TINY: f64 = 1e-21;
const CGOLD: f64 = 0.381_966_0;
const ZEPS: f64 = 1e-11;
const BRACKET_MAX_ITER: usize = 200;
const BRENT_MAX_ITER: usize = 500;

/// Relative tolerance on the abscissa of the minimum
pub const DEFAULT_TOLERANCE: f64 = 1.48e-8;

fn sign(magnitude: f64, of: f64) -> f64 {
    if of >= 0.0 {
        magnitude.abs()
    } else {
        -magnitude.abs()
    }
}

/// Find `a < b < c` (in either direction) with `f(b)` below `f(a)` and `f(c)`,
/// walking downhill from the initial points `xa`, `xb`.
pub(crate) fn bracket<F>(f: &F, xa: f64, xb: f64) -> Result<(f64, f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (xa, xb);
    let (mut fa, mut fb) = (f(a), f(b));
    if fb > fa {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut c = b + GOLDEN * (b - a);
    let mut fc = f(c);

    let mut iterations = 0;
    while fb > fc {
        if ![a, b, c, fa, fb, fc].iter().all(|x| x.is_finite()) {
            return Err(Error::non_finite("objective function"));
        }
        iterations += 1;
        if iterations > BRACKET_MAX_ITER {
            return Err(Error::Computation(
                "No minimum could be bracketed; objective may be unbounded".to_string(),
            ));
        }

        let r = (b - a) * (fb - fc);
        let q = (b - c) * (fb - fa);
        let denom = 2.0 * sign((q - r).abs().max(TINY), q - r);
        let mut u = b - ((b - c) * q - (b - a) * r) / denom;
        let ulim = b + GROW_LIMIT * (c - b);
        let mut fu;

        if (b - u) * (u - c) > 0.0 {
            fu = f(u);
            if fu < fc {
                return Ok((b, u, c));
            } else if fu > fb {
                return Ok((a, b, u));
            }
            u = c + GOLDEN * (c - b);
            fu = f(u);
        } else if (c - u) * (u - ulim) > 0.0 {
            fu = f(u);
            if fu < fc {
                b = c;
                c = u;
                u = c + GOLDEN * (c - b);
                fb = fc;
                fc = fu;
                fu = f(u);
            }
        } else if (u - ulim) * (ulim - c) >= 0.0 {
            u = ulim;
            fu = f(u);
        } else {
            u = c + GOLDEN * (c - b);
            fu = f(u);
        }

        a = b;
        b = c;
        c = u;
        fa = fb;
        fb = fc;
        fc = fu;
    }

    if ![a, b, c, fa, fb, fc].iter().all(|x| x.is_finite()) {
        return Err(Error::non_finite("objective function"));
    }
    Ok((a, b, c))
}

/// Brent's method on a bracketing triple, returning the abscissa of the minimum
pub(crate) fn brent<F>(f: &F, (ax, bx, cx): (f64, f64, f64), tol: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = if ax < cx { (ax, cx) } else { (cx, ax) };
    let (mut x, mut w, mut v) = (bx, bx, bx);
    let mut fx = f(x);
    let (mut fw, mut fv) = (fx, fx);
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    for _ in 0..BRENT_MAX_ITER {
        let xm = 0.5 * (a + b);
        let tol1 = tol * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;
        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            return x;
        }

        if e.abs() > tol1 {
            // parabolic step through x, w, v
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let etemp = e;
            e = d;
            if p.abs() >= (0.5 * q * etemp).abs() || p <= q * (a - x) || p >= q * (b - x) {
                e = if x >= xm { a - x } else { b - x };
                d = CGOLD * e;
            } else {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = sign(tol1, xm - x);
                }
            }
        } else {
            e = if x >= xm { a - x } else { b - x };
            d = CGOLD * e;
        }

        let u = if d.abs() >= tol1 { x + d } else { x + sign(tol1, d) };
        let fu = f(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    tracing::warn!("Brent minimisation hit the iteration limit at x = {}", x);
    x
}

/// Minimise `f`, starting the downhill search from `xa` and `xb`
pub fn minimize_scalar<F>(f: F, xa: f64, xb: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let triple = bracket(&f, xa, xb)?;
    Ok(brent(&f, triple, DEFAULT_TOLERANCE))
}
