//! Rational Root Theorem kernels.
//!
//! Coefficient vectors here are dense and ordered low-to-high:
//! `[a0, a1, ..., an]` for `a0 + a1*x + ... + an*x^n`.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use ricis_ast::Rational;
use std::collections::BTreeSet;

/// Divisor lists longer than this are not enumerated.
const MAX_DIVISORS: usize = 64;

/// Scale rational coefficients to integers by the LCM of their denominators.
pub fn normalize_to_integers(coeffs: &[Rational]) -> Vec<BigInt> {
    let lcm = Rational::from(Rational::denom_lcm(coeffs.iter()));
    coeffs
        .iter()
        .map(|c| (c * &lcm).numer().clone())
        .collect()
}

/// Candidate rational roots `±p/q` with `p | a0` and `q | an`, ascending.
///
/// Returns an empty list when `a0` or `an` is zero, when either constant has
/// too many divisors, or when the candidate count would exceed `max_candidates`.
pub fn rational_root_candidates(int_coeffs: &[BigInt], max_candidates: usize) -> Vec<Rational> {
    let (Some(a0), Some(an)) = (int_coeffs.first(), int_coeffs.last()) else {
        return vec![];
    };
    if a0.is_zero() || an.is_zero() {
        return vec![];
    }

    let divisors_a0 = small_divisors(&a0.abs());
    let divisors_an = small_divisors(&an.abs());
    if divisors_a0.is_empty() || divisors_an.is_empty() {
        return vec![];
    }

    if divisors_a0.len() * divisors_an.len() * 2 > max_candidates {
        return vec![];
    }

    let mut candidates = BTreeSet::new();
    for p in &divisors_a0 {
        for q in &divisors_an {
            if let Ok(candidate) = Rational::new(p.clone(), q.clone()) {
                candidates.insert(-&candidate);
                candidates.insert(candidate);
            }
        }
    }

    candidates.into_iter().collect()
}

fn small_divisors(n: &BigInt) -> Vec<BigInt> {
    let Some(n) = n.to_u64().filter(|n| *n != 0) else {
        return vec![];
    };

    let mut divs = Vec::new();
    let mut i = 1u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 {
            divs.push(BigInt::from(i));
            if i != n / i {
                divs.push(BigInt::from(n / i));
            }
            if divs.len() > MAX_DIVISORS {
                return vec![];
            }
        }
        i += 1;
    }

    divs
}

/// Evaluate a dense coefficient vector at `x` using Horner's method.
pub fn horner_eval(coeffs: &[Rational], x: &Rational) -> Rational {
    coeffs
        .iter()
        .rev()
        .fold(Rational::zero(), |acc, c| &(&acc * x) + c)
}

/// Divide a dense coefficient vector by `(x - root)`.
pub fn synthetic_division(coeffs: &[Rational], root: &Rational) -> Vec<Rational> {
    let n = coeffs.len();
    if n <= 1 {
        return vec![];
    }

    let mut quotient = vec![Rational::zero(); n - 1];
    quotient[n - 2] = coeffs[n - 1].clone();
    for i in (0..n - 2).rev() {
        quotient[i] = &coeffs[i + 1] + &(root * &quotient[i + 1]);
    }
    quotient
}

/// Extract every rational root by candidate testing plus deflation.
///
/// Returns `(roots, residual)`. Each root is listed once per multiplicity;
/// `residual` is what is left after dividing all of them out.
pub fn find_rational_roots(
    mut coeffs: Vec<Rational>,
    max_candidates: usize,
) -> (Vec<Rational>, Vec<Rational>) {
    let mut roots = Vec::new();

    while coeffs.len() > 1 && coeffs[0].is_zero() {
        coeffs.remove(0);
        roots.push(Rational::zero());
    }

    while coeffs.len() > 2 || (coeffs.len() == 2 && !coeffs[1].is_zero()) {
        let int_coeffs = normalize_to_integers(&coeffs);
        let candidates = rational_root_candidates(&int_coeffs, max_candidates);
        let Some(root) = candidates
            .into_iter()
            .find(|c| horner_eval(&coeffs, c).is_zero())
        else {
            break;
        };
        coeffs = synthetic_division(&coeffs, &root);
        roots.push(root);
    }

    (roots, coeffs)
}
