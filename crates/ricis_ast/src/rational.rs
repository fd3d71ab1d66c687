//! Exact rational numbers backed by arbitrary-precision integers.
//!
//! `Rational` is the only numeric payload a tree carries. Arithmetic is always
//! exact; conversion to `f64` happens only at numeric boundaries (root scans,
//! the classic projection of a singularity).

use crate::error::AstError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Largest decimal exponent accepted by [`Rational::from_decimal_str`].
const MAX_DECIMAL_EXPONENT: u32 = 4096;

/// Exact rational value. Always kept in lowest terms with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rational(BigRational);

impl Rational {
    pub fn zero() -> Self {
        Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        Rational(BigRational::one())
    }

    pub fn from_integer(n: i64) -> Self {
        Rational(BigRational::from_integer(BigInt::from(n)))
    }

    /// Build `numer / denom`, reducing to lowest terms.
    pub fn new(numer: BigInt, denom: BigInt) -> Result<Self, AstError> {
        if denom.is_zero() {
            return Err(AstError::DivisionByZero);
        }
        Ok(Rational(BigRational::new(numer, denom)))
    }

    pub fn from_ratio(numer: i64, denom: i64) -> Result<Self, AstError> {
        Self::new(BigInt::from(numer), BigInt::from(denom))
    }

    /// Read a decimal literal such as `-12.375` or `2.5e-3` exactly.
    ///
    /// The value is `digits / 10^k`, never routed through a float, so `0.1`
    /// is exactly `1/10`.
    pub fn from_decimal_str(text: &str) -> Result<Self, AstError> {
        let invalid = || AstError::InvalidDecimal(text.to_string());
        let s = text.trim();

        let (mantissa, exponent) = match s.find(|c| c == 'e' || c == 'E') {
            Some(i) => {
                let exp = s[i + 1..].parse::<i32>().map_err(|_| invalid())?;
                (&s[..i], exp)
            }
            None => (s, 0),
        };
        if exponent.unsigned_abs() > MAX_DECIMAL_EXPONENT {
            return Err(invalid());
        }

        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part
            .chars()
            .chain(frac_part.chars())
            .all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut numer: BigInt = format!("{int_part}{frac_part}")
            .parse()
            .map_err(|_| invalid())?;
        if negative {
            numer = -numer;
        }

        let scale = i64::from(exponent) - frac_part.len() as i64;
        let ten = BigInt::from(10u32);
        let value = if scale >= 0 {
            BigRational::from_integer(numer * num_traits::pow(ten, scale as usize))
        } else {
            BigRational::new(numer, num_traits::pow(ten, (-scale) as usize))
        };
        Ok(Rational(value))
    }

    /// Exact rational for an integral `f64`, `None` for fractional or non-finite input.
    pub fn from_f64_integral(value: f64) -> Option<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        BigRational::from_float(value).map(Rational)
    }

    /// The exact binary value of a finite `f64`.
    pub fn from_f64_exact(value: f64) -> Option<Self> {
        BigRational::from_float(value).map(Rational)
    }

    /// Best rational approximation of `value` with a bounded denominator.
    ///
    /// Walks the continued-fraction convergents and returns the first one
    /// within `tolerance` of `value`. Returns `None` when no convergent with
    /// denominator `<= max_denominator` is close enough.
    pub fn approximate_f64(value: f64, max_denominator: u64, tolerance: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let negative = value < 0.0;
        let target = value.abs();

        // h/k convergents, seeded with h(-2)=0, h(-1)=1, k(-2)=1, k(-1)=0
        let (mut h_prev, mut h) = (0i128, 1i128);
        let (mut k_prev, mut k) = (1i128, 0i128);
        let mut rest = target;

        for _ in 0..64 {
            let whole = rest.floor();
            if whole > i64::MAX as f64 {
                return None;
            }
            let a = whole as i128;
            let h_next = a.checked_mul(h)?.checked_add(h_prev)?;
            let k_next = a.checked_mul(k)?.checked_add(k_prev)?;
            if k_next > i128::from(max_denominator) {
                return None;
            }
            (h_prev, h) = (h, h_next);
            (k_prev, k) = (k, k_next);

            if (h as f64 / k as f64 - target).abs() <= tolerance {
                let numer = if negative { -BigInt::from(h) } else { BigInt::from(h) };
                return Some(Rational(BigRational::new(numer, BigInt::from(k))));
            }

            let frac = rest - whole;
            if frac <= f64::EPSILON {
                return None;
            }
            rest = 1.0 / frac;
        }
        None
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn as_big_rational(&self) -> &BigRational {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn abs(&self) -> Self {
        Rational(self.0.abs())
    }

    /// Best-effort conversion to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_else(|| {
            match (self.numer().to_f64(), self.denom().to_f64()) {
                (Some(n), Some(d)) => n / d,
                _ => f64::NAN,
            }
        })
    }

    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.numer().to_i64()
        } else {
            None
        }
    }

    /// The value as a non-negative machine integer, if it is one.
    pub fn to_u32(&self) -> Option<u32> {
        if self.is_integer() {
            self.numer().to_u32()
        } else {
            None
        }
    }

    pub fn checked_div(&self, rhs: &Rational) -> Result<Self, AstError> {
        if rhs.is_zero() {
            return Err(AstError::DivisionByZero);
        }
        Ok(Rational(&self.0 / &rhs.0))
    }

    pub fn recip(&self) -> Result<Self, AstError> {
        Rational::one().checked_div(self)
    }

    pub fn pow(&self, exp: u32) -> Self {
        let n = exp as usize;
        Rational(BigRational::new(
            num_traits::pow(self.numer().clone(), n),
            num_traits::pow(self.denom().clone(), n),
        ))
    }

    /// Exact square root when both numerator and denominator are perfect squares.
    pub fn sqrt_exact(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        let n = self.numer().sqrt();
        let d = self.denom().sqrt();
        if &(&n * &n) == self.numer() && &(&d * &d) == self.denom() {
            Some(Rational(BigRational::new(n, d)))
        } else {
            None
        }
    }

    /// Least common multiple of denominators, used to clear fractions.
    pub fn denom_lcm<'a>(values: impl IntoIterator<Item = &'a Rational>) -> BigInt {
        values
            .into_iter()
            .fold(BigInt::one(), |acc, r| acc.lcm(r.denom()))
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_integer(n)
    }
}

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Self {
        Rational(BigRational::from_integer(n))
    }
}

impl From<BigRational> for Rational {
    fn from(r: BigRational) -> Self {
        Rational(r)
    }
}

impl FromStr for Rational {
    type Err = AstError;

    /// Accepts `p/q` fractions as well as decimal literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((p, q)) => {
                let numer: BigInt = p
                    .trim()
                    .parse()
                    .map_err(|_| AstError::InvalidDecimal(s.to_string()))?;
                let denom: BigInt = q
                    .trim()
                    .parse()
                    .map_err(|_| AstError::InvalidDecimal(s.to_string()))?;
                Rational::new(numer, denom)
            }
            None => Rational::from_decimal_str(s),
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Rational {
            type Output = Rational;
            fn $method(self, rhs: Rational) -> Rational {
                Rational(self.0.$method(rhs.0))
            }
        }

        impl<'a> $trait<&'a Rational> for &'a Rational {
            type Output = Rational;
            fn $method(self, rhs: &'a Rational) -> Rational {
                Rational((&self.0).$method(&rhs.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}
