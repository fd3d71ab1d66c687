//! Exact polynomial long division over the rationals.

use crate::error::MathError;
use crate::poly_coeffs::{collect_coefficients, to_expr, Coefficients};
use ricis_ast::Expr;
use std::rc::Rc;

/// Divide `dividend` by `divisor`, returning `(quotient, remainder)`.
pub fn div_rem(
    dividend: &Coefficients,
    divisor: &Coefficients,
) -> Result<(Coefficients, Coefficients), MathError> {
    let Some((&divisor_deg, divisor_lc)) = divisor.last_key_value() else {
        return Err(MathError::DivisionByZero);
    };

    let mut quotient = Coefficients::new();
    let mut remainder = dividend.clone();

    loop {
        let Some((rem_deg, factor)) = remainder
            .last_key_value()
            .map(|(&deg, lc)| (deg, lc.checked_div(divisor_lc)))
        else {
            break;
        };
        if rem_deg < divisor_deg {
            break;
        }
        let shift = rem_deg - divisor_deg;
        let factor = factor?;

        for (&deg, c) in divisor {
            let slot = remainder.entry(deg + shift).or_default();
            *slot = &*slot - &(&factor * c);
        }
        remainder.retain(|_, c| !c.is_zero());
        quotient.insert(shift, factor);
    }

    Ok((quotient, remainder))
}

/// Quotient of two coefficient maps when the division is exact.
pub fn divide_coefficients(
    dividend: &Coefficients,
    divisor: &Coefficients,
) -> Result<Coefficients, MathError> {
    let (quotient, remainder) = div_rem(dividend, divisor)?;
    if remainder.is_empty() {
        Ok(quotient)
    } else {
        Err(MathError::InexactDivision)
    }
}

/// Divide `numerator / denominator` as polynomials in `var`.
///
/// Succeeds only when both sides are polynomials, the numerator is not
/// identically zero, and the remainder is zero. The quotient is rebuilt as
/// an expression, highest degree first.
pub fn try_divide(numerator: &Expr, denominator: &Expr, var: &str) -> Result<Rc<Expr>, MathError> {
    let dividend = collect_coefficients(numerator, var)?;
    let divisor = collect_coefficients(denominator, var)?;
    if dividend.is_empty() {
        // 0/d is 0 only away from the roots of d; leave it to the singularity passes.
        return Err(MathError::Unsupported("zero dividend".to_string()));
    }
    let quotient = divide_coefficients(&dividend, &divisor)?;
    Ok(to_expr(&quotient, var))
}
