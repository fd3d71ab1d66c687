use crate::poly_coeffs::{collect_coefficients, degree};
use ricis_ast::{Expr, Rational};

/// A linear expression in one variable: `coef * var + constant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearForm {
    pub coef: Rational,
    pub constant: Rational,
}

impl LinearForm {
    /// The point where the form vanishes, `-constant / coef`.
    pub fn zero(&self) -> Option<Rational> {
        (-&self.constant).checked_div(&self.coef).ok()
    }

    /// The point where the form equals `target`.
    pub fn solve_for(&self, target: &Rational) -> Option<Rational> {
        (target - &self.constant).checked_div(&self.coef).ok()
    }
}

/// Extract the linear form of an expression with respect to `var`.
///
/// Returns `None` when the expression is non-linear in `var`
/// (for example `var^2`, `sin(var)`, or `var` in a denominator).
pub fn linear_form(expr: &Expr, var: &str) -> Option<LinearForm> {
    let coeffs = collect_coefficients(expr, var).ok()?;
    if degree(&coeffs).is_some_and(|d| d > 1) {
        return None;
    }
    Some(LinearForm {
        coef: coeffs.get(&1).cloned().unwrap_or_default(),
        constant: coeffs.get(&0).cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_scaled_and_shifted_variable() {
        // 3x - 6
        let e = Expr::sub(Expr::mul(Expr::num(3), Expr::var("x")), Expr::num(6));
        let lf = linear_form(&e, "x").unwrap();
        assert_eq!(lf.coef, Rational::from(3));
        assert_eq!(lf.constant, Rational::from(-6));
        assert_eq!(lf.zero(), Some(Rational::from(2)));
        assert_eq!(lf.solve_for(&Rational::from(3)), Some(Rational::from(3)));
    }

    #[test]
    fn constants_have_no_zero() {
        let lf = linear_form(&Expr::num(4), "x").unwrap();
        assert!(lf.coef.is_zero());
        assert_eq!(lf.zero(), None);
    }

    #[test]
    fn rejects_non_linear_input() {
        assert!(linear_form(&Expr::mul(Expr::var("x"), Expr::var("x")), "x").is_none());
        assert!(linear_form(&Expr::sin(Expr::var("x")), "x").is_none());
    }
}
