use crate::infinity::Infinity;
use crate::rational::Rational;
use std::fmt;
use std::rc::Rc;

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    const fn precedence(self) -> i32 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }

    /// Whether `a op (b op c) == (a op b) op c`; decides parenthesization on the right.
    const fn is_associative(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul)
    }
}

/// Built-in functions recognized by evaluation, differentiation and root finding.
///
/// `Pow` takes two arguments (base, exponent); every other builtin is unary.
/// `Log` is the natural logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFn {
    // Trigonometric
    Sin,
    Cos,
    Tan,

    // Hyperbolic
    Sinh,
    Cosh,

    // Powers / exponential
    Pow,
    Log,
    Exp,
    Sqrt,
}

impl BuiltinFn {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinFn::Sin => "sin",
            BuiltinFn::Cos => "cos",
            BuiltinFn::Tan => "tan",
            BuiltinFn::Sinh => "sinh",
            BuiltinFn::Cosh => "cosh",
            BuiltinFn::Pow => "pow",
            BuiltinFn::Log => "log",
            BuiltinFn::Exp => "exp",
            BuiltinFn::Sqrt => "sqrt",
        }
    }

    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            BuiltinFn::Pow => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable expression node. Children are shared via `Rc`.
///
/// Equality is structural, singularity nodes included.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Rational),
    Variable(String),
    Binary(BinOp, Rc<Expr>, Rc<Expr>),
    Neg(Rc<Expr>),
    Call(BuiltinFn, Vec<Rc<Expr>>),
    Infinity(Infinity),
}

impl Expr {
    // Helper constructors
    pub fn num(n: i64) -> Rc<Self> {
        Rc::new(Expr::Constant(Rational::from_integer(n)))
    }

    pub fn rational(r: Rational) -> Rc<Self> {
        Rc::new(Expr::Constant(r))
    }

    pub fn var(name: &str) -> Rc<Self> {
        Rc::new(Expr::Variable(name.to_string()))
    }

    pub fn binary(op: BinOp, l: Rc<Expr>, r: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Binary(op, l, r))
    }

    pub fn add(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Self> {
        Self::binary(BinOp::Add, l, r)
    }

    pub fn sub(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Self> {
        Self::binary(BinOp::Sub, l, r)
    }

    pub fn mul(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Self> {
        Self::binary(BinOp::Mul, l, r)
    }

    pub fn div(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Self> {
        Self::binary(BinOp::Div, l, r)
    }

    pub fn neg(e: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Neg(e))
    }

    pub fn call(func: BuiltinFn, args: Vec<Rc<Expr>>) -> Rc<Self> {
        Rc::new(Expr::Call(func, args))
    }

    pub fn pow(base: Rc<Expr>, exp: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Pow, vec![base, exp])
    }

    pub fn sin(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Sin, vec![e])
    }

    pub fn cos(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Cos, vec![e])
    }

    pub fn tan(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Tan, vec![e])
    }

    pub fn sinh(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Sinh, vec![e])
    }

    pub fn cosh(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Cosh, vec![e])
    }

    pub fn exp(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Exp, vec![e])
    }

    pub fn log(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Log, vec![e])
    }

    pub fn sqrt(e: Rc<Expr>) -> Rc<Self> {
        Self::call(BuiltinFn::Sqrt, vec![e])
    }

    pub fn infinity(inf: Infinity) -> Rc<Self> {
        Rc::new(Expr::Infinity(inf))
    }

    pub fn as_constant(&self) -> Option<&Rational> {
        match self {
            Expr::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_infinity(&self) -> Option<&Infinity> {
        match self {
            Expr::Infinity(inf) => Some(inf),
            _ => None,
        }
    }

    pub fn is_constant_zero(&self) -> bool {
        matches!(self, Expr::Constant(c) if c.is_zero())
    }

    pub fn is_constant_one(&self) -> bool {
        matches!(self, Expr::Constant(c) if c.is_one())
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Expr::Infinity(_))
    }

    fn precedence(&self) -> i32 {
        match self {
            Expr::Binary(op, _, _) => op.precedence(),
            Expr::Constant(c) if !c.is_integer() => 2,
            Expr::Constant(c) if c.is_negative() => 4,
            Expr::Neg(_) => 4,
            Expr::Constant(_) | Expr::Variable(_) | Expr::Call(_, _) | Expr::Infinity(_) => 5,
        }
    }
}

fn fmt_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expr,
    parent_prec: i32,
    strict: bool,
) -> fmt::Result {
    let prec = operand.precedence();
    if prec < parent_prec || (strict && prec == parent_prec) {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Variable(name) => f.write_str(name),
            Expr::Binary(op, l, r) => {
                let prec = op.precedence();
                fmt_operand(f, l, prec, false)?;
                write!(f, " {} ", op.symbol())?;
                fmt_operand(f, r, prec, !op.is_associative())
            }
            Expr::Neg(inner) => {
                f.write_str("-")?;
                fmt_operand(f, inner, 4, false)
            }
            Expr::Call(BuiltinFn::Pow, args) if args.len() == 2 => {
                fmt_operand(f, &args[0], 5, false)?;
                f.write_str("^")?;
                fmt_operand(f, &args[1], 5, false)
            }
            Expr::Call(func, args) => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Infinity(inf) => write!(f, "{inf}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Rc<Expr> {
        Expr::var("x")
    }

    #[test]
    fn structural_equality() {
        let a = Expr::sub(Expr::mul(x(), x()), Expr::num(1));
        let b = Expr::sub(Expr::mul(x(), x()), Expr::num(1));
        assert_eq!(a, b);
        assert_ne!(a, Expr::sub(Expr::mul(x(), x()), Expr::num(2)));
        assert_ne!(Expr::add(x(), Expr::num(1)), Expr::add(Expr::num(1), x()));
    }

    #[test]
    fn display_respects_precedence() {
        let e = Expr::div(Expr::sub(Expr::mul(x(), x()), Expr::num(1)), Expr::sub(x(), Expr::num(1)));
        assert_eq!(e.to_string(), "(x * x - 1) / (x - 1)");

        let e = Expr::sub(x(), Expr::sub(x(), Expr::num(1)));
        assert_eq!(e.to_string(), "x - (x - 1)");

        let e = Expr::add(x(), Expr::add(x(), Expr::num(1)));
        assert_eq!(e.to_string(), "x + x + 1");
    }

    #[test]
    fn display_calls_and_powers() {
        assert_eq!(Expr::sin(Expr::mul(Expr::num(2), x())).to_string(), "sin(2 * x)");
        assert_eq!(Expr::pow(x(), Expr::num(3)).to_string(), "x^3");
        assert_eq!(Expr::pow(Expr::add(x(), Expr::num(1)), Expr::num(2)).to_string(), "(x + 1)^2");
        assert_eq!(Expr::neg(Expr::add(x(), Expr::num(1))).to_string(), "-(x + 1)");
        assert_eq!(Expr::mul(Expr::num(-2), x()).to_string(), "-2 * x");
    }

    #[test]
    fn builtin_names_and_arity() {
        assert_eq!(BuiltinFn::Sinh.name(), "sinh");
        assert_eq!(BuiltinFn::Pow.arity(), 2);
        assert_eq!(BuiltinFn::Sqrt.arity(), 1);
    }
}
