use crate::expression::{BinOp, BuiltinFn, Expr};
use crate::infinity::Infinity;
use crate::rational::Rational;
use std::rc::Rc;

/// Read-only walk over a tree. Singularity nodes are leaves.
pub trait Visitor {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Constant(c) => self.visit_constant(c),
            Expr::Variable(name) => self.visit_variable(name),
            Expr::Binary(op, l, r) => self.visit_binary(*op, l, r),
            Expr::Neg(e) => self.visit_neg(e),
            Expr::Call(func, args) => self.visit_call(*func, args),
            Expr::Infinity(inf) => self.visit_infinity(inf),
        }
    }

    fn visit_constant(&mut self, _c: &Rational) {}
    fn visit_variable(&mut self, _name: &str) {}

    fn visit_binary(&mut self, _op: BinOp, left: &Expr, right: &Expr) {
        self.visit_expr(left);
        self.visit_expr(right);
    }

    fn visit_neg(&mut self, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_call(&mut self, _func: BuiltinFn, args: &[Rc<Expr>]) {
        for arg in args {
            self.visit_expr(arg);
        }
    }

    fn visit_infinity(&mut self, _inf: &Infinity) {}
}

/// Bottom-up rewriter.
///
/// The default methods transform the children and rebuild a node only when a
/// child actually changed (pointer identity), so untouched subtrees are shared
/// with the input. Singularity nodes are returned unchanged unless an
/// implementor overrides [`Transformer::transform_infinity`].
pub trait Transformer {
    fn transform_expr(&mut self, expr: &Rc<Expr>) -> Rc<Expr> {
        match expr.as_ref() {
            Expr::Constant(_) => self.transform_constant(expr),
            Expr::Variable(_) => self.transform_variable(expr),
            Expr::Binary(op, l, r) => self.transform_binary(expr, *op, l, r),
            Expr::Neg(e) => self.transform_neg(expr, e),
            Expr::Call(func, args) => self.transform_call(expr, *func, args),
            Expr::Infinity(inf) => self.transform_infinity(expr, inf),
        }
    }

    fn transform_constant(&mut self, original: &Rc<Expr>) -> Rc<Expr> {
        Rc::clone(original)
    }

    fn transform_variable(&mut self, original: &Rc<Expr>) -> Rc<Expr> {
        Rc::clone(original)
    }

    fn transform_binary(
        &mut self,
        original: &Rc<Expr>,
        op: BinOp,
        l: &Rc<Expr>,
        r: &Rc<Expr>,
    ) -> Rc<Expr> {
        let new_l = self.transform_expr(l);
        let new_r = self.transform_expr(r);
        rebuild_binary(original, op, l, r, new_l, new_r)
    }

    fn transform_neg(&mut self, original: &Rc<Expr>, e: &Rc<Expr>) -> Rc<Expr> {
        let new_e = self.transform_expr(e);
        if Rc::ptr_eq(&new_e, e) {
            Rc::clone(original)
        } else {
            Expr::neg(new_e)
        }
    }

    fn transform_call(
        &mut self,
        original: &Rc<Expr>,
        func: BuiltinFn,
        args: &[Rc<Expr>],
    ) -> Rc<Expr> {
        let mut changed = false;
        let mut new_args = Vec::with_capacity(args.len());
        for arg in args {
            let new_arg = self.transform_expr(arg);
            if !Rc::ptr_eq(&new_arg, arg) {
                changed = true;
            }
            new_args.push(new_arg);
        }
        if changed {
            Expr::call(func, new_args)
        } else {
            Rc::clone(original)
        }
    }

    fn transform_infinity(&mut self, original: &Rc<Expr>, _inf: &Infinity) -> Rc<Expr> {
        Rc::clone(original)
    }
}

/// Reuse `original` when neither operand changed, otherwise build a new node.
pub fn rebuild_binary(
    original: &Rc<Expr>,
    op: BinOp,
    old_l: &Rc<Expr>,
    old_r: &Rc<Expr>,
    new_l: Rc<Expr>,
    new_r: Rc<Expr>,
) -> Rc<Expr> {
    if Rc::ptr_eq(&new_l, old_l) && Rc::ptr_eq(&new_r, old_r) {
        Rc::clone(original)
    } else {
        Expr::binary(op, new_l, new_r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Root;

    struct VarCounter(usize);

    impl Visitor for VarCounter {
        fn visit_variable(&mut self, _name: &str) {
            self.0 += 1;
        }
    }

    struct RenameX;

    impl Transformer for RenameX {
        fn transform_variable(&mut self, original: &Rc<Expr>) -> Rc<Expr> {
            match original.as_ref() {
                Expr::Variable(name) if name == "x" => Expr::var("y"),
                _ => Rc::clone(original),
            }
        }
    }

    #[test]
    fn visitor_counts_variables_but_not_inside_singularities() {
        let inf = Expr::infinity(Infinity::lazy(Expr::var("x"), vec![]));
        let e = Expr::add(Expr::mul(Expr::var("x"), Expr::var("y")), inf);
        let mut counter = VarCounter(0);
        counter.visit_expr(&e);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn untouched_subtrees_are_shared() {
        let left = Expr::sin(Expr::var("z"));
        let e = Expr::add(Rc::clone(&left), Expr::var("x"));
        let out = RenameX.transform_expr(&e);
        assert_eq!(out, Expr::add(Expr::sin(Expr::var("z")), Expr::var("y")));
        match out.as_ref() {
            Expr::Binary(_, l, _) => assert!(Rc::ptr_eq(l, &left)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_change_returns_the_same_node() {
        let e = Expr::mul(Expr::var("a"), Expr::exp(Expr::var("b")));
        let out = RenameX.transform_expr(&e);
        assert!(Rc::ptr_eq(&out, &e));
    }

    #[test]
    fn singularity_nodes_are_opaque_by_default() {
        let inf = Expr::infinity(Infinity::lazy(
            Expr::var("x"),
            vec![Root::exact("x", Rational::zero())],
        ));
        let out = RenameX.transform_expr(&inf);
        assert!(Rc::ptr_eq(&out, &inf));
    }
}
