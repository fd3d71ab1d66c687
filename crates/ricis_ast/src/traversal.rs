//! Iterative tree queries.
//!
//! These use an explicit stack so arbitrarily deep trees cannot overflow the
//! call stack. Singularity nodes are treated as leaves: their index belongs to
//! the singularity, not to the surrounding expression.

use crate::expression::Expr;
use std::collections::BTreeSet;

fn push_children<'a>(node: &'a Expr, stack: &mut Vec<&'a Expr>) {
    match node {
        Expr::Binary(_, l, r) => {
            stack.push(r);
            stack.push(l);
        }
        Expr::Neg(e) => stack.push(e),
        Expr::Call(_, args) => {
            for arg in args.iter().rev() {
                stack.push(arg);
            }
        }
        Expr::Constant(_) | Expr::Variable(_) | Expr::Infinity(_) => {}
    }
}

/// Count all nodes in an expression tree.
pub fn count_all_nodes(root: &Expr) -> usize {
    count_nodes_matching(root, |_| true)
}

/// Count nodes matching a predicate.
///
/// # Example
/// ```ignore
/// let divs = count_nodes_matching(&expr, |e| matches!(e, Expr::Binary(BinOp::Div, _, _)));
/// ```
pub fn count_nodes_matching<F>(root: &Expr, mut pred: F) -> usize
where
    F: FnMut(&Expr) -> bool,
{
    let mut count = 0;
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if pred(node) {
            count += 1;
        }
        push_children(node, &mut stack);
    }

    count
}

/// Whether any node satisfies `pred`. Stops at the first match.
pub fn any_node<F>(root: &Expr, mut pred: F) -> bool
where
    F: FnMut(&Expr) -> bool,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if pred(node) {
            return true;
        }
        push_children(node, &mut stack);
    }
    false
}

/// Collect all unique variable names, sorted.
pub fn collect_variables(root: &Expr) -> BTreeSet<String> {
    let mut vars = BTreeSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Expr::Variable(name) = node {
            if !vars.contains(name) {
                vars.insert(name.clone());
            }
        }
        push_children(node, &mut stack);
    }

    vars
}

pub fn contains_var(root: &Expr, var: &str) -> bool {
    any_node(root, |e| matches!(e, Expr::Variable(name) if name == var))
}

pub fn contains_infinity(root: &Expr) -> bool {
    any_node(root, Expr::is_infinity)
}

/// The name of the only variable in `root`, if there is exactly one.
pub fn single_free_variable(root: &Expr) -> Option<String> {
    let vars = collect_variables(root);
    if vars.len() == 1 {
        vars.into_iter().next()
    } else {
        None
    }
}
