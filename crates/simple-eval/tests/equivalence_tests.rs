//! Property-based tests: the small-step machine and the big-step evaluator
//! must agree on every well-typed program.
//!
//! Generated statements only assign to `a`, `b` and `c`. Loops are
//! generated as counted loops over a dedicated counter that the loop body
//! never assigns, so every generated program terminates.

use proptest::prelude::*;
use simple_eval::{evaluate, execute, run_expr, run_stmt, Environment};
use simple_types::{Expr, Stmt};

const VARIABLES: [&str; 3] = ["a", "b", "c"];

// -- Strategies --

fn number_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (0i64..10).prop_map(Expr::number),
        prop::sample::select(VARIABLES.to_vec()).prop_map(Expr::variable),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::add(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Expr::multiply(l, r)),
        ]
    })
}

fn boolean_expr() -> impl Strategy<Value = Expr> {
    prop_oneof![
        any::<bool>().prop_map(Expr::boolean),
        (number_expr(), number_expr()).prop_map(|(l, r)| Expr::less_than(l, r)),
    ]
}

fn loop_free_stmt() -> impl Strategy<Value = Stmt> {
    let leaf = prop_oneof![
        Just(Stmt::DoNothing),
        (prop::sample::select(VARIABLES.to_vec()), number_expr())
            .prop_map(|(name, expr)| Stmt::assign(name, expr)),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Stmt::sequence(a, b)),
            (boolean_expr(), inner.clone(), inner).prop_map(|(c, a, b)| Stmt::if_else(c, a, b)),
        ]
    })
}

/// `i = 0; while (i < times) { body; i = i + 1 }`
fn counted_loop(body: Stmt, times: i64) -> Stmt {
    let i = || Expr::variable("i");
    Stmt::sequence(
        Stmt::assign("i", Expr::number(0)),
        Stmt::while_loop(
            Expr::less_than(i(), Expr::number(times)),
            Stmt::sequence(body, Stmt::assign("i", Expr::add(i(), Expr::number(1)))),
        ),
    )
}

fn program() -> impl Strategy<Value = Stmt> {
    let part = prop_oneof![
        loop_free_stmt(),
        (loop_free_stmt(), 0i64..4).prop_map(|(body, times)| counted_loop(body, times)),
    ];
    prop::collection::vec(part, 1..4).prop_map(Stmt::block)
}

fn environment() -> impl Strategy<Value = Environment> {
    (0i64..5, 0i64..5, 0i64..5).prop_map(|(a, b, c)| {
        Environment::new().assign("a", a).assign("b", b).assign("c", c)
    })
}

// -- Properties --

proptest! {
    #[test]
    fn number_expressions_agree(expr in number_expr(), env in environment()) {
        prop_assert_eq!(run_expr(expr.clone(), env.clone()), evaluate(&expr, &env));
    }

    #[test]
    fn boolean_expressions_agree(expr in boolean_expr(), env in environment()) {
        prop_assert_eq!(run_expr(expr.clone(), env.clone()), evaluate(&expr, &env));
    }

    #[test]
    fn statements_agree(stmt in program(), env in environment()) {
        prop_assert_eq!(run_stmt(stmt.clone(), env.clone()), execute(&stmt, env));
    }
}
