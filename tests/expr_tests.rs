extern crate casoptmodel;
use casoptmodel::*;

// Expression algebra: accumulation, rendering and relation building.

#[test]
fn coefficients_accumulate_into_one_term() {
    let mut m = Model::new(Some("accum"));
    let x = m.variable(Some("x"), VarSpec::default());
    let e = x + 2.0 * x;
    assert_eq!(e.expr_string(&m), "3 * x");

    let z = x - x;
    assert_eq!(z.expr_string(&m), "0");
}

#[test]
fn rendering_order_and_signs() {
    let mut m = Model::new(Some("render"));
    let x = m.variable(Some("x"), VarSpec::default());
    let y = m.variable(Some("y"), VarSpec::default());

    let e = 2.0 * x - y + 5.0;
    assert_eq!(e.expr_string(&m), "2 * x - y + 5");

    let e = -x + 3.0;
    assert_eq!(e.expr_string(&m), "- x + 3");

    let e = x + 0.5 * y;
    assert_eq!(e.expr_string(&m), "x + 0.5 * y");

    // constant renders last regardless of when it was added
    let e = 1.0 + x.into_expr();
    assert_eq!(e.expr_string(&m), "x + 1");
}

#[test]
fn constant_only_expression_prints_zero_or_value() {
    let m = Model::new(Some("consts"));
    assert_eq!(Expr::constant(0.0).expr_string(&m), "0");
    assert_eq!(Expr::constant(-2.5).expr_string(&m), "- 2.5");
}

#[test]
fn products_fold_constants_and_stop_at_bilinear() {
    let mut m = Model::new(Some("mul"));
    let x = m.variable(Some("x"), VarSpec::default());
    let y = m.variable(Some("y"), VarSpec::default());

    let lin = x.into_expr().mul(4.0).unwrap();
    assert_eq!(lin.expr_string(&m), "4 * x");

    let bilin = x.into_expr().mul(y).unwrap();
    assert!(!bilin.is_linear());
    assert_eq!(bilin.expr_string(&m), "x * y");

    let cubic = bilin.mul(x);
    assert!(matches!(cubic, Err(Error::NonlinearTerm(_))));
}

#[test]
fn division_by_zero_is_refused() {
    let mut m = Model::new(Some("div"));
    let x = m.variable(Some("x"), VarSpec::default());
    let half = x.into_expr().div(2.0).unwrap();
    assert_eq!(half.expr_string(&m), "0.5 * x");
    assert!(matches!(x.into_expr().div(0.0), Err(Error::DivisionByZero)));
}

#[test]
fn relations_fold_the_right_hand_side() {
    let mut m = Model::new(Some("rel"));
    let x = m.variable(Some("x"), VarSpec::default());
    let y = m.variable(Some("y"), VarSpec::default());

    let c = m.constraint(Some("c"), (3.0 * x + y).le(6.0).unwrap());
    assert_eq!(c.name(&m), "c");

    let r = (x + y).within(2.0, 5.0).unwrap();
    let rc = m.constraint(Some("r"), r);
    assert_eq!(rc.coefficient(&m, x), 1.0);

    // both sides constant is a construction-time error
    assert!(matches!(
        Expr::constant(1.0).le(2.0),
        Err(Error::InvalidComparison(_, _))
    ));
}

#[test]
fn expression_values_follow_variable_values() {
    let mut m = Model::new(Some("vals"));
    let x = m.variable(Some("x"), VarSpec::default());
    let y = m.variable(Some("y"), VarSpec::default());
    let e = 2.0 * x + y + 1.0;
    assert_eq!(e.value(&m), None);
    x.set_value(&mut m, 3.0);
    y.set_value(&mut m, 4.0);
    assert_eq!(e.value(&m), Some(11.0));
}
