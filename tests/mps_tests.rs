extern crate casoptmodel;
use casoptmodel::*;

// The MPS table writer.

fn text(t : &Table, row : usize, col : usize) -> &str {
    match &t.rows[row][col] {
        Cell::Str(s) => s,
        _ => "",
    }
}

fn num(t : &Table, row : usize, col : usize) -> Option<f64> {
    match t.rows[row][col] {
        Cell::Num(v) => Some(v),
        _ => None,
    }
}

fn section_row(t : &Table, name : &str) -> usize {
    (0..t.rows.len())
        .find(|&i| text(t, i, 0) == name)
        .unwrap_or_else(|| panic!("no {} row", name))
}

// max 4x - 5y subject to 3x + y <= 6, both variables at default bounds.
#[test]
fn small_lp_table() {
    let mut m = Model::new(Some("m1"));
    let x = m.variable(Some("x"), VarSpec::default());
    let y = m.variable(Some("y"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Maximize, 4.0 * x - 5.0 * y);
    m.constraint(Some("c1"), (3.0 * x + y).le(6.0).unwrap());

    let t = m.to_mps(false).unwrap();
    assert_eq!(
        t.columns,
        vec!["Field1", "Field2", "Field3", "Field4", "Field5", "Field6", "_id_"]
    );

    assert_eq!(text(&t, 0, 0), "NAME");
    assert_eq!(text(&t, 0, 2), "m1");
    assert_eq!(text(&t, 1, 0), "ROWS");
    assert_eq!(text(&t, 2, 0), "MAX");
    assert_eq!(text(&t, 2, 1), "obj");
    assert_eq!(text(&t, 3, 0), "L");
    assert_eq!(text(&t, 3, 1), "c1");
    assert_eq!(text(&t, 4, 0), "COLUMNS");

    // x then y, objective entry first, paired with the constraint entry
    assert_eq!(text(&t, 5, 1), "x");
    assert_eq!(text(&t, 5, 2), "obj");
    assert_eq!(num(&t, 5, 3), Some(4.0));
    assert_eq!(text(&t, 5, 4), "c1");
    assert_eq!(num(&t, 5, 5), Some(3.0));
    assert_eq!(text(&t, 6, 1), "y");
    assert_eq!(num(&t, 6, 3), Some(-5.0));
    assert_eq!(num(&t, 6, 5), Some(1.0));

    let rhs = section_row(&t, "RHS");
    assert_eq!(text(&t, rhs + 1, 1), "RHS");
    assert_eq!(text(&t, rhs + 1, 2), "c1");
    assert_eq!(num(&t, rhs + 1, 3), Some(6.0));

    // default bounds produce an empty BOUNDS section
    let bounds = section_row(&t, "BOUNDS");
    assert_eq!(text(&t, bounds + 1, 0), "ENDATA");

    // 1-based ids
    for (i, row) in t.rows.iter().enumerate() {
        assert_eq!(row[6], Cell::Num(i as f64 + 1.0));
    }
}

#[test]
fn emission_is_deterministic() {
    let mut m = Model::new(Some("det"));
    let x = m.variable(Some("x"), VarSpec::integer());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());
    m.constraint(Some("c"), x.ge(2.0).unwrap());
    let a = m.to_mps(false).unwrap();
    let b = m.to_mps(false).unwrap();
    assert_eq!(a, b);
}

#[test]
fn integer_runs_get_marker_rows() {
    let mut m = Model::new(Some("mix"));
    let x = m.variable(Some("x"), VarSpec::default());
    let n = m.variable(Some("n"), VarSpec::integer());
    let z = m.variable(Some("z"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x + n + z);

    let t = m.to_mps(false).unwrap();
    let columns = section_row(&t, "COLUMNS");
    // x, INTORG, n, INTEND, z
    assert_eq!(text(&t, columns + 1, 1), "x");
    assert_eq!(text(&t, columns + 2, 1), "MARK0000");
    assert_eq!(text(&t, columns + 2, 2), "'MARKER'");
    assert_eq!(text(&t, columns + 2, 4), "'INTORG'");
    assert_eq!(text(&t, columns + 3, 1), "n");
    assert_eq!(text(&t, columns + 4, 1), "MARK0001");
    assert_eq!(text(&t, columns + 4, 4), "'INTEND'");
    assert_eq!(text(&t, columns + 5, 1), "z");

    // unbounded integer gets PL, continuous defaults stay silent
    let bounds = section_row(&t, "BOUNDS");
    assert_eq!(text(&t, bounds + 1, 0), "PL");
    assert_eq!(text(&t, bounds + 1, 2), "n");
    assert_eq!(text(&t, bounds + 2, 0), "ENDATA");
}

#[test]
fn bound_rows_cover_every_kind() {
    let mut m = Model::new(Some("bnd"));
    let b = m.variable(Some("b"), VarSpec::binary());
    let f = m.variable(Some("f"), VarSpec::default().lb(f64::NEG_INFINITY));
    let lo = m.variable(Some("lo"), VarSpec::default().lb(2.0));
    let up = m.variable(Some("up"), VarSpec::default().ub(7.0));
    let fx = m.variable(Some("fx"), VarSpec::default().lb(3.0).ub(3.0));
    m.set_objective(Some("obj"), Sense::Minimize, b + f + lo + up + fx);

    let t = m.to_mps(false).unwrap();
    let bounds = section_row(&t, "BOUNDS");
    let rows : Vec<(String, String)> = (bounds + 1..t.rows.len() - 1)
        .map(|i| (text(&t, i, 0).to_string(), text(&t, i, 2).to_string()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("BV".to_string(), "b".to_string()),
            ("FR".to_string(), "f".to_string()),
            ("LO".to_string(), "lo".to_string()),
            ("UP".to_string(), "up".to_string()),
            ("FX".to_string(), "fx".to_string()),
        ]
    );
}

#[test]
fn abstract_and_nonlinear_content_is_refused() {
    let mut m = Model::new(Some("abs"));
    let x = m.variable(Some("x"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());
    m.set(Some("S"));
    assert!(matches!(m.to_mps(false), Err(Error::UnsupportedForMps(_, _))));

    let mut q = Model::new(Some("quad"));
    let x = q.variable(Some("x"), VarSpec::default());
    let y = q.variable(Some("y"), VarSpec::default());
    let obj = x.into_expr().mul(y).unwrap();
    q.set_objective(Some("obj"), Sense::Minimize, obj);
    assert!(matches!(q.to_mps(false), Err(Error::NonlinearTerm(_))));
}

#[test]
fn objective_constant_becomes_a_fixed_column() {
    let mut m = Model::new(Some("cst"));
    let x = m.variable(Some("x"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x + 7.0);
    m.constraint(Some("c"), x.ge(1.0).unwrap());

    let t = m.to_mps(true).unwrap();
    let has_aux = t
        .rows
        .iter()
        .any(|r| r.get(1) == Some(&Cell::Str("obj_constant".to_string())));
    assert!(has_aux);
    let bounds = section_row(&t, "BOUNDS");
    assert_eq!(text(&t, bounds + 1, 0), "FX");
    assert_eq!(text(&t, bounds + 1, 2), "obj_constant");
    assert_eq!(num(&t, bounds + 1, 3), Some(7.0));

    // without the flag the table carries no auxiliary column
    let plain = m.to_mps(false).unwrap();
    assert!(!plain
        .rows
        .iter()
        .any(|r| r.get(1) == Some(&Cell::Str("obj_constant".to_string()))));
}
