extern crate casoptmodel;
use casoptmodel::*;

// Session mediation against a scripted mock.

struct MockSession {
    scripts : Vec<String>,
    uploads : Vec<Table>,
    response : RunResponse,
}

impl MockSession {
    fn new(response : RunResponse) -> MockSession {
        MockSession { scripts : Vec::new(), uploads : Vec::new(), response }
    }
}

impl Session for MockSession {
    fn upload_table(&mut self, table : &Table, _replace : bool) -> Result<String> {
        self.uploads.push(table.clone());
        Ok(format!("{}_handle", table.name))
    }

    fn run_script(&mut self, code : &str) -> Result<RunResponse> {
        self.scripts.push(code.to_string());
        Ok(self.response.clone())
    }

    fn run_mps(
        &mut self,
        _handle : &str,
        _ptype : ProblemType,
        _options : &[(String, String)],
    ) -> Result<RunResponse> {
        Ok(self.response.clone())
    }
}

fn solution_table(rows : &[(&str, f64, f64)]) -> Table {
    let mut t = Table::new("solution", &["i", "var", "value", "lb", "ub", "rc"]);
    for (i, (name, value, rc)) in rows.iter().enumerate() {
        t.rows.push(vec![
            Cell::Num(i as f64 + 1.0),
            Cell::Str(name.to_string()),
            Cell::Num(*value),
            Cell::Num(0.0),
            Cell::Empty,
            Cell::Num(*rc),
        ]);
    }
    t
}

fn summary_table(objective : f64, status : &str) -> Table {
    let mut t = Table::new("solutionSummary", &["Label", "Value"]);
    t.rows.push(vec![
        Cell::Str("Solution Status".to_string()),
        Cell::Str(status.to_string()),
    ]);
    t.rows.push(vec![
        Cell::Str("Objective Value".to_string()),
        Cell::Num(objective),
    ]);
    t
}

fn ok_response(tables : Vec<Table>) -> RunResponse {
    RunResponse { status : "OK".to_string(), tables, log : String::new() }
}

#[test]
fn script_solve_ingests_values_and_objective() {
    let mut m = Model::new(Some("lp"));
    let x = m.variable(Some("x"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());
    m.constraint(Some("c"), x.ge(1.0).unwrap());

    let mut dual = Table::new("dual", &["j", "con", "dual"]);
    dual.rows.push(vec![
        Cell::Num(1.0),
        Cell::Str("c".to_string()),
        Cell::Num(0.5),
    ]);
    let resp = ok_response(vec![
        solution_table(&[("x", 1.0, 0.0)]),
        dual,
        summary_table(1.0, "OPTIMAL"),
    ]);
    let mut session = MockSession::new(resp);

    m.solve_with(&mut session, &SolveSettings::default()).unwrap();

    assert_eq!(x.value(&m), Some(1.0));
    assert_eq!(m.objective_value(), Some(1.0));
    assert_eq!(m.solution_status(), Some("OPTIMAL"));
    let c = m.find_constraint("c").unwrap();
    assert_eq!(c.dual(&m), Some(0.5));

    // one script went out, wrapped in proc optmodel with parse lines
    assert_eq!(session.scripts.len(), 1);
    let code = &session.scripts[0];
    assert!(code.starts_with("proc optmodel;\n"));
    assert!(code.contains("solve;\n"));
    assert!(code.contains("create data solution from"));
}

#[test]
fn failed_status_surfaces_the_log() {
    let mut m = Model::new(Some("bad"));
    let x = m.variable(Some("x"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());

    let resp = RunResponse {
        status : "SYNTAX_ERROR".to_string(),
        tables : Vec::new(),
        log : "line 2: unknown identifier".to_string(),
    };
    let mut session = MockSession::new(resp);
    let err = m.solve_with(&mut session, &SolveSettings::default()).unwrap_err();
    match err {
        Error::RemoteExecution { status, log } => {
            assert_eq!(status, "SYNTAX_ERROR");
            assert!(log.contains("unknown identifier"));
        },
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn forced_mps_on_abstract_model_is_an_error() {
    let mut m = Model::new(Some("abs"));
    m.set(Some("S"));
    let x = m.variable(Some("x"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());

    let mut session = MockSession::new(ok_response(vec![]));
    let settings = SolveSettings { force_mps : true, ..Default::default() };
    assert!(matches!(
        m.solve_with(&mut session, &settings),
        Err(Error::UnsupportedForMps(_, _))
    ));
    // nothing was submitted
    assert!(session.scripts.is_empty());
    assert!(session.uploads.is_empty());
}

#[test]
fn mps_route_uploads_the_table() {
    let mut m = Model::new(Some("mps"));
    let x = m.variable(Some("x"), VarSpec::binary());
    m.set_objective(Some("obj"), Sense::Maximize, x.into_expr());

    let resp = ok_response(vec![
        solution_table(&[("x", 1.0, 0.0)]),
        summary_table(1.0, "OPTIMAL"),
    ]);
    let mut session = MockSession::new(resp);
    let settings = SolveSettings { mps : true, ..Default::default() };
    m.solve_with(&mut session, &settings).unwrap();

    assert_eq!(session.uploads.len(), 1);
    assert!(session.scripts.is_empty());
    assert_eq!(m.problem_type(), ProblemType::Milp);
    assert_eq!(x.value(&m), Some(1.0));
}

#[test]
fn long_names_round_trip_through_substitution() {
    let long = "a_variable_name_well_over_the_thirty_two_character_limit";
    let mut m = Model::new(Some("names"));
    let x = m.variable(Some(long), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());

    // the mock answers with the substituted name, as the remote side would
    let resp = ok_response(vec![
        solution_table(&[("o1", 2.0, 0.0)]),
        summary_table(2.0, "OPTIMAL"),
    ]);
    let mut session = MockSession::new(resp);
    m.solve_with(&mut session, &SolveSettings::default()).unwrap();

    let code = &session.scripts[0];
    assert!(!code.contains(long));
    assert!(code.contains("var o1;"));
    assert_eq!(x.value(&m), Some(2.0));
}

#[test]
fn workspace_submit_returns_the_response() {
    let mut w = Model::new(Some("ws"));
    let p = w.parameter(Some("p"));
    p.set_value(&mut w, 3.0);
    w.literal("print p;");

    let mut printed = Table::new("Print1.PrintTable", &["p"]);
    printed.rows.push(vec![Cell::Num(3.0)]);
    let mut session = MockSession::new(ok_response(vec![printed]));
    let resp = w.submit_with(&mut session).unwrap();

    assert_eq!(resp.status, "OK");
    assert!(resp.table("Print1.PrintTable").is_some());
    let code = &session.scripts[0];
    assert_eq!(
        code,
        "proc optmodel;\n\
         \x20\x20\x20num p = 3;\n\
         \x20\x20\x20print p;\n\
         quit;"
    );
}

#[test]
fn parameter_group_concrete_and_abstract_assignment() {
    let mut m = Model::new(Some("dual_mode"));
    let s = m.set_with(Some("S"), SetValue::range(1i64, 3i64));
    let g = m.add_parameters(vec![Domain::from(s)], Some("g"));

    // concrete key: statement plus a recorded client-side value
    g.set(&mut m, [2i64], 9.0);
    let member = g.at(&mut m, [2i64]);
    assert_eq!(member.value(&m), Some(9.0));

    // abstract key inside a loop: statement only, no value recorded
    m.for_loop(vec![IterDomain::from(s)], |m, its| {
        g.set(m, [its[0]], 0.0);
        Ok(())
    })
    .unwrap();
    m.for_loop(vec![IterDomain::from(s)], |m, its| {
        let p = g.at(m, [its[0]]);
        assert_eq!(p.value(m), None);
        Ok(())
    })
    .unwrap();
}

#[test]
fn container_stack_recovers_after_a_panic() {
    let mut m = Model::new(Some("panicky"));
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = m.for_loop(vec![IterDomain::range(1i64, 3i64)], |_, _| {
            panic!("body failure");
        });
    }));
    assert!(result.is_err());
    assert!(!m.in_container());

    // statements issued afterwards land at the top level again
    m.literal("x = 1;");
    let code = m.to_session_code();
    assert!(code.contains("\n   x = 1;\n"));
}
