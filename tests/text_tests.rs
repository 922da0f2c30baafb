extern crate casoptmodel;
use casoptmodel::*;

// Generated PROC OPTMODEL text, byte for byte.

#[test]
fn variable_declarations_suppress_type_defaults() {
    let mut m = Model::new(Some("decls"));
    m.variable(Some("x"), VarSpec::default());
    m.variable(Some("y"), VarSpec::integer().lb(1.0).ub(10.0).init(3.0));
    m.variable(Some("z"), VarSpec::binary().ub(0.5));
    let opts = OptmodelOptions { header : true, solve : None, parse : false };
    assert_eq!(
        m.to_optmodel(&opts),
        "proc optmodel;\n\
         var x;\n\
         var y integer >= 1 <= 10 init 3;\n\
         var z binary <= 0.5;\n\
         quit;"
    );
}

#[test]
fn parameter_group_workspace_script() {
    let mut w = Model::new(Some("w"));
    let mg = w.add_parameters(vec![Domain::range(1, 5), Domain::range(1, 3)], Some("m"));
    mg.set_init(&mut w, 0.0);
    mg.set(&mut w, [1i64, 1], 1.0);
    mg.set(&mut w, [4i64, 1], 1.0);
    let iset = w.set_with(Some("ISET"), SetValue::list([1i64, 4]));
    let cd = CreateData::new("example")
        .key(&["i", "j"])
        .source(vec![IterDomain::from(iset), IterDomain::list([1i64, 2])])
        .column(DataColumn::Name("m".to_string()));
    w.create_data(cd);
    assert_eq!(
        w.to_session_code(),
        "proc optmodel;\n\
         \x20\x20\x20num m {1..5, 1..3} init 0;\n\
         \x20\x20\x20m[1, 1] = 1;\n\
         \x20\x20\x20m[4, 1] = 1;\n\
         \x20\x20\x20set ISET = {1,4};\n\
         \x20\x20\x20create data example from [i j] = {{ISET,{1,2}}} m;\n\
         quit;"
    );
}

#[test]
fn group_bounds_and_member_overrides() {
    let mut m = Model::new(Some("bounds"));
    let x = m.add_variables(vec![Domain::list([0i64, 1])], Some("x"), VarSpec::default());
    x.set_bounds(&mut m, None, Some(2.0));
    x.set_bounds(&mut m, Some(1.0), None);
    x.member(&m, [0i64]).unwrap().set_bounds(&mut m, Some(5.0), None);
    x.member(&m, [1i64]).unwrap().set_bounds(&mut m, None, Some(10.0));
    let opts = OptmodelOptions { header : false, solve : None, parse : false };
    assert_eq!(
        m.to_optmodel(&opts),
        "var x {{0,1}} >= 1 <= 2;\n\
         x[0].lb = 5;\n\
         x[1].ub = 10;\n"
    );
}

#[test]
fn member_init_overrides_are_emitted() {
    let mut m = Model::new(Some("inits"));
    let x = m.add_variables(
        vec![Domain::list([0i64, 1])],
        Some("x"),
        VarSpec::default().init(1.0),
    );
    x.member(&m, [0i64]).unwrap().set_init(&mut m, Some(5.0));
    let opts = OptmodelOptions { header : false, solve : None, parse : false };
    assert_eq!(
        m.to_optmodel(&opts),
        "var x {{0,1}} init 1;\n\
         x[0] = 5;\n"
    );
}

#[test]
fn abstract_groups_render_with_iterators() {
    let mut m = Model::new(Some("abs"));
    let nodes = m.set_with(Some("NODES"), SetValue::range(1i64, 5i64));
    let x = m.add_variables(vec![Domain::from(nodes)], Some("x"), VarSpec::default());
    m.add_constraints(vec![Domain::from(nodes)], Some("cap"), |m, key| {
        let xi = x.at(m, key.to_vec())?;
        xi.le(10.0)
    })
    .unwrap();
    let opts = OptmodelOptions { header : false, solve : None, parse : false };
    assert_eq!(
        m.to_optmodel(&opts),
        "set NODES = 1..5;\n\
         var x {{NODES}};\n\
         con cap {o1 in NODES} : x[o1] <= 10;\n"
    );
}

#[test]
fn sum_with_too_many_filters_is_refused() {
    let mut m = Model::new(Some("arity"));
    let s = m.set_with(Some("S"), SetValue::range(1i64, 3i64));
    let x = m.add_variables(vec![Domain::from(s)], Some("x"), VarSpec::default());
    assert!(matches!(
        x.sum(&mut m, &[Filter::All, Filter::All]),
        Err(Error::KeyNotFound { .. })
    ));
}

#[test]
fn quantified_sum_renders_once_per_reference() {
    let mut m = Model::new(Some("sums"));
    let s = m.set_with(Some("S"), SetValue::range(1i64, 3i64));
    let x = m.add_variables(vec![Domain::from(s)], Some("x"), VarSpec::default());
    let total = x.sum(&mut m, &[Filter::All]).unwrap();
    m.set_objective(Some("obj"), Sense::Minimize, total);
    let opts = OptmodelOptions { header : false, solve : None, parse : false };
    assert_eq!(
        m.to_optmodel(&opts),
        "set S = 1..3;\n\
         var x {{S}};\n\
         min obj = sum {o1 in S} (x[o1]);\n"
    );
}

#[test]
fn loops_and_branches_nest_with_three_space_indent() {
    let mut w = Model::new(Some("flow"));
    let r = w.parameter(Some("r"));
    r.set_value(&mut w, 0.0);
    w.for_loop(vec![IterDomain::range(1i64, 2i64)], |m, its| {
        let i = its[0];
        m.if_else(
            Condition::eq(i, 1i64),
            |m| {
                m.literal("put 'one';");
                Ok(())
            },
            |m| {
                m.literal("put 'other';");
                Ok(())
            },
        )
    })
    .unwrap();
    assert_eq!(
        w.to_session_code(),
        "proc optmodel;\n\
         \x20\x20\x20num r = 0;\n\
         \x20\x20\x20for {o1 in 1..2} do;\n\
         \x20\x20\x20\x20\x20\x20if o1 = 1 then do;\n\
         \x20\x20\x20\x20\x20\x20\x20\x20\x20put 'one';\n\
         \x20\x20\x20\x20\x20\x20end;\n\
         \x20\x20\x20\x20\x20\x20else do;\n\
         \x20\x20\x20\x20\x20\x20\x20\x20\x20put 'other';\n\
         \x20\x20\x20\x20\x20\x20end;\n\
         \x20\x20\x20end;\n\
         quit;"
    );
}

#[test]
fn switch_chains_render_else_if_cases() {
    let mut w = Model::new(Some("sw"));
    let p = w.parameter(Some("p"));
    w.switch()
        .case(Condition::lt(p, 1i64), |m| {
            m.literal("p = 1;");
            Ok(())
        })
        .unwrap()
        .case(Condition::lt(p, 2i64), |m| {
            m.literal("p = 2;");
            Ok(())
        })
        .unwrap()
        .default(|m| {
            m.literal("p = 3;");
            Ok(())
        })
        .unwrap();
    assert_eq!(
        w.to_session_code(),
        "proc optmodel;\n\
         \x20\x20\x20num p;\n\
         \x20\x20\x20if p < 1 then do;\n\
         \x20\x20\x20\x20\x20\x20p = 1;\n\
         \x20\x20\x20end;\n\
         \x20\x20\x20else if p < 2 then do;\n\
         \x20\x20\x20\x20\x20\x20p = 2;\n\
         \x20\x20\x20end;\n\
         \x20\x20\x20else do;\n\
         \x20\x20\x20\x20\x20\x20p = 3;\n\
         \x20\x20\x20end;\n\
         quit;"
    );
}

#[test]
fn data_statements_render_their_clauses() {
    let mut w = Model::new(Some("data"));
    let s = w.set(Some("S"));
    let rd = ReadData::new("cas_table")
        .target(s)
        .key(&["_N_"])
        .column(ReadColumn::Renamed {
            target : "v".to_string(),
            column : "col1".to_string(),
        });
    w.read_data(rd);
    assert_eq!(
        w.to_session_code(),
        "proc optmodel;\n\
         \x20\x20\x20set S;\n\
         \x20\x20\x20read data cas_table into S=[_N_] v=col1;\n\
         quit;"
    );
}

#[test]
fn solve_drop_and_fix_statements() {
    let mut m = Model::new(Some("stmts"));
    let x = m.variable(Some("x"), VarSpec::default());
    let c = m.constraint(Some("c"), x.le(4.0).unwrap());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());
    m.drop_constraints(&[c]);
    m.solve(&SolveOptions::with_solver("lp").option("maxtime", "60"));
    m.restore_constraints(&[c]);
    m.fix(x, 2.0);
    m.unfix(x);
    let opts = OptmodelOptions { header : false, solve : None, parse : false };
    assert_eq!(
        m.to_optmodel(&opts),
        "var x;\n\
         con c : x <= 4;\n\
         min obj = x;\n\
         drop c;\n\
         solve with lp / maxtime=60;\n\
         restore c;\n\
         fix x = 2;\n\
         unfix x;\n"
    );
}

#[test]
fn solve_mode_appends_solve_and_parse_lines() {
    let mut m = Model::new(Some("solve"));
    let x = m.variable(Some("x"), VarSpec::default());
    m.set_objective(Some("obj"), Sense::Minimize, x.into_expr());
    let opts = OptmodelOptions {
        header : true,
        solve : Some(SolveOptions::default()),
        parse : true,
    };
    let first = m.to_optmodel(&opts);
    assert_eq!(
        first,
        "proc optmodel;\n\
         var x;\n\
         min obj = x;\n\
         solve;\n\
         create data solution from [i]= {1.._NVAR_} var=_VAR_.name value=_VAR_ \
         lb=_VAR_.lb ub=_VAR_.ub rc=_VAR_.rc;\n\
         create data dual from [j] = {1.._NCON_} con=_CON_.name value=_CON_.body \
         dual=_CON_.dual;\n\
         quit;"
    );
    // emission is read only; a second pass gives identical bytes
    assert_eq!(m.to_optmodel(&opts), first);
}
