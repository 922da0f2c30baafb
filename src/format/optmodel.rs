//! PROC OPTMODEL text generation.
//!
//! Two layouts share one renderer. Solve mode wraps a model in
//! `proc optmodel; ... quit;` with every component at zero indent, an
//! automatic `solve` statement and optional result-capture lines. Session
//! mode renders the statement tree with three spaces of indent per nesting
//! level. Emission reads the model and nothing else; generating twice gives
//! identical bytes.

use crate::model::{Entry, Item, Model};
use crate::set::Set;
use crate::statement::{SolveOptions, StmtKind};

/// Options of a solve-mode emission.
#[derive(Clone, Debug)]
pub struct OptmodelOptions {
    /// Wrap in `proc optmodel;` / `quit;`.
    pub header : bool,
    /// Automatic solve statement; `None` suppresses it.
    pub solve : Option<SolveOptions>,
    /// Append the result-capture `create data` lines.
    pub parse : bool,
}

impl Default for OptmodelOptions {
    fn default() -> OptmodelOptions {
        OptmodelOptions { header : true, solve : Some(SolveOptions::default()), parse : false }
    }
}

impl Model {
    /// Solve-mode text for this model.
    pub fn to_optmodel(&self, opts : &OptmodelOptions) -> String {
        let mut s = String::new();
        if opts.header {
            s.push_str("proc optmodel;\n");
        }
        let mut lines = Vec::new();
        for e in self.sorted_entries() {
            entry_lines(self, e, 0, &mut lines);
        }
        for l in lines {
            s.push_str(&l);
            s.push('\n');
        }
        if let Some(solve) = &opts.solve {
            s.push_str(&solve.render());
            s.push('\n');
        }
        if opts.parse {
            s.push_str(
                "create data solution from [i]= {1.._NVAR_} var=_VAR_.name \
                 value=_VAR_ lb=_VAR_.lb ub=_VAR_.ub rc=_VAR_.rc;\n",
            );
            s.push_str(
                "create data dual from [j] = {1.._NCON_} con=_CON_.name \
                 value=_CON_.body dual=_CON_.dual;\n",
            );
        }
        if opts.header {
            s.push_str("quit;");
        }
        s
    }

    /// Session-mode text: the statement tree as a workspace script.
    pub fn to_session_code(&self) -> String {
        let mut lines = Vec::new();
        for e in self.sorted_entries() {
            entry_lines(self, e, 1, &mut lines);
        }
        let mut s = String::from("proc optmodel;\n");
        for l in lines {
            s.push_str(&l);
            s.push('\n');
        }
        s.push_str("quit;");
        s
    }
}

fn pad(indent : usize) -> String {
    " ".repeat(3 * indent)
}

fn entry_lines(m : &Model, e : Entry, indent : usize, out : &mut Vec<String>) {
    let p = pad(indent);
    match e.item {
        Item::Set(i) => out.push(format!("{}{}", p, Set(i).defn(m))),
        Item::Param(i) => {
            if let Some(d) = m.params[i].defn(m) {
                out.push(format!("{}{}", p, d));
            }
        },
        Item::ParamGroup(i) => out.push(format!("{}{}", p, m.pargroups[i].defn(m))),
        Item::Var(i) => out.push(format!("{}{}", p, m.vars[i].defn())),
        Item::VarGroup(i) => {
            out.push(format!("{}{}", p, m.vargroups[i].defn(m)));
            for l in m.vargroups[i].member_defn(m) {
                out.push(format!("{}{}", p, l));
            }
        },
        Item::ImpVar(i) => {
            for l in m.impvars[i].defn(m) {
                out.push(format!("{}{}", p, l));
            }
        },
        Item::Con(i) => out.push(format!("{}{}", p, m.cons[i].defn(m))),
        Item::ConGroup(i) => {
            for l in m.congroups[i].defn(m) {
                out.push(format!("{}{}", p, l));
            }
        },
        Item::Objective => {
            if let Some(obj) = &m.objective {
                out.push(format!(
                    "{}{} {} = {};",
                    p,
                    obj.sense.sas(),
                    obj.name,
                    obj.expr.expr_string(m)
                ));
            }
        },
        Item::Stmt(s) => stmt_lines(m, s, indent, out),
    }
}

fn stmt_lines(m : &Model, sid : usize, indent : usize, out : &mut Vec<String>) {
    let p = pad(indent);
    match &m.stmts[sid].kind {
        StmtKind::Line(l) => out.push(format!("{}{}", p, l)),
        StmtKind::For { header, children } => {
            out.push(format!("{}for {} do;", p, header));
            block_lines(m, children, indent + 1, out);
            out.push(format!("{}end;", p));
        },
        StmtKind::IfElse { cases } => {
            for &cid in cases {
                if let StmtKind::Case { keyword, cond, children } = &m.stmts[cid].kind {
                    match cond {
                        Some(c) => out.push(format!("{}{} {} then do;", p, keyword, c)),
                        None => out.push(format!("{}{} do;", p, keyword)),
                    }
                    block_lines(m, children, indent + 1, out);
                    out.push(format!("{}end;", p));
                }
            }
        },
        // cases render through their owning chain
        StmtKind::Case { .. } => {},
    }
}

fn block_lines(m : &Model, children : &[Entry], indent : usize, out : &mut Vec<String>) {
    let mut kids = children.to_vec();
    kids.sort_by_key(|e| e.seq);
    for c in kids {
        entry_lines(m, c, indent, out);
    }
}
