//! Remote session mediation.
//!
//! The model never talks to a solver directly. A [Session] implementation
//! uploads tables and runs generated code; the mediator here picks the
//! submission format, rewrites identifiers that exceed the remote name
//! limit, and maps returned tables back onto the model.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::format::optmodel::OptmodelOptions;
use crate::model::Model;
use crate::statement::SolveOptions;
use crate::variable::VarType;
use crate::{Error, Result};

/// One cell of a tabular payload or result.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Str(String),
    Num(f64),
    Empty,
}

impl Cell {
    /// String cell; the empty string collapses to [Cell::Empty].
    pub fn s(v : &str) -> Cell {
        if v.is_empty() {
            Cell::Empty
        }
        else {
            Cell::Str(v.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; numeric strings parse through.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Cell::Num(v) => Some(*v),
            Cell::Str(s) => s.trim().parse().ok(),
            Cell::Empty => None,
        }
    }
}

/// Named, column-labeled grid of cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub name : String,
    pub columns : Vec<String>,
    pub rows : Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name : &str, columns : &[&str]) -> Table {
        Table {
            name : name.to_string(),
            columns : columns.iter().map(|c| c.to_string()).collect(),
            rows : Vec::new(),
        }
    }

    pub fn column_index(&self, name : &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row : usize, column : &str) -> Option<&Cell> {
        let c = self.column_index(column)?;
        self.rows.get(row)?.get(c)
    }
}

/// What a session hands back after a run.
#[derive(Clone, Debug)]
pub struct RunResponse {
    pub status : String,
    pub tables : Vec<Table>,
    pub log : String,
}

impl RunResponse {
    pub fn table(&self, name : &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    Lp,
    Milp,
}

/// The transport seam. Implementations live outside this crate; tests use a
/// scripted mock.
pub trait Session {
    /// Upload a table, returning its remote handle.
    fn upload_table(&mut self, table : &Table, replace : bool) -> Result<String>;
    fn run_script(&mut self, code : &str) -> Result<RunResponse>;
    fn run_mps(
        &mut self,
        handle : &str,
        ptype : ProblemType,
        options : &[(String, String)],
    ) -> Result<RunResponse>;
}

/// Submission choices of one solve call.
#[derive(Clone, Debug, Default)]
pub struct SolveSettings {
    /// Prefer the MPS table route. Falls back to generated code with a
    /// warning when the model cannot be expressed as MPS.
    pub mps : bool,
    /// Fail instead of falling back when MPS was requested.
    pub force_mps : bool,
    /// Fold a nonzero objective constant into the MPS table.
    pub constant : bool,
    pub solve : SolveOptions,
}

lazy_static! {
    static ref LONG_NAME : Regex = Regex::new(r"[A-Za-z_\d]{32,}").unwrap();
}

/// A long identifier and the short name submitted in its place.
struct NameSub {
    original : String,
    short : String,
    forward : Regex,
    reverse : Regex,
}

impl Model {
    /// Solve through a session: emit, submit, ingest results.
    pub fn solve_with(
        &mut self,
        session : &mut dyn Session,
        settings : &SolveSettings,
    ) -> Result<()> {
        let expressible = !self.has_abstract_components() && self.is_linear();
        let use_mps = settings.mps || settings.force_mps;
        if use_mps && !expressible {
            if settings.force_mps {
                return Err(Error::UnsupportedForMps(
                    self.name.clone(),
                    "MPS forced on a model with abstract or nonlinear content".to_string(),
                ));
            }
            warn!(model = %self.name, "falling back from MPS to generated code");
        }
        let ptype = self.problem_type();
        if use_mps && expressible {
            let mut table = self.to_mps(settings.constant)?;
            let subs = self.table_substitutions(&table);
            apply_to_table(&mut table, &subs);
            let handle = session.upload_table(&table, true)?;
            let mut resp = session.run_mps(&handle, ptype, &settings.solve.options)?;
            reverse_response(&mut resp, &subs);
            self.ingest(&resp, ptype)
        }
        else {
            let opts = OptmodelOptions {
                header : true,
                solve : Some(settings.solve.clone()),
                parse : true,
            };
            let code = self.to_optmodel(&opts);
            let (code, subs) = self.code_substitutions(&code);
            let mut resp = session.run_script(&code)?;
            reverse_response(&mut resp, &subs);
            self.ingest(&resp, ptype)
        }
    }

    /// Submit the statement tree as a workspace script and ingest whatever
    /// result tables come back.
    pub fn submit_with(&mut self, session : &mut dyn Session) -> Result<RunResponse> {
        let code = self.to_session_code();
        let (code, subs) = self.code_substitutions(&code);
        let mut resp = session.run_script(&code)?;
        reverse_response(&mut resp, &subs);
        let ptype = self.problem_type();
        self.ingest(&resp, ptype)?;
        Ok(resp)
    }

    pub fn problem_type(&self) -> ProblemType {
        if self.vars.iter().any(|v| v.vartype != VarType::Cont) {
            ProblemType::Milp
        }
        else {
            ProblemType::Lp
        }
    }

    fn code_substitutions(&mut self, code : &str) -> (String, Vec<NameSub>) {
        let subs = self.collect_subs(code);
        let mut out = code.to_string();
        for sub in &subs {
            out = sub.forward.replace_all(&out, sub.short.as_str()).into_owned();
        }
        (out, subs)
    }

    fn table_substitutions(&mut self, table : &Table) -> Vec<NameSub> {
        let mut text = String::new();
        for row in &table.rows {
            for cell in row {
                if let Cell::Str(s) = cell {
                    text.push_str(s);
                    text.push('\n');
                }
            }
        }
        self.collect_subs(&text)
    }

    fn collect_subs(&mut self, text : &str) -> Vec<NameSub> {
        let mut subs : Vec<NameSub> = Vec::new();
        for mat in LONG_NAME.find_iter(text) {
            let name = mat.as_str();
            if subs.iter().any(|s| s.original == name) {
                continue;
            }
            let short = self.auto_name();
            let fwd = Regex::new(&format!(r"\b{}\b", regex::escape(name)));
            let rev = Regex::new(&format!(r"\b{}\b", short));
            if let (Ok(forward), Ok(reverse)) = (fwd, rev) {
                warn!(name, %short, "identifier over the remote name limit, substituted");
                subs.push(NameSub { original : name.to_string(), short, forward, reverse });
            }
        }
        subs
    }

    fn ingest(&mut self, resp : &RunResponse, ptype : ProblemType) -> Result<()> {
        if resp.status != "OK" {
            return Err(Error::RemoteExecution {
                status : resp.status.clone(),
                log : resp.log.clone(),
            });
        }
        if let Some(t) = resp.table("solution") {
            for i in 0..t.rows.len() {
                let name = match t.cell(i, "var").and_then(|c| c.as_str()) {
                    Some(n) => n.to_string(),
                    None => continue,
                };
                if let Some(v) = t.cell(i, "value").and_then(|c| c.as_num()) {
                    self.set_variable_value(&name, v);
                }
                if ptype == ProblemType::Lp {
                    if let Some(v) = t.cell(i, "rc").and_then(|c| c.as_num()) {
                        self.set_variable_rc(&name, v);
                    }
                }
            }
        }
        if ptype == ProblemType::Lp {
            if let Some(t) = resp.table("dual") {
                for i in 0..t.rows.len() {
                    let name = match t.cell(i, "con").and_then(|c| c.as_str()) {
                        Some(n) => n.to_string(),
                        None => continue,
                    };
                    if let Some(v) = t.cell(i, "dual").and_then(|c| c.as_num()) {
                        self.set_constraint_dual(&name, v);
                    }
                }
            }
        }
        if let Some(t) = resp.table("solutionSummary") {
            for i in 0..t.rows.len() {
                let label = t.cell(i, "Label").and_then(|c| c.as_str()).unwrap_or("");
                match label {
                    "Objective Value" => {
                        if let Some(v) = t.cell(i, "Value").and_then(|c| c.as_num()) {
                            self.objective_value = Some(v);
                        }
                    },
                    "Solution Status" => {
                        if let Some(s) = t.cell(i, "Value").and_then(|c| c.as_str()) {
                            if s != "OPTIMAL" {
                                warn!(status = s, "solver finished without an optimal solution");
                            }
                            self.solution_status = Some(s.to_string());
                        }
                    },
                    _ => {},
                }
            }
        }
        Ok(())
    }
}

fn apply_to_table(table : &mut Table, subs : &[NameSub]) {
    for row in &mut table.rows {
        for cell in row {
            if let Cell::Str(s) = cell {
                for sub in subs {
                    *s = sub.forward.replace_all(s, sub.short.as_str()).into_owned();
                }
            }
        }
    }
}

fn reverse_response(resp : &mut RunResponse, subs : &[NameSub]) {
    if subs.is_empty() {
        return;
    }
    for table in &mut resp.tables {
        for row in &mut table.rows {
            for cell in row {
                if let Cell::Str(s) = cell {
                    for sub in subs {
                        *s = sub.reverse.replace_all(s, sub.original.as_str()).into_owned();
                    }
                }
            }
        }
    }
}
