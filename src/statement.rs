//! The statement tree.
//!
//! Statements capture their text at the moment they are issued; entity
//! declarations nested inside containers render at emission time like any
//! other declaration. Containers (loops, if/else cases) own their children
//! as ordered entries.

use crate::expr::Expr;
use crate::model::{Entry, Model};
use crate::set::{IterDomain, Set, SetIterator};

pub(crate) struct StmtData {
    pub kind : StmtKind,
}

pub(crate) enum StmtKind {
    /// A single pre-rendered statement (assignment, print, solve, ...).
    Line(String),
    /// `for {<header>} do;` ... `end;`
    For { header : String, children : Vec<Entry> },
    /// One branch of an if/else chain.
    Case { keyword : &'static str, cond : Option<String>, children : Vec<Entry> },
    /// An if/else chain, pointing at its Case statements.
    IfElse { cases : Vec<usize> },
}

impl StmtKind {
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Entry>> {
        match self {
            StmtKind::For { children, .. } => Some(children),
            StmtKind::Case { children, .. } => Some(children),
            _ => None,
        }
    }
}

//======================================================
// Solve options
//======================================================

/// Options of a `solve` statement.
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    /// `with SOLVER`
    pub with : Option<String>,
    /// `relaxint`
    pub relaxint : bool,
    /// `obj (o1 o2)`
    pub obj : Vec<String>,
    /// warm start from current variable values
    pub primalin : bool,
    /// plain `key=value` options after the slash
    pub options : Vec<(String, String)>,
}

impl SolveOptions {
    pub fn with_solver(solver : &str) -> SolveOptions {
        SolveOptions { with : Some(solver.to_string()), ..Default::default() }
    }

    pub fn option(mut self, key : &str, value : &str) -> SolveOptions {
        self.options.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn render(&self) -> String {
        let mut s = String::from("solve");
        if let Some(w) = &self.with {
            s.push_str(&format!(" with {}", w));
        }
        if self.relaxint {
            s.push_str(" relaxint");
        }
        if !self.obj.is_empty() {
            s.push_str(&format!(" obj ({})", self.obj.join(" ")));
        }
        let mut pos : Vec<String> =
            self.options.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        if self.primalin {
            pos.push("primalin".to_string());
        }
        if !pos.is_empty() {
            s.push_str(&format!(" / {}", pos.join(" ")));
        }
        s.push(';');
        s
    }
}

//======================================================
// Data statements
//======================================================

/// One output column of a `create data` statement.
pub enum DataColumn {
    /// A bare column, typically a parameter or group name.
    Name(String),
    /// `name=(expr)`
    Expr { name : String, expr : Expr },
    /// `col(nameexpr)=(expr)`, for computed column names.
    ColExpr { name : Expr, expr : Expr },
    /// `{i in S} < expr >`, one column per set element.
    Indexed { iters : Vec<SetIterator>, expr : Expr },
}

/// Builder for `create data TABLE from [keys] = {sources} columns;`.
pub struct CreateData {
    pub(crate) table : String,
    pub(crate) key : Vec<String>,
    pub(crate) source : Vec<IterDomain>,
    pub(crate) columns : Vec<DataColumn>,
}

impl CreateData {
    pub fn new(table : &str) -> CreateData {
        CreateData {
            table : table.to_string(),
            key : Vec::new(),
            source : Vec::new(),
            columns : Vec::new(),
        }
    }

    /// Dummy index names of the output table key.
    pub fn key(mut self, names : &[&str]) -> CreateData {
        self.key = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Index sources, rendered as a cross product.
    pub fn source(mut self, doms : Vec<IterDomain>) -> CreateData {
        self.source = doms;
        self
    }

    pub fn column(mut self, c : DataColumn) -> CreateData {
        self.columns.push(c);
        self
    }

    pub(crate) fn render(&self, m : &Model) -> String {
        let mut s = format!("create data {} from ", self.table);
        if !self.key.is_empty() {
            s.push_str(&format!("[{}]", self.key.join(" ")));
        }
        if !self.source.is_empty() {
            if !self.key.is_empty() {
                s.push_str(" = ");
            }
            let src : Vec<String> = self.source.iter().map(|d| d.sas(m)).collect();
            s.push_str(&format!("{{{{{}}}}}", src.join(",")));
        }
        if !self.columns.is_empty() {
            s.push(' ');
            let cols : Vec<String> = self.columns.iter().map(|c| render_column(c, m)).collect();
            s.push_str(&cols.join(" "));
        }
        s.push(';');
        s
    }
}

fn render_column(c : &DataColumn, m : &Model) -> String {
    match c {
        DataColumn::Name(n) => n.clone(),
        DataColumn::Expr { name, expr } => {
            format!("{}=({})", name, expr.expr_string(m))
        },
        DataColumn::ColExpr { name, expr } => {
            format!("col({})=({})", name.expr_string(m), expr.expr_string(m))
        },
        DataColumn::Indexed { iters, expr } => {
            let bindings = m.iter_bindings(iters);
            format!("{} < {} >", bindings, expr.expr_string(m))
        },
    }
}

/// One input column of a `read data` statement.
pub enum ReadColumn {
    /// Target named like its source column.
    Plain(String),
    /// `target=column`
    Renamed { target : String, column : String },
    /// `target=col(expr)`, for computed source column names.
    Computed { target : String, column : Expr },
    /// `{j in S} < ... >`, one read per set element.
    Indexed { iters : Vec<SetIterator>, inner : Box<ReadColumn> },
}

/// Builder for `read data TABLE into TARGET=[keys] columns;`.
pub struct ReadData {
    pub(crate) table : String,
    pub(crate) target : Option<Set>,
    pub(crate) key : Vec<String>,
    pub(crate) columns : Vec<ReadColumn>,
}

impl ReadData {
    pub fn new(table : &str) -> ReadData {
        ReadData {
            table : table.to_string(),
            target : None,
            key : Vec::new(),
            columns : Vec::new(),
        }
    }

    /// Set populated by the table key.
    pub fn target(mut self, set : Set) -> ReadData {
        self.target = Some(set);
        self
    }

    /// Key columns, `_N_` for the observation number.
    pub fn key(mut self, names : &[&str]) -> ReadData {
        self.key = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn column(mut self, c : ReadColumn) -> ReadData {
        self.columns.push(c);
        self
    }

    pub(crate) fn render(&self, m : &Model) -> String {
        let mut s = format!("read data {} into ", self.table);
        if let Some(t) = self.target {
            s.push_str(t.name(m));
        }
        if self.target.is_some() && !self.key.is_empty() {
            s.push('=');
        }
        if !self.key.is_empty() {
            s.push_str(&format!("[{}]", self.key.join(" ")));
        }
        if !self.columns.is_empty() {
            s.push(' ');
            let cols : Vec<String> =
                self.columns.iter().map(|c| render_read_column(c, m)).collect();
            s.push_str(&cols.join(" "));
        }
        s.push(';');
        s
    }
}

fn render_read_column(c : &ReadColumn, m : &Model) -> String {
    match c {
        ReadColumn::Plain(t) => t.clone(),
        ReadColumn::Renamed { target, column } => format!("{}={}", target, column),
        ReadColumn::Computed { target, column } => {
            format!("{}=col({})", target, column.expr_string(m))
        },
        ReadColumn::Indexed { iters, inner } => {
            let bindings = m.iter_bindings(iters);
            format!("{} < {} >", bindings, render_read_column(inner, m))
        },
    }
}

/// Helper for rendering assignment statements.
pub(crate) fn render_assign(
    m : &Model,
    keyword : Option<&str>,
    target : &Expr,
    value : &Expr,
) -> String {
    let kw = keyword.map(|k| format!("{} ", k)).unwrap_or_default();
    format!("{}{} = {};", kw, target.expr_string(m), value.expr_string(m))
}

/// Helper for print and put statements.
pub(crate) fn render_items(m : &Model, keyword : &str, items : &[Expr]) -> String {
    let parts : Vec<String> = items.iter().map(|e| e.expr_string(m)).collect();
    format!("{} {};", keyword, parts.join(" "))
}
