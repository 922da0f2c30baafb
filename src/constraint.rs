//! Linear constraints.

use crate::expr::{Atom, Expr, ExprKey};
use crate::model::Model;
use crate::set::IndexKey;
use crate::utils::fmt_num;
use crate::variable::Variable;

/// Direction of a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Le,
    Ge,
    Eq,
}

impl Direction {
    pub(crate) fn sas(&self) -> &'static str {
        match self {
            Direction::Le => "<=",
            Direction::Ge => ">=",
            Direction::Eq => "=",
        }
    }

    pub(crate) fn mps(&self) -> &'static str {
        match self {
            Direction::Le => "L",
            Direction::Ge => "G",
            Direction::Eq => "E",
        }
    }
}

pub(crate) struct ConData {
    pub name : String,
    /// Body with the right hand side folded into the constant term.
    pub expr : Expr,
    pub direction : Direction,
    pub range : f64,
    /// Owning group and key for group members.
    pub parent : Option<(usize, Vec<IndexKey>)>,
    pub dual : Option<f64>,
}

impl ConData {
    /// Right hand side, the negated constant term.
    pub(crate) fn rhs(&self) -> f64 {
        -self.expr.constant_value()
    }

    /// Body and relation without the `con NAME :` prefix.
    pub(crate) fn body_defn(&self, m : &Model) -> String {
        let body = self.expr.body_string(m);
        if self.range != 0.0 {
            let lo = self.rhs();
            format!("{} <= {} <= {}", fmt_num(lo), body, fmt_num(lo + self.range))
        }
        else {
            format!("{} {} {}", body, self.direction.sas(), fmt_num(self.rhs()))
        }
    }

    pub(crate) fn defn(&self, m : &Model) -> String {
        format!("con {} : {};", self.name, self.body_defn(m))
    }
}

/// Handle to a constraint owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Constraint(pub(crate) usize);

impl Constraint {
    pub fn name(self, m : &Model) -> &str {
        &m.cons[self.0].name
    }

    pub fn dual(self, m : &Model) -> Option<f64> {
        m.cons[self.0].dual
    }

    pub fn set_dual(self, m : &mut Model, v : f64) {
        m.cons[self.0].dual = Some(v);
    }

    /// Value of the body under current variable values, constant excluded.
    pub fn value(self, m : &Model) -> Option<f64> {
        let data = &m.cons[self.0];
        let v = data.expr.value(m)?;
        Some(v - data.expr.constant_value())
    }

    /// Replace the right hand side.
    pub fn set_rhs(self, m : &mut Model, v : f64) {
        let e = &mut m.cons[self.0].expr;
        let c = e.constant_value();
        e.add_term(ExprKey::Const, -v - c);
    }

    /// Coefficient of a variable in the body.
    pub fn coefficient(self, m : &Model, v : Variable) -> f64 {
        m.cons[self.0]
            .expr
            .terms
            .get(&ExprKey::Lin(Atom::Var(v)))
            .copied()
            .unwrap_or(0.0)
    }
}
