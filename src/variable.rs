//! Decision variables.

use crate::expr::{Atom, BoundAttr, Expr, IntoExpr, Relation};
use crate::model::Model;
use crate::set::IndexKey;
use crate::utils::fmt_num;
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarType {
    Cont,
    Int,
    Bin,
}

impl VarType {
    /// Implicit lower bound of the type.
    pub(crate) fn default_lb(&self) -> f64 {
        0.0
    }

    /// Implicit upper bound of the type.
    pub(crate) fn default_ub(&self) -> f64 {
        match self {
            VarType::Bin => 1.0,
            _ => f64::INFINITY,
        }
    }
}

/// Creation-time attributes of a variable or variable group.
#[derive(Clone, Copy, Debug)]
pub struct VarSpec {
    pub vartype : VarType,
    pub lb : Option<f64>,
    pub ub : Option<f64>,
    pub init : Option<f64>,
}

impl Default for VarSpec {
    fn default() -> VarSpec {
        VarSpec { vartype : VarType::Cont, lb : None, ub : None, init : None }
    }
}

impl VarSpec {
    pub fn binary() -> VarSpec {
        VarSpec { vartype : VarType::Bin, ..Default::default() }
    }
    pub fn integer() -> VarSpec {
        VarSpec { vartype : VarType::Int, ..Default::default() }
    }
    pub fn lb(mut self, v : f64) -> VarSpec {
        self.lb = Some(v);
        self
    }
    pub fn ub(mut self, v : f64) -> VarSpec {
        self.ub = Some(v);
        self
    }
    pub fn init(mut self, v : f64) -> VarSpec {
        self.init = Some(v);
        self
    }
}

pub(crate) struct VarData {
    pub name : String,
    pub vartype : VarType,
    pub lb : f64,
    pub ub : f64,
    pub init : Option<f64>,
    pub value : Option<f64>,
    pub rc : Option<f64>,
    /// Owning group and key, when this is a group member or a shadow.
    pub parent : Option<(usize, Vec<IndexKey>)>,
    pub lb_overridden : bool,
    pub ub_overridden : bool,
    pub init_overridden : bool,
}

impl VarData {
    pub(crate) fn new(name : String, spec : &VarSpec) -> VarData {
        let mut lb = spec.lb.unwrap_or_else(|| spec.vartype.default_lb());
        let mut ub = spec.ub.unwrap_or_else(|| spec.vartype.default_ub());
        if spec.vartype == VarType::Bin {
            lb = lb.max(0.0);
            ub = ub.min(1.0);
        }
        VarData {
            name,
            vartype : spec.vartype,
            lb,
            ub,
            init : spec.init,
            value : spec.init,
            rc : None,
            parent : None,
            lb_overridden : false,
            ub_overridden : false,
            init_overridden : false,
        }
    }

    /// `var NAME [binary|integer] [>= lb] [<= ub] [init v];` with the type
    /// defaults suppressed.
    pub(crate) fn defn(&self) -> String {
        let mut s = format!("var {}", self.name);
        match self.vartype {
            VarType::Bin => s.push_str(" binary"),
            VarType::Int => s.push_str(" integer"),
            VarType::Cont => {},
        }
        if self.lb != self.vartype.default_lb() && self.lb != f64::NEG_INFINITY {
            s.push_str(&format!(" >= {}", fmt_num(self.lb)));
        }
        if self.ub != self.vartype.default_ub() && self.ub != f64::INFINITY {
            s.push_str(&format!(" <= {}", fmt_num(self.ub)));
        }
        if let Some(v) = self.init {
            s.push_str(&format!(" init {}", fmt_num(v)));
        }
        s.push(';');
        s
    }
}

/// Handle to a variable owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    pub fn name(self, m : &Model) -> &str {
        &m.vars[self.0].name
    }

    /// Name as it appears inside generated expressions; group members render
    /// through their group with quoted string keys.
    pub(crate) fn expr_name(self, m : &Model) -> String {
        let data = &m.vars[self.0];
        if let Some((gid, key)) = &data.parent {
            let ks : Vec<String> = key.iter().map(|k| k.sas(m)).collect();
            format!("{}[{}]", m.vargroups[*gid].name, ks.join(", "))
        }
        else {
            data.name.clone()
        }
    }

    pub fn value(self, m : &Model) -> Option<f64> {
        m.vars[self.0].value
    }

    pub fn set_value(self, m : &mut Model, v : f64) {
        m.vars[self.0].value = Some(v);
    }

    pub fn reduced_cost(self, m : &Model) -> Option<f64> {
        m.vars[self.0].rc
    }

    pub fn lb(self, m : &Model) -> f64 {
        m.vars[self.0].lb
    }

    pub fn ub(self, m : &Model) -> f64 {
        m.vars[self.0].ub
    }

    /// Change bounds. Inside an open container this emits assignment
    /// statements instead of mutating the declaration.
    pub fn set_bounds(self, m : &mut Model, lb : Option<f64>, ub : Option<f64>) {
        if m.in_container() {
            let name = self.expr_name(m);
            if let Some(v) = lb {
                m.push_line(format!("{}.lb = {};", name, fmt_num(v)));
            }
            if let Some(v) = ub {
                m.push_line(format!("{}.ub = {};", name, fmt_num(v)));
            }
            return;
        }
        let data = &mut m.vars[self.0];
        if let Some(v) = lb {
            data.lb = v;
            data.lb_overridden = true;
        }
        if let Some(v) = ub {
            data.ub = v;
            data.ub_overridden = true;
        }
    }

    pub fn set_init(self, m : &mut Model, init : Option<f64>) {
        let data = &mut m.vars[self.0];
        data.init = init;
        data.init_overridden = true;
        if data.value.is_none() {
            data.value = init;
        }
    }

    /// The `.lb` attribute as a value, usable inside expressions.
    pub fn lb_expr(self) -> Expr {
        Expr::from_atom(Atom::VarAttr(self, BoundAttr::Lb))
    }

    /// The `.ub` attribute as a value, usable inside expressions.
    pub fn ub_expr(self) -> Expr {
        Expr::from_atom(Atom::VarAttr(self, BoundAttr::Ub))
    }

    pub fn le(self, rhs : impl IntoExpr) -> Result<Relation> {
        self.into_expr().le(rhs)
    }

    pub fn ge(self, rhs : impl IntoExpr) -> Result<Relation> {
        self.into_expr().ge(rhs)
    }

    pub fn eq(self, rhs : impl IntoExpr) -> Result<Relation> {
        self.into_expr().eq(rhs)
    }
}
