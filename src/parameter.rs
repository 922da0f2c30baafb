//! Server-side parameters and parameter groups.
//!
//! A parameter is a named value that lives in the generated code; its client
//! side value is only a bookkeeping convenience. Assignments issued inside a
//! statement context become assignment statements.

use indexmap::IndexMap;

use crate::expr::{Expr, IntoExpr};
use crate::model::Model;
use crate::set::{Domain, IndexKey};
use crate::utils::quote;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    Num,
    Str,
}

impl ParamType {
    pub(crate) fn sas(&self) -> &'static str {
        match self {
            ParamType::Num => "num",
            ParamType::Str => "str",
        }
    }
}

pub(crate) struct ParamData {
    pub name : String,
    pub ptype : ParamType,
    pub init : Option<Expr>,
    pub assign : Option<Expr>,
    pub str_value : Option<String>,
    pub value : Option<f64>,
    /// Owning group and key for shadow members.
    pub parent : Option<(usize, Vec<IndexKey>)>,
}

impl ParamData {
    pub(crate) fn new(name : String, ptype : ParamType) -> ParamData {
        ParamData {
            name,
            ptype,
            init : None,
            assign : None,
            str_value : None,
            value : None,
            parent : None,
        }
    }

    /// `num NAME [init v | = v];`. Group members declare nothing.
    pub(crate) fn defn(&self, m : &Model) -> Option<String> {
        if self.parent.is_some() {
            return None;
        }
        let mut s = format!("{} {}", self.ptype.sas(), self.name);
        if let Some(sv) = &self.str_value {
            s.push_str(&format!(" = {}", quote(sv)));
        }
        else if let Some(e) = &self.assign {
            s.push_str(&format!(" = {}", e.expr_string(m)));
        }
        else if let Some(e) = &self.init {
            s.push_str(&format!(" init {}", e.expr_string(m)));
        }
        s.push(';');
        Some(s)
    }
}

/// Handle to a parameter owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parameter(pub(crate) usize);

impl Parameter {
    pub fn name(self, m : &Model) -> &str {
        &m.params[self.0].name
    }

    pub(crate) fn expr_name(self, m : &Model) -> String {
        let data = &m.params[self.0];
        if let Some((gid, key)) = &data.parent {
            let ks : Vec<String> = key.iter().map(|k| k.sas(m)).collect();
            format!("{}[{}]", m.pargroups[*gid].name, ks.join(", "))
        }
        else {
            data.name.clone()
        }
    }

    pub fn value(self, m : &Model) -> Option<f64> {
        m.params[self.0].value
    }

    pub fn set_init(self, m : &mut Model, v : impl IntoExpr) {
        let e = v.into_expr();
        let data = &mut m.params[self.0];
        data.value = if e.is_constant() { Some(e.constant_value()) } else { None };
        data.init = Some(e);
    }

    /// Assign a string value to a `str` parameter.
    pub fn set_str(self, m : &mut Model, v : &str) {
        if m.in_container() {
            let line = format!("{} = {};", self.expr_name(m), quote(v));
            m.push_line(line);
        }
        else {
            m.params[self.0].str_value = Some(v.to_string());
        }
    }

    /// Assign a value. Inside an open container this appends an assignment
    /// statement; at the model root it becomes the `= value` part of the
    /// declaration.
    pub fn set_value(self, m : &mut Model, v : impl IntoExpr) {
        let e = v.into_expr();
        let num = if e.is_constant() { Some(e.constant_value()) } else { e.value(m) };
        if m.in_container() {
            let line = format!("{} = {};", self.expr_name(m), e.expr_string(m));
            m.push_line(line);
            m.params[self.0].value = num;
        }
        else {
            let data = &mut m.params[self.0];
            data.assign = Some(e);
            data.value = num;
        }
    }
}

//======================================================
// Parameter groups
//======================================================

pub(crate) struct ParamGroupData {
    pub name : String,
    pub ptype : ParamType,
    pub domains : Vec<Domain>,
    pub init : Option<Expr>,
    pub assign : Option<Expr>,
    /// Lazily created members, keyed by their (possibly abstract) index.
    pub shadows : IndexMap<Vec<IndexKey>, usize>,
}

impl ParamGroupData {
    /// `num NAME {D1, D2} [init v | = v];` with bare set names in the index
    /// list.
    pub(crate) fn defn(&self, m : &Model) -> String {
        let doms : Vec<String> = self.domains.iter().map(|d| d.sas_param(m)).collect();
        let mut s = format!("{} {} {{{}}}", self.ptype.sas(), self.name, doms.join(", "));
        if let Some(e) = &self.assign {
            s.push_str(&format!(" = {}", e.expr_string(m)));
        }
        else if let Some(e) = &self.init {
            s.push_str(&format!(" init {}", e.expr_string(m)));
        }
        s.push(';');
        s
    }
}

/// Handle to a parameter group owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParameterGroup(pub(crate) usize);

impl ParameterGroup {
    pub fn name(self, m : &Model) -> &str {
        &m.pargroups[self.0].name
    }

    pub fn set_init(self, m : &mut Model, v : impl IntoExpr) {
        m.pargroups[self.0].init = Some(v.into_expr());
    }

    pub fn set_assign(self, m : &mut Model, v : impl IntoExpr) {
        m.pargroups[self.0].assign = Some(v.into_expr());
    }

    /// Member addressed by a key tuple; created and cached on first use.
    pub fn at<K : Into<IndexKey>, I : IntoIterator<Item = K>>(
        self,
        m : &mut Model,
        key : I,
    ) -> Parameter {
        let key : Vec<IndexKey> = key.into_iter().map(|k| k.into()).collect();
        if let Some(&pid) = m.pargroups[self.0].shadows.get(&key) {
            return Parameter(pid);
        }
        let name = m.pargroups[self.0].name.clone();
        let ptype = m.pargroups[self.0].ptype;
        let mut data = ParamData::new(name, ptype);
        data.parent = Some((self.0, key.clone()));
        let pid = m.params.len();
        m.params.push(data);
        m.pargroups[self.0].shadows.insert(key, Parameter(pid).0);
        Parameter(pid)
    }

    /// Assign to one member. The assignment is recorded as a statement; a
    /// fully concrete key also records the value client side.
    pub fn set<K : Into<IndexKey>, I : IntoIterator<Item = K>>(
        self,
        m : &mut Model,
        key : I,
        v : impl IntoExpr,
    ) {
        let member = self.at(m, key);
        let e = v.into_expr();
        let line = format!("{} = {};", member.expr_name(m), e.expr_string(m));
        m.push_line(line);
        let concrete = m.params[member.0]
            .parent
            .as_ref()
            .map(|(_, k)| k.iter().all(|i| !i.is_abstract()))
            .unwrap_or(false);
        if concrete {
            m.params[member.0].value =
                if e.is_constant() { Some(e.constant_value()) } else { e.value(m) };
        }
    }
}
