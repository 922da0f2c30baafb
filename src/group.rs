//! Indexed containers: variable groups, constraint groups and implicit
//! variables.
//!
//! A group is indexed by the cross product of its index domains. With only
//! concrete domains the members are materialized eagerly in index order;
//! one abstract [Set](crate::set::Set) domain switches the whole group to
//! abstract mode, where members exist as lazily created shadows. The mode is
//! a tagged enum so the two paths never rely on runtime downcasts.

use indexmap::IndexMap;
use tracing::warn;

use crate::expr::{Atom, Expr, IntoExpr};
use crate::model::Model;
use crate::set::{Domain, IndexKey, IterDomain, Key, SetIterator};
use crate::utils::fmt_bound;
use crate::variable::{VarType, Variable};
use crate::constraint::Constraint;
use crate::{Error, Result};

/// One position of a member lookup: an exact key or the `*` wildcard.
#[derive(Clone, Debug)]
pub enum Filter {
    Is(Key),
    All,
}

impl From<i64> for Filter {
    fn from(v : i64) -> Filter { Filter::Is(Key::Num(v)) }
}
impl From<&str> for Filter {
    fn from(v : &str) -> Filter { Filter::Is(Key::Str(v.to_string())) }
}

pub(crate) fn domain_to_iter(d : &Domain) -> IterDomain {
    match d {
        Domain::Range(lo, hi) => IterDomain::Range(
            Expr::constant(*lo as f64),
            Expr::constant(*hi as f64),
        ),
        Domain::List(items) => IterDomain::List(items.clone()),
        Domain::Set(s) => IterDomain::Set(*s),
    }
}

fn plain_member_name(m : &Model, name : &str, key : &[IndexKey]) -> String {
    let ks : Vec<String> = key.iter().map(|k| k.plain(m)).collect();
    format!("{}[{}]", name, ks.join(","))
}

//======================================================
// Variable groups
//======================================================

pub(crate) enum VarGroupMode {
    Concrete { members : IndexMap<Vec<Key>, usize> },
    Abstract { shadows : IndexMap<Vec<IndexKey>, usize> },
}

pub(crate) struct VarGroupData {
    pub name : String,
    pub domains : Vec<Domain>,
    pub vartype : VarType,
    pub lb : f64,
    pub ub : f64,
    pub init : Option<f64>,
    pub mode : VarGroupMode,
}

impl VarGroupData {
    /// `var NAME {D1, D2} [binary|integer] [>= lb] [<= ub] [init v];`
    pub(crate) fn defn(&self, m : &Model) -> String {
        let doms : Vec<String> = self.domains.iter().map(|d| d.sas_var(m)).collect();
        let mut s = format!("var {} {{{}}}", self.name, doms.join(", "));
        match self.vartype {
            VarType::Bin => s.push_str(" binary"),
            VarType::Int => s.push_str(" integer"),
            VarType::Cont => {},
        }
        if self.lb != self.vartype.default_lb() && self.lb != f64::NEG_INFINITY {
            s.push_str(&format!(" >= {}", fmt_bound(self.lb)));
        }
        if self.ub != self.vartype.default_ub() && self.ub != f64::INFINITY {
            s.push_str(&format!(" <= {}", fmt_bound(self.ub)));
        }
        if let Some(v) = self.init {
            s.push_str(&format!(" init {}", fmt_bound(v)));
        }
        s.push(';');
        s
    }

    /// Per-member override lines, one per bound or init that differs from
    /// the group default, in member order.
    pub(crate) fn member_defn(&self, m : &Model) -> Vec<String> {
        let mut lines = Vec::new();
        if let VarGroupMode::Concrete { members } = &self.mode {
            for &vid in members.values() {
                let v = &m.vars[vid];
                let name = Variable(vid).expr_name(m);
                if v.lb_overridden && v.lb != self.lb {
                    lines.push(format!("{}.lb = {};", name, fmt_bound(v.lb)));
                }
                if v.ub_overridden && v.ub != self.ub {
                    lines.push(format!("{}.ub = {};", name, fmt_bound(v.ub)));
                }
                if v.init_overridden && v.init != self.init {
                    if let Some(iv) = v.init {
                        lines.push(format!("{} = {};", name, fmt_bound(iv)));
                    }
                }
            }
        }
        lines
    }
}

/// Handle to a variable group owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VariableGroup(pub(crate) usize);

impl VariableGroup {
    pub fn name(self, m : &Model) -> &str {
        &m.vargroups[self.0].name
    }

    pub fn is_abstract(self, m : &Model) -> bool {
        matches!(m.vargroups[self.0].mode, VarGroupMode::Abstract { .. })
    }

    /// Concrete members in index order.
    pub fn members(self, m : &Model) -> Vec<Variable> {
        match &m.vargroups[self.0].mode {
            VarGroupMode::Concrete { members } => {
                members.values().map(|&v| Variable(v)).collect()
            },
            VarGroupMode::Abstract { .. } => Vec::new(),
        }
    }

    /// Exact concrete member lookup.
    pub fn member<K : Into<Key>, I : IntoIterator<Item = K>>(
        self,
        m : &Model,
        key : I,
    ) -> Result<Variable> {
        let key : Vec<Key> = key.into_iter().map(|k| k.into()).collect();
        match &m.vargroups[self.0].mode {
            VarGroupMode::Concrete { members } => {
                members.get(&key).map(|&v| Variable(v)).ok_or_else(|| Error::KeyNotFound {
                    group : m.vargroups[self.0].name.clone(),
                    key : key.iter().map(|k| k.plain()).collect::<Vec<_>>().join(","),
                })
            },
            VarGroupMode::Abstract { .. } => Err(Error::KeyNotFound {
                group : m.vargroups[self.0].name.clone(),
                key : "<abstract>".to_string(),
            }),
        }
    }

    /// Member addressed by a possibly abstract key. Concrete groups resolve
    /// exactly; abstract groups return a cached shadow variable.
    pub fn at<K : Into<IndexKey>, I : IntoIterator<Item = K>>(
        self,
        m : &mut Model,
        key : I,
    ) -> Result<Variable> {
        let key : Vec<IndexKey> = key.into_iter().map(|k| k.into()).collect();
        if let VarGroupMode::Concrete { .. } = &m.vargroups[self.0].mode {
            let concrete : Option<Vec<Key>> = key.iter().map(|k| k.as_key()).collect();
            let concrete = concrete.ok_or(Error::InvalidSetMembership)?;
            return self.member(m, concrete);
        }
        if let VarGroupMode::Abstract { shadows } = &m.vargroups[self.0].mode {
            if let Some(&vid) = shadows.get(&key) {
                return Ok(Variable(vid));
            }
        }
        let gname = m.vargroups[self.0].name.clone();
        let name = plain_member_name(m, &gname, &key);
        let spec = crate::variable::VarSpec {
            vartype : m.vargroups[self.0].vartype,
            lb : Some(m.vargroups[self.0].lb),
            ub : Some(m.vargroups[self.0].ub),
            init : m.vargroups[self.0].init,
        };
        let mut data = crate::variable::VarData::new(name, &spec);
        data.parent = Some((self.0, key.clone()));
        let vid = m.vars.len();
        m.vars.push(data);
        if let VarGroupMode::Abstract { shadows } = &mut m.vargroups[self.0].mode {
            shadows.insert(key, vid);
        }
        Ok(Variable(vid))
    }

    /// Wildcard lookup over concrete members. An empty result is reported
    /// with a warning, not an error.
    pub fn filter(self, m : &Model, filters : &[Filter]) -> Vec<Variable> {
        let data = &m.vargroups[self.0];
        let out : Vec<Variable> = match &data.mode {
            VarGroupMode::Concrete { members } => members
                .iter()
                .filter(|(key, _)| key_matches(key, filters))
                .map(|(_, &v)| Variable(v))
                .collect(),
            VarGroupMode::Abstract { .. } => Vec::new(),
        };
        if out.is_empty() {
            warn!(group = %data.name, "wildcard filter matched no members");
        }
        out
    }

    /// Sum over the group with `*` wildcards. Concrete groups expand
    /// eagerly; abstract groups produce a quantified sum with fresh
    /// iterators.
    pub fn sum(self, m : &mut Model, filters : &[Filter]) -> Result<Expr> {
        if !self.is_abstract(m) {
            let mut e = Expr::new();
            for v in self.filter(m, filters) {
                e = e + v;
            }
            return Ok(e);
        }
        let arity = m.vargroups[self.0].domains.len();
        if filters.len() != arity {
            return Err(Error::KeyNotFound {
                group : m.vargroups[self.0].name.clone(),
                key : format!("<{} filter positions, arity {}>", filters.len(), arity),
            });
        }
        let mut iters : Vec<SetIterator> = Vec::new();
        let mut key : Vec<IndexKey> = Vec::new();
        for (pos, f) in filters.iter().enumerate() {
            match f {
                Filter::All => {
                    let dom = domain_to_iter(&m.vargroups[self.0].domains[pos]);
                    let it = m.iterator(dom);
                    iters.push(it);
                    key.push(IndexKey::Iter(it));
                },
                Filter::Is(k) => key.push(k.clone().into()),
            }
        }
        let member = self.at(m, key)?;
        Ok(m.quantify(member.into_expr(), iters, None))
    }

    /// Change the group defaults and every member that has not been
    /// individually overridden.
    pub fn set_bounds(self, m : &mut Model, lb : Option<f64>, ub : Option<f64>) {
        if let Some(v) = lb {
            m.vargroups[self.0].lb = v;
        }
        if let Some(v) = ub {
            m.vargroups[self.0].ub = v;
        }
        let member_ids : Vec<usize> = match &m.vargroups[self.0].mode {
            VarGroupMode::Concrete { members } => members.values().copied().collect(),
            VarGroupMode::Abstract { shadows } => shadows.values().copied().collect(),
        };
        for vid in member_ids {
            let data = &mut m.vars[vid];
            if let Some(v) = lb {
                if !data.lb_overridden {
                    data.lb = v;
                }
            }
            if let Some(v) = ub {
                if !data.ub_overridden {
                    data.ub = v;
                }
            }
        }
    }

    pub fn set_init(self, m : &mut Model, init : Option<f64>) {
        m.vargroups[self.0].init = init;
        let member_ids : Vec<usize> = self.members(m).iter().map(|v| v.0).collect();
        for vid in member_ids {
            let data = &mut m.vars[vid];
            if !data.init_overridden {
                data.init = init;
            }
        }
    }
}

fn key_matches(key : &[Key], filters : &[Filter]) -> bool {
    if key.len() != filters.len() {
        return false;
    }
    key.iter().zip(filters.iter()).all(|(k, f)| match f {
        Filter::All => true,
        Filter::Is(want) => k == want,
    })
}

//======================================================
// Constraint groups
//======================================================

pub(crate) enum ConGroupMode {
    Concrete { members : IndexMap<Vec<Key>, usize> },
    Abstract { iters : Vec<SetIterator>, template : usize },
}

pub(crate) struct ConGroupData {
    pub name : String,
    pub mode : ConGroupMode,
}

impl ConGroupData {
    pub(crate) fn defn(&self, m : &Model) -> Vec<String> {
        match &self.mode {
            ConGroupMode::Concrete { members } => members
                .values()
                .map(|&cid| m.cons[cid].defn(m))
                .collect(),
            ConGroupMode::Abstract { iters, template } => {
                let bindings = m.iter_bindings(iters);
                vec![format!(
                    "con {} {} : {};",
                    self.name,
                    bindings,
                    m.cons[*template].body_defn(m)
                )]
            },
        }
    }

    /// Names used by drop and restore statements.
    pub(crate) fn statement_names(&self, m : &Model) -> Vec<String> {
        match &self.mode {
            ConGroupMode::Concrete { members } => {
                members.values().map(|&cid| m.cons[cid].name.clone()).collect()
            },
            ConGroupMode::Abstract { .. } => vec![self.name.clone()],
        }
    }
}

/// Handle to a constraint group owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintGroup(pub(crate) usize);

impl ConstraintGroup {
    pub fn name(self, m : &Model) -> &str {
        &m.congroups[self.0].name
    }

    pub fn is_abstract(self, m : &Model) -> bool {
        matches!(m.congroups[self.0].mode, ConGroupMode::Abstract { .. })
    }

    pub fn members(self, m : &Model) -> Vec<Constraint> {
        match &m.congroups[self.0].mode {
            ConGroupMode::Concrete { members } => {
                members.values().map(|&c| Constraint(c)).collect()
            },
            ConGroupMode::Abstract { template, .. } => vec![Constraint(*template)],
        }
    }

    pub fn member<K : Into<Key>, I : IntoIterator<Item = K>>(
        self,
        m : &Model,
        key : I,
    ) -> Result<Constraint> {
        let key : Vec<Key> = key.into_iter().map(|k| k.into()).collect();
        match &m.congroups[self.0].mode {
            ConGroupMode::Concrete { members } => {
                members.get(&key).map(|&c| Constraint(c)).ok_or_else(|| {
                    Error::KeyNotFound {
                        group : m.congroups[self.0].name.clone(),
                        key : key.iter().map(|k| k.plain()).collect::<Vec<_>>().join(","),
                    }
                })
            },
            ConGroupMode::Abstract { .. } => Err(Error::KeyNotFound {
                group : m.congroups[self.0].name.clone(),
                key : "<abstract>".to_string(),
            }),
        }
    }
}

//======================================================
// Implicit variables
//======================================================

pub(crate) enum ImpVarMode {
    Single { expr : Expr },
    Concrete { members : IndexMap<Vec<Key>, Expr> },
    Abstract { iters : Vec<SetIterator>, template : Expr },
}

pub(crate) struct ImpVarData {
    pub name : String,
    pub mode : ImpVarMode,
}

impl ImpVarData {
    pub(crate) fn defn(&self, m : &Model) -> Vec<String> {
        match &self.mode {
            ImpVarMode::Single { expr } => {
                vec![format!("impvar {} = {};", self.name, expr.expr_string(m))]
            },
            ImpVarMode::Concrete { members } => members
                .iter()
                .map(|(key, expr)| {
                    let suffix : Vec<String> = key.iter().map(|k| k.plain()).collect();
                    format!(
                        "impvar {}_{} = {};",
                        self.name,
                        suffix.join("_"),
                        expr.expr_string(m)
                    )
                })
                .collect(),
            ImpVarMode::Abstract { iters, template } => {
                vec![format!(
                    "impvar {} {} = {};",
                    self.name,
                    m.iter_bindings(iters),
                    template.expr_string(m)
                )]
            },
        }
    }
}

/// Handle to an implicit variable owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImplicitVar(pub(crate) usize);

impl ImplicitVar {
    pub fn name(self, m : &Model) -> &str {
        &m.impvars[self.0].name
    }

    /// The defining expression itself for single and concrete members;
    /// abstract members are referenced by name and key.
    pub fn member<K : Into<IndexKey>, I : IntoIterator<Item = K>>(
        self,
        m : &Model,
        key : I,
    ) -> Result<Expr> {
        let key : Vec<IndexKey> = key.into_iter().map(|k| k.into()).collect();
        match &m.impvars[self.0].mode {
            ImpVarMode::Single { expr } => Ok(expr.clone()),
            ImpVarMode::Concrete { members } => {
                let concrete : Option<Vec<Key>> = key.iter().map(|k| k.as_key()).collect();
                let concrete = concrete.ok_or(Error::InvalidSetMembership)?;
                members.get(&concrete).cloned().ok_or_else(|| Error::KeyNotFound {
                    group : m.impvars[self.0].name.clone(),
                    key : concrete.iter().map(|k| k.plain()).collect::<Vec<_>>().join(","),
                })
            },
            ImpVarMode::Abstract { .. } => {
                Ok(Expr::from_atom(Atom::Imp(self, key)))
            },
        }
    }
}
