//! Abstract index sets, iterators and index domains.
//!
//! A [Set] is a named index domain that lives server side; its elements are
//! not (necessarily) known while the model is built. A [SetIterator] is a
//! dummy index bound to a set for the duration of one generated loop or
//! quantified sum.

use crate::expr::{Expr, IntoExpr};
use crate::model::Model;
use crate::utils::quote;

/// Element type of one position of a set key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Num,
    Str,
}

impl ElementType {
    pub(crate) fn sas(&self) -> &'static str {
        match self {
            ElementType::Num => "num",
            ElementType::Str => "str",
        }
    }
}

/// A concrete key element: a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Num(i64),
    Str(String),
}

impl Key {
    /// Unquoted form, used inside member names.
    pub(crate) fn plain(&self) -> String {
        match self {
            Key::Num(v) => format!("{}", v),
            Key::Str(s) => s.clone(),
        }
    }

    /// Quoted form, used inside generated expressions.
    pub(crate) fn sas(&self) -> String {
        match self {
            Key::Num(v) => format!("{}", v),
            Key::Str(s) => quote(s),
        }
    }
}

impl From<i64> for Key {
    fn from(v : i64) -> Key { Key::Num(v) }
}
impl From<&str> for Key {
    fn from(v : &str) -> Key { Key::Str(v.to_string()) }
}
impl From<String> for Key {
    fn from(v : String) -> Key { Key::Str(v) }
}

/// A key element that may be concrete or a bound iterator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Num(i64),
    Str(String),
    Iter(SetIterator),
}

impl IndexKey {
    pub(crate) fn sas(&self, m : &Model) -> String {
        match self {
            IndexKey::Num(v) => format!("{}", v),
            IndexKey::Str(s) => quote(s),
            IndexKey::Iter(it) => it.name(m).to_string(),
        }
    }

    /// Unquoted form for flattened member names.
    pub(crate) fn plain(&self, m : &Model) -> String {
        match self {
            IndexKey::Num(v) => format!("{}", v),
            IndexKey::Str(s) => s.clone(),
            IndexKey::Iter(it) => it.name(m).to_string(),
        }
    }

    pub(crate) fn as_key(&self) -> Option<Key> {
        match self {
            IndexKey::Num(v) => Some(Key::Num(*v)),
            IndexKey::Str(s) => Some(Key::Str(s.clone())),
            IndexKey::Iter(_) => None,
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, IndexKey::Iter(_))
    }
}

impl From<i64> for IndexKey {
    fn from(v : i64) -> IndexKey { IndexKey::Num(v) }
}
impl From<&str> for IndexKey {
    fn from(v : &str) -> IndexKey { IndexKey::Str(v.to_string()) }
}
impl From<SetIterator> for IndexKey {
    fn from(it : SetIterator) -> IndexKey { IndexKey::Iter(it) }
}
impl From<Key> for IndexKey {
    fn from(k : Key) -> IndexKey {
        match k {
            Key::Num(v) => IndexKey::Num(v),
            Key::Str(s) => IndexKey::Str(s),
        }
    }
}

/// Value (or initial value) of a set.
#[derive(Clone, Debug)]
pub enum SetValue {
    /// `lo..hi`, bounds may be symbolic.
    Range(Expr, Expr),
    /// `{e1,e2,...}`
    List(Vec<Key>),
}

impl SetValue {
    pub fn range(lo : impl IntoExpr, hi : impl IntoExpr) -> SetValue {
        SetValue::Range(lo.into_expr(), hi.into_expr())
    }

    pub fn list<K : Into<Key>, I : IntoIterator<Item = K>>(items : I) -> SetValue {
        SetValue::List(items.into_iter().map(|k| k.into()).collect())
    }

    pub(crate) fn sas(&self, m : &Model) -> String {
        match self {
            SetValue::Range(lo, hi) => {
                format!("{}..{}", lo.expr_string(m), hi.expr_string(m))
            },
            SetValue::List(items) => {
                let body : Vec<String> = items.iter().map(|k| k.sas()).collect();
                format!("{{{}}}", body.join(","))
            },
        }
    }
}

pub struct SetData {
    pub(crate) name : String,
    pub(crate) types : Vec<ElementType>,
    pub(crate) init : Option<SetValue>,
    pub(crate) assign : Option<SetValue>,
}

/// Handle to a named set owned by a [Model].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Set(pub(crate) usize);

impl Set {
    pub fn name(self, m : &Model) -> &str {
        &m.sets[self.0].name
    }

    /// Number of key positions.
    pub fn arity(self, m : &Model) -> usize {
        m.sets[self.0].types.len()
    }

    /// Late value assignment, `set NAME = v;` in the declaration.
    pub fn assign(self, m : &mut Model, v : SetValue) {
        m.sets[self.0].assign = Some(v);
    }

    pub fn init(self, m : &mut Model, v : SetValue) {
        m.sets[self.0].init = Some(v);
    }

    pub(crate) fn defn(self, m : &Model) -> String {
        let data = &m.sets[self.0];
        let mut s = String::from("set ");
        if data.types.len() != 1 || data.types[0] != ElementType::Num {
            let tps : Vec<&str> = data.types.iter().map(|t| t.sas()).collect();
            s.push_str(&format!("<{}> ", tps.join(", ")));
        }
        s.push_str(&data.name);
        if let Some(v) = &data.assign {
            s.push_str(&format!(" = {}", v.sas(m)));
        }
        else if let Some(v) = &data.init {
            s.push_str(&format!(" init {}", v.sas(m)));
        }
        s.push(';');
        s
    }
}

/// Domain an iterator runs over inside a loop or quantified sum.
#[derive(Clone, Debug)]
pub enum IterDomain {
    Set(Set),
    Range(Expr, Expr),
    List(Vec<Key>),
}

impl IterDomain {
    pub fn range(lo : impl IntoExpr, hi : impl IntoExpr) -> IterDomain {
        IterDomain::Range(lo.into_expr(), hi.into_expr())
    }

    pub fn list<K : Into<Key>, I : IntoIterator<Item = K>>(items : I) -> IterDomain {
        IterDomain::List(items.into_iter().map(|k| k.into()).collect())
    }

    pub(crate) fn sas(&self, m : &Model) -> String {
        match self {
            IterDomain::Set(s) => s.name(m).to_string(),
            IterDomain::Range(lo, hi) => {
                format!("{}..{}", lo.expr_string(m), hi.expr_string(m))
            },
            IterDomain::List(items) => {
                let body : Vec<String> = items.iter().map(|k| k.sas()).collect();
                format!("{{{}}}", body.join(","))
            },
        }
    }
}

impl From<Set> for IterDomain {
    fn from(s : Set) -> IterDomain { IterDomain::Set(s) }
}

pub struct IterData {
    pub(crate) names : Vec<String>,
    pub(crate) domain : IterDomain,
}

impl IterData {
    /// `i in DOM` or `<i, j> in DOM` for a multi-typed set.
    pub(crate) fn binding(&self, m : &Model) -> String {
        let dom = self.domain.sas(m);
        if self.names.len() == 1 {
            format!("{} in {}", self.names[0], dom)
        }
        else {
            format!("<{}> in {}", self.names.join(", "), dom)
        }
    }
}

/// A dummy index bound to one position of an iterator binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SetIterator {
    pub(crate) id : usize,
    pub(crate) pos : usize,
}

impl SetIterator {
    pub fn name(self, m : &Model) -> &str {
        &m.iters[self.id].names[self.pos]
    }
}

/// One index position of a group: a concrete range, a concrete value list,
/// or an abstract set. Any set position makes the whole group abstract.
#[derive(Clone, Debug)]
pub enum Domain {
    Range(i64, i64),
    List(Vec<Key>),
    Set(Set),
}

impl Domain {
    /// Inclusive numeric range `lo..hi`.
    pub fn range(lo : i64, hi : i64) -> Domain {
        Domain::Range(lo, hi)
    }

    /// `0..n-1`, the conventional domain for a plain length.
    pub fn span(n : usize) -> Domain {
        Domain::Range(0, n as i64 - 1)
    }

    pub fn list<K : Into<Key>, I : IntoIterator<Item = K>>(items : I) -> Domain {
        Domain::List(items.into_iter().map(|k| k.into()).collect())
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Domain::Set(_))
    }

    /// Concrete members of this position. Empty for an abstract set.
    pub(crate) fn keys(&self) -> Vec<Key> {
        match self {
            Domain::Range(lo, hi) => (*lo..=*hi).map(Key::Num).collect(),
            Domain::List(items) => items.clone(),
            Domain::Set(_) => Vec::new(),
        }
    }

    /// Rendering inside a `var` group index list; sets and lists keep their
    /// braces there.
    pub(crate) fn sas_var(&self, m : &Model) -> String {
        match self {
            Domain::Range(lo, hi) => format!("{}..{}", lo, hi),
            Domain::List(items) => {
                let body : Vec<String> = items.iter().map(|k| k.sas()).collect();
                format!("{{{}}}", body.join(","))
            },
            Domain::Set(s) => format!("{{{}}}", s.name(m)),
        }
    }

    /// Rendering inside a `num` group index list; set names stay bare.
    pub(crate) fn sas_param(&self, m : &Model) -> String {
        match self {
            Domain::Set(s) => s.name(m).to_string(),
            _ => self.sas_var(m),
        }
    }
}

impl From<Set> for Domain {
    fn from(s : Set) -> Domain { Domain::Set(s) }
}

//======================================================
// Conditions
//======================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CondOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CondOp {
    fn sas(&self) -> &'static str {
        match self {
            CondOp::Lt => "<",
            CondOp::Gt => ">",
            CondOp::Le => "<=",
            CondOp::Ge => ">=",
            CondOp::Eq => "=",
            CondOp::Ne => "ne",
        }
    }
}

/// A boolean test used in loop headers, quantified sums and if/else
/// statements. Built through the explicit constructors; comparisons of
/// expressions never pretend to be `bool`.
#[derive(Clone, Debug)]
pub enum Condition {
    Cmp { lhs : Expr, op : CondOp, rhs : Expr },
    In { members : Vec<IndexKey>, set : Set },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn lt(lhs : impl IntoExpr, rhs : impl IntoExpr) -> Condition {
        Condition::Cmp { lhs : lhs.into_expr(), op : CondOp::Lt, rhs : rhs.into_expr() }
    }
    pub fn gt(lhs : impl IntoExpr, rhs : impl IntoExpr) -> Condition {
        Condition::Cmp { lhs : lhs.into_expr(), op : CondOp::Gt, rhs : rhs.into_expr() }
    }
    pub fn le(lhs : impl IntoExpr, rhs : impl IntoExpr) -> Condition {
        Condition::Cmp { lhs : lhs.into_expr(), op : CondOp::Le, rhs : rhs.into_expr() }
    }
    pub fn ge(lhs : impl IntoExpr, rhs : impl IntoExpr) -> Condition {
        Condition::Cmp { lhs : lhs.into_expr(), op : CondOp::Ge, rhs : rhs.into_expr() }
    }
    pub fn eq(lhs : impl IntoExpr, rhs : impl IntoExpr) -> Condition {
        Condition::Cmp { lhs : lhs.into_expr(), op : CondOp::Eq, rhs : rhs.into_expr() }
    }
    pub fn ne(lhs : impl IntoExpr, rhs : impl IntoExpr) -> Condition {
        Condition::Cmp { lhs : lhs.into_expr(), op : CondOp::Ne, rhs : rhs.into_expr() }
    }

    /// Membership test `key in SET`. The key tuple must contain at least
    /// one iterator; testing a fully concrete key against a server-side set
    /// has no client-side meaning.
    pub fn is_in<K : Into<IndexKey>, I : IntoIterator<Item = K>>(
        members : I,
        set : Set,
    ) -> crate::Result<Condition> {
        let members : Vec<IndexKey> = members.into_iter().map(|k| k.into()).collect();
        if !members.iter().any(|k| k.is_abstract()) {
            return Err(crate::Error::InvalidSetMembership);
        }
        Ok(Condition::In { members, set })
    }

    pub fn and(self, other : Condition) -> Condition {
        Condition::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other : Condition) -> Condition {
        Condition::Or(Box::new(self), Box::new(other))
    }

    pub(crate) fn render(&self, m : &Model) -> String {
        match self {
            Condition::Cmp { lhs, op, rhs } => {
                format!("{} {} {}", lhs.expr_string(m), op.sas(), rhs.expr_string(m))
            },
            Condition::In { members, set } => {
                if members.len() == 1 {
                    format!("{} in {}", members[0].sas(m), set.name(m))
                }
                else {
                    let body : Vec<String> = members.iter().map(|k| k.sas(m)).collect();
                    format!("<{}> in {}", body.join(", "), set.name(m))
                }
            },
            Condition::And(a, b) => {
                format!("({}) and ({})", a.render(m), b.render(m))
            },
            Condition::Or(a, b) => {
                format!("({}) or ({})", a.render(m), b.render(m))
            },
        }
    }
}
