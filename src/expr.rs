//! Sparse linear expressions over model entities.
//!
//! An [Expr] is an insertion-ordered map from a term key to a coefficient.
//! Adding a term that is already present accumulates its coefficient, so an
//! expression never holds the same key twice. The constant term has its own
//! key and always renders last.
//!
//! Relations are built with the explicit [Expr::le], [Expr::ge] and
//! [Expr::eq] methods; a comparison never masquerades as a `bool`.

use indexmap::IndexMap;
use std::ops::{Add, Mul, Neg, Sub};

use crate::constraint::Direction;
use crate::error::{Error, Result};
use crate::group::ImplicitVar;
use crate::model::Model;
use crate::parameter::Parameter;
use crate::set::{IndexKey, SetIterator};
use crate::utils::fmt_num;
use crate::variable::Variable;

/// Bound attribute of a variable referenced as a value, `x[i].lb` style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundAttr {
    Lb,
    Ub,
}

/// Reference to an interned quantified sum owned by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuantRef(pub(crate) usize);

/// A single non-constant operand of a linear term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    Var(Variable),
    VarAttr(Variable, BoundAttr),
    Param(Parameter),
    Iter(SetIterator),
    /// Abstract implicit-variable member, `z[i]`.
    Imp(ImplicitVar, Vec<IndexKey>),
    /// Quantified sum, `sum {i in S} (...)`.
    Quant(QuantRef),
}

impl Atom {
    pub(crate) fn render(&self, m : &Model) -> String {
        match self {
            Atom::Var(v) => v.expr_name(m),
            Atom::VarAttr(v, BoundAttr::Lb) => format!("{}.lb", v.expr_name(m)),
            Atom::VarAttr(v, BoundAttr::Ub) => format!("{}.ub", v.expr_name(m)),
            Atom::Param(p) => p.expr_name(m),
            Atom::Iter(it) => it.name(m).to_string(),
            Atom::Imp(iv, keys) => {
                let ks : Vec<String> = keys.iter().map(|k| k.sas(m)).collect();
                format!("{}[{}]", iv.name(m), ks.join(", "))
            },
            Atom::Quant(q) => m.render_quant(*q),
        }
    }

    fn value(&self, m : &Model) -> Option<f64> {
        match self {
            Atom::Var(v) => m.vars[v.0].value,
            Atom::VarAttr(v, BoundAttr::Lb) => Some(m.vars[v.0].lb),
            Atom::VarAttr(v, BoundAttr::Ub) => Some(m.vars[v.0].ub),
            Atom::Param(p) => m.params[p.0].value,
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ExprKey {
    Const,
    Lin(Atom),
    /// Product of two atoms. Kept for generated text, rejected by the MPS
    /// writer.
    Bilin(Atom, Atom),
}

/// Sparse expression: ordered term map plus nothing else. Cloning is a deep
/// copy of the term map.
#[derive(Clone, Debug, Default)]
pub struct Expr {
    pub(crate) terms : IndexMap<ExprKey, f64>,
}

impl Expr {
    pub fn new() -> Expr {
        Expr { terms : IndexMap::new() }
    }

    pub fn constant(v : f64) -> Expr {
        let mut e = Expr::new();
        if v != 0.0 {
            e.terms.insert(ExprKey::Const, v);
        }
        e
    }

    pub(crate) fn from_atom(a : Atom) -> Expr {
        let mut e = Expr::new();
        e.terms.insert(ExprKey::Lin(a), 1.0);
        e
    }

    pub(crate) fn add_term(&mut self, key : ExprKey, coef : f64) {
        *self.terms.entry(key).or_insert(0.0) += coef;
    }

    /// Value of the constant term.
    pub fn constant_value(&self) -> f64 {
        self.terms.get(&ExprKey::Const).copied().unwrap_or(0.0)
    }

    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(|k| matches!(k, ExprKey::Const))
    }

    /// True when no term is a product of two atoms.
    pub fn is_linear(&self) -> bool {
        !self.terms.keys().any(|k| matches!(k, ExprKey::Bilin(_, _)))
    }

    /// Multiply by another expression. Constant factors fold into
    /// coefficients; two atoms make a bilinear term; anything of higher
    /// degree is refused.
    pub fn mul(self, other : impl IntoExpr) -> Result<Expr> {
        let rhs = other.into_expr();
        let mut out = Expr::new();
        for (k1, v1) in self.terms.iter() {
            for (k2, v2) in rhs.terms.iter() {
                let coef = v1 * v2;
                let key = match (k1, k2) {
                    (ExprKey::Const, k) | (k, ExprKey::Const) => k.clone(),
                    (ExprKey::Lin(a), ExprKey::Lin(b)) => {
                        ExprKey::Bilin(a.clone(), b.clone())
                    },
                    _ => {
                        return Err(Error::NonlinearTerm(
                            "product beyond bilinear degree".to_string(),
                        ))
                    },
                };
                if coef != 0.0 {
                    out.add_term(key, coef);
                }
            }
        }
        Ok(out)
    }

    /// Divide by a numeric constant.
    pub fn div(self, d : f64) -> Result<Expr> {
        if d == 0.0 {
            return Err(Error::DivisionByZero);
        }
        Ok(self * (1.0 / d))
    }

    pub fn le(self, rhs : impl IntoExpr) -> Result<Relation> {
        relation(self, rhs.into_expr(), Direction::Le)
    }

    pub fn ge(self, rhs : impl IntoExpr) -> Result<Relation> {
        relation(self, rhs.into_expr(), Direction::Ge)
    }

    pub fn eq(self, rhs : impl IntoExpr) -> Result<Relation> {
        relation(self, rhs.into_expr(), Direction::Eq)
    }

    /// Two sided relation `lo <= self <= hi`.
    pub fn within(self, lo : f64, hi : f64) -> Result<Relation> {
        if self.is_constant() {
            return Err(Error::InvalidComparison(self.constant_value(), lo));
        }
        let mut expr = self;
        expr.add_term(ExprKey::Const, -lo);
        Ok(Relation { expr, direction : Direction::Eq, range : hi - lo })
    }

    /// Numeric value under the current variable and parameter values.
    /// `None` when any operand has no value.
    pub fn value(&self, m : &Model) -> Option<f64> {
        let mut total = 0.0;
        for (k, &coef) in self.terms.iter() {
            match k {
                ExprKey::Const => total += coef,
                ExprKey::Lin(a) => total += coef * a.value(m)?,
                ExprKey::Bilin(a, b) => total += coef * a.value(m)? * b.value(m)?,
            }
        }
        Some(total)
    }

    /// Full rendering, constant last.
    pub fn expr_string(&self, m : &Model) -> String {
        self.render(m, false)
    }

    /// Rendering without the constant term, used for constraint bodies.
    pub(crate) fn body_string(&self, m : &Model) -> String {
        self.render(m, true)
    }

    fn render(&self, m : &Model, skip_const : bool) -> String {
        let mut s = String::new();
        let mut itemcnt = 0;
        let mut firstel = true;
        for (k, &val) in self.terms.iter() {
            if matches!(k, ExprKey::Const) || val == 0.0 {
                continue;
            }
            if val < 0.0 {
                s.push_str("- ");
            }
            else if !firstel {
                s.push_str("+ ");
            }
            firstel = false;
            let refs = match k {
                ExprKey::Lin(a) => a.render(m),
                ExprKey::Bilin(a, b) => format!("{} * {}", a.render(m), b.render(m)),
                ExprKey::Const => unreachable!(),
            };
            let av = val.abs();
            if av == 1.0 {
                s.push_str(&refs);
                s.push(' ');
            }
            else if matches!(k, ExprKey::Lin(Atom::Quant(_))) {
                s.push_str(&format!("{} * ({}) ", fmt_num(av), refs));
            }
            else {
                s.push_str(&format!("{} * {} ", fmt_num(av), refs));
            }
            itemcnt += 1;
        }
        let cval = self.constant_value();
        if itemcnt == 0 || (cval != 0.0 && !skip_const) {
            if cval < 0.0 {
                s.push_str("- ");
            }
            else if !firstel {
                s.push_str("+ ");
            }
            s.push_str(&fmt_num(cval.abs()));
            s.push(' ');
        }
        s.trim_end().to_string()
    }
}

fn relation(lhs : Expr, rhs : Expr, direction : Direction) -> Result<Relation> {
    if lhs.is_constant() && rhs.is_constant() {
        return Err(Error::InvalidComparison(
            lhs.constant_value(),
            rhs.constant_value(),
        ));
    }
    Ok(Relation { expr : lhs - rhs, direction, range : 0.0 })
}

/// Directed difference produced by [Expr::le] and friends; the right hand
/// side is folded into the constant term.
#[derive(Clone, Debug)]
pub struct Relation {
    pub(crate) expr : Expr,
    pub(crate) direction : Direction,
    pub(crate) range : f64,
}

//======================================================
// Conversions and operators
//======================================================

/// Anything that can stand where an expression is expected.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr { self }
}
impl IntoExpr for &Expr {
    fn into_expr(self) -> Expr { self.clone() }
}
impl IntoExpr for f64 {
    fn into_expr(self) -> Expr { Expr::constant(self) }
}
impl IntoExpr for i64 {
    fn into_expr(self) -> Expr { Expr::constant(self as f64) }
}
impl IntoExpr for i32 {
    fn into_expr(self) -> Expr { Expr::constant(self as f64) }
}
impl IntoExpr for Variable {
    fn into_expr(self) -> Expr { Expr::from_atom(Atom::Var(self)) }
}
impl IntoExpr for Parameter {
    fn into_expr(self) -> Expr { Expr::from_atom(Atom::Param(self)) }
}
impl IntoExpr for SetIterator {
    fn into_expr(self) -> Expr { Expr::from_atom(Atom::Iter(self)) }
}

impl<T : IntoExpr> Add<T> for Expr {
    type Output = Expr;
    fn add(mut self, other : T) -> Expr {
        for (k, v) in other.into_expr().terms {
            self.add_term(k, v);
        }
        self
    }
}

impl<T : IntoExpr> Sub<T> for Expr {
    type Output = Expr;
    fn sub(mut self, other : T) -> Expr {
        for (k, v) in other.into_expr().terms {
            self.add_term(k, -v);
        }
        self
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;
    fn mul(mut self, k : f64) -> Expr {
        for v in self.terms.values_mut() {
            *v *= k;
        }
        self
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;
    fn mul(self, e : Expr) -> Expr { e * self }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr { self * -1.0 }
}

impl Add<Expr> for f64 {
    type Output = Expr;
    fn add(self, e : Expr) -> Expr { e + self }
}

impl Sub<Expr> for f64 {
    type Output = Expr;
    fn sub(self, e : Expr) -> Expr { Expr::constant(self) - e }
}

macro_rules! atom_ops {
    ($t : ty) => {
        impl<T : IntoExpr> Add<T> for $t {
            type Output = Expr;
            fn add(self, other : T) -> Expr { self.into_expr() + other }
        }
        impl<T : IntoExpr> Sub<T> for $t {
            type Output = Expr;
            fn sub(self, other : T) -> Expr { self.into_expr() - other }
        }
        impl Mul<f64> for $t {
            type Output = Expr;
            fn mul(self, k : f64) -> Expr { self.into_expr() * k }
        }
        impl Mul<$t> for f64 {
            type Output = Expr;
            fn mul(self, other : $t) -> Expr { other.into_expr() * self }
        }
        impl Neg for $t {
            type Output = Expr;
            fn neg(self) -> Expr { -self.into_expr() }
        }
        impl Add<$t> for f64 {
            type Output = Expr;
            fn add(self, other : $t) -> Expr { other.into_expr() + self }
        }
        impl Sub<$t> for f64 {
            type Output = Expr;
            fn sub(self, other : $t) -> Expr { Expr::constant(self) - other }
        }
    };
}

atom_ops!(Variable);
atom_ops!(Parameter);
atom_ops!(SetIterator);
