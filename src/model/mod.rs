//! The model: arena for every entity, the statement tree and the active
//! container stack.
//!
//! All handles ([Variable](crate::variable::Variable),
//! [Constraint](crate::constraint::Constraint), [Set](crate::set::Set), ...)
//! are plain indexes into the arenas owned here. The model also owns the
//! creation-order counter; nothing in the crate keeps global state.

use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::warn;

use crate::constraint::{ConData, Constraint};
use crate::expr::{Atom, Expr, IntoExpr, QuantRef, Relation};
use crate::group::{
    domain_to_iter, ConGroupData, ConGroupMode, ConstraintGroup, ImpVarData, ImpVarMode,
    ImplicitVar, VarGroupData, VarGroupMode, VariableGroup,
};
use crate::parameter::{ParamData, ParamGroupData, ParamType, Parameter, ParameterGroup};
use crate::set::{
    Condition, Domain, ElementType, IndexKey, IterData, IterDomain, Key, Set, SetData,
    SetIterator, SetValue,
};
use crate::statement::{CreateData, ReadData, SolveOptions, StmtData, StmtKind};
use crate::variable::{VarData, VarSpec, Variable};
use crate::Result;

/// Optimization sense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub(crate) fn sas(&self) -> &'static str {
        match self {
            Sense::Minimize => "min",
            Sense::Maximize => "max",
        }
    }

    pub(crate) fn mps(&self) -> &'static str {
        match self {
            Sense::Minimize => "MIN",
            Sense::Maximize => "MAX",
        }
    }
}

pub(crate) struct ObjectiveData {
    pub name : String,
    pub sense : Sense,
    pub expr : Expr,
}

/// An interned quantified sum.
pub(crate) struct QuantData {
    pub iters : Vec<SetIterator>,
    pub cond : Option<String>,
    pub body : Expr,
}

/// Everything attached to a container, in creation order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Entry {
    pub seq : usize,
    pub item : Item,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Item {
    Set(usize),
    Param(usize),
    ParamGroup(usize),
    Var(usize),
    VarGroup(usize),
    ImpVar(usize),
    Con(usize),
    ConGroup(usize),
    Stmt(usize),
    Objective,
}

pub struct Model {
    pub(crate) name : String,
    next_seq : usize,
    next_auto : usize,
    pub(crate) vars : Vec<VarData>,
    pub(crate) cons : Vec<ConData>,
    pub(crate) sets : Vec<SetData>,
    pub(crate) iters : Vec<IterData>,
    pub(crate) params : Vec<ParamData>,
    pub(crate) pargroups : Vec<ParamGroupData>,
    pub(crate) vargroups : Vec<VarGroupData>,
    pub(crate) congroups : Vec<ConGroupData>,
    pub(crate) impvars : Vec<ImpVarData>,
    pub(crate) stmts : Vec<StmtData>,
    pub(crate) quants : Vec<QuantData>,
    pub(crate) objective : Option<ObjectiveData>,
    pub(crate) root : Vec<Entry>,
    frames : Vec<usize>,
    names : HashSet<String>,
    pub(crate) objective_value : Option<f64>,
    pub(crate) solution_status : Option<String>,
}

impl Model {
    pub fn new(name : Option<&str>) -> Model {
        Model {
            name : name.unwrap_or("model1").to_string(),
            next_seq : 0,
            next_auto : 0,
            vars : Vec::new(),
            cons : Vec::new(),
            sets : Vec::new(),
            iters : Vec::new(),
            params : Vec::new(),
            pargroups : Vec::new(),
            vargroups : Vec::new(),
            congroups : Vec::new(),
            impvars : Vec::new(),
            stmts : Vec::new(),
            quants : Vec::new(),
            objective : None,
            root : Vec::new(),
            frames : Vec::new(),
            names : HashSet::new(),
            objective_value : None,
            solution_status : None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //======================================================
    // Bookkeeping
    //======================================================

    fn next_seq(&mut self) -> usize {
        self.next_seq += 1;
        self.next_seq
    }

    /// Fresh generated name, also used for long-name substitution.
    pub(crate) fn auto_name(&mut self) -> String {
        loop {
            self.next_auto += 1;
            let name = format!("o{}", self.next_auto);
            if !self.names.contains(&name) {
                return name;
            }
        }
    }

    fn ensure_name(&mut self, name : Option<&str>) -> String {
        let name = match name {
            Some(n) => {
                if self.names.contains(n) {
                    let seq = self.next_seq + 1;
                    let fixed = format!("{}_{}", n, seq);
                    warn!(name = n, replacement = %fixed, "name already in use");
                    fixed
                }
                else {
                    n.to_string()
                }
            },
            None => self.auto_name(),
        };
        self.names.insert(name.clone());
        name
    }

    fn new_stmt(&mut self, kind : StmtKind) -> usize {
        self.stmts.push(StmtData { kind });
        self.stmts.len() - 1
    }

    fn attach(&mut self, item : Item) {
        let seq = self.next_seq();
        let entry = Entry { seq, item };
        match self.frames.last().copied() {
            Some(f) => match self.stmts[f].kind.children_mut() {
                Some(children) => children.push(entry),
                None => panic!("active container is not a block statement"),
            },
            None => self.root.push(entry),
        }
    }

    /// True while a loop or if/else body is the active container.
    pub fn in_container(&self) -> bool {
        !self.frames.is_empty()
    }

    pub(crate) fn push_line(&mut self, line : String) {
        let sid = self.new_stmt(StmtKind::Line(line));
        self.attach(Item::Stmt(sid));
    }

    /// Run `f` with `stmt` as the active container. The container stack is
    /// restored even when `f` panics.
    fn with_frame<R>(&mut self, stmt : usize, f : impl FnOnce(&mut Model) -> R) -> R {
        struct PopGuard<'a>(&'a mut Model);
        impl Drop for PopGuard<'_> {
            fn drop(&mut self) {
                self.0.frames.pop();
            }
        }
        self.frames.push(stmt);
        let mut guard = PopGuard(self);
        f(&mut *guard.0)
    }

    //======================================================
    // Entities
    //======================================================

    pub fn variable(&mut self, name : Option<&str>, spec : VarSpec) -> Variable {
        let name = self.ensure_name(name);
        let data = VarData::new(name, &spec);
        let vid = self.vars.len();
        self.vars.push(data);
        self.attach(Item::Var(vid));
        Variable(vid)
    }

    pub fn add_variables(
        &mut self,
        domains : Vec<Domain>,
        name : Option<&str>,
        spec : VarSpec,
    ) -> VariableGroup {
        let name = self.ensure_name(name);
        let template = VarData::new(name.clone(), &spec);
        let (lb, ub) = (template.lb, template.ub);
        let gid = self.vargroups.len();
        let is_abstract = domains.iter().any(|d| d.is_abstract());
        let mode = if is_abstract {
            VarGroupMode::Abstract { shadows : IndexMap::new() }
        }
        else {
            let mut members = IndexMap::new();
            for key in concrete_keys(&domains) {
                let ks : Vec<String> = key.iter().map(|k| k.plain()).collect();
                let mut data = VarData::new(format!("{}[{}]", name, ks.join(",")), &spec);
                data.parent =
                    Some((gid, key.iter().cloned().map(IndexKey::from).collect()));
                let vid = self.vars.len();
                self.vars.push(data);
                members.insert(key, vid);
            }
            VarGroupMode::Concrete { members }
        };
        self.vargroups.push(VarGroupData {
            name,
            domains,
            vartype : spec.vartype,
            lb,
            ub,
            init : spec.init,
            mode,
        });
        self.attach(Item::VarGroup(gid));
        VariableGroup(gid)
    }

    pub fn constraint(&mut self, name : Option<&str>, rel : Relation) -> Constraint {
        let name = self.ensure_name(name);
        let cid = self.cons.len();
        self.cons.push(ConData {
            name,
            expr : rel.expr,
            direction : rel.direction,
            range : rel.range,
            parent : None,
            dual : None,
        });
        self.attach(Item::Con(cid));
        Constraint(cid)
    }

    /// One constraint per member of the index cross product. The closure
    /// receives the member key; abstract groups call it once with iterator
    /// keys.
    pub fn add_constraints<F>(
        &mut self,
        domains : Vec<Domain>,
        name : Option<&str>,
        mut body : F,
    ) -> Result<ConstraintGroup>
    where
        F : FnMut(&mut Model, &[IndexKey]) -> Result<Relation>,
    {
        let name = self.ensure_name(name);
        let gid = self.congroups.len();
        self.congroups.push(ConGroupData {
            name : name.clone(),
            mode : ConGroupMode::Concrete { members : IndexMap::new() },
        });
        let is_abstract = domains.iter().any(|d| d.is_abstract());
        let mode = if is_abstract {
            let iters : Vec<SetIterator> =
                domains.iter().map(|d| self.iterator(domain_to_iter(d))).collect();
            let key : Vec<IndexKey> = iters.iter().map(|&it| IndexKey::Iter(it)).collect();
            let rel = body(self, &key)?;
            let cid = self.cons.len();
            self.cons.push(ConData {
                name : name.clone(),
                expr : rel.expr,
                direction : rel.direction,
                range : rel.range,
                parent : Some((gid, key)),
                dual : None,
            });
            ConGroupMode::Abstract { iters, template : cid }
        }
        else {
            let mut members = IndexMap::new();
            for key in concrete_keys(&domains) {
                let ikey : Vec<IndexKey> = key.iter().cloned().map(IndexKey::from).collect();
                let rel = body(self, &ikey)?;
                let suffix : Vec<String> = key.iter().map(|k| k.plain()).collect();
                let cid = self.cons.len();
                self.cons.push(ConData {
                    name : format!("{}_{}", name, suffix.join("_")),
                    expr : rel.expr,
                    direction : rel.direction,
                    range : rel.range,
                    parent : Some((gid, ikey)),
                    dual : None,
                });
                members.insert(key, cid);
            }
            ConGroupMode::Concrete { members }
        };
        self.congroups[gid].mode = mode;
        self.attach(Item::ConGroup(gid));
        Ok(ConstraintGroup(gid))
    }

    pub fn set(&mut self, name : Option<&str>) -> Set {
        self.typed_set(name, vec![ElementType::Num])
    }

    pub fn typed_set(&mut self, name : Option<&str>, types : Vec<ElementType>) -> Set {
        let name = self.ensure_name(name);
        let sid = self.sets.len();
        self.sets.push(SetData { name, types, init : None, assign : None });
        self.attach(Item::Set(sid));
        Set(sid)
    }

    /// Set declared with a value, `set NAME = {...};`.
    pub fn set_with(&mut self, name : Option<&str>, value : SetValue) -> Set {
        let s = self.set(name);
        self.sets[s.0].assign = Some(value);
        s
    }

    pub fn parameter(&mut self, name : Option<&str>) -> Parameter {
        let name = self.ensure_name(name);
        let pid = self.params.len();
        self.params.push(ParamData::new(name, ParamType::Num));
        self.attach(Item::Param(pid));
        Parameter(pid)
    }

    pub fn str_parameter(&mut self, name : Option<&str>) -> Parameter {
        let name = self.ensure_name(name);
        let pid = self.params.len();
        self.params.push(ParamData::new(name, ParamType::Str));
        self.attach(Item::Param(pid));
        Parameter(pid)
    }

    pub fn add_parameters(
        &mut self,
        domains : Vec<Domain>,
        name : Option<&str>,
    ) -> ParameterGroup {
        let name = self.ensure_name(name);
        let gid = self.pargroups.len();
        self.pargroups.push(ParamGroupData {
            name,
            ptype : ParamType::Num,
            domains,
            init : None,
            assign : None,
            shadows : IndexMap::new(),
        });
        self.attach(Item::ParamGroup(gid));
        ParameterGroup(gid)
    }

    pub fn add_impvar(&mut self, name : Option<&str>, expr : impl IntoExpr) -> ImplicitVar {
        let name = self.ensure_name(name);
        let iid = self.impvars.len();
        self.impvars.push(ImpVarData {
            name,
            mode : ImpVarMode::Single { expr : expr.into_expr() },
        });
        self.attach(Item::ImpVar(iid));
        ImplicitVar(iid)
    }

    /// Keyed implicit variable; the closure receives the member key
    /// explicitly.
    pub fn add_impvars<F>(
        &mut self,
        domains : Vec<Domain>,
        name : Option<&str>,
        mut body : F,
    ) -> Result<ImplicitVar>
    where
        F : FnMut(&mut Model, &[IndexKey]) -> Result<Expr>,
    {
        let name = self.ensure_name(name);
        let is_abstract = domains.iter().any(|d| d.is_abstract());
        let mode = if is_abstract {
            let iters : Vec<SetIterator> =
                domains.iter().map(|d| self.iterator(domain_to_iter(d))).collect();
            let key : Vec<IndexKey> = iters.iter().map(|&it| IndexKey::Iter(it)).collect();
            let template = body(self, &key)?;
            ImpVarMode::Abstract { iters, template }
        }
        else {
            let mut members = IndexMap::new();
            for key in concrete_keys(&domains) {
                let ikey : Vec<IndexKey> = key.iter().cloned().map(IndexKey::from).collect();
                let expr = body(self, &ikey)?;
                members.insert(key, expr);
            }
            ImpVarMode::Concrete { members }
        };
        let iid = self.impvars.len();
        self.impvars.push(ImpVarData { name, mode });
        self.attach(Item::ImpVar(iid));
        Ok(ImplicitVar(iid))
    }

    /// Set or replace the objective. Inside a container this emits an
    /// objective statement instead.
    pub fn set_objective(&mut self, name : Option<&str>, sense : Sense, expr : impl IntoExpr) {
        let expr = expr.into_expr();
        if self.in_container() {
            let name = self.ensure_name(name);
            let line = format!("{} {} = {};", sense.sas(), name, expr.expr_string(self));
            self.push_line(line);
            return;
        }
        if self.objective.is_some() {
            let new_name = name.map(|n| self.ensure_name(Some(n)));
            if let Some(obj) = self.objective.as_mut() {
                obj.sense = sense;
                obj.expr = expr;
                if let Some(n) = new_name {
                    obj.name = n;
                }
            }
        }
        else {
            let name = self.ensure_name(name);
            self.objective = Some(ObjectiveData { name, sense, expr });
            self.attach(Item::Objective);
        }
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    pub fn set_objective_value(&mut self, v : f64) {
        self.objective_value = Some(v);
    }

    pub fn solution_status(&self) -> Option<&str> {
        self.solution_status.as_deref()
    }

    //======================================================
    // Iterators and quantified sums
    //======================================================

    pub fn iterator(&mut self, dom : impl Into<IterDomain>) -> SetIterator {
        let name = self.auto_name();
        let id = self.iters.len();
        self.iters.push(IterData { names : vec![name], domain : dom.into() });
        SetIterator { id, pos : 0 }
    }

    /// One iterator per key position of a multi-typed set, rendered as
    /// `<i, j> in SET`.
    pub fn iterators_for(&mut self, set : Set) -> Vec<SetIterator> {
        let arity = self.sets[set.0].types.len();
        let names : Vec<String> = (0..arity).map(|_| self.auto_name()).collect();
        let id = self.iters.len();
        self.iters.push(IterData { names, domain : IterDomain::Set(set) });
        (0..arity).map(|pos| SetIterator { id, pos }).collect()
    }

    /// `{i in S, j in T[: cond]}`
    pub(crate) fn bindings_head(
        &self,
        iters : &[SetIterator],
        cond : Option<&str>,
    ) -> String {
        let mut ids = Vec::new();
        for it in iters {
            if !ids.contains(&it.id) {
                ids.push(it.id);
            }
        }
        let bs : Vec<String> = ids.iter().map(|&i| self.iters[i].binding(self)).collect();
        match cond {
            Some(c) => format!("{{{}: {}}}", bs.join(", "), c),
            None => format!("{{{}}}", bs.join(", ")),
        }
    }

    pub(crate) fn iter_bindings(&self, iters : &[SetIterator]) -> String {
        self.bindings_head(iters, None)
    }

    /// Wrap an expression into a quantified sum over the given iterators.
    pub fn quantify(
        &mut self,
        body : Expr,
        iters : Vec<SetIterator>,
        cond : Option<Condition>,
    ) -> Expr {
        let cond = cond.map(|c| c.render(self));
        let q = self.quants.len();
        self.quants.push(QuantData { iters, cond, body });
        Expr::from_atom(Atom::Quant(QuantRef(q)))
    }

    /// Quantified sum over fresh iterators.
    pub fn sum<F>(&mut self, doms : Vec<IterDomain>, f : F) -> Expr
    where
        F : FnOnce(&mut Model, &[SetIterator]) -> Expr,
    {
        let iters : Vec<SetIterator> = doms.into_iter().map(|d| self.iterator(d)).collect();
        let body = f(self, &iters);
        self.quantify(body, iters, None)
    }

    pub(crate) fn render_quant(&self, q : QuantRef) -> String {
        let qd = &self.quants[q.0];
        let head = self.bindings_head(&qd.iters, qd.cond.as_deref());
        format!("sum {} ({})", head, qd.body.expr_string(self))
    }

    //======================================================
    // Statements
    //======================================================

    /// Raw statement text, passed through untouched.
    pub fn literal(&mut self, text : &str) {
        self.push_line(text.to_string());
    }

    pub fn assign(&mut self, target : impl IntoExpr, value : impl IntoExpr) {
        let line = crate::statement::render_assign(
            self,
            None,
            &target.into_expr(),
            &value.into_expr(),
        );
        self.push_line(line);
    }

    /// `fix x = v;`
    pub fn fix(&mut self, var : Variable, value : impl IntoExpr) {
        let line = crate::statement::render_assign(
            self,
            Some("fix"),
            &var.into_expr(),
            &value.into_expr(),
        );
        self.push_line(line);
    }

    /// `unfix x;`
    pub fn unfix(&mut self, var : Variable) {
        let line = format!("unfix {};", var.expr_name(self));
        self.push_line(line);
    }

    pub fn print(&mut self, items : &[Expr]) {
        let line = crate::statement::render_items(self, "print", items);
        self.push_line(line);
    }

    /// Log output, `put a b;`.
    pub fn put(&mut self, items : &[Expr]) {
        let line = crate::statement::render_items(self, "put", items);
        self.push_line(line);
    }

    pub fn create_data(&mut self, stmt : CreateData) {
        let line = stmt.render(self);
        self.push_line(line);
    }

    pub fn read_data(&mut self, stmt : ReadData) {
        let line = stmt.render(self);
        self.push_line(line);
    }

    pub fn drop_constraints(&mut self, cons : &[Constraint]) {
        let names : Vec<String> =
            cons.iter().map(|c| self.cons[c.0].name.clone()).collect();
        self.push_line(format!("drop {};", names.join(" ")));
    }

    pub fn restore_constraints(&mut self, cons : &[Constraint]) {
        let names : Vec<String> =
            cons.iter().map(|c| self.cons[c.0].name.clone()).collect();
        self.push_line(format!("restore {};", names.join(" ")));
    }

    pub fn drop_group(&mut self, group : ConstraintGroup) {
        let names = self.congroups[group.0].statement_names(self);
        self.push_line(format!("drop {};", names.join(" ")));
    }

    pub fn restore_group(&mut self, group : ConstraintGroup) {
        let names = self.congroups[group.0].statement_names(self);
        self.push_line(format!("restore {};", names.join(" ")));
    }

    /// Explicit `solve` statement.
    pub fn solve(&mut self, opts : &SolveOptions) {
        self.push_line(opts.render());
    }

    //======================================================
    // Containers
    //======================================================

    /// `for {i in S} do; ... end;` over fresh iterators.
    pub fn for_loop<F>(&mut self, doms : Vec<IterDomain>, body : F) -> Result<()>
    where
        F : FnOnce(&mut Model, &[SetIterator]) -> Result<()>,
    {
        self.for_loop_inner(doms, None, body)
    }

    /// A for loop with a header condition built from its iterators.
    pub fn for_loop_where<C, F>(
        &mut self,
        doms : Vec<IterDomain>,
        cond : C,
        body : F,
    ) -> Result<()>
    where
        C : FnOnce(&[SetIterator]) -> Condition,
        F : FnOnce(&mut Model, &[SetIterator]) -> Result<()>,
    {
        let iters : Vec<SetIterator> = doms.into_iter().map(|d| self.iterator(d)).collect();
        let cond = cond(&iters).render(self);
        self.start_loop(iters, Some(cond), body)
    }

    fn for_loop_inner<F>(
        &mut self,
        doms : Vec<IterDomain>,
        cond : Option<String>,
        body : F,
    ) -> Result<()>
    where
        F : FnOnce(&mut Model, &[SetIterator]) -> Result<()>,
    {
        let iters : Vec<SetIterator> = doms.into_iter().map(|d| self.iterator(d)).collect();
        self.start_loop(iters, cond, body)
    }

    fn start_loop<F>(
        &mut self,
        iters : Vec<SetIterator>,
        cond : Option<String>,
        body : F,
    ) -> Result<()>
    where
        F : FnOnce(&mut Model, &[SetIterator]) -> Result<()>,
    {
        let header = self.bindings_head(&iters, cond.as_deref());
        let sid = self.new_stmt(StmtKind::For { header, children : Vec::new() });
        self.attach(Item::Stmt(sid));
        self.with_frame(sid, |m| body(m, &iters))
    }

    /// `if cond then do; ... end;`
    pub fn if_then<F>(&mut self, cond : Condition, body : F) -> Result<()>
    where
        F : FnOnce(&mut Model) -> Result<()>,
    {
        let chain = self.new_stmt(StmtKind::IfElse { cases : Vec::new() });
        self.attach(Item::Stmt(chain));
        self.add_case(chain, "if", Some(cond), body)
    }

    pub fn if_else<F, G>(&mut self, cond : Condition, then_body : F, else_body : G) -> Result<()>
    where
        F : FnOnce(&mut Model) -> Result<()>,
        G : FnOnce(&mut Model) -> Result<()>,
    {
        let chain = self.new_stmt(StmtKind::IfElse { cases : Vec::new() });
        self.attach(Item::Stmt(chain));
        self.add_case(chain, "if", Some(cond), then_body)?;
        self.add_case(chain, "else", None, else_body)
    }

    /// Start an if / else-if / else chain.
    pub fn switch(&mut self) -> SwitchBuilder<'_> {
        let chain = self.new_stmt(StmtKind::IfElse { cases : Vec::new() });
        self.attach(Item::Stmt(chain));
        SwitchBuilder { model : self, chain, count : 0 }
    }

    fn add_case<F>(
        &mut self,
        chain : usize,
        keyword : &'static str,
        cond : Option<Condition>,
        body : F,
    ) -> Result<()>
    where
        F : FnOnce(&mut Model) -> Result<()>,
    {
        let cond = cond.map(|c| c.render(self));
        let sid = self.new_stmt(StmtKind::Case { keyword, cond, children : Vec::new() });
        if let StmtKind::IfElse { cases } = &mut self.stmts[chain].kind {
            cases.push(sid);
        }
        self.with_frame(sid, body)
    }

    //======================================================
    // Emission support
    //======================================================

    pub(crate) fn sorted_entries(&self) -> Vec<Entry> {
        let mut entries = self.root.clone();
        entries.sort_by_key(|e| e.seq);
        entries
    }

    /// All variables in declaration order, group members expanded.
    pub(crate) fn declared_variables(&self) -> Vec<Variable> {
        let mut out = Vec::new();
        for e in self.sorted_entries() {
            match e.item {
                Item::Var(v) => out.push(Variable(v)),
                Item::VarGroup(g) => out.extend(VariableGroup(g).members(self)),
                _ => {},
            }
        }
        out
    }

    /// All constraints in declaration order, group members expanded.
    pub(crate) fn declared_constraints(&self) -> Vec<Constraint> {
        let mut out = Vec::new();
        for e in self.sorted_entries() {
            match e.item {
                Item::Con(c) => out.push(Constraint(c)),
                Item::ConGroup(g) => match &self.congroups[g].mode {
                    ConGroupMode::Concrete { members } => {
                        out.extend(members.values().map(|&c| Constraint(c)))
                    },
                    ConGroupMode::Abstract { .. } => {},
                },
                _ => {},
            }
        }
        out
    }

    /// True when the model holds anything only OPTMODEL can express.
    pub fn has_abstract_components(&self) -> bool {
        !self.sets.is_empty()
            || !self.params.is_empty()
            || !self.pargroups.is_empty()
            || !self.impvars.is_empty()
            || !self.stmts.is_empty()
            || !self.quants.is_empty()
            || self.vargroups.iter().any(|g| matches!(g.mode, VarGroupMode::Abstract { .. }))
            || self.congroups.iter().any(|g| matches!(g.mode, ConGroupMode::Abstract { .. }))
    }

    /// True when objective and constraints hold no bilinear term.
    pub fn is_linear(&self) -> bool {
        self.objective.as_ref().map(|o| o.expr.is_linear()).unwrap_or(true)
            && self.cons.iter().all(|c| c.expr.is_linear())
    }

    //======================================================
    // Result ingestion
    //======================================================

    pub fn find_variable(&self, name : &str) -> Option<Variable> {
        let want = normalize_name(name);
        (0..self.vars.len()).map(Variable).find(|v| {
            normalize_name(&self.vars[v.0].name) == want
                || normalize_name(&v.expr_name(self)) == want
        })
    }

    pub fn find_constraint(&self, name : &str) -> Option<Constraint> {
        let want = normalize_name(name);
        (0..self.cons.len())
            .map(Constraint)
            .find(|c| normalize_name(&self.cons[c.0].name) == want)
    }

    /// Record a solved value by name; unknown names are ignored.
    pub fn set_variable_value(&mut self, name : &str, value : f64) {
        if let Some(v) = self.find_variable(name) {
            self.vars[v.0].value = Some(value);
        }
    }

    pub fn set_variable_rc(&mut self, name : &str, value : f64) {
        if let Some(v) = self.find_variable(name) {
            self.vars[v.0].rc = Some(value);
        }
    }

    pub fn set_constraint_dual(&mut self, name : &str, value : f64) {
        if let Some(c) = self.find_constraint(name) {
            self.cons[c.0].dual = Some(value);
        }
    }
}

/// If / else-if / else chain under construction.
pub struct SwitchBuilder<'a> {
    model : &'a mut Model,
    chain : usize,
    count : usize,
}

impl SwitchBuilder<'_> {
    pub fn case<F>(mut self, cond : Condition, body : F) -> Result<Self>
    where
        F : FnOnce(&mut Model) -> Result<()>,
    {
        let keyword = if self.count == 0 { "if" } else { "else if" };
        self.model.add_case(self.chain, keyword, Some(cond), body)?;
        self.count += 1;
        Ok(self)
    }

    /// Trailing unconditional branch, closes the chain.
    pub fn default<F>(self, body : F) -> Result<()>
    where
        F : FnOnce(&mut Model) -> Result<()>,
    {
        self.model.add_case(self.chain, "else", None, body)
    }
}

/// Cross product of concrete domain keys, in index order.
fn concrete_keys(domains : &[Domain]) -> Vec<Vec<Key>> {
    domains
        .iter()
        .map(|d| d.keys())
        .multi_cartesian_product()
        .collect()
}

fn normalize_name(s : &str) -> String {
    s.chars().filter(|c| *c != ' ' && *c != '\'').collect()
}
