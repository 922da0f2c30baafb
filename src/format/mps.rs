//! MPS table generation.
//!
//! Builds the strict fixed-field MPS layout as an in-memory [Table] with
//! columns Field1..Field6 plus a 1-based `_id_`. The writer never touches
//! the model; a nonzero objective constant is carried by a synthetic fixed
//! column that exists only in the emitted table.

use tracing::warn;

use crate::constraint::Direction;
use crate::expr::{Atom, ExprKey};
use crate::model::Model;
use crate::session::{Cell, Table};
use crate::variable::{VarType, Variable};
use crate::{Error, Result};

impl Model {
    /// Strict MPS representation. With `constant` set, a nonzero objective
    /// constant becomes an auxiliary `obj_constant` column fixed at its
    /// value; otherwise the constant is left out of the table.
    pub fn to_mps(&self, constant : bool) -> Result<Table> {
        if self.has_abstract_components() {
            return Err(Error::UnsupportedForMps(
                self.name.clone(),
                "abstract components present".to_string(),
            ));
        }
        if !self.is_linear() {
            return Err(Error::NonlinearTerm(
                "bilinear terms cannot be written as MPS".to_string(),
            ));
        }
        let obj = self.objective.as_ref().ok_or_else(|| {
            Error::UnsupportedForMps(self.name.clone(), "no objective".to_string())
        })?;

        let obj_constant = obj.expr.constant_value();
        let carry_constant = constant && obj_constant != 0.0;
        if carry_constant {
            warn!(
                value = obj_constant,
                "objective constant carried by an auxiliary obj_constant column"
            );
        }

        let vars = self.declared_variables();
        let cons = self.declared_constraints();
        let mut b = Builder { rows : Vec::new() };

        b.push(vec![
            Cell::s("NAME"),
            Cell::Empty,
            Cell::s(&self.name),
            Cell::Num(0.0),
            Cell::Empty,
            Cell::Num(0.0),
        ]);
        b.text6("ROWS", "", "", "", "");
        b.text6(obj.sense.mps(), &obj.name, "", "", "");
        for &c in &cons {
            b.text6(self.cons[c.0].direction.mps(), &self.cons[c.0].name, "", "", "");
        }

        b.text6("COLUMNS", "", "", "", "");
        let mut curtype = VarType::Cont;
        for &v in &vars {
            let data = &self.vars[v.0];
            if data.vartype == VarType::Int && curtype != VarType::Int {
                b.text6("", "MARK0000", "'MARKER'", "", "'INTORG'");
                curtype = VarType::Int;
            }
            if data.vartype != VarType::Int && curtype == VarType::Int {
                b.text6("", "MARK0001", "'MARKER'", "", "'INTEND'");
                curtype = VarType::Cont;
            }
            let mut entries : Vec<(String, f64)> = Vec::new();
            let in_any_con = cons.iter().any(|&c| coefficient(self, c.0, v).is_some());
            if let Some(cv) = obj.expr.terms.get(&ExprKey::Lin(Atom::Var(v))) {
                entries.push((obj.name.clone(), *cv));
            }
            else if !in_any_con {
                entries.push((obj.name.clone(), 0.0));
            }
            for &c in &cons {
                if let Some(cv) = coefficient(self, c.0, v) {
                    entries.push((self.cons[c.0].name.clone(), cv));
                }
            }
            b.paired(&data.name, entries);
        }
        if curtype == VarType::Int {
            b.text6("", "MARK0001", "'MARKER'", "", "'INTEND'");
        }
        if carry_constant {
            b.push(vec![
                Cell::Empty,
                Cell::s("obj_constant"),
                Cell::s(&obj.name),
                Cell::Num(1.0),
                Cell::Empty,
                Cell::Empty,
            ]);
        }

        b.text6("RHS", "", "", "", "");
        let mut rhs_entries : Vec<(String, f64)> = Vec::new();
        for &c in &cons {
            let data = &self.cons[c.0];
            let cval = data.expr.constant_value();
            if data.direction == Direction::Le && cval == f64::NEG_INFINITY {
                continue;
            }
            if data.direction == Direction::Ge && cval == 0.0 {
                continue;
            }
            let rhs = data.rhs();
            if rhs != 0.0 {
                rhs_entries.push((data.name.clone(), rhs));
            }
        }
        b.paired("RHS", rhs_entries);

        b.text6("RANGES", "", "", "", "");
        for &c in &cons {
            let data = &self.cons[c.0];
            if data.range != 0.0 {
                b.push(vec![
                    Cell::Empty,
                    Cell::s("rng"),
                    Cell::s(&data.name),
                    Cell::Num(data.range),
                    Cell::Empty,
                    Cell::Empty,
                ]);
            }
        }

        b.text6("BOUNDS", "", "", "", "");
        for &v in &vars {
            let data = &self.vars[v.0];
            if data.lb == data.ub {
                b.bound("FX", &data.name, Some(data.ub));
            }
            if data.vartype != VarType::Bin {
                if data.ub == f64::INFINITY && data.lb == f64::NEG_INFINITY {
                    b.bound("FR", &data.name, None);
                }
                else if data.ub != data.lb {
                    if data.vartype == VarType::Int
                        && data.lb == 0.0
                        && data.ub == f64::INFINITY
                    {
                        b.bound("PL", &data.name, None);
                    }
                    else if !(data.vartype == VarType::Cont && data.lb == 0.0) {
                        b.bound("LO", &data.name, Some(data.lb));
                    }
                }
            }
            if data.ub != f64::INFINITY
                && !(data.vartype == VarType::Bin && data.ub == 1.0)
                && data.lb != data.ub
            {
                b.bound("UP", &data.name, Some(data.ub));
            }
            if data.vartype == VarType::Bin {
                b.bound("BV", &data.name, Some(1.0));
            }
        }
        if carry_constant {
            b.bound("FX", "obj_constant", Some(obj_constant));
        }

        b.push(vec![
            Cell::s("ENDATA"),
            Cell::Empty,
            Cell::Empty,
            Cell::Num(0.0),
            Cell::Empty,
            Cell::Num(0.0),
        ]);

        Ok(Table {
            name : self.name.clone(),
            columns : vec![
                "Field1".to_string(),
                "Field2".to_string(),
                "Field3".to_string(),
                "Field4".to_string(),
                "Field5".to_string(),
                "Field6".to_string(),
                "_id_".to_string(),
            ],
            rows : b.rows,
        })
    }
}

fn coefficient(m : &Model, cid : usize, v : Variable) -> Option<f64> {
    m.cons[cid].expr.terms.get(&ExprKey::Lin(Atom::Var(v))).copied()
}

struct Builder {
    rows : Vec<Vec<Cell>>,
}

impl Builder {
    fn push(&mut self, mut row : Vec<Cell>) {
        row.push(Cell::Num(self.rows.len() as f64 + 1.0));
        self.rows.push(row);
    }

    fn text6(&mut self, f1 : &str, f2 : &str, f3 : &str, f4 : &str, f5 : &str) {
        self.push(vec![
            Cell::s(f1),
            Cell::s(f2),
            Cell::s(f3),
            Cell::s(f4),
            Cell::s(f5),
            Cell::Empty,
        ]);
    }

    /// Name/value entries of one column, packed two per row.
    fn paired(&mut self, field2 : &str, entries : Vec<(String, f64)>) {
        let mut pending : Option<(String, f64)> = None;
        for (row, val) in entries {
            match pending.take() {
                None => pending = Some((row, val)),
                Some((r1, v1)) => self.push(vec![
                    Cell::Empty,
                    Cell::s(field2),
                    Cell::s(&r1),
                    Cell::Num(v1),
                    Cell::s(&row),
                    Cell::Num(val),
                ]),
            }
        }
        if let Some((r1, v1)) = pending {
            self.push(vec![
                Cell::Empty,
                Cell::s(field2),
                Cell::s(&r1),
                Cell::Num(v1),
                Cell::Empty,
                Cell::Empty,
            ]);
        }
    }

    fn bound(&mut self, kind : &str, name : &str, value : Option<f64>) {
        self.push(vec![
            Cell::s(kind),
            Cell::s("BND"),
            Cell::s(name),
            value.map(Cell::Num).unwrap_or(Cell::Empty),
            Cell::Empty,
            Cell::Empty,
        ]);
    }
}
