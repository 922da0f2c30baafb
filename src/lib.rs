//! Build PROC OPTMODEL optimization models in Rust and drive them through a
//! remote solver session.
//!
//! A [Model] owns every entity: variables, constraints, sets, parameters,
//! indexed groups and the statement tree. Handles are plain copyable indexes
//! into the model, so expressions stay cheap and declaration order is one
//! monotonic counter per model. Generated output comes in two forms: PROC
//! OPTMODEL text (solve or workspace layout) and the strict MPS table; both
//! are deterministic and never mutate the model. A [Session] implementation
//! supplies the transport, and the mediation layer handles format selection,
//! long-name substitution and result ingestion.

pub mod constraint;
pub mod error;
pub mod expr;
pub mod format;
pub mod group;
pub mod model;
pub mod parameter;
pub mod session;
pub mod set;
pub mod statement;
mod utils;
pub mod variable;

pub use constraint::{Constraint, Direction};
pub use error::{Error, Result};
pub use expr::{Expr, IntoExpr, Relation};
pub use format::optmodel::OptmodelOptions;
pub use group::{ConstraintGroup, Filter, ImplicitVar, VariableGroup};
pub use model::{Model, Sense, SwitchBuilder};
pub use parameter::{Parameter, ParameterGroup};
pub use session::{Cell, ProblemType, RunResponse, Session, SolveSettings, Table};
pub use set::{
    Condition, Domain, ElementType, IndexKey, IterDomain, Key, Set, SetIterator, SetValue,
};
pub use statement::{CreateData, DataColumn, ReadColumn, ReadData, SolveOptions};
pub use variable::{VarSpec, VarType, Variable};
