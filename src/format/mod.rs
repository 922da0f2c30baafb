//! Code generation back ends: PROC OPTMODEL text and the MPS table.

pub mod mps;
pub mod optmodel;
