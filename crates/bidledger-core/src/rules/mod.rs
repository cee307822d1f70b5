//! Structural validation rules applied before any lookup or write

pub mod validation;
