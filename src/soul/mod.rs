//! The soul data model and the rules that govern it. No I/O.

pub mod lifecycle;
pub mod model;
