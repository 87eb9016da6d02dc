#[macro_use]
extern crate log;

pub mod formula;
pub mod generator;
pub mod parser;
pub mod prelude;
pub mod report;
pub mod simplify;
pub mod solver;
