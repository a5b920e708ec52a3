//! Regular-expression synthesis from range trees.
//!
//! A [`phonerange_core::RangeTree`] is converted into an NFA-like
//! [`Edge`] tree, optionally restructured by the trailing-path and
//! subgroup optimizers, and rendered by [`EdgeWriter`]. The entry point
//! is [`RegexGenerator`]; every configuration produces an expression
//! accepting exactly the tree's language.

pub mod any_path;
pub mod edge;
pub mod generator;
mod nfa;
pub mod subgroup;
mod trailing;
pub mod writer;

#[cfg(test)]
mod any_path_tests;
#[cfg(test)]
mod subgroup_tests;
#[cfg(test)]
mod trailing_tests;

pub use any_path::AnyPath;
pub use edge::Edge;
pub use generator::RegexGenerator;
pub use subgroup::Subgroup;
pub use writer::EdgeWriter;
