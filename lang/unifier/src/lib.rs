//! Unification of term sequences that may contain parameter-pack expansions.
//!
//! The engine is generic over the term representation: terms are opaque to it and
//! are only inspected through a [UnificationStrategy]. [unify] solves a set of
//! equations up to the point where the solution is a set of variable bindings, and
//! [canonicalize] turns those bindings into an acyclic, fully substituted form that
//! only binds variables that are allowed to be bound.

mod canonicalize;
mod graph;
mod outcome;
mod result;
mod strategy;
mod subst;
mod term;
mod unify;

#[cfg(test)]
mod testing;

pub use canonicalize::*;
pub use outcome::*;
pub use result::*;
pub use strategy::*;
pub use subst::*;
pub use term::*;
pub use unify::*;
