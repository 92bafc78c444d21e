//! Decides which specialization of a class template an instantiation selects.
//!
//! The optimizer may only inline a template instantiation if it can prove that a C++
//! compiler would pick the same specialization. [resolve] answers that question for
//! a single instantiation, and [CompilerSession] wraps it with the state a whole
//! compilation needs.

mod ids;
mod matcher;
mod renaming;
mod result;
mod session;
mod strategy;
mod unify;

pub use ids::*;
pub use matcher::*;
pub use renaming::*;
pub use result::*;
pub use session::*;
pub use strategy::*;
pub use unify::*;
