//! The IR0 representation of template metaprograms.
//!
//! IR0 is the lowest level of the compiler pipeline: every expression corresponds directly
//! to a C++ expression or type, and every template definition to a C++ class template
//! together with its partial specializations.

mod decls;
mod exp;
mod expr_type;
mod traits;

pub use decls::*;
pub use exp::*;
pub use expr_type::*;
pub use traits::*;

pub type HashMap<K, V> = std::collections::HashMap<K, V, fxhash::FxBuildHasher>;
pub type HashSet<V> = fxhash::FxHashSet<V>;
