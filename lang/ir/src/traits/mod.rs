mod free_vars;
mod node;
mod rename;

pub use free_vars::*;
pub use node::*;
pub use rename::*;
