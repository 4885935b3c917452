pub mod module;
pub mod recommendation;

pub use module::*;
pub use recommendation::*;
