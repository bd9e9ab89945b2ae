pub mod builder;
pub mod lifecycle;
pub mod membership;

pub use builder::*;
pub use lifecycle::*;
pub use membership::*;
