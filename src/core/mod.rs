// FILE: src/core/mod.rs

pub mod constants;
pub mod properties;
pub mod util;

pub use constants::*;
pub use properties::*;
pub use util::*;
