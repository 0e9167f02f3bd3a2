//! Quiz session module

mod quiz;
mod stack;


pub use quiz::*;
pub use stack::*;
