//! Result reporting module

mod observer;
mod result;

pub use observer::*;
pub use result::*;
