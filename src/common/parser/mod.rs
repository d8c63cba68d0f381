mod common;
mod number;
mod result;
mod string;

// Re-export
pub use common::*;
pub use number::*;
pub use result::*;
pub use string::*;
