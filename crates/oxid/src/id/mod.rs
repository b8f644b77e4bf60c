mod field;
mod ints;
mod xid;

pub use field::*;
pub use ints::*;
pub use xid::*;
