mod xid;

pub use xid::*;
