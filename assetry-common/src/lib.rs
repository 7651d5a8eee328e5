//! common

mod convert;
mod country;
mod ip;
mod multivalue;

pub use convert::*;
pub use country::*;
pub use ip::*;
pub use multivalue::*;
