mod param;
mod types;

pub use param::*;
pub use types::*;
