mod request_id;
mod server_time;

pub use request_id::*;
pub use server_time::*;
