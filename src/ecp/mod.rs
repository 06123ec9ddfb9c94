pub mod command;
pub mod http;
pub mod server;

pub use command::*;
pub use http::*;
pub use server::*;
