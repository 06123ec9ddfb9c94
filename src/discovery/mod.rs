pub mod headers;
pub mod responder;

pub use headers::*;
pub use responder::*;
