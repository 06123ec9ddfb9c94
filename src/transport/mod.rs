pub mod tcp;
pub mod traits;
pub mod udp;

pub use tcp::*;
pub use traits::*;
pub use udp::*;
