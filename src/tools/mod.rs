pub mod handler;
pub mod handlers;
pub mod registry;

pub use handler::*;
pub use handlers::*;
pub use registry::*;
