pub mod api;
pub mod compiler;
pub mod util;
