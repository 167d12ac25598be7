pub mod partial;
pub mod r3_identifiers;
pub mod util;
pub mod view;
