pub mod location;
pub mod messages;

pub use location::*;
