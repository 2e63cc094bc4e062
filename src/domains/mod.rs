pub mod logger;
pub mod placement;

pub use logger::*;
pub use placement::*;
