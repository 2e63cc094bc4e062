pub mod classifier;
pub mod coordinates;
pub mod engine;
pub mod footprint;
pub mod geometry;
pub mod ports;
pub mod rules;
pub mod settings;
pub mod types;

pub use classifier::*;
pub use coordinates::*;
pub use engine::*;
pub use footprint::*;
pub use geometry::*;
pub use ports::*;
pub use rules::*;
pub use settings::*;
pub use types::*;
