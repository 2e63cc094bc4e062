pub mod file_logger;
pub mod file_map_source;
pub mod multi_logger;
pub mod noop_logger;
pub mod overpass;
pub mod overpass_dto;
pub mod tracing_logger;

pub use file_logger::*;
pub use file_map_source::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use overpass::*;
pub use overpass_dto::parse_overpass_json;
pub use tracing_logger::*;
