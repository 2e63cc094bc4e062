pub mod placement_service;

pub use placement_service::*;
