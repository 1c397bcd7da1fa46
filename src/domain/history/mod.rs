//! Historical telemetry: query planning, archive paging and point conversion

pub mod dto;
pub mod model;
pub mod service;
