//! HTTP surface over the history provider

pub mod controller;
pub mod dto;
pub mod routes;
pub mod util;
