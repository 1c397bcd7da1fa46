//! API route declarations (e.g., /api/v1/*)

pub mod history_routes;
