//! Controllers: connect routes to the history provider

pub mod history;
