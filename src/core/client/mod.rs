//! Archive HTTP access

pub mod archive_client;
