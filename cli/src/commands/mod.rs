//! Command implementations

pub mod application;
pub mod config;
pub mod images;
pub mod version;
