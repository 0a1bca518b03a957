pub mod config;
pub mod download;
pub mod extract;
pub mod install;
pub mod listing;
pub mod platform;
pub mod version;
