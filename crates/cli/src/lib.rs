pub mod config;
pub mod demo;
pub mod import;
pub mod logging;
