pub mod auth_cmd;
pub mod blogs;
pub mod common;
pub mod completions;
pub mod config;
pub mod gyms;
pub mod parking;
pub mod properties;
