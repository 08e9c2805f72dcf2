pub mod components;
pub mod config;
pub mod hooks;
pub mod models;
pub mod realtime;
pub mod services;
pub mod utils;
