pub mod api;
pub mod log_buffer;
pub mod poll;
