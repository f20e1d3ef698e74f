pub mod app;
pub mod byte_size;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod history;
pub mod prompt;
pub mod result;
pub mod upload;
