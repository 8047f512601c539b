pub mod config;
pub mod init;
pub mod library;
pub mod steam;
pub mod suggest;
