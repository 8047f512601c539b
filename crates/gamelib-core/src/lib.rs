pub mod access;
pub mod audience;
pub mod config;
pub mod error;
pub mod io;
pub mod library;
pub mod paths;
pub mod poll;
pub mod roster;
pub mod steam;
pub mod store;
pub mod suggest;
pub mod sync;
pub mod types;

pub use error::{GameLibError, Result};
