pub mod config;
pub mod drain;
pub mod dump;
pub mod error;
pub mod server;

pub use config::{Cli, ServerConfig};
pub use error::ServerError;
pub use server::{run, Server};
