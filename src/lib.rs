pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod server;

pub use error::PassforgeError;
pub use generator::{GenerationPolicy, generate};
