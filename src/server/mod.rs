pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod router;
pub mod views;

pub use router::{AppState, GeneratorSettings, passforge_router};
