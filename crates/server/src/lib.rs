pub mod errors;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{run, serve};
pub use state::AppState;
