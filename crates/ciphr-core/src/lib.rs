pub mod config;
pub mod error;

pub use config::{load_config, CiphrConfig};
pub use error::{CiphrError, CiphrResult};
