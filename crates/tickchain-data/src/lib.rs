pub mod loader;
pub mod schema;

pub use loader::{load_file, DataLoadError, LoadedSimulation, StageDefaults};
