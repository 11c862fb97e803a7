mod settings;

pub use settings::{ApiSettings, Settings, SolverSettings};
