pub mod config;
pub mod dns;
pub mod secrets;
pub mod solver;
