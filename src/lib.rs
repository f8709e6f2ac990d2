pub mod aggregation;
pub mod classification;
pub mod config;
pub mod correlation;
pub mod data;
pub mod load_error;
pub mod loader;
pub mod services;
pub mod utils;
