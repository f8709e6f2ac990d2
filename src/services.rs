pub mod solar_data_service;

pub use solar_data_service::SolarDataService;
