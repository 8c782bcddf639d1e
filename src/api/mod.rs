pub mod agents;
pub mod auth;
pub mod params;
pub mod properties;
pub mod uploads;
