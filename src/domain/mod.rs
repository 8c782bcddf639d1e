pub mod agent;
pub mod listing;
pub mod office;
pub mod timestamp;
