pub mod agents;
pub mod connection;
pub mod listings;
pub mod store;

pub use connection::Database;
