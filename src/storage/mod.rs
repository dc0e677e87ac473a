pub mod connection;
pub mod entity;
pub mod repository;
pub mod schema;

pub use connection::establish_connection;
pub use schema::install_schema;
