pub mod gateway;
pub use gateway::{Gateway, GatewayError, IdMatch, Row};
pub mod pg_gateway;
pub use pg_gateway::PgGateway;
pub mod memory_gateway;
pub use memory_gateway::MemoryGateway;
pub mod local_store;
pub use local_store::{JsonFileStore, KeyValueStore};

#[cfg(test)]
pub mod testing;
