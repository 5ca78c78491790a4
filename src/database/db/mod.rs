pub mod connection;
pub mod migrate;
pub mod queries;
pub mod settlement_queries;
