pub mod feeds;
pub mod health;
pub mod reader;
pub mod routes;
