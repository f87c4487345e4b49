// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod covjson_mapper;
pub mod http_datastore;
pub mod http_response;
pub mod query_parser;
