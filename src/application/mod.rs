// Application layer - Use cases and the datastore port
pub mod aligner;
pub mod assembler;
pub mod datastore;
pub mod fetcher;
pub mod location_service;
pub mod observation_service;

#[cfg(test)]
pub mod testing;
