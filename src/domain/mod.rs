// Domain layer - Core types and rules, no I/O
pub mod coverage;
pub mod error;
pub mod geometry;
pub mod location;
pub mod series;
