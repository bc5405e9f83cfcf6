// Domain layer - Core models and pure aggregation logic
pub mod dashboard;
pub mod stats;
pub mod ticket;
