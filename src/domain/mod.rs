// Domain layer - Core types, errors and classification rules

pub mod errors;
pub mod model;
pub mod rules;
