pub mod builder;
pub mod cycle;
pub mod plan_model;
