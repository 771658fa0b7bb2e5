pub mod confidence;
pub mod profile;
pub mod resolver;
pub mod scorer;
