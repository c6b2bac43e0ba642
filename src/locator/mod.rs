pub mod generator;
pub mod locator_model;
pub mod ranker;
pub mod scoring;
