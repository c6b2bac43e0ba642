pub mod control;
pub mod element_model;
pub mod identity;
