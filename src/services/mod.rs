// Service module exports

pub mod alignment;
pub mod annotations;
pub mod mapper;
pub mod panel;
pub mod range;
pub mod selection;
pub mod settings;
pub mod variables;
