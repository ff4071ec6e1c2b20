// Module exports for models

pub mod annotation;
pub mod event;
pub mod frame;
pub mod locale;
pub mod settings;
pub mod time_range;
pub mod ui;
