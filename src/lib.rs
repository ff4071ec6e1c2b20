// Calendar Panel Library
// Event mapping, slot alignment and range synchronization for a calendar panel

pub mod models;
pub mod services;
pub mod utils;
