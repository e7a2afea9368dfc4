pub mod calendar;
pub mod capacity;
pub mod project;
pub mod settings;
