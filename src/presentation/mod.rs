// Presentation layer - Console session and rendering
pub mod app_state;
pub mod console;
