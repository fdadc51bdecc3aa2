pub mod app;
pub mod console;
pub mod effects;
pub mod logging;
pub mod render;
pub mod settings;
