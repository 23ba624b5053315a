pub mod command;
pub mod console;
pub mod joystick;
pub mod models;
pub mod settings;
