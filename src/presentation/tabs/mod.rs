pub mod console;
pub mod drive;
