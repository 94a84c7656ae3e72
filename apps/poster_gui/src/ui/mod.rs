pub mod app;
pub mod create_screen;
pub mod display_screen;
pub mod images;
