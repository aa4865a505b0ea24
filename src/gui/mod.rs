mod app;
mod models;

pub use app::launch_gui;
