mod app;
pub mod controller;
mod dom;
pub mod lookup_view;
mod net;
pub mod render;
mod state;

pub use app::run;
