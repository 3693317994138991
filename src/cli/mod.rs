mod app;
mod dashboard;
mod main;
mod view;

pub use app::*;
pub use dashboard::*;
pub use main::*;
pub use view::*;
