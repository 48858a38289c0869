pub mod app;
pub mod stats;
pub mod ticker;
pub mod ui;

pub use app::App;
pub use ticker::Ticker;
