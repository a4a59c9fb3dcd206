pub mod event;
pub mod model;
pub mod utils;

pub use event::*;
pub use model::*;
