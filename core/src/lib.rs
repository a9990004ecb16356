pub mod game_state;
pub mod layout;
pub mod types;

pub use game_state::*;
pub use layout::{layouts, Layout, LayoutError};
pub use types::*;
