//! Sheet state and logic (UI-agnostic).

mod io;
mod ops;
mod state;

pub use ops::Move;
pub use state::Sheet;
