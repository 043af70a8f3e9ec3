//! Rolling price/volume history
//!
//! Keeps a short, time-bounded window of samples per market. The oldest
//! sample still inside the window is the baseline every new observation is
//! compared against.

mod store;
mod window;

pub use store::HistoryStore;
pub use window::{HistoryWindow, Sample};
