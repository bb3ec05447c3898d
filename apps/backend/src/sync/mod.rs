//! Client-side live sync: local mirrors of both tables, edit buffers,
//! totals and the user actions that write to the store.

pub mod controller;
pub mod edit;
pub mod parse;
pub mod totals;

pub use controller::{Confirm, LiveSync, SyncEvent, DELETE_ROUND_PROMPT, PLAYER_NAMES};
pub use edit::{EditState, Editable, ScoreField, StatField};
pub use parse::parse_points;
pub use totals::{totals, Totals};
