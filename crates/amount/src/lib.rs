//! Reactive amount entry.
//!
//! Glues the `engine` calculator and currency tools to live inputs: the user
//! edits an expression through [`AmountEvent`]s while exchange rates and the
//! base currency arrive as [`Signal`]s. [`AmountModel`] keeps an
//! [`AmountState`] up to date from all of them.

pub use event::AmountEvent;
pub use model::AmountModel;
pub use signal::{Signal, SignalSender, signal};
pub use state::{AmountState, CalculatorResult, EditorState};

mod event;
mod model;
mod signal;
mod state;
