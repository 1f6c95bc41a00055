//! Dialog widget
//!
//! A dialog wraps one element built from a fixed template, renders a title and
//! a body into it, and runs a small lifecycle: show, hide (immediately, after
//! a delay, or after a transition effect) and remove. Dialogs optionally carry
//! an overlay backdrop and react to Esc unless told not to.
//!
//! The [`DialogManager`] owns the dialogs, keeps track of the single active
//! one and fires their deferred timers.

pub mod dialog;
pub mod element;
pub mod emitter;
pub mod layer;
pub mod manager;
pub mod overlay;
pub mod timers;
pub mod types;
pub mod view;

pub use dialog::Dialog;
pub use element::{Element, Presentation};
pub use emitter::{Emits, Emitter, ListenerId};
pub use layer::DialogLayout;
pub use manager::DialogManager;
pub use overlay::{Overlay, OverlayEvent, OverlayOptions};
pub use types::*;
pub use view::DialogView;
