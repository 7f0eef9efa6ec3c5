//! Stacked modal dialogs
//!
//! A fixed sequence of dialogs is stepped through with Previous/Next. Every
//! dialog up to the active one stays on screen, each shifted a step lower
//! than the one beneath it so the earlier dialogs peek out from behind.

pub mod layer;
pub mod navigation;
pub mod sequence;
pub mod stack;
pub mod types;

pub use layer::{FrameLayer, StackGeometry, StackHit, StackLayout};
pub use navigation::{ActionButton, ButtonKind, DialogKeyMap, NavigationButtons, NavigationProps};
pub use sequence::{DialogSequence, DialogSequenceStore, SequenceState, StackCallbacks, StackPhase};
pub use stack::{DialogStack, DialogStackComponent};
pub use types::*;
