//! Dialog Stack
//!
//! A stack of modal dialogs for the terminal. The user steps forward and
//! backward through a fixed sequence; every dialog up to the active one stays
//! visible, each peeking out from behind the next.

pub mod cli;
pub mod config;
pub mod tui;
