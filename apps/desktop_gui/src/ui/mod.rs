//! UI layer for the notes window: app shell, panels, theme, and the list projection.

pub mod app;
pub mod panels;
pub mod theme;
pub mod view_model;

pub use app::{NotesApp, PersistedViewSettings};
