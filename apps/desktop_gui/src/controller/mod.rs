//! Controller layer: UI actions, the form state machine, and store orchestration.

pub mod events;
pub mod form;
pub mod orchestration;
