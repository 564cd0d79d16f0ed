//! User actions emitted by the view and consumed by the controller.

use shared::domain::{PostId, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Author,
    Body,
}

/// Every card action carries the post id captured when the card was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    EditField(FormField, String),
    Submit,
    BeginEdit(PostId),
    CancelEdit,
    RequestDelete(PostId),
    ConfirmDelete,
    DeclineDelete,
    SetFilter(String),
    ClearFilter,
    SetSort(SortKey),
}

impl UiAction {
    pub fn name(&self) -> &'static str {
        match self {
            UiAction::EditField(..) => "edit_field",
            UiAction::Submit => "submit",
            UiAction::BeginEdit(_) => "begin_edit",
            UiAction::CancelEdit => "cancel_edit",
            UiAction::RequestDelete(_) => "request_delete",
            UiAction::ConfirmDelete => "confirm_delete",
            UiAction::DeclineDelete => "decline_delete",
            UiAction::SetFilter(_) => "set_filter",
            UiAction::ClearFilter => "clear_filter",
            UiAction::SetSort(_) => "set_sort",
        }
    }
}
