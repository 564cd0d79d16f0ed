//! Create-or-update form state machine.

use shared::domain::{Post, PostDraft, PostId};

use crate::controller::events::FormField;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Idle,
    Editing(PostId),
}

/// What a successful submit asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(PostDraft),
    Update(PostId, PostDraft),
}

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    mode: FormMode,
    draft: PostDraft,
}

impl PostForm {
    #[cfg(test)]
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&PostId> {
        match &self.mode {
            FormMode::Idle => None,
            FormMode::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id().is_some()
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.draft.title,
            FormField::Author => &self.draft.author,
            FormField::Body => &self.draft.body,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.draft.title = value,
            FormField::Author => self.draft.author = value,
            FormField::Body => self.draft.body = value,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.draft.is_complete()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Post"
        } else {
            "Add Post"
        }
    }

    /// Pre-fills the fields from `post` and targets it for update.
    pub fn begin_edit(&mut self, post: &Post) {
        self.draft = post.to_draft();
        self.mode = FormMode::Editing(post.id.clone());
    }

    pub fn cancel(&mut self) {
        self.mode = FormMode::Idle;
        self.draft = PostDraft::default();
    }

    /// Returns `None` and keeps the form as-is while a required field is blank. Otherwise the
    /// form resets to Idle with empty fields.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }

        let draft = std::mem::take(&mut self.draft);
        let draft = PostDraft {
            title: draft.title.trim().to_string(),
            author: draft.author.trim().to_string(),
            body: draft.body.trim_end().to_string(),
        };

        Some(match std::mem::take(&mut self.mode) {
            FormMode::Idle => Submission::Create(draft),
            FormMode::Editing(id) => Submission::Update(id, draft),
        })
    }
}
