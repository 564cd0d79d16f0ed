//! Applies UI actions to the post store and the transient view state.

use shared::domain::{Post, PostId, SortKey};
use storage::{KeyValueStore, PostStore};

use crate::controller::events::UiAction;
use crate::controller::form::{PostForm, Submission};
use crate::ui::view_model::{build_list_view, ListView};

pub struct NotesController<S> {
    store: PostStore<S>,
    form: PostForm,
    author_filter: String,
    sort: SortKey,
    pending_delete: Option<PostId>,
    status: String,
}

impl<S: KeyValueStore> NotesController<S> {
    pub fn new(store: PostStore<S>, sort: SortKey) -> Self {
        let status = match store.len() {
            0 => "No posts saved yet".to_string(),
            1 => "Loaded 1 post".to_string(),
            n => format!("Loaded {n} posts"),
        };
        Self {
            store,
            form: PostForm::default(),
            author_filter: String::new(),
            sort,
            pending_delete: None,
            status,
        }
    }

    pub fn store(&self) -> &PostStore<S> {
        &self.store
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn author_filter(&self) -> &str {
        &self.author_filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    #[cfg(test)]
    pub fn pending_delete(&self) -> Option<&PostId> {
        self.pending_delete.as_ref()
    }

    pub fn pending_delete_post(&self) -> Option<&Post> {
        self.pending_delete.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn visible_posts(&self) -> Vec<Post> {
        self.store.list(&self.author_filter, self.sort)
    }

    pub fn list_view(&self) -> ListView {
        build_list_view(
            self.visible_posts(),
            &self.author_filter,
            self.form.editing_id(),
        )
    }

    pub fn dispatch(&mut self, action: UiAction) {
        tracing::debug!(action = action.name(), "handling ui action");

        match action {
            UiAction::EditField(field, value) => self.form.set_field(field, value),
            UiAction::Submit => self.submit(),
            UiAction::BeginEdit(id) => {
                if let Some(post) = self.store.get(&id) {
                    self.form.begin_edit(post);
                    self.status = format!("Editing \"{}\"", post.title);
                }
            }
            UiAction::CancelEdit => {
                if self.form.is_editing() {
                    self.status = "Edit cancelled".to_string();
                }
                self.form.cancel();
            }
            UiAction::RequestDelete(id) => {
                if self.store.get(&id).is_some() {
                    self.pending_delete = Some(id);
                }
            }
            UiAction::ConfirmDelete => self.confirm_delete(),
            UiAction::DeclineDelete => self.pending_delete = None,
            UiAction::SetFilter(filter) => self.author_filter = filter,
            UiAction::ClearFilter => self.author_filter.clear(),
            UiAction::SetSort(sort) => self.sort = sort,
        }
    }

    fn submit(&mut self) {
        let Some(submission) = self.form.submit() else {
            self.status = "Title, author and body are required".to_string();
            return;
        };

        match submission {
            Submission::Create(draft) => {
                let post = self.store.create(draft);
                self.status = format!("Added \"{}\"", post.title);
            }
            Submission::Update(id, draft) => {
                let title = draft.title.clone();
                if self.store.update(&id, draft) {
                    self.status = format!("Updated \"{title}\"");
                }
            }
        }
    }

    fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        if let Some(removed) = self.store.delete(&id) {
            self.status = format!("Deleted \"{}\"", removed.title);
        }
        if self.form.editing_id() == Some(&id) {
            self.form.cancel();
        }
    }
}
