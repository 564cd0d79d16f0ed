//! Immediate-mode panels. Each one only reads state and pushes [`UiAction`]s; the app applies
//! them after the frame has been laid out.

use eframe::egui;
use shared::domain::{Post, SortKey};

use crate::controller::events::{FormField, UiAction};
use crate::controller::form::PostForm;
use crate::ui::theme::{card_palette, ThemePreset};
use crate::ui::view_model::{ListView, PostCard};

pub fn post_form(ui: &mut egui::Ui, form: &PostForm, actions: &mut Vec<UiAction>) {
    let heading = if form.is_editing() {
        "Edit post"
    } else {
        "New post"
    };
    ui.heading(heading);
    ui.add_space(6.0);

    for (field, label, hint) in [
        (FormField::Title, "Title", "What is it about?"),
        (FormField::Author, "Author", "Who is writing?"),
    ] {
        ui.label(egui::RichText::new(label).strong());
        let mut value = form.field(field).to_string();
        let edit = egui::TextEdit::singleline(&mut value)
            .id_salt(label)
            .hint_text(hint)
            .desired_width(f32::INFINITY);
        if ui.add(edit).changed() {
            actions.push(UiAction::EditField(field, value));
        }
        ui.add_space(4.0);
    }

    ui.label(egui::RichText::new("Body").strong());
    let mut body = form.field(FormField::Body).to_string();
    let edit = egui::TextEdit::multiline(&mut body)
        .id_salt("Body")
        .hint_text("Write your post")
        .desired_rows(8)
        .desired_width(f32::INFINITY);
    if ui.add(edit).changed() {
        actions.push(UiAction::EditField(FormField::Body, body));
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let submit = egui::Button::new(form.submit_label());
        if ui.add_enabled(form.can_submit(), submit).clicked() {
            actions.push(UiAction::Submit);
        }
        if form.is_editing() && ui.button("Cancel").clicked() {
            actions.push(UiAction::CancelEdit);
        }
    });
    if !form.can_submit() {
        ui.label(
            egui::RichText::new("Title, author and body are required.")
                .small()
                .weak(),
        );
    }
}

pub fn toolbar(
    ui: &mut egui::Ui,
    author_filter: &str,
    sort: SortKey,
    counts: (usize, usize),
    theme: &mut ThemePreset,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.label("Sort by");
        let mut selected = sort;
        egui::ComboBox::from_id_salt("sort_selector")
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for option in [SortKey::Newest, SortKey::Author] {
                    ui.selectable_value(&mut selected, option, option.label());
                }
            });
        if selected != sort {
            actions.push(UiAction::SetSort(selected));
        }

        ui.separator();

        let mut filter = author_filter.to_string();
        let edit = egui::TextEdit::singleline(&mut filter)
            .id_salt("author_filter")
            .hint_text("Filter by author")
            .desired_width(180.0);
        if ui.add(edit).changed() {
            actions.push(UiAction::SetFilter(filter));
        }
        if ui
            .add_enabled(!author_filter.is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            actions.push(UiAction::ClearFilter);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let next = theme.toggled();
            if ui.button(format!("{} theme", next.label())).clicked() {
                *theme = next;
            }
            let (visible, total) = counts;
            ui.label(egui::RichText::new(format!("{visible} of {total} posts")).weak());
        });
    });
}

pub fn post_list(ui: &mut egui::Ui, view: &ListView, actions: &mut Vec<UiAction>) {
    match view {
        ListView::Empty { .. } => {
            ui.add_space(32.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(view.empty_message().unwrap_or_default())
                        .weak()
                        .size(15.0),
                );
            });
        }
        ListView::Cards(cards) => {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for card in cards {
                        post_card(ui, card, actions);
                        ui.add_space(8.0);
                    }
                });
        }
    }
}

fn post_card(ui: &mut egui::Ui, card: &PostCard, actions: &mut Vec<UiAction>) {
    let palette = card_palette(ui.visuals());
    let stroke = if card.is_being_edited {
        palette.editing_stroke
    } else {
        palette.stroke
    };

    egui::Frame::NONE
        .fill(palette.fill)
        .stroke(stroke)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&card.title).strong().size(16.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Delete").clicked() {
                        actions.push(UiAction::RequestDelete(card.id.clone()));
                    }
                    if ui.button("Edit").clicked() {
                        actions.push(UiAction::BeginEdit(card.id.clone()));
                    }
                });
            });
            ui.label(
                egui::RichText::new(format!("by {} · {}", card.author, card.timestamp_label))
                    .small()
                    .color(palette.meta_text),
            );
            ui.add_space(4.0);
            ui.label(&card.body);
        });
}

pub fn confirm_delete_dialog(ctx: &egui::Context, post: &Post, actions: &mut Vec<UiAction>) {
    egui::Window::new("Delete post?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "\"{}\" by {} will be removed permanently.",
                post.title, post.author
            ));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    actions.push(UiAction::ConfirmDelete);
                }
                if ui.button("Keep").clicked() {
                    actions.push(UiAction::DeclineDelete);
                }
            });
        });
}

pub fn status_bar(ui: &mut egui::Ui, status: &str, storage_label: &str) {
    ui.horizontal(|ui| {
        ui.label(status);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(storage_label).small().weak());
        });
    });
}
