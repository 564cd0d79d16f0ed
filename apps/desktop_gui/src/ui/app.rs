use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::SortKey;
use storage::KeyValueStore;

use crate::controller::orchestration::NotesController;
use crate::ui::panels;
use crate::ui::theme::{apply_theme, ThemePreset};

pub const VIEW_SETTINGS_STORAGE_KEY: &str = "post_notes.view_settings";

/// Presentation preferences remembered by eframe between runs. The editing state is never
/// part of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedViewSettings {
    pub sort: String,
    pub theme: ThemePreset,
}

impl Default for PersistedViewSettings {
    fn default() -> Self {
        Self {
            sort: SortKey::default().as_selector().to_string(),
            theme: ThemePreset::default(),
        }
    }
}

impl PersistedViewSettings {
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_selector(&self.sort)
    }

    pub fn from_runtime(sort: SortKey, theme: ThemePreset) -> Self {
        Self {
            sort: sort.as_selector().to_string(),
            theme,
        }
    }

    pub fn from_storage(storage: &dyn eframe::Storage) -> Option<Self> {
        storage
            .get_string(VIEW_SETTINGS_STORAGE_KEY)
            .and_then(|text| serde_json::from_str::<Self>(&text).ok())
    }
}

#[derive(Debug, Clone)]
struct StatusBanner {
    message: String,
}

pub struct NotesApp<S> {
    controller: NotesController<S>,
    theme: ThemePreset,
    applied_theme: Option<ThemePreset>,
    storage_label: String,
    status_banner: Option<StatusBanner>,
}

impl<S: KeyValueStore> NotesApp<S> {
    pub fn new(
        controller: NotesController<S>,
        theme: ThemePreset,
        storage_label: String,
        startup_warning: Option<String>,
    ) -> Self {
        Self {
            controller,
            theme,
            applied_theme: None,
            storage_label,
            status_banner: startup_warning.map(|message| StatusBanner { message }),
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.theme) {
            return;
        }
        apply_theme(ctx, self.theme);
        self.applied_theme = Some(self.theme);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };

        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(6.0);
    }
}

impl<S: KeyValueStore> eframe::App for NotesApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme_if_needed(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, self.controller.status(), &self.storage_label);
        });

        egui::SidePanel::left("post_form")
            .resizable(true)
            .default_width(340.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                panels::post_form(ui, self.controller.form(), &mut actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            let view = self.controller.list_view();
            panels::toolbar(
                ui,
                self.controller.author_filter(),
                self.controller.sort(),
                (view.len(), self.controller.store().len()),
                &mut self.theme,
                &mut actions,
            );
            ui.separator();
            panels::post_list(ui, &view, &mut actions);
        });

        if let Some(post) = self.controller.pending_delete_post() {
            panels::confirm_delete_dialog(ctx, post, &mut actions);
        }

        for action in actions {
            self.controller.dispatch(action);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedViewSettings::from_runtime(self.controller.sort(), self.theme);
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(VIEW_SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
