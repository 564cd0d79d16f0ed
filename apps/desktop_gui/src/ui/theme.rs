use eframe::egui;
use serde::{Deserialize, Serialize};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    #[default]
    Dark,
    Light,
}

impl ThemePreset {
    pub fn label(self) -> &'static str {
        match self {
            ThemePreset::Dark => "Dark",
            ThemePreset::Light => "Light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreset::Dark => ThemePreset::Light,
            ThemePreset::Light => ThemePreset::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardPalette {
    pub fill: egui::Color32,
    pub stroke: egui::Stroke,
    pub editing_stroke: egui::Stroke,
    pub meta_text: egui::Color32,
}

pub fn card_palette(visuals: &egui::Visuals) -> CardPalette {
    let fill = if visuals.dark_mode {
        lighten_color(visuals.panel_fill, 0.05)
    } else {
        visuals.extreme_bg_color
    };
    CardPalette {
        fill,
        stroke: egui::Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color),
        editing_stroke: egui::Stroke::new(2.0, ACCENT),
        meta_text: visuals.weak_text_color(),
    }
}

pub fn apply_theme(ctx: &egui::Context, preset: ThemePreset) {
    let mut style = (*ctx.style()).clone();
    style.visuals = visuals_for_theme(preset);
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.visuals.widgets.active.bg_stroke =
        egui::Stroke::new(1.2, style.visuals.selection.bg_fill.gamma_multiply(0.9));
    ctx.set_style(style);
}

fn visuals_for_theme(preset: ThemePreset) -> egui::Visuals {
    let mut visuals = match preset {
        ThemePreset::Dark => {
            let mut v = egui::Visuals::dark();
            v.window_fill = egui::Color32::from_rgb(43, 45, 49);
            v.panel_fill = egui::Color32::from_rgb(49, 51, 56);
            v.extreme_bg_color = egui::Color32::from_rgb(30, 31, 34);
            v
        }
        ThemePreset::Light => egui::Visuals::light(),
    };

    visuals.hyperlink_color = ACCENT;
    visuals.selection.bg_fill = ACCENT;
    visuals.window_corner_radius = egui::CornerRadius::same(8);
    visuals
}

fn lighten_color(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}
