use clap::ValueEnum;
use eframe::egui::{self, Color32, Context, Rounding};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Day,
    Night,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        }
    }

    /// Caption for the toggle button, naming the mode it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Day => "Night mode",
            ThemeMode::Night => "Day mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub accent: String,
    pub border: String,
    pub radius: f32,
    pub font_size_base: f32,
}

pub fn day_preset() -> ThemeConfig {
    ThemeConfig {
        name: "day".to_string(),
        background: "#ffffff".to_string(),
        surface: "#ffffff".to_string(),
        text: "#000000".to_string(),
        accent: "#2b78e4".to_string(),
        border: "#d0d5dc".to_string(),
        radius: 4.0,
        font_size_base: 15.0,
    }
}

pub fn night_preset() -> ThemeConfig {
    ThemeConfig {
        name: "night".to_string(),
        background: "#404040".to_string(),
        surface: "#404040".to_string(),
        text: "#ffffff".to_string(),
        accent: "#4caf50".to_string(),
        border: "#6b6b6b".to_string(),
        radius: 4.0,
        font_size_base: 15.0,
    }
}

/// Colors resolved from a [`ThemeConfig`], cached while the app runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub surface: Color32,
    pub text: Color32,
    pub accent: Color32,
    pub border: Color32,
    pub radius: f32,
    pub font_size_base: f32,
}

impl From<&ThemeConfig> for Palette {
    fn from(theme: &ThemeConfig) -> Self {
        Self {
            background: parse_color(&theme.background),
            surface: parse_color(&theme.surface),
            text: parse_color(&theme.text),
            accent: parse_color(&theme.accent),
            border: parse_color(&theme.border),
            radius: theme.radius,
            font_size_base: theme.font_size_base,
        }
    }
}

impl Palette {
    pub fn is_dark(&self) -> bool {
        let bg = self.background;
        // Simple luminance check; lower means darker.
        let luminance =
            0.2126 * (bg.r() as f32) + 0.7152 * (bg.g() as f32) + 0.0722 * (bg.b() as f32);
        luminance < 128.0
    }
}

#[derive(Debug)]
pub struct Theme {
    mode: ThemeMode,
    day: ThemeConfig,
    night: ThemeConfig,
    palette: Option<Palette>,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        Self::with_presets(mode, day_preset(), night_preset())
    }

    pub fn with_presets(mode: ThemeMode, day: ThemeConfig, night: ThemeConfig) -> Self {
        let mut theme = Self {
            mode,
            day,
            night,
            palette: None,
        };
        theme.palette = Some(Palette::from(theme.config()));
        theme
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn config(&self) -> &ThemeConfig {
        match self.mode {
            ThemeMode::Day => &self.day,
            ThemeMode::Night => &self.night,
        }
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Switches between day and night. Has no effect once released.
    pub fn toggle(&mut self) {
        if self.palette.is_none() {
            return;
        }
        self.mode = self.mode.toggled();
        self.palette = Some(Palette::from(self.config()));
        tracing::info!(mode = ?self.mode, "theme switched");
    }

    /// Drops the cached palette. Returns `false` if it was already gone.
    pub fn release(&mut self) -> bool {
        let released = self.palette.take().is_some();
        if released {
            tracing::debug!("palette released");
        }
        released
    }

    pub fn apply(&self, ctx: &Context) {
        if let Some(palette) = self.palette() {
            apply_palette(palette, ctx);
        }
    }
}

pub fn apply_palette(palette: &Palette, ctx: &Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = if palette.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.override_text_color = Some(palette.text);
    visuals.panel_fill = palette.background;
    visuals.window_fill = palette.background;
    visuals.extreme_bg_color = palette.surface;
    visuals.faint_bg_color = palette.surface;

    visuals.widgets.noninteractive.bg_fill = palette.surface;
    visuals.widgets.noninteractive.fg_stroke.color = palette.text;
    visuals.widgets.inactive.bg_fill = palette.surface;
    visuals.widgets.inactive.weak_bg_fill = palette.surface;
    visuals.widgets.inactive.fg_stroke.color = palette.text;
    visuals.widgets.inactive.bg_stroke.color = palette.border;
    visuals.widgets.hovered.bg_stroke.color = palette.accent;
    visuals.widgets.hovered.fg_stroke.color = palette.text;
    visuals.widgets.active.bg_stroke.color = palette.accent;
    visuals.widgets.active.fg_stroke.color = palette.text;
    visuals.selection.stroke.color = palette.accent;

    visuals.window_rounding = Rounding::same(palette.radius);
    visuals.widgets.noninteractive.rounding = Rounding::same(palette.radius);
    visuals.widgets.inactive.rounding = Rounding::same(palette.radius);
    visuals.widgets.hovered.rounding = Rounding::same(palette.radius);
    visuals.widgets.active.rounding = Rounding::same(palette.radius);

    style.text_styles = [
        (
            egui::TextStyle::Small,
            egui::FontId::proportional(palette.font_size_base - 2.0),
        ),
        (
            egui::TextStyle::Body,
            egui::FontId::proportional(palette.font_size_base),
        ),
        (
            egui::TextStyle::Button,
            egui::FontId::proportional(palette.font_size_base),
        ),
        (
            egui::TextStyle::Heading,
            egui::FontId::proportional(palette.font_size_base + 5.0),
        ),
        (
            egui::TextStyle::Monospace,
            egui::FontId::monospace(palette.font_size_base - 1.0),
        ),
    ]
    .into();
    style.visuals = visuals;
    ctx.set_style(style);
}

pub fn parse_color(hex: &str) -> Color32 {
    let h = hex.trim_start_matches('#');
    if h.len() == 6 {
        if let Ok(rgb) = u32::from_str_radix(h, 16) {
            let r = ((rgb >> 16) & 0xFF) as u8;
            let g = ((rgb >> 8) & 0xFF) as u8;
            let b = (rgb & 0xFF) as u8;
            return Color32::from_rgb(r, g, b);
        }
    } else if h.len() == 8 {
        if let Ok(rgba) = u32::from_str_radix(h, 16) {
            let r = ((rgba >> 24) & 0xFF) as u8;
            let g = ((rgba >> 16) & 0xFF) as u8;
            let b = ((rgba >> 8) & 0xFF) as u8;
            let a = (rgba & 0xFF) as u8;
            return Color32::from_rgba_premultiplied(r, g, b, a);
        }
    }
    Color32::LIGHT_GRAY
}
