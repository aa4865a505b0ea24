use clap::Parser;
use std::path::PathBuf;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

mod grades;
mod gui;
mod input_filter;
mod navigation;
mod session;
mod settings;
mod theme;

use settings::{default_base_path, load_settings, Settings};
use theme::ThemeMode;

#[derive(Parser, Debug)]
#[command(
    name = "gradebook-desk",
    version,
    about = "Average a student's partial grades and review their subject history"
)]
struct CliArgs {
    /// Folder holding config/settings.json (defaults to ./data next to the exe)
    #[arg(long)]
    base_path: Option<PathBuf>,
    /// Palette to start with
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,
    /// Hide the details view and subject history
    #[arg(long)]
    no_details: bool,
    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    tracing_subscriber::registry().with(fmt).with(filter).init();
}

fn main() {
    let args = CliArgs::parse();
    let base_path = args.base_path.clone().unwrap_or_else(default_base_path);

    let loaded = load_settings(&base_path);
    let mut settings = match &loaded {
        Ok(s) => s.clone(),
        Err(_) => Settings::default(),
    };

    if let Some(level) = args.log_level {
        settings.log_level = level;
    }
    if let Some(theme) = args.theme {
        settings.ui.start_theme = theme;
    }
    if args.no_details {
        settings.ui.details_enabled = false;
    }

    init_tracing(&settings.log_level);
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "falling back to default settings");
    }
    tracing::info!(base = %base_path.display(), "starting");

    if let Err(e) = gui::launch_gui(settings) {
        tracing::error!(error = %e, "failed to start the window");
    }
}
