use crate::grades::{evaluate, MAX_NAME_LENGTH};
use crate::gui::models::{DetailForm, Notice, NoticeLevel, PrimaryForm};
use crate::input_filter::filter_edit;
use crate::navigation::{Navigator, Prompt, View};
use crate::session::{Rating, Session, Term};
use crate::settings::Settings;
use crate::theme::{day_preset, night_preset, Theme};
use eframe::{
    egui::{self, Align2, CentralPanel, Context, RichText, ScrollArea},
    App, CreationContext,
};
use std::panic::{self, AssertUnwindSafe};

const PARTIAL_LABELS: [&str; 3] = ["Partial 1:", "Partial 2:", "Partial 3:"];

enum PrimaryAction {
    Calculate,
    ToggleTheme,
    ViewDetails,
}

enum DetailAction {
    AddSubject,
    SaveComments,
    Back,
    Exit,
}

pub struct GradebookApp {
    session: Session,
    navigator: Navigator,
    theme: Theme,
    primary: PrimaryForm,
    detail: DetailForm,
    result_label: String,
    notice: Option<Notice>,
    next_notice_id: u64,
}

impl GradebookApp {
    pub fn new(cc: &CreationContext<'_>, settings: &Settings) -> Self {
        let app = Self::from_settings(settings);
        app.theme.apply(&cc.egui_ctx);
        app
    }

    fn from_settings(settings: &Settings) -> Self {
        let theme = match (&settings.ui.day_theme, &settings.ui.night_theme) {
            (None, None) => Theme::new(settings.ui.start_theme),
            (day, night) => Theme::with_presets(
                settings.ui.start_theme,
                day.clone().unwrap_or_else(day_preset),
                night.clone().unwrap_or_else(night_preset),
            ),
        };
        Self {
            session: Session::new(),
            navigator: Navigator::new(settings.ui.details_enabled),
            theme,
            primary: PrimaryForm::default(),
            detail: DetailForm::default(),
            result_label: String::new(),
            notice: None,
            next_notice_id: 0,
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.next_notice_id += 1;
        self.notice = Some(Notice {
            id: self.next_notice_id,
            level,
            message: message.into(),
        });
    }

    /// Runs a user action, turning a panic into an error notice so the
    /// session survives it.
    fn run_action(&mut self, name: &str, action: impl FnOnce(&mut Self)) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| action(self)));
        if outcome.is_err() {
            tracing::error!(action = name, "action failed unexpectedly");
            self.notify(
                NoticeLevel::Error,
                format!("Unexpected error while trying to {name}"),
            );
        }
    }

    fn calculate(&mut self) {
        let [g1, g2, g3] = self.primary.partial_refs();
        match evaluate(&self.primary.student_name, g1, g2, g3) {
            Ok(result) => {
                tracing::info!(
                    student = %result.student_name,
                    average = result.average,
                    status = %result.status,
                    "evaluated grades"
                );
                self.result_label = result.to_string();
                self.session.record_evaluation(result);
            }
            Err(e) => {
                tracing::warn!(error = %e, "evaluation rejected");
                self.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }

    fn view_details(&mut self) {
        let was_primary = self.navigator.view() == View::Primary;
        match self.navigator.open_detail(&self.session) {
            Ok(()) if was_primary && self.navigator.view() == View::Detail => {
                self.session.open_history();
                self.detail = DetailForm::default();
            }
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(error = %e, "details view refused");
                self.notify(NoticeLevel::Error, e.to_string());
            }
        }
    }

    fn add_subject(&mut self) {
        match self.session.add_subject(
            &self.detail.subject_name,
            &self.detail.subject_grade,
            self.detail.term,
        ) {
            Ok(entry) => {
                tracing::info!(
                    subject = %entry.subject_name,
                    grade = entry.grade,
                    term = %entry.term,
                    "subject added"
                );
                self.detail.clear_subject();
                self.notify(NoticeLevel::Info, "Subject added successfully");
            }
            Err(e) => {
                tracing::warn!(error = %e, "subject rejected");
                self.notify(NoticeLevel::Warning, e.to_string());
            }
        }
    }

    fn save_comments(&mut self) {
        match self
            .session
            .record_comments(self.detail.rating, &self.detail.comments)
        {
            Ok(ack) => {
                tracing::info!(rating = %ack.rating, "evaluation comments saved");
                self.notify(NoticeLevel::Info, ack.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "comments rejected");
                self.notify(NoticeLevel::Warning, e.to_string());
            }
        }
    }

    fn toggle_theme(&mut self, ctx: &Context) {
        self.theme.toggle();
        self.theme.apply(ctx);
    }

    fn resolve_prompt(&mut self, ctx: &Context, confirmed: bool) {
        match self.navigator.resolve(confirmed) {
            Ok(View::Terminated) => {
                self.theme.release();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "prompt dismissed"),
        }
    }

    fn is_blocked(&self) -> bool {
        self.notice.is_some() || self.navigator.pending_prompt().is_some()
    }

    fn render_primary(&mut self, ui: &mut egui::Ui) -> Option<PrimaryAction> {
        let mut action = None;
        ui.heading("Student grades");
        ui.add_space(6.0);

        egui::Grid::new("primary_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Student name:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.primary.student_name)
                        .char_limit(MAX_NAME_LENGTH),
                );
                ui.end_row();

                let fields = PARTIAL_LABELS.iter().zip(self.primary.partials.iter_mut());
                for (label, text) in fields {
                    ui.label(*label);
                    numeric_field(ui, text, "0 - 100");
                    ui.end_row();
                }
            });

        ui.add_space(6.0);
        ui.vertical_centered_justified(|ui| {
            if ui.button("Calculate average").clicked() {
                action = Some(PrimaryAction::Calculate);
            }
            if ui.button(self.theme.mode().toggle_label()).clicked() {
                action = Some(PrimaryAction::ToggleTheme);
            }
            ui.add_space(4.0);
            ui.label(RichText::new(&self.result_label).strong());
            ui.add_space(4.0);
            let can_open =
                self.session.last_evaluation().is_some() && self.navigator.details_enabled();
            if ui
                .add_enabled(can_open, egui::Button::new("View details"))
                .clicked()
            {
                action = Some(PrimaryAction::ViewDetails);
            }
        });

        action
    }

    fn render_detail(&mut self, ctx: &Context, enabled: bool) -> Option<DetailAction> {
        let mut action = None;
        let evaluation = self.session.last_evaluation().cloned();
        let history = self.session.history().to_vec();
        let detail = &mut self.detail;

        egui::Window::new("Student details")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    ui.group(|ui| {
                        ui.label(RichText::new("Student information").strong());
                        egui::Grid::new("detail_info").num_columns(2).show(ui, |ui| {
                            if let Some(result) = &evaluation {
                                ui.label("Name:");
                                ui.label(&result.student_name);
                                ui.end_row();
                                ui.label("Average:");
                                ui.label(format!("{:.2}", result.average));
                                ui.end_row();
                                ui.label("Status:");
                                ui.label(result.status.to_string());
                                ui.end_row();
                            }
                        });
                    });

                    ui.group(|ui| {
                        ui.label(RichText::new("Add subject").strong());
                        egui::Grid::new("detail_subject")
                            .num_columns(2)
                            .show(ui, |ui| {
                                ui.label("Subject:");
                                ui.text_edit_singleline(&mut detail.subject_name);
                                ui.end_row();
                                ui.label("Grade:");
                                numeric_field(ui, &mut detail.subject_grade, "0 - 100");
                                ui.end_row();
                                ui.label("Term:");
                                egui::ComboBox::from_id_source("detail_term")
                                    .selected_text(detail.term.label())
                                    .show_ui(ui, |ui| {
                                        for term in Term::ALL {
                                            ui.selectable_value(
                                                &mut detail.term,
                                                term,
                                                term.label(),
                                            );
                                        }
                                    });
                                ui.end_row();
                            });
                        if ui.button("Add subject").clicked() {
                            action = Some(DetailAction::AddSubject);
                        }
                    });

                    ui.label("Subject history:");
                    ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                        egui::Grid::new("detail_history")
                            .num_columns(4)
                            .striped(true)
                            .min_col_width(90.0)
                            .show(ui, |ui| {
                                for title in ["Subject", "Grade", "Term", "Status"] {
                                    ui.label(RichText::new(title).strong());
                                }
                                ui.end_row();
                                for entry in &history {
                                    ui.label(&entry.subject_name);
                                    ui.label(format!("{:.1}", entry.grade));
                                    ui.label(entry.term.label());
                                    ui.label(entry.status.to_string());
                                    ui.end_row();
                                }
                            });
                    });

                    ui.group(|ui| {
                        ui.label(RichText::new("Student evaluation").strong());
                        egui::Grid::new("detail_comments")
                            .num_columns(2)
                            .show(ui, |ui| {
                                ui.label("Rating:");
                                egui::ComboBox::from_id_source("detail_rating")
                                    .selected_text(detail.rating.label())
                                    .show_ui(ui, |ui| {
                                        for rating in Rating::ALL {
                                            ui.selectable_value(
                                                &mut detail.rating,
                                                rating,
                                                rating.label(),
                                            );
                                        }
                                    });
                                ui.end_row();
                                ui.label("Comments:");
                                ui.add(
                                    egui::TextEdit::multiline(&mut detail.comments)
                                        .desired_rows(3),
                                );
                                ui.end_row();
                            });
                    });

                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            action = Some(DetailAction::SaveComments);
                        }
                        if ui.button("Back").clicked() {
                            action = Some(DetailAction::Back);
                        }
                        if ui.button("Exit").clicked() {
                            action = Some(DetailAction::Exit);
                        }
                    });
                });
            });

        action
    }

    fn render_notice(&mut self, ctx: &Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.level.title())
            .id(egui::Id::new(("notice", notice.id)))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notice = None;
        }
    }

    fn render_prompt(&mut self, ctx: &Context) {
        let Some(prompt) = self.navigator.pending_prompt() else {
            return;
        };
        let mut answer = None;
        egui::Window::new("Confirm")
            .id(egui::Id::new(("prompt", prompt_key(prompt))))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(prompt.message());
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("No").clicked() {
                        answer = Some(false);
                    }
                });
            });
        if let Some(confirmed) = answer {
            self.resolve_prompt(ctx, confirmed);
        }
    }
}

fn prompt_key(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::CloseApp => "close",
        Prompt::ExitApp => "exit",
    }
}

/// A single-line field that only takes digits and one decimal point.
fn numeric_field(ui: &mut egui::Ui, text: &mut String, hint: &str) {
    let before = text.clone();
    let response = ui.add(egui::TextEdit::singleline(text).hint_text(hint));
    if response.changed() {
        *text = filter_edit(&before, text);
    }
}

impl App for GradebookApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.navigator.view() == View::Terminated {
            return;
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.navigator.request_close();
        }

        let blocked = self.is_blocked();
        let in_detail = self.navigator.view() == View::Detail;

        let primary_action = CentralPanel::default()
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked && !in_detail, |ui| self.render_primary(ui))
                    .inner
            })
            .inner;

        let detail_action = if in_detail {
            self.render_detail(ctx, !blocked)
        } else {
            None
        };

        match primary_action {
            Some(PrimaryAction::Calculate) => {
                self.run_action("calculate the average", Self::calculate)
            }
            Some(PrimaryAction::ToggleTheme) => {
                self.run_action("switch the theme", |app| app.toggle_theme(ctx))
            }
            Some(PrimaryAction::ViewDetails) => {
                self.run_action("open the details", Self::view_details)
            }
            None => {}
        }

        match detail_action {
            Some(DetailAction::AddSubject) => {
                self.run_action("add the subject", Self::add_subject)
            }
            Some(DetailAction::SaveComments) => {
                self.run_action("save the evaluation", Self::save_comments)
            }
            Some(DetailAction::Back) => self.navigator.back(),
            Some(DetailAction::Exit) => self.navigator.request_exit(),
            None => {}
        }

        self.render_notice(ctx);
        self.render_prompt(ctx);
    }
}

pub fn launch_gui(settings: Settings) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Student Grades")
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([360.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gradebook Desk",
        native_options,
        Box::new(move |cc| Box::new(GradebookApp::new(cc, &settings))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::Status;
    use crate::theme::ThemeMode;

    fn app() -> GradebookApp {
        GradebookApp::from_settings(&Settings::default())
    }

    fn fill(app: &mut GradebookApp, name: &str, grades: [&str; 3]) {
        app.primary.student_name = name.to_string();
        for (slot, g) in app.primary.partials.iter_mut().zip(grades) {
            *slot = g.to_string();
        }
    }

    #[test]
    fn calculate_records_result() {
        let mut app = app();
        fill(&mut app, "Ana", ["85", "78", "65"]);
        app.calculate();
        assert_eq!(app.result_label, "Ana - Average: 76.00 - PASS");
        assert_eq!(app.session.last_evaluation().unwrap().status, Status::Pass);
        assert!(app.notice.is_none());
    }

    #[test]
    fn failed_calculation_keeps_previous_result() {
        let mut app = app();
        fill(&mut app, "Ana", ["85", "78", "65"]);
        app.calculate();
        fill(&mut app, "Luis", ["85", "", "65"]);
        app.calculate();
        assert_eq!(app.session.last_evaluation().unwrap().student_name, "Ana");
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "The grade for partial 2 is required");
    }

    #[test]
    fn details_refused_before_calculation() {
        let mut app = app();
        app.view_details();
        assert_eq!(app.navigator.view(), View::Primary);
        assert!(app.session.history().is_empty());
        assert!(app.notice.is_some());
    }

    #[test]
    fn details_visit_starts_from_samples() {
        let mut app = app();
        fill(&mut app, "Ana", ["85", "78", "65"]);
        app.calculate();
        app.view_details();
        assert_eq!(app.navigator.view(), View::Detail);

        app.detail.subject_name = "Chemistry".to_string();
        app.detail.subject_grade = "70".to_string();
        app.add_subject();
        assert_eq!(app.session.history().len(), 4);
        assert!(app.detail.subject_name.is_empty());
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Info);

        app.navigator.back();
        app.view_details();
        assert_eq!(app.session.history().len(), 3);
    }

    #[test]
    fn empty_comments_warn() {
        let mut app = app();
        app.detail.comments = "   ".to_string();
        app.save_comments();
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn panicking_action_becomes_notice() {
        let mut app = app();
        app.run_action("explode", |_| panic!("boom"));
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("explode"));
    }

    #[test]
    fn declined_close_keeps_palette_and_confirmed_close_releases_it() {
        let mut app = app();
        let ctx = egui::Context::default();

        app.navigator.request_close();
        app.resolve_prompt(&ctx, false);
        assert_eq!(app.navigator.view(), View::Primary);
        assert!(app.theme.palette().is_some());

        app.navigator.request_close();
        app.resolve_prompt(&ctx, true);
        assert_eq!(app.navigator.view(), View::Terminated);
        assert!(app.theme.palette().is_none());
        assert!(!app.theme.release());
    }

    #[test]
    fn exit_from_details_releases_palette() {
        let mut app = app();
        let ctx = egui::Context::default();
        fill(&mut app, "Ana", ["85", "78", "65"]);
        app.calculate();
        app.view_details();

        app.navigator.request_exit();
        app.resolve_prompt(&ctx, true);
        assert_eq!(app.navigator.view(), View::Terminated);
        assert!(app.theme.palette().is_none());

        app.resolve_prompt(&ctx, true);
        assert!(app.theme.palette().is_none());
    }

    #[test]
    fn toggling_theme_restyles_context() {
        let mut app = app();
        let ctx = egui::Context::default();
        app.theme.apply(&ctx);
        assert_eq!(ctx.style().visuals.override_text_color, Some(egui::Color32::BLACK));

        app.toggle_theme(&ctx);
        assert_eq!(app.theme.mode(), ThemeMode::Night);
        assert_eq!(ctx.style().visuals.override_text_color, Some(egui::Color32::WHITE));
        assert!(ctx.style().visuals.dark_mode);
    }

    #[test]
    fn settings_pick_start_theme() {
        let mut settings = Settings::default();
        settings.ui.start_theme = ThemeMode::Night;
        let app = GradebookApp::from_settings(&settings);
        assert_eq!(app.theme.mode(), ThemeMode::Night);
    }
}
