// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell.
//! Handles layout and form controls; all work is delegated to the MVU kernel.

pub mod components;

use eframe::egui;

use crate::config::Settings;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{results, selection};

/// Stateful egui application for mailing PDFs.
pub struct PdfMailerApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl PdfMailerApp {
    /// Start the command worker and seed the form from `settings`.
    ///
    /// A single worker keeps runs strictly sequential: a send blocks the
    /// worker until every item has been attempted.
    pub fn new(settings: Settings) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        std::thread::spawn(move || {
            for cmd in cmd_rx.iter() {
                let msg = mvu::run_command(cmd);
                let _ = msg_tx.send(msg);
            }
        });

        Self {
            model: AppModel::new(settings),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }

    fn busy(&self) -> bool {
        self.model.pending_commands > 0
    }
}

impl eframe::App for PdfMailerApp {
    /// Required by eframe 0.34; all drawing happens in `update`, which eframe still calls each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drain worker replies, apply queued messages, forward commands, and draw the frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pull messages produced by the command worker.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        // Keep polling the worker while it is busy.
        if self.busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Mail PDFs");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_send_button(ui);
                    ui.separator();
                    let mut dry_run = self.model.form.dry_run;
                    if ui
                        .checkbox(&mut dry_run, "Dry run (preview only)")
                        .changed()
                    {
                        self.inbox.push(Msg::DryRunChanged(dry_run));
                    }
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::SidePanel::left("sender_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.render_sender_form(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.strong("PDFs to send");
                ui.label(
                    egui::RichText::new(
                        "Each PDF is emailed separately. ZIP archives are searched for PDFs.",
                    )
                    .small()
                    .color(egui::Color32::from_gray(110)),
                );
                ui.add_space(4.0);
                let enabled = !self.busy();
                let sel_msgs = selection::view(ui, &self.model.selection, enabled);
                self.inbox.extend(sel_msgs.into_iter().map(Msg::Selection));

                ui.add_space(12.0);
                ui.separator();
                ui.strong("Results");
                ui.add_space(4.0);
                results::view(
                    ui,
                    &self.model.results,
                    self.model.summary.as_ref(),
                    &self.model.run_warnings,
                );
            });
        });
    }
}

impl PdfMailerApp {
    fn render_send_button(&mut self, ui: &mut egui::Ui) {
        let label = if self.model.form.dry_run {
            format!("{} Preview emails", egui_phosphor::regular::EYE)
        } else {
            format!("{} Send emails", egui_phosphor::regular::PAPER_PLANE_TILT)
        };
        let has_pdfs = !self.model.selection.collected().items.is_empty();
        if ui
            .add_enabled(!self.busy() && has_pdfs, egui::Button::new(label))
            .on_disabled_hover_text("Select PDFs first, or wait for the current run")
            .clicked()
        {
            self.inbox.push(Msg::SendRequested);
        }
    }

    /// Sender identity, recipient, and SMTP connection settings.
    fn render_sender_form(&mut self, ui: &mut egui::Ui) {
        let form = &self.model.form;
        let mut sender_name = form.sender_name.clone();
        let mut sender_email = form.sender_email.clone();
        let mut password = form.password.clone();
        let mut recipient = form.recipient.clone();
        let mut host = form.smtp_host.clone();
        let mut port = form.smtp_port;
        let mut use_tls = form.use_tls;

        ui.strong("Sender");
        egui::Grid::new("sender_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 8.0))
            .show(ui, |ui| {
                ui.label("Name");
                if ui
                    .add(egui::TextEdit::singleline(&mut sender_name).hint_text("e.g., Accounts Team"))
                    .changed()
                {
                    self.inbox.push(Msg::SenderNameChanged(sender_name));
                }
                ui.end_row();

                ui.label("Email");
                if ui
                    .add(egui::TextEdit::singleline(&mut sender_email).hint_text("you@example.com"))
                    .changed()
                {
                    self.inbox.push(Msg::SenderEmailChanged(sender_email));
                }
                ui.end_row();

                ui.label("Password");
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut password)
                            .password(true)
                            .hint_text("App password"),
                    )
                    .changed()
                {
                    self.inbox.push(Msg::PasswordChanged(password));
                }
                ui.end_row();

                ui.label("Recipient");
                if ui
                    .add(egui::TextEdit::singleline(&mut recipient).hint_text("books@example.org"))
                    .changed()
                {
                    self.inbox.push(Msg::RecipientChanged(recipient));
                }
                ui.end_row();
            });

        ui.add_space(12.0);
        ui.strong("SMTP server");
        egui::Grid::new("smtp_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 8.0))
            .show(ui, |ui| {
                ui.label("Host");
                if ui.text_edit_singleline(&mut host).changed() {
                    self.inbox.push(Msg::SmtpHostChanged(host));
                }
                ui.end_row();

                ui.label("Port");
                if ui
                    .add(egui::DragValue::new(&mut port).range(1..=65535))
                    .changed()
                {
                    self.inbox.push(Msg::SmtpPortChanged(port));
                }
                ui.end_row();

                ui.label("STARTTLS");
                if ui.checkbox(&mut use_tls, "").changed() {
                    self.inbox.push(Msg::UseTlsChanged(use_tls));
                }
                ui.end_row();
            });

        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(
                "For Gmail, create an app password under Google Account > Security > App passwords.",
            )
            .small()
            .color(egui::Color32::from_gray(110)),
        );
    }

    /// Modal listing validation or fatal transport errors.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if self.model.errors.is_empty() {
            return;
        }
        egui::Window::new("Cannot send")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                for message in &self.model.errors {
                    ui.label(format!("• {message}"));
                }
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.inbox.push(Msg::DismissErrors);
                }
            });
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(68)));
                if self.busy() {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text("Working in the background");
                }
            });
        }
    }
}
