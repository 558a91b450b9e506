// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring form state, messages, and commands.

use std::path::PathBuf;

use tracing::{error, info};

use crate::config::Settings;
use crate::logic::collect::{Collected, InputSource, collect, read_uploads};
use crate::logic::dispatch::{MailTransport, SmtpMailer, dispatch, oversized};
use crate::logic::report::{Summary, render_table, summarize};
use crate::logic::validate::{RunRequest, validate};
use crate::models::{DispatchOptions, PdfItem, SendResult, TransportConfig, Warning};
use crate::ui::components::selection::{
    self, SelectionCommand, SelectionModel, SelectionMsg,
};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Editable form values, prefilled from [`Settings::load`].
    pub form: Settings,
    /// Selected PDFs, ZIPs, or folder.
    pub selection: SelectionModel,
    /// Outcomes of the last run, in input order.
    pub results: Vec<SendResult>,
    pub summary: Option<Summary>,
    /// Advisory warnings raised when the last run started.
    pub run_warnings: Vec<Warning>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Validation or fatal transport messages shown in a modal.
    pub errors: Vec<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(form: Settings) -> Self {
        Self {
            form,
            ..Default::default()
        }
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    SenderNameChanged(String),
    SenderEmailChanged(String),
    PasswordChanged(String),
    RecipientChanged(String),
    SmtpHostChanged(String),
    SmtpPortChanged(u16),
    UseTlsChanged(bool),
    DryRunChanged(bool),
    SendRequested,
    /// Fresh collection of the selection, taken on the worker right before a run.
    SendPrepared {
        generation: u64,
        collected: Collected,
    },
    RunCompleted(Result<Vec<SendResult>, String>),
    DismissErrors,
    Selection(SelectionMsg),
}

/// Commands represent side-effects executed off the UI thread.
pub enum Command {
    PickFiles,
    PickFolder,
    ReadUploads(Vec<PathBuf>),
    Collect {
        generation: u64,
        source: InputSource,
    },
    PrepareSend {
        generation: u64,
        source: InputSource,
    },
    Send(SendPayload),
}

/// Captured, validated data for one run.
pub struct SendPayload {
    pub config: TransportConfig,
    pub items: Vec<PdfItem>,
    pub options: DispatchOptions,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::SenderNameChanged(v) => model.form.sender_name = v,
        Msg::SenderEmailChanged(v) => model.form.sender_email = v,
        Msg::PasswordChanged(v) => model.form.password = v,
        Msg::RecipientChanged(v) => model.form.recipient = v,
        Msg::SmtpHostChanged(v) => model.form.smtp_host = v,
        Msg::SmtpPortChanged(v) => model.form.smtp_port = v,
        Msg::UseTlsChanged(v) => model.form.use_tls = v,
        Msg::DryRunChanged(v) => model.form.dry_run = v,
        Msg::DismissErrors => model.errors.clear(),
        Msg::Selection(m) => {
            let mut sel_cmds = Vec::new();
            if let Some(event) = selection::update(&mut model.selection, m, &mut sel_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in sel_cmds {
                cmds.push(match c {
                    SelectionCommand::PickFiles => Command::PickFiles,
                    SelectionCommand::PickFolder => Command::PickFolder,
                    SelectionCommand::ReadUploads(paths) => Command::ReadUploads(paths),
                    SelectionCommand::Collect { generation, source } => {
                        Command::Collect { generation, source }
                    }
                });
            }
        }
        Msg::SendRequested => {
            if model.pending_commands > 0 {
                surface_event(model, "Please wait for the current task to finish.".into(), false);
                return;
            }
            // Re-collect so a folder reflects its current contents.
            model.status = Some("Checking the selection...".into());
            cmds.push(Command::PrepareSend {
                generation: model.selection.generation(),
                source: model.selection.source().clone(),
            });
        }
        Msg::SendPrepared {
            generation,
            collected,
        } => {
            if !model.selection.apply_collected(generation, collected) {
                surface_event(
                    model,
                    "The selection changed. Please press Send again.".into(),
                    false,
                );
                return;
            }
            match prepare_send(model) {
                Ok(payload) => {
                    let mode = if payload.options.dry_run { "Previewing" } else { "Sending" };
                    model.status = Some(format!(
                        "{mode} {} email(s) from {} to {}.",
                        payload.items.len(),
                        payload.config.sender_email,
                        payload.config.recipient
                    ));
                    cmds.push(Command::Send(payload));
                }
                Err(errors) => {
                    model.status = Some("Please fix the problems above.".into());
                    model.errors = errors;
                }
            }
        }
        Msg::RunCompleted(result) => match result {
            Ok(results) => {
                let summary = summarize(&results);
                info!("run finished\n{}", render_table(&results));
                model.status = Some(summary.headline());
                model.summary = Some(summary);
                model.results = results;
            }
            Err(err) => {
                error!(error = %err, "run aborted");
                surface_event(model, format!("SMTP error: {err}"), true);
            }
        },
    }
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickFiles => {
            let files = rfd::FileDialog::new()
                .set_title("Select PDFs or ZIP archives of PDFs")
                .add_filter("PDF or ZIP", &["pdf", "PDF", "zip", "ZIP"])
                .pick_files();
            match files {
                Some(files) => Msg::Selection(SelectionMsg::FilesPicked(files)),
                None => Msg::Selection(SelectionMsg::PickCancelled),
            }
        }
        Command::PickFolder => {
            let folder = rfd::FileDialog::new()
                .set_title("Select a folder containing PDFs")
                .pick_folder();
            match folder {
                Some(path) => Msg::Selection(SelectionMsg::FolderPicked(path)),
                None => Msg::Selection(SelectionMsg::PickCancelled),
            }
        }
        Command::ReadUploads(paths) => {
            let (uploads, warnings) = read_uploads(&paths);
            Msg::Selection(SelectionMsg::UploadsLoaded { uploads, warnings })
        }
        Command::Collect { generation, source } => Msg::Selection(SelectionMsg::Collected {
            generation,
            collected: collect(&source),
        }),
        Command::PrepareSend { generation, source } => Msg::SendPrepared {
            generation,
            collected: collect(&source),
        },
        Command::Send(payload) => execute_send(&SmtpMailer, payload),
    }
}

/// Run the dispatcher for `payload` over `transport` and wrap the outcome.
pub fn execute_send<T: MailTransport>(transport: &T, payload: SendPayload) -> Msg {
    let result = dispatch(transport, &payload.config, &payload.items, &payload.options);
    Msg::RunCompleted(result.map_err(|e| e.to_string()))
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.errors = vec![message.clone()];
    }
    model.status = Some(message);
}

/// Validate the form against the collected selection and build the payload for a run.
fn prepare_send(model: &mut AppModel) -> Result<SendPayload, Vec<String>> {
    let config = model.form.transport_config();
    let options = model.form.dispatch_options();
    let items = &model.selection.collected().items;

    validate(&RunRequest {
        source: model.selection.source(),
        items,
        config: &config,
        dry_run: options.dry_run,
    })?;

    model.run_warnings = oversized(items, options.size_limit);
    model.results.clear();
    model.summary = None;

    Ok(SendPayload {
        config,
        items: items.clone(),
        options,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::models::{SendStatus, Upload};

    fn kind(cmd: &Command) -> &'static str {
        match cmd {
            Command::PickFiles => "pick_files",
            Command::PickFolder => "pick_folder",
            Command::ReadUploads(_) => "read_uploads",
            Command::Collect { .. } => "collect",
            Command::PrepareSend { .. } => "prepare_send",
            Command::Send(_) => "send",
        }
    }

    /// Apply `msg` and run every resulting command inline, as the worker would.
    fn drive(model: &mut AppModel, msg: Msg) -> Vec<&'static str> {
        let mut executed = Vec::new();
        let mut queue = vec![msg];
        while let Some(msg) = queue.pop() {
            let mut cmds = Vec::new();
            update(model, msg, &mut cmds);
            for cmd in cmds {
                executed.push(kind(&cmd));
                queue.push(run_command(cmd));
            }
        }
        executed
    }

    fn uploads(files: Vec<Upload>) -> Msg {
        Msg::Selection(SelectionMsg::UploadsLoaded {
            uploads: files,
            warnings: Vec::new(),
        })
    }

    fn ready_model() -> AppModel {
        let mut model = AppModel::new(Settings {
            sender_name: "Office".into(),
            sender_email: "office@example.com".into(),
            recipient: "books@example.org".into(),
            pacing: Duration::ZERO,
            ..Default::default()
        });
        let executed = drive(
            &mut model,
            uploads(vec![
                Upload::new("a.pdf", b"%PDF-a".to_vec()),
                Upload::new("b.PDF", b"%PDF-b".to_vec()),
            ]),
        );
        assert_eq!(executed, vec!["collect"]);
        assert_eq!(model.selection.collected().items.len(), 2);
        model
    }

    #[test]
    fn form_messages_update_settings() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::RecipientChanged("x@example.com".into()), &mut cmds);
        update(&mut model, Msg::SmtpPortChanged(465), &mut cmds);
        update(&mut model, Msg::UseTlsChanged(false), &mut cmds);
        update(&mut model, Msg::DryRunChanged(true), &mut cmds);

        assert_eq!(model.form.recipient, "x@example.com");
        assert_eq!(model.form.smtp_port, 465);
        assert!(!model.form.use_tls);
        assert!(model.form.dry_run);
        assert!(cmds.is_empty());
    }

    // Without a recipient nothing is dispatched.
    #[test]
    fn send_without_recipient_reports_validation_error() {
        let mut model = ready_model();
        model.form.recipient.clear();
        model.form.password = "secret".into();

        let executed = drive(&mut model, Msg::SendRequested);

        assert_eq!(executed, vec!["prepare_send"], "validation failure must not enqueue a send");
        assert_eq!(model.errors, vec!["Please enter the recipient address."]);
    }

    #[test]
    fn send_without_password_requires_dry_run() {
        let mut model = ready_model();

        let executed = drive(&mut model, Msg::SendRequested);

        assert!(!executed.contains(&"send"));
        assert!(model.errors.iter().any(|e| e.contains("SMTP password")));
    }

    // Collection for a run happens on the worker, not inside update.
    #[test]
    fn send_request_defers_collection_to_worker() {
        let mut model = ready_model();
        model.form.dry_run = true;
        let mut cmds = Vec::new();

        update(&mut model, Msg::SendRequested, &mut cmds);

        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            &cmds[0],
            Command::PrepareSend { source: InputSource::Uploads(u), .. } if u.len() == 2
        ));
    }

    #[test]
    fn dry_run_request_enqueues_and_completes() {
        let mut model = ready_model();
        model.form.dry_run = true;

        let executed = drive(&mut model, Msg::SendRequested);

        assert_eq!(executed, vec!["prepare_send", "send"]);
        assert!(model.errors.is_empty());
        assert_eq!(model.results.len(), 2);
        assert!(model.results.iter().all(|r| r.status == SendStatus::DryRun));
        assert_eq!(model.results[1].subject, "b");
        assert_eq!(
            model.status.as_deref(),
            Some("Dry run finished. 2 email(s) previewed.")
        );
    }

    // Files added to a folder after it was picked are included in the run.
    #[test]
    fn folder_is_rescanned_before_sending() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("first.pdf"), b"1").unwrap();
        let mut model = ready_model();
        model.form.dry_run = true;
        drive(
            &mut model,
            Msg::Selection(SelectionMsg::FolderPicked(tmp.path().to_path_buf())),
        );
        assert_eq!(model.selection.collected().items.len(), 1);
        fs::write(tmp.path().join("second.pdf"), b"2").unwrap();

        drive(&mut model, Msg::SendRequested);

        let subjects: Vec<&str> = model.results.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["first", "second"]);
    }

    #[test]
    fn stale_preparation_is_not_sent() {
        let mut model = ready_model();
        model.form.dry_run = true;
        let mut cmds = Vec::new();
        update(&mut model, Msg::SendRequested, &mut cmds);
        let prepared = run_command(cmds.pop().unwrap());

        drive(&mut model, Msg::Selection(SelectionMsg::Clear));
        let executed = drive(&mut model, prepared);

        assert!(executed.is_empty());
        assert!(model.results.is_empty());
        assert!(model.status.as_deref().unwrap().contains("selection changed"));
    }

    #[test]
    fn send_is_ignored_while_busy() {
        let mut model = ready_model();
        model.form.dry_run = true;
        model.pending_commands = 1;
        let mut cmds = Vec::new();

        update(&mut model, Msg::SendRequested, &mut cmds);

        assert!(cmds.is_empty());
        assert!(model.errors.is_empty());
    }

    #[test]
    fn fatal_run_error_is_surfaced() {
        let mut model = ready_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::RunCompleted(Err("authentication as office@example.com failed".into())),
            &mut cmds,
        );

        assert_eq!(model.errors.len(), 1);
        assert!(model.errors[0].starts_with("SMTP error:"));
        assert!(model.results.is_empty());
    }

    #[test]
    fn oversized_attachment_warns_but_still_sends() {
        let mut model = ready_model();
        model.form.dry_run = true;
        let big = vec![0u8; (24 * 1024 * 1024) + 1];
        drive(&mut model, uploads(vec![Upload::new("huge.pdf", big)]));

        let executed = drive(&mut model, Msg::SendRequested);

        assert!(executed.contains(&"send"));
        assert_eq!(model.run_warnings.len(), 1);
        assert!(matches!(
            &model.run_warnings[0],
            Warning::Oversized { file, .. } if file == "huge.pdf"
        ));
    }

    #[test]
    fn dismiss_clears_errors() {
        let mut model = AppModel::default();
        model.errors = vec!["boom".into()];
        let mut cmds = Vec::new();

        update(&mut model, Msg::DismissErrors, &mut cmds);

        assert!(model.errors.is_empty());
    }
}
