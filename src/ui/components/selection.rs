// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Input selection panel: picked PDFs/ZIPs or a folder, with a live preview
//! of the PDFs that would be sent.

use std::path::PathBuf;

use eframe::egui;
use tracing::debug;

use crate::logic::collect::{Collected, InputSource};
use crate::models::{Upload, Warning};
use crate::utils::format_bytes;

/// MVU state for the current selection.
///
/// Collection runs on the worker; `generation` ties each result to the
/// source it was requested for so stale scans are dropped.
#[derive(Default)]
pub struct SelectionModel {
    source: InputSource,
    collected: Collected,
    pick_warnings: Vec<Warning>,
    generation: u64,
}

/// Messages emitted by the selection view or returned by commands.
pub enum SelectionMsg {
    RequestPickFiles,
    RequestPickFolder,
    FilesPicked(Vec<PathBuf>),
    UploadsLoaded {
        uploads: Vec<Upload>,
        warnings: Vec<Warning>,
    },
    FolderPicked(PathBuf),
    Collected {
        generation: u64,
        collected: Collected,
    },
    PickCancelled,
    Clear,
}

/// Side effects requested by the selection panel.
pub enum SelectionCommand {
    PickFiles,
    PickFolder,
    ReadUploads(Vec<PathBuf>),
    Collect {
        generation: u64,
        source: InputSource,
    },
}

/// User-facing events for status/error surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEvent {
    pub message: String,
    pub is_error: bool,
}

impl SelectionModel {
    pub fn source(&self) -> &InputSource {
        &self.source
    }

    pub fn collected(&self) -> &Collected {
        &self.collected
    }

    /// Identifies the current source; bumped on every change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Unreadable picks followed by collection warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.pick_warnings.iter().chain(self.collected.warnings.iter())
    }

    /// Store a collection result unless the source changed since it was requested.
    pub fn apply_collected(&mut self, generation: u64, collected: Collected) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale collection");
            return false;
        }
        self.collected = collected;
        true
    }

    /// Forget the previous result and ask the worker to collect the new source.
    fn request_collect(&mut self, cmds: &mut Vec<SelectionCommand>) {
        self.generation += 1;
        self.collected = Collected::default();
        cmds.push(SelectionCommand::Collect {
            generation: self.generation,
            source: self.source.clone(),
        });
    }
}

/// Apply a message to the selection model. Returns a user-facing event when relevant.
pub fn update(
    model: &mut SelectionModel,
    msg: SelectionMsg,
    cmds: &mut Vec<SelectionCommand>,
) -> Option<SelectionEvent> {
    match msg {
        SelectionMsg::RequestPickFiles => {
            cmds.push(SelectionCommand::PickFiles);
            None
        }
        SelectionMsg::RequestPickFolder => {
            cmds.push(SelectionCommand::PickFolder);
            None
        }
        SelectionMsg::FilesPicked(paths) => {
            if paths.is_empty() {
                return None;
            }
            let message = format!("Reading {} file(s)...", paths.len());
            cmds.push(SelectionCommand::ReadUploads(paths));
            Some(info(message))
        }
        SelectionMsg::UploadsLoaded { uploads, warnings } => {
            // Adding files to a folder selection switches back to upload mode.
            match &mut model.source {
                InputSource::Uploads(existing) => existing.extend(uploads),
                InputSource::Directory(_) => {
                    model.source = InputSource::Uploads(uploads);
                    model.pick_warnings.clear();
                }
            }
            model.pick_warnings.extend(warnings);
            model.request_collect(cmds);
            Some(info("Looking for PDFs...".into()))
        }
        SelectionMsg::FolderPicked(path) => {
            let message = format!("Scanning {}...", path.display());
            model.source = InputSource::Directory(path);
            model.pick_warnings.clear();
            model.request_collect(cmds);
            Some(info(message))
        }
        SelectionMsg::Collected {
            generation,
            collected,
        } => model
            .apply_collected(generation, collected)
            .then(|| ready_event(model)),
        SelectionMsg::PickCancelled => Some(info("Selection cancelled.".into())),
        SelectionMsg::Clear => {
            *model = SelectionModel {
                generation: model.generation + 1,
                ..Default::default()
            };
            Some(info("Selection cleared.".into()))
        }
    }
}

fn info(message: String) -> SelectionEvent {
    SelectionEvent {
        message,
        is_error: false,
    }
}

fn ready_event(model: &SelectionModel) -> SelectionEvent {
    let count = model.collected.items.len();
    if count == 0 {
        info("No PDFs detected in your selection.".into())
    } else {
        info(format!("{count} PDF(s) ready."))
    }
}

/// Render pick buttons, the selection summary, detected PDFs, and warnings.
pub fn view(ui: &mut egui::Ui, model: &SelectionModel, enabled: bool) -> Vec<SelectionMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        let pick_files = egui::Button::new(format!(
            "{} Add PDFs or ZIPs",
            egui_phosphor::regular::FILE_PDF
        ));
        if ui.add_enabled(enabled, pick_files).clicked() {
            msgs.push(SelectionMsg::RequestPickFiles);
        }
        let pick_folder = egui::Button::new(format!(
            "{} Use folder",
            egui_phosphor::regular::FOLDER_OPEN
        ));
        if ui
            .add_enabled(enabled, pick_folder)
            .on_hover_text("Sends every PDF directly inside the folder (subfolders are ignored)")
            .clicked()
        {
            msgs.push(SelectionMsg::RequestPickFolder);
        }
        let clear = egui::Button::new(format!("{} Clear", egui_phosphor::regular::TRASH));
        if ui
            .add_enabled(enabled && !model.source.is_empty(), clear)
            .clicked()
        {
            msgs.push(SelectionMsg::Clear);
        }
    });

    ui.add_space(4.0);
    let caption = match &model.source {
        InputSource::Uploads(uploads) if uploads.is_empty() => "Nothing selected yet.".to_string(),
        InputSource::Uploads(uploads) => format!("{} file(s) selected", uploads.len()),
        InputSource::Directory(path) => format!("Folder: {}", path.display()),
    };
    ui.label(
        egui::RichText::new(caption)
            .small()
            .color(egui::Color32::from_gray(110)),
    );

    if !model.collected.items.is_empty() {
        ui.add_space(4.0);
        egui::ScrollArea::vertical()
            .id_salt("detected_pdfs")
            .max_height(160.0)
            .show(ui, |ui| {
                for item in &model.collected.items {
                    ui.horizontal(|ui| {
                        ui.label(format!("{} {}", egui_phosphor::regular::FILE_PDF, item.name()));
                        ui.label(
                            egui::RichText::new(format_bytes(item.size()))
                                .small()
                                .color(egui::Color32::from_gray(110)),
                        );
                    });
                }
            });
    }

    for warning in model.warnings() {
        ui.colored_label(
            egui::Color32::from_rgb(200, 120, 0),
            format!("{} {warning}", egui_phosphor::regular::WARNING),
        );
    }

    msgs
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::{SelectionCommand, SelectionEvent, SelectionModel, SelectionMsg, update};
    use crate::logic::collect::{InputSource, collect};
    use crate::models::{Upload, Warning};

    fn loaded(names: &[&str]) -> SelectionMsg {
        SelectionMsg::UploadsLoaded {
            uploads: names
                .iter()
                .map(|n| Upload::new(*n, b"%PDF".to_vec()))
                .collect(),
            warnings: Vec::new(),
        }
    }

    /// Apply `msg`, then run any collection it requests the way the worker would.
    fn settle(model: &mut SelectionModel, msg: SelectionMsg) -> Option<SelectionEvent> {
        let mut cmds = Vec::new();
        let mut event = update(model, msg, &mut cmds);
        for cmd in cmds {
            if let SelectionCommand::Collect { generation, source } = cmd {
                let collected = collect(&source);
                let mut more = Vec::new();
                event = update(
                    model,
                    SelectionMsg::Collected {
                        generation,
                        collected,
                    },
                    &mut more,
                );
                assert!(more.is_empty());
            }
        }
        event
    }

    #[test]
    fn files_picked_enqueues_read() {
        let mut model = SelectionModel::default();
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            SelectionMsg::FilesPicked(vec![PathBuf::from("a.pdf")]),
            &mut cmds,
        );

        assert_eq!(cmds.len(), 1);
        assert!(matches!(&cmds[0], SelectionCommand::ReadUploads(p) if p.len() == 1));
        assert!(event.is_some());
    }

    #[test]
    fn empty_pick_is_ignored() {
        let mut model = SelectionModel::default();
        let mut cmds = Vec::new();

        let event = update(&mut model, SelectionMsg::FilesPicked(Vec::new()), &mut cmds);

        assert!(cmds.is_empty());
        assert!(event.is_none());
    }

    // Successive picks accumulate instead of replacing each other.
    #[test]
    fn uploads_accumulate_and_are_collected() {
        let mut model = SelectionModel::default();

        settle(&mut model, loaded(&["a.pdf"]));
        let event = settle(&mut model, loaded(&["b.pdf", "notes.txt"])).unwrap();

        assert_eq!(event.message, "2 PDF(s) ready.");
        let names: Vec<&str> = model.collected().items.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn pick_warnings_are_surfaced() {
        let mut model = SelectionModel::default();

        settle(
            &mut model,
            SelectionMsg::UploadsLoaded {
                uploads: Vec::new(),
                warnings: vec![Warning::UnreadableFile {
                    path: PathBuf::from("/gone.pdf"),
                    reason: "not found".into(),
                }],
            },
        );

        assert_eq!(model.warnings().count(), 1);
    }

    // The folder is scanned by a command, never inside update.
    #[test]
    fn folder_pick_defers_scan_to_command() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.pdf"), b"X").unwrap();
        let mut model = SelectionModel::default();
        let mut cmds = Vec::new();

        update(
            &mut model,
            SelectionMsg::FolderPicked(tmp.path().to_path_buf()),
            &mut cmds,
        );

        assert!(model.collected().items.is_empty());
        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            &cmds[0],
            SelectionCommand::Collect { source: InputSource::Directory(p), .. } if p == tmp.path()
        ));
    }

    #[test]
    fn folder_pick_replaces_uploads() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.pdf"), b"X").unwrap();
        let mut model = SelectionModel::default();
        settle(&mut model, loaded(&["a.pdf"]));

        settle(&mut model, SelectionMsg::FolderPicked(tmp.path().to_path_buf()));

        assert!(matches!(model.source(), InputSource::Directory(_)));
        assert_eq!(model.collected().items.len(), 1);
        assert_eq!(model.collected().items[0].name(), "x.pdf");
    }

    // A scan finishing after the selection changed must not overwrite it.
    #[test]
    fn stale_collection_is_dropped() {
        let mut model = SelectionModel::default();
        let mut cmds = Vec::new();
        update(&mut model, loaded(&["old.pdf"]), &mut cmds);
        let Some(SelectionCommand::Collect { generation, source }) = cmds.pop() else {
            panic!("expected a collect command");
        };

        settle(&mut model, loaded(&["new.pdf"]));
        let event = update(
            &mut model,
            SelectionMsg::Collected {
                generation,
                collected: collect(&source),
            },
            &mut cmds,
        );

        assert!(event.is_none());
        let names: Vec<&str> = model.collected().items.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["old.pdf", "new.pdf"]);
    }

    #[test]
    fn clear_resets_selection() {
        let mut model = SelectionModel::default();
        settle(&mut model, loaded(&["a.pdf"]));
        let before = model.generation();

        settle(&mut model, SelectionMsg::Clear);

        assert!(model.source().is_empty());
        assert!(model.collected().items.is_empty());
        assert!(model.generation() > before);
    }
}
