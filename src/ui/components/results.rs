// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Result table for the last run.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::logic::report::{Summary, render_table, rows};
use crate::models::{SendResult, Warning};

/// Render run warnings, the summary line, and one row per file in input order.
pub fn view(ui: &mut egui::Ui, results: &[SendResult], summary: Option<&Summary>, warnings: &[Warning]) {
    for warning in warnings {
        ui.colored_label(
            egui::Color32::from_rgb(200, 120, 0),
            format!("{} {warning}", egui_phosphor::regular::WARNING),
        );
    }

    if results.is_empty() {
        ui.label(
            egui::RichText::new("No run yet.")
                .small()
                .color(egui::Color32::from_gray(110)),
        );
        return;
    }

    ui.horizontal(|ui| {
        if let Some(summary) = summary {
            ui.label(format!(
                "{} file(s): {} sent, {} failed, {} dry run",
                summary.total, summary.sent, summary.failed, summary.dry_run
            ));
        }
        if ui
            .button(format!("{} Copy report", egui_phosphor::regular::COPY))
            .on_hover_text("Copy the table as plain text")
            .clicked()
        {
            ui.ctx().copy_text(render_table(results));
        }
    });
    ui.add_space(4.0);

    let failed_color = egui::Color32::from_rgb(190, 40, 40);
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("File");
            });
            header.col(|ui| {
                ui.strong("Subject");
            });
            header.col(|ui| {
                ui.strong("Status");
            });
        })
        .body(|mut body| {
            for (result, row) in results.iter().zip(rows(results)) {
                body.row(20.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.file);
                    });
                    table_row.col(|ui| {
                        ui.label(&row.subject);
                    });
                    table_row.col(|ui| {
                        if result.status.is_failed() {
                            ui.colored_label(failed_color, &row.status);
                        } else {
                            ui.label(&row.status);
                        }
                    });
                });
            }
        });
}
