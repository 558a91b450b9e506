//! Application entry point wiring egui/eframe to launch the mailer UI.

use eframe::egui;
use egui_phosphor::Variant;

use crate::config::Settings;
use crate::ui::PdfMailerApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(settings: Settings) -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Mailer",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(PdfMailerApp::new(settings)))
        }),
    )
}
