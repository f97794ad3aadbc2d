use egui::{RichText, Ui};
use egui_extras::DatePickerButton;

use gantt_timeline::ui::theme;

use crate::app::TimelineDemoApp;

/// (label, seconds) choices for the snap selector.
const SNAP_CHOICES: &[(&str, i64)] = &[
    ("1 s", 1),
    ("1 min", 60),
    ("15 min", 15 * 60),
    ("1 h", 60 * 60),
    ("1 day", 24 * 60 * 60),
];

/// Render the top toolbar.
pub fn show_toolbar(app: &mut TimelineDemoApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        if ui
            .button(RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS_PLUS).size(14.0))
            .on_hover_text("Zoom in (Ctrl+Scroll)")
            .clicked()
        {
            app.viewport.zoom_in();
        }
        if ui
            .button(RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS_MINUS).size(14.0))
            .on_hover_text("Zoom out (Ctrl+Scroll)")
            .clicked()
        {
            app.viewport.zoom_out();
        }

        ui.separator();

        let drawing = app.view.controller().drag_to_create_active();
        let label = format!("{}  Draw segment", egui_phosphor::regular::PENCIL_SIMPLE);
        if ui.selectable_label(drawing, label).clicked() {
            if drawing {
                app.view.controller_mut().exit_drag_to_create();
            } else {
                app.view.enter_drag_to_create();
            }
        }

        ui.separator();

        let current = app.config.snap_unit_seconds();
        let current_label = SNAP_CHOICES
            .iter()
            .find(|(_, secs)| *secs == current)
            .map_or_else(|| format!("{current} s"), |(label, _)| label.to_string());
        let mut picked = None;
        egui::ComboBox::from_label(RichText::new("Snap").color(theme::TEXT_SECONDARY))
            .selected_text(current_label)
            .show_ui(ui, |ui| {
                for (label, secs) in SNAP_CHOICES {
                    if ui.selectable_label(*secs == current, *label).clicked() {
                        picked = Some(*secs);
                    }
                }
            });
        if let Some(secs) = picked {
            app.set_snap_seconds(secs);
        }

        ui.separator();

        ui.label(RichText::new("Go to").color(theme::TEXT_SECONDARY));
        let before = app.jump_date;
        ui.add(DatePickerButton::new(&mut app.jump_date).id_salt("timeline-jump"));
        if app.jump_date != before {
            app.jump_to_date();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let selected = app.view.controller().selection().keys().len();
            ui.label(
                RichText::new(format!("{selected} selected"))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
