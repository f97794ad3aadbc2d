use egui::{Id, Order, RichText};

use crate::interaction::ContextMenu;
use crate::ui::theme;

/// Draw the open context menu, if any, and run the clicked action.
///
/// A primary click outside the menu closes it.
pub fn show<T>(ctx: &egui::Context, menu: &mut ContextMenu<T>) {
    let (Some(anchor), Some(context)) = (menu.anchor(), menu.context()) else {
        return;
    };

    let labels = menu.labels();
    let mut clicked = None;
    let area = egui::Area::new(Id::new("timeline-context-menu"))
        .order(Order::Foreground)
        .fixed_pos(anchor)
        .show(ctx, |ui| {
            egui::Frame::menu(ui.style()).show(ui, |ui| {
                ui.set_min_width(160.0);
                if labels.is_empty() {
                    ui.label(RichText::new("No actions").color(theme::TEXT_DIM));
                }
                for (index, (action, label)) in menu.actions().iter().zip(&labels).enumerate() {
                    if action.is_custom() {
                        action.render_custom(ui, context);
                        continue;
                    }
                    if ui.button(RichText::new(label).color(theme::TEXT_PRIMARY)).clicked() {
                        clicked = Some(index);
                    }
                }
            });
        });

    if let Some(index) = clicked {
        menu.activate(index);
        return;
    }
    let outside = ctx.input(|i| {
        i.pointer.primary_clicked()
            && i.pointer
                .interact_pos()
                .is_some_and(|pos| !area.response.rect.contains(pos))
    });
    if outside {
        menu.close();
    }
}
