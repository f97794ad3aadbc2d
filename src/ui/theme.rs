use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(19, 22, 28);
pub const BG_PANEL: Color32 = Color32::from_rgb(26, 30, 38);
pub const BG_HEADER: Color32 = Color32::from_rgb(32, 37, 47);
/// Rows below the last group.
pub const BG_FILLER: Color32 = Color32::from_rgb(17, 19, 24);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(56, 120, 200, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(46, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(98, 160, 234);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 231, 238);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(150, 160, 176);
pub const TEXT_DIM: Color32 = Color32::from_rgb(96, 106, 120);
pub const TEXT_ON_BAR: Color32 = Color32::WHITE;

pub const ACCENT: Color32 = Color32::from_rgb(72, 146, 230);
pub const NOW_LINE: Color32 = Color32::from_rgb(236, 84, 72);
pub const GRID_LINE: Color32 = Color32::from_rgb(40, 45, 56);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(250, 250, 250);

/// Rubber-band selection.
pub const SELECT_RECT_FILL: Color32 = Color32::from_rgba_premultiplied(36, 68, 112, 60);
/// Segment being drawn in drag-to-create mode.
pub const CREATE_RECT_FILL: Color32 = Color32::from_rgba_premultiplied(36, 92, 56, 90);
pub const CREATE_RECT_STROKE: Color32 = Color32::from_rgb(92, 206, 128);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const BAR_ROUNDING: f32 = 4.0;
pub const BAR_INSET: f32 = 3.0;
pub const MIN_BAR_WIDTH: f32 = 6.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

// ── Segment colors ───────────────────────────────────────────────────────────

pub const SEGMENT_COLORS: &[Color32] = &[
    Color32::from_rgb(58, 126, 224),
    Color32::from_rgb(46, 160, 98),
    Color32::from_rgb(158, 84, 196),
    Color32::from_rgb(228, 132, 28),
    Color32::from_rgb(20, 158, 178),
    Color32::from_rgb(212, 68, 76),
    Color32::from_rgb(118, 146, 52),
    Color32::from_rgb(204, 164, 30),
];

/// Palette color for the n-th segment, cycling.
pub fn segment_color(n: usize) -> Color32 {
    SEGMENT_COLORS[n % SEGMENT_COLORS.len()]
}

// ── Visuals ──────────────────────────────────────────────────────────────────

fn widget_state(widget: &mut WidgetVisuals, fill: Color32, border: Color32, text: Stroke) {
    widget.bg_fill = fill;
    widget.weak_bg_fill = fill;
    widget.bg_stroke = Stroke::new(1.0, border);
    widget.fg_stroke = text;
    widget.rounding = Rounding::same(3.0);
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_DARK;
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    let w = &mut visuals.widgets;
    widget_state(
        &mut w.noninteractive,
        BG_PANEL,
        BORDER_SUBTLE,
        Stroke::new(1.0, TEXT_SECONDARY),
    );
    widget_state(
        &mut w.inactive,
        Color32::from_rgb(38, 43, 54),
        BORDER_SUBTLE,
        Stroke::new(1.0, TEXT_PRIMARY),
    );
    widget_state(
        &mut w.hovered,
        Color32::from_rgb(48, 55, 68),
        ACCENT,
        Stroke::new(1.0, TEXT_PRIMARY),
    );
    widget_state(
        &mut w.active,
        Color32::from_rgb(56, 64, 80),
        BORDER_ACCENT,
        Stroke::new(2.0, Color32::WHITE),
    );
    widget_state(
        &mut w.open,
        Color32::from_rgb(44, 50, 62),
        ACCENT,
        Stroke::new(1.0, TEXT_PRIMARY),
    );

    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
    });
}

/// Install the phosphor icon font next to the default fonts.
pub fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
