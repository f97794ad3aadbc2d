//! The egui timeline widget.
//!
//! Draws the header, the group label column and the virtualized row grid,
//! and turns egui pointer input into [`InteractionController`] calls. Item
//! data is never mutated here: hosts receive [`TimelineEvent`]s and apply the
//! patches themselves.

use std::time::{Duration, Instant};

use chrono::DateTime;
use egui::{
    Align2, Color32, CursorIcon, Id, Painter, PointerButton, Pos2, Rect, Response, Rounding, Sense, Stroke,
    Ui, Vec2,
};
use log::warn;

use crate::config::TimelineConfig;
use crate::interaction::{
    ContextMenuProvider, InteractionController, MoveThrottle, RectMode, ResizeEdge, Surface, TimelineEvent,
};
use crate::layout::{cell_kind, stacking_slots, CellKind, GridCoordinator, RowLocator};
use crate::model::time::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};
use crate::model::{layers_for_row, validate, Group, Item, ItemKey, RowLayer, TimePoint, TimelineViewport};
use crate::ui::{context_menu, theme};

/// Minimum horizontal distance between header ticks.
const TICK_SPACING: f32 = 80.0;
const TICK_STEPS: &[i64] = &[
    MILLIS_PER_MINUTE,
    5 * MILLIS_PER_MINUTE,
    15 * MILLIS_PER_MINUTE,
    30 * MILLIS_PER_MINUTE,
    MILLIS_PER_HOUR,
    3 * MILLIS_PER_HOUR,
    6 * MILLIS_PER_HOUR,
    12 * MILLIS_PER_HOUR,
    MILLIS_PER_DAY,
    7 * MILLIS_PER_DAY,
    30 * MILLIS_PER_DAY,
    365 * MILLIS_PER_DAY,
];

/// Grid columns: the group label and the time row.
const COLUMN_COUNT: usize = 2;

pub struct TimelineView<T> {
    config: TimelineConfig,
    controller: InteractionController<T>,
    grid: GridCoordinator,
    throttle: MoveThrottle,
    /// Events raised between frames, e.g. by a controlled selection update.
    pending: Vec<TimelineEvent<T>>,
    /// Set when a secondary press cancelled a drag, until the buttons are up.
    suppress_drag: bool,
    /// (groups, items) counts of the last input check.
    validated: Option<(usize, usize)>,
}

impl<T: TimePoint> TimelineView<T> {
    pub fn new(config: TimelineConfig) -> Self {
        let controller = InteractionController::new(config.snap_unit_seconds())
            .with_popup_timeout(config.drag_to_create_popup());
        Self {
            grid: GridCoordinator::new(config.item_height),
            throttle: MoveThrottle::new(config.move_throttle()),
            controller,
            config,
            pending: Vec::new(),
            suppress_drag: false,
            validated: None,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TimelineConfig) {
        self.controller.set_snap_seconds(config.snap_unit_seconds());
        self.controller.set_popup_timeout(config.drag_to_create_popup());
        self.grid.set_item_height(config.item_height);
        self.throttle = MoveThrottle::new(config.move_throttle());
        self.config = config;
    }

    pub fn controller(&self) -> &InteractionController<T> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController<T> {
        &mut self.controller
    }

    pub fn grid(&self) -> &GridCoordinator {
        &self.grid
    }

    /// Hand the selection to the host (`Some`) or take it back (`None`).
    /// A resulting change is reported on the next [`TimelineView::show`].
    pub fn set_selected_items(&mut self, keys: Option<&[ItemKey]>) {
        if let Some(event) = self.controller.reconcile_selection(keys) {
            self.pending.push(event);
        }
    }

    pub fn set_context_menu_provider(&mut self, provider: impl ContextMenuProvider<T> + 'static) {
        self.controller.set_context_menu_provider(Some(Box::new(provider)));
    }

    pub fn clear_context_menu_provider(&mut self) {
        self.controller.set_context_menu_provider(None);
    }

    pub fn set_force_drag_to_create(&mut self, force: Option<bool>) {
        self.controller.set_force_drag_to_create(force);
    }

    pub fn enter_drag_to_create(&mut self) {
        self.controller.enter_drag_to_create(Instant::now());
    }

    /// Draw the timeline into the remaining space of `ui`.
    ///
    /// `viewport.width` is updated to the width of the time area.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        groups: &[Group],
        items: &[Item<T>],
        layers: &[RowLayer<T>],
        viewport: &mut TimelineViewport<T>,
    ) -> Vec<TimelineEvent<T>> {
        let mut events = std::mem::take(&mut self.pending);
        self.check_inputs(groups, items);
        let now = Instant::now();
        self.controller.tick(now);

        let available = ui.available_size();
        let label_width = self.config.group_column_width.min(available.x * 0.5);
        viewport.width = (available.x - label_width).max(1.0);

        let header_height = self.config.header_height;
        let (header_rect, header) = ui.allocate_exact_size(Vec2::new(available.x, header_height), Sense::hover());
        self.handle_zoom(ui, &header, viewport);
        draw_header(ui.painter(), header_rect, label_width, viewport);

        let body_height = (available.y - header_height).max(0.0);
        self.grid.recompute(groups, items, viewport, body_height);

        egui::ScrollArea::vertical()
            .id_salt("timeline-rows")
            .auto_shrink([false, false])
            .show_viewport(ui, |ui, visible| {
                self.show_rows(ui, visible, groups, items, layers, viewport, label_width, now, &mut events);
            });

        let time_area = Rect::from_min_size(
            header_rect.left_bottom() + Vec2::new(label_width, 0.0),
            Vec2::new(viewport.width, body_height),
        );
        self.show_popup(ui.ctx(), time_area);
        context_menu::show(ui.ctx(), self.controller.menu_mut());

        events
    }

    /// Log host precondition violations once per change in input size.
    fn check_inputs(&mut self, groups: &[Group], items: &[Item<T>]) {
        if !cfg!(debug_assertions) {
            return;
        }
        let counts = (groups.len(), items.len());
        if self.validated == Some(counts) {
            return;
        }
        self.validated = Some(counts);
        if let Err(e) = validate(groups, items) {
            warn!("timeline input: {e}");
        }
    }

    fn handle_zoom(&self, ui: &Ui, header: &Response, viewport: &mut TimelineViewport<T>) {
        let (scroll, zoom, ctrl, shift) =
            ui.input(|i| (i.smooth_scroll_delta, i.zoom_delta(), i.modifiers.ctrl, i.modifiers.shift));
        let over = header.hovered() || ui.rect_contains_pointer(ui.max_rect());
        if !over {
            return;
        }
        // egui turns ctrl+wheel into a zoom factor on most backends
        if zoom > 1.0 {
            viewport.zoom_in();
        } else if zoom < 1.0 {
            viewport.zoom_out();
        } else if ctrl {
            if scroll.y > 0.0 {
                viewport.zoom_in();
            } else if scroll.y < 0.0 {
                viewport.zoom_out();
            }
        } else if shift && scroll.y != 0.0 {
            viewport.scroll_pixels(scroll.y);
        } else if scroll.x != 0.0 {
            viewport.scroll_pixels(scroll.x);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn show_rows(
        &mut self,
        ui: &mut Ui,
        visible: Rect,
        groups: &[Group],
        items: &[Item<T>],
        layers: &[RowLayer<T>],
        viewport: &TimelineViewport<T>,
        label_width: f32,
        now: Instant,
        events: &mut Vec<TimelineEvent<T>>,
    ) {
        let width = ui.available_width();
        let (rect, background) =
            ui.allocate_exact_size(Vec2::new(width, self.grid.total_height()), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let time_left = rect.left() + label_width;
        let geometry = self.grid.geometry(Pos2::new(time_left, rect.top()), viewport.width);
        let surface = Surface {
            viewport,
            origin_x: time_left,
            locator: &geometry,
            items,
            group_count: groups.len(),
        };
        let rows = self.grid.visible_rows(visible.min.y, visible.height());

        for row in rows.clone() {
            let Some(bounds) = geometry.bounds_of(row) else {
                continue;
            };
            for column in 0..COLUMN_COUNT {
                match cell_kind(column, row, COLUMN_COUNT) {
                    CellKind::GroupLabel { row, .. } => {
                        let cell = Rect::from_min_max(Pos2::new(rect.left(), bounds.top()), bounds.left_bottom());
                        draw_label(&painter, cell, groups.get(row));
                    }
                    CellKind::TimeRow { row } => {
                        draw_time_row(&painter, bounds, row, self.grid.is_filler(row), layers, viewport);
                    }
                }
            }
        }

        let step = tick_step(viewport.pixels_per_milli());
        for ms in tick_times(viewport.start.to_millis(), viewport.end.to_millis(), step) {
            let x = time_left + viewport.pixel_at_time(T::from_millis(ms));
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(0.5, theme::GRID_LINE),
            );
        }
        draw_now_line(&painter, rect, time_left, viewport);

        // Background gestures go first so items on top win the hit test.
        self.handle_background(ui, &background, time_left, &surface, events);

        let mut by_row: Vec<Vec<&Item<T>>> = vec![Vec::new(); groups.len()];
        for item in items {
            if item.row < groups.len() && item.intersects(viewport.start, viewport.end) {
                by_row[item.row].push(item);
            }
        }
        for row in rows.filter(|&r| r < groups.len()) {
            let Some(bounds) = geometry.bounds_of(row) else {
                continue;
            };
            let row_items = &by_row[row];
            let spans: Vec<_> = row_items.iter().map(|i| i.span_millis()).collect();
            for (item, slot) in row_items.iter().zip(stacking_slots(&spans)) {
                self.show_item(ui, &painter, item, slot, bounds.top(), &surface, events);
            }
        }

        if let Some(session) = self.controller.rect_session() {
            let (fill, stroke) = match session.mode {
                RectMode::Select => (theme::SELECT_RECT_FILL, theme::ACCENT),
                RectMode::Create => (theme::CREATE_RECT_FILL, theme::CREATE_RECT_STROKE),
            };
            painter.rect_filled(session.rect, Rounding::same(2.0), fill);
            painter.rect_stroke(session.rect, Rounding::same(2.0), Stroke::new(1.0, stroke));
        }

        self.track_pointer(ui, &background, time_left, now, &surface, events);
    }

    fn handle_background(
        &mut self,
        ui: &Ui,
        background: &Response,
        time_left: f32,
        surface: &Surface<'_, T>,
        events: &mut Vec<TimelineEvent<T>>,
    ) {
        let (modifiers, press_origin, secondary_pressed) = ui.input(|i| {
            (
                i.modifiers,
                i.pointer.press_origin(),
                i.pointer.button_pressed(PointerButton::Secondary),
            )
        });

        if secondary_pressed && self.controller.secondary_press() {
            self.suppress_drag = true;
        }

        if !self.suppress_drag {
            for button in [PointerButton::Primary, PointerButton::Secondary] {
                if !background.drag_started_by(button) {
                    continue;
                }
                if let Some(origin) = press_origin.filter(|p| p.x >= time_left) {
                    events.extend(self.controller.start_gesture(origin, button, modifiers, surface));
                }
            }
        }

        let Some(pos) = background.interact_pointer_pos() else {
            return;
        };
        if background.double_clicked() {
            events.extend(self.controller.row_click(pos, PointerButton::Primary, modifiers, true, surface));
        } else if background.clicked() {
            events.extend(self.controller.row_click(pos, PointerButton::Primary, modifiers, false, surface));
        } else if background.secondary_clicked() {
            events.extend(self.controller.row_click(pos, PointerButton::Secondary, modifiers, false, surface));
        }
    }

    /// Feed pointer moves and the release to the open gesture, then report
    /// hover while idle.
    fn track_pointer(
        &mut self,
        ui: &Ui,
        background: &Response,
        time_left: f32,
        now: Instant,
        surface: &Surface<'_, T>,
        events: &mut Vec<TimelineEvent<T>>,
    ) {
        let session_button = self.controller.session_button();
        let (latest, moving, released, any_down, escape) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.is_moving(),
                session_button.is_some_and(|button| i.pointer.button_released(button)),
                i.pointer.any_down(),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if escape {
            self.controller.cancel_gesture();
            self.controller.menu_mut().close();
        }
        if !any_down {
            self.suppress_drag = false;
        }

        if !self.controller.is_idle() {
            if let Some(pos) = latest {
                if released {
                    events.extend(self.controller.commit_gesture(pos, surface));
                    self.throttle.reset();
                } else if moving && self.throttle.ready(now) {
                    self.controller.move_gesture(pos, surface);
                }
            }
            ui.ctx().request_repaint();
            return;
        }

        if moving {
            if let Some(pos) = background.hover_pos().filter(|p| p.x >= time_left) {
                events.push(self.controller.hover(pos, surface));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn show_item(
        &mut self,
        ui: &mut Ui,
        painter: &Painter,
        item: &Item<T>,
        slot: usize,
        row_top: f32,
        surface: &Surface<'_, T>,
        events: &mut Vec<TimelineEvent<T>>,
    ) {
        let viewport = surface.viewport;
        let item_height = self.grid.item_height();
        let y = row_top + slot as f32 * item_height + theme::BAR_INSET;
        let left = surface.origin_x + viewport.pixel_at_time(item.start);
        let right = surface.origin_x + viewport.pixel_at_time(item.end);
        let home = Rect::from_min_max(
            Pos2::new(left, y),
            Pos2::new(right.max(left + theme::MIN_BAR_WIDTH), y + item_height - theme::BAR_INSET * 2.0),
        );

        let id = Id::new(("timeline-item", &item.key));
        let handle = Vec2::new(self.config.resize_handle_width, home.height());
        let body = ui.interact(home, id, Sense::click_and_drag());
        let start_handle = ui.interact(Rect::from_center_size(home.left_center(), handle), id.with("start"), Sense::drag());
        let end_handle = ui.interact(Rect::from_center_size(home.right_center(), handle), id.with("end"), Sense::drag());

        let (modifiers, press_origin) = ui.input(|i| (i.modifiers, i.pointer.press_origin()));
        let origin = press_origin.unwrap_or(home.center());
        if !self.suppress_drag {
            if start_handle.drag_started_by(PointerButton::Primary) {
                events.extend(self.controller.begin_item_resize(&item.key, ResizeEdge::Start, origin, surface));
            } else if end_handle.drag_started_by(PointerButton::Primary) {
                events.extend(self.controller.begin_item_resize(&item.key, ResizeEdge::End, origin, surface));
            } else if body.drag_started_by(PointerButton::Primary) {
                let selection = self.controller.selection();
                let moving = if selection.contains(&item.key) {
                    selection.keys().to_vec()
                } else {
                    vec![item.key.clone()]
                };
                events.extend(self.controller.begin_item_drag(&item.key, origin, &moving, surface));
            }
        }

        let pos = body.interact_pointer_pos().unwrap_or(home.center());
        if body.double_clicked() {
            events.extend(self.controller.item_click(&item.key, pos, PointerButton::Primary, modifiers, true, surface));
        } else if body.clicked() {
            events.extend(self.controller.item_click(&item.key, pos, PointerButton::Primary, modifiers, false, surface));
        } else if body.secondary_clicked() {
            events.extend(self.controller.item_click(&item.key, pos, PointerButton::Secondary, modifiers, false, surface));
        }

        let on_handle = start_handle.hovered() || end_handle.hovered();
        if on_handle {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        } else if body.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        let mut bar = home;
        if let Some((edge, dx)) = self.controller.resize_offset(&item.key) {
            match edge {
                ResizeEdge::Start => bar.min.x = (bar.min.x + dx).min(bar.max.x - theme::MIN_BAR_WIDTH),
                ResizeEdge::End => bar.max.x = (bar.max.x + dx).max(bar.min.x + theme::MIN_BAR_WIDTH),
            }
        }
        if let Some(offset) = self.controller.drag_offset(&item.key) {
            bar = bar.translate(offset);
        }
        let selected = self.controller.selection().contains(&item.key);
        draw_bar(painter, item, bar, selected, selected || on_handle);

        if body.hovered() && self.controller.is_idle() {
            egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), id.with("tip"), |ui| {
                if !item.title.is_empty() {
                    ui.strong(&item.title);
                }
                ui.label(format!(
                    "{} → {}",
                    format_instant(item.start.to_millis()),
                    format_instant(item.end.to_millis())
                ));
            });
        }
    }

    fn show_popup(&mut self, ctx: &egui::Context, time_area: Rect) {
        if !self.controller.popup_visible() {
            return;
        }
        egui::Area::new(Id::new("timeline-create-hint"))
            .order(egui::Order::Foreground)
            .fixed_pos(time_area.center_top() + Vec2::new(-120.0, 12.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}  Drag on a row to create a segment",
                            egui_phosphor::regular::CURSOR_CLICK
                        ))
                        .color(theme::TEXT_PRIMARY),
                    );
                });
            });
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn draw_header<T: TimePoint>(painter: &Painter, rect: Rect, label_width: f32, viewport: &TimelineViewport<T>) {
    painter.rect_filled(rect, 0.0, theme::BG_HEADER);
    painter.line_segment([rect.left_bottom(), rect.right_bottom()], Stroke::new(1.0, theme::BORDER_SUBTLE));
    painter.text(
        Pos2::new(rect.left() + 8.0, rect.center().y),
        Align2::LEFT_CENTER,
        "Groups",
        theme::font_header(),
        theme::TEXT_SECONDARY,
    );

    let time_left = rect.left() + label_width;
    let clipped = painter.with_clip_rect(Rect::from_min_max(Pos2::new(time_left, rect.top()), rect.max));
    clipped.line_segment(
        [Pos2::new(time_left, rect.top()), Pos2::new(time_left, rect.bottom())],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    clipped.text(
        Pos2::new(time_left + 5.0, rect.top() + 12.0),
        Align2::LEFT_CENTER,
        format_date(viewport.start.to_millis()),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    let step = tick_step(viewport.pixels_per_milli());
    for ms in tick_times(viewport.start.to_millis(), viewport.end.to_millis(), step) {
        let x = time_left + viewport.pixel_at_time(T::from_millis(ms));
        clipped.line_segment(
            [Pos2::new(x, rect.top() + 20.0), Pos2::new(x, rect.bottom())],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        clipped.text(
            Pos2::new(x + 3.0, rect.top() + 30.0),
            Align2::LEFT_CENTER,
            format_tick(ms, step),
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
    }
}

fn draw_label(painter: &Painter, cell: Rect, group: Option<&Group>) {
    let fill = if group.is_some() { theme::BG_PANEL } else { theme::BG_FILLER };
    painter.rect_filled(cell, 0.0, fill);
    painter.line_segment([cell.right_top(), cell.right_bottom()], Stroke::new(1.0, theme::BORDER_SUBTLE));
    let Some(group) = group else {
        return;
    };
    painter.line_segment([cell.left_bottom(), cell.right_bottom()], Stroke::new(0.5, theme::BORDER_SUBTLE));
    let galley = painter.layout_no_wrap(group.title.clone(), theme::font_bar(), theme::TEXT_PRIMARY);
    let text_pos = Pos2::new(cell.left() + 8.0, cell.top() + (cell.height().min(30.0) - galley.size().y) / 2.0);
    painter.with_clip_rect(cell.shrink(2.0)).galley(text_pos, galley, Color32::TRANSPARENT);
}

fn draw_time_row<T: TimePoint>(
    painter: &Painter,
    bounds: Rect,
    row: usize,
    filler: bool,
    layers: &[RowLayer<T>],
    viewport: &TimelineViewport<T>,
) {
    let fill = match (filler, row % 2) {
        (true, _) => theme::BG_FILLER,
        (false, 0) => theme::BG_PANEL,
        (false, _) => theme::BG_DARK,
    };
    painter.rect_filled(bounds, 0.0, fill);

    for layer in layers_for_row(layers, row) {
        let left = bounds.left() + viewport.pixel_at_time(layer.start);
        let right = bounds.left() + viewport.pixel_at_time(layer.end);
        let band = Rect::from_min_max(Pos2::new(left, bounds.top()), Pos2::new(right, bounds.bottom()));
        painter.rect_filled(band.intersect(bounds), 0.0, layer.color);
    }

    if !filler {
        painter.line_segment([bounds.left_bottom(), bounds.right_bottom()], Stroke::new(0.5, theme::BORDER_SUBTLE));
    }
}

fn draw_now_line<T: TimePoint>(painter: &Painter, rect: Rect, time_left: f32, viewport: &TimelineViewport<T>) {
    let now = T::from_millis(chrono::Utc::now().timestamp_millis());
    if now < viewport.start || now > viewport.end {
        return;
    }
    let x = time_left + viewport.pixel_at_time(now);
    painter.line_segment(
        [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
        Stroke::new(1.5, theme::NOW_LINE),
    );
}

fn draw_bar<T>(painter: &Painter, item: &Item<T>, bar: Rect, selected: bool, show_handles: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    painter.rect_filled(bar.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar, rounding, item.color);
    let highlight = Rect::from_min_size(bar.min, Vec2::new(bar.width(), (bar.height() * 0.45).max(4.0)));
    painter.rect_filled(
        highlight,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if selected {
        painter.rect_stroke(
            bar.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar.width() > 30.0 && !item.title.is_empty() {
        let galley = painter.layout_no_wrap(item.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar.top() + (bar.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(bar)
            .galley(Pos2::new(bar.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    if show_handles {
        let h = bar.height() * 0.55;
        let y = bar.center().y - h / 2.0;
        let start = Rect::from_min_size(Pos2::new(bar.left() - 1.5, y), Vec2::new(4.0, h));
        let end = Rect::from_min_size(Pos2::new(bar.right() - 2.5, y), Vec2::new(4.0, h));
        painter.rect_filled(start, Rounding::same(2.0), theme::HANDLE_COLOR);
        painter.rect_filled(end, Rounding::same(2.0), theme::HANDLE_COLOR);
    }
}

/// Smallest tick step that keeps labels at least `TICK_SPACING` apart.
fn tick_step(pixels_per_milli: f64) -> i64 {
    TICK_STEPS
        .iter()
        .copied()
        .find(|&step| step as f64 * pixels_per_milli >= TICK_SPACING as f64)
        .unwrap_or(365 * MILLIS_PER_DAY)
}

/// Multiples of `step` within `[start_ms, end_ms]`.
fn tick_times(start_ms: i64, end_ms: i64, step: i64) -> impl Iterator<Item = i64> {
    let first = start_ms.div_euclid(step) * step + if start_ms.rem_euclid(step) == 0 { 0 } else { step };
    let count = if end_ms < first { 0 } else { (end_ms - first) / step + 1 };
    (0..count).map(move |i| first + i * step)
}

fn format_tick(ms: i64, step: i64) -> String {
    let pattern = if step >= 30 * MILLIS_PER_DAY {
        "%b %Y"
    } else if step >= MILLIS_PER_DAY {
        "%d %b"
    } else {
        "%H:%M"
    };
    DateTime::from_timestamp_millis(ms).map_or_else(|| ms.to_string(), |t| t.format(pattern).to_string())
}

fn format_date(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(|| ms.to_string(), |t| t.format("%a %d %b %Y").to_string())
}

fn format_instant(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(|| ms.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}
