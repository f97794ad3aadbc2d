use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use log::{debug, info};

use gantt_timeline::config::TimelineConfig;
use gantt_timeline::interaction::{CreateDescriptor, Interaction, MenuAction, MenuClose, MenuContext, TimelineEvent};
use gantt_timeline::model::{apply_patches, max_numeric_key, Group, Item, ItemKey, RowLayer, TimelineViewport};
use gantt_timeline::ui::{theme, TimelineView};

use crate::toolbar;

pub type Time = DateTime<Utc>;

/// Work queued by context menu handlers, applied after the frame.
#[derive(Debug, Clone)]
enum MenuCommand {
    Delete(Vec<ItemKey>),
    Create { row: usize, start: Time },
    SelectRow(usize),
    ArmCreate,
}

/// Demo host: owns the data and applies what the timeline reports.
pub struct TimelineDemoApp {
    pub groups: Vec<Group>,
    pub items: Vec<Item<Time>>,
    pub layers: Vec<RowLayer<Time>>,
    pub viewport: TimelineViewport<Time>,
    pub view: TimelineView<Time>,
    pub config: TimelineConfig,
    pub jump_date: NaiveDate,
    pub status_message: String,
    /// Snapped time and row under the pointer.
    pub hover: Option<(Time, Option<usize>)>,
    commands: Rc<RefCell<Vec<MenuCommand>>>,
    /// Selection forced by a menu command, handed to the view as controlled.
    forced_selection: Option<Vec<ItemKey>>,
}

impl TimelineDemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::install_fonts(&cc.egui_ctx);

        let config = TimelineConfig::load();
        let today = Utc::now().date_naive();
        let midnight = today.and_time(NaiveTime::MIN).and_utc();
        let (groups, items, layers) = Self::sample_data(midnight);

        let commands = Rc::new(RefCell::new(Vec::new()));
        let mut view = TimelineView::new(config.clone());
        view.set_context_menu_provider(menu_provider(Rc::clone(&commands)));

        Self {
            groups,
            items,
            layers,
            viewport: Self::window_at(midnight - Duration::days(1), 4),
            view,
            config,
            jump_date: today,
            status_message: "Ready".to_string(),
            hover: None,
            commands,
            forced_selection: None,
        }
    }

    /// A `days` long window starting at `start`.
    fn window_at(start: Time, days: i64) -> TimelineViewport<Time> {
        TimelineViewport {
            start,
            end: start + Duration::days(days.max(1)),
            width: 1.0,
        }
    }

    /// A few production lines with overlapping shifts.
    fn sample_data(midnight: Time) -> (Vec<Group>, Vec<Item<Time>>, Vec<RowLayer<Time>>) {
        let groups: Vec<Group> = (0..12).map(|i| Group::new(i, format!("Line {}", i + 1))).collect();

        let mut items = Vec::new();
        let mut key = 0_i64;
        for group in &groups {
            let offset = (group.id as i64 * 5) % 12;
            for day in -1..4_i64 {
                let start = midnight + Duration::days(day) + Duration::hours(offset);
                let length = Duration::hours(3 + (key % 5));
                items.push(
                    Item::new(key, group.id, start, start + length)
                        .with_title(format!("Job {key}"))
                        .with_color(theme::segment_color(key as usize)),
                );
                key += 1;
                if (key + day) % 3 == 0 {
                    // overlapping job, stacks below the first
                    let start = start + Duration::hours(1);
                    items.push(
                        Item::new(key, group.id, start, start + Duration::hours(4))
                            .with_title(format!("Rush {key}"))
                            .with_color(theme::segment_color(key as usize)),
                    );
                    key += 1;
                }
            }
        }

        let maintenance = egui::Color32::from_rgba_unmultiplied(240, 200, 80, 24);
        let layers = (0..groups.len())
            .step_by(4)
            .map(|row| {
                let start = midnight + Duration::hours(20);
                RowLayer::new(row, start, start + Duration::hours(8), maintenance)
            })
            .collect();

        (groups, items, layers)
    }

    /// Re-center the window on the picked date, keeping the zoom.
    pub fn jump_to_date(&mut self) {
        let duration = Duration::milliseconds(self.viewport.duration_millis());
        let start = self.jump_date.and_time(NaiveTime::MIN).and_utc();
        self.viewport.start = start;
        self.viewport.end = start + duration;
        self.status_message = format!("Jumped to {}", self.jump_date.format("%Y-%m-%d"));
    }

    /// Persist and apply a snap unit in seconds.
    pub fn set_snap_seconds(&mut self, seconds: i64) {
        self.config.snap_seconds = Some(seconds);
        self.view.set_config(self.config.clone());
        if let Err(e) = self.config.save() {
            log::warn!("could not save settings: {e}");
        }
    }

    fn create_item(&mut self, row: usize, start: Time, end: Time) -> ItemKey {
        let key = ItemKey::Number(max_numeric_key(&self.items).map_or(0, |k| k + 1));
        let n = self.items.len();
        self.items.push(
            Item::new(key.clone(), row, start, end)
                .with_title(format!("New {key}"))
                .with_color(theme::segment_color(n)),
        );
        key
    }

    fn handle_event(&mut self, event: TimelineEvent<Time>) {
        match event {
            TimelineEvent::SelectionChanged(keys) => {
                self.status_message = format!("{} selected", keys.len());
            }
            TimelineEvent::Interaction(Interaction::DragEnd { patches, row_delta, time_delta_ms }) => {
                let moved = apply_patches(&mut self.items, &patches);
                self.status_message = format!(
                    "Moved {moved} item(s) by {} min and {row_delta} row(s)",
                    time_delta_ms / 60_000
                );
            }
            TimelineEvent::Interaction(Interaction::ResizeEnd { patch, .. }) => {
                apply_patches(&mut self.items, std::slice::from_ref(&patch));
                self.status_message = format!(
                    "Resized {} to {} → {}",
                    patch.key,
                    patch.start.format("%d %b %H:%M"),
                    patch.end.format("%d %b %H:%M")
                );
            }
            TimelineEvent::Interaction(Interaction::SnappedMouseMove { snapped_time, row, .. }) => {
                self.hover = Some((snapped_time, row));
            }
            TimelineEvent::DragToCreateEnded(CreateDescriptor { group_index, item_start, item_end, .. }) => {
                let end = item_end.filter(|e| *e > item_start).unwrap_or(item_start + Duration::hours(1));
                let key = self.create_item(group_index, item_start, end);
                info!("created item {key} on row {group_index}");
                self.status_message = format!("Created {key}");
            }
            TimelineEvent::RowDoubleClick { row, hit } if row < self.groups.len() => {
                let key = self.create_item(row, hit.snapped_time, hit.snapped_time + Duration::hours(1));
                self.status_message = format!("Created {key}");
            }
            TimelineEvent::ItemDoubleClick { item, .. } => {
                self.status_message = format!("Opened {item}");
            }
            TimelineEvent::Interaction(interaction) => {
                debug!("interaction on {:?}", interaction.affected_items());
            }
            other => debug!("timeline event: {other:?}"),
        }
    }

    fn run_commands(&mut self) {
        let commands: Vec<MenuCommand> = self.commands.borrow_mut().drain(..).collect();
        for command in commands {
            match command {
                MenuCommand::Delete(keys) => {
                    self.items.retain(|i| !keys.contains(&i.key));
                    self.forced_selection = Some(Vec::new());
                    self.status_message = format!("Deleted {} item(s)", keys.len());
                }
                MenuCommand::Create { row, start } => {
                    let key = self.create_item(row, start, start + Duration::hours(2));
                    self.status_message = format!("Created {key}");
                }
                MenuCommand::SelectRow(row) => {
                    let keys = self.items.iter().filter(|i| i.row == row).map(|i| i.key.clone()).collect();
                    self.forced_selection = Some(keys);
                }
                MenuCommand::ArmCreate => self.view.enter_drag_to_create(),
            }
        }
    }
}

/// Context menu actions for the demo.
fn menu_provider(commands: Rc<RefCell<Vec<MenuCommand>>>) -> impl Fn(&MenuContext<Time>) -> Vec<MenuAction<Time>> {
    move |_context: &MenuContext<Time>| {
        let delete = Rc::clone(&commands);
        let create = Rc::clone(&commands);
        let select = Rc::clone(&commands);
        let arm = Rc::clone(&commands);
        vec![
            MenuAction::computed(|ctx: &MenuContext<Time>| format!("Delete {} selected", ctx.selection.len()))
                .icon(egui_phosphor::regular::TRASH)
                .visible_when(|ctx| !ctx.selection.is_empty())
                .on_click(move |ctx| {
                    delete.borrow_mut().push(MenuCommand::Delete(ctx.selection.clone()));
                    MenuClose::Auto
                }),
            MenuAction::new("New segment here")
                .icon(egui_phosphor::regular::PLUS)
                .visible_when(|ctx| ctx.row.is_some() && ctx.time.is_some())
                .on_click(move |ctx| {
                    if let (Some(row), Some(start)) = (ctx.row, ctx.time) {
                        create.borrow_mut().push(MenuCommand::Create { row, start });
                    }
                    MenuClose::Auto
                }),
            MenuAction::new("Select row")
                .icon(egui_phosphor::regular::ROWS)
                .visible_when(|ctx| ctx.row.is_some())
                .on_click(move |ctx| {
                    if let Some(row) = ctx.row {
                        select.borrow_mut().push(MenuCommand::SelectRow(row));
                    }
                    MenuClose::KeepOpen
                }),
            MenuAction::new("Draw a segment")
                .icon(egui_phosphor::regular::PENCIL_SIMPLE)
                .on_click(move |_| {
                    arm.borrow_mut().push(MenuCommand::ArmCreate);
                    MenuClose::Auto
                }),
            MenuAction::new("").custom_render(|ui, ctx: &MenuContext<Time>| {
                if let Some(time) = ctx.time {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(time.format("%a %d %b %H:%M").to_string())
                            .font(theme::font_small())
                            .color(theme::TEXT_DIM),
                    );
                }
            }),
        ]
    }
}

impl eframe::App for TimelineDemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx);

        self.run_commands();
        if let Some(keys) = self.forced_selection.take() {
            // hand the list over, then return control to the widget
            self.view.set_selected_items(Some(&keys));
            self.view.set_selected_items(None);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(theme::font_sub())
                            .color(theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Items: {}", self.items.len()))
                                .size(10.5)
                                .color(theme::TEXT_DIM),
                        );
                        if let Some((time, row)) = self.hover {
                            let row = row.map_or("-".to_string(), |r| r.to_string());
                            ui.label(
                                egui::RichText::new(format!("{} · row {row}", time.format("%d %b %H:%M")))
                                    .size(10.5)
                                    .color(theme::TEXT_DIM),
                            );
                        }
                        if self.view.controller().drag_to_create_active() {
                            ui.label(egui::RichText::new("Drawing").size(10.5).color(theme::CREATE_RECT_STROKE));
                        }
                    });
                });
            });

        let frame = egui::Frame::default().fill(theme::BG_DARK).inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let events = self
                .view
                .show(ui, &self.groups, &self.items, &self.layers, &mut self.viewport);
            for event in events {
                self.handle_event(event);
            }
        });
    }
}
