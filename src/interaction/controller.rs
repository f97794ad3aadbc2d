//! The interaction state machine behind direct manipulation.
//!
//! One gesture at a time: a rectangle (select or drag-to-create), an item
//! move, or an item resize. Every entry point returns the events the host
//! should see; none of them fail. Calls that refer to a session that no
//! longer exists are no-ops.

use std::time::{Duration, Instant};

use egui::{Modifiers, PointerButton, Pos2, Rect, Vec2};
use log::debug;

use crate::layout::RowLocator;
use crate::model::{max_numeric_key, Item, ItemKey, TimePoint, TimelineViewport};

use super::context_menu::{ContextMenu, ContextMenuProvider, MenuContext};
use super::events::{CreateDescriptor, Interaction, PointerHit, ResizeEdge, TimelineEvent};
use super::gesture::{RectMode, RectSession};
use super::item_drag::{MoveSession, ResizeSession};
use super::selection::SelectionHolder;

pub const DEFAULT_POPUP_TIMEOUT: Duration = Duration::from_secs(3);

/// What a gesture needs to know about the current frame.
pub struct Surface<'a, T> {
    pub viewport: &'a TimelineViewport<T>,
    /// Screen x of the left edge of the time area.
    pub origin_x: f32,
    pub locator: &'a dyn RowLocator,
    pub items: &'a [Item<T>],
    /// Number of caller rows (filler rows excluded).
    pub group_count: usize,
}

impl<T: TimePoint> Surface<'_, T> {
    fn time_at(&self, x: f32, snap_seconds: i64) -> T {
        self.viewport.time_at_pixel(x - self.origin_x, snap_seconds)
    }

    fn hit(&self, pos: Pos2, button: PointerButton, modifiers: Modifiers, snap_seconds: i64) -> PointerHit<T> {
        PointerHit {
            pos,
            button,
            modifiers,
            time: self.time_at(pos.x, 0),
            snapped_time: self.time_at(pos.x, snap_seconds),
        }
    }

    fn next_item_id(&self) -> i64 {
        max_numeric_key(self.items).map_or(0, |max| max + 1)
    }
}

#[derive(Debug)]
enum Gesture<T> {
    Idle,
    Rect(RectSession<T>),
    Move(MoveSession<T>),
    Resize(ResizeSession<T>),
}

pub struct InteractionController<T> {
    selection: SelectionHolder,
    gesture: Gesture<T>,
    snap_seconds: i64,
    drag_to_create: bool,
    force_drag_to_create: Option<bool>,
    popup_until: Option<Instant>,
    popup_timeout: Duration,
    menu: ContextMenu<T>,
    menu_provider: Option<Box<dyn ContextMenuProvider<T>>>,
}

impl<T: TimePoint> InteractionController<T> {
    pub fn new(snap_seconds: i64) -> Self {
        Self {
            selection: SelectionHolder::new(),
            gesture: Gesture::Idle,
            snap_seconds,
            drag_to_create: false,
            force_drag_to_create: None,
            popup_until: None,
            popup_timeout: DEFAULT_POPUP_TIMEOUT,
            menu: ContextMenu::new(),
            menu_provider: None,
        }
    }

    pub fn with_popup_timeout(mut self, timeout: Duration) -> Self {
        self.popup_timeout = timeout;
        self
    }

    pub fn set_popup_timeout(&mut self, timeout: Duration) {
        self.popup_timeout = timeout;
    }

    pub fn snap_seconds(&self) -> i64 {
        self.snap_seconds
    }

    pub fn set_snap_seconds(&mut self, snap_seconds: i64) {
        self.snap_seconds = snap_seconds;
    }

    // ── Selection ───────────────────────────────────────────────

    pub fn selection(&self) -> &SelectionHolder {
        &self.selection
    }

    /// Feed the host's controlled selection (or `None` to self-manage).
    pub fn reconcile_selection(&mut self, incoming: Option<&[ItemKey]>) -> Option<TimelineEvent<T>> {
        self.selection
            .reconcile(incoming)
            .map(TimelineEvent::SelectionChanged)
    }

    // ── Drag-to-create mode ─────────────────────────────────────

    pub fn drag_to_create_active(&self) -> bool {
        self.force_drag_to_create.unwrap_or(self.drag_to_create)
    }

    /// Arm drag-to-create and show the advisory popup until the timeout.
    pub fn enter_drag_to_create(&mut self, now: Instant) {
        debug!("entering drag-to-create mode");
        self.drag_to_create = true;
        self.popup_until = Some(now + self.popup_timeout);
    }

    pub fn exit_drag_to_create(&mut self) {
        debug!("leaving drag-to-create mode");
        self.drag_to_create = false;
        self.popup_until = None;
    }

    /// Host override of the internal mode; `None` removes the override.
    pub fn set_force_drag_to_create(&mut self, force: Option<bool>) {
        self.force_drag_to_create = force;
    }

    pub fn popup_visible(&self) -> bool {
        self.popup_until.is_some()
    }

    /// Hide the advisory popup once its time is up. The mode stays armed.
    pub fn tick(&mut self, now: Instant) {
        if self.popup_until.is_some_and(|until| now >= until) {
            self.popup_until = None;
        }
    }

    // ── Context menu ────────────────────────────────────────────

    pub fn set_context_menu_provider(&mut self, provider: Option<Box<dyn ContextMenuProvider<T>>>) {
        self.menu_provider = provider;
    }

    pub fn menu(&self) -> &ContextMenu<T> {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut ContextMenu<T> {
        &mut self.menu
    }

    /// Open the menu at `anchor` with a snapshot of the current selection.
    pub fn open_context_menu(&mut self, anchor: Pos2, row: Option<usize>, time: Option<T>) -> TimelineEvent<T> {
        let context = MenuContext {
            selection: self.selection.keys().to_vec(),
            row,
            time,
        };
        if let Some(provider) = self.menu_provider.as_deref() {
            let count = self.menu.open(anchor, context.clone(), provider);
            debug!("context menu opened at {anchor:?} with {count} actions");
        }
        TimelineEvent::ContextMenuOpened { anchor, context }
    }

    // ── Session state for rendering ─────────────────────────────

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn rect_session(&self) -> Option<&RectSession<T>> {
        match &self.gesture {
            Gesture::Rect(session) => Some(session),
            _ => None,
        }
    }

    /// Visual offset of `key` while it is being moved.
    pub fn drag_offset(&self, key: &ItemKey) -> Option<Vec2> {
        match &self.gesture {
            Gesture::Move(session) if session.moves(key) => Some(session.offset),
            _ => None,
        }
    }

    /// Moving edge and its offset while `key` is being resized.
    pub fn resize_offset(&self, key: &ItemKey) -> Option<(ResizeEdge, f32)> {
        match &self.gesture {
            Gesture::Resize(session) if session.baseline.key == *key => Some((session.edge, session.offset_x)),
            _ => None,
        }
    }

    /// Button holding the open session; item moves and resizes are primary.
    pub fn session_button(&self) -> Option<PointerButton> {
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Rect(session) => Some(session.button),
            Gesture::Move(_) | Gesture::Resize(_) => Some(PointerButton::Primary),
        }
    }

    /// A secondary press during a primary drag cancels it. Returns true if it did.
    pub fn secondary_press(&mut self) -> bool {
        if self.session_button() == Some(PointerButton::Primary) {
            self.cancel_gesture();
            true
        } else {
            false
        }
    }

    /// Drop a session whose pointer-up never arrived.
    fn discard_stale(&mut self) {
        if !self.is_idle() {
            debug!("discarding stale gesture before a new one");
            self.gesture = Gesture::Idle;
        }
    }

    // ── Rectangle gestures ──────────────────────────────────────

    /// Pointer-down on empty row space.
    pub fn start_gesture(
        &mut self,
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
        surface: &Surface<'_, T>,
    ) -> Vec<TimelineEvent<T>> {
        if button == PointerButton::Middle {
            return Vec::new();
        }
        if button == PointerButton::Secondary && self.secondary_press() {
            return Vec::new();
        }
        self.discard_stale();

        let Some(anchor) = surface.locator.row_at(pos) else {
            return Vec::new();
        };
        let create = self.drag_to_create_active()
            && button == PointerButton::Primary
            && anchor < surface.group_count;
        let mode = if create { RectMode::Create } else { RectMode::Select };
        let mut session = RectSession::begin(mode, pos, anchor, button, modifiers, surface.locator);
        debug!("{mode:?} gesture started on row {anchor}");

        let mut events = Vec::new();
        if create {
            let start = surface.time_at(pos.x, self.snap_seconds);
            session.create_start = Some(start);
            events.push(TimelineEvent::DragToCreateStarted(CreateDescriptor {
                group_index: anchor,
                item_index: surface.next_item_id(),
                item_start: start,
                item_end: None,
            }));
        }
        self.gesture = Gesture::Rect(session);
        events
    }

    /// Pointer moved. No-op without an open session.
    pub fn move_gesture(&mut self, pos: Pos2, surface: &Surface<'_, T>) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Rect(session) => session.update(pos, surface.locator),
            Gesture::Move(session) => session.update(pos, surface.viewport, self.snap_seconds),
            Gesture::Resize(session) => session.update(pos, surface.viewport, self.snap_seconds),
        }
    }

    /// Pointer released. Resolves the open session from the final position.
    pub fn commit_gesture(&mut self, pos: Pos2, surface: &Surface<'_, T>) -> Vec<TimelineEvent<T>> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => Vec::new(),
            Gesture::Rect(mut session) => {
                session.update(pos, surface.locator);
                match session.mode {
                    RectMode::Select => self.commit_select(&session, surface),
                    RectMode::Create => self.commit_create(&session, surface),
                }
            }
            Gesture::Move(mut session) => {
                let result = session.commit(
                    pos,
                    surface.viewport,
                    self.snap_seconds,
                    surface.locator,
                    surface.group_count,
                );
                let patches: Vec<_> = result
                    .patches
                    .into_iter()
                    .filter(|p| surface.items.iter().any(|i| i.key == p.key))
                    .collect();
                debug!(
                    "moved {} items by {} ms and {} rows",
                    patches.len(),
                    result.time_delta_ms,
                    result.row_delta
                );
                vec![TimelineEvent::Interaction(Interaction::DragEnd {
                    time_delta_ms: result.time_delta_ms,
                    row_delta: result.row_delta,
                    patches,
                })]
            }
            Gesture::Resize(mut session) => {
                if !surface.items.iter().any(|i| i.key == session.baseline.key) {
                    debug!("resized item {} vanished; dropping the resize", session.baseline.key);
                    return Vec::new();
                }
                let patch = session.commit(pos, surface.viewport, self.snap_seconds);
                vec![TimelineEvent::Interaction(Interaction::ResizeEnd {
                    edge: session.edge,
                    patch,
                })]
            }
        }
    }

    /// Discard the open session without emitting anything. Drag-to-create
    /// mode stays armed so the user can retry.
    pub fn cancel_gesture(&mut self) {
        if !self.is_idle() {
            debug!("gesture cancelled");
        }
        self.gesture = Gesture::Idle;
    }

    fn rect_times(&self, session: &RectSession<T>, surface: &Surface<'_, T>) -> (T, T) {
        (
            surface.time_at(session.rect.left(), self.snap_seconds),
            surface.time_at(session.rect.right(), self.snap_seconds),
        )
    }

    fn commit_select(&mut self, session: &RectSession<T>, surface: &Surface<'_, T>) -> Vec<TimelineEvent<T>> {
        let (from, to) = self.rect_times(session, surface);
        let keys: Vec<ItemKey> = surface
            .items
            .iter()
            .filter(|i| session.covers_row(i.row) && i.intersects(from, to))
            .map(|i| i.key.clone())
            .collect();
        debug!(
            "rectangle over rows {}..={} selected {} items",
            session.first_row,
            session.last_row,
            keys.len()
        );

        let mut events = Vec::new();
        if let Some(selection) = self.selection.toggle(&keys, session.modifiers, session.button) {
            events.push(TimelineEvent::SelectionChanged(selection));
        }
        events.push(TimelineEvent::Interaction(Interaction::ItemsSelected { items: keys }));

        if session.button == PointerButton::Secondary {
            let row = surface.locator.row_at(session.current);
            let time = surface.time_at(session.current.x, self.snap_seconds);
            events.push(self.open_context_menu(session.current, row, Some(time)));
        }
        events
    }

    fn commit_create(&mut self, session: &RectSession<T>, surface: &Surface<'_, T>) -> Vec<TimelineEvent<T>> {
        let (start, end) = self.rect_times(session, surface);
        let descriptor = CreateDescriptor {
            group_index: session.anchor_row,
            item_index: surface.next_item_id(),
            item_start: start.min(end),
            item_end: Some(start.max(end)),
        };
        debug!("drag-to-create finished on row {}", session.anchor_row);
        self.exit_drag_to_create();
        vec![TimelineEvent::DragToCreateEnded(descriptor)]
    }

    // ── Item gestures ───────────────────────────────────────────

    /// Start moving `key` together with `moving` (the caller decides which
    /// items travel along, usually the selection).
    pub fn begin_item_drag(
        &mut self,
        key: &ItemKey,
        pos: Pos2,
        moving: &[ItemKey],
        surface: &Surface<'_, T>,
    ) -> Vec<TimelineEvent<T>> {
        self.discard_stale();
        let Some(session) = MoveSession::begin(key, moving, pos, surface.items, surface.locator) else {
            return Vec::new();
        };
        let items = session.keys();
        debug!("drag started for {} items", items.len());
        self.gesture = Gesture::Move(session);
        vec![TimelineEvent::Interaction(Interaction::DragStart { items })]
    }

    pub fn begin_item_resize(
        &mut self,
        key: &ItemKey,
        edge: ResizeEdge,
        pos: Pos2,
        surface: &Surface<'_, T>,
    ) -> Vec<TimelineEvent<T>> {
        self.discard_stale();
        let Some(session) = ResizeSession::begin(key, edge, pos, surface.items) else {
            return Vec::new();
        };
        debug!("resize of {key} started on the {edge:?} edge");
        self.gesture = Gesture::Resize(session);
        vec![TimelineEvent::Interaction(Interaction::ResizeStart {
            item: key.clone(),
            edge,
        })]
    }

    // ── Clicks and hover ────────────────────────────────────────

    pub fn item_click(
        &mut self,
        key: &ItemKey,
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
        double: bool,
        surface: &Surface<'_, T>,
    ) -> Vec<TimelineEvent<T>> {
        let mut events = Vec::new();
        if let Some(selection) = self.selection.toggle(std::slice::from_ref(key), modifiers, button) {
            events.push(TimelineEvent::SelectionChanged(selection));
        }
        let hit = surface.hit(pos, button, modifiers, self.snap_seconds);
        let item = key.clone();
        events.push(match (button, double) {
            (PointerButton::Secondary, _) => TimelineEvent::ItemContextClick { item, hit },
            (_, true) => TimelineEvent::ItemDoubleClick { item, hit },
            _ => TimelineEvent::ItemClick { item, hit },
        });
        if button == PointerButton::Secondary {
            let row = surface.locator.row_at(pos);
            events.push(self.open_context_menu(pos, row, Some(hit.snapped_time)));
        }
        events
    }

    /// Click on empty row space. A plain primary click clears the selection.
    pub fn row_click(
        &mut self,
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
        double: bool,
        surface: &Surface<'_, T>,
    ) -> Vec<TimelineEvent<T>> {
        let Some(row) = surface.locator.row_at(pos) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        if button == PointerButton::Primary {
            if let Some(selection) = self.selection.toggle(&[], modifiers, button) {
                events.push(TimelineEvent::SelectionChanged(selection));
            }
        }
        let hit = surface.hit(pos, button, modifiers, self.snap_seconds);
        events.push(match (button, double) {
            (PointerButton::Secondary, _) => TimelineEvent::RowContextClick { row, hit },
            (_, true) => TimelineEvent::RowDoubleClick { row, hit },
            _ => TimelineEvent::RowClick { row, hit },
        });
        if button == PointerButton::Secondary {
            events.push(self.open_context_menu(pos, Some(row), Some(hit.snapped_time)));
        }
        events
    }

    /// Pointer hovering over the time area.
    pub fn hover(&self, pos: Pos2, surface: &Surface<'_, T>) -> TimelineEvent<T> {
        TimelineEvent::Interaction(Interaction::SnappedMouseMove {
            time: surface.time_at(pos.x, 0),
            snapped_time: surface.time_at(pos.x, self.snap_seconds),
            row: surface.locator.row_at(pos),
        })
    }

    /// Screen rectangle of the open rectangle session, if any.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.rect_session().map(|s| s.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::context_menu::MenuAction;
    use crate::interaction::gesture::tests::UniformRows;
    use crate::model::time::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE};
    use crate::model::ItemPatch;

    const HOUR: i64 = MILLIS_PER_HOUR;
    const ORIGIN_X: f32 = 100.0;

    struct Fixture {
        viewport: TimelineViewport<i64>,
        rows: UniformRows,
        items: Vec<Item<i64>>,
    }

    impl Fixture {
        /// 10 h over 1000 px (one hour is 100 px), four rows of 20 px.
        fn new(items: Vec<Item<i64>>) -> Self {
            Self {
                viewport: TimelineViewport::new(0, 10 * HOUR, 1000.0).unwrap(),
                rows: UniformRows { height: 20.0, count: 4 },
                items,
            }
        }

        fn surface(&self) -> Surface<'_, i64> {
            Surface {
                viewport: &self.viewport,
                origin_x: ORIGIN_X,
                locator: &self.rows,
                items: &self.items,
                group_count: 3,
            }
        }
    }

    /// Screen point for time `hours` on `row`.
    fn at(hours: f32, row: usize) -> Pos2 {
        Pos2::new(ORIGIN_X + hours * 100.0, row as f32 * 20.0 + 10.0)
    }

    fn k(n: i64) -> ItemKey {
        ItemKey::Number(n)
    }

    fn sample() -> Vec<Item<i64>> {
        vec![
            Item::new(0, 0, 0, HOUR),
            Item::new(1, 0, HOUR / 2, 3 * HOUR / 2),
            Item::new(2, 1, 4 * HOUR, 6 * HOUR),
            Item::new(5, 2, 8 * HOUR, 9 * HOUR),
        ]
    }

    fn selection_of(events: &[TimelineEvent<i64>]) -> Option<Vec<ItemKey>> {
        events.iter().find_map(|e| match e {
            TimelineEvent::SelectionChanged(keys) => Some(keys.clone()),
            _ => None,
        })
    }

    #[test]
    fn rectangle_selects_intersecting_items_across_rows() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.start_gesture(at(0.75, 0), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        ctl.move_gesture(at(4.5, 1), &fx.surface());
        assert!(ctl.selection_rect().is_some());

        let events = ctl.commit_gesture(at(5.0, 1), &fx.surface());
        assert_eq!(selection_of(&events), Some(vec![k(0), k(1), k(2)]));
        assert!(events.contains(&TimelineEvent::Interaction(Interaction::ItemsSelected {
            items: vec![k(0), k(1), k(2)],
        })));
        assert!(ctl.is_idle());
    }

    #[test]
    fn rectangle_with_modifier_toggles() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.item_click(&k(0), at(0.1, 0), PointerButton::Primary, Modifiers::NONE, false, &fx.surface());

        ctl.start_gesture(at(0.2, 0), PointerButton::Primary, Modifiers::CTRL, &fx.surface());
        let events = ctl.commit_gesture(at(1.2, 0), &fx.surface());
        assert_eq!(selection_of(&events), Some(vec![k(1)]));
    }

    #[test]
    fn middle_button_never_starts() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.start_gesture(at(1.0, 0), PointerButton::Middle, Modifiers::NONE, &fx.surface());
        assert!(ctl.is_idle());
    }

    #[test]
    fn moves_and_commits_without_session_are_noops() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.move_gesture(at(2.0, 1), &fx.surface());
        assert!(ctl.commit_gesture(at(2.0, 1), &fx.surface()).is_empty());

        ctl.start_gesture(at(0.2, 0), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        ctl.cancel_gesture();
        ctl.move_gesture(at(3.0, 2), &fx.surface());
        assert!(ctl.commit_gesture(at(3.0, 2), &fx.surface()).is_empty());
        assert!(ctl.selection().is_empty());
    }

    #[test]
    fn secondary_press_cancels_a_primary_drag() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.start_gesture(at(0.2, 0), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        assert!(ctl
            .start_gesture(at(0.5, 0), PointerButton::Secondary, Modifiers::NONE, &fx.surface())
            .is_empty());
        assert!(ctl.is_idle());
    }

    #[test]
    fn session_button_tracks_the_pressing_button() {
        let fx = Fixture::new(sample());
        let s = fx.surface();
        let mut ctl = InteractionController::new(0);
        assert_eq!(ctl.session_button(), None);

        ctl.start_gesture(at(0.2, 1), PointerButton::Secondary, Modifiers::NONE, &s);
        assert_eq!(ctl.session_button(), Some(PointerButton::Secondary));
        ctl.cancel_gesture();

        ctl.begin_item_drag(&k(0), at(0.5, 0), &[k(0)], &s);
        assert_eq!(ctl.session_button(), Some(PointerButton::Primary));
        ctl.cancel_gesture();

        ctl.begin_item_resize(&k(0), ResizeEdge::End, at(1.0, 0), &s);
        assert_eq!(ctl.session_button(), Some(PointerButton::Primary));
    }

    #[test]
    fn drag_to_create_reports_row_and_span() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(60);
        let now = Instant::now();
        ctl.enter_drag_to_create(now);

        let started = ctl.start_gesture(at(1.0, 2), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        assert_eq!(
            started,
            vec![TimelineEvent::DragToCreateStarted(CreateDescriptor {
                group_index: 2,
                item_index: 6,
                item_start: HOUR,
                item_end: None,
            })]
        );

        // wandering into another row does not move the segment off row 2
        ctl.move_gesture(at(3.0, 0), &fx.surface());
        let rect = ctl.selection_rect().unwrap();
        assert_eq!((rect.top(), rect.bottom()), (40.0, 60.0));

        let ended = ctl.commit_gesture(at(4.0, 2), &fx.surface());
        assert_eq!(
            ended,
            vec![TimelineEvent::DragToCreateEnded(CreateDescriptor {
                group_index: 2,
                item_index: 6,
                item_start: HOUR,
                item_end: Some(4 * HOUR),
            })]
        );
        assert!(!ctl.drag_to_create_active());
        assert_eq!(ctl.selection().keys(), &[] as &[ItemKey]);
    }

    #[test]
    fn cancelled_create_keeps_the_mode() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.enter_drag_to_create(Instant::now());
        ctl.start_gesture(at(1.0, 1), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        ctl.cancel_gesture();
        assert!(ctl.drag_to_create_active());
    }

    #[test]
    fn create_on_a_filler_row_falls_back_to_select() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.enter_drag_to_create(Instant::now());
        let events = ctl.start_gesture(at(1.0, 3), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        assert!(events.is_empty());
        assert_eq!(ctl.rect_session().map(|s| s.mode), Some(RectMode::Select));
    }

    #[test]
    fn forced_mode_overrides_and_survives_commit() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.set_force_drag_to_create(Some(true));
        ctl.start_gesture(at(1.0, 1), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        ctl.commit_gesture(at(2.0, 1), &fx.surface());
        assert!(ctl.drag_to_create_active());

        ctl.set_force_drag_to_create(Some(false));
        ctl.enter_drag_to_create(Instant::now());
        assert!(!ctl.drag_to_create_active());
    }

    #[test]
    fn popup_hides_after_timeout_but_mode_stays() {
        let mut ctl: InteractionController<i64> =
            InteractionController::new(0).with_popup_timeout(Duration::from_secs(2));
        let t0 = Instant::now();
        ctl.enter_drag_to_create(t0);
        ctl.tick(t0 + Duration::from_secs(1));
        assert!(ctl.popup_visible());
        ctl.tick(t0 + Duration::from_secs(2));
        assert!(!ctl.popup_visible());
        assert!(ctl.drag_to_create_active());
    }

    #[test]
    fn click_sequence_builds_and_trims_selection() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        let s = fx.surface();
        let e = ctl.item_click(&k(0), at(0.1, 0), PointerButton::Primary, Modifiers::NONE, false, &s);
        assert_eq!(selection_of(&e), Some(vec![k(0)]));
        let e = ctl.item_click(&k(2), at(4.1, 1), PointerButton::Primary, Modifiers::CTRL, false, &s);
        assert_eq!(selection_of(&e), Some(vec![k(0), k(2)]));
        let e = ctl.item_click(&k(0), at(0.1, 0), PointerButton::Primary, Modifiers::CTRL, false, &s);
        assert_eq!(selection_of(&e), Some(vec![k(2)]));
        assert!(matches!(e.last(), Some(TimelineEvent::ItemClick { item, .. }) if *item == k(0)));
    }

    #[test]
    fn right_click_on_sole_selected_item_opens_menu_with_existing_selection() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.set_context_menu_provider(Some(Box::new(|_: &MenuContext<i64>| {
            vec![MenuAction::<i64>::new("Delete")]
        })));
        let s = fx.surface();
        ctl.item_click(&k(2), at(4.5, 1), PointerButton::Primary, Modifiers::NONE, false, &s);

        let events = ctl.item_click(&k(2), at(4.5, 1), PointerButton::Secondary, Modifiers::NONE, false, &s);
        assert_eq!(selection_of(&events), None);
        assert!(matches!(events[0], TimelineEvent::ItemContextClick { .. }));
        match events.last() {
            Some(TimelineEvent::ContextMenuOpened { context, .. }) => {
                assert_eq!(context.selection, vec![k(2)]);
                assert_eq!(context.row, Some(1));
            }
            other => panic!("expected a context menu, got {other:?}"),
        }
        assert!(ctl.menu().is_open());
        assert_eq!(ctl.menu().labels(), vec!["Delete".to_string()]);
    }

    #[test]
    fn secondary_rectangle_opens_menu_at_release() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.start_gesture(at(3.5, 1), PointerButton::Secondary, Modifiers::NONE, &fx.surface());
        let events = ctl.commit_gesture(at(4.5, 1), &fx.surface());
        assert_eq!(selection_of(&events), Some(vec![k(2)]));
        match events.last() {
            Some(TimelineEvent::ContextMenuOpened { anchor, context }) => {
                assert_eq!(*anchor, at(4.5, 1));
                assert_eq!(context.time, Some(4 * HOUR + HOUR / 2));
            }
            other => panic!("expected a context menu, got {other:?}"),
        }
    }

    #[test]
    fn row_click_clears_and_reports() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(900);
        let s = fx.surface();
        ctl.item_click(&k(0), at(0.1, 0), PointerButton::Primary, Modifiers::NONE, false, &s);

        let events = ctl.row_click(at(2.125, 1), PointerButton::Primary, Modifiers::NONE, true, &s);
        assert_eq!(selection_of(&events), Some(vec![]));
        match events.last() {
            Some(TimelineEvent::RowDoubleClick { row, hit }) => {
                assert_eq!(*row, 1);
                // exactly halfway between two 15 min marks rounds up
                assert_eq!(hit.snapped_time, 2 * HOUR + 15 * MILLIS_PER_MINUTE);
                assert_eq!(hit.time, 2 * HOUR + 7 * MILLIS_PER_MINUTE + 30_000);
            }
            other => panic!("expected a row double click, got {other:?}"),
        }

        let events = ctl.row_click(at(2.0625, 1), PointerButton::Primary, Modifiers::NONE, false, &s);
        match events.last() {
            Some(TimelineEvent::RowClick { row, hit }) => {
                assert_eq!(*row, 1);
                assert_eq!(hit.snapped_time, 2 * HOUR);
            }
            other => panic!("expected a row click, got {other:?}"),
        }
    }

    #[test]
    fn item_drag_emits_patches_for_all_moving_items() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(900);
        let s = fx.surface();
        let started = ctl.begin_item_drag(&k(0), at(0.5, 0), &[k(0), k(1)], &s);
        assert_eq!(
            started,
            vec![TimelineEvent::Interaction(Interaction::DragStart { items: vec![k(0), k(1)] })]
        );

        ctl.move_gesture(at(2.6, 1), &s);
        assert!(ctl.drag_offset(&k(1)).is_some());
        assert!(ctl.drag_offset(&k(2)).is_none());

        let events = ctl.commit_gesture(at(2.5, 1), &s);
        assert_eq!(
            events,
            vec![TimelineEvent::Interaction(Interaction::DragEnd {
                time_delta_ms: 2 * HOUR,
                row_delta: 1,
                patches: vec![
                    ItemPatch { key: k(0), row: 1, start: 2 * HOUR, end: 3 * HOUR },
                    ItemPatch { key: k(1), row: 1, start: 5 * HOUR / 2, end: 7 * HOUR / 2 },
                ],
            })]
        );
        assert!(ctl.is_idle());
    }

    #[test]
    fn vanished_items_are_skipped_at_commit() {
        let mut fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.begin_item_resize(&k(2), ResizeEdge::End, at(6.0, 1), &fx.surface());
        fx.items.retain(|i| i.key != k(2));
        assert!(ctl.commit_gesture(at(7.0, 1), &fx.surface()).is_empty());

        fx.items = sample();
        ctl.begin_item_drag(&k(0), at(0.5, 0), &[k(0), k(5)], &fx.surface());
        fx.items.retain(|i| i.key != k(5));
        match ctl.commit_gesture(at(1.5, 0), &fx.surface()).as_slice() {
            [TimelineEvent::Interaction(Interaction::DragEnd { patches, .. })] => {
                assert_eq!(patches.len(), 1);
                assert_eq!(patches[0].key, k(0));
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn resize_commit_rewrites_one_edge() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(1800);
        let s = fx.surface();
        let started = ctl.begin_item_resize(&k(2), ResizeEdge::Start, at(4.0, 1), &s);
        assert_eq!(started.len(), 1);
        ctl.move_gesture(at(3.4, 1), &s);
        assert_eq!(ctl.resize_offset(&k(2)).map(|(edge, _)| edge), Some(ResizeEdge::Start));

        let events = ctl.commit_gesture(at(3.4, 3), &s);
        assert_eq!(
            events,
            vec![TimelineEvent::Interaction(Interaction::ResizeEnd {
                edge: ResizeEdge::Start,
                patch: ItemPatch { key: k(2), row: 1, start: 7 * HOUR / 2, end: 6 * HOUR },
            })]
        );
    }

    #[test]
    fn new_gesture_discards_a_stale_one() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        ctl.begin_item_drag(&k(0), at(0.5, 0), &[k(0)], &fx.surface());
        ctl.start_gesture(at(7.0, 2), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        assert!(ctl.rect_session().is_some());
        assert!(ctl.drag_offset(&k(0)).is_none());
    }

    #[test]
    fn controlled_selection_ignores_rectangles() {
        let fx = Fixture::new(sample());
        let mut ctl = InteractionController::new(0);
        assert!(ctl.reconcile_selection(Some(&[k(5)])).is_some());
        ctl.start_gesture(at(0.0, 0), PointerButton::Primary, Modifiers::NONE, &fx.surface());
        let events = ctl.commit_gesture(at(9.0, 2), &fx.surface());
        assert_eq!(selection_of(&events), None);
        assert_eq!(ctl.selection().keys(), &[k(5)]);
    }

    #[test]
    fn hover_reports_snapped_time() {
        let fx = Fixture::new(sample());
        let ctl = InteractionController::new(3600);
        assert_eq!(
            ctl.hover(at(2.625, 2), &fx.surface()),
            TimelineEvent::Interaction(Interaction::SnappedMouseMove {
                time: 2 * HOUR + 37 * MILLIS_PER_MINUTE + 30_000,
                snapped_time: 3 * HOUR,
                row: Some(2),
            })
        );
    }
}
