use egui::{Modifiers, PointerButton, Pos2};

use crate::model::{ItemKey, ItemPatch};

use super::context_menu::MenuContext;

/// Which edge of an item a resize moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// Where a pointer event landed, resolved to time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit<T> {
    pub pos: Pos2,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    pub time: T,
    pub snapped_time: T,
}

/// Payload of the drag-to-create notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDescriptor<T> {
    pub group_index: usize,
    /// Id the new segment should get: one past the largest numeric key.
    pub item_index: i64,
    pub item_start: T,
    pub item_end: Option<T>,
}

/// Unified interaction notification with a change-specific descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction<T> {
    DragStart {
        items: Vec<ItemKey>,
    },
    DragEnd {
        time_delta_ms: i64,
        row_delta: i64,
        patches: Vec<ItemPatch<T>>,
    },
    ResizeStart {
        item: ItemKey,
        edge: ResizeEdge,
    },
    ResizeEnd {
        edge: ResizeEdge,
        patch: ItemPatch<T>,
    },
    ItemsSelected {
        items: Vec<ItemKey>,
    },
    SnappedMouseMove {
        time: T,
        snapped_time: T,
        row: Option<usize>,
    },
}

impl<T> Interaction<T> {
    /// Keys of the items this change touches.
    pub fn affected_items(&self) -> Vec<ItemKey> {
        match self {
            Interaction::DragStart { items } | Interaction::ItemsSelected { items } => items.clone(),
            Interaction::DragEnd { patches, .. } => patches.iter().map(|p| p.key.clone()).collect(),
            Interaction::ResizeStart { item, .. } => vec![item.clone()],
            Interaction::ResizeEnd { patch, .. } => vec![patch.key.clone()],
            Interaction::SnappedMouseMove { .. } => Vec::new(),
        }
    }
}

/// Everything the timeline reports back to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent<T> {
    SelectionChanged(Vec<ItemKey>),
    ItemClick { item: ItemKey, hit: PointerHit<T> },
    ItemDoubleClick { item: ItemKey, hit: PointerHit<T> },
    ItemContextClick { item: ItemKey, hit: PointerHit<T> },
    RowClick { row: usize, hit: PointerHit<T> },
    RowDoubleClick { row: usize, hit: PointerHit<T> },
    RowContextClick { row: usize, hit: PointerHit<T> },
    Interaction(Interaction<T>),
    DragToCreateStarted(CreateDescriptor<T>),
    DragToCreateEnded(CreateDescriptor<T>),
    ContextMenuOpened { anchor: Pos2, context: MenuContext<T> },
}
