pub mod context_menu;
pub mod controller;
pub mod events;
pub mod gesture;
pub mod item_drag;
pub mod selection;
pub mod throttle;

pub use context_menu::{ContextMenu, ContextMenuProvider, MenuAction, MenuClose, MenuContext};
pub use controller::{InteractionController, Surface};
pub use events::{CreateDescriptor, Interaction, PointerHit, ResizeEdge, TimelineEvent};
pub use gesture::{RectMode, RectSession};
pub use selection::SelectionHolder;
pub use throttle::MoveThrottle;
