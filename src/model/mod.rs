pub mod group;
pub mod item;
pub mod layer;
pub mod time;
pub mod timeline;

pub use group::{validate, Group};
pub use item::{apply_patches, max_numeric_key, Item, ItemKey, ItemPatch};
pub use layer::{layers_for_row, RowLayer};
pub use time::TimePoint;
pub use timeline::{snap, TimelineViewport};
