pub mod context_menu;
pub mod theme;
pub mod timeline_view;

pub use timeline_view::TimelineView;
