use std::fmt;

use egui::Color32;
use serde::{Deserialize, Serialize};

use super::time::TimePoint;

/// Stable identity of an item across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    Number(i64),
    Text(String),
}

impl ItemKey {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ItemKey::Number(n) => Some(*n),
            ItemKey::Text(_) => None,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Number(n) => write!(f, "{n}"),
            ItemKey::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for ItemKey {
    fn from(n: i64) -> Self {
        ItemKey::Number(n)
    }
}

impl From<i32> for ItemKey {
    fn from(n: i32) -> Self {
        ItemKey::Number(i64::from(n))
    }
}

impl From<&str> for ItemKey {
    fn from(s: &str) -> Self {
        ItemKey::Text(s.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(s: String) -> Self {
        ItemKey::Text(s)
    }
}

/// A time-bounded segment placed on one row.
///
/// `end >= start` is assumed by layout math but not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item<T> {
    pub key: ItemKey,
    /// Id of the group (row) this item belongs to.
    pub row: usize,
    pub start: T,
    pub end: T,
    pub title: String,
    /// Display color for the segment (stored as RGBA).
    #[serde(with = "color_serde")]
    pub color: Color32,
}

impl<T: TimePoint> Item<T> {
    pub fn new(key: impl Into<ItemKey>, row: usize, start: T, end: T) -> Self {
        Self {
            key: key.into(),
            row,
            start,
            end,
            title: String::new(),
            color: Color32::from_rgb(70, 130, 180), // Steel blue
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// `[start, end)` in epoch milliseconds.
    pub fn span_millis(&self) -> (i64, i64) {
        (self.start.to_millis(), self.end.to_millis())
    }

    /// Strict intersection with `[from, to)`: touching does not count.
    pub fn intersects(&self, from: T, to: T) -> bool {
        self.end > from && self.start < to
    }

    /// Apply a committed move/resize.
    pub fn apply_patch(&mut self, patch: &ItemPatch<T>) {
        if patch.key == self.key {
            self.row = patch.row;
            self.start = patch.start;
            self.end = patch.end;
        }
    }
}

/// New placement for an item after a drag or resize commits.
///
/// The controller never mutates items; hosts apply patches to their own state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPatch<T> {
    pub key: ItemKey,
    pub row: usize,
    pub start: T,
    pub end: T,
}

/// Apply every patch whose key matches an item. Returns how many items changed.
pub fn apply_patches<T: TimePoint>(items: &mut [Item<T>], patches: &[ItemPatch<T>]) -> usize {
    let mut changed = 0;
    for patch in patches {
        if let Some(item) = items.iter_mut().find(|i| i.key == patch.key) {
            item.apply_patch(patch);
            changed += 1;
        }
    }
    changed
}

/// The largest numeric key in `items`, if any.
pub fn max_numeric_key<T>(items: &[Item<T>]) -> Option<i64> {
    items.iter().filter_map(|i| i.key.as_number()).max()
}

/// Serde helper for `Color32`.
mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        color.to_array().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [r, g, b, a]: [u8; 4] = Deserialize::deserialize(deserializer)?;
        Ok(Color32::from_rgba_premultiplied(r, g, b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_is_strict() {
        let item = Item::new(1, 0, 100_i64, 200);
        assert!(item.intersects(150, 160));
        assert!(item.intersects(50, 101));
        assert!(!item.intersects(200, 300));
        assert!(!item.intersects(0, 100));
    }

    #[test]
    fn patches_apply_by_key() {
        let mut items = vec![Item::new(1, 0, 0_i64, 10), Item::new("b", 1, 5, 15)];
        let patches = vec![
            ItemPatch { key: ItemKey::from("b"), row: 2, start: 20, end: 30 },
            ItemPatch { key: ItemKey::from(99), row: 0, start: 0, end: 0 },
        ];
        assert_eq!(apply_patches(&mut items, &patches), 1);
        assert_eq!((items[1].row, items[1].start, items[1].end), (2, 20, 30));
        assert_eq!(items[0].start, 0);
    }

    #[test]
    fn keys_deserialize_untagged() {
        let keys: Vec<ItemKey> = serde_json::from_str(r#"[3, "x"]"#).unwrap();
        assert_eq!(keys, vec![ItemKey::Number(3), ItemKey::from("x")]);
    }

    #[test]
    fn max_numeric_key_ignores_text() {
        let items = vec![Item::new(4, 0, 0_i64, 1), Item::new("z", 0, 0, 1), Item::new(-2, 0, 0, 1)];
        assert_eq!(max_numeric_key(&items), Some(4));
        assert_eq!(max_numeric_key::<i64>(&[]), None);
    }
}
