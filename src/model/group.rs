use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

use super::item::Item;

/// A row descriptor supplied by the host.
///
/// Ids are dense from 0 and double as row indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: usize,
    pub title: String,
}

impl Group {
    pub fn new(id: usize, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Check the host preconditions: dense group ids and items on known rows.
pub fn validate<T>(groups: &[Group], items: &[Item<T>]) -> Result<()> {
    if let Some((index, group)) = groups.iter().enumerate().find(|(i, g)| g.id != *i) {
        return Err(TimelineError::NonDenseGroups {
            index,
            found: group.id,
        });
    }
    if let Some(item) = items.iter().find(|i| i.row >= groups.len()) {
        return Err(TimelineError::UnknownRow {
            key: item.key.clone(),
            row: item.row,
            row_count: groups.len(),
        });
    }
    Ok(())
}
