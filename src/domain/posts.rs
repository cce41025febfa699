//! Post invariants: field limits, category set normalisation, and the
//! add/remove plan used when re-associating a post with categories.

use std::collections::BTreeSet;

use crate::domain::error::DomainError;

pub const TITLE_MAX_LEN: usize = 200;
pub const CATEGORY_NAME_MAX_LEN: usize = 100;

/// Trim `value` and reject it when empty or longer than `max_len` characters.
pub fn require_text(
    value: &str,
    field: &'static str,
    max_len: Option<usize>,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::missing(field));
    }
    match max_len {
        Some(max_len) if trimmed.chars().count() > max_len => {
            return Err(DomainError::validation(
                field,
                format!("must be at most {max_len} characters"),
            ));
        }
        _ => {}
    }
    Ok(trimmed.to_string())
}

/// Map blank optional text to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Trim, drop blanks and de-duplicate a requested category slug list while
/// keeping first-seen order.
pub fn normalize_category_slugs(slugs: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    slugs
        .iter()
        .map(|slug| slug.trim())
        .filter(|slug| !slug.is_empty())
        .filter(|slug| seen.insert(slug.to_string()))
        .map(str::to_string)
        .collect()
}

/// Join-row changes needed to move a post from one category set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySyncPlan {
    pub to_add: Vec<i32>,
    pub to_remove: Vec<i32>,
}

impl CategorySyncPlan {
    /// Categories in `desired` but not `current` are added; categories in
    /// `current` but not `desired` are removed. Shared ids are left alone.
    pub fn between(current: &[i32], desired: &[i32]) -> Self {
        let current: BTreeSet<i32> = current.iter().copied().collect();
        let desired: BTreeSet<i32> = desired.iter().copied().collect();

        Self {
            to_add: desired.difference(&current).copied().collect(),
            to_remove: current.difference(&desired).copied().collect(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}
