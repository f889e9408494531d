//! Cascading selector: an ordered set of dependent selection levels.
//!
//! Choosing a value at one level invalidates every level that depends on it,
//! transitively, and asks for the options of its direct children. Option
//! fetches are performed by the caller; each one carries a [`FetchTicket`]
//! stamped with the target level's generation. A ticket whose generation no
//! longer matches is discarded when it comes back, so a slow response for an
//! old parent value can never overwrite options for a newer one.

use crate::error::{CascadeError, OptionSourceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One choice of a selection level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(deserialize_with = "deserialize_option_id")]
    pub id: String,
    #[serde(alias = "name")]
    pub label: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

fn deserialize_option_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid option id: {}",
            other
        ))),
    }
}

/// Capability that produces the options of a level for a given parent value.
///
/// `parent` is `None` only for root levels.
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn fetch_options(
        &self,
        level: &str,
        parent: Option<&str>,
    ) -> Result<Vec<SelectOption>, OptionSourceError>;
}

/// State of one selection level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionLevel {
    pub key: String,
    pub options: Vec<SelectOption>,
    pub selected: Option<String>,
    pub depends_on: Option<String>,
    /// Bumped whenever the level's options are invalidated.
    pub generation: u64,
    /// A fetch for the current generation is outstanding.
    pub pending: bool,
}

impl SelectionLevel {
    pub fn root(key: impl Into<String>) -> Self {
        Self::new(key, None)
    }

    pub fn child(key: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(key, Some(parent.into()))
    }

    fn new(key: impl Into<String>, depends_on: Option<String>) -> Self {
        Self {
            key: key.into(),
            options: Vec::new(),
            selected: None,
            depends_on,
            generation: 0,
            pending: false,
        }
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        let selected = self.selected.as_deref()?;
        self.options.iter().find(|o| o.id == selected)
    }

    fn invalidate(&mut self) {
        self.selected = None;
        self.options.clear();
        self.generation = self.generation.wrapping_add(1);
        self.pending = false;
    }
}

/// Request to load options for `level`, valid only for `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: String,
    pub parent_value: Option<String>,
    pub generation: u64,
}

/// Outcome of handing a fetch result back to the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Options replaced; carries the option count.
    Loaded(usize),
    /// The ticket was superseded; the result was dropped.
    Stale,
    /// The fetch failed; the level stays empty but usable.
    Failed(String),
}

/// An ordered chain (or forest) of dependent selection levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadingSelector {
    levels: Vec<SelectionLevel>,
}

impl CascadingSelector {
    /// Build from levels declared parent-before-child.
    pub fn new(levels: Vec<SelectionLevel>) -> Result<Self, CascadeError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for level in &levels {
            if let Some(parent) = level.depends_on.as_deref() {
                if !seen.contains(parent) {
                    return Err(CascadeError::InvalidDependency {
                        key: level.key.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
            if !seen.insert(level.key.as_str()) {
                return Err(CascadeError::DuplicateLevel {
                    key: level.key.clone(),
                });
            }
        }
        Ok(Self { levels })
    }

    /// Linear chain where each key depends on the one before it.
    pub fn chain(keys: &[&str]) -> Self {
        let levels = keys
            .iter()
            .enumerate()
            .map(|(i, key)| match i {
                0 => SelectionLevel::root(*key),
                _ => SelectionLevel::child(*key, keys[i - 1]),
            })
            .collect();
        Self { levels }
    }

    pub fn levels(&self) -> &[SelectionLevel] {
        &self.levels
    }

    pub fn level(&self, key: &str) -> Option<&SelectionLevel> {
        self.levels.iter().find(|l| l.key == key)
    }

    pub fn selected(&self, key: &str) -> Option<&str> {
        self.level(key).and_then(|l| l.selected.as_deref())
    }

    pub fn options(&self, key: &str) -> &[SelectOption] {
        self.level(key).map(|l| l.options.as_slice()).unwrap_or(&[])
    }

    /// Current selections in declaration order.
    pub fn selected_path(&self) -> Vec<(&str, &str)> {
        self.levels
            .iter()
            .filter_map(|l| l.selected.as_deref().map(|v| (l.key.as_str(), v)))
            .collect()
    }

    /// Tickets for the options of every root level.
    pub fn mount(&mut self) -> Vec<FetchTicket> {
        self.levels
            .iter_mut()
            .filter(|l| l.depends_on.is_none())
            .map(|level| {
                level.invalidate();
                level.pending = true;
                FetchTicket {
                    level: level.key.clone(),
                    parent_value: None,
                    generation: level.generation,
                }
            })
            .collect()
    }

    /// Clear every selection and option, then re-issue root tickets.
    pub fn reset(&mut self) -> Vec<FetchTicket> {
        for level in &mut self.levels {
            level.invalidate();
        }
        self.mount()
    }

    /// Tickets for levels left without options by a failed fetch.
    ///
    /// A level qualifies when it has no options, no selection and no fetch in
    /// flight, and it is a root or its parent holds a selection.
    pub fn retry_empty(&mut self) -> Vec<FetchTicket> {
        let mut tickets = Vec::new();
        for index in 0..self.levels.len() {
            let level = &self.levels[index];
            if level.pending || level.selected.is_some() || !level.options.is_empty() {
                continue;
            }
            let parent_value = match level.depends_on.as_deref() {
                None => None,
                Some(parent) => match self.selected(parent) {
                    Some(value) => Some(value.to_string()),
                    None => continue,
                },
            };
            let level = &mut self.levels[index];
            level.generation = level.generation.wrapping_add(1);
            level.pending = true;
            tickets.push(FetchTicket {
                level: level.key.clone(),
                parent_value,
                generation: level.generation,
            });
        }
        if !tickets.is_empty() {
            tracing::debug!(retried = tickets.len(), "retrying empty levels");
        }
        tickets
    }

    /// Select `value` (or unset with `None`/empty) at `key`.
    ///
    /// Every transitive descendant is cleared. Returns tickets for the direct
    /// children when a value was chosen. Re-selecting the current value is a
    /// no-op, and a child cannot be given a value while its parent is unset.
    pub fn set_selection(
        &mut self,
        key: &str,
        value: Option<&str>,
    ) -> Result<Vec<FetchTicket>, CascadeError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let index = self
            .levels
            .iter()
            .position(|l| l.key == key)
            .ok_or_else(|| CascadeError::UnknownLevel {
                key: key.to_string(),
            })?;

        let level = &self.levels[index];
        if level.selected.as_deref() == value {
            return Ok(Vec::new());
        }
        if let (Some(parent), Some(_)) = (level.depends_on.as_deref(), value) {
            if self.selected(parent).is_none() {
                return Err(CascadeError::ParentNotSelected {
                    key: key.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
        if let Some(v) = value {
            // Empty option lists accept free text so a failed fetch never blocks the form.
            if !level.options.is_empty() && !level.options.iter().any(|o| o.id == v) {
                return Err(CascadeError::UnknownOption {
                    key: key.to_string(),
                    value: v.to_string(),
                });
            }
        }

        self.levels[index].selected = value.map(str::to_string);

        let mut cleared: HashSet<String> = HashSet::new();
        cleared.insert(key.to_string());
        let mut tickets = Vec::new();
        for level in self.levels.iter_mut().skip(index + 1) {
            let Some(parent) = level.depends_on.as_deref() else {
                continue;
            };
            if !cleared.contains(parent) {
                continue;
            }
            let direct_child = parent == key;
            level.invalidate();
            if direct_child {
                if let Some(v) = value {
                    level.pending = true;
                    tickets.push(FetchTicket {
                        level: level.key.clone(),
                        parent_value: Some(v.to_string()),
                        generation: level.generation,
                    });
                }
            }
            cleared.insert(level.key.clone());
        }

        tracing::debug!(
            level_key = key,
            value = value.unwrap_or(""),
            cleared = cleared.len() - 1,
            "selection changed"
        );
        Ok(tickets)
    }

    /// Apply a fetch result if its ticket is still current.
    pub fn apply_options<E: fmt::Display>(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<SelectOption>, E>,
    ) -> Applied {
        let Some(level) = self.levels.iter_mut().find(|l| l.key == ticket.level) else {
            return Applied::Stale;
        };
        if level.generation != ticket.generation {
            tracing::debug!(
                level_key = %ticket.level,
                ticket_generation = ticket.generation,
                current_generation = level.generation,
                "discarding stale options"
            );
            return Applied::Stale;
        }
        level.pending = false;
        match result {
            Ok(options) => {
                let count = options.len();
                level.options = options;
                Applied::Loaded(count)
            }
            Err(err) => {
                tracing::warn!(level_key = %ticket.level, error = %err, "option fetch failed");
                level.options.clear();
                Applied::Failed(err.to_string())
            }
        }
    }

    /// Fetch and apply every ticket sequentially through `source`.
    pub async fn load<S>(&mut self, source: &S, tickets: Vec<FetchTicket>) -> Vec<Applied>
    where
        S: OptionSource + ?Sized,
    {
        let mut outcomes = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let result = source
                .fetch_options(&ticket.level, ticket.parent_value.as_deref())
                .await;
            outcomes.push(self.apply_options(&ticket, result));
        }
        outcomes
    }

    /// Mount and load root options.
    pub async fn mount_and_load<S>(&mut self, source: &S) -> Vec<Applied>
    where
        S: OptionSource + ?Sized,
    {
        let tickets = self.mount();
        self.load(source, tickets).await
    }

    /// Select a value and load the direct children's options.
    pub async fn select_and_load<S>(
        &mut self,
        source: &S,
        key: &str,
        value: Option<&str>,
    ) -> Result<Vec<Applied>, CascadeError>
    where
        S: OptionSource + ?Sized,
    {
        let tickets = self.set_selection(key, value)?;
        Ok(self.load(source, tickets).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ids: &[&str]) -> Vec<SelectOption> {
        ids.iter().map(|id| SelectOption::new(*id, *id)).collect()
    }

    fn location() -> CascadingSelector {
        CascadingSelector::chain(&["state", "district", "tehsil", "area"])
    }

    fn loaded(selector: &mut CascadingSelector, ticket: &FetchTicket, ids: &[&str]) {
        let applied = selector.apply_options::<String>(ticket, Ok(opts(ids)));
        assert_eq!(applied, Applied::Loaded(ids.len()));
    }

    #[test]
    fn test_new_rejects_child_before_parent() {
        let err = CascadingSelector::new(vec![
            SelectionLevel::child("district", "state"),
            SelectionLevel::root("state"),
        ])
        .unwrap_err();
        assert!(matches!(err, CascadeError::InvalidDependency { .. }));
    }

    #[test]
    fn test_new_rejects_duplicate_level() {
        let err = CascadingSelector::new(vec![
            SelectionLevel::root("state"),
            SelectionLevel::root("state"),
        ])
        .unwrap_err();
        assert!(matches!(err, CascadeError::DuplicateLevel { .. }));
    }

    #[test]
    fn test_retry_empty_reissues_failed_child_fetch() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP", "UP"]);
        let child = selector.set_selection("state", Some("MP")).unwrap().remove(0);
        assert!(matches!(
            selector.apply_options(&child, Err::<Vec<SelectOption>, _>("offline")),
            Applied::Failed(_)
        ));

        let retry = selector.retry_empty();
        assert_eq!(retry.len(), 1);
        assert_eq!(retry[0].level, "district");
        assert_eq!(retry[0].parent_value.as_deref(), Some("MP"));
        assert!(retry[0].generation > child.generation);
        assert_eq!(
            selector.apply_options::<String>(&child, Ok(opts(&["old"]))),
            Applied::Stale
        );
        loaded(&mut selector, &retry[0], &["Jabalpur"]);
        assert_eq!(selector.selected("state"), Some("MP"));
        assert!(selector.retry_empty().is_empty());
    }

    #[test]
    fn test_retry_empty_skips_pending_and_unparented_levels() {
        let mut selector = location();
        selector.mount();
        assert!(selector.retry_empty().is_empty());
    }

    #[test]
    fn test_mount_issues_root_ticket_only() {
        let mut selector = location();
        let tickets = selector.mount();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].level, "state");
        assert_eq!(tickets[0].parent_value, None);
        assert!(selector.level("state").unwrap().pending);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let mut selector = location();
        let err = selector.set_selection("village", Some("x")).unwrap_err();
        assert_eq!(
            err,
            CascadeError::UnknownLevel {
                key: "village".to_string()
            }
        );
    }

    #[test]
    fn test_selecting_issues_ticket_for_next_level() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP", "UP"]);

        let tickets = selector.set_selection("state", Some("MP")).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].level, "district");
        assert_eq!(tickets[0].parent_value.as_deref(), Some("MP"));
    }

    #[test]
    fn test_changing_parent_clears_all_descendants() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP", "UP"]);
        let t = selector.set_selection("state", Some("MP")).unwrap().remove(0);
        loaded(&mut selector, &t, &["JBP", "IND"]);
        let t = selector.set_selection("district", Some("JBP")).unwrap().remove(0);
        loaded(&mut selector, &t, &["T1"]);
        let t = selector.set_selection("tehsil", Some("T1")).unwrap().remove(0);
        loaded(&mut selector, &t, &["Rural", "Urban"]);
        selector.set_selection("area", Some("Rural")).unwrap();

        selector.set_selection("state", Some("UP")).unwrap();

        assert_eq!(selector.selected("state"), Some("UP"));
        for key in ["district", "tehsil", "area"] {
            let level = selector.level(key).unwrap();
            assert!(level.selected.is_none(), "{} kept a selection", key);
            assert!(level.options.is_empty(), "{} kept options", key);
        }
    }

    #[test]
    fn test_unsetting_clears_descendants_without_ticket() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP"]);
        let t = selector.set_selection("state", Some("MP")).unwrap().remove(0);
        loaded(&mut selector, &t, &["JBP"]);

        let tickets = selector.set_selection("state", Some("")).unwrap();
        assert!(tickets.is_empty());
        assert!(selector.options("district").is_empty());
        assert_eq!(selector.selected("state"), None);
    }

    #[test]
    fn test_reselecting_same_value_is_noop() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP"]);
        let t = selector.set_selection("state", Some("MP")).unwrap().remove(0);
        loaded(&mut selector, &t, &["JBP"]);

        let tickets = selector.set_selection("state", Some("MP")).unwrap();
        assert!(tickets.is_empty());
        assert_eq!(selector.options("district").len(), 1);
    }

    #[test]
    fn test_value_must_be_an_offered_option() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP"]);
        let err = selector.set_selection("state", Some("XX")).unwrap_err();
        assert!(matches!(err, CascadeError::UnknownOption { .. }));
    }

    #[test]
    fn test_child_requires_parent_selection() {
        let mut selector = location();
        let err = selector.set_selection("district", Some("JBP")).unwrap_err();
        assert!(matches!(err, CascadeError::ParentNotSelected { .. }));
        // Unsetting is always allowed.
        assert!(selector.set_selection("district", None).unwrap().is_empty());
    }

    #[test]
    fn test_empty_level_accepts_free_text() {
        let mut selector = location();
        let tickets = selector.set_selection("state", Some("Typed")).unwrap();
        assert_eq!(tickets[0].parent_value.as_deref(), Some("Typed"));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["X", "Y"]);

        let for_x = selector.set_selection("state", Some("X")).unwrap().remove(0);
        let for_y = selector.set_selection("state", Some("Y")).unwrap().remove(0);
        assert!(for_y.generation > for_x.generation);

        loaded(&mut selector, &for_y, &["Y1", "Y2"]);
        let late = selector.apply_options::<String>(&for_x, Ok(opts(&["D1", "D2"])));
        assert_eq!(late, Applied::Stale);

        let ids: Vec<&str> = selector
            .options("district")
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["Y1", "Y2"]);
    }

    #[test]
    fn test_grandchild_fetch_is_stale_after_grandparent_change() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["X", "Y"]);
        let t = selector.set_selection("state", Some("X")).unwrap().remove(0);
        loaded(&mut selector, &t, &["D1"]);
        let tehsil_ticket = selector.set_selection("district", Some("D1")).unwrap().remove(0);

        selector.set_selection("state", Some("Y")).unwrap();
        let applied = selector.apply_options::<String>(&tehsil_ticket, Ok(opts(&["T1"])));
        assert_eq!(applied, Applied::Stale);
        assert!(selector.options("tehsil").is_empty());
    }

    #[test]
    fn test_failed_fetch_leaves_level_empty_but_usable() {
        let mut selector = location();
        let root = selector.mount().remove(0);
        loaded(&mut selector, &root, &["MP"]);
        let t = selector.set_selection("state", Some("MP")).unwrap().remove(0);

        let applied = selector.apply_options(&t, Err("connection refused"));
        assert_eq!(applied, Applied::Failed("connection refused".to_string()));
        let district = selector.level("district").unwrap();
        assert!(district.options.is_empty());
        assert!(!district.pending);

        // Still selectable as free text.
        assert!(selector.set_selection("district", Some("Jabalpur")).is_ok());
    }

    #[test]
    fn test_forest_clears_only_dependents() {
        let mut selector = CascadingSelector::new(vec![
            SelectionLevel::root("state"),
            SelectionLevel::child("district", "state"),
            SelectionLevel::root("court"),
            SelectionLevel::child("forum", "court"),
        ])
        .unwrap();
        selector.set_selection("court", Some("High Court")).unwrap();
        selector.set_selection("forum", Some("Indore Bench")).unwrap();
        selector.set_selection("state", Some("MP")).unwrap();
        assert_eq!(selector.selected("forum"), Some("Indore Bench"));
    }

    #[test]
    fn test_selected_path_in_order() {
        let mut selector = location();
        selector.set_selection("state", Some("MP")).unwrap();
        selector.set_selection("district", Some("JBP")).unwrap();
        assert_eq!(
            selector.selected_path(),
            vec![("state", "MP"), ("district", "JBP")]
        );
    }

    #[test]
    fn test_option_deserializes_name_and_numeric_id() {
        let option: SelectOption =
            serde_json::from_str(r#"{"id": 5, "name": "Madhya Pradesh"}"#).unwrap();
        assert_eq!(option, SelectOption::new("5", "Madhya Pradesh"));
    }
}
