//! # Location Selection
//!
//! Tracks which location is active and keeps the form's code fields in
//! line with it.
//!
//! ```text
//!            select("")            select("__custom__") / unknown name
//!   ┌──────┐ <──────────── any ────────────────> ┌────────┐
//!   │ None │                                     │ Custom │
//!   └──────┘ ──── select(known name) ──┐         └────────┘
//!                                      v
//!                               ┌─────────────┐
//!                               │ Known(name) │  bon/operator read-only
//!                               └─────────────┘
//! ```
//!
//! `Known` can only be entered with a name present in the registry, so an
//! empty registry leaves just `None` and `Custom` reachable.

use serde::Serialize;

use crate::locations::LocationRegistry;

/// Selector value that requests free-form entry.
pub const CUSTOM_MARKER: &str = "__custom__";

/// Note shown while a shared location is active.
pub const READ_ONLY_NOTE: &str = "Codes are read-only for shared locations.";

/// The active location choice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Selection {
    /// Nothing chosen yet
    #[default]
    None,
    /// A location from the registry
    Known(String),
    /// Free-form entry
    Custom,
}

/// Editable form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormFields {
    pub bon: String,
    pub operator: String,
    pub amount_raw: String,
    pub offset_minutes: i32,
    /// `bon` and `operator` are locked to the registry values
    pub read_only: bool,
}

/// What applying a selection did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FieldEffects {
    /// `bon`/`operator` text or lock state changed
    pub changed: bool,
    /// The UI should move input focus to the `bon` field
    pub focus_bon: bool,
}

/// One entry of the location selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

/// Selection state machine.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Selection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Transition according to a selector value.
    ///
    /// Empty → `None`, the custom marker → `Custom`, a registry name →
    /// `Known`, anything else → `Custom`.
    pub fn select_by_name(&mut self, name: &str, registry: &LocationRegistry) -> &Selection {
        self.current = if name.is_empty() {
            Selection::None
        } else if name == CUSTOM_MARKER {
            Selection::Custom
        } else if registry.find(name).is_some() {
            Selection::Known(name.to_string())
        } else {
            Selection::Custom
        };
        &self.current
    }

    /// Bring the form fields in line with the current selection.
    ///
    /// Re-applying an unchanged `Known` selection reports no change.
    /// Entering `Custom` always asks for focus on the `bon` field.
    pub fn apply_to_fields(
        &self,
        fields: &mut FormFields,
        registry: &LocationRegistry,
    ) -> FieldEffects {
        match &self.current {
            Selection::Known(name) => {
                let Some(location) = registry.find(name) else {
                    // Registry is immutable after load, so this only happens
                    // when a state is applied against a different registry.
                    return unlock(fields, false);
                };
                let changed = fields.bon != location.bon
                    || fields.operator != location.operator
                    || !fields.read_only;
                if changed {
                    fields.bon.clone_from(&location.bon);
                    fields.operator.clone_from(&location.operator);
                    fields.read_only = true;
                }
                FieldEffects {
                    changed,
                    focus_bon: false,
                }
            }
            Selection::Custom => unlock(fields, true),
            Selection::None => unlock(fields, false),
        }
    }

    /// Location note for the current selection.
    pub fn note(&self) -> &'static str {
        match self.current {
            Selection::Known(_) => READ_ONLY_NOTE,
            _ => "",
        }
    }

    /// Selector value representing the current selection.
    pub fn selector_value(&self) -> &str {
        match &self.current {
            Selection::None => "",
            Selection::Known(name) => name,
            Selection::Custom => CUSTOM_MARKER,
        }
    }
}

fn unlock(fields: &mut FormFields, focus_bon: bool) -> FieldEffects {
    let changed = fields.read_only;
    fields.read_only = false;
    FieldEffects { changed, focus_bon }
}

/// Options for the location selector: placeholder, custom, then one per
/// known location.
pub fn selector_options(registry: &LocationRegistry) -> Vec<SelectorOption> {
    let mut options = vec![
        SelectorOption {
            value: String::new(),
            label: "Choose a location".to_string(),
            disabled: true,
        },
        SelectorOption {
            value: CUSTOM_MARKER.to_string(),
            label: "Custom…".to_string(),
            disabled: false,
        },
    ];
    options.extend(registry.all().iter().map(|loc| SelectorOption {
        value: loc.name.clone(),
        label: loc.name.clone(),
        disabled: false,
    }));
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::Location;

    fn registry() -> LocationRegistry {
        LocationRegistry::new(vec![
            Location {
                name: "Main Street".into(),
                bon: "123".into(),
                operator: "456".into(),
                maps: "https://maps.example/main".into(),
            },
            Location {
                name: "Harbour".into(),
                bon: "789".into(),
                operator: "012".into(),
                maps: "https://maps.example/harbour".into(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_select_by_name_transitions() {
        let registry = registry();
        let mut state = SelectionState::new();
        assert_eq!(state.current(), &Selection::None);

        assert_eq!(
            state.select_by_name("Harbour", &registry),
            &Selection::Known("Harbour".into())
        );
        assert_eq!(state.select_by_name(CUSTOM_MARKER, &registry), &Selection::Custom);
        assert_eq!(state.select_by_name("", &registry), &Selection::None);
        assert_eq!(state.select_by_name("Nowhere", &registry), &Selection::Custom);
    }

    #[test]
    fn test_known_unreachable_with_empty_registry() {
        let registry = LocationRegistry::default();
        let mut state = SelectionState::new();
        assert_eq!(state.select_by_name("Harbour", &registry), &Selection::Custom);
    }

    #[test]
    fn test_known_locks_fields() {
        let registry = registry();
        let mut state = SelectionState::new();
        let mut fields = FormFields {
            bon: "typed".into(),
            operator: "typed".into(),
            ..Default::default()
        };

        state.select_by_name("Main Street", &registry);
        let effects = state.apply_to_fields(&mut fields, &registry);

        assert_eq!(fields.bon, "123");
        assert_eq!(fields.operator, "456");
        assert!(fields.read_only);
        assert!(effects.changed);
        assert!(!effects.focus_bon);
        assert_eq!(state.note(), READ_ONLY_NOTE);
    }

    #[test]
    fn test_reselecting_known_is_idempotent() {
        let registry = registry();
        let mut state = SelectionState::new();
        let mut fields = FormFields::default();

        state.select_by_name("Harbour", &registry);
        state.apply_to_fields(&mut fields, &registry);
        let before = fields.clone();

        state.select_by_name("Harbour", &registry);
        let effects = state.apply_to_fields(&mut fields, &registry);

        assert_eq!(fields, before);
        assert_eq!(effects, FieldEffects::default());
    }

    #[test]
    fn test_custom_unlocks_and_keeps_text() {
        let registry = registry();
        let mut state = SelectionState::new();
        let mut fields = FormFields::default();

        state.select_by_name("Harbour", &registry);
        state.apply_to_fields(&mut fields, &registry);

        state.select_by_name(CUSTOM_MARKER, &registry);
        let effects = state.apply_to_fields(&mut fields, &registry);

        assert!(!fields.read_only);
        assert_eq!(fields.bon, "789");
        assert_eq!(fields.operator, "012");
        assert!(effects.changed);
        assert!(effects.focus_bon);
        assert_eq!(state.note(), "");
    }

    #[test]
    fn test_custom_reentry_always_requests_focus() {
        let registry = registry();
        let mut state = SelectionState::new();
        let mut fields = FormFields {
            bon: "999".into(),
            ..Default::default()
        };

        state.select_by_name(CUSTOM_MARKER, &registry);
        state.apply_to_fields(&mut fields, &registry);
        state.select_by_name(CUSTOM_MARKER, &registry);
        let effects = state.apply_to_fields(&mut fields, &registry);

        assert!(effects.focus_bon);
        assert!(!effects.changed);
        assert_eq!(fields.bon, "999");
    }

    #[test]
    fn test_none_unlocks_without_focus() {
        let registry = registry();
        let mut state = SelectionState::new();
        let mut fields = FormFields::default();

        state.select_by_name("Main Street", &registry);
        state.apply_to_fields(&mut fields, &registry);
        state.select_by_name("", &registry);
        let effects = state.apply_to_fields(&mut fields, &registry);

        assert!(!fields.read_only);
        assert!(!effects.focus_bon);
        assert_eq!(fields.bon, "123");
    }

    #[test]
    fn test_selector_options() {
        let options = selector_options(&registry());
        let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["", CUSTOM_MARKER, "Main Street", "Harbour"]);
        assert!(options[0].disabled);

        let degraded = selector_options(&LocationRegistry::default());
        assert_eq!(degraded.len(), 2);
        assert_eq!(degraded[1].value, CUSTOM_MARKER);
    }

    #[test]
    fn test_selector_value() {
        let registry = registry();
        let mut state = SelectionState::new();
        assert_eq!(state.selector_value(), "");
        state.select_by_name("Harbour", &registry);
        assert_eq!(state.selector_value(), "Harbour");
        state.select_by_name("elsewhere", &registry);
        assert_eq!(state.selector_value(), CUSTOM_MARKER);
    }
}
