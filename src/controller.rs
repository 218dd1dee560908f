//! # Form Controller
//!
//! The single owner of all mutable application state: the selection, the
//! form fields, the last generated payload, the render queue and the copy
//! button. Created once at startup and shared by reference with whatever
//! drives it (HTTP handlers, the CLI).
//!
//! ## Event Flow
//!
//! ```text
//! select_location ──> SelectionState ──> FormFields
//! submit ──> payload::encode ──> result text ──> RenderSerializer ──> QrDisplay
//! copy ──> ClipboardFeedback (reads the result text only)
//! ```

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clipboard::{ClipboardFeedback, ClipboardService, CopyOutcome};
use crate::locations::{Location, LocationRegistry, LocationSource};
use crate::payload;
use crate::render::{QrDisplay, QrOptions, QrRenderer, RenderSerializer};
use crate::selection::{
    CUSTOM_MARKER, FieldEffects, FormFields, Selection, SelectionState, SelectorOption,
    selector_options,
};

/// Note shown when the location source could not be loaded.
pub const LOAD_FAILED_NOTE: &str = "Could not load predefined locations. Enter details manually.";

/// Shown in place of location cards when none are known.
pub const NO_LOCATIONS_MESSAGE: &str =
    "No shared locations yet. Add yours by editing locations.json.";

/// Raw form submission, as typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub bon: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub offset: String,
}

/// Last generated payload and when it was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPayload {
    pub payload: String,
    /// Wall-clock time of the submission (the offset is not applied)
    pub generated_at: String,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub result: GeneratedPayload,
    /// Display after this submission's render; hidden if it failed
    pub display: QrDisplay,
}

/// Form state after a selection change.
#[derive(Debug, Clone, Serialize)]
pub struct FieldsView {
    pub selection: Selection,
    pub selector_value: String,
    pub fields: FormFields,
    pub effects: FieldEffects,
    pub note: &'static str,
}

/// Location cards for browsing.
#[derive(Debug, Clone, Serialize)]
pub struct Cards {
    pub locations: Vec<Location>,
    /// Set when there is nothing to list
    pub empty_message: Option<&'static str>,
}

/// Everything the UI renders.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub options: Vec<SelectorOption>,
    pub selection: Selection,
    pub selector_value: String,
    pub fields: FormFields,
    pub note: &'static str,
    pub result: Option<GeneratedPayload>,
    pub display: QrDisplay,
    pub copy_label: &'static str,
    pub cards: Cards,
}

#[derive(Debug, Default)]
struct FormState {
    selection: SelectionState,
    fields: FormFields,
}

/// Application state owner.
pub struct Controller {
    registry: LocationRegistry,
    load_failed: bool,
    form: RwLock<FormState>,
    result: RwLock<Option<GeneratedPayload>>,
    serializer: RenderSerializer,
    clipboard: ClipboardFeedback,
}

impl Controller {
    /// Load locations from `source` (degrading to custom-only mode on
    /// failure) and build the controller.
    pub async fn start(
        source: &LocationSource,
        renderer: Arc<dyn QrRenderer>,
        options: QrOptions,
        clipboard: Arc<dyn ClipboardService>,
    ) -> Self {
        let (registry, load_error) = LocationRegistry::load_or_empty(source).await;
        Self::new(
            registry,
            load_error.is_some(),
            RenderSerializer::new(renderer, options),
            ClipboardFeedback::new(clipboard),
        )
    }

    /// Build from parts. The first known location is selected, or custom
    /// entry when there is none.
    pub fn new(
        registry: LocationRegistry,
        load_failed: bool,
        serializer: RenderSerializer,
        clipboard: ClipboardFeedback,
    ) -> Self {
        let mut form = FormState::default();
        let initial = registry
            .first()
            .map_or(CUSTOM_MARKER, |loc| loc.name.as_str());
        form.selection.select_by_name(initial, &registry);
        form.selection.apply_to_fields(&mut form.fields, &registry);

        Self {
            registry,
            load_failed,
            form: RwLock::new(form),
            result: RwLock::new(None),
            serializer,
            clipboard,
        }
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    /// Whether startup fell back to custom-only mode.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Handle a location selector change.
    pub async fn select_location(&self, name: &str) -> FieldsView {
        let mut form = self.form.write().await;
        let FormState { selection, fields } = &mut *form;

        selection.select_by_name(name, &self.registry);
        let effects = selection.apply_to_fields(fields, &self.registry);
        tracing::debug!(selection = ?selection.current(), changed = effects.changed, "location selected");

        FieldsView {
            selection: selection.current().clone(),
            selector_value: selection.selector_value().to_string(),
            fields: fields.clone(),
            effects,
            note: self.note_for(selection),
        }
    }

    /// Handle a form submission at the current local time.
    pub async fn submit(&self, form: SubmitForm) -> Option<Submission> {
        self.submit_at(form, &Local::now()).await
    }

    /// Handle a form submission as of `now`.
    ///
    /// Returns `None` without side effects on the result panel when the
    /// trimmed `bon` or `operator` is empty. While a known location is
    /// active its registry codes are used regardless of what was submitted.
    pub async fn submit_at<Tz>(&self, submitted: SubmitForm, now: &DateTime<Tz>) -> Option<Submission>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let (result, pending) = {
            let mut form = self.form.write().await;
            let fields = &mut form.fields;
            if !fields.read_only {
                fields.bon = submitted.bon;
                fields.operator = submitted.operator;
            }
            fields.amount_raw = submitted.amount;
            fields.offset_minutes = payload::parse_offset(&submitted.offset);

            let bon = fields.bon.trim();
            let operator = fields.operator.trim();
            if bon.is_empty() || operator.is_empty() {
                tracing::debug!("submission ignored: missing BON or operator");
                return None;
            }

            let result = GeneratedPayload {
                payload: payload::encode(
                    bon,
                    operator,
                    now,
                    fields.offset_minutes,
                    &fields.amount_raw,
                ),
                generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            };

            // Result text and queue position are updated under the same
            // lock so they always agree across concurrent submissions.
            *self.result.write().await = Some(result.clone());
            let pending = self.serializer.enqueue(result.payload.clone());
            (result, pending)
        };

        tracing::info!(payload = %result.payload, "generated payload");

        let display = match pending {
            Ok(pending) => pending.finish().await.unwrap_or_else(|_| self.serializer.display()),
            Err(e) => {
                tracing::error!(error = %e, "unable to queue QR render");
                self.serializer.display()
            }
        };

        Some(Submission { result, display })
    }

    /// Copy the last generated payload.
    pub async fn copy(&self) -> CopyOutcome {
        let text = self
            .result
            .read()
            .await
            .as_ref()
            .map(|r| r.payload.clone())
            .unwrap_or_default();
        self.clipboard.copy(&text).await
    }

    pub async fn copy_label(&self) -> &'static str {
        self.clipboard.label().await
    }

    /// Current QR display.
    pub fn display(&self) -> QrDisplay {
        self.serializer.display()
    }

    pub async fn result(&self) -> Option<GeneratedPayload> {
        self.result.read().await.clone()
    }

    /// Location cards, with the empty-state message when there are none.
    pub fn cards(&self) -> Cards {
        Cards {
            locations: self.registry.all().to_vec(),
            empty_message: self.registry.is_empty().then_some(NO_LOCATIONS_MESSAGE),
        }
    }

    /// Snapshot of everything the UI shows.
    pub async fn view(&self) -> ViewState {
        let (selection, selector_value, fields, note) = {
            let form = self.form.read().await;
            (
                form.selection.current().clone(),
                form.selection.selector_value().to_string(),
                form.fields.clone(),
                self.note_for(&form.selection),
            )
        };

        ViewState {
            options: selector_options(&self.registry),
            selection,
            selector_value,
            fields,
            note,
            result: self.result().await,
            display: self.display(),
            copy_label: self.copy_label().await,
            cards: self.cards(),
        }
    }

    fn note_for(&self, selection: &SelectionState) -> &'static str {
        match selection.current() {
            Selection::Known(_) => selection.note(),
            _ if self.load_failed => LOAD_FAILED_NOTE,
            _ => selection.note(),
        }
    }
}
