//! Add/Edit modal state.

use capdeck_core::{ConfigFormState, FieldKind, ServerDetail};
use serde::Serialize;

use crate::error::GuiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalMode {
    Add,
    Edit,
}

/// One open modal session.
///
/// `ticket` identifies the session; async results carrying an older ticket
/// belong to a modal that has since been closed or replaced.
#[derive(Debug, Clone)]
pub(crate) struct ModalState {
    pub(crate) mode: ModalMode,
    pub(crate) server_id: String,
    pub(crate) display_name: String,
    pub(crate) ticket: u64,
    pub(crate) loading: bool,
    pub(crate) submitting: bool,
    pub(crate) form: ConfigFormState,
    pub(crate) schema_error: Option<String>,
    pub(crate) submit_error: Option<String>,
}

impl ModalState {
    pub(crate) fn loading(mode: ModalMode, server_id: String, display_name: String, ticket: u64) -> Self {
        Self {
            mode,
            server_id,
            display_name,
            ticket,
            loading: true,
            submitting: false,
            form: ConfigFormState::default(),
            schema_error: None,
            submit_error: None,
        }
    }

    /// Install the derived form once the detail lookup has settled.
    pub(crate) fn loaded(&mut self, detail: Option<&ServerDetail>, form: ConfigFormState, schema_error: Option<String>) {
        if let Some(name) = detail.and_then(|d| d.display_name.as_deref()).filter(|n| !n.is_empty()) {
            self.display_name = name.to_string();
        }
        self.form = form;
        self.schema_error = schema_error;
        self.loading = false;
    }

    /// Reject edits while the form is not ready for them.
    pub(crate) fn ensure_editable(&self) -> Result<(), GuiError> {
        if self.loading {
            return Err(GuiError::Conflict(format!(
                "details for {} are still loading",
                self.server_id
            )));
        }
        if self.submitting {
            return Err(GuiError::Conflict(format!(
                "{} is already being submitted",
                self.server_id
            )));
        }
        Ok(())
    }

    pub(crate) fn view(&self) -> ModalView {
        let fields = self
            .form
            .fields()
            .iter()
            .map(|field| FieldView {
                name: field.name.clone(),
                kind: field.kind,
                required: field.required,
                description: field.description.clone(),
                display: self.form.display_value(&field.name).unwrap_or_default(),
                secret_visible: self.form.is_secret_visible(&field.name),
            })
            .collect();

        ModalView {
            mode: self.mode,
            server_id: self.server_id.clone(),
            display_name: self.display_name.clone(),
            loading: self.loading,
            submitting: self.submitting,
            schema_error: self.schema_error.clone(),
            submit_error: self.submit_error.clone(),
            fields,
        }
    }
}

/// Render-ready snapshot of the modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalView {
    pub mode: ModalMode,
    pub server_id: String,
    pub display_name: String,
    pub loading: bool,
    pub submitting: bool,
    /// Set when the detail lookup failed; the form then only carries fields
    /// known from an earlier submission.
    pub schema_error: Option<String>,
    /// Inline error from the last submit attempt.
    pub submit_error: Option<String>,
    pub fields: Vec<FieldView>,
}

impl ModalView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<String>,
    /// Current value as text, masked for hidden secrets.
    pub display: String,
    pub secret_visible: bool,
}
