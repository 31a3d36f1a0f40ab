//! Labelled form input.

use std::fmt;

use zeroize::Zeroizing;

/// Kind of input, which decides how the value is echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
}

/// A single labelled input holding its current value.
///
/// Values are zeroised on drop; password values never render in clear.
///
/// # Examples
/// ```
/// use client::inbound::components::{FieldKind, FormField};
///
/// let mut field = FormField::new("password", "Password", FieldKind::Password).required();
/// field.set_value("hunter2");
/// assert_eq!(field.value(), "hunter2");
/// assert_eq!(field.to_string(), "Password *: •••••••");
/// ```
#[derive(Clone)]
pub struct FormField {
    id: &'static str,
    label: &'static str,
    kind: FieldKind,
    value: Zeroizing<String>,
    placeholder: Option<String>,
    required: bool,
}

impl FormField {
    /// Empty, optional field.
    pub fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            value: Zeroizing::new(String::new()),
            placeholder: None,
            required: false,
        }
    }

    /// Hint shown while the field is empty.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Field identifier.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Field label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field must be filled in.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Current value as entered.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Replace the current value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Zeroizing::new(value.into());
    }

    /// Empty the field.
    pub fn clear(&mut self) {
        self.value = Zeroizing::new(String::new());
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("FormField");
        debug.field("id", &self.id).field("kind", &self.kind);
        match self.kind {
            FieldKind::Password => debug.field("value", &".."),
            FieldKind::Text | FieldKind::Email => debug.field("value", &self.value.as_str()),
        };
        debug.field("required", &self.required).finish_non_exhaustive()
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.required { " *" } else { "" };
        write!(f, "{}{marker}: ", self.label)?;
        if self.value.is_empty() {
            return match &self.placeholder {
                Some(placeholder) => write!(f, "[{placeholder}]"),
                None => Ok(()),
            };
        }
        match self.kind {
            FieldKind::Password => {
                for _ in self.value.chars() {
                    f.write_str("•")?;
                }
                Ok(())
            }
            FieldKind::Text | FieldKind::Email => f.write_str(self.value.as_str()),
        }
    }
}
