use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE_MAX_LEN: usize = 100;
pub const DEFAULT_DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Constraints on a single text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_len: usize,
}

impl FieldRule {
    /// Checks a value and returns the trimmed text, `None` when blank.
    pub fn check(&self, value: Option<&str>) -> Result<Option<String>, FieldError> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty());

        match trimmed {
            None if self.required => Err(FieldError::new(
                self.field,
                format!("{} is required", self.label),
            )),
            None => Ok(None),
            Some(v) if v.chars().count() > self.max_len => Err(FieldError::new(
                self.field,
                format!("{} must be at most {} characters", self.label, self.max_len),
            )),
            Some(v) => Ok(Some(v.to_string())),
        }
    }
}

/// Validated title/description pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoInput {
    pub title: String,
    pub description: Option<String>,
}

/// Field constraints for todo input, shared by the form state and the
/// authoritative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoSchema {
    pub title: FieldRule,
    pub description: FieldRule,
}

impl Default for TodoSchema {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_MAX_LEN, DEFAULT_DESCRIPTION_MAX_LEN)
    }
}

impl TodoSchema {
    pub fn new(title_max_len: usize, description_max_len: usize) -> Self {
        Self {
            title: FieldRule {
                field: "title",
                label: "Title",
                required: true,
                max_len: title_max_len,
            },
            description: FieldRule {
                field: "description",
                label: "Description",
                required: false,
                max_len: description_max_len,
            },
        }
    }

    /// Every failing field is reported, in declaration order.
    pub fn validate(&self, title: &str, description: Option<&str>) -> Result<TodoInput, Vec<FieldError>> {
        let title = self.title.check(Some(title));
        let description = self.description.check(description);

        match (title, description) {
            (Ok(Some(title)), Ok(description)) => Ok(TodoInput { title, description }),
            (title, description) => {
                let mut errors = Vec::new();
                match title {
                    Err(e) => errors.push(e),
                    Ok(None) => errors.push(FieldError::new(self.title.field, "Title is required")),
                    Ok(Some(_)) => {}
                }
                if let Err(e) = description {
                    errors.push(e);
                }
                Err(errors)
            }
        }
    }
}
