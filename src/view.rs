//! Client-side view state.
//!
//! Everything here is pure: a view dispatches the request returned by a
//! `begin_*`/`submit` call, then feeds the resulting [`ActionResult`] back
//! in. Local state only bridges the gap until the server answers.

use uuid::Uuid;

use crate::routes::todos::schema::{FieldError, TodoSchema};
use crate::routes::todos::{ActionResult, CreateTodoRequest, Todo, TodoStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn from_result(result: &ActionResult, fallback: &str) -> Self {
        if result.success {
            Notification {
                kind: NotificationKind::Success,
                message: result.message.clone(),
            }
        } else {
            let message = if result.message.is_empty() {
                fallback.to_string()
            } else {
                result.message.clone()
            };
            Notification {
                kind: NotificationKind::Error,
                message,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Toggle { previous: bool, target: bool },
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPhase {
    Idle,
    Pending(PendingAction),
    Confirmed,
    RolledBack,
}

/// Handle for an in-flight action; results for an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct TodoItemView {
    todo: Todo,
    checked: bool,
    phase: ItemPhase,
    ticket: u64,
    removed: bool,
}

impl TodoItemView {
    pub fn new(todo: Todo) -> Self {
        Self {
            checked: todo.completed,
            todo,
            phase: ItemPhase::Idle,
            ticket: 0,
            removed: false,
        }
    }

    pub fn todo(&self) -> &Todo {
        &self.todo
    }

    /// Checkbox value as currently displayed.
    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    /// Controls are disabled while an action is in flight.
    pub fn is_disabled(&self) -> bool {
        matches!(self.phase, ItemPhase::Pending(_))
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    fn begin(&mut self, action: PendingAction) -> Option<Ticket> {
        if self.is_disabled() || self.removed {
            return None;
        }
        self.ticket += 1;
        self.phase = ItemPhase::Pending(action);
        Some(Ticket(self.ticket))
    }

    /// Shows `target` immediately; `None` while another action is pending.
    pub fn begin_toggle(&mut self, target: bool) -> Option<Ticket> {
        let previous = self.checked;
        let ticket = self.begin(PendingAction::Toggle { previous, target })?;
        self.checked = target;
        Some(ticket)
    }

    pub fn begin_delete(&mut self) -> Option<Ticket> {
        self.begin(PendingAction::Delete)
    }

    /// Applies the server's answer. Returns the notification to show, or
    /// `None` when the ticket is stale.
    pub fn resolve(&mut self, ticket: Ticket, result: &ActionResult) -> Option<Notification> {
        let action = match self.phase {
            ItemPhase::Pending(action) if ticket.0 == self.ticket => action,
            _ => return None,
        };

        match (action, result.success) {
            (PendingAction::Toggle { target, .. }, true) => {
                if let Some(todo) = &result.todo {
                    self.todo = todo.clone();
                } else {
                    self.todo.completed = target;
                }
                self.checked = self.todo.completed;
                self.phase = ItemPhase::Confirmed;
            }
            (PendingAction::Toggle { previous, .. }, false) => {
                self.checked = previous;
                self.phase = ItemPhase::RolledBack;
            }
            (PendingAction::Delete, true) => {
                self.removed = true;
                self.phase = ItemPhase::Confirmed;
            }
            (PendingAction::Delete, false) => {
                self.phase = ItemPhase::RolledBack;
            }
        }

        let fallback = match action {
            PendingAction::Toggle { .. } => "Failed to update todo",
            PendingAction::Delete => "Failed to delete todo",
        };
        Some(Notification::from_result(result, fallback))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    SignInRequired,
    Empty,
    Items {
        items: Vec<TodoItemView>,
        stats: TodoStats,
    },
}

impl ListView {
    pub fn build(session: Option<Uuid>, todos: Vec<Todo>) -> Self {
        if session.is_none() {
            return ListView::SignInRequired;
        }
        if todos.is_empty() {
            return ListView::Empty;
        }
        let stats = TodoStats::from_todos(&todos);
        ListView::Items {
            items: todos.into_iter().map(TodoItemView::new).collect(),
            stats,
        }
    }

    /// Resolves the action on the item with `id`, then refreshes the list.
    pub fn resolve(&mut self, id: Uuid, ticket: Ticket, result: &ActionResult) -> Option<Notification> {
        let note = match self {
            ListView::Items { items, .. } => items
                .iter_mut()
                .find(|item| item.todo().id == id)?
                .resolve(ticket, result),
            _ => None,
        };
        if note.is_some() {
            self.refresh();
        }
        note
    }

    /// Drops items whose delete was confirmed and recomputes the stats
    /// from the remaining items. Call after any item action resolves.
    pub fn refresh(&mut self) {
        if let ListView::Items { items, stats } = self {
            items.retain(|item| !item.is_removed());
            if items.is_empty() {
                *self = ListView::Empty;
                return;
            }
            let todos: Vec<Todo> = items.iter().map(|item| item.todo().clone()).collect();
            *stats = TodoStats::from_todos(&todos);
        }
    }
}

/// Create form state. Input survives a failed submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub description: String,
    pub errors: Vec<FieldError>,
    pending: bool,
}

impl CreateForm {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Validates locally and returns the request to dispatch.
    pub fn submit(&mut self, schema: &TodoSchema) -> Option<CreateTodoRequest> {
        if self.pending {
            return None;
        }
        match schema.validate(&self.title, Some(&self.description)) {
            Ok(input) => {
                self.errors.clear();
                self.pending = true;
                Some(CreateTodoRequest {
                    title: input.title,
                    description: input.description,
                })
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn resolve(&mut self, result: &ActionResult) -> Notification {
        self.pending = false;
        if result.success {
            *self = CreateForm::default();
        } else {
            self.errors = result.errors.clone();
        }
        Notification::from_result(result, "Failed to create todo")
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn is_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_prefers_dark,
        }
    }

    /// Switches to the explicit opposite of what is currently shown.
    pub fn toggle(self, system_prefers_dark: bool) -> Theme {
        if self.is_dark(system_prefers_dark) {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}
