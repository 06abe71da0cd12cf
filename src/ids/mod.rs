//! Identifier generation for template entities
//!
//! Api names are `<prefix>-<uuid>` so the kind of entity stays readable
//! in JSON dumps and in task descriptions that embed them.

/// Kind of entity an api name is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Task,
    Field,
    Selection,
    Condition,
    Rule,
    Predicate,
    Checklist,
    ChecklistItem,
    DueDate,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Task => "task",
            IdKind::Field => "field",
            IdKind::Selection => "selection",
            IdKind::Condition => "condition",
            IdKind::Rule => "rule",
            IdKind::Predicate => "predicate",
            IdKind::Checklist => "checklist",
            IdKind::ChecklistItem => "checklist-item",
            IdKind::DueDate => "due-date",
        }
    }
}

/// Generate a new api name for the given kind
pub fn create_api_name(kind: IdKind) -> String {
    format!("{}-{}", kind.prefix(), uuid::Uuid::new_v4().simple())
}

/// Generate a hyphenated v4 UUID
pub fn create_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Check whether an api name was generated for the given kind
pub fn has_kind(api_name: &str, kind: IdKind) -> bool {
    let Some(suffix) = api_name.strip_prefix(kind.prefix()) else {
        return false;
    };
    let Some(id) = suffix.strip_prefix('-') else {
        return false;
    };
    // "checklist-item-..." must not pass as a checklist
    uuid::Uuid::try_parse(id).is_ok()
}
