//! Operator catalog: which comparisons a field type allows, and their labels

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::models::{ConditionAction, FieldType, Operator};

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Exists,
    Operator::NotExists,
    Operator::Contains,
    Operator::NotContains,
];

const ORDERED_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Exists,
    Operator::NotExists,
    Operator::MoreThan,
    Operator::LessThan,
];

const CHOICE_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Exists,
    Operator::NotExists,
];

const PRESENCE_OPERATORS: &[Operator] = &[Operator::Exists, Operator::NotExists];

const STARTING_ORDER_OPERATORS: &[Operator] = &[Operator::Completed];

/// Legal operators for a field type, in dropdown order
pub fn operators_for(field_type: FieldType) -> &'static [Operator] {
    match field_type {
        FieldType::String | FieldType::Text | FieldType::Url => TEXT_OPERATORS,
        FieldType::Number | FieldType::Date => ORDERED_OPERATORS,
        FieldType::Checkbox | FieldType::Radio | FieldType::Dropdown | FieldType::User => {
            CHOICE_OPERATORS
        }
        FieldType::File => PRESENCE_OPERATORS,
        FieldType::Task | FieldType::Kickoff => STARTING_ORDER_OPERATORS,
    }
}

pub fn is_operator_allowed(field_type: FieldType, operator: Operator) -> bool {
    operators_for(field_type).contains(&operator)
}

/// Message lookup used for labels
///
/// A missing id is not an error; the label is simply absent.
pub trait MessageCatalog {
    fn format_message(&self, id: &str) -> Option<String>;
}

/// Dictionary-backed message catalog
#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Messages {
    /// Built-in English labels
    pub fn english() -> Self {
        let entries = [
            ("conditions.operator.equals", "is equal to"),
            ("conditions.operator.not_equals", "is not equal to"),
            ("conditions.operator.exists", "is filled"),
            ("conditions.operator.not_exists", "is empty"),
            ("conditions.operator.contains", "contains"),
            ("conditions.operator.not_contains", "does not contain"),
            ("conditions.operator.more_than", "is more than"),
            ("conditions.operator.less_than", "is less than"),
            ("conditions.operator.completed", "is completed"),
            ("conditions.operator.date.more_than", "is after"),
            ("conditions.operator.date.less_than", "is before"),
            ("conditions.action.skip_task", "Skip task"),
            ("conditions.action.start_task", "Start task"),
            ("conditions.action.end_process", "End workflow"),
        ]
        .into_iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect();

        Self { entries }
    }

    /// Load a TOML dictionary of `"message.id" = "text"` pairs
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read messages from {}", path.display()))?;
        let entries: HashMap<String, String> = toml::from_str(&content)
            .with_context(|| format!("Failed to parse messages in {}", path.display()))?;
        Ok(Self { entries })
    }

    /// Overlay another dictionary on top of this one
    pub fn merged_with(mut self, overrides: Messages) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MessageCatalog for Messages {
    fn format_message(&self, id: &str) -> Option<String> {
        self.entries.get(id).cloned()
    }
}

/// An operator as shown in the dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorOption {
    pub operator: Operator,
    pub label: Option<String>,
}

fn operator_message_id(field_type: FieldType, operator: Operator) -> String {
    match (field_type, operator) {
        (FieldType::Date, Operator::MoreThan | Operator::LessThan) => {
            format!("conditions.operator.date.{}", operator)
        }
        _ => format!("conditions.operator.{}", operator),
    }
}

/// Operators for a field type with their labels resolved
pub fn get_operators(field_type: FieldType, messages: &dyn MessageCatalog) -> Vec<OperatorOption> {
    operators_for(field_type)
        .iter()
        .map(|&operator| {
            let label = messages.format_message(&operator_message_id(field_type, operator));
            if label.is_none() {
                tracing::trace!(%field_type, %operator, "no label for operator");
            }
            OperatorOption { operator, label }
        })
        .collect()
}

/// Label for a condition action
pub fn action_label(action: ConditionAction, messages: &dyn MessageCatalog) -> Option<String> {
    messages.format_message(&format!("conditions.action.{}", action))
}
