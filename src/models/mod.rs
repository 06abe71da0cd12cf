//! Data models for workflow templates and their task conditions
//!
//! These mirror the JSON shape the template editor works with.
//! Server ids are optional: their absence marks an entity that was
//! never persisted.

use serde::{Deserialize, Serialize};

/// Data type of a field, or one of the starting-order pseudo-types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Text,
    Number,
    Date,
    Url,
    Checkbox,
    Radio,
    Dropdown,
    File,
    User,
    /// Pseudo-type: "a specific prior task"
    Task,
    /// Pseudo-type: "the kick-off form"
    Kickoff,
}

impl FieldType {
    pub const ALL: [FieldType; 12] = [
        FieldType::String,
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Url,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Dropdown,
        FieldType::File,
        FieldType::User,
        FieldType::Task,
        FieldType::Kickoff,
    ];

    /// True for the two pseudo-types used only by start-gating rules
    pub fn is_starting_order(&self) -> bool {
        matches!(self, FieldType::Task | FieldType::Kickoff)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Url => "url",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Dropdown => "dropdown",
            FieldType::File => "file",
            FieldType::User => "user",
            FieldType::Task => "task",
            FieldType::Kickoff => "kickoff",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.to_string() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid field type: {}. Use: string, text, number, date, url, checkbox, radio, dropdown, file, user, task, kickoff",
                    s
                )
            })
    }
}

/// Comparison operator of a rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Exists,
    NotExists,
    Contains,
    NotContains,
    MoreThan,
    LessThan,
    Completed,
}

impl Operator {
    /// Operators that compare against nothing
    pub fn requires_value(&self) -> bool {
        !matches!(
            self,
            Operator::Exists | Operator::NotExists | Operator::Completed
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Equals => write!(f, "equals"),
            Operator::NotEquals => write!(f, "not_equals"),
            Operator::Exists => write!(f, "exists"),
            Operator::NotExists => write!(f, "not_exists"),
            Operator::Contains => write!(f, "contains"),
            Operator::NotContains => write!(f, "not_contains"),
            Operator::MoreThan => write!(f, "more_than"),
            Operator::LessThan => write!(f, "less_than"),
            Operator::Completed => write!(f, "completed"),
        }
    }
}

/// How a rule joins the rule before it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogicOperation {
    #[default]
    And,
    Or,
}

impl std::fmt::Display for LogicOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicOperation::And => write!(f, "and"),
            LogicOperation::Or => write!(f, "or"),
        }
    }
}

/// What happens to the task when a condition holds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionAction {
    #[default]
    SkipTask,
    StartTask,
    EndProcess,
}

impl std::fmt::Display for ConditionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionAction::SkipTask => write!(f, "skip_task"),
            ConditionAction::StartTask => write!(f, "start_task"),
            ConditionAction::EndProcess => write!(f, "end_process"),
        }
    }
}

/// Value compared by a rule, typed by the rule's field type
///
/// Text covers plain strings, selection api names, ISO dates and
/// numeric input (numbers are typed as text by the editor).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl RuleValue {
    pub fn is_empty(&self) -> bool {
        match self {
            RuleValue::Number(_) => false,
            RuleValue::Text(text) => text.is_empty(),
            RuleValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

/// One comparison inside a condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Shared by every rule of the same AND-group
    pub rule_api_name: String,
    /// Unique per rule, assigned once
    pub predicate_api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_id: Option<i64>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub value: Option<RuleValue>,
    #[serde(default)]
    pub logic_operation: LogicOperation,
}

impl Rule {
    /// The referenced field api name, treating "" as absent
    pub fn field_api_name(&self) -> Option<&str> {
        self.field.as_deref().filter(|f| !f.is_empty())
    }

    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }
}

/// A named rule group attached to a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub api_name: String,
    /// 1-based position among the task's conditions
    pub order: usize,
    pub action: ConditionAction,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Condition {
    pub fn is_start_task(&self) -> bool {
        self.action == ConditionAction::StartTask
    }
}

/// Choice option of a checkbox, radio or dropdown field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub api_name: String,
    pub value: String,
}

/// A field a rule can reference: a kickoff field or a prior task's output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub api_name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// Entry of the "starts after" section: kick-off or a prior task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartingOrderVariable {
    pub api_name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Form field of a kickoff or a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub api_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

impl Field {
    pub fn to_variable(&self) -> Variable {
        Variable {
            api_name: self.api_name.clone(),
            title: self.name.clone(),
            field_type: self.field_type,
            selections: self.selections.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub api_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub api_name: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

/// What a due date is counted from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueDateRule {
    AfterTaskStarted,
    AfterTaskCompleted,
    AfterWorkflowStarted,
    AfterField,
    BeforeField,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DueDate {
    pub api_name: String,
    /// ISO 8601 duration, e.g. "P1DT2H"
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub duration_months: Option<u32>,
    pub rule: DueDateRule,
    /// Task or field the rule is counted from
    #[serde(default)]
    pub rule_target_api_name: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
}

/// A task of a workflow template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub uuid: String,
    pub api_name: String,
    /// 1-based position in the template
    #[serde(default)]
    pub number: usize,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
}

impl Task {
    /// Create an unsaved task with fresh identifiers
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            uuid: crate::ids::create_uuid(),
            api_name: crate::ids::create_api_name(crate::ids::IdKind::Task),
            number: 0,
            name: name.to_string(),
            description: String::new(),
            fields: Vec::new(),
            conditions: Vec::new(),
            checklists: Vec::new(),
            due_date: None,
        }
    }

    /// Get the start-gating condition, if any
    pub fn start_condition(&self) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.is_start_task())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Kickoff {
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A workflow template: kickoff form plus ordered tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub kickoff: Kickoff,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Template {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            kickoff: Kickoff::default(),
            tasks: Vec::new(),
        }
    }

    /// Get task by api name
    pub fn get_task(&self, api_name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.api_name == api_name)
    }

    /// Get the position of a task by api name
    pub fn task_index(&self, api_name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.api_name == api_name)
    }
}
