//! Activation gate for templates
//!
//! A template may only be activated when every task's conditions pass:
//! - every filled rule is complete
//! - number rules hold numeric values
//! - each task has at most one start condition
//!
//! Edits never fail; this is where their result becomes an error.

use crate::models::{Task, Template};
use crate::validation::{are_numeric_values_valid, is_condition_set_valid};

/// Reason a template cannot be activated
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActivationError {
    #[error("Task '{task}' has incomplete conditions: fill in field, operator and value")]
    InvalidConditions { task: String },

    #[error("Task '{task}' compares a number field against a non-numeric value")]
    MalformedNumber { task: String },

    #[error("Task '{task}' has more than one start condition")]
    DuplicateStartCondition { task: String },
}

/// Checks run before a template is activated
pub struct ActivationGate;

impl ActivationGate {
    /// Validate a single task's conditions
    pub fn check_task(task: &Task) -> Result<(), ActivationError> {
        let start_conditions = task.conditions.iter().filter(|c| c.is_start_task()).count();
        if start_conditions > 1 {
            return Err(ActivationError::DuplicateStartCondition {
                task: task.name.clone(),
            });
        }

        if !is_condition_set_valid(&task.conditions) {
            return Err(ActivationError::InvalidConditions {
                task: task.name.clone(),
            });
        }

        if !are_numeric_values_valid(&task.conditions) {
            return Err(ActivationError::MalformedNumber {
                task: task.name.clone(),
            });
        }

        Ok(())
    }

    /// Validate every task, stopping at the first failure
    pub fn check_template(template: &Template) -> Result<(), ActivationError> {
        for task in &template.tasks {
            if let Err(e) = Self::check_task(task) {
                tracing::info!(template = %template.name, error = %e, "template cannot be activated");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Collect every task failure instead of stopping at the first
    pub fn collect_errors(template: &Template) -> Vec<ActivationError> {
        template
            .tasks
            .iter()
            .filter_map(|task| Self::check_task(task).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{empty_condition, empty_rule, start_task_condition};
    use crate::models::{ConditionAction, FieldType, Operator, Rule, RuleValue};

    fn task_with_rule(rule: Rule) -> Task {
        let mut task = Task::new("Review");
        task.conditions.push(start_task_condition(None));
        let mut condition = empty_condition(2, ConditionAction::SkipTask, false);
        condition.rules.push(rule);
        task.conditions.push(condition);
        task
    }

    fn number_rule(value: Option<&str>, operator: Option<Operator>) -> Rule {
        Rule {
            field: Some("field-amount".to_string()),
            field_type: Some(FieldType::Number),
            operator,
            value: value.map(RuleValue::from),
            ..empty_rule()
        }
    }

    #[test]
    fn test_complete_task_passes() {
        let task = task_with_rule(number_rule(Some("100"), Some(Operator::MoreThan)));
        assert!(ActivationGate::check_task(&task).is_ok());
    }

    #[test]
    fn test_incomplete_rule_blocks_activation() {
        let task = task_with_rule(number_rule(Some("100"), None));
        let result = ActivationGate::check_task(&task);
        assert_eq!(
            result,
            Err(ActivationError::InvalidConditions {
                task: "Review".to_string()
            })
        );
        assert!(result.unwrap_err().to_string().contains("incomplete conditions"));
    }

    #[test]
    fn test_non_numeric_value_blocks_activation() {
        let task = task_with_rule(number_rule(Some("lots"), Some(Operator::MoreThan)));
        assert!(matches!(
            ActivationGate::check_task(&task),
            Err(ActivationError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_duplicate_start_condition_blocks_activation() {
        let mut task = Task::new("Review");
        task.conditions.push(start_task_condition(None));
        task.conditions.push(start_task_condition(None));
        assert!(matches!(
            ActivationGate::check_task(&task),
            Err(ActivationError::DuplicateStartCondition { .. })
        ));
    }

    #[test]
    fn test_collect_errors_reports_every_task() {
        let mut template = Template::new("Onboarding");
        template.tasks.push(task_with_rule(number_rule(None, Some(Operator::Equals))));
        template.tasks.push(task_with_rule(number_rule(Some("1"), Some(Operator::Equals))));
        template.tasks.push(task_with_rule(number_rule(Some("x"), Some(Operator::Equals))));

        let errors = ActivationGate::collect_errors(&template);
        assert_eq!(errors.len(), 2);
        assert!(ActivationGate::check_template(&template).is_err());
    }
}
