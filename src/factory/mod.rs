//! Builders for new rules and conditions

use crate::ids::{create_api_name, IdKind};
use crate::models::{
    Condition, ConditionAction, FieldType, LogicOperation, Operator, Rule, RuleValue,
};

/// A rule with fresh identifiers and nothing selected
pub fn empty_rule() -> Rule {
    Rule {
        rule_api_name: create_api_name(IdKind::Rule),
        predicate_api_name: create_api_name(IdKind::Predicate),
        rule_id: None,
        predicate_id: None,
        field: None,
        field_type: None,
        operator: None,
        value: None,
        logic_operation: LogicOperation::And,
    }
}

/// A new condition holding one empty rule, or none without condition access
pub fn empty_condition(order: usize, action: ConditionAction, access_conditions: bool) -> Condition {
    let rules = if access_conditions {
        vec![empty_rule()]
    } else {
        Vec::new()
    };

    Condition {
        id: None,
        api_name: create_api_name(IdKind::Condition),
        order,
        action,
        rules,
    }
}

/// "Kick-off form completed"
pub fn kickoff_rule() -> Rule {
    Rule {
        field_type: Some(FieldType::Kickoff),
        operator: Some(Operator::Completed),
        ..empty_rule()
    }
}

/// "Task `task_api_name` completed"
pub fn start_task_rule(task_api_name: &str) -> Rule {
    Rule {
        field_type: Some(FieldType::Task),
        operator: Some(Operator::Completed),
        value: Some(RuleValue::Text(task_api_name.to_string())),
        ..empty_rule()
    }
}

/// Default start gate of a new task
///
/// The first task starts after kick-off; any later task starts after
/// the task right before it.
pub fn start_task_condition(previous_task_api_name: Option<&str>) -> Condition {
    let rule = match previous_task_api_name {
        Some(api_name) => start_task_rule(api_name),
        None => kickoff_rule(),
    };

    Condition {
        rules: vec![rule],
        ..empty_condition(1, ConditionAction::StartTask, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_condition_with_access_has_one_rule() {
        let condition = empty_condition(2, ConditionAction::SkipTask, true);
        assert_eq!(condition.order, 2);
        assert_eq!(condition.rules.len(), 1);
        assert!(condition.rules[0].field.is_none());
        assert!(condition.rules[0].operator.is_none());
    }

    #[test]
    fn test_empty_condition_without_access_has_no_rules() {
        let condition = empty_condition(1, ConditionAction::SkipTask, false);
        assert!(condition.rules.is_empty());
    }

    #[test]
    fn test_empty_rules_get_distinct_names() {
        let a = empty_rule();
        let b = empty_rule();
        assert_ne!(a.rule_api_name, b.rule_api_name);
        assert_ne!(a.predicate_api_name, b.predicate_api_name);
    }

    #[test]
    fn test_start_condition_for_first_task_waits_for_kickoff() {
        let condition = start_task_condition(None);
        assert!(condition.is_start_task());
        assert_eq!(condition.rules.len(), 1);
        assert_eq!(condition.rules[0].field_type, Some(FieldType::Kickoff));
        assert!(condition.rules[0].value.is_none());
    }

    #[test]
    fn test_start_condition_waits_for_previous_task() {
        let condition = start_task_condition(Some("task-a"));
        let rule = &condition.rules[0];
        assert_eq!(rule.field_type, Some(FieldType::Task));
        assert_eq!(rule.operator, Some(Operator::Completed));
        assert_eq!(rule.value, Some(RuleValue::Text("task-a".to_string())));
        assert!(rule.field.is_none());
    }
}
