//! Rule renormalization: keeps AND/OR grouping in step with display order
//!
//! Rules joined by `and` form one group and share a `rule_api_name`.
//! The first rule and every rule joined by `or` start a new group.

use std::collections::HashSet;

use crate::ids::{create_api_name, IdKind};
use crate::models::{LogicOperation, Rule};

fn starts_group(index: usize, rule: &Rule) -> bool {
    index == 0 || rule.logic_operation == LogicOperation::Or
}

/// Reassign group ids so they match the current order and join operators
///
/// A group's first rule keeps its id unless that id is empty or already
/// names an earlier group, so re-running on an unchanged list is a no-op.
/// `predicate_api_name` is left alone.
pub fn reassign_group_ids(rules: &[Rule]) -> Vec<Rule> {
    let mut used: HashSet<String> = HashSet::new();
    let mut current_group_id = String::new();

    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            let mut rule = rule.clone();
            if starts_group(index, &rule) {
                if rule.rule_api_name.is_empty() || used.contains(&rule.rule_api_name) {
                    rule.rule_api_name = create_api_name(IdKind::Rule);
                }
                current_group_id = rule.rule_api_name.clone();
                used.insert(current_group_id.clone());
            } else {
                rule.rule_api_name = current_group_id.clone();
            }
            rule
        })
        .collect()
}

/// Split rules into their AND-groups, in order
pub fn group_rules(rules: &[Rule]) -> Vec<Vec<&Rule>> {
    let mut groups: Vec<Vec<&Rule>> = Vec::new();
    for (index, rule) in rules.iter().enumerate() {
        match groups.last_mut() {
            Some(group) if !starts_group(index, rule) => group.push(rule),
            _ => groups.push(vec![rule]),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::empty_rule;
    use crate::models::{FieldType, Operator, RuleValue};

    fn rule(field: &str, logic: LogicOperation) -> Rule {
        Rule {
            field: Some(field.to_string()),
            field_type: Some(FieldType::String),
            logic_operation: logic,
            ..empty_rule()
        }
    }

    #[test]
    fn test_empty_list_is_noop() {
        assert!(reassign_group_ids(&[]).is_empty());
    }

    #[test]
    fn test_single_rule_keeps_its_id() {
        let rules = vec![rule("x", LogicOperation::Or)];
        let result = reassign_group_ids(&rules);
        assert_eq!(result, rules);
    }

    #[test]
    fn test_empty_group_id_is_generated() {
        let mut first = rule("x", LogicOperation::And);
        first.rule_api_name.clear();
        let result = reassign_group_ids(&[first]);
        assert!(result[0].rule_api_name.starts_with("rule-"));
    }

    #[test]
    fn test_or_starts_new_group() {
        let mut first = rule("x", LogicOperation::And);
        first.operator = Some(Operator::Equals);
        first.value = Some(RuleValue::from("1"));
        let mut second = rule("y", LogicOperation::Or);
        second.operator = Some(Operator::Exists);

        let result = reassign_group_ids(&[first, second]);
        assert_ne!(result[0].rule_api_name, result[1].rule_api_name);
    }

    #[test]
    fn test_and_joins_previous_group() {
        let result = reassign_group_ids(&[
            rule("x", LogicOperation::And),
            rule("y", LogicOperation::And),
        ]);
        assert_eq!(result[0].rule_api_name, result[1].rule_api_name);
    }

    #[test]
    fn test_switching_and_to_or_splits_group() {
        let grouped = reassign_group_ids(&[
            rule("x", LogicOperation::And),
            rule("y", LogicOperation::And),
        ]);

        let mut edited = grouped.clone();
        edited[1].logic_operation = LogicOperation::Or;
        let result = reassign_group_ids(&edited);

        assert_eq!(result[0].rule_api_name, grouped[0].rule_api_name);
        assert_ne!(result[1].rule_api_name, result[0].rule_api_name);
    }

    #[test]
    fn test_is_idempotent() {
        let rules = vec![
            rule("a", LogicOperation::And),
            rule("b", LogicOperation::And),
            rule("c", LogicOperation::Or),
            rule("d", LogicOperation::And),
            rule("e", LogicOperation::Or),
        ];
        let once = reassign_group_ids(&rules);
        let twice = reassign_group_ids(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_predicates_are_untouched() {
        let rules = vec![
            rule("a", LogicOperation::And),
            rule("b", LogicOperation::And),
            rule("c", LogicOperation::Or),
        ];
        let result = reassign_group_ids(&rules);
        for (before, after) in rules.iter().zip(&result) {
            assert_eq!(before.predicate_api_name, after.predicate_api_name);
        }
        let unique: HashSet<&str> = result
            .iter()
            .map(|r| r.predicate_api_name.as_str())
            .collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_group_rules() {
        let rules = reassign_group_ids(&[
            rule("a", LogicOperation::Or),
            rule("b", LogicOperation::And),
            rule("c", LogicOperation::Or),
        ]);
        let groups = group_rules(&rules);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].field.as_deref(), Some("c"));
        for group in &groups {
            assert!(group
                .iter()
                .all(|r| r.rule_api_name == group[0].rule_api_name));
        }
    }
}
