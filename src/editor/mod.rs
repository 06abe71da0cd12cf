//! Condition list editing
//!
//! Every operation takes the current list and returns a replacement; the
//! input is never modified. Rule-level edits are followed by a
//! renormalization of the touched condition so AND/OR groups stay
//! consistent with display order.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::factory::{empty_condition, empty_rule};
use crate::models::{
    Condition, ConditionAction, FieldType, LogicOperation, Operator, RuleValue,
    StartingOrderVariable, Variable,
};
use crate::renormalize::reassign_group_ids;

/// First `order` value handed out when conditions are renumbered
pub const DEFAULT_ORDER_BASE: usize = 1;

/// A single user edit to one rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEdit {
    /// Pick another field; clears operator and value
    Field {
        field: Option<String>,
        field_type: Option<FieldType>,
    },
    Operator(Operator),
    Value(Option<RuleValue>),
    LogicOperation(LogicOperation),
}

fn has_start_condition(list: &[Condition]) -> bool {
    list.iter().any(Condition::is_start_task)
}

/// Drop conditions left without rules, then renumber
///
/// Start conditions are kept even when empty.
fn drop_empty_and_renumber(list: Vec<Condition>, order_base: usize) -> Vec<Condition> {
    list.into_iter()
        .filter(|condition| {
            if condition.rules.is_empty() && !condition.is_start_task() {
                debug!(condition = %condition.api_name, "dropping condition left without rules");
                return false;
            }
            true
        })
        .enumerate()
        .map(|(index, mut condition)| {
            condition.order = order_base + index;
            condition
        })
        .collect()
}

/// Append a new condition
///
/// Without condition access the new condition carries no rules. A task
/// keeps at most one start condition, so a second one is refused.
pub fn add_empty_condition(
    list: &[Condition],
    order: usize,
    is_start_task: bool,
    access_conditions: bool,
) -> Vec<Condition> {
    if is_start_task && has_start_condition(list) {
        warn!("task already has a start condition, not adding another");
        return list.to_vec();
    }

    let action = if is_start_task {
        ConditionAction::StartTask
    } else {
        ConditionAction::SkipTask
    };

    let mut next = list.to_vec();
    next.push(empty_condition(order, action, access_conditions));
    debug!(order, %action, access_conditions, "added condition");
    next
}

/// Append an empty rule to a condition
///
/// An empty list is bootstrapped with a single condition holding one rule.
pub fn add_rule_to_condition(
    list: &[Condition],
    condition_api_name: &str,
    access_conditions: bool,
) -> Vec<Condition> {
    if list.is_empty() {
        debug!("bootstrapping condition list");
        let mut condition = empty_condition(DEFAULT_ORDER_BASE, ConditionAction::SkipTask, access_conditions);
        if condition.rules.is_empty() {
            condition.rules.push(empty_rule());
        }
        return vec![condition];
    }

    list.iter()
        .map(|condition| {
            if condition.api_name != condition_api_name {
                return condition.clone();
            }
            let mut rules = condition.rules.clone();
            rules.push(empty_rule());
            Condition {
                rules: reassign_group_ids(&rules),
                ..condition.clone()
            }
        })
        .collect()
}

/// Apply an edit to one rule of a condition
pub fn update_rule(
    list: &[Condition],
    condition_api_name: &str,
    rule_index: usize,
    edit: RuleEdit,
) -> Vec<Condition> {
    list.iter()
        .map(|condition| {
            if condition.api_name != condition_api_name {
                return condition.clone();
            }
            let mut rules = condition.rules.clone();
            let Some(rule) = rules.get_mut(rule_index) else {
                warn!(condition = %condition_api_name, rule_index, "no rule to update");
                return condition.clone();
            };

            match &edit {
                RuleEdit::Field { field, field_type } => {
                    rule.field = field.clone();
                    rule.field_type = *field_type;
                    rule.operator = None;
                    rule.value = None;
                }
                RuleEdit::Operator(operator) => {
                    rule.operator = Some(*operator);
                    if !operator.requires_value() {
                        rule.value = None;
                    }
                }
                RuleEdit::Value(value) => rule.value = value.clone(),
                RuleEdit::LogicOperation(logic) => rule.logic_operation = *logic,
            }

            Condition {
                rules: reassign_group_ids(&rules),
                ..condition.clone()
            }
        })
        .collect()
}

/// Remove the rule at `rule_index` from a condition
///
/// A condition left without rules is removed unless it is the start
/// condition; remaining conditions are renumbered from `order_base`.
pub fn remove_rule(
    list: &[Condition],
    condition_api_name: &str,
    rule_index: usize,
    order_base: usize,
) -> Vec<Condition> {
    let edited: Vec<Condition> = list
        .iter()
        .map(|condition| {
            if condition.api_name != condition_api_name || rule_index >= condition.rules.len() {
                return condition.clone();
            }
            let mut rules = condition.rules.clone();
            rules.remove(rule_index);
            Condition {
                rules: reassign_group_ids(&rules),
                ..condition.clone()
            }
        })
        .collect();

    drop_empty_and_renumber(edited, order_base)
}

/// Remove a whole condition and renumber the rest
pub fn remove_condition(
    list: &[Condition],
    condition_api_name: &str,
    order_base: usize,
) -> Vec<Condition> {
    list.iter()
        .filter(|c| c.api_name != condition_api_name)
        .enumerate()
        .map(|(index, condition)| Condition {
            order: order_base + index,
            ..condition.clone()
        })
        .collect()
}

/// Change what a condition does
pub fn set_condition_action(
    list: &[Condition],
    condition_api_name: &str,
    action: ConditionAction,
) -> Vec<Condition> {
    let other_start = list
        .iter()
        .any(|c| c.is_start_task() && c.api_name != condition_api_name);
    if action == ConditionAction::StartTask && other_start {
        warn!(condition = %condition_api_name, "task already has a start condition");
        return list.to_vec();
    }

    list.iter()
        .map(|condition| {
            if condition.api_name == condition_api_name {
                Condition {
                    action,
                    ..condition.clone()
                }
            } else {
                condition.clone()
            }
        })
        .collect()
}

/// Remove every rule whose field has been deleted
pub fn prune_deleted_field_references(
    list: &[Condition],
    deleted_field_api_names: &HashSet<String>,
    order_base: usize,
) -> Vec<Condition> {
    if deleted_field_api_names.is_empty() {
        return list.to_vec();
    }

    let pruned: Vec<Condition> = list
        .iter()
        .map(|condition| {
            let rules: Vec<_> = condition
                .rules
                .iter()
                .filter(|rule| {
                    rule.field_api_name()
                        .map_or(true, |field| !deleted_field_api_names.contains(field))
                })
                .cloned()
                .collect();
            if rules.len() != condition.rules.len() {
                debug!(
                    condition = %condition.api_name,
                    removed = condition.rules.len() - rules.len(),
                    "pruned rules referencing deleted fields"
                );
            }
            Condition {
                rules: reassign_group_ids(&rules),
                ..condition.clone()
            }
        })
        .collect();

    drop_empty_and_renumber(pruned, order_base)
}

/// Remove rules that point at tasks no longer in the starting order
///
/// Task rules reference their task through the value; a task rule with
/// no value yet is left for validation to report. Kick-off rules go when
/// the kick-off entry is missing.
pub fn prune_deleted_task_references(
    starting_order: &[StartingOrderVariable],
    list: &[Condition],
    order_base: usize,
) -> Vec<Condition> {
    let task_api_names: HashSet<&str> = starting_order
        .iter()
        .filter(|v| v.field_type == FieldType::Task)
        .map(|v| v.api_name.as_str())
        .collect();
    let has_kickoff = starting_order
        .iter()
        .any(|v| v.field_type == FieldType::Kickoff);

    let pruned: Vec<Condition> = list
        .iter()
        .map(|condition| {
            let rules: Vec<_> = condition
                .rules
                .iter()
                .filter(|rule| match rule.field_type {
                    Some(FieldType::Task) => match rule.value.as_ref().and_then(RuleValue::as_text) {
                        Some(task) if !task.is_empty() => task_api_names.contains(task),
                        _ => true,
                    },
                    Some(FieldType::Kickoff) => has_kickoff,
                    _ => true,
                })
                .cloned()
                .collect();
            if rules.len() != condition.rules.len() {
                debug!(condition = %condition.api_name, "pruned rules referencing removed tasks");
            }
            Condition {
                rules: reassign_group_ids(&rules),
                ..condition.clone()
            }
        })
        .collect();

    drop_empty_and_renumber(pruned, order_base)
}

/// Field api names present in `previous` but gone from `current`
pub fn deleted_field_api_names(previous: &[Variable], current: &[Variable]) -> HashSet<String> {
    let current: HashSet<&str> = current.iter().map(|v| v.api_name.as_str()).collect();
    previous
        .iter()
        .filter(|v| !current.contains(v.api_name.as_str()))
        .map(|v| v.api_name.clone())
        .collect()
}

/// Field api names referenced by rules but not offered by `variables`
pub fn unknown_field_references(list: &[Condition], variables: &[Variable]) -> HashSet<String> {
    let known: HashSet<&str> = variables.iter().map(|v| v.api_name.as_str()).collect();
    list.iter()
        .flat_map(|c| &c.rules)
        .filter_map(|r| r.field_api_name())
        .filter(|field| !known.contains(field))
        .map(str::to_string)
        .collect()
}
