//! Condition validation used before a template can be activated

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Condition, FieldType, Rule, RuleValue};
use crate::operators::is_operator_allowed;

/// Numeric input: optional sign, digits, optional fraction
pub const NUMERIC_VALUE_PATTERN: &str = r"^-?(\d+(\.\d*)?|\.\d+)$";

static NUMERIC_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMERIC_VALUE_PATTERN).expect("numeric pattern compiles"));

/// Rules that have a field chosen; the rest are ignored by validation
pub fn filled_rules(condition: &Condition) -> impl Iterator<Item = &Rule> {
    condition
        .rules
        .iter()
        .filter(|rule| rule.field_api_name().is_some())
}

/// A rule is complete when field, type and operator are set, and the
/// value too unless the operator compares against nothing
pub fn is_rule_valid(rule: &Rule) -> bool {
    let Some(operator) = rule.operator else {
        return false;
    };
    if rule.field_api_name().is_none() || rule.field_type.is_none() {
        return false;
    }
    !operator.requires_value() || rule.has_value()
}

pub fn is_condition_set_valid(conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .all(|condition| filled_rules(condition).all(is_rule_valid))
}

pub fn is_numeric_value(value: &str) -> bool {
    NUMERIC_VALUE.is_match(value)
}

/// Check number rules hold numeric text
///
/// Rules without a value are left to the structural check.
pub fn are_numeric_values_valid(conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .flat_map(|c| &c.rules)
        .filter(|rule| rule.field_type == Some(FieldType::Number))
        .all(|rule| match &rule.value {
            Some(RuleValue::Text(text)) if !text.is_empty() => is_numeric_value(text),
            Some(RuleValue::List(_)) => false,
            _ => true,
        })
}

/// Non-blocking problems with a condition list
pub fn lint_conditions(conditions: &[Condition]) -> Vec<String> {
    let mut warnings = Vec::new();

    let start_conditions = conditions.iter().filter(|c| c.is_start_task()).count();
    if start_conditions > 1 {
        warnings.push(format!(
            "{} start conditions defined, only one is allowed",
            start_conditions
        ));
    }

    let mut predicates = HashSet::new();
    for condition in conditions {
        for rule in &condition.rules {
            if let (Some(field_type), Some(operator)) = (rule.field_type, rule.operator) {
                if !is_operator_allowed(field_type, operator) {
                    warnings.push(format!(
                        "{}: operator '{}' is not available for {} fields",
                        condition.api_name, operator, field_type
                    ));
                }
            }

            if !predicates.insert(&rule.predicate_api_name) {
                warnings.push(format!(
                    "Duplicate predicate api name: {}",
                    rule.predicate_api_name
                ));
            }
        }
    }

    warnings
}
