//! Task duplication
//!
//! A clone is a deep copy where every api name is regenerated and every
//! server id dropped, so the backend treats the whole copy as new.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::ids::{create_api_name, create_uuid, IdKind};
use crate::models::{Checklist, ChecklistItem, Condition, DueDate, Field, Rule, Selection, Task};

const CLONE_SUFFIX: &str = " (Clone)";

/// Old api name -> new api name, filled lazily
#[derive(Debug, Default)]
struct Renames {
    names: HashMap<String, String>,
}

impl Renames {
    fn rename(&mut self, old: &str, kind: IdKind) -> String {
        self.names
            .entry(old.to_string())
            .or_insert_with(|| create_api_name(kind))
            .clone()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.names.iter()
    }
}

fn clone_field(field: &Field) -> Field {
    Field {
        id: None,
        api_name: create_api_name(IdKind::Field),
        selections: field
            .selections
            .iter()
            .map(|selection| Selection {
                id: None,
                api_name: create_api_name(IdKind::Selection),
                value: selection.value.clone(),
            })
            .collect(),
        ..field.clone()
    }
}

fn clone_rule(rule: &Rule, groups: &mut Renames) -> Rule {
    Rule {
        rule_api_name: groups.rename(&rule.rule_api_name, IdKind::Rule),
        predicate_api_name: create_api_name(IdKind::Predicate),
        rule_id: None,
        predicate_id: None,
        ..rule.clone()
    }
}

fn clone_condition(condition: &Condition, groups: &mut Renames) -> Condition {
    Condition {
        id: None,
        api_name: create_api_name(IdKind::Condition),
        order: condition.order,
        action: condition.action,
        rules: condition
            .rules
            .iter()
            .map(|rule| clone_rule(rule, groups))
            .collect(),
    }
}

fn clone_checklist(
    checklist: &Checklist,
    checklists: &mut Renames,
    items: &mut Renames,
) -> Checklist {
    Checklist {
        id: None,
        api_name: checklists.rename(&checklist.api_name, IdKind::Checklist),
        items: checklist
            .items
            .iter()
            .map(|item| ChecklistItem {
                id: None,
                api_name: items.rename(&item.api_name, IdKind::ChecklistItem),
                value: item.value.clone(),
            })
            .collect(),
    }
}

/// New api name only; the rule target still names the source template's task
fn clone_due_date(due_date: &DueDate) -> DueDate {
    DueDate {
        api_name: create_api_name(IdKind::DueDate),
        ..due_date.clone()
    }
}

/// Replace embedded checklist references in a rich-text description
///
/// The source text is scanned once, so a replacement is never matched
/// again. At each position the longest old name wins.
fn rewrite_description(description: &str, renames: &[&Renames]) -> String {
    let dictionary: HashMap<&str, &str> = renames
        .iter()
        .flat_map(|r| r.iter())
        .filter(|(old, _)| !old.is_empty())
        .map(|(old, new)| (old.as_str(), new.as_str()))
        .collect();
    if dictionary.is_empty() {
        return description.to_string();
    }

    let mut names: Vec<&str> = dictionary.keys().copied().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "description left unchanged");
            return description.to_string();
        }
    };

    re.replace_all(description, |caps: &Captures| {
        let old = &caps[0];
        dictionary.get(old).copied().unwrap_or(old).to_string()
    })
    .into_owned()
}

/// Deep-copy a task under fresh identifiers
///
/// Rules that shared a group id in the source share one new group id in
/// the clone. Predicates are always fresh.
pub fn clone_task(task: &Task) -> Task {
    let mut groups = Renames::default();
    let mut checklists = Renames::default();
    let mut items = Renames::default();

    let cloned_checklists: Vec<Checklist> = task
        .checklists
        .iter()
        .map(|c| clone_checklist(c, &mut checklists, &mut items))
        .collect();

    let description = rewrite_description(&task.description, &[&items, &checklists]);

    let clone = Task {
        id: None,
        uuid: create_uuid(),
        api_name: create_api_name(IdKind::Task),
        number: task.number,
        name: format!("{}{}", task.name, CLONE_SUFFIX),
        description,
        fields: task.fields.iter().map(clone_field).collect(),
        conditions: task
            .conditions
            .iter()
            .map(|c| clone_condition(c, &mut groups))
            .collect(),
        checklists: cloned_checklists,
        due_date: task.due_date.as_ref().map(clone_due_date),
    };

    tracing::debug!(source = %task.api_name, clone = %clone.api_name, "cloned task");
    clone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{empty_condition, empty_rule, start_task_condition};
    use crate::models::{ConditionAction, DueDateRule, FieldType, LogicOperation, Operator, RuleValue};
    use crate::renormalize::reassign_group_ids;
    use std::collections::HashSet;

    fn rule(field: &str, logic: LogicOperation) -> Rule {
        Rule {
            rule_id: Some(11),
            predicate_id: Some(12),
            field: Some(field.to_string()),
            field_type: Some(FieldType::Dropdown),
            operator: Some(Operator::Equals),
            value: Some(RuleValue::from("selection-1")),
            logic_operation: logic,
            ..empty_rule()
        }
    }

    fn source_task() -> Task {
        let mut task = Task::new("Approve invoice");
        task.id = Some(7);
        task.fields.push(Field {
            id: Some(3),
            api_name: "field-choice".to_string(),
            name: "Decision".to_string(),
            field_type: FieldType::Radio,
            is_required: true,
            description: String::new(),
            order: 1,
            selections: vec![
                Selection {
                    id: Some(1),
                    api_name: "selection-yes".to_string(),
                    value: "Yes".to_string(),
                },
                Selection {
                    id: Some(2),
                    api_name: "selection-no".to_string(),
                    value: "No".to_string(),
                },
            ],
        });

        task.conditions.push(start_task_condition(Some("task-prev")));
        let mut skip = empty_condition(2, ConditionAction::SkipTask, false);
        skip.id = Some(99);
        skip.rules = reassign_group_ids(&[
            rule("field-a", LogicOperation::And),
            rule("field-b", LogicOperation::And),
            rule("field-c", LogicOperation::Or),
        ]);
        task.conditions.push(skip);

        task.checklists.push(Checklist {
            id: Some(5),
            api_name: "checklist-abc".to_string(),
            items: vec![ChecklistItem {
                id: Some(6),
                api_name: "checklist-item-xyz".to_string(),
                value: "Check totals".to_string(),
            }],
        });
        task.description =
            "See [checklist checklist-abc] and item [checklist-item-xyz]".to_string();
        task.due_date = Some(DueDate {
            api_name: "due-date-1".to_string(),
            duration: Some("P1D".to_string()),
            duration_months: None,
            rule: DueDateRule::AfterTaskCompleted,
            rule_target_api_name: Some("task-prev".to_string()),
            source_id: Some("task-prev".to_string()),
        });
        task
    }

    #[test]
    fn test_clone_has_new_identity() {
        let source = source_task();
        let clone = clone_task(&source);

        assert_ne!(clone.api_name, source.api_name);
        assert_ne!(clone.uuid, source.uuid);
        assert!(clone.id.is_none());
        assert_eq!(clone.name, "Approve invoice (Clone)");
    }

    #[test]
    fn test_fields_and_selections_are_renamed() {
        let source = source_task();
        let clone = clone_task(&source);
        let field = &clone.fields[0];

        assert_ne!(field.api_name, "field-choice");
        assert!(field.id.is_none());
        assert_eq!(field.name, "Decision");
        assert!(field.is_required);
        assert_eq!(field.selections.len(), 2);
        assert!(field.selections.iter().all(|s| s.id.is_none()));
        assert_ne!(field.selections[0].api_name, "selection-yes");
        assert_eq!(field.selections[1].value, "No");
    }

    #[test]
    fn test_rule_groups_are_preserved() {
        let source = source_task();
        let clone = clone_task(&source);
        let source_rules = &source.conditions[1].rules;
        let rules = &clone.conditions[1].rules;

        assert!(clone.conditions.iter().all(|c| c.id.is_none()));
        assert_ne!(clone.conditions[1].api_name, source.conditions[1].api_name);
        assert_eq!(rules[0].rule_api_name, rules[1].rule_api_name);
        assert_ne!(rules[1].rule_api_name, rules[2].rule_api_name);
        assert_ne!(rules[0].rule_api_name, source_rules[0].rule_api_name);

        let predicates: HashSet<&str> = rules.iter().map(|r| r.predicate_api_name.as_str()).collect();
        assert_eq!(predicates.len(), 3);
        for (before, after) in source_rules.iter().zip(rules) {
            assert_ne!(before.predicate_api_name, after.predicate_api_name);
            assert!(after.rule_id.is_none());
            assert!(after.predicate_id.is_none());
            assert_eq!(before.field, after.field);
            assert_eq!(before.value, after.value);
        }
    }

    #[test]
    fn test_description_follows_checklist_names() {
        let source = source_task();
        let clone = clone_task(&source);
        let checklist = &clone.checklists[0];
        let item = &checklist.items[0];

        assert_ne!(checklist.api_name, "checklist-abc");
        assert_ne!(item.api_name, "checklist-item-xyz");
        assert!(checklist.id.is_none() && item.id.is_none());
        assert_eq!(
            clone.description,
            format!("See [checklist {}] and item [{}]", checklist.api_name, item.api_name)
        );
    }

    #[test]
    fn test_description_is_rewritten_in_one_pass() {
        let mut checklists = Renames::default();
        checklists.names.insert("checklist-1".to_string(), "checklist-2".to_string());
        checklists.names.insert("checklist-2".to_string(), "checklist-3".to_string());
        checklists.names.insert("checklist-12".to_string(), "checklist-40".to_string());
        let items = Renames::default();

        let rewritten = rewrite_description(
            "[checklist-1] [checklist-2] [checklist-12] checklist-7",
            &[&items, &checklists],
        );
        assert_eq!(rewritten, "[checklist-2] [checklist-3] [checklist-40] checklist-7");
    }

    #[test]
    fn test_due_date_keeps_its_target() {
        let source = source_task();
        let clone = clone_task(&source);
        let due_date = clone.due_date.unwrap();

        assert_ne!(due_date.api_name, "due-date-1");
        assert_eq!(due_date.duration.as_deref(), Some("P1D"));
        assert_eq!(due_date.rule, DueDateRule::AfterTaskCompleted);
        assert_eq!(due_date.rule_target_api_name.as_deref(), Some("task-prev"));
        assert_eq!(due_date.source_id.as_deref(), Some("task-prev"));
    }

    #[test]
    fn test_two_clones_are_distinct() {
        let source = source_task();
        let first = clone_task(&source);
        let second = clone_task(&source);

        assert_ne!(first.api_name, second.api_name);
        assert_ne!(
            first.conditions[1].rules[0].rule_api_name,
            second.conditions[1].rules[0].rule_api_name
        );
        assert_eq!(
            first.conditions[1].rules[0].rule_api_name,
            first.conditions[1].rules[1].rule_api_name
        );
        assert_eq!(
            second.conditions[1].rules[0].rule_api_name,
            second.conditions[1].rules[1].rule_api_name
        );
    }
}
