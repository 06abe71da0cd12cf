//! Template-level supply of variables and starting order
//!
//! Conditions on a task may reference kick-off fields and the output
//! fields of earlier tasks, and may wait for kick-off or an earlier task.
//! Whenever fields or task order change the stale references are pruned.

use crate::cloning::clone_task;
use crate::editor::{
    prune_deleted_field_references, prune_deleted_task_references, unknown_field_references,
};
use crate::models::{FieldType, StartingOrderVariable, Template, Variable};

/// Api name of the kick-off entry in the starting order
pub const KICKOFF_API_NAME: &str = "kickoff";

impl Template {
    /// Variables a task's conditions may reference
    ///
    /// Kick-off fields, then output fields of every earlier task.
    /// An unknown task gets only the kick-off fields.
    pub fn variables_for_task(&self, task_api_name: &str) -> Vec<Variable> {
        let earlier = self.task_index(task_api_name).unwrap_or(0);
        self.kickoff
            .fields
            .iter()
            .chain(self.tasks[..earlier].iter().flat_map(|t| &t.fields))
            .map(|field| field.to_variable())
            .collect()
    }

    /// Kick-off plus every earlier task
    pub fn starting_order_for_task(&self, task_api_name: &str) -> Vec<StartingOrderVariable> {
        let earlier = self.task_index(task_api_name).unwrap_or(0);
        let kickoff = StartingOrderVariable {
            api_name: KICKOFF_API_NAME.to_string(),
            title: "Kick-off form".to_string(),
            field_type: FieldType::Kickoff,
        };

        std::iter::once(kickoff)
            .chain(self.tasks[..earlier].iter().map(|task| StartingOrderVariable {
                api_name: task.api_name.clone(),
                title: task.name.clone(),
                field_type: FieldType::Task,
            }))
            .collect()
    }

    /// Drop every rule that references a field or task no longer available
    ///
    /// Returns the number of rules removed across all tasks.
    pub fn refresh_conditions(&mut self, order_base: usize) -> usize {
        let mut removed = 0;
        for index in 0..self.tasks.len() {
            let api_name = self.tasks[index].api_name.clone();
            let variables = self.variables_for_task(&api_name);
            let starting_order = self.starting_order_for_task(&api_name);

            let task = &mut self.tasks[index];
            let before: usize = task.conditions.iter().map(|c| c.rules.len()).sum();

            let stale = unknown_field_references(&task.conditions, &variables);
            let conditions = prune_deleted_field_references(&task.conditions, &stale, order_base);
            task.conditions = prune_deleted_task_references(&starting_order, &conditions, order_base);

            let after: usize = task.conditions.iter().map(|c| c.rules.len()).sum();
            if before != after {
                tracing::debug!(task = %task.api_name, removed = before - after, "refreshed conditions");
            }
            removed += before - after;
        }
        removed
    }

    /// Re-run rule grouping on every condition of every task
    pub fn normalize_conditions(&mut self) {
        for task in &mut self.tasks {
            for condition in &mut task.conditions {
                condition.rules = crate::renormalize::reassign_group_ids(&condition.rules);
            }
        }
    }

    /// Number tasks from 1 in list order
    pub fn renumber_tasks(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.number = index + 1;
        }
    }

    /// Insert a clone of a task right after it
    ///
    /// Returns the clone's api name, or `None` for an unknown task.
    pub fn duplicate_task(&mut self, task_api_name: &str) -> Option<String> {
        let index = self.task_index(task_api_name)?;
        let clone = clone_task(&self.tasks[index]);
        let api_name = clone.api_name.clone();
        self.tasks.insert(index + 1, clone);
        self.renumber_tasks();
        tracing::info!(source = %task_api_name, clone = %api_name, "duplicated task");
        Some(api_name)
    }
}
