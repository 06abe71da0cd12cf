//! CLI commands

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::activation::ActivationGate;
use crate::config::{save_config_to, Config, ConditionsPaths};
use crate::editor::add_empty_condition;
use crate::models::{FieldType, Template};
use crate::operators::{get_operators, MessageCatalog};
use crate::validation::lint_conditions;

/// Write a default config on first use
pub fn init(paths: &ConditionsPaths) -> Result<()> {
    if paths.is_initialized() {
        println!("Already initialized at {}", paths.root.display());
        return Ok(());
    }

    paths.ensure_dirs()?;
    save_config_to(&Config::default(), &paths.config)?;
    println!("Created {}", paths.config.display());
    Ok(())
}

/// Read a template JSON file
pub fn load_template(path: &Path) -> Result<Template> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse template {}", path.display()))
}

/// Write a template as pretty JSON to a file, or stdout without one
pub fn write_template(template: &Template, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(template)?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write template {}", path.display()))?;
            info!(path = %path.display(), "wrote template");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Operators available for a field type, with labels
pub fn operators(field_type: &str, messages: &dyn MessageCatalog) -> Result<Vec<(String, String)>> {
    let field_type = field_type
        .parse::<FieldType>()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(get_operators(field_type, messages)
        .into_iter()
        .map(|option| {
            (
                option.operator.to_string(),
                option.label.unwrap_or_default(),
            )
        })
        .collect())
}

/// Print operators for a field type
pub fn print_operators(field_type: &str, messages: &dyn MessageCatalog) -> Result<()> {
    let rows = operators(field_type, messages)?;
    println!("{:<14} {}", "OPERATOR", "LABEL");
    println!("{}", "-".repeat(40));
    for (operator, label) in rows {
        println!("{:<14} {}", operator, label);
    }
    Ok(())
}

/// Check a template can be activated
///
/// Returns the lint warnings; blocking problems are errors.
pub fn validate(path: &Path, strict: bool) -> Result<Vec<String>> {
    let template = load_template(path)?;
    println!("Validating template: {}", template.name);
    println!();

    let errors = ActivationGate::collect_errors(&template);
    if !errors.is_empty() {
        println!("✗ {} task(s) cannot be activated", errors.len());
        for error in &errors {
            println!("  ✗ {}", error);
        }
        bail!("Template '{}' cannot be activated", template.name);
    }
    println!("Conditions... ✓ passed");

    let warnings: Vec<String> = template
        .tasks
        .iter()
        .flat_map(|task| {
            lint_conditions(&task.conditions)
                .into_iter()
                .map(move |warning| format!("{}: {}", task.name, warning))
        })
        .collect();

    if warnings.is_empty() {
        println!("Linting... ✓ no warnings");
    } else {
        println!("Linting... ⚠ {} warning(s)", warnings.len());
        for warning in &warnings {
            println!("  ⚠ {}", warning);
        }
        if strict {
            bail!("Validation failed in strict mode due to warnings");
        }
    }

    Ok(warnings)
}

/// Prune rules referencing deleted fields or tasks
pub fn refresh(path: &Path, output: Option<&Path>, config: &Config) -> Result<usize> {
    let mut template = load_template(path)?;
    let removed = template.refresh_conditions(config.order_base);
    info!(template = %template.name, removed, "refreshed template conditions");
    write_template(&template, output)?;
    Ok(removed)
}

/// Regroup the rules of every condition
pub fn normalize(path: &Path, output: Option<&Path>) -> Result<()> {
    let mut template = load_template(path)?;
    template.normalize_conditions();
    write_template(&template, output)
}

/// Duplicate a task and write the template back
pub fn clone_task(path: &Path, task_api_name: &str, output: Option<&Path>) -> Result<String> {
    let mut template = load_template(path)?;
    let clone = template
        .duplicate_task(task_api_name)
        .with_context(|| format!("Task not found: {}", task_api_name))?;
    write_template(&template, output)?;
    Ok(clone)
}

/// Append a condition to a task and write the template back
///
/// The new condition gets one empty rule only when `access_conditions` is
/// on in the config. Returns the new condition's api name.
pub fn add_condition(
    path: &Path,
    task_api_name: &str,
    is_start_task: bool,
    output: Option<&Path>,
    config: &Config,
) -> Result<String> {
    let mut template = load_template(path)?;
    let index = template
        .task_index(task_api_name)
        .with_context(|| format!("Task not found: {}", task_api_name))?;

    let task = &mut template.tasks[index];
    let order = config.order_base + task.conditions.len();
    let next = add_empty_condition(
        &task.conditions,
        order,
        is_start_task,
        config.access_conditions,
    );
    if next.len() == task.conditions.len() {
        bail!("Task '{}' already has a start condition", task.name);
    }

    let api_name = next[next.len() - 1].api_name.clone();
    task.conditions = next;
    info!(task = %task_api_name, condition = %api_name, "added condition");
    write_template(&template, output)?;
    Ok(api_name)
}
