//! Keybind validator
//!
//! Checks the `[keybinds]` table: every key must parse, every action must
//! exist, quitting must stay reachable, and no key may be bound twice.

use crate::core::menu_actions::{normalize_keybind, MonitorAction};
use std::collections::HashMap;

/// Keys tried, in order, when the quit binding has to be restored
const QUIT_CANDIDATES: [&str; 3] = ["ctrl+q", "ctrl+x", "f10"];
const QUIT_DEFAULT: &str = QUIT_CANDIDATES[0];

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    InvalidKey {
        key: String,
    },
    UnknownAction {
        key: String,
        action: String,
    },
    MissingCriticalBinding {
        action: String,
        default: String,
    },
    DuplicateBinding {
        keybind: String,
        actions: Vec<String>,
    },
}

impl ValidationIssue {
    pub fn severity(&self) -> ValidationSeverity {
        match self {
            ValidationIssue::InvalidKey { .. }
            | ValidationIssue::UnknownAction { .. }
            | ValidationIssue::MissingCriticalBinding { .. } => ValidationSeverity::Error,
            ValidationIssue::DuplicateBinding { .. } => ValidationSeverity::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::InvalidKey { key } => {
                format!("Keybind '{}' is not a valid key combination", key)
            }
            ValidationIssue::UnknownAction { key, action } => {
                format!("Keybind '{}' refers to unknown action '{}'", key, action)
            }
            ValidationIssue::MissingCriticalBinding { action, default } => {
                format!(
                    "Critical action '{}' has no keybind! Default: {}",
                    action, default
                )
            }
            ValidationIssue::DuplicateBinding { keybind, actions } => {
                format!(
                    "Keybind '{}' is assigned to multiple actions: {}",
                    keybind,
                    actions.join(", ")
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// Everything `validate_keybinds` found, errors and warnings mixed
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn with_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .collect()
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings().is_empty()
    }

    /// No errors; warnings are allowed
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// Validate the `[keybinds]` table (key string -> action name)
pub fn validate_keybinds(keybinds: &HashMap<String, String>) -> ValidationResult {
    let mut issues = Vec::new();
    let mut by_key: HashMap<String, Vec<String>> = HashMap::new();
    let mut quit_bound = false;

    let mut entries: Vec<(&String, &String)> = keybinds.iter().collect();
    entries.sort();

    for (key, action) in entries {
        let Some(normalized) = normalize_keybind(key) else {
            issues.push(ValidationIssue::InvalidKey { key: key.clone() });
            continue;
        };

        match MonitorAction::from_name(action) {
            Some(MonitorAction::Quit) => quit_bound = true,
            Some(_) => {}
            None => {
                issues.push(ValidationIssue::UnknownAction {
                    key: key.clone(),
                    action: action.clone(),
                });
                continue;
            }
        }

        by_key.entry(normalized).or_default().push(action.clone());
    }

    if !quit_bound {
        issues.push(ValidationIssue::MissingCriticalBinding {
            action: MonitorAction::Quit.name().to_string(),
            default: QUIT_DEFAULT.to_string(),
        });
    }

    let mut duplicates: Vec<(String, Vec<String>)> = by_key
        .into_iter()
        .filter(|(_, actions)| actions.len() > 1)
        .collect();
    duplicates.sort();
    for (keybind, actions) in duplicates {
        issues.push(ValidationIssue::DuplicateBinding { keybind, actions });
    }

    ValidationResult { issues }
}

/// Auto-fix validation issues: drop broken entries and restore missing critical bindings
pub fn auto_fix_keybinds(
    keybinds: &mut HashMap<String, String>,
    issues: &[ValidationIssue],
) -> usize {
    let mut fixed_count = 0;

    for issue in issues {
        match issue {
            ValidationIssue::InvalidKey { key } | ValidationIssue::UnknownAction { key, .. } => {
                if keybinds.remove(key).is_some() {
                    fixed_count += 1;
                }
            }
            ValidationIssue::MissingCriticalBinding { action, default } => {
                let key = free_key(keybinds, default).unwrap_or_else(|| default.clone());
                if key != *default {
                    tracing::warn!(
                        "'{}' is already bound, restoring '{}' on '{}' instead",
                        default,
                        action,
                        key
                    );
                }
                if let Some(previous) = keybinds.insert(key.clone(), action.clone()) {
                    tracing::warn!("Rebinding '{}' from '{}' to '{}'", key, previous, action);
                }
                fixed_count += 1;
            }
            ValidationIssue::DuplicateBinding { .. } => {}
        }
    }

    fixed_count
}

/// First of `preferred` and the quit fallbacks that no existing entry uses
fn free_key(keybinds: &HashMap<String, String>, preferred: &str) -> Option<String> {
    let taken: Vec<String> = keybinds.keys().filter_map(|k| normalize_keybind(k)).collect();
    std::iter::once(preferred)
        .chain(QUIT_CANDIDATES)
        .find(|candidate| {
            normalize_keybind(candidate).is_some_and(|normalized| !taken.contains(&normalized))
        })
        .map(str::to_string)
}
