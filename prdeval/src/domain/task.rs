//! Task input supplied by the caller at generation time

use std::io::Read;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placeholder value used when a task has no parent or epic
pub const NO_PARENT_INFO: &str = "No parent or epic information available.";

/// Placeholder value used when an evaluation has no originating task
pub const NO_ORIGINAL_TASK: &str = "No original task description provided.";

/// A work item to be enriched into a PRD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentTask>,
}

/// The parent task or epic a task belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentTask {
    pub title: String,
    pub description: String,
}

impl TaskInfo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.parent = Some(ParentTask {
            title: title.into(),
            description: description.into(),
        });
        self
    }

    /// Load a task from a JSON file, or from stdin when `path` is `-`
    pub fn load(path: &Path) -> Result<Self> {
        debug!(?path, "TaskInfo::load: called");
        let content = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read task from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path).context(format!("Failed to read task file {}", path.display()))?
        };
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse task JSON")
    }

    /// First required field that is blank, by its placeholder-facing name
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            return Some("title");
        }
        if self.description.trim().is_empty() {
            return Some("description");
        }
        if let Some(parent) = &self.parent {
            if parent.title.trim().is_empty() {
                return Some("parent.title");
            }
            if parent.description.trim().is_empty() {
                return Some("parent.description");
            }
        }
        None
    }

    /// Text substituted for the `parent_info` placeholder
    pub fn parent_info(&self) -> String {
        match &self.parent {
            Some(parent) => format!(
                "Parent/Epic:\nTitle: {}\nDescription: {}",
                parent.title, parent.description
            ),
            None => NO_PARENT_INFO.to_string(),
        }
    }

    /// JSON form handed to the evaluator as the original task
    pub fn to_original_task(&self) -> String {
        // Plain strings and an optional nested struct always serialize
        serde_json::to_string(self).unwrap_or_else(|_| format!("{}: {}", self.title, self.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskInfo {
        TaskInfo::new(
            "Implement User Registration Feature",
            "Need to implement a basic user registration feature, including form validation and database storage.",
        )
        .with_parent(
            "User Management System",
            "Build a complete user management system, including registration, login, and permission management features.",
        )
    }

    #[test]
    fn test_parent_info_with_parent() {
        let info = sample().parent_info();
        assert_eq!(
            info,
            "Parent/Epic:\nTitle: User Management System\nDescription: Build a complete user management system, including registration, login, and permission management features."
        );
    }

    #[test]
    fn test_parent_info_without_parent() {
        let task = TaskInfo::new("Title", "Description");
        assert_eq!(task.parent_info(), NO_PARENT_INFO);
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(sample().missing_field(), None);
        assert_eq!(TaskInfo::new("  ", "d").missing_field(), Some("title"));
        assert_eq!(TaskInfo::new("t", "").missing_field(), Some("description"));
        assert_eq!(
            TaskInfo::new("t", "d").with_parent("", "pd").missing_field(),
            Some("parent.title")
        );
        assert_eq!(
            TaskInfo::new("t", "d").with_parent("pt", "\n").missing_field(),
            Some("parent.description")
        );
    }

    #[test]
    fn test_from_json_requires_fields() {
        assert!(TaskInfo::from_json(r#"{"title": "only a title"}"#).is_err());
        assert!(TaskInfo::from_json(r#"{"description": "only a description"}"#).is_err());

        let task = TaskInfo::from_json(r#"{"title": "t", "description": "d"}"#).unwrap();
        assert!(task.parent.is_none());
    }

    #[test]
    fn test_from_json_with_parent() {
        let task = TaskInfo::from_json(
            r#"{"title": "t", "description": "d", "parent": {"title": "pt", "description": "pd"}}"#,
        )
        .unwrap();
        assert_eq!(task, TaskInfo::new("t", "d").with_parent("pt", "pd"));
    }

    #[test]
    fn test_to_original_task_is_json() {
        let json = sample().to_original_task();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Implement User Registration Feature");
        assert_eq!(value["parent"]["title"], "User Management System");

        let json = TaskInfo::new("t", "d").to_original_task();
        assert!(!json.contains("parent"));
    }
}
