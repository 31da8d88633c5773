//! YAML schema types for workflow definitions.
//!
//! A workflow YAML declares which agent runs each step, which artifact the
//! step creates and which earlier artifacts it requires:
//!
//! ```yaml
//! name: "Greenfield Service"
//! description: "Brief to architecture"
//! version: "1.0"
//!
//! steps:
//!   - agent: analyst
//!     task: create-doc
//!     creates: project-brief.md
//!
//!   - agent: pm
//!     creates: prd.md
//!     requires: project-brief.md
//!
//!   - agent: po
//!     task: validate-artifacts
//!     requires: [prd.md, all_documents]
//!     optional: true
//!
//! expected_artifacts: [prd.md]
//! ```
//!
//! The same document may also be wrapped in a top-level `workflow:` key, in
//! which case `sequence` is accepted as the name of the step list.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, DuplicateArtifactError};
use crate::workflow::artifacts::{ALL_DOCUMENTS, ALL_VALIDATIONS};

/// Top-level workflow definition loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Optional identifier (e.g. "greenfield-fullstack")
    #[serde(default)]
    pub id: Option<String>,

    /// Workflow name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Version string
    #[serde(default = "default_version")]
    pub version: String,

    /// Ordered list of workflow steps
    #[serde(alias = "sequence")]
    pub steps: Vec<WorkflowStep>,

    /// Artifacts that must exist once the whole workflow has been replayed
    #[serde(default)]
    pub expected_artifacts: Vec<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// A single step in the workflow sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Acting agent role (e.g. "analyst", "pm", "architect")
    pub agent: String,

    /// Task reference the agent runs for this step
    #[serde(default, alias = "action")]
    pub task: Option<String>,

    /// Artifact this step produces, unique within the workflow
    #[serde(default)]
    pub creates: Option<String>,

    /// Artifacts that must already exist. Accepts a single name or a list.
    #[serde(default, deserialize_with = "one_or_many")]
    pub requires: Vec<Requirement>,

    /// Unmet requirements on an optional step are reported as warnings
    #[serde(default)]
    pub optional: bool,

    /// Free-form notes for the operator
    #[serde(default)]
    pub notes: Option<String>,
}

impl WorkflowStep {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            task: None,
            creates: None,
            requires: Vec::new(),
            optional: false,
            notes: None,
        }
    }

    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn creates(mut self, artifact: impl Into<String>) -> Self {
        self.creates = Some(artifact.into());
        self
    }

    pub fn requires(mut self, name: impl Into<String>) -> Self {
        self.requires.push(Requirement::from(name.into()));
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A single entry of a step's `requires` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Requirement {
    /// A concrete artifact that must have been created earlier
    Artifact(String),
    /// `all_validations` — depends on everything so far, never looked up
    AllValidations,
    /// `all_documents` — depends on everything so far, never looked up
    AllDocuments,
}

impl Requirement {
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Requirement::Artifact(_))
    }

    /// The concrete artifact name, if this is not a sentinel.
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Requirement::Artifact(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl From<String> for Requirement {
    fn from(s: String) -> Self {
        match s.as_str() {
            ALL_VALIDATIONS => Requirement::AllValidations,
            ALL_DOCUMENTS => Requirement::AllDocuments,
            _ => Requirement::Artifact(s),
        }
    }
}

impl From<Requirement> for String {
    fn from(r: Requirement) -> Self {
        r.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Artifact(name) => write!(f, "{}", name),
            Requirement::AllValidations => write!(f, "{}", ALL_VALIDATIONS),
            Requirement::AllDocuments => write!(f, "{}", ALL_DOCUMENTS),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Requirement>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(name)) => vec![Requirement::from(name)],
        Some(OneOrMany::Many(names)) => names.into_iter().map(Requirement::from).collect(),
    })
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, steps: Vec<WorkflowStep>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            version: default_version(),
            steps,
            expected_artifacts: Vec::new(),
        }
    }

    /// Parse a workflow definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CoreError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)
            .map_err(|e| CoreError::Parse(format!("Failed to parse workflow YAML: {}", e)))?;

        // Unwrap the `workflow:` envelope when present
        let inner = value.get("workflow").cloned();
        let value = inner.unwrap_or(value);

        let workflow: Self = serde_yaml::from_value(value)
            .map_err(|e| CoreError::Parse(format!("Invalid workflow definition: {}", e)))?;
        workflow.check_agents()?;
        Ok(workflow)
    }

    /// Load a workflow definition from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Io(format!(
                "Failed to read workflow file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Enforce that no two steps declare the same `creates` value.
    pub fn check_unique_artifacts(&self) -> Result<(), DuplicateArtifactError> {
        check_unique_artifacts(&self.steps)
    }

    fn check_agents(&self) -> Result<(), CoreError> {
        for (i, step) in self.steps.iter().enumerate() {
            if step.agent.trim().is_empty() {
                return Err(CoreError::Parse(format!(
                    "Step {} of workflow '{}' has an empty agent",
                    i + 1,
                    self.name
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn check_unique_artifacts(steps: &[WorkflowStep]) -> Result<(), DuplicateArtifactError> {
    let mut producers: HashMap<&str, usize> = HashMap::new();
    for (i, step) in steps.iter().enumerate() {
        if let Some(ref artifact) = step.creates {
            if let Some(&first) = producers.get(artifact.as_str()) {
                return Err(DuplicateArtifactError {
                    artifact: artifact.clone(),
                    first_position: first,
                    second_position: i + 1,
                });
            }
            producers.insert(artifact, i + 1);
        }
    }
    Ok(())
}
