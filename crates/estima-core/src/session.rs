//! Persisted workflow session.
//!
//! The browser original keeps all of this in component state for the life of
//! one tab; the CLI keeps it in `.estima/session.json` so separate
//! invocations see the same workflow. One session tracks one workflow
//! instance; `start` replaces it wholesale, which is what makes a fresh
//! upload get a fresh reconciliation.

use crate::reconcile::SuggestedEstimate;
use crate::sheet::EstimateSheet;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Project-local state directory.
pub const STATE_DIR: &str = ".estima";
const SESSION_FILE: &str = "session.json";

/// Remote workflow lifecycle as reported by the status endpoint.
///
/// The wire sends upper-snake strings; anything starting with `ERROR` is a
/// terminal failure with free-form detail, and anything else unknown is
/// carried verbatim (and treated as still-running).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowStatus {
    Processing,
    WaitingForHuman,
    Generating,
    Completed,
    Error(String),
    Other(String),
}

impl WorkflowStatus {
    /// Terminal states stop the poller.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error(_))
    }

    /// The human-review gate: suggestions are available and an approval is
    /// expected.
    #[must_use]
    pub const fn is_awaiting_review(&self) -> bool {
        matches!(self, Self::WaitingForHuman)
    }

    #[must_use]
    pub fn as_wire(&self) -> String {
        match self {
            Self::Processing => "PROCESSING".to_string(),
            Self::WaitingForHuman => "WAITING_FOR_HUMAN".to_string(),
            Self::Generating => "GENERATING".to_string(),
            Self::Completed => "COMPLETED".to_string(),
            Self::Error(detail) => format!("ERROR: {detail}"),
            Self::Other(raw) => raw.clone(),
        }
    }
}

impl From<String> for WorkflowStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PROCESSING" => Self::Processing,
            "WAITING_FOR_HUMAN" => Self::WaitingForHuman,
            "GENERATING" => Self::Generating,
            "COMPLETED" => Self::Completed,
            _ => {
                if let Some(detail) = raw.strip_prefix("ERROR") {
                    Self::Error(detail.trim_start_matches(':').trim().to_string())
                } else {
                    Self::Other(raw)
                }
            }
        }
    }
}

impl From<WorkflowStatus> for String {
    fn from(status: WorkflowStatus) -> Self {
        status.as_wire()
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

/// Accept either a string or a list of strings, flattening lists to
/// newline-joined text the way the review form edits them.
fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        List(Vec<String>),
        Missing(Option<serde_json::Value>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::List(items) => items.join("\n"),
        Raw::Missing(_) => String::new(),
    })
}

/// The editable slice of the extraction result. List-valued fields arrive as
/// arrays and are flattened to newline-joined text for editing; everything
/// else the backend attached rides along in `extra` and is echoed back on
/// approval untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(default, deserialize_with = "string_or_list")]
    pub client_name: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub project_essence: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub business_goals: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub key_features: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tech_stack: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ExtractedData {
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone()).context("malformed extracted_data payload")
    }

    /// Key features as individual lines, for annotation matching.
    #[must_use]
    pub fn feature_lines(&self) -> Vec<&str> {
        self.key_features
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Auth state captured at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub user: String,
    pub token: String,
}

/// Everything one workflow instance accumulates locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
    #[serde(default)]
    pub auth: Option<Auth>,
    #[serde(default)]
    pub extracted: Option<ExtractedData>,
    #[serde(default)]
    pub sheet: EstimateSheet,
    /// Snapshot of the server's suggestion, kept for the AI-diff view.
    #[serde(default)]
    pub suggested: Option<SuggestedEstimate>,
    #[serde(default)]
    pub final_proposal: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(STATE_DIR).join(SESSION_FILE)
    }

    #[must_use]
    pub fn exists(project_root: &Path) -> bool {
        Self::path(project_root).exists()
    }

    /// Load the session, or a fresh default when none has been written yet.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = Self::path(project_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Persist atomically enough for a single-user tool: write to a temp
    /// file in the same directory, then rename over the target.
    pub fn save(&mut self, project_root: &Path) -> Result<()> {
        self.updated_at = Some(Utc::now());
        let path = Self::path(project_root);
        let dir = path
            .parent()
            .context("session path has no parent directory")?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(self).context("Failed to encode session")?;
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    /// Begin tracking a new workflow, dropping all per-instance state but
    /// keeping auth. The next `WAITING_FOR_HUMAN` reconciles fresh.
    pub fn reset_for(&mut self, workflow_id: String) {
        let auth = self.auth.take();
        *self = Self {
            workflow_id: Some(workflow_id),
            status: Some(WorkflowStatus::Processing),
            auth,
            ..Self::default()
        };
    }

    /// The approval payload's `updated_data` member: the edited fields plus
    /// the untouched passthrough extras.
    pub fn updated_data(&self) -> Result<serde_json::Value> {
        let extracted = self.extracted.clone().unwrap_or_default();
        serde_json::to_value(extracted).context("Failed to encode updated_data")
    }
}
