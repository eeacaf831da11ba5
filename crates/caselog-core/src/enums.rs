//! Status enums, connector types and user action vocabulary for caselog.
//!
//! Every enum carries an `as_str()` that matches its serde representation, so
//! the same literal is used for SQL storage, JSON payloads and the scalar
//! value captures written to the audit trail.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CaseStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a case.
///
/// Any status may move to any other status; closing a case records
/// `closed_at`/`closed_by`, reopening clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    Open,
    InProgress,
    Closed,
}

impl CaseStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ConnectorType
// ---------------------------------------------------------------------------

/// External system a case connector points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ConnectorType {
    #[serde(rename = ".none")]
    None,
    #[serde(rename = ".jira")]
    Jira,
    #[serde(rename = ".servicenow")]
    ServiceNow,
    #[serde(rename = ".resilient")]
    Resilient,
}

impl ConnectorType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => ".none",
            Self::Jira => ".jira",
            Self::ServiceNow => ".servicenow",
            Self::Resilient => ".resilient",
        }
    }

    /// Keys accepted in the connector's type-specific `fields` object.
    #[must_use]
    pub const fn allowed_fields(self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Jira => &["issueType", "priority", "parent"],
            Self::ServiceNow => &["urgency", "severity", "impact"],
            Self::Resilient => &["incidentTypes", "severityCode"],
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommentType
// ---------------------------------------------------------------------------

/// Whether a comment was written by a user or derived from an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    User,
    Alert,
}

impl CommentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Alert => "alert",
        }
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserActionKind
// ---------------------------------------------------------------------------

/// Kind of change recorded by a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UserActionKind {
    Create,
    Update,
    Add,
    Delete,
    PushToService,
}

impl UserActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::PushToService => "push-to-service",
        }
    }
}

impl fmt::Display for UserActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserActionField
// ---------------------------------------------------------------------------

/// Field name listed in a user action's `action_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserActionField {
    Comment,
    Connector,
    Description,
    Pushed,
    Settings,
    Status,
    Tags,
    Title,
}

impl UserActionField {
    /// Precedence used to order the records emitted by one case patch.
    pub const CANONICAL_ORDER: [Self; 6] = [
        Self::Status,
        Self::Title,
        Self::Description,
        Self::Tags,
        Self::Connector,
        Self::Settings,
    ];

    /// Fields listed on the `create` action written when a case is opened.
    pub const CREATE_FIELDS: [Self; 6] = [
        Self::Description,
        Self::Status,
        Self::Tags,
        Self::Title,
        Self::Connector,
        Self::Settings,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Connector => "connector",
            Self::Description => "description",
            Self::Pushed => "pushed",
            Self::Settings => "settings",
            Self::Status => "status",
            Self::Tags => "tags",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for UserActionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
