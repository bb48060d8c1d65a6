//! Flexible resource identifiers.
//!
//! GitLab addresses projects and groups either by numeric ID or by
//! URL-encoded path (`namespace/project`). [`ResourceId`] covers both and
//! renders itself as a single URL path segment.

use crate::errors::{GitLabError, GitLabResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;

/// Characters escaped when a path-style ID is placed into a URL segment.
/// Everything a path segment cannot contain, most importantly `/`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=');

/// A project or group identifier: numeric ID or namespace path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Numeric ID, e.g. `278964`.
    Id(u64),
    /// Namespace path, e.g. `gitlab-org/gitlab`.
    Path(String),
}

impl ResourceId {
    /// Renders the identifier as a single URL path segment.
    ///
    /// Path identifiers are percent-encoded so that `gitlab-org/gitlab`
    /// becomes `gitlab-org%2Fgitlab`.
    pub fn as_path_segment(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Path(path) => utf8_percent_encode(path, PATH_SEGMENT).to_string(),
        }
    }

    /// Coerces a dynamic JSON value into an identifier.
    ///
    /// Accepts non-negative integers and strings; anything else fails fast
    /// before a request is built.
    pub fn from_value(value: &serde_json::Value) -> GitLabResult<Self> {
        match value {
            serde_json::Value::Number(n) if n.as_u64().is_some() => {
                Ok(Self::Id(n.as_u64().unwrap_or_default()))
            }
            serde_json::Value::String(s) => Ok(Self::Path(s.clone())),
            other => Err(GitLabError::invalid_id(format!(
                "invalid ID type {}, the ID must be an int or a string",
                render_value(other)
            ))),
        }
    }
}

/// Renders a rejected value the way it was written, without JSON quoting
/// noise around non-scalar values.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Path(path) => write!(f, "{}", path),
        }
    }
}

impl TryFrom<serde_json::Value> for ResourceId {
    type Error = GitLabError;

    fn try_from(value: serde_json::Value) -> GitLabResult<Self> {
        Self::from_value(&value)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self::Id(u64::from(id))
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self::Id(id.max(0) as u64)
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        Self::Id(id.max(0) as u64)
    }
}

impl From<&str> for ResourceId {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for ResourceId {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_numeric_id_segment() {
        let id = ResourceId::from(278964u64);
        assert_eq!(id.as_path_segment(), "278964");
    }

    #[test]
    fn test_path_id_is_encoded() {
        let id = ResourceId::from("gitlab-org/gitlab");
        assert_eq!(id.as_path_segment(), "gitlab-org%2Fgitlab");
    }

    #[test]
    fn test_nested_path_is_encoded() {
        let id = ResourceId::from("group/subgroup/project");
        assert_eq!(id.as_path_segment(), "group%2Fsubgroup%2Fproject");
    }

    #[test_case(json!(42), ResourceId::Id(42); "integer")]
    #[test_case(json!("a/b"), ResourceId::Path("a/b".into()); "string")]
    fn test_from_value_accepts(value: serde_json::Value, expected: ResourceId) {
        assert_eq!(ResourceId::from_value(&value).unwrap(), expected);
    }

    #[test]
    fn test_from_value_rejects_float() {
        let err = ResourceId::from_value(&json!(1.5)).unwrap_err();
        assert_eq!(
            err.message(),
            "invalid ID type 1.5, the ID must be an int or a string"
        );
        assert_eq!(*err.kind(), crate::errors::GitLabErrorKind::InvalidId);
    }

    #[test]
    fn test_from_value_rejects_negative() {
        let err = ResourceId::from_value(&json!(-3)).unwrap_err();
        assert_eq!(
            err.message(),
            "invalid ID type -3, the ID must be an int or a string"
        );
    }

    #[test]
    fn test_from_value_rejects_bool() {
        let err = ResourceId::from_value(&json!(true)).unwrap_err();
        assert_eq!(
            err.message(),
            "invalid ID type true, the ID must be an int or a string"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceId::from(7u64).to_string(), "7");
        assert_eq!(ResourceId::from("a/b").to_string(), "a/b");
    }
}
