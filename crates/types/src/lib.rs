//! Validated identifier types shared across the contented crates.
//!
//! Project ids and result paths arrive from two untrusted places: directory entries on disk and
//! URL segments. Both are parsed into these newtypes before they are joined onto a filesystem
//! path, so a value of either type can never name anything outside its parent directory.

use std::path::PathBuf;
use std::str::FromStr;

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The input was empty
    #[error("identifier cannot be empty")]
    Empty,

    /// The input was `.` or `..`
    #[error("identifier cannot be a relative directory reference: {0}")]
    RelativeReference(String),

    /// The input contained a character that is not allowed in this position
    #[error("identifier contains a forbidden character: {0:?}")]
    ForbiddenCharacter(char),

    /// A path segment was empty (leading, trailing or doubled separator)
    #[error("path contains an empty segment: {0}")]
    EmptySegment(String),
}

fn validate_segment(segment: &str) -> Result<(), IdentifierError> {
    if segment.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if segment == "." || segment == ".." {
        return Err(IdentifierError::RelativeReference(segment.to_owned()));
    }
    if let Some(c) = segment.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(IdentifierError::ForbiddenCharacter(c));
    }
    Ok(())
}

/// Name of a project: the base name of a directory directly under the collection root.
///
/// A `ProjectId` is always a single normal path component. It is not trimmed, since directory
/// names may legitimately carry surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a new `ProjectId`, rejecting empty names, `.`/`..`, and names containing a path
    /// separator or NUL.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let input = input.as_ref();
        validate_segment(input)?;
        Ok(Self(input.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for ProjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ProjectId::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Path of a result file relative to its project directory.
///
/// Segments are always joined with `/`, whatever the host platform, and every segment is a
/// normal component: no empty segments, no `.` or `..`, no backslashes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResultPath(String);

impl ResultPath {
    /// Parses a `/`-separated relative path.
    ///
    /// # Errors
    ///
    /// Returns an `IdentifierError` if the input is empty, absolute, or has any segment that is
    /// empty, a relative reference, or contains a forbidden character.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(IdentifierError::Empty);
        }
        for segment in input.split('/') {
            if segment.is_empty() {
                return Err(IdentifierError::EmptySegment(input.to_owned()));
            }
            validate_segment(segment)?;
        }
        Ok(Self(input.to_owned()))
    }

    /// Builds a path from individual segments, validating each one.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, IdentifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for segment in segments {
            let segment = segment.as_ref();
            validate_segment(segment)?;
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(segment);
        }
        if joined.is_empty() {
            return Err(IdentifierError::Empty);
        }
        Ok(Self(joined))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The final segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Converts to a platform path relative to the project directory.
    pub fn to_path_buf(&self) -> PathBuf {
        self.segments().collect()
    }
}

impl std::fmt::Display for ResultPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResultPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResultPath {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for ResultPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ResultPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResultPath::new(&s).map_err(serde::de::Error::custom)
    }
}
