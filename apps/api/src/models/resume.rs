//! Typed résumé record loaded from a JSON Resume style document.
//!
//! Loading is lenient below the document root: wrong shapes degrade to empty
//! values instead of failing, so a sloppy résumé only loses coverage. The only
//! hard failures are an unreadable file and syntactically invalid JSON.
//!
//! Every field is a plain `String`/`Vec<String>` and the empty value means
//! "not provided".

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("failed to read resume at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("resume is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basics {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skill {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub highlights: Vec<String>,
    pub tech: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Work {
    /// Company name.
    pub name: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Education {
    pub institution: String,
    pub study_type: String,
    pub area: String,
    /// Kept as text; numeric GPAs in the source are rendered (`3.9` → `"3.9"`).
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Award {
    pub title: String,
    pub date: String,
    pub summary: String,
}

/// The whole résumé. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resume {
    pub basics: Basics,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub work: Vec<Work>,
    pub education: Vec<Education>,
    pub awards: Vec<Award>,
}

impl Resume {
    /// Reads and parses the résumé file.
    pub fn load(path: &Path) -> Result<Self, ResumeError> {
        let text = std::fs::read_to_string(path).map_err(|source| ResumeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ResumeError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Builds the record from an already parsed document, defaulting anything
    /// missing or malformed.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            warn!("Resume root is not a JSON object; using an empty resume");
            return Self::default();
        };

        let basics = root
            .get("basics")
            .and_then(Value::as_object)
            .map(|b| Basics {
                name: text(b, "name"),
                email: text(b, "email"),
                phone: text(b, "phone"),
                summary: text(b, "summary"),
            })
            .unwrap_or_default();

        Self {
            basics,
            skills: entries(root, "skills", |s| Skill {
                name: text(s, "name"),
                keywords: text_list(s, "keywords"),
            }),
            projects: entries(root, "projects", |p| Project {
                name: text(p, "name"),
                description: text(p, "description"),
                highlights: text_list(p, "highlights"),
                tech: text_list(p, "tech"),
            }),
            work: entries(root, "work", |w| Work {
                name: text(w, "name"),
                position: text(w, "position"),
                start_date: text(w, "startDate"),
                end_date: text(w, "endDate"),
                summary: text(w, "summary"),
                highlights: text_list(w, "highlights"),
            }),
            education: entries(root, "education", |e| Education {
                institution: text(e, "institution"),
                study_type: text(e, "studyType"),
                area: text(e, "area"),
                gpa: text(e, "gpa"),
            }),
            awards: entries(root, "awards", |a| Award {
                title: text(a, "title"),
                date: text(a, "date"),
                summary: text(a, "summary"),
            }),
        }
    }
}

/// Renders a scalar as text. Strings pass through, numbers and bools are
/// formatted, everything else is empty.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(scalar_text).unwrap_or_default()
}

fn text_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Maps every object in `root[key]`, skipping items that are not objects.
fn entries<T>(
    root: &Map<String, Value>,
    key: &str,
    build: impl Fn(&Map<String, Value>) -> T,
) -> Vec<T> {
    root.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).map(build).collect())
        .unwrap_or_default()
}
