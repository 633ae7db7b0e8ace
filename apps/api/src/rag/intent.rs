//! Intent routing: answers structurally answerable questions (contact info,
//! skill lists, degrees, …) straight from the résumé, bypassing retrieval.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::models::resume::Resume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Email,
    Phone,
    Skills,
    Education,
    Experience,
    Projects,
    Awards,
    Summary,
    Generic,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Email => "email",
            Intent::Phone => "phone",
            Intent::Skills => "skills",
            Intent::Education => "education",
            Intent::Experience => "experience",
            Intent::Projects => "projects",
            Intent::Awards => "awards",
            Intent::Summary => "summary",
            Intent::Generic => "generic",
        }
    }
}

/// Ordered `(intent, pattern)` list; the first matching pattern wins.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    patterns: Vec<(Intent, Regex)>,
}

impl IntentRouter {
    pub fn new(patterns: Vec<(Intent, Regex)>) -> Self {
        Self { patterns }
    }

    /// Builds a router from `(intent, alternatives)` pairs. Each alternative
    /// list is wrapped as a case-insensitive `\b(...)\b` pattern.
    pub fn from_alternatives(table: &[(Intent, &str)]) -> Result<Self, regex::Error> {
        let patterns = table
            .iter()
            .map(|(intent, alternatives)| {
                RegexBuilder::new(&format!(r"\b({alternatives})\b"))
                    .case_insensitive(true)
                    .build()
                    .map(|re| (*intent, re))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    pub fn route(&self, query: &str) -> Intent {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(query))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Generic)
    }
}

/// Default patterns. `projects` needs the plural so a question about one
/// specific project is answered from retrieval instead of the project list.
pub const DEFAULT_INTENT_PATTERNS: &[(Intent, &str)] = &[
    (Intent::Email, "email|mail"),
    (Intent::Phone, "phone|mobile|contact number"),
    (Intent::Skills, "skills?|tech|stack|technologies"),
    (
        Intent::Education,
        "education|degree|gpa|university|school|masters|bachelors",
    ),
    (Intent::Experience, "experience|work history|employment"),
    (Intent::Projects, "projects"),
    (Intent::Awards, "awards?|achievements?"),
    (Intent::Summary, "summary|overview|profile"),
];

impl Default for IntentRouter {
    fn default() -> Self {
        Self::from_alternatives(DEFAULT_INTENT_PATTERNS).expect("default intent patterns compile")
    }
}

/// Templated answer for `intent`. Empty only for [`Intent::Generic`].
pub fn render_intent_answer(intent: Intent, resume: &Resume) -> String {
    let basics = &resume.basics;
    match intent {
        Intent::Email => or_missing(basics.email.clone(), "email"),
        Intent::Phone => or_missing(basics.phone.clone(), "phone"),
        Intent::Skills => {
            let lines: Vec<String> = resume
                .skills
                .iter()
                .map(|s| {
                    let name = if s.name.is_empty() { "Skill" } else { s.name.as_str() };
                    if s.keywords.is_empty() {
                        name.to_string()
                    } else {
                        format!("{name}: {}", s.keywords.join(", "))
                    }
                })
                .collect();
            or_missing(lines.join("; "), "skills")
        }
        Intent::Education => {
            let lines: Vec<String> = resume
                .education
                .iter()
                .map(|e| {
                    let gpa = if e.gpa.is_empty() {
                        String::new()
                    } else {
                        format!("GPA {}", e.gpa)
                    };
                    pipe_join(&[
                        e.study_type.as_str(),
                        e.area.as_str(),
                        e.institution.as_str(),
                        gpa.as_str(),
                    ])
                })
                .filter(|line| !line.is_empty())
                .collect();
            or_missing(lines.join("; "), "education")
        }
        Intent::Experience => {
            let lines: Vec<String> = resume
                .work
                .iter()
                .map(|w| {
                    let dates = format!("{}–{}", w.start_date, w.end_date)
                        .trim_matches('–')
                        .to_string();
                    pipe_join(&[w.position.as_str(), w.name.as_str(), dates.as_str()])
                })
                .collect();
            or_missing(lines.join("; "), "experience")
        }
        Intent::Projects => {
            let names: Vec<&str> = resume
                .projects
                .iter()
                .map(|p| if p.name.is_empty() { "Project" } else { p.name.as_str() })
                .collect();
            or_missing(names.join("; "), "projects")
        }
        Intent::Awards => {
            let lines: Vec<String> = resume
                .awards
                .iter()
                .map(|a| {
                    let title = if a.title.is_empty() { "Award" } else { a.title.as_str() };
                    pipe_join(&[title, a.date.as_str()])
                })
                .collect();
            or_missing(lines.join("; "), "awards")
        }
        Intent::Summary => or_missing(basics.summary.clone(), "summary"),
        Intent::Generic => String::new(),
    }
}

fn or_missing(value: String, what: &str) -> String {
    if value.is_empty() {
        format!("No {what} listed.")
    } else {
        value
    }
}

fn pipe_join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" | ")
}
