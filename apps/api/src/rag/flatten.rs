//! Résumé flattening and field weighting.
//!
//! The résumé is walked in a fixed order (summary, skills, projects, work,
//! education, awards) and every entry becomes one document. Each document also
//! carries a boosted token rendering that only the lexical index ever sees.

use serde::Serialize;

use crate::models::resume::Resume;
use crate::rag::calibration::Calibration;
use crate::rag::text::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocTag {
    Summary,
    Skill,
    Project,
    Experience,
    Education,
    Award,
}

/// A flattened entry before weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatDoc {
    pub tag: DocTag,
    pub title: String,
    pub content: String,
}

/// An indexed document. Never mutated after the index is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub tag: DocTag,
    pub title: String,
    pub content: String,
    /// Scoring-only rendering; never shown to users.
    pub weighted_text: String,
}

impl Document {
    pub fn new(flat: FlatDoc, calibration: &Calibration) -> Self {
        let weighted_text = weighted_text(flat.tag, &flat.title, &flat.content, calibration);
        Self {
            tag: flat.tag,
            title: flat.title,
            content: flat.content,
            weighted_text,
        }
    }

    /// `"{title}. {content}"`, the text used for display and overlap scoring.
    pub fn raw_text(&self) -> String {
        format!("{}. {}", self.title, self.content).trim().to_string()
    }
}

/// Number of extra copies of a document's tokens for a given boost.
pub fn repetitions(boost: f64, scale: f64) -> usize {
    let extra = ((boost - 1.0) * scale).floor();
    if extra > 0.0 {
        extra as usize
    } else {
        0
    }
}

/// Token rendering of `title + content`, repeated `1 + repetitions` times.
pub fn weighted_text(tag: DocTag, title: &str, content: &str, calibration: &Calibration) -> String {
    let tokens = tokenize(&format!("{title}\n{content}"));
    let copies = 1 + repetitions(
        calibration.boosts.for_tag(tag),
        calibration.repetition_scale,
    );

    let mut out = Vec::with_capacity(tokens.len() * copies);
    for _ in 0..copies {
        out.extend(tokens.iter().map(String::as_str));
    }
    out.join(" ")
}

pub fn flatten(resume: &Resume) -> Vec<FlatDoc> {
    let mut docs = Vec::new();

    if !resume.basics.summary.is_empty() {
        docs.push(flat(DocTag::Summary, "Summary".to_string(), resume.basics.summary.clone()));
    }

    for skill in &resume.skills {
        docs.push(flat(
            DocTag::Skill,
            format!("Skill: {}", or(&skill.name, "Skill")),
            skill.keywords.join(", "),
        ));
    }

    for project in &resume.projects {
        let body = join_present(&[
            project.description.clone(),
            project.highlights.join(" "),
            project.tech.join(" "),
        ]);
        docs.push(flat(
            DocTag::Project,
            format!("Project: {}", or(&project.name, "Project")),
            body,
        ));
    }

    for work in &resume.work {
        let dates = format!("{} - {}", work.start_date, work.end_date)
            .trim_matches(|c: char| c == ' ' || c == '-')
            .to_string();
        let mut title = format!(
            "Experience: {} – {}",
            or(&work.name, "Company"),
            or(&work.position, "Role")
        );
        if !dates.is_empty() {
            title.push_str(&format!(" ({dates})"));
        }
        let body = join_present(&[work.summary.clone(), work.highlights.join(" ")]);
        docs.push(flat(DocTag::Experience, title, body));
    }

    for edu in &resume.education {
        docs.push(flat(
            DocTag::Education,
            format!("Education: {}", or(&edu.institution, "Institution")),
            join_present(&[edu.study_type.clone(), edu.area.clone()]),
        ));
    }

    for award in &resume.awards {
        docs.push(flat(
            DocTag::Award,
            format!("Award: {}", or(&award.title, "Award")),
            join_present(&[award.date.clone(), award.summary.clone()]),
        ));
    }

    docs.retain(|d| !(d.title.trim().is_empty() && d.content.trim().is_empty()));
    docs
}

fn flat(tag: DocTag, title: String, content: String) -> FlatDoc {
    FlatDoc {
        tag,
        title,
        content,
    }
}

fn or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Joins the non-empty parts with a single space.
fn join_present(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
