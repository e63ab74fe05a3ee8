use serde::Serialize;

use crate::{SubmissionState, ValidationReport};

pub const NO_ISSUES_PLACEHOLDER: &str = "No issues found";
pub const UNRECOGNIZED_NOTICE: &str = "The response did not match a known report format";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub submission: SubmissionState,
    pub selected_file: Option<String>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    /// Present only while `Succeeded`.
    pub report: Option<ReportView>,
    /// Present only while `Failed`.
    pub error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub sections: Vec<SectionView>,
    /// Shown instead of sections when there is nothing to list.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub heading: String,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryView {
    Issue { issue: String, details: String },
    Point { text: String },
    NoIssues,
}

impl ReportView {
    pub fn from_report(report: &ValidationReport) -> Self {
        match report {
            ValidationReport::ByCategory { categories } => {
                let sections: Vec<_> = categories
                    .iter()
                    .filter(|category| !category.issues.is_empty())
                    .map(|category| SectionView {
                        heading: category.title.clone(),
                        entries: category
                            .issues
                            .iter()
                            .map(|issue| EntryView::Issue {
                                issue: issue.issue.clone(),
                                details: issue.details.clone(),
                            })
                            .collect(),
                    })
                    .collect();
                let notice = sections
                    .is_empty()
                    .then(|| NO_ISSUES_PLACEHOLDER.to_string());
                Self { sections, notice }
            }
            ValidationReport::ByItem { items } => {
                let sections: Vec<_> = items
                    .iter()
                    .map(|item| SectionView {
                        heading: item.item.clone(),
                        entries: if item.points.is_empty() {
                            vec![EntryView::NoIssues]
                        } else {
                            item.points
                                .iter()
                                .map(|point| EntryView::Point {
                                    text: point.clone(),
                                })
                                .collect()
                        },
                    })
                    .collect();
                let notice = sections
                    .is_empty()
                    .then(|| NO_ISSUES_PLACEHOLDER.to_string());
                Self { sections, notice }
            }
            ValidationReport::Unrecognized { .. } => Self {
                sections: Vec::new(),
                notice: Some(UNRECOGNIZED_NOTICE.to_string()),
            },
        }
    }
}
