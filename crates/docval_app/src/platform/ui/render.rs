use std::io::{self, Write};

use docval_core::{AppViewModel, EntryView, ReportView, SubmissionState, NO_ISSUES_PLACEHOLDER};
use serde::Serialize;

use super::constants::*;

/// One line of terminal output. Errors go to stderr, everything else to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Title(String),
    Heading(String),
    Entry { index: usize, text: String },
    Placeholder(String),
    Notice(String),
    Error(String),
}

pub fn render(file: &str, view: &AppViewModel) -> Vec<Line> {
    let mut lines = vec![Line::Title(format!("{file} [{}]", view.submission))];

    match view.submission {
        SubmissionState::Failed => {
            if let Some(error) = &view.error {
                lines.push(Line::Error(error.clone()));
            }
        }
        SubmissionState::Succeeded => {
            if let Some(report) = &view.report {
                render_report(report, &mut lines);
            }
        }
        SubmissionState::Idle | SubmissionState::Submitting => {
            lines.push(Line::Notice(view.submit_label.to_string()));
        }
    }
    lines
}

/// Output for a file that never reached the service.
pub fn render_rejected(file: &str, reason: &str) -> Vec<Line> {
    vec![
        Line::Title(format!("{file} [{}]", SubmissionState::Failed)),
        Line::Error(reason.to_string()),
    ]
}

fn render_report(report: &ReportView, lines: &mut Vec<Line>) {
    for section in &report.sections {
        lines.push(Line::Heading(section.heading.clone()));
        let mut index = 0;
        for entry in &section.entries {
            match entry {
                EntryView::Issue { issue, details } => {
                    index += 1;
                    let text = if details.is_empty() {
                        issue.clone()
                    } else {
                        format!("{issue}: {details}")
                    };
                    lines.push(Line::Entry { index, text });
                }
                EntryView::Point { text } => {
                    index += 1;
                    lines.push(Line::Entry {
                        index,
                        text: text.clone(),
                    });
                }
                EntryView::NoIssues => {
                    lines.push(Line::Placeholder(NO_ISSUES_PLACEHOLDER.to_string()))
                }
            }
        }
    }
    if let Some(notice) = &report.notice {
        lines.push(Line::Notice(notice.clone()));
    }
}

pub fn write_lines(out: &mut impl Write, err: &mut impl Write, lines: &[Line]) -> io::Result<()> {
    for line in lines {
        match line {
            Line::Title(text) => writeln!(out, "{text}")?,
            Line::Heading(text) => writeln!(out, "{HEADING_MARKER} {text}")?,
            Line::Entry { index, text } => writeln!(out, "{ENTRY_INDENT}{index}. {text}")?,
            Line::Placeholder(text) => {
                writeln!(out, "{ENTRY_INDENT}{PLACEHOLDER_BULLET} {text}")?
            }
            Line::Notice(text) => writeln!(out, "{ENTRY_INDENT}{text}")?,
            Line::Error(text) => writeln!(err, "{ERROR_PREFIX}: {text}")?,
        }
    }
    Ok(())
}

/// JSON record printed per file with `--json`.
#[derive(Debug, Serialize)]
pub struct SubmissionSummary<'a> {
    pub file: &'a str,
    pub state: SubmissionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a ReportView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> SubmissionSummary<'a> {
    pub fn from_view(file: &'a str, view: &'a AppViewModel) -> Self {
        Self {
            file,
            state: view.submission,
            report: view.report.as_ref(),
            error: view.error.as_deref(),
        }
    }

    pub fn rejected(file: &'a str, reason: &'a str) -> Self {
        Self {
            file,
            state: SubmissionState::Failed,
            report: None,
            error: Some(reason),
        }
    }
}
