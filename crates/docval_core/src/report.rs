use serde::Serialize;
use serde_json::{Map, Value};

/// Category keys the validation service is known to emit, in display order.
pub const KNOWN_CATEGORIES: [(&str, &str); 3] = [
    ("CLIENT_INFORMATION", "Client information"),
    ("FIGURES_AND_VALUES", "Figures & values"),
    ("TYPOGRAPHY_AND_LANGUAGE", "Typography & language"),
];

/// Parsed body of a successful validation response.
///
/// The service has shipped two shapes over time; the variant is chosen by the
/// JSON type of the payload rather than by probing individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ValidationReport {
    /// Object keyed by category, each holding `{issue, details}` records.
    ByCategory { categories: Vec<CategoryIssues> },
    /// Array of `{item, points[]}` records.
    ByItem { items: Vec<ItemPoints> },
    /// Valid JSON that is neither an object nor an array.
    Unrecognized { json_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIssues {
    pub key: String,
    pub title: String,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub issue: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemPoints {
    pub item: String,
    pub points: Vec<String>,
}

impl ValidationReport {
    pub fn from_json(payload: Value) -> Self {
        match payload {
            Value::Object(map) => ValidationReport::ByCategory {
                categories: categories_from_map(map),
            },
            Value::Array(entries) => ValidationReport::ByItem {
                items: entries.into_iter().map(item_from_value).collect(),
            },
            other => ValidationReport::Unrecognized {
                json_type: json_type_name(&other).to_string(),
            },
        }
    }

    /// Total number of reported issues (category issues or item points).
    pub fn issue_count(&self) -> usize {
        match self {
            ValidationReport::ByCategory { categories } => {
                categories.iter().map(|c| c.issues.len()).sum()
            }
            ValidationReport::ByItem { items } => items.iter().map(|i| i.points.len()).sum(),
            ValidationReport::Unrecognized { .. } => 0,
        }
    }
}

/// Human title for a category key. Known keys use their fixed titles,
/// anything else is turned from `SOME_KEY` into `Some key`.
pub fn category_title(key: &str) -> String {
    if let Some((_, title)) = KNOWN_CATEGORIES.iter().find(|(known, _)| *known == key) {
        return (*title).to_string();
    }

    let words = key
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => key.to_string(),
    }
}

fn categories_from_map(mut map: Map<String, Value>) -> Vec<CategoryIssues> {
    let mut categories = Vec::with_capacity(map.len());
    for (key, _) in KNOWN_CATEGORIES {
        if let Some(value) = map.remove(key) {
            categories.push(category_from_value(key.to_string(), value));
        }
    }

    let mut rest: Vec<_> = map.into_iter().collect();
    rest.sort_by(|(a, _), (b, _)| a.cmp(b));
    categories.extend(
        rest.into_iter()
            .map(|(key, value)| category_from_value(key, value)),
    );
    categories
}

fn category_from_value(key: String, value: Value) -> CategoryIssues {
    let issues = match value {
        Value::Array(entries) => entries.into_iter().map(issue_from_value).collect(),
        Value::Null => Vec::new(),
        other => vec![issue_from_value(other)],
    };
    CategoryIssues {
        title: category_title(&key),
        key,
        issues,
    }
}

fn issue_from_value(value: Value) -> Issue {
    match value {
        Value::Object(map) => Issue {
            issue: string_field(&map, "issue"),
            details: string_field(&map, "details"),
        },
        other => Issue {
            issue: scalar_text(&other),
            details: String::new(),
        },
    }
}

fn item_from_value(value: Value) -> ItemPoints {
    match value {
        Value::Object(map) => {
            let points = match map.get("points") {
                Some(Value::Array(points)) => points.iter().map(scalar_text).collect(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![scalar_text(other)],
            };
            ItemPoints {
                item: string_field(&map, "item"),
                points,
            }
        }
        other => ItemPoints {
            item: scalar_text(&other),
            points: Vec::new(),
        },
    }
}

fn string_field(map: &Map<String, Value>, field: &str) -> String {
    map.get(field).map(scalar_text).unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_categories_come_first_then_alphabetical() {
        let report = ValidationReport::from_json(json!({
            "ZETA": [],
            "TYPOGRAPHY_AND_LANGUAGE": [],
            "ALPHA_CHECKS": [],
            "CLIENT_INFORMATION": []
        }));
        let ValidationReport::ByCategory { categories } = report else {
            panic!("expected category report");
        };
        let keys: Vec<_> = categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["CLIENT_INFORMATION", "TYPOGRAPHY_AND_LANGUAGE", "ALPHA_CHECKS", "ZETA"]
        );
    }

    #[test]
    fn titles_are_humanised() {
        assert_eq!(category_title("CLIENT_INFORMATION"), "Client information");
        assert_eq!(category_title("FIGURES_AND_VALUES"), "Figures & values");
        assert_eq!(category_title("RISK_WARNINGS"), "Risk warnings");
        assert_eq!(category_title("_"), "_");
    }

    #[test]
    fn records_tolerate_missing_and_odd_fields() {
        let report = ValidationReport::from_json(json!({
            "CLIENT_INFORMATION": [{"issue": "No date"}, "loose text", {"details": 4}]
        }));
        let ValidationReport::ByCategory { categories } = report else {
            panic!("expected category report");
        };
        let issues = &categories[0].issues;
        assert_eq!(issues[0].issue, "No date");
        assert_eq!(issues[0].details, "");
        assert_eq!(issues[1].issue, "loose text");
        assert_eq!(issues[2].details, "4");
    }

    #[test]
    fn item_reports_keep_order_and_empty_points() {
        let report = ValidationReport::from_json(json!([
            {"item": "Header check", "points": []},
            {"item": "Fees", "points": ["Total missing", 12]},
            {"item": "Signature"}
        ]));
        assert_eq!(
            report,
            ValidationReport::ByItem {
                items: vec![
                    ItemPoints {
                        item: "Header check".into(),
                        points: vec![],
                    },
                    ItemPoints {
                        item: "Fees".into(),
                        points: vec!["Total missing".into(), "12".into()],
                    },
                    ItemPoints {
                        item: "Signature".into(),
                        points: vec![],
                    },
                ]
            }
        );
        assert_eq!(report.issue_count(), 2);
    }

    #[test]
    fn scalars_are_unrecognized() {
        assert_eq!(
            ValidationReport::from_json(json!("done")),
            ValidationReport::Unrecognized {
                json_type: "string".into()
            }
        );
    }
}
