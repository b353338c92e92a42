use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scheduled meeting as the backend describes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project_id: i64,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub documentation_links: Vec<String>,
    #[serde(default)]
    pub additional_information: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub google_calendar_event_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A knowledge source attached to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Meeting details plus the fields the meeting-info panel derives from them
#[derive(Debug, Clone, Serialize)]
pub struct MeetingInfo {
    #[serde(flatten)]
    pub details: MeetingDetails,
    pub duration: Option<String>,
    pub primary_attendee: Option<Attendee>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attendee {
    pub email: String,
    pub display_name: String,
    pub initials: String,
}

impl From<MeetingDetails> for MeetingInfo {
    fn from(details: MeetingDetails) -> Self {
        let duration = duration_label(&details.start_time, &details.end_time);
        let primary_attendee = details.attendees.first().map(|email| {
            let display_name = attendee_display_name(email);
            Attendee {
                email: email.clone(),
                initials: attendee_initials(&display_name),
                display_name,
            }
        });

        Self {
            details,
            duration,
            primary_attendee,
        }
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Formats the span between two timestamps as `"1h 30m"`
///
/// Zero parts are left out; a span under a minute reads `"0m"`. Returns
/// `None` if either timestamp is unreadable or the end precedes the start.
pub fn duration_label(start: &str, end: &str) -> Option<String> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        return None;
    }

    let (hours, minutes) = (minutes / 60, minutes % 60);
    let label = match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    };
    Some(label)
}

/// `jane.doe@company.com` becomes `Jane Doe`
pub fn attendee_display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Upper-cased first letters of the first two words
pub fn attendee_initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Case-insensitive name search over a project list
pub fn filter_projects(projects: Vec<Project>, search: &str) -> Vec<Project> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return projects;
    }
    projects
        .into_iter()
        .filter(|project| project.name.to_lowercase().contains(&needle))
        .collect()
}
