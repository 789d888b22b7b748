use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgendaError {
    #[error("`{field}` must not be blank")]
    BlankField { field: &'static str },
}

/// One scheduled onboarding activity.
///
/// Fields are private so every item goes through [`AgendaItem::new`] and the
/// blank-field checks there. `terminal` marks the closing slide of the day,
/// whose duration is printed without the clock icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    time: String,
    duration: String,
    title: String,
    description: String,
    terminal: bool,
}

impl AgendaItem {
    pub fn new(
        time: impl Into<String>,
        duration: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, AgendaError> {
        let item = Self {
            time: time.into(),
            duration: duration.into(),
            title: title.into(),
            description: description.into(),
            terminal: false,
        };
        item.check_fields()?;
        Ok(item)
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    fn check_fields(&self) -> Result<(), AgendaError> {
        for (field, value) in [("time", &self.time), ("duration", &self.duration), ("title", &self.title)] {
            if value.trim().is_empty() {
                return Err(AgendaError::BlankField { field });
            }
        }
        Ok(())
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// An agenda item as written in a config file, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub time: String,
    pub duration: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub terminal: bool,
}

impl AgendaEntry {
    pub fn into_item(self) -> Result<AgendaItem, AgendaError> {
        Ok(AgendaItem::new(self.time, self.duration, self.title, self.description)?.with_terminal(self.terminal))
    }
}

// (time, duration, title, description)
const NEW_HIRE_DAY: [(&str, &str, &str, &str); 12] = [
    ("10:00 AM", "15 Min", "Welcome & Greetings", "Warm welcome to FinBox by HR Team"),
    ("10:15 AM", "30 Min", "Introduction to Finbox", "Company history, milestones, roadmap, and key leadership overview."),
    ("10:45 AM", "30 Min", "Office Tour", "Walkthrough of office space, key teams, and amenities."),
    ("11:15 AM", "15 Min", "Morning Break", "Short recharge before the deep dive."),
    ("11:30 AM", "30 Min", "Product Training", "Brief Intro and walkthrough on the FinBox products."),
    ("12:00 PM", "90 Min", "IT Setup & Induction", "Laptop handover, account setup, IT policy orientation."),
    ("01:30 PM", "90 Min", "Lunch with Buddy", "Lunch and informal interaction with assigned buddy."),
    ("03:00 PM", "60 Min", "HR Policies & HRMS", "Introduction to HR processes, perks, benefits, HRMS navigation."),
    ("04:00 PM", "30 Min", "Docs & Compliance", "Complete statutory forms and finalize onboarding documents."),
    ("04:30 PM", "15 Min", "Evening Break", "Tea/Coffee break."),
    ("04:45 PM", "60 Min", "POSH Training", "Mandatory Prevention of Sexual Harassment awareness session."),
    ("05:45 PM", "30 Min", "HRBP Connect", "Discussion with HRBP on role expectations, next steps."),
];

/// The built-in new-hire day. The closing session is flagged terminal.
pub fn default_agenda() -> Vec<AgendaItem> {
    let last = NEW_HIRE_DAY.len() - 1;
    NEW_HIRE_DAY
        .iter()
        .enumerate()
        .map(|(i, &(time, duration, title, description))| AgendaItem {
            time: time.to_string(),
            duration: duration.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            terminal: i == last,
        })
        .collect()
}
