use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Advisory,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Advisory => "Advisory",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Severity::Info => Color::Gray,
            Severity::Advisory => Color::Blue,
            Severity::Warning => Color::Yellow,
            Severity::Critical => Color::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Advisory => "→",
            Severity::Warning => "⚠",
            Severity::Critical => "!",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// A note attached to a fertilizer recommendation, e.g. a missed
/// application window or a rainfall reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub explanation: String,
    pub data_points: Vec<DataPoint>,
    pub suggested_action: Option<String>,
}

impl Advisory {
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            title: title.into(),
            description: description.into(),
            explanation: String::new(),
            data_points: Vec::new(),
            suggested_action: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_data_point(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        self.data_points.push(DataPoint::new(label, value));
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Advisory);
        assert!(Severity::Advisory < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn advisory_builder_pattern() {
        let advisory = Advisory::new("late_season", Severity::Critical, "Too Late", "Past 90 days")
            .with_explanation("Uptake is low")
            .with_data_point("Plant Age", "95 days")
            .with_action("Skip further applications");

        assert_eq!(advisory.id, "late_season");
        assert_eq!(advisory.severity, Severity::Critical);
        assert_eq!(advisory.explanation, "Uptake is low");
        assert_eq!(advisory.data_points, vec![DataPoint::new("Plant Age", "95 days")]);
        assert_eq!(
            advisory.suggested_action,
            Some("Skip further applications".to_string())
        );
    }
}
