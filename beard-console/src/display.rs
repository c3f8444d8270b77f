//! Result labels and their display colors
//!
//! Every workflow maps its current result to a [`ResultLabel`]; one
//! function, [`display_color`], turns any label into a color.

use crate::models::Decision;
use serde::Serialize;
use std::fmt;

/// Fixed display palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DisplayColor {
    /// Neutral grey for placeholders
    #[default]
    Idle,
    Success,
    Warning,
    Error,
}

impl DisplayColor {
    /// CSS hex value
    pub fn hex(&self) -> &'static str {
        match self {
            DisplayColor::Idle => "#7f8c8d",
            DisplayColor::Success => "#27ae60",
            DisplayColor::Warning => "#d35400",
            DisplayColor::Error => "#c0392b",
        }
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Text shown for a workflow that has not produced a result
pub const IDLE_TEXT: &str = "Idle";

/// What a workflow currently displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultLabel {
    /// No result yet
    Idle,
    /// Clustering table is ready
    Clusters,
    /// Phonetic block code
    Phonetic(String),
    /// Coreness decision
    Decision(Decision),
    /// Failure message
    Failed(String),
}

impl ResultLabel {
    /// Text a single-line renderer shows for this label
    pub fn text(&self) -> String {
        match self {
            ResultLabel::Idle => IDLE_TEXT.to_string(),
            ResultLabel::Clusters => "Clusters".to_string(),
            ResultLabel::Phonetic(code) => code.clone(),
            ResultLabel::Decision(decision) => decision.to_string(),
            ResultLabel::Failed(message) => message.clone(),
        }
    }
}

/// Map a label to its display color
pub fn display_color(label: &ResultLabel) -> DisplayColor {
    match label {
        ResultLabel::Idle => DisplayColor::Idle,
        ResultLabel::Clusters | ResultLabel::Phonetic(_) => DisplayColor::Success,
        ResultLabel::Decision(Decision::Core) => DisplayColor::Success,
        ResultLabel::Decision(Decision::NonCore) => DisplayColor::Warning,
        ResultLabel::Decision(Decision::Other(_)) => DisplayColor::Error,
        ResultLabel::Failed(_) => DisplayColor::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_colors() {
        assert_eq!(
            display_color(&ResultLabel::Decision(Decision::Core)),
            DisplayColor::Success
        );
        assert_eq!(
            display_color(&ResultLabel::Decision(Decision::NonCore)),
            DisplayColor::Warning
        );
        assert_eq!(
            display_color(&ResultLabel::Decision(Decision::Other("Maybe".into()))),
            DisplayColor::Error
        );
    }

    #[test]
    fn test_phonetic_is_always_success() {
        assert_eq!(
            display_color(&ResultLabel::Phonetic("SMIT-J".into())),
            DisplayColor::Success
        );
        assert_eq!(DisplayColor::Success.hex(), "#27ae60");
    }

    #[test]
    fn test_idle_and_failed() {
        assert_eq!(display_color(&ResultLabel::Idle), DisplayColor::Idle);
        assert_eq!(ResultLabel::Idle.text(), "Idle");
        assert_eq!(DisplayColor::default().to_string(), "#7f8c8d");
        assert_eq!(
            display_color(&ResultLabel::Failed("boom".into())),
            DisplayColor::Error
        );
    }
}
