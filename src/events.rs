//! Canonical lifecycle events.
//!
//! Both event sources (debounced buttons and remote commands) reduce their
//! raw input to a [`LifecycleEvent`].  Reasons are an explicit enum; free
//! text from the outside world only enters through
//! [`DowntimeReason::from_label`], which owns the synonym table.
//!
//! ```text
//! ┌──────────────┐
//! │ Button edge  │──┐
//! └──────────────┘  │   ┌────────────────┐     ┌──────────────┐
//!                   ├──▶│ LifecycleEvent │────▶│ Press FSM    │
//! ┌──────────────┐  │   └────────────────┘     └──────────────┘
//! │ MQTT command │──┘
//! └──────────────┘
//! ```

use core::fmt;

/// Why the press was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DowntimeReason {
    MaintenanceRequired,
    QualityIssue,
    MaterialIssue,
    ToolChange,
}

/// Accepted spellings, matched ASCII case-insensitively after trimming.
/// The first entry of each row is the canonical label.
const REASON_TABLE: [(DowntimeReason, &[&str]); 4] = [
    (
        DowntimeReason::MaintenanceRequired,
        &["Maintenance Required", "Maintenance"],
    ),
    (DowntimeReason::QualityIssue, &["Quality Issue"]),
    (DowntimeReason::MaterialIssue, &["Material Issue"]),
    (DowntimeReason::ToolChange, &["Tool Change"]),
];

impl DowntimeReason {
    pub const ALL: [Self; 4] = [
        Self::MaintenanceRequired,
        Self::QualityIssue,
        Self::MaterialIssue,
        Self::ToolChange,
    ];

    /// The single spelling sent to the backend and to operators.
    pub fn label(self) -> &'static str {
        match self {
            Self::MaintenanceRequired => "Maintenance Required",
            Self::QualityIssue => "Quality Issue",
            Self::MaterialIssue => "Material Issue",
            Self::ToolChange => "Tool Change",
        }
    }

    /// Normalise free text to a reason.  `None` for anything unrecognised.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        REASON_TABLE
            .iter()
            .find(|(_, spellings)| spellings.iter().any(|s| s.eq_ignore_ascii_case(text)))
            .map(|(reason, _)| *reason)
    }
}

impl fmt::Display for DowntimeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A canonical input that may advance the press state machine.
/// Consumed exactly once by [`AppService::handle_event`](crate::app::service::AppService::handle_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    StartStopPressed,
    ReasonSelected(DowntimeReason),
}

/// Where an event came from; carried for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Button,
    Remote,
}
