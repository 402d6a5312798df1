/// Capture status as reported by `capture_status/<uuid>`.
use serde::{Deserialize, Serialize};

/// Lifecycle state of a capture. The instance owns every transition
/// (`Queued -> Ongoing -> Done`); the client only observes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CaptureStatus {
    /// The identifier is not known to the instance.
    #[default]
    Unknown,
    /// Waiting in the queue.
    Queued,
    /// Finished; the result can be fetched.
    Done,
    /// Currently being captured.
    Ongoing,
}

impl CaptureStatus {
    /// Wire value used by the instance.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => -1,
            Self::Queued => 0,
            Self::Done => 1,
            Self::Ongoing => 2,
        }
    }

    /// Lowercase name, as printed by the CLI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Queued => "queued",
            Self::Done => "done",
            Self::Ongoing => "ongoing",
        }
    }

    #[must_use]
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

impl TryFrom<i64> for CaptureStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Unknown),
            0 => Ok(Self::Queued),
            1 => Ok(Self::Done),
            2 => Ok(Self::Ongoing),
            other => Err(format!("unknown capture status code {other}")),
        }
    }
}

impl From<CaptureStatus> for i64 {
    fn from(status: CaptureStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus queue position, when the instance reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStatusReport {
    pub status: CaptureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

/// The two shapes `capture_status` answers with: a bare integer, or an object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum StatusPayload {
    Bare(CaptureStatus),
    Report(CaptureStatusReport),
}

impl From<StatusPayload> for CaptureStatusReport {
    fn from(payload: StatusPayload) -> Self {
        match payload {
            StatusPayload::Bare(status) => Self {
                status,
                position: None,
            },
            StatusPayload::Report(report) => report,
        }
    }
}
