use serde::Serialize;

/// Sentinel used by every categorical selector for "no filter".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub const ALL: [Self; 3] = [Self::Present, Self::Absent, Self::Late];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Present),
            1 => Some(Self::Absent),
            2 => Some(Self::Late),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum BatchType {
    #[sqlx(rename = "coding")]
    #[serde(rename = "coding")]
    Coding,
    #[sqlx(rename = "web-intermediate")]
    #[serde(rename = "web-intermediate")]
    WebIntermediate,
    #[sqlx(rename = "web-basic-tally")]
    #[serde(rename = "web-basic-tally")]
    WebBasicTally,
}

impl BatchType {
    pub const ALL: [Self; 3] = [Self::Coding, Self::WebIntermediate, Self::WebBasicTally];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::WebIntermediate => "web-intermediate",
            Self::WebBasicTally => "web-basic-tally",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Coding),
            1 => Some(Self::WebIntermediate),
            2 => Some(Self::WebBasicTally),
            _ => None,
        }
    }

    /// Accepts the stored form as well as the labels used on paper registers
    /// ("Web Basic + Tally", "web_intermediate", ...).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "coding" => Some(Self::Coding),
            "webintermediate" => Some(Self::WebIntermediate),
            "webbasictally" | "webbasic" => Some(Self::WebBasicTally),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Coding => "Coding",
            Self::WebIntermediate => "Web Intermediate",
            Self::WebBasicTally => "Web Basic + Tally",
        }
    }
}

/// Direction of a spreadsheet transfer, as written to the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Import,
    Export,
}

impl TransferKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::Export => "Export",
        }
    }
}

/// Tables owned by the store. Every mutation is announced per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Students,
    Teachers,
    Batches,
    Attendance,
    DailyReports,
    ExportLogs,
}

impl Table {
    pub const ALL: [Self; 6] = [
        Self::Students,
        Self::Teachers,
        Self::Batches,
        Self::Attendance,
        Self::DailyReports,
        Self::ExportLogs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Teachers => "teachers",
            Self::Batches => "batches",
            Self::Attendance => "attendance",
            Self::DailyReports => "daily_reports",
            Self::ExportLogs => "export_logs",
        }
    }
}
