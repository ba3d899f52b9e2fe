use soroban_sdk::{contracttype, Address, String};

// ==================== SOS Queue ====================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum SosStatus {
    Open = 0,
    Acknowledged = 1,
    Resolved = 2,
}

/// One emergency message. The queue is strict FIFO: operators work the
/// oldest open message first.
#[derive(Clone)]
#[contracttype]
pub struct SosMessage {
    pub id: u64,
    pub reporter: Address,
    /// Callback contact, max 100 bytes.
    pub contact: String,
    /// Free-text emergency description, max 500 bytes.
    pub message: String,
    pub status: SosStatus,
    pub created_at: u64,
    pub updated_at: u64,
}

// ==================== Lost & Found ====================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum ReportKind {
    Lost,
    Found,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum ReportStatus {
    Open = 0,
    Matched = 1,
    Closed = 2,
}

#[derive(Clone)]
#[contracttype]
pub struct LostFoundReport {
    pub id: u64,
    pub kind: ReportKind,
    /// Short label for the item or person, max 100 bytes.
    pub label: String,
    /// Longer description, max 500 bytes.
    pub description: String,
    /// Where it was lost or found, max 200 bytes.
    pub location: String,
    pub reported_by: Address,
    pub status: ReportStatus,
    /// The counterpart report once linked by an operator.
    pub matched_with: Option<u64>,
    pub created_at: u64,
}

// ==================== Rate Limiting ====================

/// Per-reporter rolling-window counter shared by SOS and lost/found
/// submissions.
#[derive(Clone)]
#[contracttype]
pub struct SubmitRate {
    pub count: u32,
    pub window_start: u64,
}
