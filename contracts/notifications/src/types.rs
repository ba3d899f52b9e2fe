use soroban_sdk::{contracttype, Address, String, Vec};

// ==================== Priority & Type ====================

/// Severity level. Critical bypasses every user filter preference.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum NotificationPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Maps one-to-one with the events the HealthVault contracts emit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum NotificationType {
    AppointmentRequested = 0,
    AppointmentAccepted = 1,
    AppointmentRejected = 2,
    AppointmentCancelled = 3,
    AppointmentCompleted = 4,
    RecordUploaded = 5,
    RecordTicketIssued = 6,
    ShareTokenUsed = 7,
    SosAlert = 8,
    LostFoundMatched = 9,
    SystemAlert = 10,
    Custom = 11,
}

// ==================== Status ====================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum NotificationStatus {
    /// Created, not yet acknowledged.
    Unread,
    /// Acknowledged by the recipient.
    Read,
    /// Hidden from default queries: dismissed, filtered out by the
    /// recipient's preferences, or lapsed past its expiry.
    Archived,
}

// ==================== Core Records ====================

/// Per-user delivery preferences.
#[derive(Clone)]
#[contracttype]
pub struct NotificationPreferences {
    /// When false, only Critical notifications surface.
    pub enabled: bool,
    /// Minimum priority to surface (Critical always bypasses this gate).
    pub min_priority: NotificationPriority,
    /// Opted-in `NotificationType` repr values. Empty = all types.
    pub enabled_types: Vec<u32>,
    pub updated_at: u64,
}

/// A single immutable notification record.
#[derive(Clone)]
#[contracttype]
pub struct Notification {
    pub id: u64,
    pub recipient: Address,
    pub sender: Address,
    pub notif_type: NotificationType,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    /// Short summary, max 100 bytes.
    pub title: String,
    /// Full message body, max 500 bytes.
    pub message: String,
    /// Optional linked entity ID (appointment, record, SOS message, …).
    pub reference_id: Option<u64>,
    pub created_at: u64,
    pub read_at: Option<u64>,
    /// Ledger time after which the notification lapses and is archived on
    /// the next read that observes it.
    pub expires_at: Option<u64>,
}

// ==================== Query / Response ====================

/// Filter for the paginated history query. Enum fields use repr values
/// with `u32::MAX` as the "no filter" sentinel (`Option<ContractTypeEnum>`
/// cannot be XDR-serialized).
#[derive(Clone)]
#[contracttype]
pub struct NotificationFilter {
    /// `NotificationStatus` repr value, or `u32::MAX` to skip.
    pub status: u32,
    /// `NotificationType` repr value, or `u32::MAX` to skip.
    pub notif_type: u32,
    /// Minimum `NotificationPriority` repr value, or `u32::MAX` to skip.
    pub min_priority: u32,
    /// Page size — capped internally.
    pub limit: u32,
    /// Matching records to skip (cursor-style pagination).
    pub offset: u32,
}

/// Paginated result set, newest first.
#[derive(Clone)]
#[contracttype]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    /// Total matching records before pagination.
    pub total: u32,
    pub offset: u32,
    pub has_more: bool,
}

// ==================== Stream Poll ====================

/// One batch of the notification stream — the poll-based rendition of the
/// push channel the clients consume. A batch carries everything the wire
/// protocol's `connected`, `new_notification`, `unread_count`, and
/// `heartbeat` messages would:
///
/// - `connected` — true on the opening poll (`cursor == 0`);
/// - `notifications` — unarchived records newer than the cursor;
/// - `unread` — the recipient's unread counter after lazy expiry;
/// - `server_time` — the heartbeat timestamp;
/// - `next_cursor` — pass back on the next poll.
#[derive(Clone)]
#[contracttype]
pub struct StreamBatch {
    pub connected: bool,
    pub notifications: Vec<Notification>,
    pub unread: u32,
    pub server_time: u64,
    pub next_cursor: u64,
    pub has_more: bool,
}

// ==================== Rate Limiting ====================

/// Per-sender rolling-window counter for spam prevention.
#[derive(Clone)]
#[contracttype]
pub struct SenderRate {
    pub count: u32,
    pub window_start: u64,
}
