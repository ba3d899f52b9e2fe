use soroban_sdk::{contracttype, Address, String, Vec};

// ==================== Configuration ====================

/// Contract configuration, set once at initialization.
#[derive(Clone)]
#[contracttype]
pub struct Config {
    pub admin: Address,
    /// The patient_access contract that answers every role, token, and
    /// gate query.
    pub access_contract: Address,
}

// ==================== Records ====================

/// Document category. Mirrors the grouping the record vault presents:
/// reports, prescriptions, bills, insurance, everything else.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum RecordCategory {
    Report = 0,
    Prescription = 1,
    Bill = 2,
    Insurance = 3,
    Other = 4,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum RecordStatus {
    Available,
    Archived,
}

/// Metadata for one uploaded document. The document body lives in external
/// object storage; `data_ref` is its storage key.
#[derive(Clone)]
#[contracttype]
pub struct RecordMeta {
    pub record_id: u64,
    pub patient: Address,
    pub uploaded_by: Address,
    /// Display title, max 120 bytes.
    pub title: String,
    pub category: RecordCategory,
    /// Exact media type from the supported allow-list.
    pub mime_type: String,
    pub size_bytes: u64,
    /// Object-store key, 10–200 bytes.
    pub data_ref: String,
    pub status: RecordStatus,
    pub uploaded_at: u64,
}

/// Category-grouped listing envelope. Archived records are omitted.
#[derive(Clone)]
#[contracttype]
pub struct RecordGroups {
    pub reports: Vec<RecordMeta>,
    pub prescriptions: Vec<RecordMeta>,
    pub bills: Vec<RecordMeta>,
    pub insurance: Vec<RecordMeta>,
    pub other: Vec<RecordMeta>,
}

// ==================== File Tickets ====================

/// What a ticket authorizes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum TicketKind {
    Preview,
    Download,
}

/// A short-lived grant to fetch one document from object storage — the
/// on-chain stand-in for a signed URL. Expired tickets are deleted on the
/// first status read that observes them.
#[derive(Clone)]
#[contracttype]
pub struct FileTicket {
    pub ticket_id: u64,
    pub record_id: u64,
    pub patient: Address,
    pub kind: TicketKind,
    pub issued_at: u64,
    pub expires_at: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum TicketState {
    Valid,
    Expired,
    Unknown,
}
