use soroban_sdk::{contracttype, Address, String};

// ==================== Identity ====================

/// Role held by a registered user. `None` is the unregistered default.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    None,
}

/// Per-address profile. Display fields exist so the recent-patient cache
/// can snapshot them; they are never consulted for authorization.
#[derive(Clone)]
#[contracttype]
pub struct UserProfile {
    pub role: Role,
    pub active: bool,
    /// Display name, max 100 bytes.
    pub name: String,
    /// Contact email, max 100 bytes.
    pub email: String,
    /// Contact number, max 20 bytes.
    pub mobile: String,
    pub registered_at: u64,
}

// ==================== Share Tokens ====================

/// A patient-issued, time-limited capability keyed by the 32-byte digest of
/// the QR payload. Expiry is enforced lazily: the first touch after
/// `expires_at` marks the token revoked in place.
#[derive(Clone)]
#[contracttype]
pub struct ShareToken {
    pub patient: Address,
    pub issued_at: u64,
    pub expires_at: u64,
    pub revoked: bool,
    /// Successful gate grants through this token.
    pub use_count: u32,
}

// ==================== Viewer Classification ====================

/// Outcome of classifying a request context. Priority order is fixed:
/// a persisted session always shadows a share token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
pub enum ViewerRole {
    Doctor,
    Patient,
    Anonymous,
    Unauthenticated,
}

/// Classification result. `subject` is the patient the viewer is scoped to:
/// the viewer themself for a patient session, the token's patient for an
/// anonymous viewer, and absent otherwise.
#[derive(Clone)]
#[contracttype]
pub struct ResolvedViewer {
    pub role: ViewerRole,
    pub subject: Option<Address>,
}

// ==================== Access Gate ====================

/// Which credential satisfied the gate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum AccessPath {
    DoctorSession = 0,
    PatientSelf = 1,
    ShareToken = 2,
}

/// Atomic gate decision. Denial is a normal outcome, not an error; callers
/// that cannot proceed on denial use `require_patient_access` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub enum AccessDecision {
    Granted(AccessPath),
    Denied,
}

// ==================== Recent-Patient Cache ====================

/// Display-only snapshot of a patient a doctor recently looked up.
/// Entries expire seven days after the write that created them and are
/// garbage-collected on the next read.
#[derive(Clone)]
#[contracttype]
pub struct CachedPatient {
    pub patient: Address,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub cached_at: u64,
    pub expires_at: u64,
}

// ==================== Audit ====================

/// One gate decision, appended for every grant and every denial.
///
/// `path` holds the `AccessPath` repr value, or `u32::MAX` when the
/// decision was a denial (`Option<AccessPath>` cannot be XDR-serialized,
/// so the sentinel convention is used).
#[derive(Clone)]
#[contracttype]
pub struct AccessAudit {
    pub viewer: Option<Address>,
    pub patient: Address,
    pub path: u32,
    pub granted: bool,
    pub at: u64,
}
