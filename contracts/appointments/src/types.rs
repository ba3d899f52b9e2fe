use soroban_sdk::{contracttype, Address, String, Symbol};

// ==================== Configuration ====================

#[derive(Clone)]
#[contracttype]
pub struct Config {
    pub admin: Address,
    /// The patient_access contract consulted for roles and gate decisions.
    pub access_contract: Address,
}

// ==================== Appointments ====================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum AppointmentType {
    Consultation = 0,
    FollowUp = 1,
    Examination = 2,
    Telehealth = 3,
}

/// Lifecycle states. A patient request starts `Pending`; the doctor moves
/// it to `Accepted` or `Rejected`; an accepted appointment ends `Completed`
/// or `NoShow`. Either party may cancel before completion.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[contracttype]
#[repr(u32)]
pub enum AppointmentStatus {
    Pending = 0,
    Accepted = 1,
    Rejected = 2,
    Cancelled = 3,
    Completed = 4,
    NoShow = 5,
}

#[derive(Clone)]
#[contracttype]
pub struct Appointment {
    pub id: u64,
    pub patient: Address,
    pub doctor: Address,
    pub scheduled_at: u64,
    pub duration_minutes: u32,
    pub appt_type: AppointmentType,
    pub status: AppointmentStatus,
    /// Patient-stated reason, max 200 bytes.
    pub reason: String,
    /// Doctor notes visible to the patient.
    pub notes_shared: String,
    /// Doctor notes redacted from every viewer except the doctor.
    pub notes_private: String,
    /// Set by the doctor on an accepted appointment; cleared on completion.
    pub running_late: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// One entry in an appointment's change trail.
///
/// `previous_status` uses the `AppointmentStatus` repr value, with
/// `u32::MAX` standing for "no previous status" on the creation entry.
#[derive(Clone)]
#[contracttype]
pub struct AppointmentHistoryEntry {
    pub appointment_id: u64,
    pub action: Symbol,
    pub actor: Address,
    pub previous_status: u32,
    pub new_status: u32,
    pub at: u64,
}
