#![no_std]
#![allow(clippy::too_many_arguments)]


mod errors;
mod events;
mod types;
mod validation;

pub use errors::{get_suggestion, Error};
pub use types::{
    Config, FileTicket, RecordCategory, RecordGroups, RecordMeta, RecordStatus, TicketKind,
    TicketState,
};

use soroban_sdk::{contract, contractimpl, contracttype, Address, BytesN, Env, String, Vec};

use patient_access::{AccessDecision, PatientAccessContractClient};

// ==================== Storage Keys ====================

#[contracttype]
pub enum DataKey {
    // Singleton — instance storage
    Config,

    // Records — persistent
    RecordCount,             // u64 — monotonic ID counter
    Record(u64),             // RecordMeta
    PatientRecords(Address), // Vec<u64> — insertion order

    // File tickets — persistent
    TicketCount, // u64 — monotonic ID counter
    Ticket(u64), // FileTicket
}

// ==================== Constants ====================

/// Lifetime of a file ticket: 15 minutes, matching the object store's
/// signed-URL policy.
pub const TICKET_TTL_SECS: u64 = 900;
/// Maximum live records per patient.
const MAX_PATIENT_RECORDS: u32 = 500;

// ==================== Contract ====================

#[contract]
pub struct MedicalRecordsContract;

#[contractimpl]
impl MedicalRecordsContract {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Initialise with the admin and the patient_access contract that
    /// answers every role and gate query.
    pub fn initialize(env: Env, admin: Address, access_contract: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        let config = Config {
            admin,
            access_contract,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        Ok(Self::read_config(&env)?.admin)
    }

    /// Point at a replacement patient_access deployment. Admin only.
    pub fn set_access_contract(
        env: Env,
        caller: Address,
        access_contract: Address,
    ) -> Result<(), Error> {
        let mut config = Self::read_config(&env)?;
        caller.require_auth();
        if caller != config.admin {
            return Err(Error::NotAuthorized);
        }
        config.access_contract = access_contract.clone();
        env.storage().instance().set(&DataKey::Config, &config);
        events::emit_access_contract_set(&env, caller, access_contract);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Store metadata for an uploaded document. The uploader must be an
    /// active doctor, or the patient uploading to their own vault.
    pub fn add_record(
        env: Env,
        uploader: Address,
        patient: Address,
        title: String,
        category: RecordCategory,
        mime_type: String,
        size_bytes: u64,
        data_ref: String,
    ) -> Result<u64, Error> {
        let config = Self::read_config(&env)?;
        uploader.require_auth();

        let access = PatientAccessContractClient::new(&env, &config.access_contract);
        let self_upload = uploader == patient && access.is_active_patient(&uploader);
        if !self_upload && !access.is_active_doctor(&uploader) {
            return Err(Error::NotAuthorized);
        }

        validation::validate_title(&title)?;
        validation::validate_mime_type(&env, &mime_type)?;
        validation::validate_size(size_bytes)?;
        validation::validate_data_ref(&data_ref)?;

        let mut ids = Self::read_patient_records(&env, &patient);
        if ids.len() >= MAX_PATIENT_RECORDS {
            return Err(Error::RecordLimitReached);
        }

        let record_id = Self::next_record_id(&env);
        let record = RecordMeta {
            record_id,
            patient: patient.clone(),
            uploaded_by: uploader.clone(),
            title,
            category,
            mime_type,
            size_bytes,
            data_ref,
            status: RecordStatus::Available,
            uploaded_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Record(record_id), &record);

        ids.push_back(record_id);
        env.storage()
            .persistent()
            .set(&DataKey::PatientRecords(patient.clone()), &ids);

        events::emit_record_added(&env, record_id, patient, uploader, category as u32);
        Ok(record_id)
    }

    /// Fetch one record's metadata. Access is re-derived through the gate
    /// on every read; a denial is surfaced as `NotAuthorized`.
    pub fn get_record(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        record_id: u64,
    ) -> Result<RecordMeta, Error> {
        let config = Self::read_config(&env)?;
        let record = Self::load_record(&env, record_id)?;

        Self::require_gate(&env, &config, viewer.clone(), token, &record.patient)?;
        events::emit_record_accessed(&env, record_id, record.patient.clone(), viewer);
        Ok(record)
    }

    /// List a patient's live records grouped by category — the envelope the
    /// record vault serves (`reports`/`prescriptions`/`bills`/`insurance`
    /// plus `other`). Missing data is an empty group, never an error.
    pub fn list_records(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        patient: Address,
    ) -> Result<RecordGroups, Error> {
        let config = Self::read_config(&env)?;
        Self::require_gate(&env, &config, viewer, token, &patient)?;

        let ids = Self::read_patient_records(&env, &patient);
        let mut groups = RecordGroups {
            reports: Vec::new(&env),
            prescriptions: Vec::new(&env),
            bills: Vec::new(&env),
            insurance: Vec::new(&env),
            other: Vec::new(&env),
        };
        for id in ids.iter() {
            let record: RecordMeta = match env.storage().persistent().get(&DataKey::Record(id)) {
                Some(r) => r,
                None => continue,
            };
            if record.status == RecordStatus::Archived {
                continue;
            }
            match record.category {
                RecordCategory::Report => groups.reports.push_back(record),
                RecordCategory::Prescription => groups.prescriptions.push_back(record),
                RecordCategory::Bill => groups.bills.push_back(record),
                RecordCategory::Insurance => groups.insurance.push_back(record),
                RecordCategory::Other => groups.other.push_back(record),
            }
        }
        Ok(groups)
    }

    /// Archive a record so it no longer appears in listings. The uploader,
    /// the patient, or the admin may archive.
    pub fn archive_record(env: Env, caller: Address, record_id: u64) -> Result<(), Error> {
        let config = Self::read_config(&env)?;
        caller.require_auth();

        let mut record = Self::load_record(&env, record_id)?;
        if caller != record.uploaded_by && caller != record.patient && caller != config.admin {
            return Err(Error::NotAuthorized);
        }
        if record.status == RecordStatus::Archived {
            return Err(Error::RecordArchived);
        }
        record.status = RecordStatus::Archived;
        let patient = record.patient.clone();
        let category = record.category;
        env.storage()
            .persistent()
            .set(&DataKey::Record(record_id), &record);

        events::emit_record_archived(&env, record_id, patient, caller, category as u32);
        Ok(())
    }

    // ------------------------------------------------------------------
    // File Tickets
    // ------------------------------------------------------------------

    /// Issue a short-lived preview/download ticket for one document — the
    /// signed-URL analog. Issuing re-runs the access gate.
    pub fn issue_file_ticket(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        record_id: u64,
        kind: TicketKind,
    ) -> Result<u64, Error> {
        let config = Self::read_config(&env)?;
        let record = Self::load_record(&env, record_id)?;
        if record.status == RecordStatus::Archived {
            return Err(Error::RecordArchived);
        }
        Self::require_gate(&env, &config, viewer, token, &record.patient)?;

        let now = env.ledger().timestamp();
        let expires_at = now + TICKET_TTL_SECS;
        let ticket_id = Self::next_ticket_id(&env);
        let ticket = FileTicket {
            ticket_id,
            record_id,
            patient: record.patient.clone(),
            kind,
            issued_at: now,
            expires_at,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Ticket(ticket_id), &ticket);

        events::emit_ticket_issued(&env, ticket_id, record_id, record.patient, expires_at);
        Ok(ticket_id)
    }

    /// Check whether a ticket is still redeemable. An expired ticket is
    /// deleted on the read that observes it.
    pub fn ticket_status(env: Env, ticket_id: u64) -> TicketState {
        let key = DataKey::Ticket(ticket_id);
        let ticket: FileTicket = match env.storage().persistent().get(&key) {
            Some(t) => t,
            None => return TicketState::Unknown,
        };
        if ticket.expires_at <= env.ledger().timestamp() {
            env.storage().persistent().remove(&key);
            events::emit_ticket_expired(&env, ticket_id, ticket.record_id, ticket.patient);
            return TicketState::Expired;
        }
        TicketState::Valid
    }

    /// Fetch a live ticket. Expired or unknown tickets are `TicketNotFound`.
    pub fn get_ticket(env: Env, ticket_id: u64) -> Result<FileTicket, Error> {
        match Self::ticket_status(env.clone(), ticket_id) {
            TicketState::Valid => env
                .storage()
                .persistent()
                .get(&DataKey::Ticket(ticket_id))
                .ok_or(Error::TicketNotFound),
            _ => Err(Error::TicketNotFound),
        }
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    fn read_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn load_record(env: &Env, record_id: u64) -> Result<RecordMeta, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Record(record_id))
            .ok_or(Error::RecordNotFound)
    }

    fn read_patient_records(env: &Env, patient: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::PatientRecords(patient.clone()))
            .unwrap_or_else(|| Vec::new(env))
    }

    fn next_record_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::RecordCount)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().persistent().set(&DataKey::RecordCount, &id);
        id
    }

    fn next_ticket_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::TicketCount)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().persistent().set(&DataKey::TicketCount, &id);
        id
    }

    /// One call into the access gate; the gate audits the decision on its
    /// side, this contract only enforces the outcome.
    fn require_gate(
        env: &Env,
        config: &Config,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        patient: &Address,
    ) -> Result<(), Error> {
        let access = PatientAccessContractClient::new(env, &config.access_contract);
        match access.check_patient_access(&viewer, &token, patient) {
            AccessDecision::Granted(_) => Ok(()),
            AccessDecision::Denied => Err(Error::NotAuthorized),
        }
    }
}
