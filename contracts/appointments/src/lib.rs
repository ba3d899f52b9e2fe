#![no_std]
#![allow(clippy::too_many_arguments)]

#[cfg(test)]
mod test;

mod errors;
mod events;
mod types;

pub use errors::{get_suggestion, Error};
pub use types::{
    Appointment, AppointmentHistoryEntry, AppointmentStatus, AppointmentType, Config,
};

use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, BytesN, Env, String, Symbol, Vec,
};

use patient_access::{AccessDecision, PatientAccessContractClient};

// ==================== Storage Keys ====================

#[contracttype]
pub enum DataKey {
    // Singleton — instance storage
    Config,

    // Appointments — persistent
    ApptCount,            // u64 — monotonic ID counter
    Appt(u64),            // Appointment
    PatientAppts(Address), // Vec<u64> — insertion order
    DoctorAppts(Address),  // Vec<u64> — insertion order
    History(u64),         // Vec<AppointmentHistoryEntry>
}

// ==================== Constants ====================

const MIN_DURATION_MINUTES: u32 = 5;
const MAX_DURATION_MINUTES: u32 = 240;
const MAX_REASON_LEN: u32 = 200;
const MAX_NOTES_LEN: u32 = 500;
const MAX_PAGE_SIZE: u32 = 50;

/// History sentinel for "no previous status" on the creation entry.
pub const NO_STATUS: u32 = u32::MAX;

// ==================== Contract ====================

#[contract]
pub struct AppointmentsContract;

#[contractimpl]
impl AppointmentsContract {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

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

    // ------------------------------------------------------------------
    // Requesting
    // ------------------------------------------------------------------

    /// A patient requests an appointment with a doctor. Both parties must
    /// hold the matching active roles; the slot must lie in the future.
    pub fn request_appointment(
        env: Env,
        patient: Address,
        doctor: Address,
        scheduled_at: u64,
        duration_minutes: u32,
        appt_type: AppointmentType,
        reason: String,
    ) -> Result<u64, Error> {
        let config = Self::read_config(&env)?;
        patient.require_auth();

        let access = PatientAccessContractClient::new(&env, &config.access_contract);
        if !access.is_active_patient(&patient) {
            return Err(Error::NotAuthorized);
        }
        if !access.is_active_doctor(&doctor) {
            return Err(Error::NotAuthorized);
        }

        let now = env.ledger().timestamp();
        if scheduled_at <= now {
            return Err(Error::InvalidSchedule);
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(Error::InvalidDuration);
        }
        if reason.len() > MAX_REASON_LEN {
            return Err(Error::ReasonTooLong);
        }

        let id = Self::next_appt_id(&env);
        let appt = Appointment {
            id,
            patient: patient.clone(),
            doctor: doctor.clone(),
            scheduled_at,
            duration_minutes,
            appt_type,
            status: AppointmentStatus::Pending,
            reason,
            notes_shared: String::from_str(&env, ""),
            notes_private: String::from_str(&env, ""),
            running_late: false,
            created_at: now,
            updated_at: now,
        };
        Self::store_appt(&env, &appt);

        let mut patient_ids = Self::read_index(&env, &DataKey::PatientAppts(patient.clone()));
        patient_ids.push_back(id);
        env.storage()
            .persistent()
            .set(&DataKey::PatientAppts(patient.clone()), &patient_ids);

        let mut doctor_ids = Self::read_index(&env, &DataKey::DoctorAppts(doctor.clone()));
        doctor_ids.push_back(id);
        env.storage()
            .persistent()
            .set(&DataKey::DoctorAppts(doctor.clone()), &doctor_ids);

        Self::push_history(
            &env,
            id,
            symbol_short!("CREATED"),
            patient.clone(),
            NO_STATUS,
            AppointmentStatus::Pending as u32,
        );
        events::emit_requested(
            &env,
            id,
            patient,
            doctor,
            AppointmentStatus::Pending as u32,
        );
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Doctor transitions
    // ------------------------------------------------------------------

    /// `Pending → Accepted`. The appointment's doctor only.
    pub fn accept(env: Env, doctor: Address, id: u64) -> Result<(), Error> {
        let mut appt = Self::load_for_doctor(&env, &doctor, id)?;
        Self::require_status(&appt, AppointmentStatus::Pending)?;

        let prev = appt.status;
        appt.status = AppointmentStatus::Accepted;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("ACCEPTED"),
            doctor,
            prev as u32,
            appt.status as u32,
        );
        events::emit_accepted(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    /// `Pending → Rejected`. The appointment's doctor only.
    pub fn reject(env: Env, doctor: Address, id: u64) -> Result<(), Error> {
        let mut appt = Self::load_for_doctor(&env, &doctor, id)?;
        Self::require_status(&appt, AppointmentStatus::Pending)?;

        let prev = appt.status;
        appt.status = AppointmentStatus::Rejected;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("REJECTED"),
            doctor,
            prev as u32,
            appt.status as u32,
        );
        events::emit_rejected(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    /// `Accepted → Completed`. The appointment's doctor only. Completing
    /// clears any running-late flag.
    pub fn complete(env: Env, doctor: Address, id: u64) -> Result<(), Error> {
        let mut appt = Self::load_for_doctor(&env, &doctor, id)?;
        Self::require_status(&appt, AppointmentStatus::Accepted)?;

        let prev = appt.status;
        appt.status = AppointmentStatus::Completed;
        appt.running_late = false;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("COMPLETED"),
            doctor,
            prev as u32,
            appt.status as u32,
        );
        events::emit_completed(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    /// `Accepted → NoShow`, only once the scheduled time has passed.
    pub fn mark_no_show(env: Env, doctor: Address, id: u64) -> Result<(), Error> {
        let mut appt = Self::load_for_doctor(&env, &doctor, id)?;
        Self::require_status(&appt, AppointmentStatus::Accepted)?;
        if env.ledger().timestamp() < appt.scheduled_at {
            return Err(Error::NotYetDue);
        }

        let prev = appt.status;
        appt.status = AppointmentStatus::NoShow;
        appt.running_late = false;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("NO_SHOW"),
            doctor,
            prev as u32,
            appt.status as u32,
        );
        events::emit_no_show(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    /// Flag an accepted appointment as running late. Status is unchanged.
    pub fn flag_running_late(env: Env, doctor: Address, id: u64) -> Result<(), Error> {
        let mut appt = Self::load_for_doctor(&env, &doctor, id)?;
        Self::require_status(&appt, AppointmentStatus::Accepted)?;

        appt.running_late = true;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("LATE"),
            doctor,
            appt.status as u32,
            appt.status as u32,
        );
        events::emit_running_late(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    /// Replace the doctor's notes. The shared note is visible to the
    /// patient; the private note never leaves the doctor.
    pub fn update_notes(
        env: Env,
        doctor: Address,
        id: u64,
        notes_shared: String,
        notes_private: String,
    ) -> Result<(), Error> {
        let mut appt = Self::load_for_doctor(&env, &doctor, id)?;
        if notes_shared.len() > MAX_NOTES_LEN || notes_private.len() > MAX_NOTES_LEN {
            return Err(Error::NotesTooLong);
        }

        appt.notes_shared = notes_shared;
        appt.notes_private = notes_private;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("NOTES"),
            doctor,
            appt.status as u32,
            appt.status as u32,
        );
        events::emit_notes_updated(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cancellation
    // ------------------------------------------------------------------

    /// `Pending | Accepted → Cancelled`, by either party.
    pub fn cancel(env: Env, caller: Address, id: u64) -> Result<(), Error> {
        Self::read_config(&env)?;
        caller.require_auth();

        let mut appt = Self::load_appt(&env, id)?;
        if caller != appt.patient && caller != appt.doctor {
            return Err(Error::NotAuthorized);
        }
        if !matches!(
            appt.status,
            AppointmentStatus::Pending | AppointmentStatus::Accepted
        ) {
            return Err(Error::InvalidTransition);
        }

        let prev = appt.status;
        appt.status = AppointmentStatus::Cancelled;
        appt.running_late = false;
        appt.updated_at = env.ledger().timestamp();
        Self::store_appt(&env, &appt);
        Self::push_history(
            &env,
            id,
            symbol_short!("CANCELLED"),
            caller,
            prev as u32,
            appt.status as u32,
        );
        events::emit_cancelled(&env, id, appt.patient, appt.doctor, appt.status as u32);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Fetch one appointment. Access is derived through the gate on the
    /// appointment's patient; the private note is redacted for every viewer
    /// except the appointment's doctor.
    pub fn get_appointment(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        id: u64,
    ) -> Result<Appointment, Error> {
        let config = Self::read_config(&env)?;
        let appt = Self::load_appt(&env, id)?;
        Self::require_gate(&env, &config, viewer.clone(), token, &appt.patient)?;
        Ok(Self::redact_for(&env, appt, &viewer))
    }

    /// A patient's appointments, oldest first, paginated.
    pub fn list_for_patient(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        patient: Address,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Appointment>, Error> {
        let config = Self::read_config(&env)?;
        Self::validate_page_size(page_size)?;
        Self::require_gate(&env, &config, viewer.clone(), token, &patient)?;

        let ids = Self::read_index(&env, &DataKey::PatientAppts(patient));
        Ok(Self::page_appointments(&env, &ids, page, page_size, &viewer))
    }

    /// A doctor's own appointments, oldest first, paginated.
    pub fn list_for_doctor(
        env: Env,
        doctor: Address,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Appointment>, Error> {
        let config = Self::read_config(&env)?;
        doctor.require_auth();
        Self::validate_page_size(page_size)?;

        let access = PatientAccessContractClient::new(&env, &config.access_contract);
        if !access.is_active_doctor(&doctor) {
            return Err(Error::NotAuthorized);
        }

        let ids = Self::read_index(&env, &DataKey::DoctorAppts(doctor.clone()));
        // No redaction: the caller is the doctor on every listed entry.
        Ok(Self::page_appointments(&env, &ids, page, page_size, &Some(doctor)))
    }

    /// The change trail for one appointment: its parties or the admin.
    pub fn get_history(
        env: Env,
        caller: Address,
        id: u64,
    ) -> Result<Vec<AppointmentHistoryEntry>, Error> {
        let config = Self::read_config(&env)?;
        caller.require_auth();
        let appt = Self::load_appt(&env, id)?;
        if caller != appt.patient && caller != appt.doctor && caller != config.admin {
            return Err(Error::NotAuthorized);
        }
        Ok(env
            .storage()
            .persistent()
            .get(&DataKey::History(id))
            .unwrap_or_else(|| Vec::new(&env)))
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

    /// One call into the access gate; a denial surfaces as `NotAuthorized`.
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

    fn load_appt(env: &Env, id: u64) -> Result<Appointment, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Appt(id))
            .ok_or(Error::AppointmentNotFound)
    }

    /// Load + authorize a doctor-side transition: the caller signs, must be
    /// this appointment's doctor, and must still hold an active role.
    fn load_for_doctor(env: &Env, doctor: &Address, id: u64) -> Result<Appointment, Error> {
        let config = Self::read_config(env)?;
        doctor.require_auth();
        let appt = Self::load_appt(env, id)?;
        if *doctor != appt.doctor {
            return Err(Error::NotAuthorized);
        }
        let access = PatientAccessContractClient::new(env, &config.access_contract);
        if !access.is_active_doctor(doctor) {
            return Err(Error::NotAuthorized);
        }
        Ok(appt)
    }

    fn require_status(appt: &Appointment, expected: AppointmentStatus) -> Result<(), Error> {
        if appt.status != expected {
            return Err(Error::InvalidTransition);
        }
        Ok(())
    }

    fn store_appt(env: &Env, appt: &Appointment) {
        env.storage()
            .persistent()
            .set(&DataKey::Appt(appt.id), appt);
    }

    fn read_index(env: &Env, key: &DataKey) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(key)
            .unwrap_or_else(|| Vec::new(env))
    }

    fn next_appt_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::ApptCount)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().persistent().set(&DataKey::ApptCount, &id);
        id
    }

    fn push_history(
        env: &Env,
        id: u64,
        action: Symbol,
        actor: Address,
        previous_status: u32,
        new_status: u32,
    ) {
        let mut trail: Vec<AppointmentHistoryEntry> = env
            .storage()
            .persistent()
            .get(&DataKey::History(id))
            .unwrap_or_else(|| Vec::new(env));
        trail.push_back(AppointmentHistoryEntry {
            appointment_id: id,
            action,
            actor,
            previous_status,
            new_status,
            at: env.ledger().timestamp(),
        });
        env.storage().persistent().set(&DataKey::History(id), &trail);
    }

    fn validate_page_size(page_size: u32) -> Result<(), Error> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageSize);
        }
        Ok(())
    }

    fn page_appointments(
        env: &Env,
        ids: &Vec<u64>,
        page: u32,
        page_size: u32,
        viewer: &Option<Address>,
    ) -> Vec<Appointment> {
        let start = page * page_size;
        let end = ((page + 1) * page_size).min(ids.len());
        let mut out = Vec::new(env);
        if start >= ids.len() {
            return out;
        }
        for i in start..end {
            let id = match ids.get(i) {
                Some(id) => id,
                None => break,
            };
            if let Some(appt) = env
                .storage()
                .persistent()
                .get::<DataKey, Appointment>(&DataKey::Appt(id))
            {
                out.push_back(Self::redact_for(env, appt, viewer));
            }
        }
        out
    }

    /// The private note is only readable by the appointment's doctor.
    fn redact_for(env: &Env, mut appt: Appointment, viewer: &Option<Address>) -> Appointment {
        let is_own_doctor = matches!(viewer, Some(v) if *v == appt.doctor);
        if !is_own_doctor {
            appt.notes_private = String::from_str(env, "");
        }
        appt
    }
}
