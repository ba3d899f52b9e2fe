#![no_std]
#![allow(clippy::too_many_arguments)]


mod cache;
mod errors;
mod events;
mod types;

pub use errors::{get_suggestion, Error};
pub use types::{
    AccessAudit, AccessDecision, AccessPath, CachedPatient, ResolvedViewer, Role, ShareToken,
    UserProfile, ViewerRole,
};

use soroban_sdk::{contract, contractimpl, contracttype, Address, BytesN, Env, String, Vec};

// ==================== Storage Keys ====================

#[contracttype]
pub enum DataKey {
    // Singleton / lifecycle — instance storage
    Initialized,
    Admin,
    Paused,

    // Identity — persistent
    Profile(Address), // UserProfile

    // Share tokens — persistent
    Token(BytesN<32>), // ShareToken

    // Recent-patient display cache — persistent
    Recent(Address), // Vec<CachedPatient>

    // Access audit — persistent
    AuditCount, // u64 — monotonic ID counter
    Audit(u64), // AccessAudit
}

// ==================== Constants ====================

/// Longest lifetime a share token may be issued with: 30 days.
pub const MAX_SHARE_TTL_SECS: u64 = 2_592_000;
/// Sentinel stored in audit entries for decisions with no access path.
pub const NO_PATH: u32 = u32::MAX;

// String byte-length ceilings for profile display fields.
const MAX_NAME_LEN: u32 = 100;
const MAX_EMAIL_LEN: u32 = 100;
const MAX_MOBILE_LEN: u32 = 20;

/// Maximum page size for audit-log queries.
const MAX_PAGE_SIZE: u32 = 50;

// ==================== Contract ====================

#[contract]
pub struct PatientAccessContract;

#[contractimpl]
impl PatientAccessContract {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Initialise the contract. Must be called exactly once. The admin
    /// receives an `Admin` profile and manages all registrations.
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Paused, &false);

        let profile = UserProfile {
            role: Role::Admin,
            active: true,
            name: String::from_str(&env, ""),
            email: String::from_str(&env, ""),
            mobile: String::from_str(&env, ""),
            registered_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Profile(admin), &profile);
        Ok(())
    }

    /// Returns the current admin address.
    pub fn get_admin(env: Env) -> Result<Address, Error> {
        Self::require_initialized(&env)?;
        Ok(Self::read_admin(&env))
    }

    /// Halt all state-mutating entrypoints. Admin only.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        env.storage().instance().set(&DataKey::Paused, &true);
        events::emit_pause_changed(&env, caller, true);
        Ok(())
    }

    /// Resume after a pause. Admin only.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        env.storage().instance().set(&DataKey::Paused, &false);
        events::emit_pause_changed(&env, caller, false);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    /// Register (or re-register) a doctor or patient. Admin only.
    /// Re-registering an existing user refreshes the display fields and
    /// reactivates the profile; the original registration time is kept.
    pub fn register_user(
        env: Env,
        caller: Address,
        user: Address,
        role: Role,
        name: String,
        email: String,
        mobile: String,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_not_paused(&env)?;
        Self::require_admin(&env, &caller)?;

        if !matches!(role, Role::Doctor | Role::Patient) {
            return Err(Error::RoleMismatch);
        }
        Self::validate_display_fields(&name, &email, &mobile)?;

        let registered_at = Self::read_profile(&env, &user)
            .map(|p| p.registered_at)
            .unwrap_or_else(|| env.ledger().timestamp());
        let profile = UserProfile {
            role,
            active: true,
            name,
            email,
            mobile,
            registered_at,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Profile(user.clone()), &profile);

        events::emit_user_registered(&env, user, caller, role as u32);
        Ok(())
    }

    /// Deactivate a user. Admin only. Deactivated sessions fail every
    /// classification and gate check until re-registered.
    pub fn deactivate_user(env: Env, caller: Address, user: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_not_paused(&env)?;
        Self::require_admin(&env, &caller)?;

        let mut profile = Self::read_profile(&env, &user).ok_or(Error::UserNotFound)?;
        profile.active = false;
        let role = profile.role;
        env.storage()
            .persistent()
            .set(&DataKey::Profile(user.clone()), &profile);

        events::emit_user_deactivated(&env, user, caller, role as u32);
        Ok(())
    }

    /// Fetch a profile by address.
    pub fn get_profile(env: Env, user: Address) -> Result<UserProfile, Error> {
        Self::require_initialized(&env)?;
        Self::read_profile(&env, &user).ok_or(Error::UserNotFound)
    }

    /// Returns the role held by `user`, `Role::None` if unregistered.
    pub fn get_role(env: Env, user: Address) -> Role {
        match Self::read_profile(&env, &user) {
            Some(profile) => profile.role,
            None => Role::None,
        }
    }

    /// True if `user` holds an active Doctor profile. Consumed
    /// cross-contract by the records and appointments contracts.
    pub fn is_active_doctor(env: Env, user: Address) -> bool {
        matches!(
            Self::read_profile(&env, &user),
            Some(UserProfile { role: Role::Doctor, active: true, .. })
        )
    }

    /// True if `user` holds an active Patient profile.
    pub fn is_active_patient(env: Env, user: Address) -> bool {
        matches!(
            Self::read_profile(&env, &user),
            Some(UserProfile { role: Role::Patient, active: true, .. })
        )
    }

    // ------------------------------------------------------------------
    // Share Tokens
    // ------------------------------------------------------------------

    /// Register a share token: the 32-byte digest of a QR payload the
    /// patient hands out for scoped access to their own record. A token id
    /// is single-issue; re-using a digest is rejected even after revocation.
    pub fn issue_share_token(
        env: Env,
        patient: Address,
        token: BytesN<32>,
        ttl_secs: u64,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        patient.require_auth();
        Self::require_not_paused(&env)?;
        Self::require_role(&env, &patient, Role::Patient)?;

        if ttl_secs == 0 || ttl_secs > MAX_SHARE_TTL_SECS {
            return Err(Error::InvalidTtl);
        }
        if env.storage().persistent().has(&DataKey::Token(token.clone())) {
            return Err(Error::TokenExists);
        }

        let now = env.ledger().timestamp();
        let expires_at = now + ttl_secs;
        let record = ShareToken {
            patient: patient.clone(),
            issued_at: now,
            expires_at,
            revoked: false,
            use_count: 0,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Token(token.clone()), &record);

        events::emit_token_issued(&env, token, patient, expires_at);
        Ok(())
    }

    /// Revoke a share token before its expiry. Issuer only.
    pub fn revoke_share_token(
        env: Env,
        patient: Address,
        token: BytesN<32>,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        patient.require_auth();
        Self::require_not_paused(&env)?;

        let key = DataKey::Token(token.clone());
        let mut record: ShareToken = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::TokenNotFound)?;
        if record.patient != patient {
            return Err(Error::NotAuthorized);
        }
        if record.revoked {
            return Err(Error::TokenRevoked);
        }
        record.revoked = true;
        env.storage().persistent().set(&key, &record);

        events::emit_token_revoked(&env, token, patient);
        Ok(())
    }

    /// Resolve a share token to its subject patient, or `None` if the
    /// token is unknown, revoked, or expired. An expired token is marked
    /// revoked in place on first touch.
    pub fn resolve_token(env: Env, token: BytesN<32>) -> Option<Address> {
        Self::resolve_token_internal(&env, &token)
    }

    /// Fetch the stored token record, for the issuing patient or admin.
    pub fn get_share_token(
        env: Env,
        caller: Address,
        token: BytesN<32>,
    ) -> Result<ShareToken, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let record: ShareToken = env
            .storage()
            .persistent()
            .get(&DataKey::Token(token))
            .ok_or(Error::TokenNotFound)?;
        if record.patient != caller && !Self::is_admin(&env, &caller) {
            return Err(Error::NotAuthorized);
        }
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Role Resolver
    // ------------------------------------------------------------------

    /// Classify a request context into exactly one viewer role. Pure read;
    /// first match wins, and a persisted session always shadows a token:
    ///
    /// 1. viewer with an active Doctor profile  → Doctor
    /// 2. viewer with an active Patient profile → Patient (subject = self)
    /// 3. no viewer, valid token                → Anonymous (subject = token's patient)
    /// 4. otherwise                             → Unauthenticated
    pub fn classify(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
    ) -> ResolvedViewer {
        if let Some(v) = viewer {
            return match Self::read_profile(&env, &v) {
                Some(UserProfile { role: Role::Doctor, active: true, .. }) => ResolvedViewer {
                    role: ViewerRole::Doctor,
                    subject: None,
                },
                Some(UserProfile { role: Role::Patient, active: true, .. }) => ResolvedViewer {
                    role: ViewerRole::Patient,
                    subject: Some(v),
                },
                // A present-but-invalid session never falls through to the
                // token path; the caller must re-authenticate.
                _ => ResolvedViewer {
                    role: ViewerRole::Unauthenticated,
                    subject: None,
                },
            };
        }
        if let Some(t) = token {
            if let Some(patient) = Self::peek_token(&env, &t) {
                return ResolvedViewer {
                    role: ViewerRole::Anonymous,
                    subject: Some(patient),
                };
            }
        }
        ResolvedViewer {
            role: ViewerRole::Unauthenticated,
            subject: None,
        }
    }

    // ------------------------------------------------------------------
    // Patient Access Gate
    // ------------------------------------------------------------------

    /// Decide whether the given context may view `patient`'s data. The
    /// decision is atomic and validity-checked: an active doctor session,
    /// the patient themself, or a live token scoped to this exact patient.
    /// Every decision, grant or denial, is audited and emitted.
    pub fn check_patient_access(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        patient: Address,
    ) -> Result<AccessDecision, Error> {
        Self::require_initialized(&env)?;
        Self::require_not_paused(&env)?;
        if let Some(ref v) = viewer {
            v.require_auth();
        }

        let decision = if let Some(ref v) = viewer {
            match Self::read_profile(&env, v) {
                Some(UserProfile { role: Role::Doctor, active: true, .. }) => {
                    AccessDecision::Granted(AccessPath::DoctorSession)
                }
                Some(UserProfile { role: Role::Patient, active: true, .. }) if *v == patient => {
                    AccessDecision::Granted(AccessPath::PatientSelf)
                }
                _ => AccessDecision::Denied,
            }
        } else if let Some(ref t) = token {
            match Self::resolve_token_internal(&env, t) {
                Some(subject) if subject == patient => {
                    Self::bump_token_use(&env, t);
                    AccessDecision::Granted(AccessPath::ShareToken)
                }
                _ => AccessDecision::Denied,
            }
        } else {
            AccessDecision::Denied
        };

        let (granted, path) = match &decision {
            AccessDecision::Granted(p) => (true, *p as u32),
            AccessDecision::Denied => (false, NO_PATH),
        };
        Self::log_decision(&env, viewer.clone(), patient.clone(), path, granted);
        events::emit_gate_decision(&env, viewer, patient, path, granted);
        Ok(decision)
    }

    /// Gate variant for callers that cannot proceed on denial: maps
    /// `Denied` to `Error::NotAuthorized` and returns the satisfied path.
    pub fn require_patient_access(
        env: Env,
        viewer: Option<Address>,
        token: Option<BytesN<32>>,
        patient: Address,
    ) -> Result<AccessPath, Error> {
        match Self::check_patient_access(env, viewer, token, patient)? {
            AccessDecision::Granted(path) => Ok(path),
            AccessDecision::Denied => Err(Error::NotAuthorized),
        }
    }

    // ------------------------------------------------------------------
    // Recent-Patient Cache
    // ------------------------------------------------------------------

    /// Snapshot `patient`'s display fields into the doctor's recent list.
    /// Upsert by patient id; a fresh write resets the 7-day expiry.
    pub fn remember_patient(env: Env, doctor: Address, patient: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        doctor.require_auth();
        Self::require_not_paused(&env)?;
        Self::require_role(&env, &doctor, Role::Doctor)?;

        let profile = Self::read_profile(&env, &patient).ok_or(Error::UserNotFound)?;
        if profile.role != Role::Patient {
            return Err(Error::RoleMismatch);
        }

        let now = env.ledger().timestamp();
        let expires_at = now + cache::RECENT_TTL_SECS;
        let entry = CachedPatient {
            patient: patient.clone(),
            name: profile.name,
            email: profile.email,
            mobile: profile.mobile,
            cached_at: now,
            expires_at,
        };
        cache::upsert(&env, &doctor, entry);

        events::emit_patient_remembered(&env, doctor, patient, expires_at);
        Ok(())
    }

    /// Returns the doctor's still-valid recent patients. Expired entries
    /// are dropped from storage as a side effect of the read.
    pub fn recent_patients(env: Env, doctor: Address) -> Result<Vec<CachedPatient>, Error> {
        Self::require_initialized(&env)?;
        doctor.require_auth();
        Self::require_role(&env, &doctor, Role::Doctor)?;
        Ok(cache::load_valid(&env, &doctor))
    }

    /// Drop one entry from the doctor's recent list.
    pub fn forget_patient(env: Env, doctor: Address, patient: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        doctor.require_auth();
        if !cache::remove(&env, &doctor, &patient) {
            return Err(Error::NotCached);
        }
        events::emit_patient_forgotten(&env, doctor, patient);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------

    /// Paginated audit-log query. The admin sees every decision; a patient
    /// sees only decisions about their own record.
    pub fn get_access_log(
        env: Env,
        caller: Address,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<AccessAudit>, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageSize);
        }

        let total: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::AuditCount)
            .unwrap_or(0);
        let mut entries = Vec::new(&env);

        if Self::is_admin(&env, &caller) {
            let start = (page as u64) * (page_size as u64) + 1;
            let end = ((page as u64) + 1) * (page_size as u64);
            let actual_end = end.min(total);
            let mut i = start;
            while i <= actual_end {
                if let Some(entry) = env
                    .storage()
                    .persistent()
                    .get::<DataKey, AccessAudit>(&DataKey::Audit(i))
                {
                    entries.push_back(entry);
                }
                i += 1;
            }
        } else {
            // Non-admin callers see only entries about themselves.
            let skip = page * page_size;
            let mut matched: u32 = 0;
            let mut i = 1u64;
            while i <= total {
                if let Some(entry) = env
                    .storage()
                    .persistent()
                    .get::<DataKey, AccessAudit>(&DataKey::Audit(i))
                {
                    if entry.patient == caller {
                        if matched >= skip && matched < skip + page_size {
                            entries.push_back(entry);
                        }
                        matched += 1;
                    }
                }
                i += 1;
            }
        }
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    fn require_initialized(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    fn require_not_paused(env: &Env) -> Result<(), Error> {
        let paused: bool = env
            .storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false);
        if paused {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        if !Self::is_admin(env, caller) {
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }

    fn is_admin(env: &Env, addr: &Address) -> bool {
        match env
            .storage()
            .instance()
            .get::<DataKey, Address>(&DataKey::Admin)
        {
            Some(admin) => admin == *addr,
            None => false,
        }
    }

    fn read_admin(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .unwrap_or_else(|| panic!("admin not set"))
    }

    fn read_profile(env: &Env, user: &Address) -> Option<UserProfile> {
        env.storage()
            .persistent()
            .get(&DataKey::Profile(user.clone()))
    }

    /// The caller must hold the exact role and be active.
    fn require_role(env: &Env, user: &Address, role: Role) -> Result<(), Error> {
        match Self::read_profile(env, user) {
            Some(profile) if profile.role == role => {
                if profile.active {
                    Ok(())
                } else {
                    Err(Error::UserInactive)
                }
            }
            _ => Err(Error::NotAuthorized),
        }
    }

    /// Read-only token validity check used by the pure classifier.
    fn peek_token(env: &Env, token: &BytesN<32>) -> Option<Address> {
        let record: ShareToken = env
            .storage()
            .persistent()
            .get(&DataKey::Token(token.clone()))?;
        if record.revoked || record.expires_at <= env.ledger().timestamp() {
            return None;
        }
        Some(record.patient)
    }

    /// Validity check with lazy expiry: an expired token is revoked in
    /// place so later reads short-circuit.
    fn resolve_token_internal(env: &Env, token: &BytesN<32>) -> Option<Address> {
        let key = DataKey::Token(token.clone());
        let mut record: ShareToken = env.storage().persistent().get(&key)?;
        if record.revoked {
            return None;
        }
        if record.expires_at <= env.ledger().timestamp() {
            record.revoked = true;
            env.storage().persistent().set(&key, &record);
            events::emit_token_expired(env, token.clone(), record.patient, record.expires_at);
            return None;
        }
        Some(record.patient)
    }

    fn bump_token_use(env: &Env, token: &BytesN<32>) {
        let key = DataKey::Token(token.clone());
        if let Some(mut record) = env.storage().persistent().get::<DataKey, ShareToken>(&key) {
            record.use_count = record.use_count.saturating_add(1);
            env.storage().persistent().set(&key, &record);
            events::emit_token_used(env, token.clone(), record.patient, record.use_count);
        }
    }

    fn log_decision(env: &Env, viewer: Option<Address>, patient: Address, path: u32, granted: bool) {
        let count: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::AuditCount)
            .unwrap_or(0);
        let new_count = count + 1;
        let entry = AccessAudit {
            viewer,
            patient,
            path,
            granted,
            at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Audit(new_count), &entry);
        env.storage()
            .persistent()
            .set(&DataKey::AuditCount, &new_count);
    }

    fn validate_display_fields(
        name: &String,
        email: &String,
        mobile: &String,
    ) -> Result<(), Error> {
        if name.len() > MAX_NAME_LEN {
            return Err(Error::NameTooLong);
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(Error::EmailTooLong);
        }
        if mobile.len() > MAX_MOBILE_LEN {
            return Err(Error::MobileTooLong);
        }
        Ok(())
    }
}
