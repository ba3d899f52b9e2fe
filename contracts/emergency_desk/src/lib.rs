#![no_std]
#![allow(clippy::too_many_arguments)]


mod errors;
mod events;
mod types;

pub use errors::{get_suggestion, Error};
pub use types::{LostFoundReport, ReportKind, ReportStatus, SosMessage, SosStatus, SubmitRate};

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String, Vec};

// ==================== Storage Keys ====================

#[contracttype]
pub enum DataKey {
    // Singleton / lifecycle — instance storage
    Initialized,
    Admin,
    Operators, // Vec<Address>, bounded by MAX_OPERATORS

    // Per-reporter rate limiting — persistent
    SubmitRate(Address), // SubmitRate

    // SOS queue — persistent
    SosCount, // u64 — monotonic ID counter
    Sos(u64), // SosMessage

    // Lost & found — persistent
    ReportCount, // u64 — monotonic ID counter
    Report(u64), // LostFoundReport
}

// ==================== Constants ====================

/// Maximum distinct desk operators (besides the admin).
const MAX_OPERATORS: u32 = 20;
/// Maximum page size for queue and report listings.
const MAX_PAGE_SIZE: u32 = 50;
/// Listing sentinel meaning "any status".
pub const ANY_STATUS: u32 = u32::MAX;

// String byte-length ceilings
const MAX_CONTACT_LEN: u32 = 100;
const MAX_MESSAGE_LEN: u32 = 500;
const MAX_LABEL_LEN: u32 = 100;
const MAX_DESCRIPTION_LEN: u32 = 500;
const MAX_LOCATION_LEN: u32 = 200;

// Submission rate-limit: MAX_SUBMISSIONS per RATE_WINDOW_SECS per address,
// across SOS messages and lost/found reports combined.
const MAX_SUBMISSIONS: u32 = 5;
const RATE_WINDOW_SECS: u64 = 3_600; // 1 hour

// ==================== Contract ====================

#[contract]
pub struct EmergencyDeskContract;

#[contractimpl]
impl EmergencyDeskContract {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Initialise the desk. The admin credential is its own realm,
    /// deliberately disjoint from doctor/patient sessions.
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::Operators, &Vec::<Address>::new(&env));
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        Self::require_initialized(&env)?;
        Ok(Self::read_admin(&env))
    }

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------

    /// Authorise `operator` to work the queue. Admin only. Idempotent.
    pub fn add_operator(env: Env, caller: Address, operator: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut operators = Self::read_operators(&env);
        if operators.contains(operator.clone()) {
            return Ok(());
        }
        if operators.len() >= MAX_OPERATORS {
            return Err(Error::MaxOperatorsReached);
        }
        operators.push_back(operator.clone());
        env.storage().instance().set(&DataKey::Operators, &operators);

        events::emit_operator_added(&env, operator, caller);
        Ok(())
    }

    /// Revoke an operator. Admin only.
    pub fn remove_operator(env: Env, caller: Address, operator: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let operators = Self::read_operators(&env);
        let mut updated = Vec::new(&env);
        let mut found = false;
        for op in operators.iter() {
            if op == operator {
                found = true;
            } else {
                updated.push_back(op);
            }
        }
        if !found {
            return Err(Error::OperatorNotFound);
        }
        env.storage().instance().set(&DataKey::Operators, &updated);

        events::emit_operator_removed(&env, operator, caller);
        Ok(())
    }

    pub fn get_operators(env: Env) -> Result<Vec<Address>, Error> {
        Self::require_initialized(&env)?;
        Ok(Self::read_operators(&env))
    }

    // ------------------------------------------------------------------
    // SOS Queue
    // ------------------------------------------------------------------

    /// File an emergency message. Open to any signing address, bounded by
    /// a rolling-window rate limit. Returns the queue position id.
    pub fn submit_sos(
        env: Env,
        reporter: Address,
        contact: String,
        message: String,
    ) -> Result<u64, Error> {
        Self::require_initialized(&env)?;
        reporter.require_auth();
        Self::check_and_update_submit_rate(&env, &reporter)?;

        if contact.len() > MAX_CONTACT_LEN {
            return Err(Error::ContactTooLong);
        }
        if message.len() > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLong);
        }

        let now = env.ledger().timestamp();
        let sos_id = Self::next_sos_id(&env);
        let sos = SosMessage {
            id: sos_id,
            reporter: reporter.clone(),
            contact,
            message,
            status: SosStatus::Open,
            created_at: now,
            updated_at: now,
        };
        env.storage().persistent().set(&DataKey::Sos(sos_id), &sos);

        events::emit_sos_submitted(&env, sos_id, reporter, SosStatus::Open as u32);
        Ok(sos_id)
    }

    /// The oldest open message, or `None` when the queue is drained.
    /// Operators work strictly front-to-back.
    pub fn next_open(env: Env, operator: Address) -> Result<Option<SosMessage>, Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let total: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::SosCount)
            .unwrap_or(0);
        let mut i = 1u64;
        while i <= total {
            if let Some(sos) = env
                .storage()
                .persistent()
                .get::<DataKey, SosMessage>(&DataKey::Sos(i))
            {
                if sos.status == SosStatus::Open {
                    return Ok(Some(sos));
                }
            }
            i += 1;
        }
        Ok(None)
    }

    /// `Open → Acknowledged`.
    pub fn acknowledge(env: Env, operator: Address, sos_id: u64) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let mut sos = Self::load_sos(&env, sos_id)?;
        if sos.status != SosStatus::Open {
            return Err(Error::InvalidSosTransition);
        }
        sos.status = SosStatus::Acknowledged;
        sos.updated_at = env.ledger().timestamp();
        env.storage().persistent().set(&DataKey::Sos(sos_id), &sos);

        events::emit_sos_acknowledged(
            &env,
            sos_id,
            sos.reporter,
            operator,
            SosStatus::Acknowledged as u32,
        );
        Ok(())
    }

    /// `Open | Acknowledged → Resolved`.
    pub fn resolve(env: Env, operator: Address, sos_id: u64) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let mut sos = Self::load_sos(&env, sos_id)?;
        if sos.status == SosStatus::Resolved {
            return Err(Error::InvalidSosTransition);
        }
        sos.status = SosStatus::Resolved;
        sos.updated_at = env.ledger().timestamp();
        env.storage().persistent().set(&DataKey::Sos(sos_id), &sos);

        events::emit_sos_resolved(
            &env,
            sos_id,
            sos.reporter,
            operator,
            SosStatus::Resolved as u32,
        );
        Ok(())
    }

    /// Queue listing in insertion order. `status_filter` takes a
    /// `SosStatus` repr value, or `ANY_STATUS` for no filter.
    pub fn list_sos(
        env: Env,
        operator: Address,
        status_filter: u32,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<SosMessage>, Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;
        Self::validate_page_size(page_size)?;

        let total: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::SosCount)
            .unwrap_or(0);
        let skip = page * page_size;
        let mut matched: u32 = 0;
        let mut out = Vec::new(&env);
        let mut i = 1u64;
        while i <= total {
            if let Some(sos) = env
                .storage()
                .persistent()
                .get::<DataKey, SosMessage>(&DataKey::Sos(i))
            {
                if status_filter == ANY_STATUS || (sos.status as u32) == status_filter {
                    if matched >= skip && matched < skip + page_size {
                        out.push_back(sos);
                    }
                    matched += 1;
                }
            }
            i += 1;
        }
        Ok(out)
    }

    /// Fetch one message: its reporter, an operator, or the admin.
    pub fn get_sos(env: Env, caller: Address, sos_id: u64) -> Result<SosMessage, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let sos = Self::load_sos(&env, sos_id)?;
        if caller != sos.reporter
            && !Self::is_operator(&env, &caller)
            && !Self::is_admin(&env, &caller)
        {
            return Err(Error::NotAuthorized);
        }
        Ok(sos)
    }

    // ------------------------------------------------------------------
    // Lost & Found
    // ------------------------------------------------------------------

    /// File a lost or found report. Shares the submission rate budget with
    /// SOS messages.
    pub fn file_report(
        env: Env,
        reporter: Address,
        kind: ReportKind,
        label: String,
        description: String,
        location: String,
    ) -> Result<u64, Error> {
        Self::require_initialized(&env)?;
        reporter.require_auth();
        Self::check_and_update_submit_rate(&env, &reporter)?;

        if label.len() > MAX_LABEL_LEN {
            return Err(Error::LabelTooLong);
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(Error::DescriptionTooLong);
        }
        if location.len() > MAX_LOCATION_LEN {
            return Err(Error::LocationTooLong);
        }

        let report_id = Self::next_report_id(&env);
        let report = LostFoundReport {
            id: report_id,
            kind,
            label,
            description,
            location,
            reported_by: reporter.clone(),
            status: ReportStatus::Open,
            matched_with: None,
            created_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Report(report_id), &report);

        events::emit_report_filed(&env, report_id, reporter, ReportStatus::Open as u32);
        Ok(report_id)
    }

    /// Open reports of the opposite kind, oldest first — the candidate
    /// list an operator works through before confirming a match.
    pub fn match_candidates(
        env: Env,
        operator: Address,
        report_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<LostFoundReport>, Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;
        Self::validate_page_size(page_size)?;

        let report = Self::load_report(&env, report_id)?;
        if report.status != ReportStatus::Open {
            return Err(Error::ReportClosed);
        }
        let wanted = match report.kind {
            ReportKind::Lost => ReportKind::Found,
            ReportKind::Found => ReportKind::Lost,
        };

        let total: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::ReportCount)
            .unwrap_or(0);
        let skip = page * page_size;
        let mut matched: u32 = 0;
        let mut out = Vec::new(&env);
        let mut i = 1u64;
        while i <= total {
            if i != report_id {
                if let Some(candidate) = env
                    .storage()
                    .persistent()
                    .get::<DataKey, LostFoundReport>(&DataKey::Report(i))
                {
                    if candidate.kind == wanted && candidate.status == ReportStatus::Open {
                        if matched >= skip && matched < skip + page_size {
                            out.push_back(candidate);
                        }
                        matched += 1;
                    }
                }
            }
            i += 1;
        }
        Ok(out)
    }

    /// Confirm a match between an open Lost report and an open Found
    /// report. Both are marked `Matched` and cross-linked.
    pub fn link_match(
        env: Env,
        operator: Address,
        lost_id: u64,
        found_id: u64,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let mut lost = Self::load_report(&env, lost_id)?;
        let mut found = Self::load_report(&env, found_id)?;
        if lost.kind != ReportKind::Lost || found.kind != ReportKind::Found {
            return Err(Error::InvalidMatch);
        }
        if lost.status != ReportStatus::Open || found.status != ReportStatus::Open {
            return Err(Error::InvalidMatch);
        }

        lost.status = ReportStatus::Matched;
        lost.matched_with = Some(found_id);
        found.status = ReportStatus::Matched;
        found.matched_with = Some(lost_id);
        env.storage().persistent().set(&DataKey::Report(lost_id), &lost);
        env.storage()
            .persistent()
            .set(&DataKey::Report(found_id), &found);

        events::emit_reports_matched(&env, lost_id, operator, found_id);
        Ok(())
    }

    /// Close a report (from Open or Matched).
    pub fn close_report(env: Env, operator: Address, report_id: u64) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        operator.require_auth();
        Self::require_operator(&env, &operator)?;

        let mut report = Self::load_report(&env, report_id)?;
        if report.status == ReportStatus::Closed {
            return Err(Error::ReportClosed);
        }
        report.status = ReportStatus::Closed;
        env.storage()
            .persistent()
            .set(&DataKey::Report(report_id), &report);

        events::emit_report_closed(&env, report_id, operator);
        Ok(())
    }

    /// Fetch one report: its reporter, an operator, or the admin.
    pub fn get_report(env: Env, caller: Address, report_id: u64) -> Result<LostFoundReport, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let report = Self::load_report(&env, report_id)?;
        if caller != report.reported_by
            && !Self::is_operator(&env, &caller)
            && !Self::is_admin(&env, &caller)
        {
            return Err(Error::NotAuthorized);
        }
        Ok(report)
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

    fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        if !Self::is_admin(env, caller) {
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }

    /// The admin is implicitly an operator.
    fn require_operator(env: &Env, caller: &Address) -> Result<(), Error> {
        if Self::is_admin(env, caller) || Self::is_operator(env, caller) {
            return Ok(());
        }
        Err(Error::NotAuthorized)
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

    fn is_operator(env: &Env, addr: &Address) -> bool {
        Self::read_operators(env).contains(addr.clone())
    }

    fn read_admin(env: &Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .unwrap_or_else(|| panic!("admin not set"))
    }

    fn read_operators(env: &Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Operators)
            .unwrap_or_else(|| Vec::new(env))
    }

    fn load_sos(env: &Env, sos_id: u64) -> Result<SosMessage, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Sos(sos_id))
            .ok_or(Error::SosNotFound)
    }

    fn load_report(env: &Env, report_id: u64) -> Result<LostFoundReport, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Report(report_id))
            .ok_or(Error::ReportNotFound)
    }

    fn next_sos_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::SosCount)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().persistent().set(&DataKey::SosCount, &id);
        id
    }

    fn next_report_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::ReportCount)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().persistent().set(&DataKey::ReportCount, &id);
        id
    }

    fn validate_page_size(page_size: u32) -> Result<(), Error> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidPageSize);
        }
        Ok(())
    }

    /// Enforce the per-reporter rolling-window submission limit.
    fn check_and_update_submit_rate(env: &Env, reporter: &Address) -> Result<(), Error> {
        let key = DataKey::SubmitRate(reporter.clone());
        let now = env.ledger().timestamp();

        let entry: SubmitRate = env.storage().persistent().get(&key).unwrap_or(SubmitRate {
            count: 0,
            window_start: now,
        });

        let (count, window_start) = if now.saturating_sub(entry.window_start) >= RATE_WINDOW_SECS {
            // Window expired — reset counter.
            (0u32, now)
        } else {
            (entry.count, entry.window_start)
        };

        if count >= MAX_SUBMISSIONS {
            return Err(Error::RateLimitExceeded);
        }

        env.storage().persistent().set(
            &key,
            &SubmitRate {
                count: count.saturating_add(1),
                window_start,
            },
        );
        Ok(())
    }
}
