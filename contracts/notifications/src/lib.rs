#![no_std]
#![allow(clippy::too_many_arguments)]


mod errors;
mod events;
mod types;

pub use errors::{get_suggestion, Error};
pub use types::{
    Notification, NotificationFilter, NotificationPage, NotificationPreferences,
    NotificationPriority, NotificationStatus, NotificationType, SenderRate, StreamBatch,
};

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String, Vec};

// ==================== Storage Keys ====================

#[contracttype]
pub enum DataKey {
    // Singleton / lifecycle — instance storage
    Initialized,
    Admin,
    Senders, // Vec<Address>, bounded by MAX_SENDERS

    // Per-sender rate limiting — persistent
    SenderRate(Address), // SenderRate

    // User preferences — persistent
    Prefs(Address), // NotificationPreferences

    // Notification records — persistent
    NotifCount,          // u64 — monotonic ID counter
    Notif(u64),          // Notification
    UserNotifs(Address), // Vec<u64> — insertion order (oldest first)
    Unread(Address),     // u32
}

// ==================== Constants ====================

/// Maximum distinct authorized senders (contracts + services).
const MAX_SENDERS: u32 = 20;
/// Maximum notifications stored per user (oldest evicted beyond this).
const MAX_USER_NOTIFS: u32 = 200;
/// Maximum page/batch size for queries and stream polls.
const MAX_LIMIT: u32 = 50;
/// Maximum enabled-type entries in preferences.
const MAX_ENABLED_TYPES: u32 = 12;
/// Maximum recipients per `notify_many` call.
const MAX_BATCH_RECIPIENTS: u32 = 20;

// String byte-length ceilings
const MAX_TITLE_LEN: u32 = 100;
const MAX_MESSAGE_LEN: u32 = 500;

// Sender rate-limit: MAX_SENDER_CALLS notifications per RATE_WINDOW_SECS.
const MAX_SENDER_CALLS: u32 = 100;
const RATE_WINDOW_SECS: u64 = 3_600; // 1 hour

// ==================== Contract ====================

#[contract]
pub struct NotificationsContract;

#[contractimpl]
impl NotificationsContract {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Initialise the contract. Must be called exactly once.
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::Senders, &Vec::<Address>::new(&env));
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        Self::require_initialized(&env)?;
        Ok(Self::read_admin(&env))
    }

    // ------------------------------------------------------------------
    // Sender Authorization
    // ------------------------------------------------------------------

    /// Authorise `sender` (typically another HealthVault contract) to
    /// create notifications. Admin only. Idempotent.
    pub fn add_sender(env: Env, caller: Address, sender: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let mut senders = Self::read_senders(&env);
        if senders.contains(sender.clone()) {
            return Ok(());
        }
        if senders.len() >= MAX_SENDERS {
            return Err(Error::MaxSendersReached);
        }
        senders.push_back(sender.clone());
        env.storage().instance().set(&DataKey::Senders, &senders);

        events::emit_sender_added(&env, sender, caller);
        Ok(())
    }

    /// Revoke a sender's authorisation. Admin only.
    pub fn remove_sender(env: Env, caller: Address, sender: Address) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let senders = Self::read_senders(&env);
        let mut updated = Vec::new(&env);
        let mut found = false;
        for s in senders.iter() {
            if s == sender {
                found = true;
            } else {
                updated.push_back(s);
            }
        }
        if !found {
            return Err(Error::SenderNotFound);
        }
        env.storage().instance().set(&DataKey::Senders, &updated);

        events::emit_sender_removed(&env, sender, caller);
        Ok(())
    }

    pub fn get_senders(env: Env) -> Result<Vec<Address>, Error> {
        Self::require_initialized(&env)?;
        Ok(Self::read_senders(&env))
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    /// Upsert the caller's delivery preferences.
    pub fn set_preferences(
        env: Env,
        user: Address,
        prefs: NotificationPreferences,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if prefs.enabled_types.len() > MAX_ENABLED_TYPES {
            return Err(Error::TooManyEnabledTypes);
        }
        let stored = NotificationPreferences {
            enabled: prefs.enabled,
            min_priority: prefs.min_priority,
            enabled_types: prefs.enabled_types,
            updated_at: env.ledger().timestamp(),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Prefs(user.clone()), &stored);

        events::emit_preferences_updated(&env, user, stored.enabled, stored.min_priority as u32);
        Ok(())
    }

    pub fn get_preferences(
        env: Env,
        user: Address,
    ) -> Result<Option<NotificationPreferences>, Error> {
        Self::require_initialized(&env)?;
        Ok(env.storage().persistent().get(&DataKey::Prefs(user)))
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create one notification. Caller must be the admin or an authorised
    /// sender. Returns the assigned ID.
    pub fn notify(
        env: Env,
        sender: Address,
        recipient: Address,
        notif_type: NotificationType,
        priority: NotificationPriority,
        title: String,
        message: String,
        reference_id: Option<u64>,
        expires_at: Option<u64>,
    ) -> Result<u64, Error> {
        Self::require_initialized(&env)?;
        sender.require_auth();
        Self::require_sender(&env, &sender)?;
        Self::check_and_update_sender_rate(&env, &sender)?;
        Self::validate_texts(&title, &message)?;

        let id = Self::create(
            &env,
            &sender,
            &recipient,
            notif_type,
            priority,
            title,
            message,
            reference_id,
            expires_at,
        );
        Ok(id)
    }

    /// Create one notification per recipient. Bounded to cap gas cost.
    pub fn notify_many(
        env: Env,
        sender: Address,
        recipients: Vec<Address>,
        notif_type: NotificationType,
        priority: NotificationPriority,
        title: String,
        message: String,
        reference_id: Option<u64>,
        expires_at: Option<u64>,
    ) -> Result<Vec<u64>, Error> {
        Self::require_initialized(&env)?;
        sender.require_auth();
        Self::require_sender(&env, &sender)?;
        Self::check_and_update_sender_rate(&env, &sender)?;

        if recipients.is_empty() {
            return Err(Error::RecipientsEmpty);
        }
        if recipients.len() > MAX_BATCH_RECIPIENTS {
            return Err(Error::BatchTooLarge);
        }
        Self::validate_texts(&title, &message)?;

        let mut ids = Vec::new(&env);
        for recipient in recipients.iter() {
            let id = Self::create(
                &env,
                &sender,
                &recipient,
                notif_type,
                priority,
                title.clone(),
                message.clone(),
                reference_id,
                expires_at,
            );
            ids.push_back(id);
        }
        Ok(ids)
    }

    // ------------------------------------------------------------------
    // Retrieval
    // ------------------------------------------------------------------

    /// Fetch one notification. Recipient or admin only.
    pub fn get_notification(env: Env, caller: Address, notif_id: u64) -> Result<Notification, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let notif = Self::load(&env, notif_id)?;
        if notif.recipient != caller && !Self::is_admin(&env, &caller) {
            return Err(Error::NotAuthorized);
        }
        Ok(notif)
    }

    /// Paginated history query, newest first. Caller must be the user or
    /// the admin. Lapsed notifications are archived as they are passed.
    pub fn get_notifications(
        env: Env,
        caller: Address,
        user: Address,
        filter: NotificationFilter,
    ) -> Result<NotificationPage, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if caller != user && !Self::is_admin(&env, &caller) {
            return Err(Error::NotAuthorized);
        }

        let limit = filter.limit.min(MAX_LIMIT);
        let ids = Self::read_user_notifs(&env, &user);
        let now = env.ledger().timestamp();

        let mut matched_total: u32 = 0;
        let mut skipped: u32 = 0;
        let mut out: Vec<Notification> = Vec::new(&env);

        // Newest first: the list is kept in insertion order.
        let mut idx = ids.len();
        while idx > 0 {
            idx -= 1;
            let notif_id = match ids.get(idx) {
                Some(id) => id,
                None => break,
            };
            let mut notif = match env
                .storage()
                .persistent()
                .get::<DataKey, Notification>(&DataKey::Notif(notif_id))
            {
                Some(n) => n,
                None => continue, // Evicted — skip.
            };
            notif = Self::lapse_if_expired(&env, notif, now);

            if filter.status != u32::MAX && Self::status_repr(notif.status) != filter.status {
                continue;
            }
            if filter.notif_type != u32::MAX && (notif.notif_type as u32) != filter.notif_type {
                continue;
            }
            if filter.min_priority != u32::MAX && (notif.priority as u32) < filter.min_priority {
                continue;
            }

            matched_total += 1;
            if skipped < filter.offset {
                skipped += 1;
                continue;
            }
            if (out.len() as u32) < limit {
                out.push_back(notif);
            }
        }

        let has_more = matched_total > filter.offset.saturating_add(out.len() as u32);
        Ok(NotificationPage {
            notifications: out,
            total: matched_total,
            offset: filter.offset,
            has_more,
        })
    }

    /// The recipient's unread counter.
    pub fn unread_count(env: Env, user: Address) -> Result<u32, Error> {
        Self::require_initialized(&env)?;
        Ok(Self::read_unread(&env, &user))
    }

    // ------------------------------------------------------------------
    // Stream Poll
    // ------------------------------------------------------------------

    /// Poll the notification stream from a cursor. The batch carries the
    /// same information as the push channel's `connected`,
    /// `new_notification`, `unread_count`, and `heartbeat` messages; pass
    /// `next_cursor` back on the following poll. Lapsed notifications are
    /// archived in passing and never streamed.
    pub fn stream_poll(
        env: Env,
        user: Address,
        cursor: u64,
        limit: u32,
    ) -> Result<StreamBatch, Error> {
        Self::require_initialized(&env)?;
        user.require_auth();
        if limit == 0 || limit > MAX_LIMIT {
            return Err(Error::InvalidLimit);
        }

        let ids = Self::read_user_notifs(&env, &user);
        let now = env.ledger().timestamp();
        let mut out: Vec<Notification> = Vec::new(&env);
        let mut next_cursor = cursor;
        let mut has_more = false;

        for notif_id in ids.iter() {
            if notif_id <= cursor {
                continue;
            }
            let notif = match env
                .storage()
                .persistent()
                .get::<DataKey, Notification>(&DataKey::Notif(notif_id))
            {
                Some(n) => n,
                None => continue,
            };
            let notif = Self::lapse_if_expired(&env, notif, now);
            if notif.status == NotificationStatus::Archived {
                continue;
            }
            if (out.len() as u32) >= limit {
                // More remains past this batch; leave the cursor where the
                // batch ended so nothing is skipped.
                has_more = true;
                break;
            }
            next_cursor = notif_id;
            out.push_back(notif);
        }

        Ok(StreamBatch {
            connected: cursor == 0,
            notifications: out,
            unread: Self::read_unread(&env, &user),
            server_time: now,
            next_cursor,
            has_more,
        })
    }

    // ------------------------------------------------------------------
    // State Transitions
    // ------------------------------------------------------------------

    /// Mark one notification as read. Recipient only.
    pub fn mark_read(env: Env, caller: Address, notif_id: u64) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let mut notif = Self::load(&env, notif_id)?;
        if notif.recipient != caller {
            return Err(Error::NotAuthorized);
        }
        match notif.status {
            NotificationStatus::Read => return Err(Error::AlreadyRead),
            NotificationStatus::Archived => return Err(Error::AlreadyArchived),
            NotificationStatus::Unread => {}
        }

        notif.status = NotificationStatus::Read;
        notif.read_at = Some(env.ledger().timestamp());
        env.storage()
            .persistent()
            .set(&DataKey::Notif(notif_id), &notif);
        Self::decrement_unread(&env, &caller);

        events::emit_read(&env, notif_id, caller);
        Ok(())
    }

    /// Mark every unread notification as read. Returns the count.
    pub fn mark_all_read(env: Env, caller: Address) -> Result<u32, Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let ids = Self::read_user_notifs(&env, &caller);
        let now = env.ledger().timestamp();
        let mut newly_read: u32 = 0;

        for notif_id in ids.iter() {
            if let Some(mut notif) = env
                .storage()
                .persistent()
                .get::<DataKey, Notification>(&DataKey::Notif(notif_id))
            {
                if notif.status == NotificationStatus::Unread {
                    notif.status = NotificationStatus::Read;
                    notif.read_at = Some(now);
                    env.storage()
                        .persistent()
                        .set(&DataKey::Notif(notif_id), &notif);
                    newly_read += 1;
                }
            }
        }
        if newly_read > 0 {
            env.storage()
                .persistent()
                .set(&DataKey::Unread(caller), &0u32);
        }
        Ok(newly_read)
    }

    /// Archive a notification out of default queries. Recipient or admin.
    pub fn archive(env: Env, caller: Address, notif_id: u64) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let mut notif = Self::load(&env, notif_id)?;
        if notif.recipient != caller && !Self::is_admin(&env, &caller) {
            return Err(Error::NotAuthorized);
        }
        if notif.status == NotificationStatus::Archived {
            return Err(Error::AlreadyArchived);
        }

        let was_unread = notif.status == NotificationStatus::Unread;
        notif.status = NotificationStatus::Archived;
        env.storage()
            .persistent()
            .set(&DataKey::Notif(notif_id), &notif);
        if was_unread {
            Self::decrement_unread(&env, &notif.recipient);
        }

        events::emit_archived(&env, notif_id, caller);
        Ok(())
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

    /// Caller must be admin OR in the senders list.
    fn require_sender(env: &Env, caller: &Address) -> Result<(), Error> {
        if Self::is_admin(env, caller) || Self::read_senders(env).contains(caller.clone()) {
            return Ok(());
        }
        Err(Error::SenderNotAuthorized)
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

    fn read_senders(env: &Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Senders)
            .unwrap_or_else(|| Vec::new(env))
    }

    fn read_user_notifs(env: &Env, user: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::UserNotifs(user.clone()))
            .unwrap_or_else(|| Vec::new(env))
    }

    fn read_unread(env: &Env, user: &Address) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::Unread(user.clone()))
            .unwrap_or(0)
    }

    fn decrement_unread(env: &Env, user: &Address) {
        let current = Self::read_unread(env, user);
        env.storage()
            .persistent()
            .set(&DataKey::Unread(user.clone()), &current.saturating_sub(1));
    }

    fn load(env: &Env, notif_id: u64) -> Result<Notification, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Notif(notif_id))
            .ok_or(Error::NotificationNotFound)
    }

    fn next_notif_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .persistent()
            .get(&DataKey::NotifCount)
            .unwrap_or(0u64)
            .saturating_add(1);
        env.storage().persistent().set(&DataKey::NotifCount, &id);
        id
    }

    fn status_repr(status: NotificationStatus) -> u32 {
        match status {
            NotificationStatus::Unread => 0,
            NotificationStatus::Read => 1,
            NotificationStatus::Archived => 2,
        }
    }

    fn validate_texts(title: &String, message: &String) -> Result<(), Error> {
        if title.len() > MAX_TITLE_LEN {
            return Err(Error::TitleTooLong);
        }
        if message.len() > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLong);
        }
        Ok(())
    }

    /// Initial status for a new notification, derived from the recipient's
    /// stored preferences. Critical always surfaces; filtered-out records
    /// are kept for history but created archived.
    fn initial_status(
        env: &Env,
        recipient: &Address,
        notif_type: NotificationType,
        priority: NotificationPriority,
    ) -> NotificationStatus {
        if priority == NotificationPriority::Critical {
            return NotificationStatus::Unread;
        }
        let prefs: NotificationPreferences = match env
            .storage()
            .persistent()
            .get(&DataKey::Prefs(recipient.clone()))
        {
            Some(p) => p,
            None => return NotificationStatus::Unread,
        };
        if !prefs.enabled {
            return NotificationStatus::Archived;
        }
        if (priority as u32) < (prefs.min_priority as u32) {
            return NotificationStatus::Archived;
        }
        if !prefs.enabled_types.is_empty() && !prefs.enabled_types.contains(notif_type as u32) {
            return NotificationStatus::Archived;
        }
        NotificationStatus::Unread
    }

    fn create(
        env: &Env,
        sender: &Address,
        recipient: &Address,
        notif_type: NotificationType,
        priority: NotificationPriority,
        title: String,
        message: String,
        reference_id: Option<u64>,
        expires_at: Option<u64>,
    ) -> u64 {
        let notif_id = Self::next_notif_id(env);
        let status = Self::initial_status(env, recipient, notif_type, priority);
        let notif = Notification {
            id: notif_id,
            recipient: recipient.clone(),
            sender: sender.clone(),
            notif_type,
            priority,
            status,
            title,
            message,
            reference_id,
            created_at: env.ledger().timestamp(),
            read_at: None,
            expires_at,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Notif(notif_id), &notif);

        // Append to the user's list, evicting the oldest past capacity.
        let mut ids = Self::read_user_notifs(env, recipient);
        if ids.len() >= MAX_USER_NOTIFS {
            if let Some(oldest_id) = ids.get(0) {
                if let Some(oldest) = env
                    .storage()
                    .persistent()
                    .get::<DataKey, Notification>(&DataKey::Notif(oldest_id))
                {
                    if oldest.status == NotificationStatus::Unread {
                        Self::decrement_unread(env, recipient);
                    }
                }
                env.storage().persistent().remove(&DataKey::Notif(oldest_id));
                let mut trimmed = Vec::new(env);
                let mut i = 1u32;
                while i < ids.len() {
                    if let Some(id) = ids.get(i) {
                        trimmed.push_back(id);
                    }
                    i += 1;
                }
                ids = trimmed;
            }
        }
        ids.push_back(notif_id);
        env.storage()
            .persistent()
            .set(&DataKey::UserNotifs(recipient.clone()), &ids);

        if status == NotificationStatus::Unread {
            let current = Self::read_unread(env, recipient);
            env.storage().persistent().set(
                &DataKey::Unread(recipient.clone()),
                &current.saturating_add(1),
            );
        }

        events::emit_created(
            env,
            notif_id,
            recipient.clone(),
            sender.clone(),
            notif_type as u32,
            priority as u32,
            reference_id,
        );
        notif_id
    }

    /// Archive a lapsed notification in place, keeping the unread counter
    /// consistent. Returns the (possibly updated) record.
    fn lapse_if_expired(env: &Env, mut notif: Notification, now: u64) -> Notification {
        if notif.status == NotificationStatus::Archived {
            return notif;
        }
        let lapsed = matches!(notif.expires_at, Some(exp) if exp <= now);
        if lapsed {
            let was_unread = notif.status == NotificationStatus::Unread;
            notif.status = NotificationStatus::Archived;
            env.storage()
                .persistent()
                .set(&DataKey::Notif(notif.id), &notif);
            if was_unread {
                Self::decrement_unread(env, &notif.recipient);
            }
        }
        notif
    }
}
