use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ==================== Event Payload Structs ====================
// Published under the ("NOTIFY", symbol_short!("…")) topic pair.

#[derive(Clone)]
#[contracttype]
pub struct NotificationCreatedEvent {
    pub notif_id: u64,
    pub recipient: Address,
    pub sender: Address,
    /// NotificationType repr value.
    pub notif_type: u32,
    /// NotificationPriority repr value.
    pub priority: u32,
    pub reference_id: Option<u64>,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct NotificationStatusEvent {
    pub notif_id: u64,
    pub user: Address,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct SenderEvent {
    pub sender: Address,
    pub admin: Address,
    /// true = authorized, false = revoked.
    pub authorized: bool,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct PreferencesEvent {
    pub user: Address,
    pub enabled: bool,
    /// NotificationPriority repr value.
    pub min_priority: u32,
    pub timestamp: u64,
}

// ==================== Emit Functions ====================

pub fn emit_created(
    env: &Env,
    notif_id: u64,
    recipient: Address,
    sender: Address,
    notif_type: u32,
    priority: u32,
    reference_id: Option<u64>,
) {
    env.events().publish(
        ("NOTIFY", symbol_short!("NTF_NEW")),
        NotificationCreatedEvent {
            notif_id,
            recipient,
            sender,
            notif_type,
            priority,
            reference_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_read(env: &Env, notif_id: u64, user: Address) {
    env.events().publish(
        ("NOTIFY", symbol_short!("NTF_RD")),
        NotificationStatusEvent {
            notif_id,
            user,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_archived(env: &Env, notif_id: u64, user: Address) {
    env.events().publish(
        ("NOTIFY", symbol_short!("NTF_ARC")),
        NotificationStatusEvent {
            notif_id,
            user,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_sender_added(env: &Env, sender: Address, admin: Address) {
    env.events().publish(
        ("NOTIFY", symbol_short!("SNDR_ADD")),
        SenderEvent {
            sender,
            admin,
            authorized: true,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_sender_removed(env: &Env, sender: Address, admin: Address) {
    env.events().publish(
        ("NOTIFY", symbol_short!("SNDR_RMV")),
        SenderEvent {
            sender,
            admin,
            authorized: false,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_preferences_updated(env: &Env, user: Address, enabled: bool, min_priority: u32) {
    env.events().publish(
        ("NOTIFY", symbol_short!("PREF_UPD")),
        PreferencesEvent {
            user,
            enabled,
            min_priority,
            timestamp: env.ledger().timestamp(),
        },
    );
}
