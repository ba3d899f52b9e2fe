use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

// ==================== Event Payload Structs ====================
// Compact typed payloads published to the Soroban event log. External
// indexers subscribe via topic pattern ("ACCESS", symbol_short!("…")).

#[derive(Clone)]
#[contracttype]
pub struct UserEvent {
    pub user: Address,
    pub admin: Address,
    /// Role repr value.
    pub role: u32,
    pub active: bool,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct TokenEvent {
    pub token: BytesN<32>,
    pub patient: Address,
    pub expires_at: u64,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct TokenUsedEvent {
    pub token: BytesN<32>,
    pub patient: Address,
    pub use_count: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct GateEvent {
    pub viewer: Option<Address>,
    pub patient: Address,
    /// AccessPath repr value, u32::MAX on denial.
    pub path: u32,
    pub granted: bool,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct CacheEvent {
    pub doctor: Address,
    pub patient: Address,
    pub expires_at: u64,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct PauseEvent {
    pub admin: Address,
    pub paused: bool,
    pub timestamp: u64,
}

// ==================== Emit Functions ====================

pub fn emit_user_registered(env: &Env, user: Address, admin: Address, role: u32) {
    env.events().publish(
        ("ACCESS", symbol_short!("USR_ADD")),
        UserEvent {
            user,
            admin,
            role,
            active: true,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_user_deactivated(env: &Env, user: Address, admin: Address, role: u32) {
    env.events().publish(
        ("ACCESS", symbol_short!("USR_DEACT")),
        UserEvent {
            user,
            admin,
            role,
            active: false,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_token_issued(env: &Env, token: BytesN<32>, patient: Address, expires_at: u64) {
    env.events().publish(
        ("ACCESS", symbol_short!("TOK_NEW")),
        TokenEvent {
            token,
            patient,
            expires_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_token_revoked(env: &Env, token: BytesN<32>, patient: Address) {
    env.events().publish(
        ("ACCESS", symbol_short!("TOK_RVK")),
        TokenEvent {
            token,
            patient,
            expires_at: 0,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_token_expired(env: &Env, token: BytesN<32>, patient: Address, expires_at: u64) {
    env.events().publish(
        ("ACCESS", symbol_short!("TOK_EXP")),
        TokenEvent {
            token,
            patient,
            expires_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_token_used(env: &Env, token: BytesN<32>, patient: Address, use_count: u32) {
    env.events().publish(
        ("ACCESS", symbol_short!("TOK_USE")),
        TokenUsedEvent {
            token,
            patient,
            use_count,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_gate_decision(
    env: &Env,
    viewer: Option<Address>,
    patient: Address,
    path: u32,
    granted: bool,
) {
    let tag = if granted {
        symbol_short!("GATE_OK")
    } else {
        symbol_short!("GATE_DENY")
    };
    env.events().publish(
        ("ACCESS", tag),
        GateEvent {
            viewer,
            patient,
            path,
            granted,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_patient_remembered(env: &Env, doctor: Address, patient: Address, expires_at: u64) {
    env.events().publish(
        ("ACCESS", symbol_short!("CACHE_PUT")),
        CacheEvent {
            doctor,
            patient,
            expires_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_patient_forgotten(env: &Env, doctor: Address, patient: Address) {
    env.events().publish(
        ("ACCESS", symbol_short!("CACHE_DEL")),
        CacheEvent {
            doctor,
            patient,
            expires_at: 0,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_pause_changed(env: &Env, admin: Address, paused: bool) {
    let tag = if paused {
        symbol_short!("PAUSED")
    } else {
        symbol_short!("UNPAUSED")
    };
    env.events().publish(
        ("ACCESS", tag),
        PauseEvent {
            admin,
            paused,
            timestamp: env.ledger().timestamp(),
        },
    );
}
