use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ==================== Event Payload Structs ====================
// Published under the ("VAULT", symbol_short!("…")) topic pair.

#[derive(Clone)]
#[contracttype]
pub struct RecordEvent {
    pub record_id: u64,
    pub patient: Address,
    pub actor: Address,
    /// RecordCategory repr value.
    pub category: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct RecordAccessEvent {
    pub record_id: u64,
    pub patient: Address,
    pub viewer: Option<Address>,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct TicketEvent {
    pub ticket_id: u64,
    pub record_id: u64,
    pub patient: Address,
    pub expires_at: u64,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct ConfigEvent {
    pub admin: Address,
    pub access_contract: Address,
    pub timestamp: u64,
}

// ==================== Emit Functions ====================

pub fn emit_record_added(env: &Env, record_id: u64, patient: Address, actor: Address, category: u32) {
    env.events().publish(
        ("VAULT", symbol_short!("REC_NEW")),
        RecordEvent {
            record_id,
            patient,
            actor,
            category,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_record_archived(env: &Env, record_id: u64, patient: Address, actor: Address, category: u32) {
    env.events().publish(
        ("VAULT", symbol_short!("REC_ARC")),
        RecordEvent {
            record_id,
            patient,
            actor,
            category,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_record_accessed(env: &Env, record_id: u64, patient: Address, viewer: Option<Address>) {
    env.events().publish(
        ("VAULT", symbol_short!("REC_ACC")),
        RecordAccessEvent {
            record_id,
            patient,
            viewer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_ticket_issued(
    env: &Env,
    ticket_id: u64,
    record_id: u64,
    patient: Address,
    expires_at: u64,
) {
    env.events().publish(
        ("VAULT", symbol_short!("TKT_NEW")),
        TicketEvent {
            ticket_id,
            record_id,
            patient,
            expires_at,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_ticket_expired(env: &Env, ticket_id: u64, record_id: u64, patient: Address) {
    env.events().publish(
        ("VAULT", symbol_short!("TKT_EXP")),
        TicketEvent {
            ticket_id,
            record_id,
            patient,
            expires_at: 0,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_access_contract_set(env: &Env, admin: Address, access_contract: Address) {
    env.events().publish(
        ("VAULT", symbol_short!("CFG_ACC")),
        ConfigEvent {
            admin,
            access_contract,
            timestamp: env.ledger().timestamp(),
        },
    );
}
