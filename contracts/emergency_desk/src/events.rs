use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ==================== Event Payload Structs ====================
// Published under the ("SOS", symbol_short!("…")) topic pair.

#[derive(Clone)]
#[contracttype]
pub struct SosEvent {
    pub sos_id: u64,
    pub reporter: Address,
    pub actor: Address,
    /// SosStatus repr value after the transition.
    pub status: u32,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct OperatorEvent {
    pub operator: Address,
    pub admin: Address,
    /// true = added, false = removed.
    pub active: bool,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct ReportEvent {
    pub report_id: u64,
    pub actor: Address,
    /// ReportStatus repr value after the transition.
    pub status: u32,
    pub matched_with: Option<u64>,
    pub timestamp: u64,
}

// ==================== Emit Functions ====================

pub fn emit_sos_submitted(env: &Env, sos_id: u64, reporter: Address, status: u32) {
    env.events().publish(
        ("SOS", symbol_short!("SOS_NEW")),
        SosEvent {
            sos_id,
            reporter: reporter.clone(),
            actor: reporter,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_sos_acknowledged(env: &Env, sos_id: u64, reporter: Address, operator: Address, status: u32) {
    env.events().publish(
        ("SOS", symbol_short!("SOS_ACK")),
        SosEvent {
            sos_id,
            reporter,
            actor: operator,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_sos_resolved(env: &Env, sos_id: u64, reporter: Address, operator: Address, status: u32) {
    env.events().publish(
        ("SOS", symbol_short!("SOS_RES")),
        SosEvent {
            sos_id,
            reporter,
            actor: operator,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_operator_added(env: &Env, operator: Address, admin: Address) {
    env.events().publish(
        ("SOS", symbol_short!("OP_ADD")),
        OperatorEvent {
            operator,
            admin,
            active: true,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_operator_removed(env: &Env, operator: Address, admin: Address) {
    env.events().publish(
        ("SOS", symbol_short!("OP_RMV")),
        OperatorEvent {
            operator,
            admin,
            active: false,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_report_filed(env: &Env, report_id: u64, reporter: Address, status: u32) {
    env.events().publish(
        ("SOS", symbol_short!("LF_NEW")),
        ReportEvent {
            report_id,
            actor: reporter,
            status,
            matched_with: None,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_reports_matched(env: &Env, report_id: u64, operator: Address, matched_with: u64) {
    env.events().publish(
        ("SOS", symbol_short!("LF_MATCH")),
        ReportEvent {
            report_id,
            actor: operator,
            status: crate::ReportStatus::Matched as u32,
            matched_with: Some(matched_with),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_report_closed(env: &Env, report_id: u64, operator: Address) {
    env.events().publish(
        ("SOS", symbol_short!("LF_CLOSE")),
        ReportEvent {
            report_id,
            actor: operator,
            status: crate::ReportStatus::Closed as u32,
            matched_with: None,
            timestamp: env.ledger().timestamp(),
        },
    );
}
