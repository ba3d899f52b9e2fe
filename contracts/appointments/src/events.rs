use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ==================== Event Payload Structs ====================
// Published under the ("APPT", symbol_short!("…")) topic pair.

#[derive(Clone)]
#[contracttype]
pub struct AppointmentEvent {
    pub appointment_id: u64,
    pub patient: Address,
    pub doctor: Address,
    /// AppointmentStatus repr value after the transition.
    pub status: u32,
    pub timestamp: u64,
}

// ==================== Emit Functions ====================

fn emit(env: &Env, tag: Symbol, appointment_id: u64, patient: Address, doctor: Address, status: u32) {
    env.events().publish(
        ("APPT", tag),
        AppointmentEvent {
            appointment_id,
            patient,
            doctor,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_requested(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_NEW"), id, patient, doctor, status);
}

pub fn emit_accepted(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_ACC"), id, patient, doctor, status);
}

pub fn emit_rejected(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_REJ"), id, patient, doctor, status);
}

pub fn emit_cancelled(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_CXL"), id, patient, doctor, status);
}

pub fn emit_completed(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_DONE"), id, patient, doctor, status);
}

pub fn emit_no_show(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_NOSHOW"), id, patient, doctor, status);
}

pub fn emit_running_late(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_LATE"), id, patient, doctor, status);
}

pub fn emit_notes_updated(env: &Env, id: u64, patient: Address, doctor: Address, status: u32) {
    emit(env, symbol_short!("AP_NOTES"), id, patient, doctor, status);
}
