//! Recent-patient display cache.
//!
//! A per-doctor list of `CachedPatient` snapshots with a fixed TTL. The
//! cache is a convenience for revisiting recently scanned patients; it is
//! never consulted by the access gate and stores no credentials.

use soroban_sdk::{Address, Env, Vec};

use crate::types::CachedPatient;
use crate::DataKey;

/// Cache entry lifetime: 7 days.
pub const RECENT_TTL_SECS: u64 = 604_800;
/// Maximum cached entries per doctor; the oldest entry is evicted beyond this.
pub const MAX_RECENT: u32 = 50;

fn read_list(env: &Env, doctor: &Address) -> Vec<CachedPatient> {
    env.storage()
        .persistent()
        .get(&DataKey::Recent(doctor.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

fn write_list(env: &Env, doctor: &Address, list: &Vec<CachedPatient>) {
    env.storage()
        .persistent()
        .set(&DataKey::Recent(doctor.clone()), list);
}

/// Upsert by patient id: an existing entry is overwritten wholesale (no
/// field merge), resetting its expiry. New entries append; if the list is
/// at capacity the oldest entry is evicted first.
pub fn upsert(env: &Env, doctor: &Address, entry: CachedPatient) {
    let list = read_list(env, doctor);
    let mut updated = Vec::new(env);
    let mut replaced = false;
    for existing in list.iter() {
        if existing.patient == entry.patient {
            updated.push_back(entry.clone());
            replaced = true;
        } else {
            updated.push_back(existing);
        }
    }
    if !replaced {
        if updated.len() >= MAX_RECENT {
            // Evict the oldest entry (front of the list).
            let mut trimmed = Vec::new(env);
            for i in 1..updated.len() {
                if let Some(e) = updated.get(i) {
                    trimmed.push_back(e);
                }
            }
            updated = trimmed;
        }
        updated.push_back(entry);
    }
    write_list(env, doctor, &updated);
}

/// Read the valid subset, dropping entries whose `expires_at` has passed.
/// The filtered list is persisted back, so expired entries are gone from
/// storage after the first read that observes them. Reads never extend an
/// entry's expiry.
pub fn load_valid(env: &Env, doctor: &Address) -> Vec<CachedPatient> {
    let list = read_list(env, doctor);
    let now = env.ledger().timestamp();
    let mut valid = Vec::new(env);
    let mut dropped = false;
    for entry in list.iter() {
        if entry.expires_at > now {
            valid.push_back(entry);
        } else {
            dropped = true;
        }
    }
    if dropped {
        write_list(env, doctor, &valid);
    }
    valid
}

/// Remove one entry. Returns false if the patient was not cached.
pub fn remove(env: &Env, doctor: &Address, patient: &Address) -> bool {
    let list = read_list(env, doctor);
    let mut updated = Vec::new(env);
    let mut found = false;
    for entry in list.iter() {
        if entry.patient == *patient {
            found = true;
        } else {
            updated.push_back(entry);
        }
    }
    if found {
        write_list(env, doctor, &updated);
    }
    found
}
