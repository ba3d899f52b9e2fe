//! End-to-end flows spanning the access gate, record vault, appointments,
//! and notification stream.

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, BytesN, Env,
};

use appointments::AppointmentStatus;
use medical_records::{RecordCategory, TicketKind, TicketState};
use notifications::{NotificationPriority, NotificationType};
use patient_access::{AccessDecision, AccessPath, ViewerRole};

use crate::fixtures::{deploy, digest, s};

const DAY: u64 = 86_400;
const WEEK: u64 = 604_800;

fn set_time(env: &Env, ts: u64) {
    env.ledger().with_mut(|l| l.timestamp = ts);
}

/// The QR flow end-to-end: the patient issues a share token, the scan
/// resolves anonymously through the gate, records stream back grouped, and
/// the doctor's recent-patients list remembers the visit.
#[test]
fn test_qr_scan_to_records_flow() {
    let env = Env::default();
    set_time(&env, 1_000);
    let suite = deploy(&env);

    // Patient hands out a QR token good for a day.
    let token = digest(&env, 42);
    suite.access.issue_share_token(&suite.patient, &token, &DAY);

    // A record is already on file.
    let record_id = suite.records.add_record(
        &suite.doctor,
        &suite.patient,
        &s(&env, "Blood panel"),
        &RecordCategory::Report,
        &s(&env, "application/pdf"),
        &204_800,
        &s(&env, "vault/2026/08/report-0001.pdf"),
    );

    // The scanning device has no session: classification is anonymous and
    // scoped to the token's patient.
    let resolved = suite.access.classify(&None::<Address>, &Some(token.clone()));
    assert_eq!(resolved.role, ViewerRole::Anonymous);
    assert_eq!(resolved.subject, Some(suite.patient.clone()));

    // The grouped listing and a download ticket both ride the token.
    let groups = suite
        .records
        .list_records(&None::<Address>, &Some(token.clone()), &suite.patient);
    assert_eq!(groups.reports.len(), 1);

    let ticket_id = suite.records.issue_file_ticket(
        &None::<Address>,
        &Some(token),
        &record_id,
        &TicketKind::Download,
    );
    assert_eq!(suite.records.ticket_status(&ticket_id), TicketState::Valid);

    // The doctor bookmarks the patient for the week.
    suite.access.remember_patient(&suite.doctor, &suite.patient);
    let recent = suite.access.recent_patients(&suite.doctor);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent.get(0).unwrap().name, s(&env, "Jomo Otieno"));

    // Both gate decisions were audited.
    let log = suite.access.get_access_log(&suite.admin, &0, &10);
    assert!(log.len() >= 2);
}

/// Revoking the token cuts anonymous access immediately, while the display
/// cache keeps showing the patient: cached display data never authorizes.
#[test]
fn test_revoked_token_denies_while_cache_still_displays() {
    let env = Env::default();
    set_time(&env, 1_000);
    let suite = deploy(&env);

    let token = digest(&env, 7);
    suite.access.issue_share_token(&suite.patient, &token, &DAY);
    suite.access.remember_patient(&suite.doctor, &suite.patient);

    suite.access.revoke_share_token(&suite.patient, &token);

    assert_eq!(
        suite
            .access
            .check_patient_access(&None::<Address>, &Some(token.clone()), &suite.patient),
        AccessDecision::Denied
    );
    assert!(suite
        .records
        .try_list_records(&None::<Address>, &Some(token), &suite.patient)
        .is_err());

    // The recent list is untouched: it is a display cache, not a grant.
    assert_eq!(suite.access.recent_patients(&suite.doctor).len(), 1);
    // And holding a cache entry gives the holder no anonymous path.
    assert_eq!(
        suite
            .access
            .check_patient_access(&None::<Address>, &None::<BytesN<32>>, &suite.patient),
        AccessDecision::Denied
    );
}

/// The appointment lifecycle end-to-end, with the notification stream
/// carrying each step to the patient.
#[test]
fn test_appointment_lifecycle_with_stream() {
    let env = Env::default();
    set_time(&env, 1_000);
    let suite = deploy(&env);

    let appt_id = suite.appts.request_appointment(
        &suite.patient,
        &suite.doctor,
        &(1_000 + DAY),
        &30,
        &appointments::AppointmentType::Consultation,
        &s(&env, "Persistent headaches"),
    );

    suite.appts.accept(&suite.doctor, &appt_id);
    suite.notify.notify(
        &suite.admin,
        &suite.patient,
        &NotificationType::AppointmentAccepted,
        &NotificationPriority::Normal,
        &s(&env, "Appointment accepted"),
        &s(&env, "Dr. Asha Mwangi accepted your request."),
        &Some(appt_id),
        &None,
    );

    // The patient polls the stream: connected batch with the acceptance.
    let batch = suite.notify.stream_poll(&suite.patient, &0, &10);
    assert!(batch.connected);
    assert_eq!(batch.notifications.len(), 1);
    assert_eq!(
        batch.notifications.get(0).unwrap().reference_id,
        Some(appt_id)
    );
    assert_eq!(batch.unread, 1);

    // Doctor notes: the patient sees only the shared half.
    suite.appts.update_notes(
        &suite.doctor,
        &appt_id,
        &s(&env, "Rest and hydration."),
        &s(&env, "Possible migraine; monitor."),
    );
    let seen = suite.appts.get_appointment(
        &Some(suite.patient.clone()),
        &None::<BytesN<32>>,
        &appt_id,
    );
    assert_eq!(seen.notes_shared, s(&env, "Rest and hydration."));
    assert_eq!(seen.notes_private, s(&env, ""));

    suite.appts.complete(&suite.doctor, &appt_id);
    let done = suite.appts.get_appointment(
        &Some(suite.doctor.clone()),
        &None::<BytesN<32>>,
        &appt_id,
    );
    assert_eq!(done.status, AppointmentStatus::Completed);

    let trail = suite.appts.get_history(&suite.admin, &appt_id);
    assert_eq!(trail.len(), 4); // created, accepted, notes, completed
}

/// Every time-bounded artifact lapses on its own clock: the share token,
/// the recent-patient cache entry, and the file ticket.
#[test]
fn test_independent_expiry_clocks() {
    let env = Env::default();
    set_time(&env, 1_000);
    let suite = deploy(&env);

    let token = digest(&env, 9);
    suite.access.issue_share_token(&suite.patient, &token, &DAY);
    suite.access.remember_patient(&suite.doctor, &suite.patient);
    let record_id = suite.records.add_record(
        &suite.doctor,
        &suite.patient,
        &s(&env, "X-ray"),
        &RecordCategory::Report,
        &s(&env, "image/png"),
        &100_000,
        &s(&env, "vault/2026/08/xray-0001.png"),
    );
    let ticket_id = suite.records.issue_file_ticket(
        &Some(suite.doctor.clone()),
        &None::<BytesN<32>>,
        &record_id,
        &TicketKind::Preview,
    );

    // Fifteen minutes: only the ticket has lapsed.
    set_time(&env, 1_000 + 900);
    assert_eq!(suite.records.ticket_status(&ticket_id), TicketState::Expired);
    assert_eq!(suite.access.resolve_token(&token), Some(suite.patient.clone()));
    assert_eq!(suite.access.recent_patients(&suite.doctor).len(), 1);

    // One day: the token follows.
    set_time(&env, 1_000 + DAY);
    assert_eq!(suite.access.resolve_token(&token), None);
    assert_eq!(suite.access.recent_patients(&suite.doctor).len(), 1);

    // Seven days: the display cache drains last.
    set_time(&env, 1_000 + WEEK);
    assert_eq!(suite.access.recent_patients(&suite.doctor).len(), 0);
}

/// Deactivating a doctor severs every downstream capability at the single
/// resolution point, with no per-contract cleanup.
#[test]
fn test_deactivated_doctor_loses_all_paths() {
    let env = Env::default();
    set_time(&env, 1_000);
    let suite = deploy(&env);

    let appt_id = suite.appts.request_appointment(
        &suite.patient,
        &suite.doctor,
        &(1_000 + DAY),
        &30,
        &appointments::AppointmentType::FollowUp,
        &s(&env, "Follow-up"),
    );
    suite.records.add_record(
        &suite.doctor,
        &suite.patient,
        &s(&env, "Blood panel"),
        &RecordCategory::Report,
        &s(&env, "application/pdf"),
        &1_000,
        &s(&env, "vault/2026/08/report-0002.pdf"),
    );

    suite.access.deactivate_user(&suite.admin, &suite.doctor);

    assert_eq!(
        suite
            .access
            .check_patient_access(&Some(suite.doctor.clone()), &None::<BytesN<32>>, &suite.patient),
        AccessDecision::Denied
    );
    assert!(suite
        .records
        .try_list_records(&Some(suite.doctor.clone()), &None::<BytesN<32>>, &suite.patient)
        .is_err());
    assert!(suite.appts.try_accept(&suite.doctor, &appt_id).is_err());
    assert!(suite
        .records
        .try_add_record(
            &suite.doctor,
            &suite.patient,
            &s(&env, "After deactivation"),
            &RecordCategory::Report,
            &s(&env, "application/pdf"),
            &1_000,
            &s(&env, "vault/2026/08/report-0003.pdf"),
        )
        .is_err());
}

/// A doctor session shadows any token in the same request context, and the
/// doctor path is what lands in the audit log.
#[test]
fn test_session_priority_over_token_across_contracts() {
    let env = Env::default();
    set_time(&env, 1_000);
    let suite = deploy(&env);

    let token = digest(&env, 3);
    suite.access.issue_share_token(&suite.patient, &token, &DAY);

    let decision = suite.access.check_patient_access(
        &Some(suite.doctor.clone()),
        &Some(token.clone()),
        &suite.patient,
    );
    assert_eq!(decision, AccessDecision::Granted(AccessPath::DoctorSession));

    // The token was not consumed by the shadowed path.
    assert_eq!(
        suite
            .access
            .get_share_token(&suite.patient, &token)
            .use_count,
        0
    );
}
