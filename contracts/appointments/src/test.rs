#![cfg(test)]
#![allow(clippy::unwrap_used)]

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, BytesN, Env, String,
};

use patient_access::{PatientAccessContract, PatientAccessContractClient, Role};

use crate::{
    errors::Error, AppointmentStatus, AppointmentType, AppointmentsContract,
    AppointmentsContractClient, NO_STATUS,
};

const DAY: u64 = 86_400;

// ==================== Helpers ====================

struct Fixture<'a> {
    access: PatientAccessContractClient<'a>,
    appts: AppointmentsContractClient<'a>,
    admin: Address,
    doctor: Address,
    patient: Address,
}

fn setup(env: &Env) -> Fixture<'_> {
    env.mock_all_auths_allowing_non_root_auth();
    env.ledger().with_mut(|l| l.timestamp = 1_000);

    let access_id = Address::generate(env);
    env.register_contract(&access_id, PatientAccessContract);
    let access = PatientAccessContractClient::new(env, &access_id);

    let appts_id = Address::generate(env);
    env.register_contract(&appts_id, AppointmentsContract);
    let appts = AppointmentsContractClient::new(env, &appts_id);

    let admin = Address::generate(env);
    access.initialize(&admin);
    appts.initialize(&admin, &access_id);

    let doctor = Address::generate(env);
    access.register_user(
        &admin,
        &doctor,
        &Role::Doctor,
        &s(env, "Dr. Asha Mwangi"),
        &s(env, "asha@clinic.example"),
        &s(env, "+254700000001"),
    );
    let patient = Address::generate(env);
    access.register_user(
        &admin,
        &patient,
        &Role::Patient,
        &s(env, "Jomo Otieno"),
        &s(env, "jomo@mail.example"),
        &s(env, "+254700000002"),
    );

    Fixture {
        access,
        appts,
        admin,
        doctor,
        patient,
    }
}

fn s(env: &Env, text: &str) -> String {
    String::from_str(env, text)
}

fn request(env: &Env, fx: &Fixture) -> u64 {
    fx.appts.request_appointment(
        &fx.patient,
        &fx.doctor,
        &(1_000 + DAY),
        &30,
        &AppointmentType::Consultation,
        &s(env, "Persistent headaches"),
    )
}

fn set_time(env: &Env, ts: u64) {
    env.ledger().with_mut(|l| l.timestamp = ts);
}

// ==================== Requesting ====================

#[test]
fn test_request_creates_pending_appointment() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    assert_eq!(id, 1);

    let appt = fx
        .appts
        .get_appointment(&Some(fx.patient.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(appt.status, AppointmentStatus::Pending);
    assert_eq!(appt.doctor, fx.doctor);
    assert!(!appt.running_late);
}

#[test]
fn test_request_records_creation_history() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);

    let trail = fx.appts.get_history(&fx.patient, &id);
    assert_eq!(trail.len(), 1);
    let entry = trail.get(0).unwrap();
    assert_eq!(entry.previous_status, NO_STATUS);
    assert_eq!(entry.new_status, AppointmentStatus::Pending as u32);
}

#[test]
fn test_request_rejects_past_slot() {
    let env = Env::default();
    let fx = setup(&env);
    assert!(matches!(
        fx.appts.try_request_appointment(
            &fx.patient,
            &fx.doctor,
            &500,
            &30,
            &AppointmentType::Consultation,
            &s(&env, "Too late"),
        ),
        Err(Ok(Error::InvalidSchedule))
    ));
}

#[test]
fn test_request_duration_bounds() {
    let env = Env::default();
    let fx = setup(&env);
    for bad in [0u32, 4, 241] {
        assert!(matches!(
            fx.appts.try_request_appointment(
                &fx.patient,
                &fx.doctor,
                &(1_000 + DAY),
                &bad,
                &AppointmentType::Consultation,
                &s(&env, "Odd duration"),
            ),
            Err(Ok(Error::InvalidDuration))
        ));
    }
}

#[test]
fn test_request_requires_registered_parties() {
    let env = Env::default();
    let fx = setup(&env);
    // Unregistered doctor.
    assert!(matches!(
        fx.appts.try_request_appointment(
            &fx.patient,
            &Address::generate(&env),
            &(1_000 + DAY),
            &30,
            &AppointmentType::Consultation,
            &s(&env, "Who?"),
        ),
        Err(Ok(Error::NotAuthorized))
    ));
    // A doctor cannot file a patient-side request.
    assert!(matches!(
        fx.appts.try_request_appointment(
            &fx.doctor,
            &fx.doctor,
            &(1_000 + DAY),
            &30,
            &AppointmentType::Consultation,
            &s(&env, "Self"),
        ),
        Err(Ok(Error::NotAuthorized))
    ));
}

// ==================== Doctor Transitions ====================

#[test]
fn test_accept_then_complete() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);

    fx.appts.accept(&fx.doctor, &id);
    let appt = fx
        .appts
        .get_appointment(&Some(fx.doctor.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(appt.status, AppointmentStatus::Accepted);

    fx.appts.complete(&fx.doctor, &id);
    let appt = fx
        .appts
        .get_appointment(&Some(fx.doctor.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(appt.status, AppointmentStatus::Completed);
}

#[test]
fn test_reject_pending() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    fx.appts.reject(&fx.doctor, &id);
    let appt = fx
        .appts
        .get_appointment(&Some(fx.patient.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(appt.status, AppointmentStatus::Rejected);
}

#[test]
fn test_transitions_enforce_status_graph() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);

    // Completing a pending appointment skips a state.
    assert!(matches!(
        fx.appts.try_complete(&fx.doctor, &id),
        Err(Ok(Error::InvalidTransition))
    ));

    fx.appts.accept(&fx.doctor, &id);
    // Accepting twice is invalid, as is rejecting an accepted appointment.
    assert!(matches!(
        fx.appts.try_accept(&fx.doctor, &id),
        Err(Ok(Error::InvalidTransition))
    ));
    assert!(matches!(
        fx.appts.try_reject(&fx.doctor, &id),
        Err(Ok(Error::InvalidTransition))
    ));
}

#[test]
fn test_only_assigned_doctor_transitions() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);

    let other = Address::generate(&env);
    fx.access.register_user(
        &fx.admin,
        &other,
        &Role::Doctor,
        &s(&env, "Dr. Kip Rotich"),
        &s(&env, "kip@clinic.example"),
        &s(&env, "+254700000004"),
    );
    assert!(matches!(
        fx.appts.try_accept(&other, &id),
        Err(Ok(Error::NotAuthorized))
    ));
}

#[test]
fn test_deactivated_doctor_cannot_transition() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    fx.access.deactivate_user(&fx.admin, &fx.doctor);
    assert!(matches!(
        fx.appts.try_accept(&fx.doctor, &id),
        Err(Ok(Error::NotAuthorized))
    ));
}

#[test]
fn test_no_show_only_after_slot_time() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    fx.appts.accept(&fx.doctor, &id);

    assert!(matches!(
        fx.appts.try_mark_no_show(&fx.doctor, &id),
        Err(Ok(Error::NotYetDue))
    ));

    set_time(&env, 1_000 + DAY + 1);
    fx.appts.mark_no_show(&fx.doctor, &id);
    let appt = fx
        .appts
        .get_appointment(&Some(fx.doctor.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(appt.status, AppointmentStatus::NoShow);
}

#[test]
fn test_running_late_flag_lifecycle() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);

    // Only an accepted appointment can run late.
    assert!(matches!(
        fx.appts.try_flag_running_late(&fx.doctor, &id),
        Err(Ok(Error::InvalidTransition))
    ));

    fx.appts.accept(&fx.doctor, &id);
    fx.appts.flag_running_late(&fx.doctor, &id);
    let appt = fx
        .appts
        .get_appointment(&Some(fx.patient.clone()), &None::<BytesN<32>>, &id);
    assert!(appt.running_late);

    fx.appts.complete(&fx.doctor, &id);
    let appt = fx
        .appts
        .get_appointment(&Some(fx.patient.clone()), &None::<BytesN<32>>, &id);
    assert!(!appt.running_late);
}

// ==================== Cancellation ====================

#[test]
fn test_either_party_can_cancel() {
    let env = Env::default();
    let fx = setup(&env);

    let id1 = request(&env, &fx);
    fx.appts.cancel(&fx.patient, &id1);
    assert_eq!(
        fx.appts
            .get_appointment(&Some(fx.patient.clone()), &None::<BytesN<32>>, &id1)
            .status,
        AppointmentStatus::Cancelled
    );

    let id2 = request(&env, &fx);
    fx.appts.accept(&fx.doctor, &id2);
    fx.appts.cancel(&fx.doctor, &id2);
    assert_eq!(
        fx.appts
            .get_appointment(&Some(fx.doctor.clone()), &None::<BytesN<32>>, &id2)
            .status,
        AppointmentStatus::Cancelled
    );
}

#[test]
fn test_cannot_cancel_terminal_states() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    fx.appts.accept(&fx.doctor, &id);
    fx.appts.complete(&fx.doctor, &id);
    assert!(matches!(
        fx.appts.try_cancel(&fx.patient, &id),
        Err(Ok(Error::InvalidTransition))
    ));
}

#[test]
fn test_stranger_cannot_cancel() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    assert!(matches!(
        fx.appts.try_cancel(&Address::generate(&env), &id),
        Err(Ok(Error::NotAuthorized))
    ));
}

// ==================== Notes & Redaction ====================

#[test]
fn test_private_notes_are_redacted_for_everyone_but_the_doctor() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    fx.appts.accept(&fx.doctor, &id);
    fx.appts.update_notes(
        &fx.doctor,
        &id,
        &s(&env, "Rest and hydration."),
        &s(&env, "Possible migraine; monitor."),
    );

    // The doctor reads both notes back.
    let own = fx
        .appts
        .get_appointment(&Some(fx.doctor.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(own.notes_private, s(&env, "Possible migraine; monitor."));

    // The patient sees the shared note only.
    let seen = fx
        .appts
        .get_appointment(&Some(fx.patient.clone()), &None::<BytesN<32>>, &id);
    assert_eq!(seen.notes_shared, s(&env, "Rest and hydration."));
    assert_eq!(seen.notes_private, s(&env, ""));

    // Another doctor passes the gate but is not this appointment's doctor.
    let other = Address::generate(&env);
    fx.access.register_user(
        &fx.admin,
        &other,
        &Role::Doctor,
        &s(&env, "Dr. Kip Rotich"),
        &s(&env, "kip@clinic.example"),
        &s(&env, "+254700000004"),
    );
    let seen = fx
        .appts
        .get_appointment(&Some(other), &None::<BytesN<32>>, &id);
    assert_eq!(seen.notes_private, s(&env, ""));
}

#[test]
fn test_notes_length_bound() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    // 501 bytes — one over the ceiling.
    let long = String::from_bytes(&env, &[b'a'; 501]);
    assert!(matches!(
        fx.appts.try_update_notes(&fx.doctor, &id, &long, &s(&env, "")),
        Err(Ok(Error::NotesTooLong))
    ));
}

// ==================== Listings ====================

#[test]
fn test_list_for_patient_paginates_in_order() {
    let env = Env::default();
    let fx = setup(&env);
    for _ in 0..5u32 {
        request(&env, &fx);
    }

    let first = fx.appts.list_for_patient(
        &Some(fx.patient.clone()),
        &None::<BytesN<32>>,
        &fx.patient,
        &0,
        &3,
    );
    assert_eq!(first.len(), 3);
    assert_eq!(first.get(0).unwrap().id, 1);

    let second = fx.appts.list_for_patient(
        &Some(fx.patient.clone()),
        &None::<BytesN<32>>,
        &fx.patient,
        &1,
        &3,
    );
    assert_eq!(second.len(), 2);
    assert_eq!(second.get(0).unwrap().id, 4);
}

#[test]
fn test_list_for_patient_via_share_token() {
    let env = Env::default();
    let fx = setup(&env);
    request(&env, &fx);
    let token = BytesN::from_array(&env, &[3u8; 32]);
    fx.access.issue_share_token(&fx.patient, &token, &DAY);

    let listed = fx
        .appts
        .list_for_patient(&None::<Address>, &Some(token), &fx.patient, &0, &10);
    assert_eq!(listed.len(), 1);
    // Anonymous viewers never see private notes.
    assert_eq!(listed.get(0).unwrap().notes_private, s(&env, ""));
}

#[test]
fn test_list_for_doctor() {
    let env = Env::default();
    let fx = setup(&env);
    request(&env, &fx);
    request(&env, &fx);

    let listed = fx.appts.list_for_doctor(&fx.doctor, &0, &10);
    assert_eq!(listed.len(), 2);

    // A patient has no doctor-side listing.
    assert!(matches!(
        fx.appts.try_list_for_doctor(&fx.patient, &0, &10),
        Err(Ok(Error::NotAuthorized))
    ));
}

#[test]
fn test_listing_denied_without_credentials() {
    let env = Env::default();
    let fx = setup(&env);
    request(&env, &fx);
    assert!(matches!(
        fx.appts.try_list_for_patient(
            &None::<Address>,
            &None::<BytesN<32>>,
            &fx.patient,
            &0,
            &10
        ),
        Err(Ok(Error::NotAuthorized))
    ));
}

// ==================== History ====================

#[test]
fn test_history_tracks_full_lifecycle() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);
    fx.appts.accept(&fx.doctor, &id);
    fx.appts.complete(&fx.doctor, &id);

    let trail = fx.appts.get_history(&fx.doctor, &id);
    assert_eq!(trail.len(), 3);
    assert_eq!(
        trail.get(1).unwrap().previous_status,
        AppointmentStatus::Pending as u32
    );
    assert_eq!(
        trail.get(2).unwrap().new_status,
        AppointmentStatus::Completed as u32
    );
}

#[test]
fn test_history_restricted_to_parties_and_admin() {
    let env = Env::default();
    let fx = setup(&env);
    let id = request(&env, &fx);

    assert_eq!(fx.appts.get_history(&fx.admin, &id).len(), 1);
    assert!(matches!(
        fx.appts.try_get_history(&Address::generate(&env), &id),
        Err(Ok(Error::NotAuthorized))
    ));
}
