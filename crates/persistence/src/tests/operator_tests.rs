// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data_models::{OperatorData, SessionData};
use crate::error::PersistenceError;
use crate::Persistence;

fn create_admin(persistence: &mut Persistence) -> i64 {
    persistence
        .create_operator("Admin", "Administrator", "Sigurna-Lozinka1", "admin")
        .unwrap()
}

#[test]
fn test_create_operator_normalizes_login() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    let operator: OperatorData = persistence
        .get_operator_by_login("ADMIN")
        .unwrap()
        .expect("operator should exist");
    assert_eq!(operator.operator_id, operator_id);
    assert_eq!(operator.login_name, "admin");
    assert_eq!(operator.role, "admin");
    assert!(operator.last_login_at.is_none());
}

#[test]
fn test_password_is_hashed() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert_ne!(operator.password_hash, "Sigurna-Lozinka1");
    assert!(
        persistence
            .verify_password("Sigurna-Lozinka1", &operator.password_hash)
            .unwrap()
    );
    assert!(
        !persistence
            .verify_password("pogresna", &operator.password_hash)
            .unwrap()
    );
}

#[test]
fn test_duplicate_login_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_admin(&mut persistence);

    let result: Result<i64, PersistenceError> =
        persistence.create_operator("admin", "Other", "Druga-Lozinka2", "viewer");

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateLoginName(String::from("admin")))
    );
}

#[test]
fn test_invalid_role_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let result: Result<i64, PersistenceError> =
        persistence.create_operator("boss", "Boss", "Lozinka-Tri3", "owner");
    assert!(result.is_err());
}

#[test]
fn test_update_last_login() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    persistence.update_last_login(operator_id).unwrap();

    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert!(operator.last_login_at.is_some());
}

#[test]
fn test_update_password() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    persistence
        .update_password(operator_id, "Nova-Lozinka9")
        .unwrap();

    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert!(
        persistence
            .verify_password("Nova-Lozinka9", &operator.password_hash)
            .unwrap()
    );
    assert!(matches!(
        persistence.update_password(9999, "Nova-Lozinka9"),
        Err(PersistenceError::OperatorNotFound(_))
    ));
}

#[test]
fn test_update_login_name() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);
    persistence
        .create_operator("pregled", "Viewer", "Lozinka-Cetiri4", "viewer")
        .unwrap();

    persistence
        .update_login_name(operator_id, "Vlasnik")
        .unwrap();
    assert!(persistence.get_operator_by_login("admin").unwrap().is_none());
    assert!(persistence.get_operator_by_login("vlasnik").unwrap().is_some());

    assert_eq!(
        persistence.update_login_name(operator_id, "PREGLED"),
        Err(PersistenceError::DuplicateLoginName(String::from("pregled")))
    );
}

#[test]
fn test_session_lifecycle() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    let session_id: i64 = persistence
        .create_session("token-abc", operator_id, "2026-10-19T14:30:05Z")
        .unwrap();

    let session: SessionData = persistence
        .get_session_by_token("token-abc")
        .unwrap()
        .expect("session should exist");
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.operator_id, operator_id);
    assert_eq!(session.expires_at, "2026-10-19T14:30:05Z");

    persistence.update_session_activity(session_id).unwrap();
    persistence.delete_session("token-abc").unwrap();
    assert!(persistence.get_session_by_token("token-abc").unwrap().is_none());
}

#[test]
fn test_delete_sessions_for_operator() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    persistence
        .create_session("token-1", operator_id, "2026-10-19T14:30:05Z")
        .unwrap();
    persistence
        .create_session("token-2", operator_id, "2026-10-19T14:30:05Z")
        .unwrap();

    assert_eq!(persistence.delete_sessions_for_operator(operator_id).unwrap(), 2);
    assert!(persistence.get_session_by_token("token-1").unwrap().is_none());
}

#[test]
fn test_delete_expired_sessions() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let operator_id: i64 = create_admin(&mut persistence);

    persistence
        .create_session("stale", operator_id, "2026-10-17T08:00:00Z")
        .unwrap();
    persistence
        .create_session("fresh", operator_id, "2026-10-19T08:00:00Z")
        .unwrap();

    let deleted: usize = persistence
        .delete_expired_sessions("2026-10-18T08:00:00Z")
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(persistence.get_session_by_token("stale").unwrap().is_none());
    assert!(persistence.get_session_by_token("fresh").unwrap().is_some());
}
