//! Consent grants and consent-scoped record access

mod common;

use acad_contract::ErrorKind;
use acad_core::{ConsentScope, ConsentStatus};
use common::*;

fn student_self(roll: &str) -> acad_ledger::ClientIdentity {
    registrar()
        .with_attribute("role", "student")
        .with_attribute("rollNumber", roll)
}

#[test]
fn test_grant_revoke_regrant() {
    let mut h = Harness::new();
    h.add_student("21CS1001", "CSE");

    h.submit(&registrar(), |c, ctx| {
        c.grant_consent(ctx, "CON-1", "21CS1001", "acme-hr", ConsentScope::FullRecord)
    })
    .unwrap();
    assert!(h
        .query(&registrar(), |c, ctx| c.check_consent(ctx, "21CS1001", "acme-hr"))
        .unwrap());

    let err = h
        .submit(&registrar(), |c, ctx| {
            c.grant_consent(ctx, "CON-2", "21CS1001", "acme-hr", ConsentScope::FullRecord)
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    h.submit(&registrar(), |c, ctx| c.revoke_consent(ctx, "CON-1"))
        .unwrap();
    assert!(!h
        .query(&registrar(), |c, ctx| c.check_consent(ctx, "21CS1001", "acme-hr"))
        .unwrap());

    let err = h
        .submit(&registrar(), |c, ctx| c.revoke_consent(ctx, "CON-1"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // Consent ids are never reused
    let err = h
        .submit(&registrar(), |c, ctx| {
            c.grant_consent(ctx, "CON-1", "21CS1001", "acme-hr", ConsentScope::FullRecord)
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    h.submit(&registrar(), |c, ctx| {
        c.grant_consent(
            ctx,
            "CON-2",
            "21CS1001",
            "acme-hr",
            ConsentScope::Semester { semester: 2 },
        )
    })
    .unwrap();

    let history = h
        .query(&registrar(), |c, ctx| c.get_consents_by_student(ctx, "21CS1001"))
        .unwrap();
    assert_eq!(history.len(), 2);
    let active: Vec<&str> = history
        .iter()
        .filter(|c| c.status == ConsentStatus::Active)
        .map(|c| c.consent_id.as_str())
        .collect();
    assert_eq!(active, vec!["CON-2"]);
}

#[test]
fn test_consent_is_per_requester() {
    let mut h = Harness::new();
    h.add_student("21CS1001", "CSE");

    h.submit(&registrar(), |c, ctx| {
        c.grant_consent(ctx, "CON-1", "21CS1001", "acme-hr", ConsentScope::FullRecord)
    })
    .unwrap();
    h.submit(&registrar(), |c, ctx| {
        c.grant_consent(ctx, "CON-2", "21CS1001", "globex", ConsentScope::FullRecord)
    })
    .unwrap();

    assert!(!h
        .query(&registrar(), |c, ctx| c.check_consent(ctx, "21CS1001", "initech"))
        .unwrap());
    assert!(h
        .query(&registrar(), |c, ctx| c.check_consent(ctx, "21CS1001", "globex"))
        .unwrap());
}

#[test]
fn test_student_may_manage_only_own_consent() {
    let mut h = Harness::new();
    h.add_student("21CS1001", "CSE");
    h.add_student("21CS1002", "CSE");

    h.submit(&student_self("21CS1001"), |c, ctx| {
        c.grant_consent(ctx, "CON-1", "21CS1001", "acme-hr", ConsentScope::FullRecord)
    })
    .unwrap();

    let err = h
        .submit(&student_self("21CS1001"), |c, ctx| {
            c.grant_consent(ctx, "CON-2", "21CS1002", "acme-hr", ConsentScope::FullRecord)
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = h
        .submit(&student_self("21CS1002"), |c, ctx| c.revoke_consent(ctx, "CON-1"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = h
        .submit(&verifier("acme-hr"), |c, ctx| {
            c.grant_consent(ctx, "CON-3", "21CS1002", "acme-hr", ConsentScope::FullRecord)
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn test_view_records_limited_to_scope() {
    let mut h = Harness::new();
    h.add_student("21CS1001", "CSE");
    h.add_record("SEM-1", "21CS1001", 1, "B");
    h.add_record("SEM-2", "21CS1001", 2, "A");
    h.add_record("SEM-3", "21CS1001", 3, "A");
    h.finalize("SEM-1").unwrap();
    h.finalize("SEM-2").unwrap();

    let err = h
        .query(&verifier("acme-hr"), |c, ctx| c.view_records_with_consent(ctx, "21CS1001"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    h.submit(&registrar(), |c, ctx| {
        c.grant_consent(
            ctx,
            "CON-1",
            "21CS1001",
            "acme-hr",
            ConsentScope::Semester { semester: 2 },
        )
    })
    .unwrap();
    let records = h
        .query(&verifier("acme-hr"), |c, ctx| c.view_records_with_consent(ctx, "21CS1001"))
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_id, "SEM-2");

    h.submit(&registrar(), |c, ctx| c.revoke_consent(ctx, "CON-1"))
        .unwrap();
    h.submit(&registrar(), |c, ctx| {
        c.grant_consent(ctx, "CON-2", "21CS1001", "acme-hr", ConsentScope::FullRecord)
    })
    .unwrap();

    // Drafts stay hidden even under a full-record consent
    let records = h
        .query(&verifier("acme-hr"), |c, ctx| c.view_records_with_consent(ctx, "21CS1001"))
        .unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.record_id.as_str()).collect();
    assert_eq!(ids, vec!["SEM-1", "SEM-2"]);

    // Other verifiers hold no consent
    let err = h
        .query(&verifier("globex"), |c, ctx| c.view_records_with_consent(ctx, "21CS1001"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    // Central callers use the ordinary record queries instead
    let err = h
        .query(&registrar(), |c, ctx| c.view_records_with_consent(ctx, "21CS1001"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
}
