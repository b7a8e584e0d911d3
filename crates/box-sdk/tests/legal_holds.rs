mod common;

use box_sdk::resource::BoxResource;
use box_sdk::{BoxFileVersion, BoxInfo, BoxLegalHold, BoxLegalHoldAssignment, LegalHoldInfo, LegalHoldStatus};
use chrono::{TimeZone, Utc};
use futures_util::{pin_mut, TryStreamExt};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn policy_json() -> serde_json::Value {
    json!({
        "type": "legal_hold_policy",
        "id": "166757",
        "policy_name": "Policy 4",
        "description": "Postman created policy",
        "status": "active",
        "assignment_counts": {"user": 1, "folder": 2, "file": 3, "file_version": 4},
        "created_by": {"type": "user", "id": "2030388321", "name": "Steve Boxuser", "login": "steve@box.com"},
        "created_at": "2016-05-18T10:28:45-07:00",
        "modified_at": "2016-05-18T11:25:59-07:00",
        "deleted_at": null,
        "filter_started_at": "2016-05-17T01:00:00-07:00",
        "filter_ended_at": "2016-05-21T01:00:00-07:00",
        "release_notes": "non-empty note"
    })
}

#[tokio::test]
async fn get_info_parses_every_field() {
    let (server, api) = common::setup().await;
    Mock::given(method("GET"))
        .and(path("/legal_hold_policies/166757"))
        .and(header("authorization", format!("Bearer {}", common::TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(policy_json()))
        .expect(1)
        .mount(&server)
        .await;

    let info = BoxLegalHold::new(&api, "166757").get_info(&[]).await.unwrap();

    assert_eq!(info.id.as_deref(), Some("166757"));
    assert_eq!(info.policy_name.as_deref(), Some("Policy 4"));
    assert_eq!(info.description.as_deref(), Some("Postman created policy"));
    assert_eq!(info.status, Some(LegalHoldStatus::Active));
    let counts = info.assignment_counts.unwrap();
    assert_eq!((counts.user, counts.folder, counts.file, counts.file_version), (1, 2, 3, 4));
    let creator = info.created_by.as_ref().unwrap();
    assert_eq!(creator.id.as_deref(), Some("2030388321"));
    assert_eq!(creator.login.as_deref(), Some("steve@box.com"));
    assert_eq!(info.created_at, Some(Utc.with_ymd_and_hms(2016, 5, 18, 17, 28, 45).unwrap()));
    assert_eq!(info.deleted_at, None);
    assert_eq!(info.filter_started_at, Some(Utc.with_ymd_and_hms(2016, 5, 17, 8, 0, 0).unwrap()));
    assert_eq!(info.release_notes.as_deref(), Some("non-empty note"));
}

#[tokio::test]
async fn get_info_sends_requested_fields() {
    let (server, api) = common::setup().await;
    Mock::given(method("GET"))
        .and(path("/legal_hold_policies/0"))
        .and(query_param("fields", "policy_name,status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "0"})))
        .expect(1)
        .mount(&server)
        .await;

    let info = BoxLegalHold::new(&api, "0").get_info(&["policy_name", "status"]).await.unwrap();
    assert_eq!(info.id.as_deref(), Some("0"));
    assert_eq!(info.policy_name, None);
}

#[tokio::test]
async fn create_sends_filters_as_utc_timestamps() {
    let (server, api) = common::setup().await;
    Mock::given(method("POST"))
        .and(path("/legal_hold_policies"))
        .and(body_json(json!({
            "policy_name": "policy",
            "description": "some description",
            "filter_started_at": "2014-05-11T00:00:00+00:00",
            "filter_ended_at": "2016-05-11T00:00:00+00:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"type": "legal_hold_policy", "id": "166921"})))
        .expect(1)
        .mount(&server)
        .await;

    let info = BoxLegalHold::create(
        &api,
        "policy",
        Some("some description"),
        Some(Utc.with_ymd_and_hms(2014, 5, 11, 0, 0, 0).unwrap()),
        Some(Utc.with_ymd_and_hms(2016, 5, 11, 0, 0, 0).unwrap()),
    )
    .await
    .unwrap();
    assert_eq!(info.id.as_deref(), Some("166921"));
}

#[tokio::test]
async fn update_info_sends_only_pending_changes() {
    let (server, api) = common::setup().await;
    Mock::given(method("PUT"))
        .and(path("/legal_hold_policies/166757"))
        .and(body_json(json!({"release_notes": "case closed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "legal_hold_policy",
            "id": "166757",
            "release_notes": "case closed",
            "status": "releasing",
            "description": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = BoxLegalHold::new(&api, "166757");
    let mut info = LegalHoldInfo::from_json(policy_json()).unwrap();
    info.set_release_notes("case closed");
    policy.update_info(&mut info).await.unwrap();

    assert_eq!(info.pending_changes(), None);
    assert_eq!(info.status, Some(LegalHoldStatus::Releasing));
    assert_eq!(info.release_notes.as_deref(), Some("case closed"));
    assert_eq!(info.description.as_deref(), Some("Postman created policy"));
}

#[tokio::test]
async fn delete_sends_delete() {
    let (server, api) = common::setup().await;
    Mock::given(method("DELETE"))
        .and(path("/legal_hold_policies/0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    BoxLegalHold::new(&api, "0").delete().await.unwrap();
}

#[tokio::test]
async fn get_all_follows_markers() {
    let (server, api) = common::setup().await;
    Mock::given(method("GET"))
        .and(path("/legal_hold_policies"))
        .and(query_param("marker", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"type": "legal_hold_policy", "id": "3", "policy_name": "Three"}],
            "limit": 2,
            "next_marker": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legal_hold_policies"))
        .and(query_param("policy_name", "Trial"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                {"type": "legal_hold_policy", "id": "1", "policy_name": "Trial One"},
                {"type": "legal_hold_policy", "id": "2", "policy_name": "Trial Two"}
            ],
            "limit": 2,
            "next_marker": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let all = BoxLegalHold::get_all(&api, Some("Trial"), 2, &[]).unwrap().collect().await.unwrap();
    let ids: Vec<_> = all.iter().filter_map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn empty_first_page_yields_nothing() {
    let (server, api) = common::setup().await;
    Mock::given(method("GET"))
        .and(path("/legal_hold_policies/166757/assignments"))
        .and(query_param("assign_to_type", "file"))
        .and(query_param("assign_to_id", "5025127885"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": [], "limit": 100})))
        .expect(1)
        .mount(&server)
        .await;

    let assignments = BoxLegalHold::new(&api, "166757")
        .get_assignments(Some("file"), Some("5025127885"), 100, &[])
        .unwrap();
    let stream = assignments.stream();
    pin_mut!(stream);
    assert!(stream.try_next().await.unwrap().is_none());
}

#[tokio::test]
async fn assign_to_uses_the_resource_type() {
    let (server, api) = common::setup().await;
    Mock::given(method("POST"))
        .and(path("/legal_hold_policy_assignments"))
        .and(body_json(json!({
            "policy_id": "166757",
            "assign_to": {"type": "file_version", "id": "124887629"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "type": "legal_hold_policy_assignment",
            "id": "255473",
            "legal_hold_policy": {"type": "legal_hold_policy", "id": "166757", "policy_name": "Bug Bash 5-12 Policy 3 updated"},
            "assigned_to": {"type": "file_version", "id": "124887629"},
            "assigned_by": {"type": "user", "id": "2030388321", "name": "Steve Boxuser", "login": "steve@box.com"},
            "assigned_at": "2016-05-18T17:38:03-07:00",
            "deleted_at": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let version = BoxFileVersion::new(&api, "124887629");
    let info = BoxLegalHold::new(&api, "166757").assign_to(&version).await.unwrap();

    assert_eq!(BoxFileVersion::RESOURCE_TYPE, "file_version");
    assert_eq!(info.id.as_deref(), Some("255473"));
    assert_eq!(info.assigned_to_type(), Some("file_version"));
    assert_eq!(info.assigned_to_id(), Some("124887629"));
    assert_eq!(
        info.legal_hold_policy.as_ref().and_then(|p| p.policy_name.as_deref()),
        Some("Bug Bash 5-12 Policy 3 updated")
    );
    assert_eq!(info.assigned_at, Some(Utc.with_ymd_and_hms(2016, 5, 19, 0, 38, 3).unwrap()));
}

#[tokio::test]
async fn assignment_get_info_and_delete() {
    let (server, api) = common::setup().await;
    Mock::given(method("GET"))
        .and(path("/legal_hold_policy_assignments/255473"))
        .and(query_param("fields", "assigned_to"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "legal_hold_policy_assignment",
            "id": "255473",
            "assigned_to": {"type": "user", "id": "17"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/legal_hold_policy_assignments/255473"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let assignment = BoxLegalHoldAssignment::new(&api, "255473");
    let info = assignment.get_info(&["assigned_to"]).await.unwrap();
    assert_eq!(info.assigned_to_type(), Some("user"));
    assignment.delete().await.unwrap();
}
