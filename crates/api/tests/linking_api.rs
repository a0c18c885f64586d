//! Link management and "available to link" pickers.

mod common;

use axum::http::StatusCode;
use common::{create, delete_auth, expect_json, get_auth, post_json_auth, signed_in_user};
use serde_json::{json, Value};
use sqlx::PgPool;

fn ids(list: &Value) -> Vec<String> {
    let mut ids: Vec<String> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

async fn list(app: &common::TestApp, uri: &str, token: &str) -> Value {
    expect_json(get_auth(app, uri, token).await, StatusCode::OK).await
}

// ---------------------------------------------------------------------------
// Cast
// ---------------------------------------------------------------------------

/// Casting shrinks the available set; removing the entry restores it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cast_availability_tracks_links(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let work = create(&app, "/api/works", &token, json!({ "title": "Saga" })).await;
    let c1 = create(&app, "/api/characters", &token, json!({ "name": "Ann" })).await;
    let c2 = create(&app, "/api/characters", &token, json!({ "name": "Bob" })).await;
    let c3 = create(&app, "/api/characters", &token, json!({ "name": "Cid" })).await;
    let available = format!("/api/works/{work}/cast/available");

    assert_eq!(
        ids(&list(&app, &available, &token).await),
        sorted(vec![c1.clone(), c2.clone(), c3.clone()])
    );

    let entry = create(
        &app,
        &format!("/api/works/{work}/cast"),
        &token,
        json!({ "character_id": c2 }),
    )
    .await;
    assert_eq!(
        ids(&list(&app, &available, &token).await),
        sorted(vec![c1.clone(), c3.clone()])
    );

    let cast = list(&app, &format!("/api/works/{work}/cast"), &token).await;
    assert_eq!(ids(&cast), vec![entry.clone()]);
    assert_eq!(cast[0]["character_id"], c2.as_str());

    let response = delete_auth(&app, &format!("/api/cast/{entry}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        ids(&list(&app, &available, &token).await),
        sorted(vec![c1, c2, c3])
    );
}

/// Other users' characters never show up as available.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_availability_is_owner_scoped(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, alice) = signed_in_user(&pool, &app, "alice").await;
    let (_, bob) = signed_in_user(&pool, &app, "bob").await;
    let work = create(&app, "/api/works", &alice, json!({ "title": "Saga" })).await;
    let mine = create(&app, "/api/characters", &alice, json!({ "name": "Ann" })).await;
    create(&app, "/api/characters", &bob, json!({ "name": "Bob" })).await;

    let json = list(&app, &format!("/api/works/{work}/cast/available"), &alice).await;
    assert_eq!(ids(&json), vec![mine]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_cast_entry_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let work = create(&app, "/api/works", &token, json!({ "title": "Saga" })).await;
    let character = create(&app, "/api/characters", &token, json!({ "name": "Ann" })).await;
    let uri = format!("/api/works/{work}/cast");

    create(&app, &uri, &token, json!({ "character_id": character })).await;
    let response = post_json_auth(&app, &uri, &token, json!({ "character_id": character })).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_lists_its_appearances(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let w1 = create(&app, "/api/works", &token, json!({ "title": "One" })).await;
    let w2 = create(&app, "/api/works", &token, json!({ "title": "Two" })).await;
    let character = create(&app, "/api/characters", &token, json!({ "name": "Ann" })).await;
    for work in [&w1, &w2] {
        create(
            &app,
            &format!("/api/works/{work}/cast"),
            &token,
            json!({ "character_id": character }),
        )
        .await;
    }

    let json = list(&app, &format!("/api/characters/{character}/works"), &token).await;
    let mut works: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["work_id"].as_str().unwrap())
        .collect();
    works.sort();
    let mut expected = vec![w1.as_str(), w2.as_str()];
    expected.sort();
    assert_eq!(works, expected);
}

// ---------------------------------------------------------------------------
// Location links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_location_link_availability_and_conflict(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let work = create(&app, "/api/works", &token, json!({ "title": "Saga" })).await;
    let l1 = create(&app, "/api/locations", &token, json!({ "title": "Keep" })).await;
    let l2 = create(&app, "/api/locations", &token, json!({ "title": "Moor" })).await;
    let uri = format!("/api/works/{work}/locations");

    create(&app, &uri, &token, json!({ "location_id": l1 })).await;
    let json = list(&app, &format!("{uri}/available"), &token).await;
    assert_eq!(ids(&json), vec![l2]);

    let response = post_json_auth(&app, &uri, &token, json!({ "location_id": l1 })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

struct Cast {
    work: String,
    entries: Vec<String>,
}

/// A work with `n` cast entries.
async fn cast_of(app: &common::TestApp, token: &str, n: usize) -> Cast {
    let work = create(app, "/api/works", token, json!({ "title": "Saga" })).await;
    let mut entries = Vec::new();
    for i in 0..n {
        let character = create(
            app,
            "/api/characters",
            token,
            json!({ "name": format!("Character {i}") }),
        )
        .await;
        entries.push(
            create(
                app,
                &format!("/api/works/{work}/cast"),
                token,
                json!({ "character_id": character }),
            )
            .await,
        );
    }
    Cast { work, entries }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_relationship_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let cast = cast_of(&app, &token, 3).await;
    let (a, b, c) = (&cast.entries[0], &cast.entries[1], &cast.entries[2]);
    let uri = format!("/api/works/{}/relationships", cast.work);

    let available = format!("/api/cast/{a}/relationships/available");
    assert_eq!(
        ids(&list(&app, &available, &token).await),
        sorted(vec![b.clone(), c.clone()])
    );

    let response = post_json_auth(
        &app,
        &uri,
        &token,
        json!({ "from_id": a, "to_id": b, "type": "sibling", "notes": "twins" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["type"], "sibling");
    assert_eq!(json["work_id"], cast.work.as_str());

    assert_eq!(ids(&list(&app, &available, &token).await), vec![c.clone()]);

    // Edges are directed: b -> a is still possible.
    let reverse = format!("/api/cast/{b}/relationships/available");
    assert!(ids(&list(&app, &reverse, &token).await).contains(a));

    let response = post_json_auth(
        &app,
        &uri,
        &token,
        json!({ "from_id": a, "to_id": b, "type": "rival" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let outgoing = list(&app, &format!("/api/cast/{a}/relationships"), &token).await;
    assert_eq!(outgoing.as_array().unwrap().len(), 1);
    assert_eq!(list(&app, &uri, &token).await.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_self_relationship_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let cast = cast_of(&app, &token, 1).await;
    let a = &cast.entries[0];

    let response = post_json_auth(
        &app,
        &format!("/api/works/{}/relationships", cast.work),
        &token,
        json!({ "from_id": a, "to_id": a, "type": "self" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Both ends of a relationship must be cast in the work it is created in.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_relationship_across_works_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let first = cast_of(&app, &token, 1).await;
    let second = cast_of(&app, &token, 1).await;

    let response = post_json_auth(
        &app,
        &format!("/api/works/{}/relationships", first.work),
        &token,
        json!({ "from_id": first.entries[0], "to_id": second.entries[0], "type": "pen pal" }),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().contains("different work"));

    // Candidates from other works are never offered.
    let available = list(
        &app,
        &format!("/api/cast/{}/relationships/available", first.entries[0]),
        &token,
    )
    .await;
    assert!(available.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Events and participants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_events_append_to_timeline(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let work = create(&app, "/api/works", &token, json!({ "title": "Saga" })).await;
    let uri = format!("/api/works/{work}/events");

    for title in ["Dawn", "Noon"] {
        create(&app, &uri, &token, json!({ "title": title })).await;
    }
    create(&app, &uri, &token, json!({ "title": "Prologue", "ord": 0 })).await;

    let events = list(&app, &uri, &token).await;
    let order: Vec<(&str, i64)> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["title"].as_str().unwrap(), e["ord"].as_i64().unwrap()))
        .collect();
    assert_eq!(order, vec![("Dawn", 0), ("Prologue", 0), ("Noon", 1)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_location_must_be_in_same_work(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let w1 = create(&app, "/api/works", &token, json!({ "title": "One" })).await;
    let w2 = create(&app, "/api/works", &token, json!({ "title": "Two" })).await;
    let location = create(&app, "/api/locations", &token, json!({ "title": "Keep" })).await;
    let link = create(
        &app,
        &format!("/api/works/{w2}/locations"),
        &token,
        json!({ "location_id": location }),
    )
    .await;

    let response = post_json_auth(
        &app,
        &format!("/api/works/{w1}/events"),
        &token,
        json!({ "title": "Siege", "location_in_work_id": link }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_participants(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let cast = cast_of(&app, &token, 2).await;
    let other = cast_of(&app, &token, 1).await;
    let event = create(
        &app,
        &format!("/api/works/{}/events", cast.work),
        &token,
        json!({ "title": "Duel" }),
    )
    .await;
    let uri = format!("/api/events/{event}/participants");

    assert_eq!(
        ids(&list(&app, &format!("{uri}/available"), &token).await),
        sorted(cast.entries.clone())
    );

    let participant = create(
        &app,
        &uri,
        &token,
        json!({ "character_in_work_id": cast.entries[0] }),
    )
    .await;
    assert_eq!(
        ids(&list(&app, &format!("{uri}/available"), &token).await),
        vec![cast.entries[1].clone()]
    );

    let response = post_json_auth(
        &app,
        &uri,
        &token,
        json!({ "character_in_work_id": cast.entries[0] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        &app,
        &uri,
        &token,
        json!({ "character_in_work_id": other.entries[0] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(&app, &format!("/api/participants/{participant}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(list(&app, &uri, &token).await.as_array().unwrap().is_empty());
}

/// Removing a cast entry takes its relationships and participation with it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_cast_entry_cascades(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "writer").await;
    let cast = cast_of(&app, &token, 2).await;
    let (a, b) = (&cast.entries[0], &cast.entries[1]);
    let relationship = create(
        &app,
        &format!("/api/works/{}/relationships", cast.work),
        &token,
        json!({ "from_id": a, "to_id": b, "type": "mentor" }),
    )
    .await;
    let event = create(
        &app,
        &format!("/api/works/{}/events", cast.work),
        &token,
        json!({ "title": "Lesson" }),
    )
    .await;
    create(
        &app,
        &format!("/api/events/{event}/participants"),
        &token,
        json!({ "character_in_work_id": b }),
    )
    .await;

    let response = delete_auth(&app, &format!("/api/cast/{b}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, &format!("/api/relationships/{relationship}"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let participants = list(&app, &format!("/api/events/{event}/participants"), &token).await;
    assert!(participants.as_array().unwrap().is_empty());
}
