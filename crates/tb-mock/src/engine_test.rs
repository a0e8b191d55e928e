use super::*;
use serde_json::{json, Value};

fn endpoint(value: Value) -> MockEndpoint {
    serde_json::from_value(value).unwrap()
}

fn scenario(id: &str) -> ScenarioId {
    ScenarioId::new(id)
}

fn users_mocks() -> Vec<MockEndpoint> {
    vec![
        endpoint(json!({
            "id": "plain", "method": "GET", "path": "/users", "priority": 1,
            "response": { "body": { "source": "plain" } }
        })),
        endpoint(json!({
            "id": "tagged", "method": "GET", "path": "/users", "priority": 2,
            "requestMatch": { "headers": { "X-Test": "1" } },
            "response": { "body": { "source": "tagged" } }
        })),
    ]
}

#[test]
fn test_header_constraint_selects_higher_priority() {
    let engine = MockMatchEngine::new();
    engine.activate(scenario("s1"), &users_mocks());

    let without = engine
        .match_request(&MockRequest::new("GET", "/users"))
        .unwrap();
    assert_eq!(without.mock_id, "plain");

    let with = engine
        .match_request(&MockRequest::new("GET", "/users").with_header("X-Test", "1"))
        .unwrap();
    assert_eq!(with.mock_id, "tagged");
    assert_eq!(with.body, json!({ "source": "tagged" }));
}

#[test]
fn test_priority_wins_regardless_of_registration_order() {
    let low = endpoint(json!({
        "id": "low", "method": "GET", "path": "/x", "priority": 5, "response": {}
    }));
    let high = endpoint(json!({
        "id": "high", "method": "GET", "path": "/x", "priority": 10, "response": {}
    }));
    let req = MockRequest::new("GET", "/x");

    for set in [vec![low.clone(), high.clone()], vec![high.clone(), low.clone()]] {
        let engine = MockMatchEngine::new();
        engine.activate(scenario("s"), &set);
        assert_eq!(engine.match_request(&req).unwrap().mock_id, "high");
    }
}

#[test]
fn test_equal_priority_prefers_more_constraints_then_id() {
    let engine = MockMatchEngine::new();
    engine.activate(
        scenario("s"),
        &[
            endpoint(json!({ "id": "b", "method": "GET", "path": "/x", "response": {} })),
            endpoint(json!({ "id": "a", "method": "GET", "path": "/x", "response": {} })),
            endpoint(json!({
                "id": "z", "method": "GET", "path": "/x",
                "requestMatch": { "query": { "q": "1" } },
                "response": {}
            })),
        ],
    );

    let specific = MockRequest::new("GET", "/x").with_query("q", "1");
    assert_eq!(engine.match_request(&specific).unwrap().mock_id, "z");
    let general = MockRequest::new("GET", "/x");
    assert_eq!(engine.match_request(&general).unwrap().mock_id, "a");
}

#[test]
fn test_disabled_endpoints_ignored() {
    let engine = MockMatchEngine::new();
    let count = engine.activate(
        scenario("s"),
        &[endpoint(json!({
            "id": "off", "method": "GET", "path": "/x", "enabled": false, "priority": 99,
            "response": {}
        }))],
    );
    assert_eq!(count, 0);
    assert!(engine.match_request(&MockRequest::new("GET", "/x")).is_none());
}

#[test]
fn test_no_match() {
    let engine = MockMatchEngine::new();
    assert!(engine.match_request(&MockRequest::new("GET", "/users")).is_none());

    engine.activate(scenario("s"), &users_mocks());
    assert!(engine.match_request(&MockRequest::new("POST", "/users")).is_none());
    assert!(engine.match_request(&MockRequest::new("GET", "/orders")).is_none());
}

#[test]
fn test_response_constants_resolved_per_match() {
    let engine = MockMatchEngine::new();
    engine.activate(
        scenario("s"),
        &[endpoint(json!({
            "id": "m", "method": "POST", "path": "/payments",
            "response": {
                "status": 201,
                "headers": { "X-Request-Id": "$UUID" },
                "body": { "id": "$UUID", "ref": "pay-$UUID", "amount": 10 },
                "delay": 250
            }
        }))],
    );
    let req = MockRequest::new("POST", "/payments");

    let first = engine.match_request(&req).unwrap();
    let second = engine.match_request(&req).unwrap();

    assert_eq!(first.status, 201);
    assert_eq!(first.delay, Some(Duration::from_millis(250)));
    assert_eq!(first.body["amount"], 10);
    assert_ne!(first.body["id"], "$UUID");
    assert_ne!(first.headers["X-Request-Id"], "$UUID");
    assert_ne!(first.body["id"], second.body["id"]);
    assert_eq!(first.mock_id, second.mock_id);

    // the registered endpoint keeps its template
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.endpoints()[0].response.body["id"], "$UUID");
}

#[test]
fn test_activation_replaces_previous_set() {
    let engine = MockMatchEngine::new();
    engine.activate(scenario("first"), &users_mocks());
    engine.activate(
        scenario("second"),
        &[endpoint(json!({ "id": "o", "method": "GET", "path": "/orders", "response": {} }))],
    );

    assert_eq!(engine.active_scenario().unwrap(), "second");
    assert!(engine.match_request(&MockRequest::new("GET", "/users")).is_none());
    assert!(engine.match_request(&MockRequest::new("GET", "/orders")).is_some());
}

#[test]
fn test_deactivate() {
    let engine = MockMatchEngine::new();
    engine.activate(scenario("s1"), &users_mocks());

    assert_eq!(engine.deactivate().unwrap(), "s1");
    assert!(engine.active_scenario().is_none());
    assert!(engine.snapshot().is_empty());
    assert!(engine.deactivate().is_none());
}

#[test]
fn test_snapshot_survives_replacement() {
    let engine = MockMatchEngine::new();
    engine.activate(scenario("s1"), &users_mocks());
    let before = engine.snapshot();
    engine.deactivate();

    assert_eq!(before.len(), 2);
    assert_eq!(before.scenario_id().unwrap(), "s1");
}

#[test]
fn test_concurrent_matches_during_activation() {
    let engine = Arc::new(MockMatchEngine::new());
    engine.activate(scenario("s"), &users_mocks());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = engine.snapshot();
                    // a set is either fully the old one or fully the new one
                    assert!(snapshot.len() == 2 || snapshot.len() == 1);
                }
            })
        })
        .collect();

    for i in 0..50 {
        let set = if i % 2 == 0 {
            users_mocks()
        } else {
            users_mocks()[..1].to_vec()
        };
        engine.activate(scenario("s"), &set);
    }
    for r in readers {
        r.join().unwrap();
    }
}
