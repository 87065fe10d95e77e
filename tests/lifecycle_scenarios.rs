use std::sync::Arc;

use session_analytics_bridge::bridge::{
    BridgeConfig, GateDecision, HostSnapshot, LifecycleContext, RecordingSdk, SdkCall,
    SdkPrimitive, SdkStatus, SessionBridge, SkipReason, Step, StepOutcome,
};

fn new_bridge() -> (SessionBridge, RecordingSdk) {
    let sdk = RecordingSdk::new();
    let bridge = SessionBridge::new(Arc::new(sdk.clone()));
    bridge.logger().set_log_handler(|_, _, _| {});
    (bridge, sdk)
}

fn context(parameters: BridgeConfig) -> LifecycleContext {
    LifecycleContext::new(parameters, HostSnapshot::new())
}

fn page(parameters: BridgeConfig, href: &str) -> LifecycleContext {
    LifecycleContext::new(
        parameters,
        HostSnapshot::new()
            .with_location(href)
            .unwrap()
            .with_user_id("host-user-1")
            .with_user_name("Ada Lovelace"),
    )
}

fn base() -> BridgeConfig {
    BridgeConfig::new().with_project_id("p1")
}

#[test]
fn init_with_consent_starts_one_session() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base().with_tracking_allowed(true)));

    assert_eq!(sdk.init_calls(), vec!["p1".to_string()]);
    assert_eq!(sdk.consent_calls(), vec![true]);
    assert_eq!(bridge.state().status(), SdkStatus::Initialized);
}

#[test]
fn repeated_cycles_never_restart_the_session() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base()));
    for _ in 0..25 {
        let report = bridge.update_view(&context(base()));
        assert_eq!(
            report.outcome(Step::Bootstrap),
            Some(&StepOutcome::Skipped(SkipReason::AlreadyInitialized))
        );
    }
    assert_eq!(sdk.init_calls().len(), 1);
}

#[test]
fn withheld_consent_produces_no_calls_at_all() {
    let (mut bridge, sdk) = new_bridge();
    let denied = base()
        .with_tracking_allowed(false)
        .with_debug(true)
        .with_user_id("u1")
        .with_screen_name("Home")
        .with_session_tags_json(r#"{"team":"blue"}"#)
        .with_event_name("saved")
        .with_event_trigger_token(1);

    let report = bridge.init(&context(denied.clone()));
    assert_eq!(report.gate(), GateDecision::TrackingNotAllowed);
    for token in 2..5 {
        bridge.update_view(&context(denied.clone().with_event_trigger_token(token)));
    }
    assert!(sdk.calls().is_empty());
    assert_eq!(bridge.state().status(), SdkStatus::NotStarted);
}

#[test]
fn identity_is_sent_once_per_lifetime() {
    let (mut bridge, sdk) = new_bridge();
    let href = "https://contoso-prod.example.com/apps/orders";
    bridge.init(&page(base().with_user_email("ada@example.com"), href));
    for _ in 0..5 {
        bridge.update_view(&page(base().with_user_email("ada@example.com"), href));
    }

    assert_eq!(
        sdk.identify_calls(),
        vec![SdkCall::Identify {
            user_id: "host-user-1".into(),
            session_id: None,
            screen_name: Some("/apps/orders".into()),
            user_name: Some("Ada Lovelace".into()),
        }]
    );
    assert_eq!(
        sdk.tags(),
        vec![
            ("appName".to_string(), "orders".to_string()),
            ("environment".to_string(), "PROD".to_string()),
            ("userEmail".to_string(), "ada@example.com".to_string()),
        ]
    );
    assert!(bridge.state().metadata_sent());
}

#[test]
fn session_tags_apply_once_even_if_changed_later() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base().with_session_tags_json(r#"{"tier":"gold"}"#)));
    bridge.update_view(&context(base().with_session_tags_json(r#"{"tier":"silver"}"#)));

    assert_eq!(sdk.tags(), vec![("tier".to_string(), "gold".to_string())]);
}

#[test]
fn screen_change_reidentifies_once() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base().with_screen_name("A")));
    sdk.take_calls();

    bridge.update_view(&context(base().with_screen_name("B")));
    bridge.update_view(&context(base().with_screen_name("B")));

    assert_eq!(
        sdk.calls(),
        vec![SdkCall::Identify {
            user_id: String::new(),
            session_id: None,
            screen_name: Some("B".into()),
            user_name: None,
        }]
    );
}

#[test]
fn navigation_without_explicit_screen_follows_the_page() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&page(base(), "https://contoso.example.com/main#orders"));
    bridge.update_view(&page(base(), "https://contoso.example.com/main#orders"));
    bridge.update_view(&page(base(), "https://contoso.example.com/main#customers"));

    let screens: Vec<_> = sdk
        .identify_calls()
        .into_iter()
        .filter_map(|call| match call {
            SdkCall::Identify { screen_name, .. } => screen_name,
            _ => None,
        })
        .collect();
    assert_eq!(screens, vec!["/main#orders", "/main#customers"]);
}

#[test]
fn trigger_token_sequence_sends_two_events() {
    let (mut bridge, sdk) = new_bridge();
    let named = base().with_event_name("order_submitted");
    bridge.init(&context(named.clone()));
    bridge.update_view(&context(named.clone().with_event_trigger_token(1)));
    bridge.update_view(&context(named.clone().with_event_trigger_token(1)));
    bridge.update_view(&context(named.with_event_trigger_token(2)));

    assert_eq!(
        sdk.events(),
        vec!["order_submitted".to_string(), "order_submitted".to_string()]
    );
}

#[test]
fn token_change_without_event_name_sends_nothing() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base()));
    let report = bridge.update_view(&context(base().with_event_trigger_token("t-1")));

    assert_eq!(
        report.outcome(Step::Event),
        Some(&StepOutcome::Skipped(SkipReason::MissingEventName))
    );
    assert!(sdk.events().is_empty());
}

#[test]
fn invalid_session_tags_are_contained() {
    let (mut bridge, sdk) = new_bridge();
    let report = bridge.init(&context(base().with_session_tags_json("{not valid json")));

    assert!(matches!(
        report.outcome(Step::SessionTags),
        Some(StepOutcome::Failed(err)) if err.code_str() == "bridge/invalid-json"
    ));
    assert!(sdk.tags().is_empty());
    assert!(!bridge.state().session_tags_applied());
}

#[test]
fn consent_flip_is_mirrored_once() {
    let (mut bridge, sdk) = new_bridge();
    let tracked = base().with_event_name("saved");
    bridge.init(&context(tracked.clone().with_tracking_allowed(true)));
    sdk.take_calls();

    let denied = tracked.clone().with_tracking_allowed(false);
    bridge.update_view(&context(denied.clone().with_event_trigger_token(1)));
    bridge.update_view(&context(denied.with_event_trigger_token(2)));
    assert_eq!(sdk.take_calls(), vec![SdkCall::Consent(false)]);

    bridge.update_view(&context(
        tracked.with_tracking_allowed(true).with_event_trigger_token(3),
    ));
    assert_eq!(
        sdk.calls(),
        vec![SdkCall::Consent(true), SdkCall::Event("saved".into())]
    );
}

#[test]
fn failed_bootstrap_waits_for_a_new_project() {
    let (mut bridge, sdk) = new_bridge();
    sdk.set_failing(SdkPrimitive::Init, true);
    bridge.init(&context(base().with_user_id("u1")));
    sdk.set_failing(SdkPrimitive::Init, false);
    bridge.update_view(&context(base().with_user_id("u1")));

    assert_eq!(bridge.state().status(), SdkStatus::Error);
    assert_eq!(sdk.calls(), vec![SdkCall::Init("p1".into())]);

    bridge.update_view(&context(
        BridgeConfig::new().with_project_id("p2").with_user_id("u1"),
    ));
    assert_eq!(bridge.state().status(), SdkStatus::Initialized);
    assert_eq!(bridge.state().project_id(), Some("p2"));
    assert_eq!(sdk.identify_calls().len(), 1);
}

#[test]
fn parameters_decode_from_host_json() {
    let (mut bridge, sdk) = new_bridge();
    let parameters = BridgeConfig::from_json(
        r#"{"projectId": "p1", "eventName": "saved", "eventTriggerToken": "2024-05-01T10:00:00Z"}"#,
    )
    .unwrap();
    bridge.init(&context(parameters));

    assert_eq!(sdk.events(), vec!["saved".to_string()]);
}

#[test]
fn clearing_the_project_id_pauses_every_step() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base().with_user_id("u1")));
    sdk.take_calls();

    for token in 1..=3 {
        bridge.update_view(&context(
            BridgeConfig::new()
                .with_project_id("  ")
                .with_screen_name(format!("screen-{token}"))
                .with_event_name("saved")
                .with_event_trigger_token(token),
        ));
    }
    assert!(sdk.calls().is_empty());
    assert_eq!(bridge.state().status(), SdkStatus::Initialized);
}

#[test]
fn one_bad_parameter_does_not_discard_consent() {
    let (mut bridge, sdk) = new_bridge();
    bridge.init(&context(base()));
    sdk.take_calls();

    let parameters = BridgeConfig::from_json(
        r#"{"projectId": "p1", "trackingAllowed": false, "eventName": "saved", "eventTriggerToken": [1]}"#,
    )
    .unwrap();
    assert_eq!(parameters.rejected_parameters().len(), 1);
    bridge.update_view(&context(parameters));

    assert_eq!(sdk.calls(), vec![SdkCall::Consent(false)]);
}

#[test]
fn failing_sdk_primitives_do_not_repeat_calls() {
    let (mut bridge, sdk) = new_bridge();
    for primitive in [SdkPrimitive::Identify, SdkPrimitive::SetTag, SdkPrimitive::Event] {
        sdk.set_failing(primitive, true);
    }
    let parameters = base()
        .with_user_id("u1")
        .with_app_name("crm")
        .with_event_name("saved")
        .with_event_trigger_token(7);

    let report = bridge.init(&context(parameters.clone()));
    assert_eq!(report.failures().count(), 2);
    for _ in 0..3 {
        let report = bridge.update_view(&context(parameters.clone()));
        assert_eq!(report.failures().count(), 0);
    }

    assert_eq!(sdk.identify_calls().len(), 1);
    assert_eq!(sdk.tags().len(), 1);
    assert_eq!(sdk.events().len(), 1);
}

#[test]
fn nan_trigger_token_sends_one_event() {
    let (mut bridge, sdk) = new_bridge();
    let parameters = BridgeConfig::from_json(r#"{"projectId": "p1", "eventName": "saved"}"#)
        .unwrap()
        .with_event_trigger_token(f64::NAN);
    for _ in 0..3 {
        bridge.update_view(&context(parameters.clone()));
    }
    assert_eq!(sdk.events(), vec!["saved".to_string()]);
}
