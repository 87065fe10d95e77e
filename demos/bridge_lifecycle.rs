//! Drives a bridge through a few host refreshes against the in-memory SDK and prints what was
//! sent. Run with `cargo run --example bridge_lifecycle`.

use std::sync::Arc;

use session_analytics_bridge::bridge::{
    BridgeConfig, HostSnapshot, LifecycleContext, RecordingSdk, SessionBridge,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sdk = RecordingSdk::new();
    let mut bridge = SessionBridge::new(Arc::new(sdk.clone()));

    let parameters = BridgeConfig::new()
        .with_project_id("demo-project")
        .with_debug(true)
        .with_session_tags_json(r#"{"tenant":"contoso","seats":12}"#)
        .with_event_name("order_submitted");
    let host = HostSnapshot::new()
        .with_location("https://contoso-dev.example.com/apps/orders#list")?
        .with_user_id("user-42")
        .with_user_name("Ada Lovelace");

    bridge.init(&LifecycleContext::new(parameters.clone(), host.clone()));

    // The user navigates and submits an order twice.
    let detail = host.with_location("https://contoso-dev.example.com/apps/orders#detail")?;
    for token in [1, 1, 2] {
        let context = LifecycleContext::new(
            parameters.clone().with_event_trigger_token(token),
            detail.clone(),
        );
        let report = bridge.update_view(&context);
        println!("Cycle gate: {:?}", report.gate());
    }

    bridge.destroy();

    for call in sdk.calls() {
        println!("{call:?}");
    }
    Ok(())
}
