//! Integration tests for the control thread.
//!
//! These use a short tick so the thread makes progress quickly; every
//! wait is bounded so a broken runtime fails instead of hanging.

use std::time::{Duration, Instant};

use super::mock_hw::{ManualClock, MockRelay, ScriptedThermocouple};

use roastctl::adapters::profile_store::MemoryProfileStore;
use roastctl::adapters::sim::SimulatedDrum;
use roastctl::app::commands::{CommandReply, RoastCommand};
use roastctl::app::events::RoastEvent;
use roastctl::config::RoasterConfig;
use roastctl::error::RoastError;
use roastctl::events::Subscription;
use roastctl::runtime::Controller;
use roastctl::session::SessionMode;
use roastctl::units::Fahrenheit;

const WAIT: Duration = Duration::from_secs(5);

fn fast_config() -> RoasterConfig {
    RoasterConfig {
        tick_interval_ms: 100,
        ..RoasterConfig::default()
    }
}

fn spawn_mock(reading_f: f64) -> (Controller, MockRelay) {
    let relay = MockRelay::new();
    let controller = Controller::spawn(
        &fast_config(),
        ScriptedThermocouple::steady(reading_f),
        relay.clone(),
        MemoryProfileStore::new(),
        ManualClock::default(),
    )
    .unwrap();
    (controller, relay)
}

/// Wait for the first event matching `pred`.
fn wait_for(sub: &Subscription, pred: impl Fn(&RoastEvent) -> bool) -> Option<RoastEvent> {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        match sub.try_next() {
            Some(ev) if pred(&ev) => return Some(ev),
            Some(_) => {}
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    None
}

fn wait_until(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn commands_are_acknowledged() {
    let (controller, _relay) = spawn_mock(70.0);
    assert_eq!(
        controller.send(RoastCommand::StartManual),
        Ok(CommandReply::ManualStarted)
    );
    let Ok(CommandReply::Status(status)) = controller.send(RoastCommand::Status) else {
        panic!("expected status");
    };
    assert_eq!(status.mode, SessionMode::Manual);
    assert_eq!(controller.send(RoastCommand::Stop), Ok(CommandReply::Stopped));
}

#[test]
fn rejected_command_reports_error() {
    let (controller, _relay) = spawn_mock(70.0);
    assert_eq!(
        controller.send(RoastCommand::RunProfile("nope".into())),
        Err(RoastError::ProfileNotFound("nope".into()))
    );
    assert_eq!(
        controller.send(RoastCommand::SetTarget(Fahrenheit(300.0))),
        Err(RoastError::NotInManualMode)
    );
}

#[test]
fn idle_controller_publishes_telemetry() {
    let (controller, _relay) = spawn_mock(70.0);
    let sub = controller.subscribe().unwrap();
    let ev = wait_for(&sub, |e| matches!(e, RoastEvent::TemperatureUpdate { .. }));
    assert_eq!(
        ev,
        Some(RoastEvent::TemperatureUpdate {
            temperature: Some(Fahrenheit(70.0))
        })
    );
}

#[test]
fn heater_follows_target_and_stop_turns_it_off() {
    let (controller, relay) = spawn_mock(100.0);
    let sub = controller.subscribe().unwrap();

    controller.send(RoastCommand::StartManual).unwrap();
    controller
        .send(RoastCommand::SetTarget(Fahrenheit(400.0)))
        .unwrap();
    assert!(wait_for(&sub, |e| *e == RoastEvent::HeaterChanged { heater_on: true }).is_some());
    assert!(relay.is_on());

    controller.send(RoastCommand::Stop).unwrap();
    assert!(!relay.is_on(), "stop acknowledgment implies heater off");
}

#[test]
fn shutdown_leaves_heater_off() {
    let drum = SimulatedDrum::default();
    let (tc, heater) = drum.ports();
    let controller = Controller::spawn(
        &fast_config(),
        tc,
        heater,
        MemoryProfileStore::new(),
        ManualClock::default(),
    )
    .unwrap();

    controller.send(RoastCommand::StartManual).unwrap();
    controller
        .send(RoastCommand::SetTarget(Fahrenheit(500.0)))
        .unwrap();
    assert!(wait_until(|| drum.heater_on()));

    controller.shutdown();
    assert!(!drum.heater_on());
}

#[test]
fn dropping_controller_joins_thread() {
    let (controller, relay) = spawn_mock(100.0);
    controller.send(RoastCommand::StartManual).unwrap();
    controller
        .send(RoastCommand::SetTarget(Fahrenheit(300.0)))
        .unwrap();
    assert!(wait_until(|| relay.is_on()));
    drop(controller);
    assert!(!relay.is_on());
}
