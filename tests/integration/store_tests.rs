//! Integration tests for the JSON profile store behind the service.

use std::fs;
use std::time::Duration;

use super::mock_hw::{MockRelay, RecordingSink, ScriptedThermocouple};

use roastctl::adapters::profile_store::JsonProfileStore;
use roastctl::app::ports::ProfilePort;
use roastctl::app::service::RoastService;
use roastctl::config::RoasterConfig;
use roastctl::profile::{Profile, ProfileMap, Step};
use roastctl::units::Fahrenheit;

fn profile(name: &str, steps: &[(f64, f64)]) -> Profile {
    Profile {
        name: name.into(),
        steps: steps
            .iter()
            .map(|&(t, d)| Step::new(Fahrenheit(t), d).unwrap())
            .collect(),
    }
}

#[test]
fn save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonProfileStore::new(dir.path().join("profiles.json"));
    let map: ProfileMap = [
        profile("city", &[(300.0, 60.0), (420.5, 120.25)]),
        profile("full-city", &[(440.0, 600.0)]),
        profile("empty", &[]),
    ]
    .into_iter()
    .map(|p| (p.name.clone(), p))
    .collect();

    store.save(&map).unwrap();
    assert_eq!(store.load().unwrap(), map);
}

#[test]
fn saved_roast_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");

    {
        let store = JsonProfileStore::new(&path);
        let mut svc = RoastService::new(
            &RoasterConfig::default(),
            ScriptedThermocouple::new([150.0, 150.0, 160.0].map(Ok)),
            MockRelay::new(),
        );
        let mut sink = RecordingSink::new();
        svc.start_manual(Duration::ZERO, &mut sink);
        for t in 1..=3 {
            svc.tick(Duration::from_secs(2 * t), &mut sink);
        }
        svc.save_profile("morning", &store).unwrap();
    }

    let reopened = JsonProfileStore::new(&path);
    let profiles = reopened.load().unwrap();
    assert_eq!(profiles.keys().collect::<Vec<_>>(), ["morning"]);
    assert_eq!(
        profiles["morning"].steps[0],
        Step::new(Fahrenheit(150.0), 4.0).unwrap()
    );
}

#[test]
fn save_is_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonProfileStore::new(dir.path().join("profiles.json"));
    store.upsert(profile("city", &[(300.0, 60.0)])).unwrap();
    store.upsert(profile("city", &[(410.0, 30.0)])).unwrap();
    store.upsert(profile("dark", &[(460.0, 30.0)])).unwrap();

    let profiles = store.load().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles["city"], profile("city", &[(410.0, 30.0)]));
}

#[test]
fn corrupt_store_loads_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");
    fs::write(&path, b"\xff\xfe garbage").unwrap();

    let store = JsonProfileStore::new(&path);
    assert!(store.load().unwrap().is_empty());

    store.upsert(profile("after", &[(350.0, 10.0)])).unwrap();
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn concurrent_upserts_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonProfileStore::new(dir.path().join("profiles.json"));

    std::thread::scope(|s| {
        for i in 0..8 {
            let store = &store;
            s.spawn(move || {
                store
                    .upsert(profile(&format!("p{i}"), &[(300.0, 1.0)]))
                    .unwrap();
            });
        }
    });

    assert_eq!(store.load().unwrap().len(), 8);
}
