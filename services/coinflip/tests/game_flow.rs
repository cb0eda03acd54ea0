/// End-to-end game flows through the public library surface
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use coinflip::experiment::{self, ExperimentOptions};
use coinflip::{devices, BackendKind, Config, Console, FairBitSource, GameRules, Session, SessionEnd};
use serde_json::{json, Value};
use shared::{Bit, RoundCount};
use simulator::ForcedFlip;
use std::collections::HashMap;
use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FakeHardware {
    jobs: AtomicUsize,
}

async fn list_backends() -> Json<Value> {
    Json(json!({
        "backends": [
            { "name": "fake_sim", "operational": true, "simulator": true, "pending_jobs": 0 },
            { "name": "fake_lagos", "operational": true, "simulator": false, "pending_jobs": 4 },
            { "name": "fake_perth", "operational": true, "simulator": false, "pending_jobs": 9 }
        ]
    }))
}

/// Noiseless hardware: the outcome is 1 exactly when the circuit applies X
async fn submit_job(State(fake): State<Arc<FakeHardware>>, Json(request): Json<Value>) -> Json<Value> {
    let index = fake.jobs.fetch_add(1, Ordering::SeqCst);
    let qasm = request["qasm"].as_str().unwrap_or_default();
    let outcome = if qasm.contains("x q[0];") { "1" } else { "0" };
    let mut counts = serde_json::Map::new();
    counts.insert(outcome.to_string(), json!(1));
    Json(json!({ "job_id": format!("job-{}", index), "counts": counts }))
}

async fn spawn_fake(fake: Arc<FakeHardware>) -> String {
    let app = Router::new()
        .route("/v1/backends", get(list_backends))
        .route("/v1/jobs", post(submit_job))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config_from(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn connect_flip(config: &Config) -> ForcedFlip {
    let backend = simulator::connect(&config.backend_spec().unwrap(), config.seed)
        .await
        .unwrap();
    ForcedFlip::new(backend)
}

#[tokio::test]
async fn test_quantum_session_scenario() {
    let config = config_from(&[("COINFLIP_SEED", "1")]);
    let flip = connect_flip(&config).await;

    let mut console = Console::new("0\n1\n0\nexit\n".as_bytes(), Vec::new());
    let mut session = Session::new(GameRules::quantum(), &flip);
    let end = session.run(&mut console, pending::<()>()).await.unwrap();
    let output = String::from_utf8(console.into_output()).unwrap();

    assert_eq!(end, SessionEnd::Exited);
    assert_eq!(session.tally().agree(), 0);
    assert_eq!(session.tally().disagree(), 3);
    assert_eq!(output.matches("🎉 Quantum player wins!").count(), 3);
}

#[tokio::test]
async fn test_quantum_session_on_remote_hardware() {
    let fake = Arc::new(FakeHardware::default());
    let base_url = spawn_fake(fake.clone()).await;
    let config = config_from(&[("COINFLIP_BACKEND", "remote"), ("COINFLIP_REMOTE_URL", base_url.as_str())]);
    assert_eq!(config.backend, BackendKind::Remote);

    let flip = connect_flip(&config).await;
    assert_eq!(flip.backend().name(), "remote:fake_lagos");

    let mut console = Console::new("1\n0\nquit\n".as_bytes(), Vec::new());
    let mut session = Session::new(GameRules::quantum(), &flip);
    let end = session.run(&mut console, pending::<()>()).await.unwrap();
    let output = String::from_utf8(console.into_output()).unwrap();

    assert_eq!(end, SessionEnd::Exited);
    assert_eq!(session.tally().disagree(), 2);
    assert_eq!(fake.jobs.load(Ordering::SeqCst), 2);
    assert!(output.contains("🎲 Quantum coin result: heads (0)"));
    assert!(output.contains("🎲 Quantum coin result: tails (1)"));
}

#[tokio::test]
async fn test_experiment_on_remote_hardware() {
    let fake = Arc::new(FakeHardware::default());
    let base_url = spawn_fake(fake.clone()).await;
    let config = config_from(&[("COINFLIP_BACKEND", "remote"), ("COINFLIP_REMOTE_URL", base_url.as_str())]);
    let flip = connect_flip(&config).await;

    let mut console = Console::new(&b""[..], Vec::new());
    let mut guesses = FairBitSource::new(Some(10));
    let options = ExperimentOptions {
        trials: RoundCount::new(25).unwrap(),
        json: false,
        demo: false,
    };
    let end = experiment::run(&mut console, &mut guesses, &flip, options, pending::<()>())
        .await
        .unwrap();
    let output = String::from_utf8(console.into_output()).unwrap();

    assert_eq!(end, SessionEnd::Completed);
    assert_eq!(fake.jobs.load(Ordering::SeqCst), 25);
    assert!(output.contains("Using backend: remote:fake_lagos"));
    assert!(output.contains("Classical wins: 0 vs. Quantum wins: 25"));
}

#[tokio::test]
async fn test_device_listing() {
    let base_url = spawn_fake(Arc::new(FakeHardware::default())).await;
    let config = config_from(&[("COINFLIP_REMOTE_URL", base_url.as_str())]);

    let mut console = Console::new(&b""[..], Vec::new());
    let end = devices::run(&mut console, &config.remote_config().unwrap())
        .await
        .unwrap();
    let output = String::from_utf8(console.into_output()).unwrap();

    assert_eq!(end, SessionEnd::Completed);
    assert!(output.contains("* fake_lagos"));
    assert!(output.contains("fake_perth"));
    assert!(output.contains("* least busy: fake_lagos"));
}

#[tokio::test]
async fn test_always_wrong_readout_agrees() {
    let config = config_from(&[
        ("COINFLIP_BACKEND", "noisy"),
        ("COINFLIP_NOISE_READOUT", "1.0"),
        ("COINFLIP_SEED", "4"),
    ]);
    let flip = connect_flip(&config).await;

    // A readout that always lies turns the forced complement into agreement.
    assert_eq!(flip.flip(Bit::Heads).await.unwrap(), Bit::Heads);
    assert_eq!(flip.flip(Bit::Tails).await.unwrap(), Bit::Tails);
}
