use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        use std::fmt::Write as FmtWrite;
        let mut msg = String::new();
        let _ = write!(&mut msg, "{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use bucket_loader::cli::{run, Cli, Commands};

    // A dummy config path: run fails after the initial event.
    let cli = Cli {
        command: Commands::Load {
            config: std::path::PathBuf::from("dummy.yaml"),
            rows: std::path::PathBuf::from("dummy.csv"),
            batch_size: None,
            delimiter: None,
        },
    };

    let result = run(cli).await;
    assert!(result.is_err(), "missing config should fail the run");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

#[test]
fn load_help_lists_options() {
    let mut cmd = Command::cargo_bin("bucket-loader").expect("Binary exists");
    cmd.arg("load").arg("--help");
    cmd.assert().success().stdout(
        predicate::str::contains("--config")
            .and(predicate::str::contains("--rows"))
            .and(predicate::str::contains("--batch-size")),
    );
}

#[test]
fn load_with_missing_config_fails() {
    let rows = NamedTempFile::new().expect("temp rows file");
    write(rows.path(), "CONNECTOR,CONNECTION,BUCKET NAME\n").expect("write rows");

    let mut cmd = Command::cargo_bin("bucket-loader").expect("Binary exists");
    cmd.arg("load")
        .arg("--config")
        .arg("does/not/exist.yaml")
        .arg("--rows")
        .arg(rows.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn load_with_zero_batch_size_flag_fails() {
    let config = NamedTempFile::new().expect("temp config file");
    write(config.path(), "connections: []\n").expect("write config");
    let rows = NamedTempFile::new().expect("temp rows file");
    write(rows.path(), "CONNECTOR,CONNECTION,BUCKET NAME\n").expect("write rows");

    let mut cmd = Command::cargo_bin("bucket-loader").expect("Binary exists");
    cmd.arg("load")
        .arg("--config")
        .arg(config.path())
        .arg("--rows")
        .arg(rows.path())
        .arg("--batch-size")
        .arg("0");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--batch-size must be positive"));
}
