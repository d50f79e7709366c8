use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Collects the debug rendering of every emitted event.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}

#[tokio::test]
async fn config_command_emits_structured_events() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use dockit::cli::{run, Cli, Commands};

    let dir = tempfile::tempdir().unwrap();
    let cli = Cli {
        config: Some(dir.path().join("rc.json")),
        command: Some(Commands::Config),
    };

    run(cli, CancellationToken::new())
        .await
        .expect("config command succeeds");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs
            .iter()
            .any(|msg| msg.contains("Dispatching dockit command") && msg.contains("Config")),
        "Expected a dispatch event naming the command, got: {:?}",
        event_msgs
    );
    assert!(
        event_msgs
            .iter()
            .any(|msg| msg.contains("Created default config file")),
        "Expected a config creation event, got: {:?}",
        event_msgs
    );
}
