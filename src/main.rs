//! slirc-replacer - replays raw IRC lines from stdin and answers `s///`
//! directives on stdout.

use slirc_replacer::config::{Config, validate};
use slirc_replacer::{Relay, Replacer, RingHistory, metrics, telemetry};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

struct Args {
    config_path: Option<String>,
    json: bool,
    metrics: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = Self {
            config_path: None,
            json: false,
            metrics: false,
        };
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--json" => args.json = true,
                "--metrics" => args.metrics = true,
                _ => args.config_path = Some(arg),
            }
        }
        args
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init(args.json);

    let config = match &args.config_path {
        Some(path) => Config::load(path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "configuration has {} error(s), see messages above",
            errors.len()
        ));
    }

    if args.metrics {
        metrics::init();
    }

    let config = Arc::new(config);
    let history = Arc::new(RingHistory::new(config.history.max_length));

    info!(
        nick = %config.bot.nick,
        history = history.max_length(),
        timeout_ms = config.replacer.timeout_ms,
        "Starting slirc-replacer"
    );

    let replacer = Arc::new(Replacer::from_config(Arc::clone(&config), history));
    let relay = Relay::new(replacer, &config.bot.nick);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(raw) = lines.next_line().await? {
        let pending = match relay.record(&raw) {
            Ok(Some(pending)) => pending,
            Ok(None) => continue,
            Err(e) => {
                debug!(error = %e, "Skipping unparseable line");
                continue;
            }
        };

        let span = telemetry::directive_span(&pending.channel, &pending.nick);
        let worker = relay.clone();
        let reply = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            worker.respond(&pending)
        })
        .await;

        match reply {
            Ok(Some(wire)) => {
                stdout.write_all(wire.as_bytes()).await?;
                stdout.write_all(b"\r\n").await?;
                stdout.flush().await?;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Directive task failed"),
        }
    }

    info!("Input closed, shutting down");
    if args.metrics {
        eprint!("{}", metrics::gather());
    }
    Ok(())
}
