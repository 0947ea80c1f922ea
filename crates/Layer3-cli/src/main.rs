//! hostfacts CLI - Main entry point

mod builtin;

use anyhow::Context;
use clap::Parser;
use hostfacts_core::{global_registry, AttributeTree, System};
use hostfacts_foundation::FactsConfig;
use serde_json::{Map, Value};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// hostfacts - collect facts about this host and print them as JSON
#[derive(Parser, Debug)]
#[command(name = "hostfacts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Attribute paths to collect (e.g. languages/go). Collects everything when empty.
    attributes: Vec<String>,

    /// Include the providing plugins of each node (_providers)
    #[arg(long)]
    providers: bool,

    /// Force the platform tag used to select collectors
    #[arg(long)]
    platform: Option<String>,

    /// Plugin to skip (repeatable)
    #[arg(long = "disable", value_name = "PLUGIN")]
    disabled: Vec<String>,

    /// Print the run report to stderr
    #[arg(long)]
    report: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = FactsConfig::load().context("failed to load configuration")?;

    // Initialize logging (stdout는 JSON 출력 전용)
    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // CLI 옵션이 설정보다 우선
    if let Some(platform) = args.platform {
        config.platform = Some(platform);
    }
    for name in args.disabled {
        if !config.is_disabled(&name) {
            config.disabled_plugins.push(name);
        }
    }

    let registry = global_registry();
    builtin::register_all(&registry).context("failed to load builtin plugins")?;
    debug!("Loaded {} plugins", registry.len());

    let mut system = System::builder()
        .registry(registry)
        .config(config)
        .build()
        .context("failed to initialize collection")?;

    let report = if args.attributes.is_empty() {
        system.all_plugins()
    } else {
        let paths: Vec<&str> = args.attributes.iter().map(String::as_str).collect();
        system.run_attributes(&paths)
    };

    if args.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    let output = render(system.tree(), &args.attributes, args.providers);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 출력할 JSON 생성 (속성을 지정했으면 경로 → 값 mapping)
fn render(tree: &AttributeTree, attributes: &[String], providers: bool) -> Value {
    let node_value = |path: &str| -> Value {
        match tree.node(path) {
            Some(node) if providers => node.to_value_with_providers(),
            Some(node) => node.to_value(),
            None => Value::Null,
        }
    };

    if attributes.is_empty() {
        return node_value("");
    }

    let map: Map<String, Value> = attributes
        .iter()
        .map(|path| (path.clone(), node_value(path)))
        .collect();
    Value::Object(map)
}
