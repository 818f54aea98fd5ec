pub mod cli;
pub mod geo;
pub mod model;
pub mod processor;
pub mod render;
pub mod timeline;

use anyhow::Context;
use clap::Parser;

use geo::GeoAtlas;
use model::Config;
use processor::validate;
use render::RecordingRenderer;
use timeline::{Timeline, TimelineEvent};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Load ───────────────────────────────────────────────────────
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Reading {}", args.script.display()))?;
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if args.check {
        return check(&text, &config);
    }

    let atlas = match &args.countries {
        Some(countries) => GeoAtlas::load(countries, args.regions.as_deref(), &config)
            .with_context(|| "Loading territory datasets")?,
        None => {
            log::warn!("No --countries dataset; territory commands will be skipped");
            GeoAtlas::empty(&config)
        }
    };

    // 2. ── Play ───────────────────────────────────────────────────────
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .with_context(|| "Starting async runtime")?;

    let mut timeline = Timeline::new(RecordingRenderer::new(), atlas, config);
    let events = timeline.subscribe();
    timeline.load(&text);
    let status = runtime.block_on(timeline.run());

    // 3. ── Report ─────────────────────────────────────────────────────
    let skipped = events
        .try_iter()
        .filter(|e| matches!(e, TimelineEvent::Skipped { .. }))
        .count();
    let (current, total) = timeline.progress();
    println!(
        "{status}: {current}/{total} commands, {skipped} without effect, {} render calls",
        timeline.renderer().calls().len()
    );

    Ok(())
}

/// `--check`: report problems and dump the parsed commands.
fn check(text: &str, config: &Config) -> anyhow::Result<()> {
    let script = processor::parse(text);

    for line in script.rejected_lines() {
        log::warn!("line {}: not a valid command", line + 1);
    }
    for diagnostic in validate::check(&script, config) {
        log::warn!("{diagnostic}");
    }

    let json = serde_json::to_string_pretty(&script).with_context(|| "Serialising commands")?;
    println!("{json}");
    Ok(())
}
