//! Binary entrypoint: drives a slider from stdin, or prints a dry run.

use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rust_slider::events::{AlignReason, Aligned, ControlMessage};
use rust_slider::slider::{AlignHook, Slider};
use rust_slider::surface::{Surface, TracingSurface, Translate};
use rust_slider::{SliderConfig, SliderSettings, input, tasks};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rust-slider", version, about = "headless slideshow controller")]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Print the index/offset sequence of N forward steps and exit
    #[arg(long = "dry-run", value_name = "STEPS")]
    dry_run: Option<usize>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(
            format!("rust_slider={level}")
                .parse()
                .context("invalid log directive")?,
        );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        dry_run,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let settings = SliderConfig::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid slider configuration")?;
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), settings);

    if let Some(steps) = dry_run {
        return run_dry(settings, steps);
    }

    let resize_debounce = settings.resize_debounce;
    let after_align: AlignHook = Box::new(|index, slide| {
        tracing::debug!(index, width = slide.width, height = slide.height, "slide aligned");
    });
    let slider = Slider::with_hooks(settings, TracingSurface::default(), None, Some(after_align))
        .context("failed to build slider")?;

    let (inbox_tx, inbox_rx) = mpsc::channel::<ControlMessage>(32); // stdin -> Controller
    let (aligned_tx, mut aligned_rx) = mpsc::channel::<Aligned>(32); // Controller -> stdout
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    // stdin reader. A plain thread, so a blocked read never keeps the
    // runtime from shutting down.
    {
        let cancel = cancel.clone();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || input::forward_lines(std::io::stdin().lock(), &inbox_tx, &cancel))
            .context("failed to spawn stdin reader")?;
    }

    let mut tasks = JoinSet::new();

    // Aligned printer
    tasks.spawn(async move {
        while let Some(Aligned {
            index,
            offset,
            reason,
        }) = aligned_rx.recv().await
        {
            let tag = match reason {
                AlignReason::Index => "align",
                AlignReason::Drag => "drag",
            };
            println!("{tag} index={index} offset={offset}");
        }
        Ok::<_, anyhow::Error>(())
    });

    let slider =
        tasks::controller::run(slider, inbox_rx, aligned_tx, cancel.clone(), resize_debounce).await;
    cancel.cancel();
    tracing::info!(
        applied = slider.surface().applied(),
        "transforms applied this session"
    );

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}

/// Surface that remembers the last transform for the dry run.
#[derive(Default)]
struct Collect(Translate);

impl Surface for Collect {
    fn apply(&mut self, transform: Translate) {
        self.0 = transform;
    }
}

fn run_dry(mut settings: SliderSettings, steps: usize) -> Result<()> {
    settings.autoslide = None;
    let mut slider = Slider::new(settings, Collect::default()).context("failed to build slider")?;

    println!(
        "# slider dry run\n# slides: {}\n# align: {}\n# steps: {}\n",
        slider.len(),
        slider.alignment(),
        steps
    );
    println!("{:>4} {:>6} {:>12} {}", "step", "index", "offset", "transform");
    print_step(0, &slider);
    for step in 1..=steps {
        slider.go_forward();
        slider.drain_effects();
        print_step(step, &slider);
    }
    Ok(())
}

fn print_step(step: usize, slider: &Slider<Collect>) {
    let transform = slider.surface().0;
    println!(
        "{:>4} {:>6} {:>12.2} {}",
        step,
        slider.active_index(),
        slider.offset(),
        transform
    );
}
