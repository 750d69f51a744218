//! Headless benchmark runner.
//!
//! Drives the scene suite against the deterministic in-memory backend and
//! reports the performance samples collected while each scene was active,
//! as a table or as JSON.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use widget_bench_core::scenes::{SCENE_COUNT, SCENE_NAMES};
use widget_bench_core::toolkit::Toolkit;
use widget_bench_core::{
    BenchmarkSession, DisplaySpec, ExhaustedPolicy, HeadlessToolkit, PerfSample, SessionConfig,
    ToolkitEvent,
};

/// Step size for the simulated event loop; one nominal display frame.
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Keep ticking past the catalog end (the screen stays blank).
    Idle,
    /// Cancel the advance timer once the catalog is exhausted.
    Stop,
    /// Wrap back to scene 0 and replay.
    Wrap,
}

impl From<PolicyArg> for ExhaustedPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Idle => ExhaustedPolicy::Idle,
            PolicyArg::Stop => ExhaustedPolicy::Stop,
            PolicyArg::Wrap => ExhaustedPolicy::WrapToStart,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "widget_bench", about = "Visual widget-toolkit benchmark, run headless.")]
struct Args {
    /// Display width in pixels.
    #[arg(long, default_value_t = 800)]
    width: i32,

    /// Display height in pixels.
    #[arg(long, default_value_t = 480)]
    height: i32,

    /// Display density in dots per inch.
    #[arg(long, default_value_t = 160)]
    dpi: i32,

    /// How long each scene runs, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    scene_time_ms: u64,

    /// What to do when the catalog is exhausted.
    #[arg(long, value_enum, default_value_t = PolicyArg::Stop)]
    on_exhausted: PolicyArg,

    /// Emit the per-scene report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Samples observed while one scene was active, averaged for the report.
#[derive(Debug, Serialize)]
struct SceneReport {
    scene: String,
    samples: u32,
    avg_fps: u32,
    avg_cpu_percent: u32,
    avg_render_time_ms: u32,
    avg_flush_time_ms: u32,
}

#[derive(Debug, Default)]
struct SampleAccumulator {
    count: u32,
    fps: u64,
    cpu: u64,
    render: u64,
    flush: u64,
}

impl SampleAccumulator {
    fn push(&mut self, sample: &PerfSample) {
        self.count += 1;
        self.fps += u64::from(sample.fps);
        self.cpu += u64::from(sample.cpu_percent);
        self.render += u64::from(sample.render_time_ms);
        self.flush += u64::from(sample.flush_time_ms);
    }

    fn report(&self, scene: &str) -> SceneReport {
        let avg = |total: u64| {
            if self.count == 0 {
                0
            } else {
                (total / u64::from(self.count)) as u32
            }
        };
        SceneReport {
            scene: scene.to_owned(),
            samples: self.count,
            avg_fps: avg(self.fps),
            avg_cpu_percent: avg(self.cpu),
            avg_render_time_ms: avg(self.render),
            avg_flush_time_ms: avg(self.flush),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut ui = HeadlessToolkit::new(DisplaySpec {
        width: args.width,
        height: args.height,
        dpi: args.dpi,
    });
    let config = SessionConfig {
        scene_time_ms: args.scene_time_ms,
        on_catalog_exhausted: args.on_exhausted.into(),
    };
    let mut session = BenchmarkSession::start(&mut ui, config);
    log::info!(
        "benchmark started: {} scenes, {} ms each, {}x{}@{}dpi",
        SCENE_COUNT,
        args.scene_time_ms,
        args.width,
        args.height,
        args.dpi
    );

    // One full catalog pass plus the sentinel slot.
    let total = Duration::from_millis(args.scene_time_ms * (SCENE_COUNT as u64 + 1));
    let mut accumulators: Vec<SampleAccumulator> = SCENE_NAMES
        .iter()
        .map(|_| SampleAccumulator::default())
        .collect();

    let mut elapsed = Duration::ZERO;
    let step = Duration::from_millis(FRAME_MS);
    while elapsed < total {
        for event in ui.advance(step) {
            if let ToolkitEvent::PerfPublished(sample) = event {
                if let Some(acc) = accumulators.get_mut(session.scene_index()) {
                    acc.push(&sample);
                }
            }
            session.handle_event(&mut ui, event);
        }
        elapsed += step;
    }

    let last_readout = ui.text(session.title()).unwrap_or("-").to_owned();
    session.stop(&mut ui);

    let reports: Vec<SceneReport> = accumulators[..SCENE_COUNT]
        .iter()
        .zip(SCENE_NAMES)
        .map(|(acc, name)| acc.report(name))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!(
            "{:<32} {:>8} {:>8} {:>8} {:>11} {:>10}",
            "scene", "samples", "avg fps", "cpu %", "render ms", "flush ms"
        );
        for report in &reports {
            println!(
                "{:<32} {:>8} {:>8} {:>8} {:>11} {:>10}",
                report.scene,
                report.samples,
                report.avg_fps,
                report.avg_cpu_percent,
                report.avg_render_time_ms,
                report.avg_flush_time_ms
            );
        }
        println!("\nlast readout:\n{last_readout}");
    }

    Ok(())
}
