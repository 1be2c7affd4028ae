//! The three ways to run: terminal UI, headless on the device, or offline.

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::time::{Duration, Instant};
use tracing::info;

use flowsynth::{
    io::{CpalBackend, OfflineBackend},
    EngineConfig, Installation,
};

use super::ui::FlowApp;

const OFFLINE_SAMPLE_RATE: f32 = 48_000.0;

/// Log the meter about once per this many frames when headless.
const HEADLESS_REPORT_FRAMES: u64 = 120;

fn open_device(config: EngineConfig) -> EyreResult<Installation<CpalBackend>> {
    let backend = CpalBackend::new().wrap_err("failed to open the audio output")?;
    let mut installation = Installation::new(config, backend);
    installation.start().wrap_err("failed to start the audio stream")?;
    Ok(installation)
}

/// Terminal UI on the default output device.
pub fn play_tui(config: EngineConfig) -> EyreResult<()> {
    let installation = open_device(config)?;

    let mut terminal = ratatui::init();
    let result = FlowApp::new(installation).run(&mut terminal);
    ratatui::restore();
    result
}

/// No UI; plays on the default device until the process is killed.
pub fn play_headless(config: EngineConfig) -> EyreResult<()> {
    let mut installation = open_device(config)?;
    info!("playing, press Ctrl+C to stop");

    let mut next = Instant::now();
    let mut frames = 0u64;
    loop {
        installation.tick();
        frames += 1;
        if frames % HEADLESS_REPORT_FRAMES == 0 {
            let meter = installation.poll_meter();
            info!(
                running = meter.running,
                peak_left = meter.peak_left,
                peak_right = meter.peak_right,
                "meter"
            );
        }

        next += Duration::from_secs_f64(installation.state().frame_seconds());
        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
        } else {
            next = now;
        }
    }
}

/// Render `seconds` of audio as fast as possible, one simulation frame at a
/// time, and report the peak level.
pub fn render_offline(config: EngineConfig, seconds: f32) -> EyreResult<()> {
    let mut installation = Installation::new(config, OfflineBackend::new(OFFLINE_SAMPLE_RATE));
    installation.start()?;

    let total = (seconds.max(0.0) * OFFLINE_SAMPLE_RATE) as u64;
    let per_frame =
        (OFFLINE_SAMPLE_RATE / installation.state().frame_rate).ceil().max(1.0) as usize;
    let mut left = vec![0.0f32; per_frame];
    let mut right = vec![0.0f32; per_frame];
    let mut peak = 0.0f32;

    let started = Instant::now();
    let mut rendered = 0u64;
    while rendered < total {
        installation.tick();

        let frames = per_frame.min((total - rendered) as usize);
        let (l, r) = (&mut left[..frames], &mut right[..frames]);
        installation.pool_mut().backend_mut().render(l, r);
        peak = l.iter().chain(r.iter()).fold(peak, |acc, &s| acc.max(s.abs()));
        rendered += frames as u64;
    }

    info!(
        seconds,
        frames = rendered,
        peak,
        running = installation.pool().running_oscillators(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "offline render finished"
    );
    Ok(())
}
