//! Terminal front-end: particle canvas, status line and output meter.

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Gauge, Paragraph,
    },
    DefaultTerminal, Frame,
};
use std::time::{Duration, Instant};

use flowsynth::{
    io::{AudioBackend, MeterFrame},
    sim::{ControlEvent, ControlState},
    synth::{Mode, Shade},
    Installation,
};

pub struct FlowApp<B: AudioBackend> {
    installation: Installation<B>,
    meter: MeterFrame,
    should_quit: bool,
}

impl<B: AudioBackend> FlowApp<B> {
    pub fn new(installation: Installation<B>) -> Self {
        Self {
            installation,
            meter: MeterFrame::default(),
            should_quit: false,
        }
    }

    /// Tick the simulation at its frame rate and redraw after every tick.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut next_frame = Instant::now();

        while !self.should_quit {
            let now = Instant::now();
            if now >= next_frame {
                self.installation.tick();
                self.meter = self.installation.poll_meter();
                terminal.draw(|frame| self.render(frame))?;
                let frame_seconds = self.installation.state().frame_seconds();
                next_frame = now + Duration::from_secs_f64(frame_seconds);
            }

            let timeout = next_frame.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }

        self.installation.handle(ControlEvent::Stop)?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
            self.should_quit = true;
            return Ok(());
        }
        if let Some(event) = key_event(key, self.installation.state()) {
            self.installation.handle(event)?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status
                Constraint::Min(8),    // Particles
                Constraint::Length(4), // Meter
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        self.render_status(frame, chunks[0]);
        self.render_particles(frame, chunks[1]);
        self.render_meter(frame, chunks[2]);

        let help = Paragraph::new(concat!(
            " [R/G/B] Shade  [P/F] Mode  [+/-] Voices  [N] Seed  [S] Restart  [X] Stop",
            "  [Space] Pause  [C] Resume  [3/6] FPS  [Q] Quit",
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let state = self.installation.state();
        let pool = self.installation.pool();

        let (symbol, label, color) = match (state.audio_running, state.frozen) {
            (true, false) => ("▶", "Playing", Color::Green),
            (true, true) => ("⏸", "Paused", Color::Yellow),
            (false, _) => ("■", "Stopped", Color::Red),
        };

        let line = Line::from(vec![
            Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
            Span::styled(
                format!("{} / {}  ", state.shade.name(), state.mode.name()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("Voices {}/{}  ", state.active_voices, pool.max_voices()),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("Running {}  ", self.meter.running),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(
                    "Root {}  Seed {}  {:.0} fps",
                    pool.root_note(),
                    state.noise_seed,
                    state.frame_rate
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        let block = Block::default().title(" flowsynth ").borders(Borders::ALL);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_particles(&self, frame: &mut Frame, area: Rect) {
        let sim = self.installation.simulation();
        let (width, height) = sim.size();
        let active = self.installation.state().active_voices;

        let canvas = Canvas::default()
            .block(Block::default().title(" Field ").borders(Borders::ALL))
            .marker(Marker::Braille)
            .x_bounds([0.0, width as f64])
            .y_bounds([0.0, height as f64])
            .paint(|ctx| {
                for (index, particle) in sim.particles().iter().take(active).enumerate() {
                    // Canvas y grows upwards.
                    let coords = [(particle.x as f64, (height - particle.y) as f64)];
                    ctx.draw(&Points {
                        coords: &coords,
                        color: hue_color(particle.color, sim.alpha(index)),
                    });
                }
            });
        frame.render_widget(canvas, area);
    }

    fn render_meter(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        for (row, (name, peak)) in rows
            .iter()
            .zip([("L", self.meter.peak_left), ("R", self.meter.peak_right)])
        {
            let ratio = peak.clamp(0.0, 1.0) as f64;
            let color = if ratio > 0.9 { Color::Red } else { Color::Magenta };
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::LEFT).title(name))
                .gauge_style(Style::default().fg(color))
                .ratio(ratio)
                .label(format!("{peak:.2}"));
            frame.render_widget(gauge, *row);
        }
    }
}

/// Control event for a key, given the current state. Quit keys are handled
/// by the caller.
pub fn key_event(key: KeyCode, state: &ControlState) -> Option<ControlEvent> {
    let event = match key {
        KeyCode::Char('r') => ControlEvent::SetShade(Shade::Red),
        KeyCode::Char('g') => ControlEvent::SetShade(Shade::Green),
        KeyCode::Char('b') => ControlEvent::SetShade(Shade::Blue),
        KeyCode::Char('p') => ControlEvent::SetMode(Mode::Particle),
        KeyCode::Char('f') => ControlEvent::SetMode(Mode::Flow),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            ControlEvent::SetActiveVoiceCount(state.active_voices + 1)
        }
        KeyCode::Char('-') => {
            ControlEvent::SetActiveVoiceCount(state.active_voices.saturating_sub(1))
        }
        KeyCode::Char('n') => ControlEvent::NewSeed,
        KeyCode::Char('s') => ControlEvent::Start,
        KeyCode::Char('x') => ControlEvent::Stop,
        KeyCode::Char(' ') if state.frozen => ControlEvent::Resume,
        KeyCode::Char(' ') => ControlEvent::Pause,
        KeyCode::Char('c') => ControlEvent::Resume,
        KeyCode::Char('3') => ControlEvent::SetFrameRate(30.0),
        KeyCode::Char('6') => ControlEvent::SetFrameRate(60.0),
        _ => return None,
    };
    Some(event)
}

/// Fully saturated color at `hue` degrees, dimmed by `alpha`.
fn hue_color(hue: f32, alpha: f32) -> Color {
    let value = 0.35 + 0.65 * alpha.clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let channel = |c: f32| (c * value * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}
