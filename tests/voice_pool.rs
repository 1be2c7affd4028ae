use flowsynth::{
    io::{AudioBackend, OfflineBackend},
    synth::{Mode, VoicePool},
    EngineConfig,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn pool(max_voices: usize, initial_voices: usize) -> VoicePool<OfflineBackend> {
    let config = EngineConfig {
        max_voices,
        initial_voices,
        seed: Some(42),
        ..EngineConfig::default()
    };
    VoicePool::new(config, OfflineBackend::new(SAMPLE_RATE))
}

fn render(pool: &mut VoicePool<OfflineBackend>, frames: usize) -> (Vec<f32>, Vec<f32>) {
    let mut left = vec![0.0; frames];
    let mut right = vec![0.0; frames];
    pool.backend_mut().render(&mut left, &mut right);
    (left, right)
}

#[test]
fn active_count_enables_exactly_a_prefix() {
    let mut pool = pool(16, 0);
    for n in 0..=16 {
        assert_eq!(pool.set_active_count(n), n);
        for (index, voice) in pool.voices().iter().enumerate() {
            assert_eq!(voice.is_enabled(), index < n, "n = {n}, voice {index}");
        }
    }
}

#[test]
fn twenty_of_a_hundred_voices_reach_the_bus() {
    let mut pool = pool(100, 20);
    assert_eq!(pool.set_active_count(20), 20);
    pool.start().unwrap();

    let (left, right) = render(&mut pool, 4_096);
    assert_eq!(pool.running_oscillators(), 20);
    assert!(pool.voices()[..20].iter().all(|v| v.peak() > 0.0));
    assert!(pool.voices()[20..].iter().all(|v| v.peak() == 0.0));
    assert!(left.iter().chain(&right).any(|s| s.abs() > 0.0));
    assert!(left.iter().chain(&right).all(|s| s.is_finite() && s.abs() <= 1.0));
}

#[test]
fn stopping_twice_matches_stopping_once() {
    let mut pool = pool(8, 8);
    pool.start().unwrap();
    render(&mut pool, 512);

    pool.stop();
    let once = (pool.is_running(), pool.running_oscillators());
    pool.stop();
    assert_eq!((pool.is_running(), pool.running_oscillators()), once);
    assert_eq!(once, (false, 0));

    let (left, right) = render(&mut pool, 256);
    assert!(left.iter().chain(&right).all(|&s| s == 0.0));
}

#[test]
fn starting_twice_keeps_one_renderer() {
    let mut pool = pool(8, 8);
    pool.start().unwrap();
    render(&mut pool, 1_000);
    pool.start().unwrap();
    render(&mut pool, 1_000);
    assert_eq!(pool.backend().frames_rendered(), 2_000);
    assert!(pool.backend().is_running());
}

#[test]
fn crossing_the_left_edge_retriggers_immediately() {
    let mut pool = pool(4, 4);
    pool.set_mode(Mode::Particle);
    pool.start().unwrap();
    // Let the initial envelope finish
    for _ in 0..30 {
        render(&mut pool, 1_024);
    }
    let voice = pool.voice(0).unwrap();
    assert!(!voice.envelope_active());

    let y = 300.0;
    assert!(!voice.on_boundary_cross(Mode::Particle, 1.0, y));
    assert!(voice.on_boundary_cross(Mode::Particle, -1.0, y));
    assert!(voice.envelope_active());
}

#[test]
fn flow_mode_ignores_edges() {
    let mut pool = pool(4, 4);
    pool.set_mode(Mode::Flow);
    pool.start().unwrap();
    for _ in 0..30 {
        render(&mut pool, 1_024);
    }
    let voice = pool.voice(0).unwrap();
    assert!(!voice.on_boundary_cross(Mode::Flow, -1.0, 300.0));
    assert!(!voice.envelope_active());
}

#[test]
fn restart_renders_again() {
    let mut pool = pool(10, 10);
    pool.set_mode(Mode::Flow);
    pool.start().unwrap();
    render(&mut pool, 2_048);
    pool.stop();

    pool.reroll();
    pool.start().unwrap();
    let (left, right) = render(&mut pool, 4_096);
    assert_eq!(pool.running_oscillators(), 10);
    assert!(left.iter().chain(&right).any(|s| s.abs() > 0.0));
}

#[test]
fn meter_follows_output() {
    let mut pool = pool(20, 20);
    pool.start().unwrap();
    let (left, _) = render(&mut pool, 4_096);

    let frame = pool.poll_meter();
    let peak = left.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    assert_eq!(frame.running, 20);
    assert!(frame.peak_left > 0.0);
    assert!(frame.peak_left <= peak + 1e-6);
}
