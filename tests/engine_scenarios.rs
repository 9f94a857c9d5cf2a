use approx::assert_abs_diff_eq;
use parabola_lab::core::window::to_canvas_coordinates;
use parabola_lab::{
    EnginePhase, FrameQueue, LabConfig, LaunchOutcome, LaunchParameters, ManualClock,
    SimulationHistory, SimulationRecord, TrajectoryEngine,
};

type Engine<R> = TrajectoryEngine<ManualClock, FrameQueue, R>;

fn new_engine<R: parabola_lab::FlightRecorder>(clock: &ManualClock, recorder: R) -> Engine<R> {
    TrajectoryEngine::new(&LabConfig::default(), clock.clone(), FrameQueue::new(), recorder)
}

/// Fires frames every `step_ms` until the queue runs dry, returning the
/// progress values seen.
fn run_to_completion<R: parabola_lab::FlightRecorder>(
    engine: &mut Engine<R>,
    clock: &ManualClock,
    step_ms: f64,
) -> Vec<f64> {
    let mut seen = Vec::new();
    while engine.scheduler_mut().take_due().is_some() {
        if let Some(update) = engine.on_frame() {
            seen.push(update.progress);
        }
        clock.advance(step_ms);
        assert!(seen.len() < 10_000, "animation never finished");
    }
    seen
}

#[test]
fn full_cycle_records_exactly_once() {
    let clock = ManualClock::new(5_000.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());

    assert_eq!(
        engine.launch(LaunchParameters::new(45.0, 25.0, 9.8)),
        LaunchOutcome::Accepted
    );
    let progress = run_to_completion(&mut engine, &clock, 16.0);

    assert_eq!(engine.phase(), EnginePhase::Complete);
    assert_eq!(engine.recorder().len(), 1);
    assert_eq!(progress.last().copied(), Some(1.0));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));

    // Further frames after completion are ignored and record nothing.
    assert!(engine.on_frame().is_none());
    assert_eq!(engine.recorder().len(), 1);
    assert!(engine.pending_frame().is_none());
}

#[test]
fn positions_at_both_ends_match_canvas_mapping() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());
    engine.launch(LaunchParameters::new(60.0, 30.0, 9.8));

    let canvas = *engine.canvas();
    let (metrics, viewport) = match (engine.metrics(), engine.viewport()) {
        (Some(m), Some(v)) => (*m, *v),
        _ => panic!("flight should be computed"),
    };

    let _ = engine.scheduler_mut().take_due();
    let first = engine.on_frame().expect("first frame");
    let launch_px = to_canvas_coordinates(
        0.0,
        0.0,
        viewport.scale_x,
        viewport.scale_y,
        canvas.padding,
        canvas.height,
    );
    assert_eq!(first.progress, 0.0);
    assert_eq!(first.position, launch_px);

    clock.advance(engine.animation().map_or(0.0, |a| a.duration_ms));
    let _ = engine.scheduler_mut().take_due();
    let last = engine.on_frame().expect("final frame");
    let landing_px = to_canvas_coordinates(
        metrics.range_m,
        0.0,
        viewport.scale_x,
        viewport.scale_y,
        canvas.padding,
        canvas.height,
    );
    assert!(last.finished);
    assert_eq!(last.progress, 1.0);
    assert_abs_diff_eq!(last.position.x, landing_px.x, epsilon = 1e-9);
    assert_abs_diff_eq!(last.position.y, landing_px.y, epsilon = 1e-9);
}

#[test]
fn flat_launch_completes_on_first_frame() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());
    engine.launch(LaunchParameters::new(0.0, 25.0, 9.8));

    assert_eq!(engine.animation().map(|a| a.duration_ms), Some(0.0));
    let progress = run_to_completion(&mut engine, &clock, 16.0);

    assert_eq!(progress, vec![1.0]);
    assert_eq!(engine.phase(), EnginePhase::Complete);
    let record = engine.recorder()[0];
    assert_eq!(record.distance, 0.0);
    assert_eq!(record.height, 0.0);
    assert!(engine.current_position().x.is_finite());
    assert!(engine.current_position().y.is_finite());
}

#[test]
fn progress_reaches_one_only_after_duration() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());
    engine.launch(LaunchParameters::new(45.0, 25.0, 9.8));
    let duration = engine.animation().map_or(0.0, |a| a.duration_ms);

    clock.advance(duration - 1.0);
    let _ = engine.scheduler_mut().take_due();
    let before = engine.on_frame().expect("frame");
    assert!(before.progress < 1.0);
    assert!(!before.finished);
    assert_eq!(engine.phase(), EnginePhase::Animating);

    clock.advance(1.0);
    let _ = engine.scheduler_mut().take_due();
    let at = engine.on_frame().expect("frame");
    assert_eq!(at.progress, 1.0);
    assert!(at.finished);
}

#[test]
fn relaunch_after_completion_starts_a_fresh_cycle() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());

    engine.launch(LaunchParameters::new(45.0, 25.0, 9.8));
    run_to_completion(&mut engine, &clock, 50.0);
    assert_eq!(engine.phase(), EnginePhase::Complete);

    assert_eq!(
        engine.launch(LaunchParameters::new(30.0, 10.0, 9.8)),
        LaunchOutcome::Accepted
    );
    assert_eq!(engine.phase(), EnginePhase::Animating);
    assert_eq!(engine.animation().map(|a| a.progress), Some(0.0));
    assert_eq!(engine.metrics().map(|m| m.launch.speed_mps), Some(10.0));

    run_to_completion(&mut engine, &clock, 50.0);
    assert_eq!(engine.recorder().len(), 2);
}

#[test]
fn teardown_mid_flight_records_nothing() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());
    engine.launch(LaunchParameters::new(45.0, 25.0, 9.8));

    clock.advance(100.0);
    let _ = engine.scheduler_mut().take_due();
    engine.on_frame();
    engine.teardown();

    assert_eq!(engine.phase(), EnginePhase::Idle);
    assert_eq!(engine.scheduler().pending_len(), 0);
    assert_eq!(engine.scheduler().cancelled().len(), 1);
    assert!(engine.on_frame().is_none());
    assert!(engine.recorder().is_empty());
}

#[test]
fn history_recorder_keeps_completed_flights() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, SimulationHistory::new());

    for speed in [10.0, 20.0, 30.0] {
        engine.launch(LaunchParameters::new(45.0, speed, 9.8));
        run_to_completion(&mut engine, &clock, 100.0);
    }

    let recent = engine.recorder().recent(10);
    assert_eq!(recent.len(), 3);
    let speeds: Vec<f64> = recent.iter().map(|e| e.record.velocity).collect();
    assert!(speeds.contains(&30.0) && speeds.contains(&10.0));
}

#[test]
fn text_input_defaults_flow_through_to_the_record() {
    let clock = ManualClock::new(0.0);
    let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());
    let config = LabConfig::default();

    let launch = LaunchParameters::from_text("", "", "", &config.defaults);
    engine.launch(launch);
    run_to_completion(&mut engine, &clock, 100.0);

    let record = engine.recorder()[0];
    assert_eq!(record.angle, 45.0);
    assert_eq!(record.velocity, 25.0);
    assert_abs_diff_eq!(record.height, 15.943_877_55, epsilon = 1e-6);
}

#[test]
fn huge_speed_and_tiny_gravity_still_animate_with_finite_positions() {
    for (speed, gravity) in [("1e200", "9.8"), ("25", "1e-320")] {
        let clock = ManualClock::new(0.0);
        let mut engine = new_engine(&clock, Vec::<SimulationRecord>::new());
        let launch = LaunchParameters::from_text("45", speed, gravity, &Default::default());
        engine.launch(launch);

        let metrics = *engine.metrics().expect("metrics computed");
        assert!(metrics.range_m.is_finite() && metrics.max_height_m.is_finite());
        let sample = engine.sample().expect("path sampled");
        assert!(sample.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));

        while engine.scheduler_mut().take_due().is_some() {
            let update = engine.on_frame().expect("frame while animating");
            assert!(update.position.x.is_finite() && update.position.y.is_finite());
            clock.advance(16.0);
        }

        assert_eq!(engine.phase(), EnginePhase::Complete);
        let record = engine.recorder()[0];
        assert!(record.distance.is_finite() && record.height.is_finite());
    }
}
