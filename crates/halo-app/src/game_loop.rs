//! Radar loop thread: steps the demo world and the radar engine at 60 Hz.
//!
//! The world and the engine are moved into the thread and owned there.
//! Commands arrive via an `mpsc` channel. Each frame is stored in shared
//! state for polling, and pulse-relevant setting changes are republished to
//! the pulse thread.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{error, info};

use halo_core::commands::RadarCommand;
use halo_core::constants::{DT, TICK_RATE};
use halo_core::error::Result;
use halo_core::state::{DiscLayout, RadarFrame};
use halo_tracker::collaborators::ConfigSource;
use halo_tracker::RadarEngine;

use crate::demo_world::DemoWorld;
use crate::sink::TracingSink;
use crate::state::{LoopCommand, PulseSettings};

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the radar loop in a new thread.
///
/// Returns the command sender and the thread handle. The thread exits after
/// a `Shutdown` command or when every sender is dropped.
pub fn spawn_radar_loop(
    world: DemoWorld,
    layout: DiscLayout,
    latest_frame: Arc<Mutex<Option<RadarFrame>>>,
    pulse: Arc<Mutex<PulseSettings>>,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("halo-radar-loop".into())
        .spawn(move || {
            run_radar_loop(world, TracingSink::new(layout), cmd_rx, &latest_frame, &pulse);
        })?;

    Ok((cmd_tx, handle))
}

/// Run `frames` fixed steps without a thread or a wall clock.
///
/// Returns the last frame produced. The session is stopped before returning.
pub fn run_batch(world: &mut DemoWorld, sink: &mut TracingSink, frames: u32) -> Result<RadarFrame> {
    let mut engine = RadarEngine::new();
    engine.start(world, sink)?;

    let mut frame = RadarFrame::default();
    for _ in 0..frames {
        world.step(DT);
        let now = world.now_secs();
        frame = engine.tick(world, sink, now);
    }

    engine.stop(world, sink);
    Ok(frame)
}

fn publish_pulse(pulse: &Mutex<PulseSettings>, world: &DemoWorld) {
    if let Ok(mut lock) = pulse.lock() {
        *lock = PulseSettings::from_config(&world.current());
    }
}

/// The radar loop. Runs until Shutdown or channel disconnect.
fn run_radar_loop(
    mut world: DemoWorld,
    mut sink: TracingSink,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_frame: &Mutex<Option<RadarFrame>>,
    pulse: &Mutex<PulseSettings>,
) {
    let mut engine = RadarEngine::new();
    if let Err(error) = engine.start(&mut world, &mut sink) {
        error!(%error, "radar loop could not start");
        return;
    }
    publish_pulse(pulse, &world);

    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        let mut pulse_changed = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Radar(command)) => {
                    if let RadarCommand::SetConfig { value } = &command {
                        pulse_changed |= value.key().affects_pulse();
                    }
                    engine.queue_command(command);
                }
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    engine.stop(&mut world, &mut sink);
                    info!(frames = sink.frames_presented(), "radar loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Step the world, then the radar
        world.step(DT);
        let now = world.now_secs();
        let frame = engine.tick(&mut world, &mut sink, now);

        // 3. Settings were applied during the tick
        if pulse_changed {
            publish_pulse(pulse, &world);
        }

        // 4. Store latest frame for polling
        if let Ok(mut lock) = latest_frame.lock() {
            *lock = Some(frame);
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::config::{ConfigValue, RadarConfig};

    use crate::demo_world::WorldParams;

    fn demo() -> DemoWorld {
        DemoWorld::new(
            WorldParams {
                seed: 9,
                ..Default::default()
            },
            RadarConfig {
                enable_loot: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();

        tx.send(LoopCommand::Radar(RadarCommand::RestartSession)).unwrap();
        tx.send(LoopCommand::Radar(RadarCommand::Pause)).unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            LoopCommand::Radar(RadarCommand::RestartSession)
        ));
        assert!(matches!(commands[1], LoopCommand::Radar(RadarCommand::Pause)));
        assert!(matches!(commands[2], LoopCommand::Shutdown));
    }

    #[test]
    fn test_frame_serialization_under_3ms() {
        let mut world = demo();
        let mut sink = TracingSink::default();
        let frame = run_batch(&mut world, &mut sink, 120).unwrap();

        let start = Instant::now();
        let json = serde_json::to_string(&frame).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Frame serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_batch_releases_every_sprite() {
        let mut world = demo();
        let mut sink = TracingSink::default();
        let frame = run_batch(&mut world, &mut sink, 180).unwrap();

        assert_eq!(frame.time.frame, 180);
        assert!(frame.tracked_enemies > 0);
        assert_eq!(sink.live_blips(), 0, "stop destroys every sprite");
        assert_eq!(sink.frames_presented(), 180);
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let mut world = demo();
        let mut sink = TracingSink::default();
        let mut engine = RadarEngine::new();
        engine.start(&mut world, &mut sink).unwrap();

        let frame = engine.tick(&mut world, &mut sink, 0.0);
        assert_eq!(frame.time.frame, 1);

        // Pause
        engine.queue_command(RadarCommand::Pause);
        let frame = engine.tick(&mut world, &mut sink, DT);
        assert!(engine.is_paused());
        let paused_frame = frame.time.frame;

        // Tick while paused: time should not advance
        let frame = engine.tick(&mut world, &mut sink, 2.0 * DT);
        assert_eq!(frame.time.frame, paused_frame);
        assert!(frame.updates.is_empty());

        // Resume
        engine.queue_command(RadarCommand::Resume);
        let frame = engine.tick(&mut world, &mut sink, 3.0 * DT);
        assert!(!engine.is_paused());
        assert!(frame.time.frame > paused_frame);
    }

    #[test]
    fn test_loop_thread_applies_settings_and_shuts_down() {
        let latest = Arc::new(Mutex::new(None));
        let pulse = Arc::new(Mutex::new(PulseSettings {
            interval: 1.0,
            enabled: true,
        }));
        let (tx, handle) = spawn_radar_loop(
            demo(),
            DiscLayout::default(),
            Arc::clone(&latest),
            Arc::clone(&pulse),
        )
        .unwrap();

        tx.send(LoopCommand::Radar(RadarCommand::SetConfig {
            value: ConfigValue::ScanInterval(2.5),
        }))
        .unwrap();
        tx.send(LoopCommand::Radar(RadarCommand::SetConfig {
            value: ConfigValue::EnablePulse(false),
        }))
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let settled = || pulse.lock().unwrap().interval == 2.5 && latest.lock().unwrap().is_some();
        while Instant::now() < deadline && !settled() {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(
            *pulse.lock().unwrap(),
            PulseSettings {
                interval: 2.5,
                enabled: false
            }
        );
        assert!(latest.lock().unwrap().is_some());

        tx.send(LoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.667ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
