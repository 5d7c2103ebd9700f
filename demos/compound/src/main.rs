//! compound: headless run of the perimeter scene.
//!
//! One drone patrols the compound from its landing pad, one guard waits at
//! the trailer with a ten-strong swarm in reserve, and a bear wanders the
//! grounds.  A gate camera reports the bear, the drone flies to investigate,
//! then the guard's alert sends the swarm after it.
//!
//! ```text
//! cargo run -p compound -- [frames]
//! PM_CONTROLLER_ADDR=127.0.0.1:5555 cargo run -p compound
//! ```
//!
//! With `PM_CONTROLLER_ADDR` set, the drone also listens for newline-framed
//! commands from a controller at that address.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pm_agent::{AgentBuilder, AgentProfile, Mode, Roster};
use pm_command::{AlertNotice, CameraRegistry, CommandChannel};
use pm_core::{AgentConfig, AgentId, ChannelConfig, TargetId, Tick, Vec3};
use pm_sim::{WorldBuilder, WorldObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const FRAME_RATE:       f32 = 60.0;
const DEFAULT_FRAMES:   u64 = 3_600; // one simulated minute
const REPORT_INTERVAL:  u64 = 600;

const DRONE: AgentId = AgentId(0);
const GUARD: AgentId = AgentId(1);
const BEAR:  AgentId = AgentId(2);

// ── Scene ─────────────────────────────────────────────────────────────────────

const SCENE_JSON: &str = r#"{
    "pad":     {"x": -20.0, "y": 0.0, "z": 10.0},
    "trailer": {"x": 20.0,  "y": 0.0, "z": -15.0},
    "cameras": {
        "gate_cam":  {"x": -10.0, "y": 3.0, "z": 25.0},
        "north_cam": {"x": 0.0,   "y": 3.0, "z": -30.0}
    },
    "alert_camera":    "gate_cam",
    "alert_frame":     900,
    "intercept_frame": 1500
}"#;

#[derive(Deserialize)]
struct Scene {
    pad:             Vec3,
    trailer:         Vec3,
    cameras:         CameraRegistry,
    alert_camera:    String,
    alert_frame:     u64,
    intercept_frame: u64,
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SceneLog {
    mode_changes: usize,
    catches:      Vec<(Tick, AgentId, TargetId)>,
}

impl WorldObserver for SceneLog {
    fn on_mode_change(&mut self, tick: Tick, agent: AgentId, from: Mode, to: Mode) {
        self.mode_changes += 1;
        info!(%tick, %agent, %from, %to, "mode change");
    }

    fn on_catch(&mut self, tick: Tick, catcher: AgentId, target: TargetId) {
        self.catches.push((tick, catcher, target));
        info!(%tick, %catcher, %target, "catch");
    }

    fn on_mission_complete(&mut self, tick: Tick, agent: AgentId) {
        info!(%tick, %agent, "mission complete");
    }

    fn on_camera_handoff(&mut self, tick: Tick, agent: AgentId) {
        info!(%tick, %agent, "switch to next camera");
    }

    fn on_swarm_spawn(&mut self, tick: Tick, main: AgentId, followers: &[AgentId]) {
        info!(%tick, %main, count = followers.len(), "swarm out");
    }

    fn on_swarm_despawn(&mut self, tick: Tick, main: AgentId, followers: &[AgentId]) {
        info!(%tick, %main, count = followers.len(), "swarm recalled");
    }

    fn on_tick_end(&mut self, tick: Tick, roster: &Roster) {
        if !tick.every(REPORT_INTERVAL) {
            return;
        }
        for agent in roster.iter().filter(|a| a.id() <= BEAR) {
            info!(%tick, agent = %agent.id(), mode = %agent.state().mode, position = %agent.position(), "status");
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid frame count {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };
    let scene: Scene = serde_json::from_str(SCENE_JSON).context("parsing embedded scene")?;

    // ── Agents ───────────────────────────────────────────────────────────────
    let drone_cfg = AgentConfig::drone(scene.pad);
    let flight = drone_cfg.flight.clone().unwrap_or_default();
    let bear_cfg = AgentConfig { start_delay_secs: 0.0, ..AgentConfig::patroller() };

    let mut world = WorldBuilder::new()
        .agent(AgentBuilder::new(AgentProfile::drone(flight), drone_cfg))
        .swarm_leader(AgentBuilder::new(AgentProfile::guard(), AgentConfig::guard(scene.trailer)))
        .target_agent(AgentBuilder::new(AgentProfile::patroller(), bear_cfg))
        .build()
        .context("building world")?;

    let bear = world.target_of(BEAR).context("bear is not bound as a target")?;
    world.track_target(DRONE, bear)?;
    info!(cameras = scene.cameras.len(), frames, "scene ready");

    // ── Optional controller link ─────────────────────────────────────────────
    let mut channel = match std::env::var("PM_CONTROLLER_ADDR") {
        Ok(addr) => {
            let cfg = ChannelConfig { server_addr: addr, ..ChannelConfig::default() };
            Some(CommandChannel::spawn(cfg, world.command_sender(DRONE)?)?)
        }
        Err(_) => None,
    };

    // ── Run ──────────────────────────────────────────────────────────────────
    let dt = 1.0 / FRAME_RATE;
    let mut log = SceneLog::default();
    for frame in 0..frames {
        if frame == scene.alert_frame {
            let notice = AlertNotice { camera_id: scene.alert_camera.clone(), alert: true };
            match scene.cameras.to_command(&notice) {
                Some(cmd) => {
                    world.submit_command(DRONE, cmd)?;
                }
                None => warn!(camera = %notice.camera_id, "alert dropped"),
            }
        }
        if frame == scene.intercept_frame && world.targets().contains(bear) {
            world.raise_alert(GUARD, bear)?;
        }
        world.tick(dt, &mut log);
    }

    if let Some(ch) = channel.as_mut() {
        let stats = ch.stats();
        info!(attempts = stats.attempts, connections = stats.connections, lines = stats.lines, "controller link");
        ch.shutdown();
    }

    info!(
        frames,
        elapsed_secs = world.clock().elapsed_secs(),
        mode_changes = log.mode_changes,
        catches = log.catches.len(),
        agents = world.roster().len(),
        "run complete"
    );
    if let Some((tick, catcher, _)) = log.catches.first() {
        info!(%tick, %catcher, "bear caught");
    }
    Ok(())
}
