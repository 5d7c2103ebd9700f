//! The per-agent behavior state machine.
//!
//! # Tick order
//!
//! ```text
//! tick(dt):
//!   ① advance the agent's mission clock; emit a due camera handoff
//!   ② drain the command queue, FIFO, through handle_event
//!   ③ start the mission once the start delay has elapsed
//!   ④ enter / leave Intercept from the alert flag and target liveness
//!   ⑤ run the movement step of the current mode
//!   ⑥ periodic debug! state line
//! ```
//!
//! Priority between concurrently valid behaviors is
//! Manual > Intercept > Investigate > Patrol > Returning: Manual suspends
//! autonomy entirely, Intercept pre-empts the lower three in step ④, and
//! Investigate is only entered from Patrol or Returning.

use pm_command::{Command, CommandQueue, CommandSender};
use pm_core::{AgentConfig, AgentId, Orientation, SimClock, TargetId, Vec3};
use pm_patrol::{Boundary, PatrolRoute, plan_patrol};
use tracing::{debug, error, info, warn};

use crate::{
    AgentError, AgentEvent, AgentOutcome, AgentProfile, AgentResult, AgentState, GateHandle,
    ManualInput, Mission, MissionPhase, Mode, PatrolEnd, SavedState, TargetRegistry, manual,
};

// ── Role / TickContext ────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Main,
    Follower,
}

/// Shared, read-only inputs for one tick.
pub struct TickContext<'a> {
    /// Frame time in seconds.  Non-finite or negative values count as 0.
    pub dt:      f32,
    pub targets: &'a TargetRegistry,
}

// ── AgentBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Agent`].
///
/// | Method           | Default                                               |
/// |------------------|-------------------------------------------------------|
/// | `.position(p)`   | pad + spawn clearance (aerial), home (ground), else the first patrol point |
/// | `.route(r)`      | planned from `config.boundary` with [`plan_patrol`]    |
/// | `.track(t)`      | no tracked target                                     |
pub struct AgentBuilder {
    profile:  AgentProfile,
    config:   AgentConfig,
    position: Option<Vec3>,
    route:    Option<PatrolRoute>,
    target:   Option<TargetId>,
}

impl AgentBuilder {
    pub fn new(profile: AgentProfile, config: AgentConfig) -> Self {
        Self { profile, config, position: None, route: None, target: None }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn route(mut self, route: PatrolRoute) -> Self {
        self.route = Some(route);
        self
    }

    pub fn track(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    /// Check the configuration without building.
    pub fn validate(&self) -> AgentResult<()> {
        self.config.validate()?;
        if self.route.is_none() {
            Boundary::new(self.config.boundary.clone())?;
        }
        Ok(())
    }

    /// Build the agent.  Configuration problems are logged once and the
    /// agent runs degraded: an unusable boundary leaves it with an empty
    /// route, which it reports every time it tries to patrol.
    pub fn build(self, id: AgentId) -> Agent {
        if let Err(e) = self.validate() {
            error!(agent = %id, error = %e, "agent configuration error");
        }
        let config = self.config;
        let profile = self.profile;

        let route = self.route.unwrap_or_else(|| match Boundary::new(config.boundary.clone()) {
            Ok(boundary) => PatrolRoute::new(plan_patrol(&boundary, &config)),
            Err(_) => PatrolRoute::default(),
        });
        let position = self.position.unwrap_or_else(|| default_spawn(&profile, &config, &route));

        let clock = SimClock::new();
        let mission = Mission::new(&clock, config.start_delay_secs);
        info!(agent = %id, points = route.len(), %position, "agent spawned");

        Agent {
            id,
            role: Role::Main,
            profile,
            config,
            state: AgentState::idle_at(position),
            route,
            mission,
            clock,
            target: self.target,
            alert_active: false,
            gate: GateHandle::default(),
            spawn_offset: Vec3::ZERO,
            commands: CommandQueue::new(),
            manual_input: ManualInput::default(),
            orbit_angle: 0.0,
            investigate_hint: None,
            cruise_altitude: None,
            outcomes: Vec::new(),
        }
    }
}

fn default_spawn(profile: &AgentProfile, config: &AgentConfig, route: &PatrolRoute) -> Vec3 {
    match (config.home, &profile.flight) {
        (Some(pad), Some(flight)) => pad + Vec3::UP * flight.spawn_clearance,
        (Some(home), None) => home.with_y(config.height),
        (None, _) => route.get(0).unwrap_or(Vec3::ZERO.with_y(config.height)),
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

pub struct Agent {
    id:               AgentId,
    role:             Role,
    profile:          AgentProfile,
    config:           AgentConfig,
    state:            AgentState,
    route:            PatrolRoute,
    mission:          Mission,
    clock:            SimClock,
    /// Target this agent investigates or intercepts.
    target:           Option<TargetId>,
    alert_active:     bool,
    gate:             GateHandle,
    /// Added to every patrol / home waypoint.  Non-zero for followers.
    spawn_offset:     Vec3,
    commands:         CommandQueue,
    manual_input:     ManualInput,
    /// Degrees around the investigated target.
    orbit_angle:      f32,
    investigate_hint: Option<Vec3>,
    /// Take-off goal while the mission is departing.
    cruise_altitude:  Option<f32>,
    outcomes:         Vec<AgentOutcome>,
}

impl Agent {
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current behavior state.
    #[inline]
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    #[inline]
    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    #[inline]
    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    #[inline]
    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    #[inline]
    pub fn alert_active(&self) -> bool {
        self.alert_active
    }

    #[inline]
    pub fn spawn_offset(&self) -> Vec3 {
        self.spawn_offset
    }

    /// Last sighting reported with an investigate request.
    #[inline]
    pub fn investigate_hint(&self) -> Option<Vec3> {
        self.investigate_hint
    }

    // ── Inputs ────────────────────────────────────────────────────────────

    /// Queue a command for the next tick.
    pub fn submit_command(&self, command: Command) -> bool {
        self.commands.sender().send(command)
    }

    /// Producer handle for this agent's queue, e.g. for a
    /// [`CommandChannel`](pm_command::CommandChannel).
    pub fn command_sender(&self) -> CommandSender {
        self.commands.sender()
    }

    /// Replace the operator input applied while in Manual.
    pub fn set_manual_input(&mut self, input: ManualInput) -> AgentResult<()> {
        if !self.profile.capabilities.manual_control {
            return Err(AgentError::MissingCapability { agent: self.id, capability: "manual_control" });
        }
        self.manual_input = input;
        Ok(())
    }

    /// Set the tracked target without touching the alert flag.
    pub fn track(&mut self, target: Option<TargetId>) {
        self.target = target;
    }

    /// Set or clear the alert flag directly.  Equivalent to
    /// `RaiseAlert` / `ClearAlert` but keeps the tracked target.
    pub fn set_alert(&mut self, active: bool) {
        if !self.mission.complete() {
            self.alert_active = active;
        }
    }

    pub fn attach_gate(&mut self, gate: GateHandle) {
        self.gate = gate;
    }

    /// A follower copy of this agent, positioned at `offset` from it.
    ///
    /// The follower shares this agent's route (by value), patrol index,
    /// target and speeds, starts with its alert raised and its mission
    /// already underway, and cannot spawn followers of its own.
    pub fn spawn_follower(&self, id: AgentId, offset: Vec3, gate: GateHandle) -> Agent {
        let position = (self.state.position + offset).with_y(self.config.height);
        Agent {
            id,
            role: Role::Follower,
            profile: AgentProfile::follower(self.profile.patrol_end),
            config: self.config.clone(),
            state: AgentState {
                mode:         Mode::Patrol,
                patrol_index: self.state.patrol_index,
                position,
                orientation:  self.state.orientation.level(),
                saved:        None,
            },
            route: self.route.clone(),
            mission: Mission::already_underway(),
            clock: SimClock::new(),
            target: self.target,
            alert_active: true,
            gate,
            spawn_offset: offset,
            commands: CommandQueue::new(),
            manual_input: ManualInput::default(),
            orbit_angle: 0.0,
            investigate_hint: None,
            cruise_altitude: None,
            outcomes: Vec::new(),
        }
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Apply one event.  Returns `true` if it changed anything.
    ///
    /// Total over every (mode, event) pair: pairs outside the transition
    /// table in [`crate::event`] are ignored.
    pub fn handle_event(&mut self, event: AgentEvent, targets: &TargetRegistry) -> bool {
        if self.mission.complete() {
            debug!(agent = %self.id, ?event, "mission complete, event ignored");
            return false;
        }
        let mode = self.state.mode;
        let caps = self.profile.capabilities;

        match (mode, event) {
            (Mode::Idle, AgentEvent::StartMission) if self.mission.phase() == MissionPhase::Waiting => {
                self.begin_mission();
            }
            (Mode::Patrol | Mode::Returning, AgentEvent::Investigate { position })
                if self.target_alive(targets) =>
            {
                self.state.saved = Some(self.state.snapshot());
                self.investigate_hint = position.filter(|p| p.is_finite());
                self.orbit_angle = self.bearing_to_target(targets);
                self.set_mode(Mode::Investigate);
            }
            (Mode::Investigate, AgentEvent::ResumePatrol) => {
                self.resume_patrol_nearest();
            }
            (Mode::Idle | Mode::Patrol | Mode::Returning | Mode::Investigate, AgentEvent::EnableManual)
                if caps.manual_control =>
            {
                // From Investigate the pre-investigate snapshot is kept.
                if mode != Mode::Investigate {
                    self.state.saved = Some(self.state.snapshot());
                }
                self.state.orientation = self.state.orientation.level();
                self.manual_input = ManualInput::default();
                self.set_mode(Mode::Manual);
            }
            (Mode::Manual, AgentEvent::DisableManual | AgentEvent::ResumePatrol) => {
                self.exit_manual();
            }
            (_, AgentEvent::RaiseAlert { target }) => {
                self.target = Some(target);
                self.alert_active = true;
                info!(agent = %self.id, %target, "alert raised");
            }
            (_, AgentEvent::ClearAlert) => {
                self.alert_active = false;
                info!(agent = %self.id, "alert cleared");
            }
            (_, AgentEvent::NavigateTo { position }) if !position.is_finite() => {
                warn!(agent = %self.id, %position, "non-finite waypoint rejected");
                return false;
            }
            (_, AgentEvent::NavigateTo { position }) => {
                self.route.append(position);
                info!(agent = %self.id, %position, points = self.route.len(), "waypoint appended");
            }
            (mode, event) => {
                debug!(agent = %self.id, %mode, ?event, "event ignored");
                return false;
            }
        }
        true
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the agent by one frame.
    pub fn tick(&mut self, ctx: &TickContext<'_>) -> Vec<AgentOutcome> {
        let dt = if ctx.dt.is_finite() && ctx.dt > 0.0 { ctx.dt } else { 0.0 };
        self.clock.advance(dt);

        if self.mission.poll_handoff(&self.clock) {
            info!(agent = %self.id, "camera handoff");
            self.outcomes.push(AgentOutcome::CameraHandoff);
        }

        for command in self.commands.drain() {
            self.handle_event(command.into(), ctx.targets);
        }

        if !self.mission.complete() {
            if self.state.mode == Mode::Idle && self.mission.poll_start(&self.clock) {
                info!(agent = %self.id, "start delay elapsed");
                self.begin_mission();
            }
            self.update_intercept(ctx.targets);

            match self.state.mode {
                Mode::Idle => self.depart_step(dt),
                Mode::Patrol => self.patrol_step(dt),
                Mode::Investigate => self.investigate_step(ctx.targets, dt),
                Mode::Intercept => self.intercept_step(ctx.targets, dt),
                Mode::Manual => {
                    manual::apply(&mut self.state, self.manual_input, &self.config, self.profile.is_aerial(), dt)
                }
                Mode::Returning => self.returning_step(dt),
            }
        }

        self.log_state();
        std::mem::take(&mut self.outcomes)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn set_mode(&mut self, to: Mode) {
        let from = self.state.mode;
        if from == to {
            return;
        }
        self.state.mode = to;
        if !matches!(to, Mode::Manual | Mode::Investigate) {
            self.state.saved = None;
        }
        info!(agent = %self.id, %from, %to, "mode change");
        self.outcomes.push(AgentOutcome::ModeChanged { from, to });
    }

    fn begin_mission(&mut self) {
        match &self.profile.flight {
            Some(flight) => {
                let base = self.config.home.map_or(self.state.position.y, |pad| pad.y);
                self.cruise_altitude = Some(base + flight.takeoff_height);
                self.mission.depart();
                info!(agent = %self.id, altitude = base + flight.takeoff_height, "taking off");
            }
            None => {
                self.mission.underway();
                self.state.patrol_index = 0;
                self.set_mode(Mode::Patrol);
            }
        }
    }

    fn resume_patrol_nearest(&mut self) {
        let from = self.state.position - self.spawn_offset;
        self.state.patrol_index = self.route.nearest_index(from).unwrap_or(0);
        self.state.saved = None;
        self.set_mode(Mode::Patrol);
    }

    fn exit_manual(&mut self) {
        match self.state.saved.take() {
            Some(SavedState { mode: Mode::Returning, patrol_index }) => {
                self.state.patrol_index = patrol_index;
                self.set_mode(Mode::Returning);
            }
            Some(SavedState { mode: Mode::Idle, patrol_index }) => {
                self.state.patrol_index = patrol_index;
                self.set_mode(Mode::Idle);
            }
            _ => self.resume_patrol_nearest(),
        }
    }

    fn finish_mission(&mut self) {
        let handoff = self.profile.flight.as_ref().map(|f| f.camera_handoff_delay_secs);
        self.mission.finish(&self.clock, handoff);
        self.set_mode(Mode::Idle);
        self.alert_active = false;
        info!(agent = %self.id, "mission complete");
        self.outcomes.push(AgentOutcome::MissionComplete);
    }

    fn update_intercept(&mut self, targets: &TargetRegistry) {
        if !self.profile.capabilities.intercept {
            return;
        }
        let engaged = self.alert_active && self.target_alive(targets);
        match self.state.mode {
            Mode::Patrol | Mode::Returning | Mode::Investigate if engaged => {
                info!(agent = %self.id, target = ?self.target, "intercepting");
                self.state.saved = None;
                self.set_mode(Mode::Intercept);
            }
            Mode::Intercept if !engaged => {
                info!(agent = %self.id, "intercept abandoned, resuming patrol");
                self.resume_patrol_nearest();
            }
            _ => {}
        }
    }

    fn target_alive(&self, targets: &TargetRegistry) -> bool {
        self.target.is_some_and(|t| targets.contains(t))
    }

    fn bearing_to_target(&self, targets: &TargetRegistry) -> f32 {
        match self.target.and_then(|t| targets.position(t)) {
            Some(t) => {
                let d = self.state.position - t;
                d.z.atan2(d.x).to_degrees()
            }
            None => 0.0,
        }
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Straight-line step toward `goal`, facing the direction of travel.
    /// Returns the remaining distance.
    fn step_towards(&mut self, mut goal: Vec3, speed: f32, dt: f32) -> f32 {
        if !self.profile.is_aerial() {
            goal.y = self.config.height;
        }
        let from = self.state.position;
        let next = from.move_towards(goal, speed * dt);
        if let Some(facing) = Orientation::facing((next - from).with_y(0.0)) {
            self.state.orientation = facing;
        }
        self.state.position = next;
        next.distance(goal)
    }

    fn depart_step(&mut self, dt: f32) {
        if self.mission.phase() != MissionPhase::Departing {
            return;
        }
        let Some(altitude) = self.cruise_altitude else {
            return;
        };
        let goal = self.state.position.with_y(altitude);
        let from = self.state.position;
        self.state.position = from.move_towards(goal, self.config.speed * dt);
        if self.state.position.distance(goal) < self.config.arrival_epsilon {
            self.cruise_altitude = None;
            self.mission.underway();
            self.state.patrol_index = 0;
            self.set_mode(Mode::Patrol);
        }
    }

    fn patrol_step(&mut self, dt: f32) {
        if self.route.is_empty() {
            error!(agent = %self.id, "patrol route is empty");
            return;
        }
        let Some(waypoint) = self.route.get(self.state.patrol_index) else {
            self.route_finished();
            return;
        };
        let remaining = self.step_towards(waypoint + self.spawn_offset, self.config.speed, dt);
        if remaining < self.config.arrival_epsilon {
            self.state.patrol_index += 1;
            if self.state.patrol_index >= self.route.len() {
                self.route_finished();
            }
        }
    }

    fn route_finished(&mut self) {
        info!(agent = %self.id, end = ?self.profile.patrol_end, "patrol route finished");
        match self.profile.patrol_end {
            PatrolEnd::Return => {
                self.state.patrol_index = 0;
                self.set_mode(Mode::Returning);
            }
            PatrolEnd::Complete => self.finish_mission(),
            PatrolEnd::Halt => {
                self.state.patrol_index = 0;
                self.set_mode(Mode::Idle);
            }
        }
    }

    fn investigate_step(&mut self, targets: &TargetRegistry, dt: f32) {
        let Some(target) = self.target.and_then(|t| targets.position(t)) else {
            info!(agent = %self.id, "investigation target lost, resuming patrol");
            self.resume_patrol_nearest();
            return;
        };
        let tracking = &self.config.tracking;
        self.orbit_angle = (self.orbit_angle + tracking.orbit_speed * dt).rem_euclid(360.0);
        let theta = self.orbit_angle.to_radians();
        let desired = target
            + Vec3::new(tracking.distance * theta.cos(), tracking.height, tracking.distance * theta.sin());

        let mut next = self.state.position.lerp(desired, (self.config.speed * dt).min(1.0));
        if !self.profile.is_aerial() {
            next.y = self.config.height;
        }
        self.state.position = next;
        if let Some(facing) = Orientation::facing(target - next) {
            self.state.orientation = facing;
        }
    }

    fn intercept_step(&mut self, targets: &TargetRegistry, dt: f32) {
        let Some((id, target)) = self.target.and_then(|t| targets.position(t).map(|p| (t, p))) else {
            return;
        };
        self.step_towards(target.with_y(self.config.height), self.config.intercept_speed, dt);
        if let Some(facing) = Orientation::facing((target - self.state.position).with_y(0.0)) {
            self.state.orientation = facing;
        }

        if self.state.position.ground_distance(target) < self.config.intercept_distance {
            if self.gate.is_open() {
                info!(agent = %self.id, target = %id, "target caught");
                self.outcomes.push(AgentOutcome::Caught(id));
                self.alert_active = false;
                self.resume_patrol_nearest();
            } else {
                debug!(agent = %self.id, target = %id, "in range, intercept gate closed");
            }
        }
    }

    fn returning_step(&mut self, dt: f32) {
        let Some(home) = self.config.home else {
            error!(agent = %self.id, "no home anchor configured, cannot return");
            return;
        };
        let Some(flight) = self.profile.flight.clone() else {
            let remaining = self.step_towards(home + self.spawn_offset, self.config.speed, dt);
            if remaining < self.config.arrival_epsilon {
                self.finish_mission();
            }
            return;
        };

        let position = self.state.position;
        if position.ground_distance(home) >= self.config.arrival_epsilon {
            self.step_towards(home.with_y(position.y), self.config.speed, dt);
            return;
        }

        let touchdown = home.y + flight.touchdown_clearance;
        if position.y > touchdown {
            self.state.position.y = (position.y - flight.landing_speed * dt).max(touchdown);
        }
        if self.state.position.y <= touchdown {
            self.state.position = home.with_y(home.y + flight.rest_clearance);
            self.state.orientation = self.state.orientation.level();
            info!(agent = %self.id, "landed");
            self.finish_mission();
        }
    }

    // ── Logging ───────────────────────────────────────────────────────────

    fn log_state(&self) {
        if !self.clock.frame.every(self.config.state_log_interval_frames) {
            return;
        }
        debug!(
            agent = %self.id,
            mode = %self.state.mode,
            index = self.state.patrol_index,
            position = %self.state.position,
            started = self.mission.started(),
            delay_elapsed = self.mission.start_delay_elapsed(),
            complete = self.mission.complete(),
            alert = self.alert_active,
            "agent state"
        );
        if self.alert_active && self.target.is_none() {
            warn!(agent = %self.id, "alert raised without a tracked target");
        }
    }
}
