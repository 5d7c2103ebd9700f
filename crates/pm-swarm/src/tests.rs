//! Unit tests for pm-swarm.

use pm_agent::{AgentBuilder, AgentEvent, AgentProfile, Roster, TargetRegistry};
use pm_core::{AgentConfig, AgentId, TargetId, Vec3};
use pm_patrol::PatrolRoute;

use crate::{SwarmChange, SwarmCoordinator};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn guard_roster() -> (Roster, AgentId) {
    let mut roster = Roster::new();
    let cfg = AgentConfig { start_delay_secs: 0.0, ..AgentConfig::guard(Vec3::new(-5.0, 0.0, 0.0)) };
    let route = PatrolRoute::new(vec![Vec3::new(0.0, 4.9, 0.0), Vec3::new(0.0, 4.9, 10.0)]);
    let main = roster.add(
        AgentBuilder::new(AgentProfile::guard(), cfg)
            .route(route)
            .position(Vec3::new(1.0, 4.9, 1.0)),
    );
    (roster, main)
}

fn raise(roster: &mut Roster, main: AgentId, targets: &TargetRegistry, target: TargetId) {
    let agent = roster.get_mut(main).unwrap();
    agent.handle_event(AgentEvent::StartMission, targets);
    assert!(agent.handle_event(AgentEvent::RaiseAlert { target }, targets));
}

// ── Ring ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ring_tests {
    use crate::ring_offsets;

    #[test]
    fn four_point_ring() {
        let ring = ring_offsets(4, 2.0);
        let expected = [(2.0, 0.0), (0.0, 2.0), (-2.0, 0.0), (0.0, -2.0)];
        for (o, (x, z)) in ring.iter().zip(expected) {
            assert!((o.x - x).abs() < 1e-5 && (o.z - z).abs() < 1e-5, "got {o}");
            assert_eq!(o.y, 0.0);
        }
    }

    #[test]
    fn every_offset_on_radius() {
        let ring = ring_offsets(10, 2.0);
        assert_eq!(ring.len(), 10);
        assert!(ring.iter().all(|o| (o.length() - 2.0).abs() < 1e-5));
        assert!(ring_offsets(0, 2.0).is_empty());
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction_tests {
    use super::*;
    use crate::SwarmError;

    #[test]
    fn missing_main_rejected() {
        let mut roster = Roster::new();
        assert!(matches!(
            SwarmCoordinator::new(AgentId(4), &mut roster),
            Err(SwarmError::MainNotFound(AgentId(4)))
        ));
    }

    #[test]
    fn non_leader_rejected() {
        let mut roster = Roster::new();
        let id = roster.add(AgentBuilder::new(AgentProfile::patroller(), AgentConfig::patroller()));
        assert!(matches!(SwarmCoordinator::new(id, &mut roster), Err(SwarmError::NotSwarmCapable(_))));
    }

    #[test]
    fn starts_closed_and_empty() {
        let (mut roster, main) = guard_roster();
        let mut swarm = SwarmCoordinator::new(main, &mut roster).unwrap();
        assert!(!swarm.gate_open());
        assert!(swarm.followers().is_empty());
        assert_eq!(swarm.step(&mut roster), None);
        assert_eq!(swarm.config().followers, 10);
    }
}

// ── Alert edges ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod edge_tests {
    use super::*;
    use pm_agent::{Mode, Role};

    #[test]
    fn rising_edge_spawns_ring_and_opens_gate() {
        let (mut roster, main) = guard_roster();
        let mut targets = TargetRegistry::new();
        let t = targets.spawn(Vec3::new(30.0, 0.0, 30.0));
        let mut swarm = SwarmCoordinator::new(main, &mut roster).unwrap();
        raise(&mut roster, main, &targets, t);

        let Some(SwarmChange::Spawned(ids)) = swarm.step(&mut roster) else {
            panic!("expected a spawn");
        };
        assert_eq!(ids.len(), 10);
        assert_eq!(roster.len(), 11);
        assert!(swarm.gate_open());

        let main_pos = roster.get(main).unwrap().position();
        for &id in &ids {
            let f = roster.get(id).unwrap();
            assert_eq!(f.role(), Role::Follower);
            assert_eq!(f.state().mode, Mode::Patrol);
            assert!(f.alert_active());
            assert_eq!(f.target(), Some(t));
            assert!((f.position().ground_distance(main_pos) - 2.0).abs() < 1e-4);
            assert_eq!(f.position().y, 4.9);
            assert!(swarm.is_member(id));
        }

        // Level alert does not spawn twice.
        assert_eq!(swarm.step(&mut roster), None);
        assert_eq!(roster.len(), 11);
    }

    #[test]
    fn falling_edge_despawns_and_closes_gate() {
        let (mut roster, main) = guard_roster();
        let mut targets = TargetRegistry::new();
        let t = targets.spawn(Vec3::new(30.0, 0.0, 30.0));
        let mut swarm = SwarmCoordinator::new(main, &mut roster).unwrap();
        raise(&mut roster, main, &targets, t);
        swarm.step(&mut roster);

        roster.get_mut(main).unwrap().handle_event(AgentEvent::ClearAlert, &targets);
        let change = swarm.step(&mut roster);
        assert!(matches!(change, Some(SwarmChange::Despawned(ref ids)) if ids.len() == 10));
        assert!(swarm.followers().is_empty());
        assert!(!swarm.gate_open());
        assert_eq!(roster.ids(), vec![main]);

        // A later alert spawns a fresh ring with new ids.
        raise(&mut roster, main, &targets, t);
        let Some(SwarmChange::Spawned(ids)) = swarm.step(&mut roster) else {
            panic!("expected a respawn");
        };
        assert!(ids.iter().all(|&id| id > AgentId(10)));
    }

    #[test]
    fn lost_main_takes_followers_with_it() {
        let (mut roster, main) = guard_roster();
        let mut targets = TargetRegistry::new();
        let t = targets.spawn(Vec3::ZERO);
        let mut swarm = SwarmCoordinator::new(main, &mut roster).unwrap();
        raise(&mut roster, main, &targets, t);
        swarm.step(&mut roster);

        roster.remove(main);
        assert!(matches!(swarm.step(&mut roster), Some(SwarmChange::Despawned(_))));
        assert!(roster.is_empty());
        assert!(!swarm.gate_open());
    }
}

// ── Catch ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catch_tests {
    use super::*;

    #[test]
    fn cleanup_clears_everyone_then_despawns() {
        let (mut roster, main) = guard_roster();
        let mut targets = TargetRegistry::new();
        let t = targets.spawn(Vec3::new(30.0, 0.0, 30.0));
        let mut swarm = SwarmCoordinator::new(main, &mut roster).unwrap();
        raise(&mut roster, main, &targets, t);
        swarm.step(&mut roster);
        let followers = swarm.followers().to_vec();

        swarm.cleanup_after_catch(&mut roster, &mut targets, t);
        assert!(!targets.contains(t));
        assert!(!swarm.gate_open());
        assert!(!roster.get(main).unwrap().alert_active());
        assert!(followers.iter().all(|&id| !roster.get(id).unwrap().alert_active()));

        assert!(matches!(swarm.step(&mut roster), Some(SwarmChange::Despawned(_))));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn follower_gate_handles_track_the_coordinator() {
        let (mut roster, main) = guard_roster();
        let mut targets = TargetRegistry::new();
        // Target right next to the ring.
        let t = targets.spawn(Vec3::new(3.0, 0.0, 1.0));
        let mut swarm = SwarmCoordinator::new(main, &mut roster).unwrap();
        raise(&mut roster, main, &targets, t);
        swarm.step(&mut roster);

        let ctx = pm_agent::TickContext { dt: 0.1, targets: &targets };
        let first = swarm.followers()[0];
        let outcomes = roster.get_mut(first).unwrap().tick(&ctx);
        assert!(outcomes.iter().any(|o| matches!(o, pm_agent::AgentOutcome::Caught(id) if *id == t)));
    }
}
