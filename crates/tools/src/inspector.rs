use blockrange_kernel::SimState;
use glam::Vec3;

/// Read-only queries against simulation state for overlays and the CLI.
pub struct StateInspector;

impl StateInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(state: &SimState) -> StateSummary {
        StateSummary {
            tick: state.tick,
            player_position: state.player.position,
            velocity_y: state.player.velocity_y,
            grounded: state.player.grounded,
            yaw_degrees: state.camera.yaw.to_degrees(),
            pitch_degrees: state.camera.pitch.to_degrees(),
            gun_held: state.gun.held,
            projectile_count: state.projectiles.len(),
            nearest_projectile: Self::nearest_projectile(state),
        }
    }

    /// Distance from the player to the nearest projectile, if any.
    pub fn nearest_projectile(state: &SimState) -> Option<f32> {
        let player = state.player.position;
        state
            .projectiles
            .iter()
            .map(|p| p.position.distance(player))
            .min_by(f32::total_cmp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateSummary {
    pub tick: u64,
    pub player_position: Vec3,
    pub velocity_y: f32,
    pub grounded: bool,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub gun_held: bool,
    pub projectile_count: usize,
    /// Distance from the player to the closest projectile.
    pub nearest_projectile: Option<f32>,
}

impl std::fmt::Display for StateSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.player_position;
        let nearest = match self.nearest_projectile {
            Some(d) => format!("{d:.2}"),
            None => "-".to_string(),
        };
        write!(
            f,
            "tick={} pos=({:.2}, {:.2}, {:.2}) vy={:.3} grounded={} yaw={:.1} pitch={:.1} gun={} projectiles={} nearest={}",
            self.tick,
            p.x,
            p.y,
            p.z,
            self.velocity_y,
            self.grounded,
            self.yaw_degrees,
            self.pitch_degrees,
            if self.gun_held { "held" } else { "dropped" },
            self.projectile_count,
            nearest
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockrange_kernel::FrameSimulator;

    #[test]
    fn summary_initial_state() {
        let state = FrameSimulator::default().initial_state();
        let summary = StateInspector::summary(&state);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.player_position, Vec3::new(0.0, 1.0, 0.0));
        assert!(summary.gun_held);
        assert_eq!(summary.projectile_count, 0);
    }

    #[test]
    fn summary_display() {
        let state = FrameSimulator::default().initial_state();
        let s = StateInspector::summary(&state).to_string();
        assert!(s.contains("tick=0"));
        assert!(s.contains("gun=held"));
        assert!(s.contains("projectiles=0 nearest=-"));
    }

    #[test]
    fn nearest_projectile_distance() {
        let mut state = FrameSimulator::default().initial_state();
        assert_eq!(StateInspector::nearest_projectile(&state), None);

        state.spawn_projectile(Vec3::new(0.0, 1.0, 10.0), Vec3::Z);
        state.spawn_projectile(Vec3::new(3.0, 1.0, 0.0), Vec3::X);
        assert_eq!(StateInspector::nearest_projectile(&state), Some(3.0));

        let summary = StateInspector::summary(&state);
        assert_eq!(summary.nearest_projectile, Some(3.0));
        assert!(summary.to_string().ends_with("projectiles=2 nearest=3.00"));
    }
}
