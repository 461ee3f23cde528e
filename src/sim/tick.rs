//! Fixed timestep simulation tick
//!
//! Advances the scene deterministically, one tick per call: the shaker's
//! mode machine consumes this tick's pointer events, the pour flow is
//! computed (draining the shaker), then the glass consumes the flow.

use glam::Vec2;

use super::state::{ShakerMode, SimState};
use crate::consts::*;

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A pointer event observed since the previous tick
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    ButtonDown { pos: Vec2, button: PointerButton },
    ButtonUp { pos: Vec2, button: PointerButton },
    Moved { pos: Vec2 },
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events since the previous tick, in arrival order
    pub events: Vec<PointerEvent>,
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    match state.shaker.mode {
        ShakerMode::Shaking => update_shaking(state, input, dt),
        ShakerMode::Moving => update_moving(state, input),
        ShakerMode::Pouring => update_pouring(state, input),
    }

    let flow = {
        let tuning = &state.tuning;
        state.shaker.pour_flow(dt, tuning)
    };

    let time = state.time_secs();
    state
        .glass
        .update(dt, time, &flow, &state.tuning, &mut state.rng);

    state.time_ticks += 1;
}

/// Shaking phase: horizontal drags build shake energy; releasing with
/// enough energy advances to Moving, otherwise the shake must be redone
fn update_shaking(state: &mut SimState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let shaker = &mut state.shaker;

    shaker.shake_timer += dt;
    shaker.shake_power *= SHAKE_DECAY;
    if shaker.shake_power < SHAKE_EPSILON {
        shaker.shake_power = 0.0;
    }

    shaker.pos = shaker.base_pos;

    for event in &input.events {
        match *event {
            PointerEvent::ButtonDown {
                pos,
                button: PointerButton::Primary,
            } => {
                shaker.dragging = true;
                shaker.prev_x = Some(pos.x);
            }
            PointerEvent::ButtonUp {
                button: PointerButton::Primary,
                ..
            } => {
                shaker.dragging = false;
                shaker.prev_x = None;

                if shaker.shake_power >= tuning.shake_threshold {
                    shaker.mode = ShakerMode::Moving;
                    shaker.base_pos = shaker.pos;
                    shaker.angle = 0.0;
                } else {
                    // Not shaken hard enough; start over
                    shaker.shake_power = 0.0;
                }
            }
            PointerEvent::Moved { pos } if shaker.dragging => {
                if let Some(prev_x) = shaker.prev_x {
                    let dx = pos.x - prev_x;
                    shaker.pos.x = shaker.base_pos.x + dx;
                    shaker.shake_power += dx.abs() * tuning.shake_gain;
                    shaker.prev_x = Some(pos.x);
                }
            }
            _ => {}
        }
    }

    // Visual jitter scales with accumulated shake energy; once the release
    // advanced the mode, position and angle stay frozen
    if shaker.mode == ShakerMode::Shaking {
        shaker.pos.y += (shaker.shake_timer * 40.0).sin() * shaker.shake_power * tuning.shake_bob;
        shaker.angle = (shaker.shake_timer * 25.0).sin() * shaker.shake_power * 2.0;
    }
}

/// Moving phase: free repositioning while the drag is active; releasing
/// detaches the cap and starts the pour phase
fn update_moving(state: &mut SimState, input: &TickInput) {
    let shaker = &mut state.shaker;

    for event in &input.events {
        match *event {
            PointerEvent::ButtonDown {
                button: PointerButton::Primary,
                ..
            } => {
                shaker.dragging = true;
            }
            PointerEvent::ButtonUp {
                button: PointerButton::Primary,
                ..
            } => {
                shaker.dragging = false;
                shaker.mode = ShakerMode::Pouring;
                shaker.cap_on_top = false;
            }
            PointerEvent::Moved { pos } if shaker.dragging => {
                shaker.pos = pos;
            }
            _ => {}
        }
    }
}

/// Pouring phase: vertical drags tilt the shaker; the tilt is clamped
/// between full pour and slightly past upright
fn update_pouring(state: &mut SimState, input: &TickInput) {
    let tuning = &state.tuning;
    let shaker = &mut state.shaker;

    for event in &input.events {
        match *event {
            PointerEvent::ButtonDown {
                pos,
                button: PointerButton::Primary,
            } => {
                shaker.dragging = true;
                shaker.prev_y = Some(pos.y);
            }
            PointerEvent::ButtonUp {
                button: PointerButton::Primary,
                ..
            } => {
                shaker.dragging = false;
                shaker.prev_y = None;
            }
            PointerEvent::Moved { pos } if shaker.dragging => {
                if let Some(prev_y) = shaker.prev_y {
                    let dy = pos.y - prev_y;
                    shaker.angle =
                        (shaker.angle + dy * tuning.tilt_sensitivity).clamp(tuning.pour_max_angle, 30.0);
                    shaker.prev_y = Some(pos.y);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DropletKind, Tuning};

    fn new_state() -> SimState {
        SimState::new(1280.0, 720.0, 42, Tuning::default())
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::ButtonDown {
            pos: Vec2::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn up(x: f32, y: f32) -> PointerEvent {
        PointerEvent::ButtonUp {
            pos: Vec2::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Moved {
            pos: Vec2::new(x, y),
        }
    }

    fn input(events: Vec<PointerEvent>) -> TickInput {
        TickInput { events }
    }

    /// Drive one tick with the given events
    fn step(state: &mut SimState, events: Vec<PointerEvent>) {
        tick(state, &input(events), SIM_DT);
    }

    fn mode_rank(mode: ShakerMode) -> u8 {
        match mode {
            ShakerMode::Shaking => 0,
            ShakerMode::Moving => 1,
            ShakerMode::Pouring => 2,
        }
    }

    /// Shake hard enough to pass the threshold, then release
    fn shake_past_threshold(state: &mut SimState) {
        step(state, vec![down(400.0, 300.0)]);
        for i in 0..20 {
            let x = if i % 2 == 0 { 460.0 } else { 340.0 };
            step(state, vec![moved(x, 300.0)]);
        }
        step(state, vec![up(400.0, 300.0)]);
    }

    #[test]
    fn test_release_below_threshold_stays_shaking() {
        let mut state = new_state();
        // One small drag: |dx| * gain stays well under the threshold
        step(&mut state, vec![down(400.0, 300.0)]);
        step(&mut state, vec![moved(404.0, 300.0)]);
        step(&mut state, vec![up(404.0, 300.0)]);

        assert_eq!(state.shaker.mode, ShakerMode::Shaking);
        assert_eq!(state.shaker.shake_power, 0.0);
    }

    #[test]
    fn test_release_past_threshold_advances_to_moving() {
        let mut state = new_state();
        shake_past_threshold(&mut state);
        assert_eq!(state.shaker.mode, ShakerMode::Moving);
        assert_eq!(state.shaker.angle, 0.0);
    }

    #[test]
    fn test_moving_release_detaches_cap_and_starts_pour() {
        let mut state = new_state();
        shake_past_threshold(&mut state);
        assert!(state.shaker.cap_on_top);

        step(&mut state, vec![down(400.0, 300.0)]);
        step(&mut state, vec![moved(700.0, 250.0)]);
        step(&mut state, vec![up(700.0, 250.0)]);

        assert_eq!(state.shaker.mode, ShakerMode::Pouring);
        assert!(!state.shaker.cap_on_top);
        assert!((state.shaker.pos - Vec2::new(700.0, 250.0)).length() < 1e-4);
    }

    #[test]
    fn test_tilt_clamped_to_configured_range() {
        let mut state = new_state();
        state.shaker.mode = ShakerMode::Pouring;

        step(&mut state, vec![down(500.0, 300.0)]);
        // Enormous upward drag: clamped at the full-pour angle
        step(&mut state, vec![moved(500.0, -2000.0)]);
        assert_eq!(state.shaker.angle, state.tuning.pour_max_angle);

        // Enormous downward drag: clamped just past upright
        step(&mut state, vec![moved(500.0, 4000.0)]);
        assert_eq!(state.shaker.angle, 30.0);
    }

    #[test]
    fn test_full_pour_cycle_drains_exactly() {
        let mut state = new_state();
        state.shaker.mode = ShakerMode::Pouring;
        state.shaker.angle = state.tuning.pour_max_angle;

        let v0 = state.shaker.volume;
        let per_tick = state.tuning.pour_rate * SIM_DT; // factor == 1 at full tilt

        for n in 1..=30 {
            step(&mut state, vec![]);
            let expected = (v0 - n as f32 * per_tick).max(0.0);
            assert!((state.shaker.volume - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_volume_conserved_into_fill_on_contact() {
        let mut state = new_state();
        state.shaker.mode = ShakerMode::Pouring;
        state.shaker.angle = state.tuning.pour_max_angle;
        // At full tilt the mouth swings toward the glass; offset the body so
        // the mouth ends up over a wall
        state.shaker.pos = state.glass.rect.center() - Vec2::new(20.0, 200.0);
        assert!(
            crate::sim::collision::cast_pour_ray(state.shaker.mouth_pos(), &state.glass.tri)
                .is_some()
        );

        let v_before = state.shaker.volume;
        let fill_before = state.glass.fill_amount;
        step(&mut state, vec![]);
        let used = v_before - state.shaker.volume;

        assert!(used > 0.0);
        let expected = fill_before + used / state.tuning.glass_capacity;
        assert!((state.glass.fill_amount - expected).abs() < 1e-6);
        assert!(!state.glass.stream.is_empty());
    }

    #[test]
    fn test_missed_stream_leaves_fill_unchanged() {
        let mut state = new_state();
        state.shaker.mode = ShakerMode::Pouring;
        state.shaker.angle = state.tuning.pour_max_angle;
        // Far left of the glass: the pour ray cannot reach either wall
        state.shaker.pos = Vec2::new(100.0, 200.0);

        let fill_before = state.glass.fill_amount;
        step(&mut state, vec![]);

        assert_eq!(state.glass.fill_amount, fill_before);
        // The stream is still visible, falling past the glass
        assert!(!state.glass.stream.is_empty());
        let last = state.glass.stream.last().unwrap();
        assert!(last.y > state.glass.rect.bottom());
        // Shaker still drained; a miss wastes the liquid
        assert!(state.shaker.volume < state.tuning.shaker_volume);
    }

    #[test]
    fn test_pouring_into_full_glass_spills() {
        let mut state = new_state();
        state.shaker.mode = ShakerMode::Pouring;
        state.shaker.angle = state.tuning.pour_start_angle - 10.0;
        state.shaker.pos = state.glass.rect.center() - Vec2::new(0.0, 200.0);
        state.glass.fill_amount = 1.0;

        step(&mut state, vec![]);

        assert_eq!(state.glass.fill_amount, 1.0);
        assert!(
            state
                .glass
                .droplets
                .iter()
                .any(|d| d.kind == DropletKind::Spill)
        );
    }

    #[test]
    fn test_stream_cleared_when_not_pouring() {
        let mut state = new_state();
        state.shaker.mode = ShakerMode::Pouring;
        state.shaker.angle = state.tuning.pour_max_angle;
        state.shaker.pos = state.glass.rect.center() - Vec2::new(0.0, 200.0);
        step(&mut state, vec![]);
        assert!(!state.glass.stream.is_empty());

        // Tilt back upright: stream disappears next tick
        state.shaker.angle = 0.0;
        step(&mut state, vec![]);
        assert!(state.glass.stream.is_empty());
    }

    #[test]
    fn test_mode_order_across_full_interaction() {
        let mut state = new_state();
        let mut max_rank = mode_rank(state.shaker.mode);

        shake_past_threshold(&mut state);
        max_rank = max_rank.max(mode_rank(state.shaker.mode));
        assert!(mode_rank(state.shaker.mode) >= max_rank);

        step(&mut state, vec![down(400.0, 300.0)]);
        step(&mut state, vec![moved(700.0, 250.0)]);
        step(&mut state, vec![up(700.0, 250.0)]);
        assert!(mode_rank(state.shaker.mode) >= max_rank);

        // Pouring is terminal: no event sequence leaves it
        step(&mut state, vec![down(700.0, 250.0), moved(700.0, 100.0)]);
        step(&mut state, vec![up(700.0, 100.0)]);
        assert_eq!(state.shaker.mode, ShakerMode::Pouring);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// An arbitrary drag gesture: deltas applied while the button is
        /// held, walking the pointer around the screen
        fn drag_deltas() -> impl Strategy<Value = Vec<(f32, f32)>> {
            prop::collection::vec((-60.0f32..60.0, -60.0f32..60.0), 0..120)
        }

        proptest! {
            #[test]
            fn volume_monotone_and_invariants_hold(
                shake in drag_deltas(),
                carry in drag_deltas(),
                tilt in drag_deltas(),
            ) {
                let mut state = new_state();
                let mut pointer = Vec2::new(400.0, 300.0);
                let mut prev_volume = state.shaker.volume;
                let mut prev_rank = mode_rank(state.shaker.mode);

                let phases = [shake, carry, tilt];
                for deltas in &phases {
                    step(&mut state, vec![down(pointer.x, pointer.y)]);
                    for &(dx, dy) in deltas {
                        pointer += Vec2::new(dx, dy);
                        step(&mut state, vec![moved(pointer.x, pointer.y)]);

                        // Monotonic, floored volume
                        prop_assert!(state.shaker.volume <= prev_volume + 1e-6);
                        prop_assert!(state.shaker.volume >= 0.0);
                        prev_volume = state.shaker.volume;

                        // Fill bounds
                        prop_assert!((0.0..=1.0).contains(&state.glass.fill_amount));

                        // Modes never regress
                        let rank = mode_rank(state.shaker.mode);
                        prop_assert!(rank >= prev_rank);
                        prev_rank = rank;

                        // Pour gating
                        if state.shaker.volume == 0.0
                            || state.shaker.angle >= state.tuning.pour_start_angle
                        {
                            prop_assert!(!state.shaker.is_pouring_now(&state.tuning));
                        }

                        // Tilt stays clamped while pouring (shake jitter is
                        // intentionally unclamped)
                        if state.shaker.mode == ShakerMode::Pouring {
                            prop_assert!(state.shaker.angle >= state.tuning.pour_max_angle - 1e-4);
                            prop_assert!(state.shaker.angle <= 30.0 + 1e-4);
                        }
                    }
                    step(&mut state, vec![up(pointer.x, pointer.y)]);
                }
            }

            #[test]
            fn moving_requires_threshold_shake(deltas in drag_deltas()) {
                let mut state = new_state();
                let mut pointer = Vec2::new(400.0, 300.0);
                let gain = state.tuning.shake_gain;
                let mut accumulated = 0.0f32;

                step(&mut state, vec![down(pointer.x, pointer.y)]);
                for &(dx, _) in &deltas {
                    pointer.x += dx;
                    step(&mut state, vec![moved(pointer.x, pointer.y)]);
                    accumulated += dx.abs() * gain;
                }
                step(&mut state, vec![up(pointer.x, pointer.y)]);

                // Decay only lowers energy, so never reaching the threshold
                // even undecayed means the mode cannot have advanced
                if accumulated < state.tuning.shake_threshold {
                    prop_assert_eq!(state.shaker.mode, ShakerMode::Shaking);
                    prop_assert_eq!(state.shaker.shake_power, 0.0);
                }
            }
        }
    }
}
