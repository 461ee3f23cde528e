//! Simulation state and core entity types
//!
//! `Shaker` owns its kinematic state exclusively; `Glass` owns fill state
//! and all derived geometry. The two only communicate through the per-tick
//! `PourFlow` contract.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{WallSide, cast_pour_ray};
use super::stream;
use super::wall::{InnerTriangle, Rect, WallSlab, wall_slabs};
use crate::consts::*;
use crate::rotate_deg;

/// Maximum decorative droplets; the oldest are recycled past this
pub const MAX_DROPLETS: usize = 256;

/// The configuration surface consumed (never computed) by the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Shake energy required to advance from Shaking to Moving
    pub shake_threshold: f32,
    /// Shake energy gained per pixel of horizontal drag
    pub shake_gain: f32,
    /// Vertical bob amplitude per unit of shake energy
    pub shake_bob: f32,
    /// Degrees of tilt per pixel of vertical drag while pouring
    pub tilt_sensitivity: f32,
    /// Tilt (degrees, negative) at which liquid starts leaving the shaker
    pub pour_start_angle: f32,
    /// Tilt (degrees, negative) at full flow; also the tilt clamp floor
    pub pour_max_angle: f32,
    /// Volume the shaker holds when full
    pub shaker_volume: f32,
    /// Volume drained per second at full tilt
    pub pour_rate: f32,
    /// Volume the glass holds when fill_amount reaches 1
    pub glass_capacity: f32,
    /// Wall slab thickness (px)
    pub wall_thickness: f32,
    /// Stream stroke width at zero flow (px)
    pub stream_base_width: f32,
    /// Additional stroke width at full flow (px)
    pub stream_extra_width: f32,
    /// Horizontal stream wiggle amplitude at full flow (px)
    pub wiggle_amplitude: f32,
    /// Stream wiggle phase advance (radians/s)
    pub wiggle_frequency: f32,
    /// Liquid surface bulge at empty fill (px)
    pub surface_bulge: f32,
    /// Pour factor at or above which impact droplets splash instead of spill
    pub splash_factor: f32,
    /// Impact speed (px/s) above which a falling droplet splashes
    pub splash_speed: f32,
    /// Spill droplet slide rate along the wall (fraction of wall length/s)
    pub spill_slide_rate: f32,
    /// Samples per stream stage
    pub stream_samples: usize,
    /// Samples per liquid surface curve
    pub surface_samples: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shake_threshold: 1.0,
            shake_gain: 0.06,
            shake_bob: 0.5,
            tilt_sensitivity: 0.4,
            pour_start_angle: -30.0,
            pour_max_angle: -110.0,
            shaker_volume: 4.0,
            pour_rate: 1.5,
            glass_capacity: 4.0,
            wall_thickness: 8.0,
            stream_base_width: 2.0,
            stream_extra_width: 3.0,
            wiggle_amplitude: 3.5,
            wiggle_frequency: 9.0,
            surface_bulge: 6.0,
            splash_factor: 0.65,
            splash_speed: 270.0,
            spill_slide_rate: 1.2,
            stream_samples: 12,
            surface_samples: 12,
        }
    }
}

/// Current phase of the shaker interaction
///
/// Transitions are one-directional: Shaking → Moving → Pouring. Pouring is
/// terminal; there is no reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShakerMode {
    /// Building shake energy with horizontal drags
    Shaking,
    /// Carrying the shaker over the glass
    Moving,
    /// Tilting to pour
    Pouring,
}

/// Per-tick pour contract from Shaker to Glass
#[derive(Debug, Clone, Copy)]
pub struct PourFlow {
    /// Liquid is actually leaving the shaker this tick
    pub pouring: bool,
    /// World-space pour origin (the shaker opening)
    pub mouth: Vec2,
    /// Normalized tilt past the pour-start angle, in [0, 1]
    pub factor: f32,
    /// Volume that left the shaker this tick
    pub used: f32,
}

/// The cocktail shaker
#[derive(Debug, Clone)]
pub struct Shaker {
    /// Anchor position; jitter and drags are applied relative to this
    pub base_pos: Vec2,
    pub pos: Vec2,
    /// Degrees; 0 = upright, negative = tilted toward the pour
    pub angle: f32,
    pub shake_power: f32,
    pub shake_timer: f32,
    pub mode: ShakerMode,
    /// Remaining liquid; monotonically non-increasing, floored at 0
    pub volume: f32,
    /// Cap renders on the body until the pour phase detaches it
    pub cap_on_top: bool,
    /// Where the detached cap rests
    pub cap_side_pos: Vec2,
    /// Cap center relative to body center while capped
    pub cap_offset: Vec2,
    /// Pour opening relative to body center
    mouth_offset: Vec2,
    // Drag tracking
    pub(super) dragging: bool,
    pub(super) prev_x: Option<f32>,
    pub(super) prev_y: Option<f32>,
}

impl Shaker {
    pub fn new(screen_w: f32, screen_h: f32, tuning: &Tuning) -> Self {
        let base_pos = Vec2::new(screen_w * 0.30, screen_h * 0.55);
        let (_, body_h) = SHAKER_BODY_SIZE;
        let (_, cap_h) = SHAKER_CAP_SIZE;

        Self {
            base_pos,
            pos: base_pos,
            angle: 0.0,
            shake_power: 0.0,
            shake_timer: 0.0,
            mode: ShakerMode::Shaking,
            volume: tuning.shaker_volume,
            cap_on_top: true,
            cap_side_pos: Vec2::new(screen_w * 0.45, base_pos.y - body_h * 0.3),
            cap_offset: Vec2::new(0.0, -body_h * 0.5 - cap_h * 0.3),
            mouth_offset: Vec2::new(0.0, -body_h * 0.5 + 12.0),
            dragging: false,
            prev_x: None,
            prev_y: None,
        }
    }

    /// World-space position of the shaker opening for the current tilt
    pub fn mouth_pos(&self) -> Vec2 {
        self.pos + rotate_deg(self.mouth_offset, -self.angle)
    }

    /// Liquid leaves the shaker only while tilted past the start angle with
    /// volume remaining; an empty shaker never pours again
    pub fn is_pouring_now(&self, tuning: &Tuning) -> bool {
        self.mode == ShakerMode::Pouring && self.volume > 0.0 && self.angle < tuning.pour_start_angle
    }

    /// Normalized tilt past the pour-start angle: 0 at the start angle,
    /// 1 at full tilt
    pub fn pour_factor(&self, tuning: &Tuning) -> f32 {
        if !self.is_pouring_now(tuning) {
            return 0.0;
        }
        let over = (self.angle.abs() - tuning.pour_start_angle.abs())
            / (tuning.pour_max_angle.abs() - tuning.pour_start_angle.abs());
        over.clamp(0.0, 1.0)
    }

    /// Drain volume for this tick and produce the Glass-facing contract
    pub fn pour_flow(&mut self, dt: f32, tuning: &Tuning) -> PourFlow {
        let pouring = self.is_pouring_now(tuning);
        let factor = self.pour_factor(tuning);
        let mouth = self.mouth_pos();

        let used = if pouring && factor > 0.0 {
            let desired = factor * tuning.pour_rate * dt;
            let used = desired.min(self.volume);
            self.volume = (self.volume - used).max(0.0);
            used
        } else {
            0.0
        };

        PourFlow {
            pouring,
            mouth,
            factor,
            used,
        }
    }
}

/// What a decorative droplet represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletKind {
    /// Low-energy contact, liquid running down the outside of the glass
    Spill,
    /// High-energy contact, liquid rebounding outward before falling
    Splash,
}

/// How a droplet currently moves
#[derive(Debug, Clone, Copy)]
pub enum DropletState {
    /// Free fall under gravity
    Falling,
    /// Pinned to a wall; position locked to lerp(wall_top, wall_bottom, t)
    Sliding { side: WallSide, t: f32 },
}

/// A single decorative liquid droplet
#[derive(Debug, Clone)]
pub struct Droplet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: DropletKind,
    pub state: DropletState,
}

/// The glass receiving the pour
#[derive(Debug, Clone)]
pub struct Glass {
    /// Sprite placement rect
    pub rect: Rect,
    /// Interior liquid region, fixed for the glass's lifetime
    pub tri: InnerTriangle,
    pub left_wall: WallSlab,
    pub right_wall: WallSlab,
    /// Normalized fill in [0, 1]; never decreased by the simulation
    pub fill_amount: f32,
    /// This tick's visible pour stream, rebuilt every tick
    pub stream: Vec<Vec2>,
    /// Suggested stroke width for the stream
    pub stream_width: f32,
    pub droplets: Vec<Droplet>,
}

impl Glass {
    pub fn new(rect: Rect, tuning: &Tuning) -> Self {
        let tri = InnerTriangle::from_rect(&rect);
        let (left_wall, right_wall) = wall_slabs(&tri, tuning.wall_thickness);

        Self {
            rect,
            tri,
            left_wall,
            right_wall,
            fill_amount: 0.0,
            stream: Vec::new(),
            stream_width: 0.0,
            droplets: Vec::new(),
        }
    }

    pub fn wall(&self, side: WallSide) -> &WallSlab {
        match side {
            WallSide::Left => &self.left_wall,
            WallSide::Right => &self.right_wall,
        }
    }

    /// Consume this tick's pour flow: rebuild the stream, update fill, emit
    /// impact droplets, then advance the droplet population
    pub fn update(
        &mut self,
        dt: f32,
        time: f32,
        flow: &PourFlow,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) {
        self.stream.clear();
        self.stream_width =
            stream::stream_width(flow.factor, tuning.stream_base_width, tuning.stream_extra_width);

        if flow.pouring {
            match cast_pour_ray(flow.mouth, &self.tri) {
                Some(hit) => {
                    self.build_contact_stream(flow, hit.point, hit.side, time, tuning);
                    self.apply_fill(flow, hit.point, hit.side, tuning, rng);
                    self.emit_impact_droplets(flow, hit.point, hit.side, tuning, rng);
                }
                None => {
                    // Pour misses the glass entirely: visible stream, no fill
                    let end_y = self.rect.bottom() + DROPLET_CUTOFF * 0.5;
                    self.stream = stream::falling_stream(
                        flow.mouth,
                        end_y,
                        time,
                        flow.factor,
                        tuning.wiggle_amplitude,
                        tuning.wiggle_frequency,
                        tuning.stream_samples,
                    );
                }
            }
        }

        self.update_droplets(dt, tuning, rng);
    }

    /// Two-stage polyline: mouth down to the contact point, then along the
    /// wall to the current liquid surface
    fn build_contact_stream(
        &mut self,
        flow: &PourFlow,
        contact: Vec2,
        side: WallSide,
        time: f32,
        tuning: &Tuning,
    ) {
        self.stream = stream::falling_stream(
            flow.mouth,
            contact.y,
            time,
            flow.factor,
            tuning.wiggle_amplitude,
            tuning.wiggle_frequency,
            tuning.stream_samples,
        );

        let surface = match side {
            WallSide::Left => self.tri.left_surface_point(self.fill_amount.clamp(0.0, 1.0)),
            WallSide::Right => self.tri.right_surface_point(self.fill_amount.clamp(0.0, 1.0)),
        };
        let slide = stream::sliding_stream(
            contact,
            surface,
            self.wall(side).normal(),
            time,
            flow.factor,
            tuning.wiggle_amplitude,
            tuning.wiggle_frequency,
            tuning.stream_samples,
        );
        // First slide point duplicates the contact point
        self.stream.extend(slide.into_iter().skip(1));
    }

    /// The glass fills by exactly the volume that left the shaker; pouring
    /// into a full glass overflows down the outside instead
    fn apply_fill(
        &mut self,
        flow: &PourFlow,
        contact: Vec2,
        side: WallSide,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) {
        if flow.used <= 0.0 {
            return;
        }
        if self.fill_amount >= 1.0 {
            self.spawn_spill(contact, side, rng);
        } else {
            self.fill_amount = (self.fill_amount + flow.used / tuning.glass_capacity).min(1.0);
        }
    }

    /// Impact droplets at the stream contact: a hard pour splashes, a
    /// gentle one runs down the outside
    fn emit_impact_droplets(
        &mut self,
        flow: &PourFlow,
        contact: Vec2,
        side: WallSide,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) {
        if flow.used <= 0.0 {
            return;
        }
        let count = 1 + (2.0 * flow.factor) as usize;
        for _ in 0..count {
            if flow.factor >= tuning.splash_factor {
                self.spawn_splash(contact, side, rng);
            } else {
                self.spawn_spill(contact, side, rng);
            }
        }
    }

    fn push_droplet(&mut self, droplet: Droplet) {
        if self.droplets.len() >= MAX_DROPLETS {
            self.droplets.remove(0);
        }
        self.droplets.push(droplet);
    }

    fn spawn_splash(&mut self, at: Vec2, side: WallSide, rng: &mut Pcg32) {
        let outward = match side {
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        };
        self.push_droplet(Droplet {
            pos: at,
            vel: Vec2::new(
                outward * rng.random_range(30.0..120.0),
                -rng.random_range(120.0..240.0),
            ),
            kind: DropletKind::Splash,
            state: DropletState::Falling,
        });
    }

    fn spawn_spill(&mut self, at: Vec2, side: WallSide, rng: &mut Pcg32) {
        let wall = self.wall(side);
        let t = (wall.project_t(at) + rng.random_range(0.0..0.05)).min(1.0);
        let pos = wall.point_at(t);
        self.push_droplet(Droplet {
            pos,
            vel: Vec2::ZERO,
            kind: DropletKind::Spill,
            state: DropletState::Sliding { side, t },
        });
    }

    /// Integrate, classify and age out droplets. Snapshot-then-rebuild so
    /// removal never happens during iteration.
    fn update_droplets(&mut self, dt: f32, tuning: &Tuning, rng: &mut Pcg32) {
        let cutoff = self.rect.bottom() + DROPLET_CUTOFF;
        let mut respawn_spills: Vec<(Vec2, WallSide)> = Vec::new();

        let snapshot = std::mem::take(&mut self.droplets);
        for mut d in snapshot {
            match d.state {
                DropletState::Falling => {
                    d.vel.y += DROPLET_GRAVITY * dt;
                    d.pos += d.vel * dt;

                    if d.pos.y > cutoff {
                        continue; // Missed everything, fell off-screen
                    }

                    // Interior takes priority over a wall hit
                    if self.tri.contains(d.pos) {
                        if self.fill_amount >= 1.0 {
                            // Full glass: overflow down the nearest wall
                            let side = if d.pos.x < self.tri.bottom.x {
                                WallSide::Left
                            } else {
                                WallSide::Right
                            };
                            respawn_spills.push((d.pos, side));
                        }
                        continue; // Absorbed into the pool
                    }

                    let side_hit = if self.left_wall.contains(d.pos) {
                        Some(WallSide::Left)
                    } else if self.right_wall.contains(d.pos) {
                        Some(WallSide::Right)
                    } else {
                        None
                    };

                    if let Some(side) = side_hit {
                        let outward = match side {
                            WallSide::Left => -1.0,
                            WallSide::Right => 1.0,
                        };
                        if d.vel.length() > tuning.splash_speed {
                            // Hard impact: rebound upward and outward
                            d.kind = DropletKind::Splash;
                            d.vel = Vec2::new(
                                outward * rng.random_range(30.0..120.0),
                                -rng.random_range(120.0..240.0),
                            );
                        } else {
                            // Gentle impact: cling to the wall and run down
                            d.kind = DropletKind::Spill;
                            let wall = self.wall(side);
                            let t = wall.project_t(d.pos);
                            d.pos = wall.point_at(t);
                            d.vel = Vec2::ZERO;
                            d.state = DropletState::Sliding { side, t };
                        }
                    }

                    self.droplets.push(d);
                }
                DropletState::Sliding { side, t } => {
                    let t = t + tuning.spill_slide_rate * dt;
                    if t >= 1.0 {
                        // Reached the bottom of the wall: detach and fall
                        let outward = match side {
                            WallSide::Left => -1.0,
                            WallSide::Right => 1.0,
                        };
                        d.pos = self.wall(side).point_at(1.0);
                        d.vel = Vec2::new(
                            outward * rng.random_range(6.0..24.0),
                            rng.random_range(30.0..60.0),
                        );
                        d.state = DropletState::Falling;
                    } else {
                        d.pos = self.wall(side).point_at(t);
                        d.state = DropletState::Sliding { side, t };
                    }
                    self.droplets.push(d);
                }
            }
        }

        for (pos, side) in respawn_spills {
            self.spawn_spill(pos, side, rng);
        }
    }
}

/// Complete simulation state for one shake-and-pour scene
#[derive(Debug, Clone)]
pub struct SimState {
    pub tuning: Tuning,
    /// Screen size the scene was laid out for
    pub screen: Vec2,
    pub shaker: Shaker,
    pub glass: Glass,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seed for droplet jitter, kept for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl SimState {
    /// Lay out the scene for the given screen size: shaker at the left,
    /// glass mid-bottom aligned with the shaker's resting bottom edge
    pub fn new(screen_w: f32, screen_h: f32, seed: u64, tuning: Tuning) -> Self {
        let shaker = Shaker::new(screen_w, screen_h, &tuning);
        let (_, body_h) = SHAKER_BODY_SIZE;
        let baseline_y = screen_h * 0.55 + body_h * 0.5;
        let (glass_w, glass_h) = GLASS_SIZE;
        let glass_rect =
            Rect::from_midbottom(Vec2::new(screen_w * 0.72, baseline_y), glass_w, glass_h);
        let glass = Glass::new(glass_rect, &tuning);

        Self {
            tuning,
            screen: Vec2::new(screen_w, screen_h),
            shaker,
            glass,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Elapsed simulation time in seconds
    pub fn time_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }
}
