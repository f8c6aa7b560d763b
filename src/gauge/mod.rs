/*
Pip Gauge - by David Petnick
*/
use bevy::prelude::*;

pub mod config;
pub mod layout;
pub mod math;
pub mod pool;
mod systems;

pub use config::{BaseConfig, EndCapConfig, GaugeConfig, GaugeMode, PipConfig, PipCounts};
pub use layout::{Anchor, ElementState, GaugeLayout, SpriteLayout, compute_layout, visible_count};
pub use pool::{ElementSpawner, PipPool, Reconcile};

/// Runtime Inputs for One Gauge
/// Once the Gauge is Set Up These are the Only Things Gameplay Code Touches
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(GaugeConfig, Transform, Visibility)]
pub struct PipGauge {
    /// 0..=100, How Far Along the Gauge Reads
    pub distance: f32,
    /// Degrees 0..=360, Ignored When 'angle_based_on_distance' is Set
    pub angle: f32,
}

impl Default for PipGauge {
    fn default() -> Self {
        Self {
            distance: 0.0,
            angle: 180.0,
        }
    }
}

impl PipGauge {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            ..default()
        }
    }
}

/// Background Sprite, Child of the Gauge Root
#[derive(Component, Debug)]
pub struct GaugeBase;

/// Pip Sprite at Strip Index
#[derive(Component, Debug, Clone, Copy)]
pub struct GaugePip(pub usize);

/// Mirrored Pip Paired With 'GaugePip' of the Same Index
#[derive(Component, Debug, Clone, Copy)]
pub struct GaugeMirror(pub usize);

#[derive(Component, Debug)]
pub struct GaugeEndCap;

/// Spawned Parts + Bookkeeping, Inserted on the Root Once Parts Exist
#[derive(Component, Debug)]
pub struct GaugeParts {
    pub base: Entity,
    pub end_cap: Entity,
    pub pool: PipPool<Entity>,
    pub anchor: Anchor,
    /// Clamped Counts From the Previous Frame
    counts: Option<PipCounts>,
}

pub struct PipGaugePlugin;

impl Plugin for PipGaugePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                systems::spawn_gauge_parts,
                systems::update_gauges,
            )
                .chain(),
        )
        .add_systems(PostUpdate, systems::release_removed_gauges);
    }
}
