/*
Pip Gauge - by David Petnick
*/
use bevy::prelude::*;

use super::config::PipCounts;
use super::layout::{self, Anchor, ElementState};
use super::pool::{ElementSpawner, PipPool, Reconcile};
use super::{GaugeBase, GaugeConfig, GaugeEndCap, GaugeMirror, GaugeParts, GaugePip, PipGauge};

// Local Z so Pips Draw Over the Base and the Cap Over Both
const BASE_Z: f32 = 0.0;
const PIP_Z: f32 = 0.1;
const END_CAP_Z: f32 = 0.2;

type SpriteQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Transform, &'static mut Sprite, &'static mut Visibility),
    Without<PipGauge>,
>;

/// Spawns Hidden Pip / Mirror Sprites Under the Base
struct SpriteSpawner<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    parent: Entity,
    image: Handle<Image>,
}

impl SpriteSpawner<'_, '_, '_> {
    fn spawn_hidden(&mut self, name: String, marker: impl Bundle) -> Entity {
        self.commands
            .spawn((
                Name::new(name),
                marker,
                Sprite::from_image(self.image.clone()),
                Transform::from_xyz(0.0, 0.0, PIP_Z),
                Visibility::Hidden,
                ChildOf(self.parent),
            ))
            .id()
    }
}

impl ElementSpawner<Entity> for SpriteSpawner<'_, '_, '_> {
    fn spawn_pip(&mut self, index: usize) -> Entity {
        self.spawn_hidden(format!("gauge_pip_{index}"), GaugePip(index))
    }

    fn spawn_mirror(&mut self, index: usize) -> Entity {
        self.spawn_hidden(format!("gauge_mirror_{index}"), GaugeMirror(index))
    }

    fn release(&mut self, element: Entity) {
        self.commands.entity(element).try_despawn();
    }
}

/// Clamp on a Copy, Write Back Only When a Count Actually Moved
/// Keeps 'Changed<GaugeConfig>' Quiet for In-Range Configs
fn clamp_config_counts(config: &mut Mut<GaugeConfig>, previous: Option<PipCounts>) -> PipCounts {
    let mut pips = config.pips.clone();
    let counts = pips.clamp_counts(previous);
    if pips != config.pips {
        config.pips = pips;
    }
    counts
}

/// Build Base, End Cap and the Initial Pip Pool for New Gauges
pub(super) fn spawn_gauge_parts(
    mut commands: Commands,
    mut q_new: Query<(Entity, &PipGauge, &mut GaugeConfig), Added<PipGauge>>,
) {
    for (root, gauge, mut config) in &mut q_new {
        let counts = clamp_config_counts(&mut config, None);

        // Base Rotation at Creation Becomes the Anchor for Pips
        let anchor = Anchor {
            position: Vec2::ZERO,
            rotation: layout::base_rotation(&config, gauge.distance, gauge.angle),
        };

        let base = commands
            .spawn((
                Name::new("gauge_base"),
                GaugeBase,
                Sprite::from_image(config.base.texture.clone().unwrap_or_default()),
                Transform::from_xyz(0.0, 0.0, BASE_Z),
                Visibility::Inherited,
                ChildOf(root),
            ))
            .id();

        let end_cap = commands
            .spawn((
                Name::new("gauge_end_cap"),
                GaugeEndCap,
                Sprite::from_image(config.end_cap.texture.clone().unwrap_or_default()),
                Transform::from_xyz(0.0, 0.0, END_CAP_Z),
                Visibility::Hidden,
                ChildOf(base),
            ))
            .id();

        let mut pool = PipPool::default();
        let mut spawner = SpriteSpawner {
            commands: &mut commands,
            parent: base,
            image: config.pips.texture.clone().unwrap_or_default(),
        };
        pool.reconcile(counts, config.mirror, &mut spawner);

        info!(
            "Pip gauge {:?} spawned: {} pips (min {}), mode {}, mirror {}",
            root,
            counts.max,
            counts.min,
            config.mode.name(),
            config.mirror
        );

        commands.entity(root).insert(GaugeParts {
            base,
            end_cap,
            pool,
            anchor,
            counts: Some(counts),
        });
    }
}

/// Per-Frame: Sync the Pool, Then Recompute and Apply the Full Layout
pub(super) fn update_gauges(
    mut commands: Commands,
    mut q_gauges: Query<(Entity, &PipGauge, &mut GaugeConfig, &mut GaugeParts)>,
    mut q_sprites: SpriteQuery,
) {
    for (root, gauge, mut config, mut parts) in &mut q_gauges {
        let counts = clamp_config_counts(&mut config, parts.counts);
        parts.counts = Some(counts);

        let mut spawner = SpriteSpawner {
            commands: &mut commands,
            parent: parts.base,
            image: config.pips.texture.clone().unwrap_or_default(),
        };

        if parts.pool.reconcile(counts, config.mirror, &mut spawner) == Reconcile::Deferred {
            // Pool Changed, Lay Out Next Frame Once Commands Have Landed
            debug!(
                "Pip gauge {:?} pool resized -> {} pips, {} mirrors",
                root,
                parts.pool.len(),
                parts.pool.mirrors().len()
            );
            continue;
        }

        let frame = layout::compute_layout(
            &config,
            counts,
            gauge.distance,
            gauge.angle,
            parts.anchor,
            parts.pool.len(),
            parts.pool.mirrors().len(),
        );

        apply_base(&mut q_sprites, parts.base, &frame.base, config.base.texture.as_ref());

        let pip_texture = config.pips.texture.as_ref();
        for (i, state) in frame.pips.iter().enumerate() {
            if let Some(e) = parts.pool.pip(i) {
                apply_element(&mut q_sprites, e, state, pip_texture);
            }
        }
        for (i, state) in frame.mirrors.iter().enumerate() {
            if let Some(e) = parts.pool.mirror(i) {
                apply_element(&mut q_sprites, e, state, pip_texture);
            }
        }

        apply_element(
            &mut q_sprites,
            parts.end_cap,
            &frame.end_cap,
            config.end_cap.texture.as_ref(),
        );
    }
}

/// Base Always Stays Visible so its Children Keep Drawing
/// Without a Texture it is Tinted Fully Transparent Instead
fn apply_base(
    q: &mut SpriteQuery,
    entity: Entity,
    layout: &layout::SpriteLayout,
    texture: Option<&Handle<Image>>,
) {
    let Ok((mut tf, mut sprite, mut vis)) = q.get_mut(entity) else { return; };

    vis.set_if_neq(Visibility::Inherited);
    write_transform(&mut tf, layout);

    match texture {
        Some(image) => {
            sprite.color = layout.color;
            if sprite.image != *image {
                sprite.image = image.clone();
            }
        }
        None => sprite.color = Color::NONE,
    }
}

fn apply_element(
    q: &mut SpriteQuery,
    entity: Entity,
    state: &ElementState,
    texture: Option<&Handle<Image>>,
) {
    let Ok((mut tf, mut sprite, mut vis)) = q.get_mut(entity) else { return; };

    // Hidden Elements Keep Their Last Transform
    let (ElementState::Shown(layout), Some(image)) = (state, texture) else {
        vis.set_if_neq(Visibility::Hidden);
        return;
    };

    vis.set_if_neq(Visibility::Inherited);
    write_transform(&mut tf, layout);
    sprite.color = layout.color;
    if sprite.image != *image {
        sprite.image = image.clone();
    }
}

#[inline]
fn write_transform(tf: &mut Transform, layout: &layout::SpriteLayout) {
    tf.translation = layout.translation.extend(tf.translation.z);
    tf.rotation = Quat::from_rotation_z(layout.rotation);
    tf.scale = layout.scale.extend(1.0);
}

/// Gauge Component Removed But Entity Kept: Tear Down the Spawned Parts
pub(super) fn release_removed_gauges(
    mut commands: Commands,
    mut removed: RemovedComponents<PipGauge>,
    mut q_parts: Query<&mut GaugeParts>,
) {
    for root in removed.read() {
        let Ok(mut parts) = q_parts.get_mut(root) else { continue; };

        let mut spawner = SpriteSpawner {
            commands: &mut commands,
            parent: parts.base,
            image: Handle::default(),
        };
        parts.pool.release_all(&mut spawner);

        commands.entity(parts.end_cap).try_despawn();
        commands.entity(parts.base).try_despawn();
        commands.entity(root).remove::<GaugeParts>();

        info!("Pip gauge {:?} removed, parts released", root);
    }
}
