/*
Pip Gauge - by David Petnick
*/
use bevy::prelude::*;
use pipgauge::gauge::{GaugeConfig, PipGauge, PipGaugePlugin};
use pipgauge::preset::{ColorPreset, GaugePreset, default_preset_path};
use rand::RngExt;

const DISTANCE_PER_SEC: f32 = 40.0;
const ANGLE_PER_SEC: f32 = 90.0;
const WANDER_PER_SEC: f32 = 30.0;

#[derive(Component)]
struct DemoGauge;

/// Random Walk Driver so the Gauge Can be Watched Hands-Free
#[derive(Resource, Debug, Clone)]
struct Wander {
    enabled: bool,
    target: f32,
}

impl Default for Wander {
    fn default() -> Self {
        Self {
            enabled: false,
            target: 100.0,
        }
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(ImagePlugin::default_nearest()))
        .add_plugins(PipGaugePlugin)
        .init_resource::<Wander>()
        .add_systems(Startup, setup)
        .add_systems(Update, (drive_gauge, wander_gauge, save_preset))
        .run();
}

/// Used When No 'gauge.ron' is Found
fn demo_preset() -> GaugePreset {
    let mut p = GaugePreset::default();
    p.base.texture = Some("sprites/gauge_base.png".into());
    p.pips.texture = Some("sprites/gauge_pip.png".into());
    p.end_cap.texture = Some("sprites/gauge_end.png".into());

    p.pips.spacing = 12.0;
    p.pips.centre_offset = 10.0;
    p.pips.max_pips = 8;
    p.pips.scale_100 = [1.5, 1.5];
    p.pips.color_0 = ColorPreset::Hex("#3cd070".into());
    p.pips.color_100 = ColorPreset::Hex("#e03c31".into());
    p.end_cap.offset = [0.0, 4.0];
    p
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    let path = default_preset_path();
    let preset = match path.as_deref().and_then(GaugePreset::load) {
        Some(p) => {
            info!("loaded gauge preset {:?}", path);
            p
        }
        None => demo_preset(),
    };

    let config = preset.to_config(|p| asset_server.load(p.to_owned()));

    commands.spawn(Camera2d);
    commands.spawn((
        Name::new("demo_gauge"),
        DemoGauge,
        PipGauge::default(),
        config,
        Transform::from_scale(Vec3::splat(3.0)),
    ));

    info!("Up/Down distance, Left/Right angle, M mode, R mirror, [ ] pips, W wander, S save");
}

fn drive_gauge(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut wander: ResMut<Wander>,
    mut q: Query<(&mut PipGauge, &mut GaugeConfig), With<DemoGauge>>,
) {
    let Ok((mut gauge, mut config)) = q.single_mut() else { return; };
    let dt = time.delta_secs();

    if keys.pressed(KeyCode::ArrowUp) {
        gauge.distance = (gauge.distance + DISTANCE_PER_SEC * dt).min(100.0);
    }
    if keys.pressed(KeyCode::ArrowDown) {
        gauge.distance = (gauge.distance - DISTANCE_PER_SEC * dt).max(0.0);
    }
    if keys.pressed(KeyCode::ArrowRight) {
        gauge.angle = (gauge.angle + ANGLE_PER_SEC * dt).rem_euclid(360.0);
    }
    if keys.pressed(KeyCode::ArrowLeft) {
        gauge.angle = (gauge.angle - ANGLE_PER_SEC * dt).rem_euclid(360.0);
    }

    if keys.just_pressed(KeyCode::KeyM) {
        config.mode = config.mode.next();
        info!("gauge mode -> {}", config.mode.name());
    }
    if keys.just_pressed(KeyCode::KeyR) {
        config.mirror = !config.mirror;
        info!("gauge mirror -> {}", config.mirror);
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        config.pips.max_pips += 1;
        info!("gauge max pips -> {}", config.pips.max_pips);
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        // Clamped Back to >= 1 by the Gauge Itself
        config.pips.max_pips -= 1;
        info!("gauge max pips -> {}", config.pips.max_pips);
    }
    if keys.just_pressed(KeyCode::KeyW) {
        wander.enabled = !wander.enabled;
        info!("gauge wander -> {}", wander.enabled);
    }
}

fn wander_gauge(
    time: Res<Time>,
    mut wander: ResMut<Wander>,
    mut q: Query<&mut PipGauge, With<DemoGauge>>,
) {
    if !wander.enabled {
        return;
    }
    let Ok(mut gauge) = q.single_mut() else { return; };

    let step = WANDER_PER_SEC * time.delta_secs();
    let gap = wander.target - gauge.distance;

    if gap.abs() <= step {
        gauge.distance = wander.target;
        wander.target = rand::rng().random_range(0.0..=100.0);
        debug!("wander target -> {:.1}", wander.target);
    } else {
        gauge.distance += step * gap.signum();
    }
}

fn save_preset(
    keys: Res<ButtonInput<KeyCode>>,
    asset_server: Res<AssetServer>,
    q: Query<&GaugeConfig, With<DemoGauge>>,
) {
    if !keys.just_pressed(KeyCode::KeyS) {
        return;
    }
    let Ok(config) = q.single() else { return; };
    let Some(path) = default_preset_path() else {
        warn!("no preset directory available, not saving");
        return;
    };

    let preset = GaugePreset::from_config(config, |h| {
        asset_server.get_path(h.id()).map(|p| p.to_string())
    });

    if preset.save(&path) {
        info!("saved gauge preset to {} (mode {})", path.display(), preset.mode.name());
    }
}
