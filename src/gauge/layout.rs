/*
Pip Gauge - by David Petnick
*/
//! Pure Per-Frame Layout: Config + Distance/Angle In, Transforms Out
//! Nothing Here Touches the World, the Plugin Applies the Result
use bevy::prelude::*;

use super::config::{GaugeConfig, GaugeMode, PipCounts};
use super::math::{deg_to_rad, inverse_lerp, lerp_color, lerp_scale};

/// Base Transform Recorded Once When the Gauge is Spawned
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub position: Vec2,
    pub rotation: f32,
}

/// Resolved Local Transform + Tint for One Sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteLayout {
    pub translation: Vec2,
    /// Radians Around Z
    pub rotation: f32,
    pub scale: Vec2,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementState {
    Hidden,
    Shown(SpriteLayout),
}

impl ElementState {
    #[inline]
    pub fn is_shown(&self) -> bool {
        matches!(self, ElementState::Shown(_))
    }

    #[inline]
    pub fn layout(&self) -> Option<&SpriteLayout> {
        match self {
            ElementState::Shown(l) => Some(l),
            ElementState::Hidden => None,
        }
    }
}

/// Everything the Plugin Needs to Draw One Frame
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeLayout {
    pub base: SpriteLayout,
    pub pips: Vec<ElementState>,
    pub mirrors: Vec<ElementState>,
    pub end_cap: ElementState,
    pub visible_count: i32,
}

/// Number of Pips Lit for 'distance'
/// 'round' is Half Away From Zero, so 50% of 5 Pips Lights 3
pub fn visible_count(distance: f32, counts: PipCounts) -> i32 {
    let span = counts.max.saturating_sub(counts.min) as f32;
    ((distance / 100.0) * span).round() as i32 + counts.min as i32
}

/// Frame Inputs Bundled so Helpers Stay Small
struct Frame<'a> {
    config: &'a GaugeConfig,
    counts: PipCounts,
    distance: f32,
    angle: f32,
    anchor: Anchor,
}

impl Frame<'_> {
    #[inline]
    fn progress(&self) -> f32 {
        inverse_lerp(0.0, 100.0, self.distance)
    }

    #[inline]
    fn per_pip(&self, slot: f32) -> f32 {
        inverse_lerp(0.0, self.counts.max as f32, slot)
    }

    fn base_rotation(&self) -> f32 {
        let cfg = self.config;
        let angle = if cfg.angle_based_on_distance {
            cfg.min_angle.lerp(cfg.max_angle, self.progress())
        } else {
            self.angle
        };
        deg_to_rad(angle) + deg_to_rad(cfg.base.rotation_offset)
    }

    fn base(&self) -> SpriteLayout {
        let base = &self.config.base;
        SpriteLayout {
            translation: self.anchor.position + base.offset,
            rotation: self.base_rotation(),
            scale: base.scale,
            color: lerp_color(base.color_0, base.color_100, self.progress()),
        }
    }

    /// Slot 'i' on the Strip Without Interpolated Offsets
    #[inline]
    fn slot_y(&self, slot: f32) -> f32 {
        let pips = &self.config.pips;
        self.anchor.position.y + pips.centre_offset + pips.spacing * slot
    }

    fn stepped_position(&self, slot: f32) -> Vec2 {
        let pips = &self.config.pips;
        Vec2::new(self.anchor.position.x, self.slot_y(slot))
            + pips.offset_0.lerp(pips.offset_100, self.per_pip(slot))
    }

    fn sliding_position(&self, index: usize) -> Vec2 {
        let pips = &self.config.pips;
        let segment = 100.0 / self.counts.max as f32;
        let i = index as f32;

        let y = if index == 0 {
            self.slot_y(0.0)
                .lerp(self.slot_y(1.0), inverse_lerp(0.0, segment, self.distance))
        } else {
            let start = 100.0 - i * segment;
            self.slot_y(i)
                .lerp(self.slot_y(i + 1.0), inverse_lerp(start, start + segment, self.distance))
        };

        Vec2::new(self.anchor.position.x, y)
            + pips.offset_0.lerp(pips.offset_100, self.progress())
    }

    /// Layout for Pip 'index' While 'shown' Pips are Lit
    fn pip(&self, index: usize, shown: i32) -> SpriteLayout {
        let cfg = self.config;
        let pips = &cfg.pips;
        let own_slot = index as f32;
        let active_slot = (shown - 1) as f32;

        let translation = match cfg.mode {
            GaugeMode::Fill => self.stepped_position(own_slot),
            GaugeMode::Snap => self.stepped_position(active_slot),
            GaugeMode::Slide => self.sliding_position(index),
        };

        let scale_t = match cfg.mode {
            GaugeMode::Fill => self.per_pip(own_slot),
            GaugeMode::Snap | GaugeMode::Slide => self.progress(),
        };

        let color_t = match cfg.mode {
            GaugeMode::Fill => self.per_pip(own_slot),
            GaugeMode::Snap | GaugeMode::Slide => self.per_pip(active_slot),
        };

        SpriteLayout {
            translation,
            rotation: self.anchor.rotation + deg_to_rad(pips.rotation_offset),
            scale: lerp_scale(pips.scale_0, pips.scale_100, scale_t),
            color: lerp_color(pips.color_0, pips.color_100, color_t),
        }
    }

    fn mirror_of(&self, pip: &SpriteLayout) -> SpriteLayout {
        SpriteLayout {
            translation: Vec2::new(pip.translation.x, -pip.translation.y),
            rotation: -pip.rotation + deg_to_rad(self.config.mirror_rotation_offset),
            scale: pip.scale,
            color: pip.color,
        }
    }

    fn pips(&self, len: usize, visible: i32) -> Vec<ElementState> {
        let single = self.config.mode.single_indicator();
        let mut out = vec![ElementState::Hidden; len];

        let render = |out: &mut Vec<ElementState>, i: usize, shown: i32| {
            let target = if single {
                if let Some(slot) = out.get_mut(i) {
                    *slot = ElementState::Hidden;
                }
                0
            } else {
                i
            };

            if target < out.len() {
                out[target] = ElementState::Shown(self.pip(target, shown));
            }
        };

        let min = self.counts.min as i32;
        if visible < min {
            // Floor: Always Show 'min' Pips
            for i in 0..self.counts.min {
                render(&mut out, i, min);
            }
        } else {
            for i in 0..self.counts.max.min(len) {
                if (i as i32) < visible {
                    render(&mut out, i, visible);
                } else {
                    out[i] = ElementState::Hidden;
                }
            }
        }

        out
    }

    fn end_cap(&self, base: &SpriteLayout, visible: i32) -> ElementState {
        let cfg = self.config;
        let end = &cfg.end_cap;

        if end.texture.is_none() {
            return ElementState::Hidden;
        }

        let d = self.distance;
        let tracks = end.tracks_pips();

        if d == 0.0 && (!end.show_at_0 || tracks) {
            return ElementState::Hidden;
        }
        if d < 100.0 && end.show_at_100 && !end.show_at_0 {
            return ElementState::Hidden;
        }
        if d > 0.0 && end.show_at_0 && !end.show_at_100 {
            return ElementState::Hidden;
        }

        let min = self.counts.min as i32;
        let (translation, rotation) = if tracks {
            let past = if visible > 0 {
                visible
            } else if visible < min {
                min
            } else {
                0
            };
            (
                Vec2::new(self.anchor.position.x, self.slot_y(past as f32))
                    + end.offset
                    + cfg.base.offset,
                self.anchor.rotation + deg_to_rad(end.rotation_offset),
            )
        } else {
            (
                self.anchor.position + end.offset,
                base.rotation + deg_to_rad(end.rotation_offset),
            )
        };

        ElementState::Shown(SpriteLayout {
            translation,
            rotation,
            scale: end.scale,
            color: lerp_color(end.color_0, end.color_100, self.progress()),
        })
    }
}

/// Base Rotation at 'distance' / 'angle', Used to Seed the Anchor on Spawn
pub fn base_rotation(config: &GaugeConfig, distance: f32, angle: f32) -> f32 {
    Frame {
        config,
        counts: PipCounts { min: 0, max: 1 },
        distance,
        angle,
        anchor: Anchor::default(),
    }
    .base_rotation()
}

/// Lay Out a Whole Gauge
///
/// 'pool_len' / 'mirror_len' are the Live Pool Sizes. Indices Past Them
/// are Skipped, so a Stale Pool Degrades to Fewer Pips Rather Than Panics
pub fn compute_layout(
    config: &GaugeConfig,
    counts: PipCounts,
    distance: f32,
    angle: f32,
    anchor: Anchor,
    pool_len: usize,
    mirror_len: usize,
) -> GaugeLayout {
    let frame = Frame {
        config,
        counts,
        distance,
        angle,
        anchor,
    };

    let visible = visible_count(distance, counts);
    let base = frame.base();
    let pips = frame.pips(pool_len, visible);

    let mirrors = if config.mirror {
        (0..mirror_len)
            .map(|i| match pips.get(i) {
                Some(ElementState::Shown(l)) => ElementState::Shown(frame.mirror_of(l)),
                _ => ElementState::Hidden,
            })
            .collect()
    } else {
        Vec::new()
    };

    let end_cap = frame.end_cap(&base, visible);

    GaugeLayout {
        base,
        pips,
        mirrors,
        end_cap,
        visible_count: visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::config::{EndCapConfig, PipConfig};

    const EPS: f32 = 1e-5;

    fn config(mode: GaugeMode, min: i32, max: i32) -> GaugeConfig {
        GaugeConfig {
            mode,
            pips: PipConfig {
                min_pips: min,
                max_pips: max,
                spacing: 10.0,
                centre_offset: 5.0,
                ..default()
            },
            ..default()
        }
    }

    fn layout(cfg: &GaugeConfig, distance: f32) -> GaugeLayout {
        let counts = PipCounts {
            min: cfg.pips.min_pips as usize,
            max: cfg.pips.max_pips as usize,
        };
        let mirror_len = if cfg.mirror { counts.max } else { 0 };
        compute_layout(cfg, counts, distance, 180.0, Anchor::default(), counts.max, mirror_len)
    }

    fn shown(states: &[ElementState]) -> Vec<usize> {
        states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_shown())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_visible_count_endpoints_and_monotonic() {
        let c = PipCounts { min: 2, max: 7 };
        assert_eq!(visible_count(0.0, c), 2);
        assert_eq!(visible_count(100.0, c), 7);

        let mut last = visible_count(0.0, c);
        for step in 0..=1000 {
            let v = visible_count(step as f32 / 10.0, c);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_visible_count_rounds_half_away_from_zero() {
        // 50% of 5 = 2.5
        assert_eq!(visible_count(50.0, PipCounts { min: 0, max: 5 }), 3);
    }

    #[test]
    fn test_fill_empty_and_full() {
        let mut cfg = config(GaugeMode::Fill, 0, 5);
        cfg.pips.color_0 = Color::srgba(0.0, 0.0, 0.0, 1.0);
        cfg.pips.color_100 = Color::srgba(1.0, 0.5, 0.0, 1.0);

        let empty = layout(&cfg, 0.0);
        assert!(shown(&empty.pips).is_empty());

        let full = layout(&cfg, 100.0);
        assert_eq!(shown(&full.pips), vec![0, 1, 2, 3, 4]);

        for (i, state) in full.pips.iter().enumerate() {
            let l = state.layout().unwrap();
            let slot = i as f32;
            assert!((l.translation.y - (5.0 + 10.0 * slot)).abs() < EPS);
            assert_eq!(l.translation.x, 0.0);
        }

        // Per-Index Colour Runs Over 0..max, Last Pip Sits at 4/5
        let last = full.pips[4].layout().unwrap().color.to_srgba();
        assert!((last.red - 0.8).abs() < EPS);
        assert!((last.green - 0.4).abs() < EPS);
        let first = full.pips[0].layout().unwrap().color;
        assert_eq!(first, cfg.pips.color_0);
    }

    #[test]
    fn test_snap_single_pip_at_active_slot() {
        let cfg = config(GaugeMode::Snap, 0, 4);
        let l = layout(&cfg, 50.0);

        assert_eq!(l.visible_count, 2);
        assert_eq!(shown(&l.pips), vec![0]);

        let pip = l.pips[0].layout().unwrap();
        assert!((pip.translation.y - (5.0 + 10.0 * 1.0)).abs() < EPS);
    }

    #[test]
    fn test_slide_interpolates_within_first_segment() {
        let cfg = config(GaugeMode::Slide, 0, 2);
        let l = layout(&cfg, 25.0);

        assert_eq!(shown(&l.pips), vec![0]);
        let pip = l.pips[0].layout().unwrap();
        let halfway = (5.0 + 15.0) / 2.0;
        assert!((pip.translation.y - halfway).abs() < EPS);
    }

    #[test]
    fn test_slide_offset_uses_full_range() {
        let mut cfg = config(GaugeMode::Slide, 0, 2);
        cfg.pips.offset_100 = Vec2::new(8.0, 0.0);
        let l = layout(&cfg, 25.0);
        let pip = l.pips[0].layout().unwrap();
        assert!((pip.translation.x - 2.0).abs() < EPS);
    }

    #[test]
    fn test_min_pips_floor() {
        let cfg = config(GaugeMode::Fill, 2, 5);
        // Out-of-Range Distance Drops Below the Floor
        let l = layout(&cfg, -50.0);
        assert!(l.visible_count < 2);
        assert_eq!(shown(&l.pips), vec![0, 1]);

        let at_zero = layout(&cfg, 0.0);
        assert_eq!(shown(&at_zero.pips), vec![0, 1]);
    }

    #[test]
    fn test_equal_colors_exact_regardless_of_distance() {
        let mut cfg = config(GaugeMode::Fill, 0, 5);
        let c = Color::srgba(0.1, 0.2, 0.3, 0.4);
        cfg.base.color_0 = c;
        cfg.base.color_100 = c;
        cfg.pips.color_0 = c;
        cfg.pips.color_100 = c;

        for d in [0.0, 13.7, 50.0, 99.9, 100.0] {
            let l = layout(&cfg, d);
            assert_eq!(l.base.color, c);
            for s in l.pips.iter().filter_map(|s| s.layout()) {
                assert_eq!(s.color, c);
            }
        }
    }

    #[test]
    fn test_base_rotation_from_angle_and_distance() {
        let mut cfg = config(GaugeMode::Fill, 0, 5);
        let l = layout(&cfg, 0.0);
        assert!((l.base.rotation - std::f32::consts::PI).abs() < EPS);

        cfg.angle_based_on_distance = true;
        cfg.min_angle = 0.0;
        cfg.max_angle = 90.0;
        cfg.base.rotation_offset = 90.0;
        let l = layout(&cfg, 100.0);
        assert!((l.base.rotation - std::f32::consts::PI).abs() < EPS);
    }

    #[test]
    fn test_base_position_and_scale() {
        let mut cfg = config(GaugeMode::Fill, 0, 5);
        cfg.base.offset = Vec2::new(3.0, -2.0);
        cfg.base.scale = Vec2::splat(2.0);
        let counts = PipCounts { min: 0, max: 5 };
        let anchor = Anchor { position: Vec2::new(1.0, 1.0), rotation: 0.0 };
        let l = compute_layout(&cfg, counts, 40.0, 0.0, anchor, 5, 0);
        assert_eq!(l.base.translation, Vec2::new(4.0, -1.0));
        assert_eq!(l.base.scale, Vec2::splat(2.0));
    }

    #[test]
    fn test_mirror_follows_pips() {
        let mut cfg = config(GaugeMode::Fill, 0, 4);
        cfg.mirror = true;
        cfg.mirror_rotation_offset = 180.0;
        cfg.pips.rotation_offset = 90.0;

        let l = layout(&cfg, 50.0);
        assert_eq!(l.mirrors.len(), 4);
        assert_eq!(shown(&l.mirrors), shown(&l.pips));

        let pip = l.pips[1].layout().unwrap();
        let m = l.mirrors[1].layout().unwrap();
        assert_eq!(m.translation, Vec2::new(pip.translation.x, -pip.translation.y));
        assert_eq!(m.scale, pip.scale);
        assert_eq!(m.color, pip.color);
        assert!((m.rotation - (-pip.rotation + std::f32::consts::PI)).abs() < EPS);
    }

    #[test]
    fn test_no_mirrors_when_disabled() {
        let cfg = config(GaugeMode::Fill, 0, 4);
        assert!(layout(&cfg, 100.0).mirrors.is_empty());
    }

    #[test]
    fn test_fill_scale_per_index() {
        let mut cfg = config(GaugeMode::Fill, 0, 4);
        cfg.pips.scale_0 = Vec2::ONE;
        cfg.pips.scale_100 = Vec2::splat(3.0);
        let l = layout(&cfg, 100.0);
        assert_eq!(l.pips[0].layout().unwrap().scale, Vec2::ONE);
        assert_eq!(l.pips[2].layout().unwrap().scale, Vec2::splat(2.0));
    }

    #[test]
    fn test_snap_color_follows_active_slot() {
        let mut cfg = config(GaugeMode::Snap, 0, 4);
        cfg.pips.color_0 = Color::BLACK;
        cfg.pips.color_100 = Color::WHITE;

        // 2 Lit of 4, Active Slot 1 -> 1/4
        let c = layout(&cfg, 50.0).pips[0].layout().unwrap().color.to_srgba();
        assert!((c.red - 0.25).abs() < EPS);
        assert!((c.blue - 0.25).abs() < EPS);
    }

    #[test]
    fn test_slide_color_follows_active_slot() {
        let mut cfg = config(GaugeMode::Slide, 0, 4);
        cfg.pips.color_0 = Color::BLACK;
        cfg.pips.color_100 = Color::WHITE;

        // 3 Lit of 4, Active Slot 2 -> 2/4
        let c = layout(&cfg, 75.0).pips[0].layout().unwrap().color.to_srgba();
        assert!((c.green - 0.5).abs() < EPS);
    }

    #[test]
    fn test_single_indicator_scale_follows_distance() {
        for (mode, d, want) in [(GaugeMode::Snap, 50.0, 2.0), (GaugeMode::Slide, 25.0, 1.5)] {
            let mut cfg = config(mode, 0, 4);
            cfg.pips.scale_0 = Vec2::ONE;
            cfg.pips.scale_100 = Vec2::splat(3.0);

            let scale = layout(&cfg, d).pips[0].layout().unwrap().scale;
            assert!((scale - Vec2::splat(want)).length() < EPS);
        }
    }

    #[test]
    fn test_short_pool_does_not_panic() {
        let cfg = config(GaugeMode::Fill, 0, 5);
        let counts = PipCounts { min: 0, max: 5 };
        let l = compute_layout(&cfg, counts, 100.0, 0.0, Anchor::default(), 3, 0);
        assert_eq!(l.pips.len(), 3);
        assert_eq!(shown(&l.pips), vec![0, 1, 2]);
    }

    fn with_end(show_at_0: bool, show_at_100: bool) -> GaugeConfig {
        let mut cfg = config(GaugeMode::Fill, 0, 5);
        cfg.end_cap = EndCapConfig {
            texture: Some(Handle::default()),
            offset: Vec2::new(0.0, 1.0),
            show_at_0,
            show_at_100,
            ..default()
        };
        cfg
    }

    #[test]
    fn test_end_cap_hidden_without_texture() {
        let cfg = config(GaugeMode::Fill, 0, 5);
        assert_eq!(layout(&cfg, 50.0).end_cap, ElementState::Hidden);
    }

    #[test]
    fn test_end_cap_suppressed_at_zero_when_showing_both() {
        let cfg = with_end(true, true);
        assert_eq!(layout(&cfg, 0.0).end_cap, ElementState::Hidden);
        assert!(layout(&cfg, 1.0).end_cap.is_shown());
    }

    #[test]
    fn test_end_cap_only_at_100() {
        let cfg = with_end(false, true);
        assert_eq!(layout(&cfg, 50.0).end_cap, ElementState::Hidden);
        assert!(layout(&cfg, 100.0).end_cap.is_shown());
    }

    #[test]
    fn test_end_cap_only_at_0() {
        let cfg = with_end(true, false);
        assert!(layout(&cfg, 0.0).end_cap.is_shown());
        assert_eq!(layout(&cfg, 10.0).end_cap, ElementState::Hidden);
    }

    #[test]
    fn test_end_cap_tracks_lit_pips() {
        let cfg = with_end(true, true);
        let l = layout(&cfg, 60.0);
        // 3 Pips Lit, Cap Sits in Slot 3
        let end = l.end_cap.layout().unwrap();
        assert!((end.translation.y - (5.0 + 10.0 * 3.0 + 1.0)).abs() < EPS);
    }

    #[test]
    fn test_end_cap_static_when_not_tracking() {
        let cfg = with_end(false, true);
        let end = layout(&cfg, 100.0);
        let end = end.end_cap.layout().unwrap();
        assert_eq!(end.translation, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_end_cap_rotation_tracking_uses_anchor() {
        let mut cfg = with_end(true, true);
        cfg.end_cap.rotation_offset = 90.0;
        let counts = PipCounts { min: 0, max: 5 };
        let anchor = Anchor { position: Vec2::ZERO, rotation: 0.5 };

        let l = compute_layout(&cfg, counts, 60.0, 180.0, anchor, 5, 0);
        let end = l.end_cap.layout().unwrap();
        assert!((end.rotation - (0.5 + std::f32::consts::FRAC_PI_2)).abs() < EPS);
    }

    #[test]
    fn test_end_cap_rotation_static_uses_base() {
        let mut cfg = with_end(false, true);
        cfg.end_cap.rotation_offset = 90.0;
        cfg.base.rotation_offset = 45.0;
        let counts = PipCounts { min: 0, max: 5 };
        let anchor = Anchor { position: Vec2::ZERO, rotation: 0.5 };

        let l = compute_layout(&cfg, counts, 100.0, 180.0, anchor, 5, 0);
        let end = l.end_cap.layout().unwrap();
        assert!((end.rotation - (l.base.rotation + std::f32::consts::FRAC_PI_2)).abs() < EPS);
        assert!((l.base.rotation - 1.25 * std::f32::consts::PI).abs() < EPS);
    }

    #[test]
    fn test_end_cap_below_floor_sits_past_min_pips() {
        let mut cfg = with_end(true, true);
        cfg.pips.min_pips = 2;

        let l = layout(&cfg, -50.0);
        assert!(l.visible_count < 2);
        let end = l.end_cap.layout().unwrap();
        assert!((end.translation.y - (5.0 + 10.0 * 2.0 + 1.0)).abs() < EPS);
    }
}
