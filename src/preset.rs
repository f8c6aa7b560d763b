/*
Pip Gauge - by David Petnick
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gauge::{BaseConfig, EndCapConfig, GaugeConfig, GaugeMode, PipConfig};

pub const DEFAULT_PRESET_FILE: &str = "gauge.ron";

/// Colour as Either "#rrggbb[aa]" or [r, g, b, a] (sRGB, 0..1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorPreset {
    Hex(String),
    Rgba([f32; 4]),
}

impl Default for ColorPreset {
    fn default() -> Self {
        ColorPreset::Rgba([1.0, 1.0, 1.0, 1.0])
    }
}

impl ColorPreset {
    pub fn to_color(&self) -> Color {
        match self {
            ColorPreset::Rgba([r, g, b, a]) => Color::srgba(*r, *g, *b, *a),
            ColorPreset::Hex(hex) => match Srgba::hex(hex) {
                Ok(c) => c.into(),
                Err(err) => {
                    warn!("bad colour {:?} in gauge preset: {:?}", hex, err);
                    Color::WHITE
                }
            },
        }
    }

    pub fn from_color(color: Color) -> Self {
        let c = color.to_srgba();
        ColorPreset::Rgba([c.red, c.green, c.blue, c.alpha])
    }
}

#[inline]
fn vec2(v: [f32; 2]) -> Vec2 {
    Vec2::from_array(v)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasePreset {
    /// Asset Path, Resolved Through the Loader Passed to 'to_config'
    pub texture: Option<String>,
    pub scale: [f32; 2],
    pub offset: [f32; 2],
    pub rotation_offset: f32,
    pub color_0: ColorPreset,
    pub color_100: ColorPreset,
}

impl Default for BasePreset {
    fn default() -> Self {
        let d = BaseConfig::default();
        Self {
            texture: None,
            scale: d.scale.to_array(),
            offset: d.offset.to_array(),
            rotation_offset: d.rotation_offset,
            color_0: ColorPreset::from_color(d.color_0),
            color_100: ColorPreset::from_color(d.color_100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipPreset {
    pub texture: Option<String>,
    pub scale_0: [f32; 2],
    pub scale_100: [f32; 2],
    pub offset_0: [f32; 2],
    pub offset_100: [f32; 2],
    pub spacing: f32,
    pub rotation_offset: f32,
    pub centre_offset: f32,
    pub min_pips: i32,
    pub max_pips: i32,
    pub color_0: ColorPreset,
    pub color_100: ColorPreset,
}

impl Default for PipPreset {
    fn default() -> Self {
        let d = PipConfig::default();
        Self {
            texture: None,
            scale_0: d.scale_0.to_array(),
            scale_100: d.scale_100.to_array(),
            offset_0: d.offset_0.to_array(),
            offset_100: d.offset_100.to_array(),
            spacing: d.spacing,
            rotation_offset: d.rotation_offset,
            centre_offset: d.centre_offset,
            min_pips: d.min_pips,
            max_pips: d.max_pips,
            color_0: ColorPreset::from_color(d.color_0),
            color_100: ColorPreset::from_color(d.color_100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndCapPreset {
    pub texture: Option<String>,
    pub scale: [f32; 2],
    pub offset: [f32; 2],
    pub rotation_offset: f32,
    pub color_0: ColorPreset,
    pub color_100: ColorPreset,
    pub show_at_0: bool,
    pub show_at_100: bool,
}

impl Default for EndCapPreset {
    fn default() -> Self {
        let d = EndCapConfig::default();
        Self {
            texture: None,
            scale: d.scale.to_array(),
            offset: d.offset.to_array(),
            rotation_offset: d.rotation_offset,
            color_0: ColorPreset::from_color(d.color_0),
            color_100: ColorPreset::from_color(d.color_100),
            show_at_0: d.show_at_0,
            show_at_100: d.show_at_100,
        }
    }
}

/// On-Disk Form of 'GaugeConfig' (RON)
/// Missing Fields Fall Back to the Same Defaults as 'GaugeConfig'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugePreset {
    pub base: BasePreset,
    pub pips: PipPreset,
    pub end_cap: EndCapPreset,
    pub mode: GaugeMode,
    pub mirror: bool,
    pub mirror_rotation_offset: f32,
    pub angle_based_on_distance: bool,
    pub min_angle: f32,
    pub max_angle: f32,
}

impl Default for GaugePreset {
    fn default() -> Self {
        let d = GaugeConfig::default();
        Self {
            base: BasePreset::default(),
            pips: PipPreset::default(),
            end_cap: EndCapPreset::default(),
            mode: d.mode,
            mirror: d.mirror,
            mirror_rotation_offset: d.mirror_rotation_offset,
            angle_based_on_distance: d.angle_based_on_distance,
            min_angle: d.min_angle,
            max_angle: d.max_angle,
        }
    }
}

/// Where Presets Live
/// Debug Builds: Project Directory, Release Builds: Platform Config Dir
pub fn preset_dir() -> Option<PathBuf> {
    #[cfg(debug_assertions)]
    {
        std::env::current_dir().ok()
    }
    #[cfg(not(debug_assertions))]
    {
        dirs::config_dir().and_then(|mut p| {
            p.push("PipGauge");
            std::fs::create_dir_all(&p).ok()?;
            Some(p)
        })
    }
}

pub fn default_preset_path() -> Option<PathBuf> {
    preset_dir().map(|p| p.join(DEFAULT_PRESET_FILE))
}

impl GaugePreset {
    pub fn from_ron_str(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, Default::default())
    }

    /// Missing File is Normal (None), Unreadable / Malformed Gets a Warning
    pub fn load(path: &Path) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("failed to read gauge preset {}: {}", path.display(), err);
                return None;
            }
        };

        match Self::from_ron_str(&contents) {
            Ok(p) => Some(p),
            Err(err) => {
                warn!("failed to parse gauge preset {}: {}", path.display(), err);
                None
            }
        }
    }

    pub fn load_or_default(path: Option<&Path>) -> Self {
        path.and_then(Self::load).unwrap_or_default()
    }

    /// Returns True Once the File is Written
    pub fn save(&self, path: &Path) -> bool {
        let contents = match self.to_ron_string() {
            Ok(c) => c,
            Err(err) => {
                warn!("failed to serialize gauge preset: {}", err);
                return false;
            }
        };

        if let Err(err) = std::fs::write(path, contents) {
            warn!("failed to write gauge preset {}: {}", path.display(), err);
            return false;
        }
        true
    }

    /// Build a Live Config, Resolving Texture Paths via 'load_image'
    /// (the Demo Passes 'AssetServer::load')
    pub fn to_config(&self, mut load_image: impl FnMut(&str) -> Handle<Image>) -> GaugeConfig {
        let mut texture = |p: &Option<String>| p.as_deref().map(&mut load_image);

        let b = &self.base;
        let p = &self.pips;
        let e = &self.end_cap;

        GaugeConfig {
            base: BaseConfig {
                texture: texture(&b.texture),
                scale: vec2(b.scale),
                offset: vec2(b.offset),
                rotation_offset: b.rotation_offset,
                color_0: b.color_0.to_color(),
                color_100: b.color_100.to_color(),
            },
            pips: PipConfig {
                texture: texture(&p.texture),
                scale_0: vec2(p.scale_0),
                scale_100: vec2(p.scale_100),
                offset_0: vec2(p.offset_0),
                offset_100: vec2(p.offset_100),
                spacing: p.spacing,
                rotation_offset: p.rotation_offset,
                centre_offset: p.centre_offset,
                min_pips: p.min_pips,
                max_pips: p.max_pips,
                color_0: p.color_0.to_color(),
                color_100: p.color_100.to_color(),
            },
            end_cap: EndCapConfig {
                texture: texture(&e.texture),
                scale: vec2(e.scale),
                offset: vec2(e.offset),
                rotation_offset: e.rotation_offset,
                color_0: e.color_0.to_color(),
                color_100: e.color_100.to_color(),
                show_at_0: e.show_at_0,
                show_at_100: e.show_at_100,
            },
            mode: self.mode,
            mirror: self.mirror,
            mirror_rotation_offset: self.mirror_rotation_offset,
            angle_based_on_distance: self.angle_based_on_distance,
            min_angle: self.min_angle,
            max_angle: self.max_angle,
        }
    }

    /// Snapshot a Live Config; 'path_of' Maps Handles Back to Asset Paths
    pub fn from_config(
        config: &GaugeConfig,
        mut path_of: impl FnMut(&Handle<Image>) -> Option<String>,
    ) -> Self {
        let mut texture = |h: &Option<Handle<Image>>| h.as_ref().and_then(&mut path_of);
        let color = ColorPreset::from_color;

        let b = &config.base;
        let p = &config.pips;
        let e = &config.end_cap;

        Self {
            base: BasePreset {
                texture: texture(&b.texture),
                scale: b.scale.to_array(),
                offset: b.offset.to_array(),
                rotation_offset: b.rotation_offset,
                color_0: color(b.color_0),
                color_100: color(b.color_100),
            },
            pips: PipPreset {
                texture: texture(&p.texture),
                scale_0: p.scale_0.to_array(),
                scale_100: p.scale_100.to_array(),
                offset_0: p.offset_0.to_array(),
                offset_100: p.offset_100.to_array(),
                spacing: p.spacing,
                rotation_offset: p.rotation_offset,
                centre_offset: p.centre_offset,
                min_pips: p.min_pips,
                max_pips: p.max_pips,
                color_0: color(p.color_0),
                color_100: color(p.color_100),
            },
            end_cap: EndCapPreset {
                texture: texture(&e.texture),
                scale: e.scale.to_array(),
                offset: e.offset.to_array(),
                rotation_offset: e.rotation_offset,
                color_0: color(e.color_0),
                color_100: color(e.color_100),
                show_at_0: e.show_at_0,
                show_at_100: e.show_at_100,
            },
            mode: config.mode,
            mirror: config.mirror,
            mirror_rotation_offset: config.mirror_rotation_offset,
            angle_based_on_distance: config.angle_based_on_distance,
            min_angle: config.min_angle,
            max_angle: config.max_angle,
        }
    }
}
