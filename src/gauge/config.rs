/*
Pip Gauge - by David Petnick
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// How the Pip Row Represents Distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GaugeMode {
    /// Every Pip Along the Way Stays Lit Until 100 is Reached
    #[default]
    Fill,
    /// One Pip Snaps to its Absolute Slot From 0 to 100
    Snap,
    /// One Pip Slides Continuously From 0 to 100
    Slide,
}

impl GaugeMode {
    /// Snap and Slide Drive a Single Indicator at Index 0
    #[inline]
    pub fn single_indicator(self) -> bool {
        matches!(self, GaugeMode::Snap | GaugeMode::Slide)
    }

    pub fn next(self) -> Self {
        match self {
            GaugeMode::Fill => GaugeMode::Snap,
            GaugeMode::Snap => GaugeMode::Slide,
            GaugeMode::Slide => GaugeMode::Fill,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GaugeMode::Fill => "fill",
            GaugeMode::Snap => "snap",
            GaugeMode::Slide => "slide",
        }
    }
}

/// Background Sprite Every Other Part Hangs Off
#[derive(Debug, Clone, PartialEq)]
pub struct BaseConfig {
    pub texture: Option<Handle<Image>>,
    pub scale: Vec2,
    pub offset: Vec2,
    /// Degrees, 0..=360
    pub rotation_offset: f32,
    pub color_0: Color,
    pub color_100: Color,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            texture: None,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
            rotation_offset: 0.0,
            color_0: Color::WHITE,
            color_100: Color::WHITE,
        }
    }
}

/// The Row of Indicators
/// Differing '_0' / '_100' Pairs Turn on Interpolation for That Property
#[derive(Debug, Clone, PartialEq)]
pub struct PipConfig {
    pub texture: Option<Handle<Image>>,
    pub scale_0: Vec2,
    pub scale_100: Vec2,
    pub offset_0: Vec2,
    pub offset_100: Vec2,
    /// Space Between Neighbouring Pips
    pub spacing: f32,
    /// Degrees, 0..=360
    pub rotation_offset: f32,
    /// How Far From the Base the First Pip Sits
    pub centre_offset: f32,
    /// Always Shown, Even at Distance 0
    pub min_pips: i32,
    pub max_pips: i32,
    pub color_0: Color,
    pub color_100: Color,
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            texture: None,
            scale_0: Vec2::ONE,
            scale_100: Vec2::ONE,
            offset_0: Vec2::ZERO,
            offset_100: Vec2::ZERO,
            spacing: 0.2,
            rotation_offset: 0.0,
            centre_offset: 0.0,
            min_pips: 0,
            max_pips: 5,
            color_0: Color::WHITE,
            color_100: Color::WHITE,
        }
    }
}

/// Optional Cap Drawn Past the Last Lit Pip
#[derive(Debug, Clone, PartialEq)]
pub struct EndCapConfig {
    pub texture: Option<Handle<Image>>,
    pub scale: Vec2,
    pub offset: Vec2,
    /// Degrees, 0..=360
    pub rotation_offset: f32,
    pub color_0: Color,
    pub color_100: Color,
    pub show_at_0: bool,
    pub show_at_100: bool,
}

impl EndCapConfig {
    /// Cap Configured for Both Extremes Travels Along the Strip
    #[inline]
    pub fn tracks_pips(&self) -> bool {
        self.show_at_0 && self.show_at_100
    }
}

impl Default for EndCapConfig {
    fn default() -> Self {
        Self {
            texture: None,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
            rotation_offset: 0.0,
            color_0: Color::WHITE,
            color_100: Color::WHITE,
            show_at_0: true,
            show_at_100: true,
        }
    }
}

/// Designer Settings for One Gauge
/// Safe to Mutate at Runtime, Pip Counts are Re-Clamped Every Frame
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GaugeConfig {
    pub base: BaseConfig,
    pub pips: PipConfig,
    pub end_cap: EndCapConfig,
    pub mode: GaugeMode,
    /// Mirror the Pip Row on Y
    pub mirror: bool,
    /// Degrees
    pub mirror_rotation_offset: f32,
    /// Drive Base Rotation From Distance Instead of 'PipGauge::angle'
    pub angle_based_on_distance: bool,
    /// Degrees, 0..=360
    pub min_angle: f32,
    /// Degrees, 0..=360
    pub max_angle: f32,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            pips: PipConfig::default(),
            end_cap: EndCapConfig::default(),
            mode: GaugeMode::Fill,
            mirror: false,
            mirror_rotation_offset: 0.0,
            angle_based_on_distance: false,
            min_angle: 0.0,
            max_angle: 360.0,
        }
    }
}

/// Pip Counts After Clamping, Ready for Indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipCounts {
    pub min: usize,
    pub max: usize,
}

impl PipConfig {
    /// Pull 'min_pips' / 'max_pips' Back Into '0 <= min <= max', 'max >= 1'
    ///
    /// Whichever Count Moved Since 'previous' Drags the Other With It.
    /// Without History (or if Both Moved) the Max is Raised to Fit
    pub fn clamp_counts(&mut self, previous: Option<PipCounts>) -> PipCounts {
        if self.min_pips < 0 {
            self.min_pips = 0;
        }
        if self.max_pips < 1 {
            self.max_pips = 1;
        }

        if self.min_pips > self.max_pips {
            let max_moved = previous
                .is_some_and(|p| p.max as i32 != self.max_pips && p.min as i32 == self.min_pips);

            if max_moved {
                self.min_pips = self.max_pips;
            } else {
                self.max_pips = self.min_pips;
            }
        }

        PipCounts {
            min: self.min_pips as usize,
            max: self.max_pips as usize,
        }
    }
}
