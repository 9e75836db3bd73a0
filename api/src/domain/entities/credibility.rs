//! Credibility visual encoding
//!
//! Maps a credibility score to the bar color (a smooth red → dark green
//! gradient) and to the shimmer animation shown over the bar.

use serde::{Deserialize, Serialize};

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation between two colors, `factor` in [0, 1]
    pub fn lerp(self, other: Rgb, factor: f64) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let value = a as f64 + (b as f64 - a as f64) * factor;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A fixed point on the credibility gradient
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub percent: i64,
    pub color: Rgb,
}

/// Gradient stops, contiguous and strictly increasing in `percent`.
pub const COLOR_STOPS: [ColorStop; 5] = [
    // red
    ColorStop {
        percent: 0,
        color: Rgb::new(0xef, 0x44, 0x44),
    },
    // orange-red
    ColorStop {
        percent: 25,
        color: Rgb::new(0xf9, 0x73, 0x16),
    },
    // yellow
    ColorStop {
        percent: 50,
        color: Rgb::new(0xfa, 0xcc, 0x15),
    },
    // green
    ColorStop {
        percent: 75,
        color: Rgb::new(0x22, 0xc5, 0x5e),
    },
    // dark green
    ColorStop {
        percent: 100,
        color: Rgb::new(0x15, 0x80, 0x3d),
    },
];

/// Clamp a stored score into the displayable [0, 100] range
pub fn clamp_score(score: i64) -> i64 {
    score.clamp(0, 100)
}

/// Bar color for a credibility score, as `#rrggbb`
pub fn credibility_color(score: i64) -> String {
    credibility_rgb(score).to_string()
}

pub fn credibility_rgb(score: i64) -> Rgb {
    let score = clamp_score(score);

    let (start, end) = COLOR_STOPS
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(lo, hi)| lo.percent <= score && score <= hi.percent)
        .unwrap_or((COLOR_STOPS[0], COLOR_STOPS[COLOR_STOPS.len() - 1]));

    let factor = (score - start.percent) as f64 / (end.percent - start.percent) as f64;
    start.color.lerp(end.color, factor)
}

/// How strongly the credibility bar shimmers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShimmerIntensity {
    None,
    Low,
    Medium,
    High,
}

impl ShimmerIntensity {
    pub fn from_score(score: i64) -> Self {
        if score < 25 {
            ShimmerIntensity::None
        } else if score < 50 {
            ShimmerIntensity::Low
        } else if score < 75 {
            ShimmerIntensity::Medium
        } else {
            ShimmerIntensity::High
        }
    }

    /// Animation period for one shimmer sweep
    pub fn duration(&self) -> &'static str {
        match self {
            ShimmerIntensity::None => "0s",
            ShimmerIntensity::Low => "3s",
            ShimmerIntensity::Medium => "2.5s",
            ShimmerIntensity::High => "2s",
        }
    }

    pub fn is_animated(&self) -> bool {
        *self != ShimmerIntensity::None
    }
}

impl std::fmt::Display for ShimmerIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShimmerIntensity::None => write!(f, "none"),
            ShimmerIntensity::Low => write!(f, "low"),
            ShimmerIntensity::Medium => write!(f, "medium"),
            ShimmerIntensity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for ShimmerIntensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ShimmerIntensity::None),
            "low" => Ok(ShimmerIntensity::Low),
            "medium" => Ok(ShimmerIntensity::Medium),
            "high" => Ok(ShimmerIntensity::High),
            _ => Err(format!("Unknown shimmer intensity: {}", s)),
        }
    }
}

/// Duration lookup by intensity name; unknown names get the medium period.
pub fn shimmer_duration(intensity: &str) -> &'static str {
    intensity
        .parse::<ShimmerIntensity>()
        .map(|i| i.duration())
        .unwrap_or("2.5s")
}
