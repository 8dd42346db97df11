
use anyhow::{Result, bail};

/// Resampling kernel used when mapping source pixels onto destination pixels.
///
/// The discriminants are stable and match the filter ids of stb_image_resize2,
/// so they can cross a foreign-function boundary as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Catmull-Rom when upsampling an axis, Mitchell when downsampling it.
    Default = 0,
    /// Area average over each destination pixel's footprint.
    Box = 1,
    /// Linear interpolation.
    Triangle = 2,
    /// Cubic B-spline. Smooth, no ringing, noticeably soft.
    CubicBSpline = 3,
    /// Interpolating cubic, sharper than Mitchell with slight ringing.
    CatmullRom = 4,
    /// Mitchell-Netravali cubic with B = C = 1/3.
    Mitchell = 5,
    /// Nearest source pixel, no filtering.
    PointSample = 6,
}

impl FilterKind {
    pub const ALL: [Self; 7] = [
        Self::Default,
        Self::Box,
        Self::Triangle,
        Self::CubicBSpline,
        Self::CatmullRom,
        Self::Mitchell,
        Self::PointSample,
    ];

    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Picks the concrete kernel for one axis.
    ///
    /// `scale` is `src_len / dst_len`, so values above 1 mean the axis is
    /// being downsampled.
    #[must_use]
    pub fn resolve(self, scale: f64) -> Self {
        match self {
            Self::Default if scale > 1.0 => Self::Mitchell,
            Self::Default => Self::CatmullRom,
            other => other,
        }
    }

    /// Half-width of the kernel in source pixels at a scale of 1.
    #[must_use]
    pub const fn support(self) -> f64 {
        match self {
            Self::PointSample => 0.0,
            Self::Box => 0.5,
            Self::Triangle => 1.0,
            Self::Default | Self::CubicBSpline | Self::CatmullRom | Self::Mitchell => 2.0,
        }
    }

    /// Evaluates the kernel at distance `x` from the sample centre.
    ///
    /// `Default` must be resolved first; it evaluates as Mitchell here.
    #[must_use]
    pub fn weight(self, x: f64) -> f64 {
        match self {
            Self::Box => box_kernel(x),
            Self::Triangle => triangle(x),
            Self::CubicBSpline => cubic_bspline(x),
            Self::CatmullRom => catmull_rom(x),
            Self::Default | Self::Mitchell => mitchell(x),
            Self::PointSample => {
                if x == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl From<FilterKind> for i32 {
    fn from(value: FilterKind) -> Self {
        value.id()
    }
}

impl TryFrom<i64> for FilterKind {
    type Error = anyhow::Error;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::Default,
            1 => Self::Box,
            2 => Self::Triangle,
            3 => Self::CubicBSpline,
            4 => Self::CatmullRom,
            5 => Self::Mitchell,
            6 => Self::PointSample,
            _ => bail!("Invalid value for 'filter', must be 0-6, got {val}."),
        })
    }
}

impl TryFrom<i32> for FilterKind {
    type Error = anyhow::Error;

    fn try_from(val: i32) -> Result<Self> {
        Self::try_from(i64::from(val))
    }
}

/// Length of the overlap between the unit pixel centred at `x` and the box
/// `[-radius, radius]`. Box taps are weighted by this rather than by
/// [`FilterKind::weight`], so a pixel straddling two footprints is shared.
pub(crate) fn box_coverage(x: f64, radius: f64) -> f64 {
    ((x + 0.5).min(radius) - (x - 0.5).max(-radius)).max(0.0)
}

// Half-open so that a sample exactly between two pixels is counted once.
fn box_kernel(x: f64) -> f64 {
    if (-0.5..0.5).contains(&x) { 1.0 } else { 0.0 }
}

fn triangle(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 { 1.0 - x } else { 0.0 }
}

fn cubic_bspline(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        (4.0 - 6.0 * x * x + 3.0 * x * x * x) / 6.0
    } else if x < 2.0 {
        let t = 2.0 - x;
        t * t * t / 6.0
    } else {
        0.0
    }
}

fn catmull_rom(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        1.5 * x * x * x - 2.5 * x * x + 1.0
    } else if x < 2.0 {
        -0.5 * x * x * x + 2.5 * x * x - 4.0 * x + 2.0
    } else {
        0.0
    }
}

/// Mitchell-Netravali with B = C = 1/3.
fn mitchell(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        (7.0 * x * x * x - 12.0 * x * x + 16.0 / 3.0) / 6.0
    } else if x < 2.0 {
        (-7.0 / 3.0 * x * x * x + 12.0 * x * x - 20.0 * x + 32.0 / 3.0) / 6.0
    } else {
        0.0
    }
}
