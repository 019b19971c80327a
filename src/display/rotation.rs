/// A rotation in quarter turns, as reported for the screen or the camera sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl DisplayRotation {
    /// Anything other than 0, 90, 180 or 270 is treated as 0.
    pub const fn from_degrees(degrees: i32) -> Self {
        match degrees {
            90 => Self::Deg90,
            180 => Self::Deg180,
            270 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn degrees(self) -> i32 {
        self.index() as i32 * 90
    }

    pub const fn rotated_cw(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }
}

/// Relative quarter turns between screen and sensor, always in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationIndex(u8);

impl OrientationIndex {
    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

pub fn reconcile(screen_degrees: i32, sensor_degrees: i32) -> OrientationIndex {
    let screen = i32::from(DisplayRotation::from_degrees(screen_degrees).index());
    let sensor = i32::from(DisplayRotation::from_degrees(sensor_degrees).index());

    let mut ret = screen - sensor;
    if ret < 0 {
        ret += 4;
    }

    OrientationIndex((ret % 4) as u8)
}
