//! Movie parameters for SVGA documents

/// Frame rates accepted by SVGA players, ascending
pub const ALLOWED_FPS: [u32; 11] = [1, 2, 3, 5, 6, 10, 12, 15, 20, 30, 60];

/// A frame rate guaranteed to be one of [`ALLOWED_FPS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Fps(u32);

impl Fps {
    /// Snaps a requested frame rate to the nearest allowed value.
    ///
    /// The allow-list is scanned in ascending order and the first candidate
    /// with the minimum distance wins, so a request exactly between two
    /// allowed values resolves to the lower one (`4` becomes `3`).
    pub fn snap(requested: i64) -> Self {
        let mut best = ALLOWED_FPS[0];
        let mut best_distance = requested.abs_diff(best as i64);
        for &candidate in &ALLOWED_FPS[1..] {
            let distance = requested.abs_diff(candidate as i64);
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        Self(best)
    }

    /// Returns the fps value if it is exactly one of the allowed rates
    pub fn new(value: u32) -> Option<Self> {
        ALLOWED_FPS.contains(&value).then_some(Self(value))
    }

    /// Returns the frame rate as an integer
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(30)
    }
}

impl From<Fps> for u32 {
    fn from(fps: Fps) -> Self {
        fps.0
    }
}

impl TryFrom<u32> for Fps {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Fps::new(value).ok_or_else(|| format!("fps {value} is not one of {ALLOWED_FPS:?}"))
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Global movie parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationParams {
    /// Width of the view box in points
    pub view_box_width: f32,
    /// Height of the view box in points
    pub view_box_height: f32,
    /// Playback frame rate
    pub fps: Fps,
    /// Number of timeline positions every sprite must cover
    pub frame_count: u32,
}

impl AnimationParams {
    /// Creates parameters for a canvas of `width` x `height` pixels
    pub fn new(width: u32, height: u32, fps: Fps, frame_count: u32) -> Self {
        Self {
            view_box_width: width as f32,
            view_box_height: height as f32,
            fps,
            frame_count,
        }
    }

    /// Total playback duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.frame_count as u64 * 1000 / self.fps.get() as u64
    }
}
