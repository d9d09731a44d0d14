//! Prize Wheel - spin-the-wheel engine for picking winners
//!
//! Core modules:
//! - `entries`: Entry parsing and winner exclusion
//! - `customization`: Wheel look and winner settings
//! - `sim`: Deterministic spin state machine, multi-winner sequencing, timers
//! - `renderer`: Wheel drawing onto a 2D surface
//! - `platform`: Browser glue (canvas surface, image loading)
//! - `effects`: Winner celebration particle bursts

pub mod assets;
pub mod customization;
pub mod effects;
pub mod entries;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use customization::{Customization, HexColor, Rgba, TextColor, WinnerCount, WinnerEffect};
pub use entries::{EntryImport, exclude, parse_entries};
pub use error::{AssetError, ConfigurationMissingError, StateError, ValidationError, WheelError};
pub use session::WheelLaunch;
pub use settings::EngineSettings;

/// Engine configuration constants
pub mod consts {
    /// Degrees in a full turn
    pub const FULL_TURN: f64 = 360.0;

    /// Default canvas edge length (device-independent pixels)
    pub const CANVAS_SIZE: f32 = 380.0;
    /// Gap between the canvas edge and the wheel rim
    pub const WHEEL_MARGIN: f32 = 10.0;

    /// Labels are right-aligned at this fraction of the radius
    pub const LABEL_RADIUS_FACTOR: f32 = 0.75;
    /// Labels wider than this fraction of the radius get truncated
    pub const LABEL_MAX_WIDTH_FACTOR: f32 = 0.6;
    /// Characters reserved for the ellipsis when truncating
    pub const ELLIPSIS: &str = "...";
    /// Label font
    pub const LABEL_FONT: &str = "14px Arial, sans-serif";

    /// Center hub radius as a fraction of the wheel radius
    pub const HUB_RADIUS_FACTOR: f32 = 0.1;
    /// Logo circle radius as a fraction of the wheel radius
    pub const LOGO_RADIUS_FACTOR: f32 = 0.2;
    /// Background image opacity inside the wheel
    pub const BACKGROUND_ALPHA: f32 = 0.15;

    /// Winner count bounds
    pub const MIN_WINNERS: u8 = 1;
    pub const MAX_WINNERS: u8 = 10;

    /// Minimum full turns for a perceptible spin
    pub const MIN_FULL_TURNS: u32 = 3;

    /// Longest step one animation frame may advance the engine clock (ms).
    /// A throttled or hidden page pauses the draw instead of skipping ahead.
    pub const MAX_FRAME_STEP_MS: f64 = 100.0;

    /// Entry count above which a performance warning is raised (not blocking)
    pub const LARGE_DATASET_WARNING: usize = 200_000;

    /// Upload ceilings in bytes
    pub const LOGO_MAX_BYTES: u64 = 5 * 1024 * 1024;
    pub const BACKGROUND_MAX_BYTES: u64 = 10 * 1024 * 1024;
    pub const ENTRY_FILE_MAX_BYTES: u64 = 50 * 1024 * 1024;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= consts::FULL_TURN { 0.0 } else { a }
}
