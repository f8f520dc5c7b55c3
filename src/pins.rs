//! GPIO pin assignments for the shop monitor board.
//!
//! Single source of truth: the sensor sampler and the GPIO adapter
//! reference this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Motion sensors (HC-SR501 PIR, push-pull output)
// ---------------------------------------------------------------------------

/// PIR over the main counter computer. HIGH = motion detected.
pub const MOTION_1_GPIO: i32 = 13;
/// PIR over the second computer. HIGH = motion detected.
pub const MOTION_2_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Magnetic contacts (reed switches to GND, internal pull-up enabled)
// ---------------------------------------------------------------------------

/// Front shutter contact. LOW = closed (magnet present), HIGH = open.
pub const SHUTTER_GPIO: i32 = 14;
/// Cash drawer contact. LOW = closed, HIGH = open.
pub const DRAWER_GPIO: i32 = 27;
/// Office door contact. LOW = closed, HIGH = open.
pub const OFFICE_DOOR_GPIO: i32 = 25;
