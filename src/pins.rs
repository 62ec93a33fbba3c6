//! GPIO assignments for the press station front panel.
//!
//! Single source of truth: `main` claims every pin through these numbers.

// ---------------------------------------------------------------------------
// Buttons (active LOW, internal pull-up)
// ---------------------------------------------------------------------------

pub const START_STOP_BUTTON_GPIO: i32 = 15;
pub const MAINTENANCE_BUTTON_GPIO: i32 = 5;
pub const QUALITY_BUTTON_GPIO: i32 = 21;
pub const MATERIAL_BUTTON_GPIO: i32 = 12;
pub const TOOL_CHANGE_BUTTON_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Status LEDs (active HIGH)
// ---------------------------------------------------------------------------

pub const RED_LED_GPIO: i32 = 2;
pub const GREEN_LED_GPIO: i32 = 4;

pub const ALL_GPIOS: [i32; 7] = [
    START_STOP_BUTTON_GPIO,
    MAINTENANCE_BUTTON_GPIO,
    QUALITY_BUTTON_GPIO,
    MATERIAL_BUTTON_GPIO,
    TOOL_CHANGE_BUTTON_GPIO,
    RED_LED_GPIO,
    GREEN_LED_GPIO,
];
