//! Emergency marker convention.
//!
//! A reply that starts with [`EMERGENCY_MARKER`] tells the caller to
//! escalate to the hospital alert flow. The backend only detects it; the
//! alert itself is a separate, explicit call.

/// U+1F6A8 POLICE CARS REVOLVING LIGHT followed by " EMERGENCY".
pub const EMERGENCY_MARKER: &str = "\u{1F6A8} EMERGENCY";

/// UTF-8 encoding of [`EMERGENCY_MARKER`]. Pinned so an encoding change
/// anywhere upstream shows up as a failing test instead of silent misses.
pub const EMERGENCY_MARKER_BYTES: &[u8] = &[
    0xF0, 0x9F, 0x9A, 0xA8, b' ', b'E', b'M', b'E', b'R', b'G', b'E', b'N', b'C', b'Y',
];

/// Byte-exact, case-sensitive prefix match against [`EMERGENCY_MARKER`].
pub fn is_emergency_trigger(text: &str) -> bool {
    text.as_bytes().starts_with(EMERGENCY_MARKER_BYTES)
}
