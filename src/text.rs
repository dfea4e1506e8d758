//! Display formatting for matched bytes. Best-effort only; nothing here makes
//! a data-integrity decision.

/// How a payload window should be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The window decoded as clean printable text (NUL-terminated).
    Text(String),
    /// Fallback: the full window as a lowercase hex string.
    Hex(String),
}

/// Interpret matched bytes as text where that is clean, otherwise fall back
/// to a hex dump. The text path stops at the first NUL since the window is a
/// fixed-size read past the end of the actual match.
#[must_use]
pub fn render_payload(data: &[u8]) -> Payload {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    match std::str::from_utf8(&data[..end]) {
        Ok(text) if !text.is_empty() && text.chars().all(is_displayable) => {
            Payload::Text(text.to_string())
        }
        _ => Payload::Hex(hex_string(data)),
    }
}

fn is_displayable(c: char) -> bool {
    !c.is_control() || c == '\n' || c == '\r' || c == '\t'
}

fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}
