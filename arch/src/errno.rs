use once_cell::sync::Lazy;

pub const BAD_LABEL: u8 = 0;
pub const BAD_OPERATOR: u8 = 1;
pub const START_NO_LABEL: u8 = 2;
pub const START_NO_OPERAND: u8 = 3;
pub const START_NOT_HEX: u8 = 4;

static MESSAGES: Lazy<Vec<String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../messages.json")).expect("messages.json is broken")
});

/// Human readable text for a numeric error code.
pub fn message(code: u8) -> &'static str {
    MESSAGES
        .get(code as usize)
        .map(|s| s.as_str())
        .unwrap_or("unknown error")
}

#[test]
fn test() {
    assert_eq!(message(BAD_LABEL), "invalid label syntax");
    assert_eq!(message(START_NOT_HEX), "START operand must be a hexadecimal address");
    assert_eq!(message(99), "unknown error");
}
