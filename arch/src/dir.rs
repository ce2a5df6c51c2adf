use strum::{Display, EnumString};

/// Assembler directives. Kept apart from the instruction table so the
/// parser can tell which statement variant a line produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum DirKind {
    START,
    END,
    RESW,
    RESB,
    BYTE,
    WORD,
}

impl DirKind {
    pub fn parse(s: &str) -> Option<Self> {
        s.to_ascii_uppercase().parse::<Self>().ok()
    }
}

#[test]
fn test() {
    assert_eq!(DirKind::parse("start"), Some(DirKind::START));
    assert_eq!(DirKind::parse("RESW"), Some(DirKind::RESW));
    assert_eq!(DirKind::parse("LDA"), None);
}
