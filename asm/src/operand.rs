use arch::reg::Reg;
use color_print::cformat;

// ----------------------------------------------------------------------------
// Operand

/// A single typed operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Int(u32),
    Reg(Reg),
    Sym(String),
    /// C'...' character literal of a data directive.
    Chars(Vec<u8>),
    /// X'...' hex literal of a data directive.
    Hex(u32),
}

impl Operand {
    /// Type name used in validation diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Int(_) => "integer",
            Operand::Reg(_) => "register",
            Operand::Sym(_) => "symbol",
            Operand::Chars(_) => "chars",
            Operand::Hex(_) => "hex",
        }
    }

    pub fn cformat(&self) -> String {
        match self {
            Operand::Int(v) => cformat!("<yellow>{}</>", v),
            Operand::Reg(r) => cformat!("<blue>{}</>", r),
            Operand::Sym(s) => cformat!("<underline>{}</>", s),
            Operand::Chars(b) => cformat!("<yellow>{} byte(s)</>", b.len()),
            Operand::Hex(v) => cformat!("<yellow>X'{:X}'</>", v),
        }
    }
}

// ----------------------------------------------------------------------------
// Addressing flags

/// Addressing and format flags attached to an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Extend,
    Index,
    Immediate,
    Indirect,
    PcRel,
    BaseRel,
    Sicxe,
}

// ----------------------------------------------------------------------------
// Parsing

/// Parse one instruction operand token. `#` marks immediate and `@` marks
/// indirect addressing; the marker is stripped before the token is typed.
pub fn parse(token: &str) -> (Operand, Option<Flag>) {
    let (tok, flag) = match token.strip_prefix('#') {
        Some(rest) => (rest, Some(Flag::Immediate)),
        None => match token.strip_prefix('@') {
            Some(rest) => (rest, Some(Flag::Indirect)),
            None => (token, None),
        },
    };
    (classify(tok), flag)
}

/// Type a bare token: decimal integer, hex integer, register name, or
/// failing all of those, a symbol reference.
fn classify(tok: &str) -> Operand {
    if let Some(v) = parse_int(tok) {
        return Operand::Int(v);
    }
    if let Ok(reg) = Reg::parse(tok) {
        return Operand::Reg(reg);
    }
    Operand::Sym(tok.to_ascii_uppercase())
}

/// Integer literal in decimal, `0x`-prefixed hex or `h`-suffixed hex form.
pub fn parse_int(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok();
    }
    if let Some(hex) = s.strip_suffix('h').or_else(|| s.strip_suffix('H')) {
        return u32::from_str_radix(hex, 16).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_int("10"), Some(10));
        assert_eq!(parse_int("0x10"), Some(16));
        assert_eq!(parse_int("10h"), Some(16));
        assert_eq!(parse_int("0FFH"), Some(255));
        assert_eq!(parse_int("TEN"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn markers() {
        assert_eq!(parse("#5"), (Operand::Int(5), Some(Flag::Immediate)));
        assert_eq!(
            parse("@BUFFER"),
            (Operand::Sym("BUFFER".into()), Some(Flag::Indirect))
        );
        assert_eq!(parse("T"), (Operand::Reg(Reg::T), None));
    }

    #[test]
    fn symbols_uppercase() {
        assert_eq!(parse("alpha"), (Operand::Sym("ALPHA".into()), None));
    }
}
