use arch::dir::DirKind;
use arch::errno;
use arch::op::{self, ArgKind, Opcode};
use color_print::cformat;

use crate::error::Error;
use crate::operand::{self, Flag, Operand};

// ----------------------------------------------------------------------------
// Line fields

// Fixed column layout of a source line:
//   0-6   label
//   8-13  operator
//   15-34 operand
//   35-   comment

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub label: Option<String>,
    pub operator: String,
    pub operand: String,
    pub comment: String,
}

/// Slice one line into its fixed columns and validate the identifiers.
/// Label and operator are upper-cased; the operand field is preserved
/// verbatim because character literals are case-sensitive.
pub fn tokenize(line: &str) -> Result<Fields, Error> {
    let label = field(line, 0, 7).to_ascii_uppercase();
    let operator = field(line, 8, 14).to_ascii_uppercase();
    let operand = field(line, 15, 35);
    let comment = field(line, 35, usize::MAX);

    if !label.is_empty() && !is_ident(&label) {
        return Err(Error::Syntax(errno::BAD_LABEL));
    }
    if !is_ident(operator.strip_prefix('+').unwrap_or(&operator)) {
        return Err(Error::Syntax(errno::BAD_OPERATOR));
    }
    Ok(Fields {
        label: if label.is_empty() { None } else { Some(label) },
        operator,
        operand,
        comment,
    })
}

fn field(line: &str, from: usize, to: usize) -> String {
    line.chars()
        .skip(from)
        .take(to.saturating_sub(from))
        .collect::<String>()
        .trim()
        .to_string()
}

// Leading letter or underscore, then letters, digits and underscores.
fn is_ident(s: &str) -> bool {
    let mut cs = s.chars();
    match cs.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    cs.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Inst(Inst),
    Dir(Dir),
    Comment(Comment),
}

impl Stmt {
    /// Parse one non-blank source line at program counter `pc`.
    pub fn parse(lineno: usize, raw: &str, pc: u32) -> Result<Stmt, Error> {
        if let Some(mark) = raw.trim_start().chars().next() {
            if mark == '.' || mark == ';' {
                return Ok(Stmt::Comment(Comment {
                    lineno,
                    content: raw.trim_end().to_string(),
                }));
            }
        }
        let fields = tokenize(raw)?;
        if op::opcode(fields.operator.trim_start_matches('+')).is_some() {
            return Ok(Stmt::Inst(Inst::parse(lineno, pc, fields)?));
        }
        if let Some(kind) = DirKind::parse(&fields.operator) {
            return Ok(Stmt::Dir(Dir::parse(lineno, pc, kind, fields)?));
        }
        Err(Error::UnknownOperator(fields.operator))
    }

    pub fn lineno(&self) -> usize {
        match self {
            Stmt::Inst(i) => i.lineno,
            Stmt::Dir(d) => d.lineno,
            Stmt::Comment(c) => c.lineno,
        }
    }

    /// Byte offset assigned when the statement was parsed.
    pub fn offset(&self) -> u32 {
        match self {
            Stmt::Inst(i) => i.offset,
            Stmt::Dir(d) => d.offset,
            Stmt::Comment(_) => 0,
        }
    }

    /// Bytes the statement occupies in the program image.
    pub fn size(&self) -> u32 {
        match self {
            Stmt::Inst(i) => i.size,
            Stmt::Dir(d) => d.size,
            Stmt::Comment(_) => 0,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Stmt::Inst(i) => i.label.as_deref(),
            Stmt::Dir(d) => d.label.as_deref(),
            Stmt::Comment(_) => None,
        }
    }

    /// Object code as uppercase hex digits; empty for non-emitting statements.
    pub fn assemble(&self) -> String {
        match self {
            Stmt::Inst(i) => i.assemble(),
            Stmt::Dir(d) => d.assemble(),
            Stmt::Comment(_) => String::new(),
        }
    }

    /// Reserve directives force a Text record break.
    pub fn is_reserve(&self) -> bool {
        matches!(
            self,
            Stmt::Dir(d) if matches!(d.kind, DirKind::RESW | DirKind::RESB)
        )
    }

    pub fn operator_text(&self) -> String {
        match self {
            Stmt::Inst(i) => i.operator_text(),
            Stmt::Dir(d) => d.kind.to_string(),
            Stmt::Comment(_) => String::new(),
        }
    }

    pub fn operand_text(&self) -> &str {
        match self {
            Stmt::Inst(i) => &i.operand_text,
            Stmt::Dir(d) => &d.operand_text,
            Stmt::Comment(_) => "",
        }
    }

    pub fn comment_text(&self) -> &str {
        match self {
            Stmt::Inst(i) => &i.comment,
            Stmt::Dir(d) => &d.comment,
            Stmt::Comment(c) => &c.content,
        }
    }

    pub fn cformat(&self) -> String {
        match self {
            Stmt::Inst(i) => cformat!(
                "<green>{:04X}</> | {:<14} | {:<8} <red>{:<7}</> <blue>{:<19}</> {}",
                i.offset,
                i.assemble(),
                i.label.as_deref().unwrap_or(""),
                i.operator_text(),
                i.operand_text,
                i.comment
            ),
            Stmt::Dir(d) => cformat!(
                "<green>{:04X}</> | {:<14} | {:<8} <yellow>{:<7}</> {:<19} {}",
                d.offset,
                d.assemble(),
                d.label.as_deref().unwrap_or(""),
                d.kind.to_string(),
                d.operand_text,
                d.comment
            ),
            Stmt::Comment(c) => cformat!("     | {:<14} | {}", "", c.content),
        }
    }
}

// ----------------------------------------------------------------------------
// Instruction

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inst {
    pub lineno: usize,
    pub offset: u32,
    pub label: Option<String>,
    /// Mnemonic without the extend marker.
    pub mnemonic: String,
    pub code: u8,
    pub format: u8,
    pub size: u32,
    pub operands: Vec<Operand>,
    pub flags: Vec<Flag>,
    pub valid: bool,
    pub diag: Option<String>,
    pub operand_text: String,
    pub comment: String,
}

impl Inst {
    fn parse(lineno: usize, pc: u32, fields: Fields) -> Result<Inst, Error> {
        let extended = fields.operator.starts_with('+');
        let mnemonic = fields.operator.trim_start_matches('+').to_string();
        let opcode =
            op::opcode(&mnemonic).ok_or_else(|| Error::UnknownOperator(mnemonic.clone()))?;

        let mut flags = Vec::new();
        let format = if extended {
            if !opcode.formats.contains(&4) {
                return Err(Error::InvalidExtendFlag(fields.operator.clone()));
            }
            flags.push(Flag::Extend);
            4
        } else if opcode.formats.len() > 1 {
            3
        } else {
            opcode.formats.first().copied().unwrap_or(3)
        };
        if opcode.sicxe {
            flags.push(Flag::Sicxe);
        }

        let mut operands = Vec::new();
        if !fields.operand.is_empty() {
            let mut tokens: Vec<&str> = fields.operand.split(',').map(str::trim).collect();
            if tokens.iter().any(|t| t.eq_ignore_ascii_case("X")) {
                flags.push(Flag::Index);
                tokens.retain(|t| !t.eq_ignore_ascii_case("X"));
            }
            for tok in tokens {
                let (opnd, flag) = operand::parse(tok);
                if let Some(flag) = flag {
                    if !flags.contains(&flag) {
                        flags.push(flag);
                    }
                }
                operands.push(opnd);
            }
        }

        let (valid, diag) = validate(opcode, &operands);
        Ok(Inst {
            lineno,
            offset: pc,
            label: fields.label,
            mnemonic,
            code: opcode.code,
            format,
            size: format as u32,
            operands,
            flags,
            valid,
            diag,
            operand_text: fields.operand,
            comment: fields.comment,
        })
    }

    /// Addressing bits packed into the low two bits of the opcode byte.
    fn ni_bits(&self) -> u8 {
        if self.flags.contains(&Flag::Immediate) {
            0b01
        } else if self.flags.contains(&Flag::Indirect) {
            0b10
        } else if self.flags.contains(&Flag::PcRel) || self.flags.contains(&Flag::BaseRel) {
            0b11
        } else {
            0b00
        }
    }

    /// Displacement or address field value; unresolved symbols encode as 0.
    fn disp(&self) -> u32 {
        match self.operands.first() {
            Some(Operand::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn assemble(&self) -> String {
        let byte0 = self.code | self.ni_bits();
        match self.format {
            1 => format!("{:02X}", byte0),
            2 => {
                let hi = self.operands.first().map(nibble).unwrap_or(0);
                let lo = self.operands.get(1).map(nibble).unwrap_or(0);
                format!("{:02X}{:X}{:X}", byte0, hi & 0xF, lo & 0xF)
            }
            4 => {
                let mut field = self.disp() & 0x000F_FFFF;
                if self.flags.contains(&Flag::Extend) {
                    field |= 0x0010_0000;
                }
                if self.flags.contains(&Flag::PcRel) {
                    field |= 0x0020_0000;
                }
                if self.flags.contains(&Flag::BaseRel) {
                    field |= 0x0040_0000;
                }
                if self.flags.contains(&Flag::Index) {
                    field |= 0x0080_0000;
                }
                format!("{:02X}{:06X}", byte0, field)
            }
            // Format 3: 12-bit displacement, 0x1000 reserved for extend.
            _ => {
                let mut field = self.disp() & 0x0FFF;
                if self.flags.contains(&Flag::PcRel) {
                    field |= 0x2000;
                }
                if self.flags.contains(&Flag::BaseRel) {
                    field |= 0x4000;
                }
                if self.flags.contains(&Flag::Index) {
                    field |= 0x8000;
                }
                format!("{:02X}{:04X}", byte0, field)
            }
        }
    }

    /// Mnemonic with the extend marker restored, for listing output.
    pub fn operator_text(&self) -> String {
        if self.flags.contains(&Flag::Extend) {
            format!("+{}", self.mnemonic)
        } else {
            self.mnemonic.clone()
        }
    }
}

fn nibble(opnd: &Operand) -> u8 {
    match opnd {
        Operand::Reg(r) => r.num(),
        Operand::Int(v) => *v as u8,
        _ => 0,
    }
}

/// Compare the declared argument kinds against the parsed operands,
/// position by position. `general` accepts anything.
fn validate(opcode: &Opcode, operands: &[Operand]) -> (bool, Option<String>) {
    if opcode.args.len() != operands.len() {
        return (
            false,
            Some(format!(
                "expected {} operand(s) ({}), found {} ({})",
                opcode.args.len(),
                expected_shape(&opcode.args),
                operands.len(),
                actual_shape(operands)
            )),
        );
    }
    for (want, got) in opcode.args.iter().zip(operands) {
        let ok = match want {
            ArgKind::General => true,
            ArgKind::Register => matches!(got, Operand::Reg(_)),
            ArgKind::Numeric => matches!(got, Operand::Int(_)),
        };
        if !ok {
            return (
                false,
                Some(format!(
                    "expected ({}), found ({})",
                    expected_shape(&opcode.args),
                    actual_shape(operands)
                )),
            );
        }
    }
    (true, None)
}

fn expected_shape(args: &[ArgKind]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn actual_shape(operands: &[Operand]) -> String {
    operands
        .iter()
        .map(|o| o.kind().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ----------------------------------------------------------------------------
// Directive

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dir {
    pub lineno: usize,
    pub offset: u32,
    pub label: Option<String>,
    pub kind: DirKind,
    pub operand: Option<Operand>,
    pub size: u32,
    pub operand_text: String,
    pub comment: String,
}

impl Dir {
    fn parse(lineno: usize, pc: u32, kind: DirKind, fields: Fields) -> Result<Dir, Error> {
        let text = fields.operand;
        let (offset, operand, size) = match kind {
            DirKind::START => {
                if fields.label.is_none() {
                    return Err(Error::Directive(errno::START_NO_LABEL));
                }
                if text.is_empty() {
                    return Err(Error::Directive(errno::START_NO_OPERAND));
                }
                let addr = u32::from_str_radix(&text, 16)
                    .map_err(|_| Error::Directive(errno::START_NOT_HEX))?;
                // Offset and size both equal the load address; pass 1
                // starts the program counter at zero.
                (addr, Some(Operand::Int(addr)), addr)
            }
            DirKind::RESW => {
                let count = operand::parse_int(&text).unwrap_or(0);
                (pc, Some(Operand::Int(count)), count * 3)
            }
            DirKind::RESB => {
                let count = operand::parse_int(&text).unwrap_or(0);
                (pc, Some(Operand::Int(count)), count)
            }
            DirKind::BYTE => {
                let (operand, size) = parse_literal(&text, 1);
                (pc, operand, size)
            }
            DirKind::WORD => {
                let (operand, size) = parse_literal(&text, 3);
                (pc, operand, size)
            }
            DirKind::END => {
                let operand = (!text.is_empty()).then(|| Operand::Sym(text.to_ascii_uppercase()));
                (pc, operand, 0)
            }
        };
        Ok(Dir {
            lineno,
            offset,
            label: fields.label,
            kind,
            operand,
            size,
            operand_text: text,
            comment: fields.comment,
        })
    }

    /// Only BYTE/WORD contribute object bytes.
    pub fn assemble(&self) -> String {
        let width = match self.kind {
            DirKind::BYTE => 1usize,
            DirKind::WORD => 3usize,
            _ => return String::new(),
        };
        let mask = if width == 1 { 0xFF } else { 0xFF_FFFF };
        match &self.operand {
            Some(Operand::Int(v)) => format!("{:0w$X}", v & mask, w = width * 2),
            Some(Operand::Hex(v)) => format!("{:0w$X}", v & mask, w = width * 2),
            Some(Operand::Chars(bytes)) => bytes.iter().map(|b| format!("{:02X}", b)).collect(),
            // Unresolved data operand emits zero bytes.
            _ => "0".repeat(width * 2),
        }
    }
}

/// BYTE/WORD literal: bare integer, C'...' characters or X'...' hex;
/// anything else is left as a symbol reference.
fn parse_literal(text: &str, width: u32) -> (Option<Operand>, u32) {
    if text.is_empty() {
        return (None, width);
    }
    if let Some(v) = operand::parse_int(text) {
        return (Some(Operand::Int(v)), width);
    }
    if let Some(body) = strip_quoted(text, 'C') {
        let bytes: Vec<u8> = body.bytes().collect();
        let size = bytes.len() as u32;
        return (Some(Operand::Chars(bytes)), size);
    }
    if let Some(body) = strip_quoted(text, 'X') {
        if let Ok(v) = u32::from_str_radix(body, 16) {
            return (Some(Operand::Hex(v)), width);
        }
    }
    (Some(Operand::Sym(text.to_ascii_uppercase())), width)
}

fn strip_quoted(text: &str, marker: char) -> Option<&str> {
    let rest = text
        .strip_prefix(marker)
        .or_else(|| text.strip_prefix(marker.to_ascii_lowercase()))?;
    rest.strip_prefix('\'')?.strip_suffix('\'')
}

// ----------------------------------------------------------------------------
// Comment

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub lineno: usize,
    pub content: String,
}

// ----------------------------------------------------------------------------
