use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Operand kind an instruction declares for each argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArgKind {
    /// Register name.
    Register,
    /// Any operand: address, symbol, register or literal.
    General,
    /// Plain integer.
    Numeric,
}

/// One entry of the instruction table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opcode {
    pub args: Vec<ArgKind>,
    pub formats: Vec<u8>,
    pub code: u8,
    pub sicxe: bool,
}

static OPCODES: Lazy<IndexMap<String, Opcode>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../opcodes.json")).expect("opcodes.json is broken")
});

/// Look up an instruction mnemonic, case-insensitive.
pub fn opcode(mnemonic: &str) -> Option<&'static Opcode> {
    OPCODES.get(&mnemonic.to_ascii_uppercase())
}

#[test]
fn test() {
    let lda = opcode("lda").unwrap();
    assert_eq!(lda.code, 0x00);
    assert_eq!(lda.formats, vec![3, 4]);
    assert_eq!(lda.args, vec![ArgKind::General]);
    assert!(lda.sicxe);

    let rsub = opcode("RSUB").unwrap();
    assert!(rsub.args.is_empty());

    let addr = opcode("ADDR").unwrap();
    assert_eq!(addr.formats, vec![2]);
    assert_eq!(addr.code, 0x90);

    assert_eq!(opcode("TIO").unwrap().formats, vec![1]);
    assert!(opcode("FOOBAR").is_none());
}
