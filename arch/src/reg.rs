use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// SIC/XE registers with their format-2 encoding numbers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Reg {
    A = 0,
    X = 1,
    L = 2,
    B = 3,
    S = 4,
    T = 5,
    F = 6,
    PC = 8,
    SW = 9,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    /// Encoding number packed into format-2 nibbles.
    pub fn num(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("a"), Ok(Reg::A));
    assert_eq!(Reg::parse("pc"), Ok(Reg::PC));
    assert!(Reg::parse("hoge").is_err());
    assert_eq!(Reg::A.num(), 0);
    assert_eq!(Reg::PC.num(), 8);
    assert_eq!(Reg::SW.num(), 9);
    assert_eq!(Reg::try_from(4u8).ok(), Some(Reg::S));
    assert!(Reg::try_from(7u8).is_err());
}
