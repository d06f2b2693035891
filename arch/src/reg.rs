use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// General purpose registers. `FP` and `SP` are naming conventions only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Reg {
    #[default]
    #[strum(to_string = "R0", serialize = "a", serialize = "00")]
    R0,
    #[strum(to_string = "R1", serialize = "b", serialize = "01")]
    R1,
    #[strum(to_string = "R2", serialize = "c", serialize = "10", serialize = "fp")]
    R2,
    #[strum(to_string = "R3", serialize = "d", serialize = "11", serialize = "sp")]
    R3,
}

impl Reg {
    pub const FP: Reg = Reg::R2;
    pub const SP: Reg = Reg::R3;

    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<Self>().ok()
    }

    /// 2-bit register field.
    pub fn bits(self) -> u8 {
        u8::from(self) & 0b11
    }

    pub fn from_bits(bits: u8) -> Self {
        Reg::from(bits & 0b11)
    }

    pub fn idx(self) -> usize {
        self.bits() as usize
    }
}
