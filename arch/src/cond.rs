use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Condition code of `jcnd` / `jlnkcnd`. Selects flag bit `1 << cnd`.
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
pub enum Cond {
    #[default]
    #[strum(to_string = "V", serialize = "00")]
    V,
    #[strum(to_string = "C", serialize = "01")]
    C,
    #[strum(to_string = "Z", serialize = "10")]
    Z,
    #[strum(to_string = "N", serialize = "11")]
    N,
}

impl Cond {
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<Self>().ok()
    }

    pub fn bits(self) -> u8 {
        u8::from(self) & 0b11
    }

    pub fn from_bits(bits: u8) -> Self {
        Cond::from(bits & 0b11)
    }

    /// Flag register mask tested by this condition.
    pub fn mask(self) -> u8 {
        1 << self.bits()
    }
}
