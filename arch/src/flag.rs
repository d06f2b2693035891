use color_print::cformat;
use serde::{Deserialize, Serialize};

use crate::cond::Cond;

/// 4-bit flag register: `N Z C V` from bit 3 down to bit 0.
///
/// Nothing ever sets `V`; it stays 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flags(u8);

impl Flags {
    pub const V: u8 = 0b0001;
    pub const C: u8 = 0b0010;
    pub const Z: u8 = 0b0100;
    pub const N: u8 = 0b1000;

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn get(&self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    pub fn set(&mut self, mask: u8, v: bool) {
        if v {
            self.0 |= mask & 0xF;
        } else {
            self.0 &= !mask;
        }
    }

    pub fn test(&self, cond: Cond) -> bool {
        self.get(cond.mask())
    }

    /// Update Z and N from an 8-bit result.
    pub fn set_zn(&mut self, value: u8) {
        self.set(Flags::Z, value == 0);
        self.set(Flags::N, value & 0x80 != 0);
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

impl std::fmt::Display for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bit = |mask, c| if self.get(mask) { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            bit(Flags::N, 'N'),
            bit(Flags::Z, 'Z'),
            bit(Flags::C, 'C'),
            bit(Flags::V, 'V')
        )
    }
}

impl Flags {
    pub fn cformat(&self) -> String {
        cformat!("<y>{}</>", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut f = Flags::default();
        f.set(Flags::Z | Flags::C, true);
        assert_eq!(f.bits(), 0b0110);
        f.set(Flags::C, false);
        assert_eq!(f.bits(), 0b0100);
        assert!(f.test(Cond::Z));
        assert!(!f.test(Cond::C));
        assert_eq!(f.to_string(), "-Z--");
    }

    #[test]
    fn zn() {
        let mut f = Flags::default();
        f.set_zn(0x80);
        assert_eq!(f.to_string(), "N---");
        f.set_zn(0);
        assert_eq!(f.to_string(), "-Z--");
    }
}
