// ----------------------------------------------------------------------------
// Word layout (bit 7 first)
//
//   00 oooo rr   single-register ops (oooo != 11xx)
//   00 11 r1 r2  mv
//   01 ff xx rr  add / sub (xx = reg1) , jcnd / jlnkcnd (xx = cond)
//   10 ofs r1 r2 ld
//   11 ofs r1 r2 st

use bimap::BiMap;
use once_cell::sync::Lazy;

use crate::{cond::Cond, error::CodecError, inst::Inst, op::OpKind, reg::Reg};

pub struct Head;

impl Head {
    pub const UNARY: u8 = 0b00;
    pub const BINARY: u8 = 0b01;
    pub const LD: u8 = 0b10;
    pub const ST: u8 = 0b11;
}

pub struct Func;

impl Func {
    pub const MV: u8 = 0b11;
    pub const ADD: u8 = 0b00;
    pub const SUB: u8 = 0b01;
    pub const JCND: u8 = 0b10;
    pub const JLNKCND: u8 = 0b11;
}

/// 4-bit opcode field of the single-register instructions.
static UNARY_BIN: Lazy<BiMap<OpKind, u8>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert(OpKind::NOP, 0b0000);
    map.insert(OpKind::INC, 0b0001);
    map.insert(OpKind::DEC, 0b0010);
    map.insert(OpKind::MVLNK, 0b0011);
    map.insert(OpKind::J, 0b0100);
    map.insert(OpKind::JLNK, 0b0101);
    map.insert(OpKind::IN, 0b0110);
    map.insert(OpKind::OUT, 0b0111);
    map.insert(OpKind::LSHFT, 0b1000);
    map.insert(OpKind::RSHFT, 0b1001);
    map.insert(OpKind::AND, 0b1010);
    map.insert(OpKind::SET, 0b1011);
    map
});

// ----------------------------------------------------------------------------

fn enc_format(head: u8, f1: u8, f2: u8, f3: u8) -> u8 {
    ((head & 0b11) << 6) | ((f1 & 0b11) << 4) | ((f2 & 0b11) << 2) | (f3 & 0b11)
}

fn dec_format(bin: u8) -> (u8, u8, u8, u8) {
    let head = (bin >> 6) & 0b11;
    let f1 = (bin >> 4) & 0b11;
    let f2 = (bin >> 2) & 0b11;
    let f3 = bin & 0b11;
    (head, f1, f2, f3)
}

// ----------------------------------------------------------------------------

impl Inst {
    pub fn to_bin(&self) -> u8 {
        match *self {
            Inst::MV(r1, r2) => enc_format(Head::UNARY, Func::MV, r1.bits(), r2.bits()),
            Inst::ADD(r1, r2) => enc_format(Head::BINARY, Func::ADD, r1.bits(), r2.bits()),
            Inst::SUB(r1, r2) => enc_format(Head::BINARY, Func::SUB, r1.bits(), r2.bits()),
            Inst::JCND(c, r) => enc_format(Head::BINARY, Func::JCND, c.bits(), r.bits()),
            Inst::JLNKCND(c, r) => enc_format(Head::BINARY, Func::JLNKCND, c.bits(), r.bits()),
            Inst::LD(r1, r2, ofs) => enc_format(Head::LD, ofs, r1.bits(), r2.bits()),
            Inst::ST(r1, r2, ofs) => enc_format(Head::ST, ofs, r1.bits(), r2.bits()),
            Inst::NOP => 0b0000_0000,
            unary => {
                let code = UNARY_BIN.get_by_left(&unary.kind()).copied().unwrap_or_default();
                let reg = unary.unary_reg().unwrap_or_default();
                enc_format(Head::UNARY, code >> 2, code, reg.bits())
            }
        }
    }

    /// `nop` only accepts a zero register field, so `000000rr` with `rr != 00` is
    /// the one pattern that matches no instruction.
    pub fn from_bin(bin: u8) -> Result<Inst, CodecError> {
        let (head, f1, f2, f3) = dec_format(bin);
        let inst = match head {
            Head::UNARY if f1 == Func::MV => Inst::MV(Reg::from_bits(f2), Reg::from_bits(f3)),
            Head::UNARY => {
                let code = (f1 << 2) | f2;
                let invalid = || CodecError::InvalidEncoding(fmt_word(bin));
                match UNARY_BIN.get_by_right(&code) {
                    Some(OpKind::NOP) if f3 != 0 => return Err(invalid()),
                    Some(kind) => Inst::unary(*kind, Reg::from_bits(f3)).ok_or_else(invalid)?,
                    None => return Err(invalid()),
                }
            }
            Head::BINARY => match f1 {
                Func::ADD => Inst::ADD(Reg::from_bits(f2), Reg::from_bits(f3)),
                Func::SUB => Inst::SUB(Reg::from_bits(f2), Reg::from_bits(f3)),
                Func::JCND => Inst::JCND(Cond::from_bits(f2), Reg::from_bits(f3)),
                _ => Inst::JLNKCND(Cond::from_bits(f2), Reg::from_bits(f3)),
            },
            Head::LD => Inst::LD(Reg::from_bits(f2), Reg::from_bits(f3), f1),
            _ => Inst::ST(Reg::from_bits(f2), Reg::from_bits(f3), f1),
        };
        Ok(inst)
    }

    /// Textual word, e.g. `"00101100"`.
    pub fn encode(&self) -> String {
        fmt_word(self.to_bin())
    }

    pub fn decode(word: &str) -> Result<Inst, CodecError> {
        parse_word(word).and_then(Inst::from_bin)
    }
}

pub fn fmt_word(bin: u8) -> String {
    format!("{:08b}", bin)
}

/// Parse exactly eight `0`/`1` characters, most significant bit first.
pub fn parse_word(word: &str) -> Result<u8, CodecError> {
    if word.len() != 8 || !word.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(CodecError::InvalidEncoding(word.to_string()));
    }
    u8::from_str_radix(word, 2).map_err(|_| CodecError::InvalidEncoding(word.to_string()))
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::Slot;
    use strum::IntoEnumIterator;

    #[test]
    fn test_format_all() {
        for bin in 0..=u8::MAX {
            let (head, f1, f2, f3) = dec_format(bin);
            assert_eq!(enc_format(head, f1, f2, f3), bin);
        }
    }

    #[test]
    fn test_word_all() {
        for bin in 0..=u8::MAX {
            match Inst::from_bin(bin) {
                Ok(inst) => assert_eq!(inst.to_bin(), bin, "{:08b} -> {:?}", bin, inst),
                Err(err) => {
                    assert!((1..=3).contains(&bin), "{:08b}: {}", bin, err);
                }
            }
        }
    }

    fn all_insts() -> Vec<Inst> {
        let mut insts = vec![Inst::NOP];
        for r1 in Reg::iter() {
            for kind in OpKind::iter() {
                if let Some(inst) = Inst::unary(kind, r1) {
                    if inst != Inst::NOP {
                        insts.push(inst);
                    }
                }
            }
            for r2 in Reg::iter() {
                insts.push(Inst::MV(r1, r2));
                insts.push(Inst::ADD(r1, r2));
                insts.push(Inst::SUB(r1, r2));
                for ofs in 0..4 {
                    insts.push(Inst::LD(r1, r2, ofs));
                    insts.push(Inst::ST(r1, r2, ofs));
                }
            }
            for c in Cond::iter() {
                insts.push(Inst::JCND(c, r1));
                insts.push(Inst::JLNKCND(c, r1));
            }
        }
        insts
    }

    #[test]
    fn test_inst_all() {
        let insts = all_insts();
        assert_eq!(insts.len(), 253);
        for inst in insts {
            let word = inst.encode();
            assert_eq!(Inst::decode(&word).unwrap(), inst, "{:?} -> {}", inst, word);
        }
    }

    macro_rules! test_enc {
        ($($name:ident: $inst:expr => $word:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = $inst;
                    assert_eq!(inst.encode(), $word);
                    assert_eq!(Inst::decode($word).unwrap(), inst);
                }
            )*
        }
    }

    test_enc! {
        enc_nop: Inst::NOP => "00000000",
        enc_inc: Inst::INC(Reg::R1) => "00000101",
        enc_dec: Inst::DEC(Reg::R3) => "00001011",
        enc_mvlnk: Inst::MVLNK(Reg::R0) => "00001100",
        enc_j: Inst::J(Reg::R0) => "00010000",
        enc_jlnk: Inst::JLNK(Reg::R2) => "00010110",
        enc_in: Inst::IN(Reg::R1) => "00011001",
        enc_out: Inst::OUT(Reg::R1) => "00011101",
        enc_lshft: Inst::LSHFT(Reg::R0) => "00100000",
        enc_rshft: Inst::RSHFT(Reg::R0) => "00100100",
        enc_and: Inst::AND(Reg::R3) => "00101011",
        enc_set: Inst::SET(Reg::R0) => "00101100",
        enc_mv: Inst::MV(Reg::R1, Reg::R2) => "00110110",
        enc_add: Inst::ADD(Reg::R0, Reg::R1) => "01000001",
        enc_sub: Inst::SUB(Reg::R3, Reg::R2) => "01011110",
        enc_jcnd: Inst::JCND(Cond::Z, Reg::R3) => "01101011",
        enc_jlnkcnd: Inst::JLNKCND(Cond::C, Reg::R1) => "01110101",
        enc_ld: Inst::LD(Reg::R0, Reg::R1, 2) => "10100001",
        enc_st: Inst::ST(Reg::R2, Reg::R3, 3) => "11111011",
    }

    #[test]
    fn set_data_word() {
        assert_eq!(Slot::Inst(Inst::SET(Reg::R0)).to_bin(), 0b0010_1100);
        assert_eq!(fmt_word(Slot::Imm(10).to_bin()), "00001010");
    }

    #[test]
    fn nop_with_register() {
        assert!(matches!(
            Inst::decode("00000001"),
            Err(CodecError::InvalidEncoding(w)) if w == "00000001"
        ));
    }

    #[test]
    fn invalid_encoding() {
        for word in ["", "0000000", "000000000", "0000000x", "0b000000", "ーーー"] {
            assert!(matches!(
                Inst::decode(word),
                Err(CodecError::InvalidEncoding(_))
            ));
        }
    }
}
