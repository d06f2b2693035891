use crate::{cond::Cond, op::OpKind, reg::Reg};

use color_print::cformat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inst {
    NOP,
    INC(Reg),
    DEC(Reg),
    MVLNK(Reg),
    J(Reg),
    JLNK(Reg),
    IN(Reg),
    OUT(Reg),
    LSHFT(Reg),
    RSHFT(Reg),
    AND(Reg),
    /// Followed by one raw data word holding the value.
    SET(Reg),

    MV(Reg, Reg),
    ADD(Reg, Reg),
    SUB(Reg, Reg),
    JCND(Cond, Reg),
    JLNKCND(Cond, Reg),

    /// `ld reg1, ofs[reg2]`: reg1 = mem[reg2 - ofs]
    LD(Reg, Reg, u8),
    /// `st reg1, ofs[reg2]`: mem[reg2 - ofs] = reg1
    ST(Reg, Reg, u8),
}

impl Inst {
    pub fn kind(&self) -> OpKind {
        match self {
            Inst::NOP => OpKind::NOP,
            Inst::INC(_) => OpKind::INC,
            Inst::DEC(_) => OpKind::DEC,
            Inst::MVLNK(_) => OpKind::MVLNK,
            Inst::J(_) => OpKind::J,
            Inst::JLNK(_) => OpKind::JLNK,
            Inst::IN(_) => OpKind::IN,
            Inst::OUT(_) => OpKind::OUT,
            Inst::LSHFT(_) => OpKind::LSHFT,
            Inst::RSHFT(_) => OpKind::RSHFT,
            Inst::AND(_) => OpKind::AND,
            Inst::SET(_) => OpKind::SET,
            Inst::MV(_, _) => OpKind::MV,
            Inst::ADD(_, _) => OpKind::ADD,
            Inst::SUB(_, _) => OpKind::SUB,
            Inst::JCND(_, _) => OpKind::JCND,
            Inst::JLNKCND(_, _) => OpKind::JLNKCND,
            Inst::LD(_, _, _) => OpKind::LD,
            Inst::ST(_, _, _) => OpKind::ST,
        }
    }

    /// Build a single-register instruction (`nop` ignores the register).
    pub fn unary(kind: OpKind, reg: Reg) -> Option<Inst> {
        match kind {
            OpKind::NOP => Some(Inst::NOP),
            OpKind::INC => Some(Inst::INC(reg)),
            OpKind::DEC => Some(Inst::DEC(reg)),
            OpKind::MVLNK => Some(Inst::MVLNK(reg)),
            OpKind::J => Some(Inst::J(reg)),
            OpKind::JLNK => Some(Inst::JLNK(reg)),
            OpKind::IN => Some(Inst::IN(reg)),
            OpKind::OUT => Some(Inst::OUT(reg)),
            OpKind::LSHFT => Some(Inst::LSHFT(reg)),
            OpKind::RSHFT => Some(Inst::RSHFT(reg)),
            OpKind::AND => Some(Inst::AND(reg)),
            OpKind::SET => Some(Inst::SET(reg)),
            _ => None,
        }
    }

    /// Register operand of a single-register instruction.
    pub fn unary_reg(&self) -> Option<Reg> {
        match *self {
            Inst::NOP => Some(Reg::R0),
            Inst::INC(r)
            | Inst::DEC(r)
            | Inst::MVLNK(r)
            | Inst::J(r)
            | Inst::JLNK(r)
            | Inst::IN(r)
            | Inst::OUT(r)
            | Inst::LSHFT(r)
            | Inst::RSHFT(r)
            | Inst::AND(r)
            | Inst::SET(r) => Some(r),
            _ => None,
        }
    }
}

impl std::fmt::Display for Inst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.kind().to_string().to_uppercase();
        match self {
            Inst::NOP => write!(f, "{}", name),
            Inst::INC(r)
            | Inst::DEC(r)
            | Inst::MVLNK(r)
            | Inst::J(r)
            | Inst::JLNK(r)
            | Inst::IN(r)
            | Inst::OUT(r)
            | Inst::LSHFT(r)
            | Inst::RSHFT(r)
            | Inst::AND(r)
            | Inst::SET(r) => write!(f, "{} {}", name, r),
            Inst::MV(r1, r2) | Inst::ADD(r1, r2) | Inst::SUB(r1, r2) => {
                write!(f, "{} {}, {}", name, r1, r2)
            }
            Inst::JCND(c, r) | Inst::JLNKCND(c, r) => write!(f, "{} {}, {}", name, c, r),
            Inst::LD(r1, r2, ofs) | Inst::ST(r1, r2, ofs) => {
                write!(f, "{} {}, -{}[{}]", name, r1, ofs, r2)
            }
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        let name = self.kind().to_string();
        match self {
            Inst::NOP => cformat!("<r>{:<8}</>", name),
            Inst::INC(r)
            | Inst::DEC(r)
            | Inst::MVLNK(r)
            | Inst::J(r)
            | Inst::JLNK(r)
            | Inst::IN(r)
            | Inst::OUT(r)
            | Inst::LSHFT(r)
            | Inst::RSHFT(r)
            | Inst::AND(r)
            | Inst::SET(r) => cformat!("<r>{:<8}</><b>{}</>", name, r),
            Inst::MV(r1, r2) | Inst::ADD(r1, r2) | Inst::SUB(r1, r2) => {
                cformat!("<r>{:<8}</><b>{}, {}</>", name, r1, r2)
            }
            Inst::JCND(c, r) | Inst::JLNKCND(c, r) => {
                cformat!("<r>{:<8}</><y>{}</>, <b>{}</>", name, c, r)
            }
            Inst::LD(r1, r2, ofs) | Inst::ST(r1, r2, ofs) => {
                cformat!("<r>{:<8}</><b>{}</>, <y>-{}</>[<b>{}</>]", name, r1, ofs, r2)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Slot

/// One word of an assembled program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Inst(Inst),
    /// Raw data word following a `set`.
    Imm(u8),
}

impl Slot {
    pub fn to_bin(&self) -> u8 {
        match self {
            Slot::Inst(inst) => inst.to_bin(),
            Slot::Imm(v) => *v,
        }
    }

    pub fn cformat(&self) -> String {
        match self {
            Slot::Inst(inst) => inst.cformat(),
            Slot::Imm(v) => cformat!("<y>{}</>", v),
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Inst(inst) => write!(f, "{}", inst),
            Slot::Imm(v) => write!(f, "{}", v),
        }
    }
}

impl From<Inst> for Slot {
    fn from(inst: Inst) -> Self {
        Slot::Inst(inst)
    }
}
