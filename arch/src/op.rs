use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OpKind {
    NOP,
    INC,
    DEC,
    MVLNK,
    J,
    JLNK,
    IN,
    OUT,
    LSHFT,
    RSHFT,
    AND,
    SET,
    MV,
    ADD,
    SUB,
    JCND,
    JLNKCND,
    LD,
    ST,
}

impl OpKind {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

/// Operand shape accepted by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Reg,
    Cond,
    Imm,
    /// `<ofs>[<reg>]`
    Addr,
}

impl OpKind {
    pub fn arg_field(&self) -> Vec<Arg> {
        use OpKind::*;
        match self {
            NOP => vec![],
            INC | DEC | MVLNK | J | JLNK | IN | OUT | LSHFT | RSHFT | AND => vec![Arg::Reg],
            SET => vec![Arg::Reg, Arg::Imm],
            MV | ADD | SUB => vec![Arg::Reg, Arg::Reg],
            JCND | JLNKCND => vec![Arg::Cond, Arg::Reg],
            LD | ST => vec![Arg::Reg, Arg::Addr],
        }
    }

    pub fn arity(&self) -> usize {
        self.arg_field().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse() {
        assert_eq!(OpKind::parse("nop"), Some(OpKind::NOP));
        assert_eq!(OpKind::parse("JLNKCND"), Some(OpKind::JLNKCND));
        assert_eq!(OpKind::parse("Mvlnk"), Some(OpKind::MVLNK));
        assert_eq!(OpKind::parse("hoge"), None);
        assert_eq!(OpKind::LSHFT.to_string(), "lshft");
    }

    #[test]
    fn arity_table() {
        let arity: Vec<(String, usize)> = OpKind::iter()
            .map(|op| (op.to_string(), op.arity()))
            .collect();
        let expected = [
            ("nop", 0),
            ("inc", 1),
            ("dec", 1),
            ("mvlnk", 1),
            ("j", 1),
            ("jlnk", 1),
            ("in", 1),
            ("out", 1),
            ("lshft", 1),
            ("rshft", 1),
            ("and", 1),
            ("set", 2),
            ("mv", 2),
            ("add", 2),
            ("sub", 2),
            ("jcnd", 2),
            ("jlnkcnd", 2),
            ("ld", 2),
            ("st", 2),
        ];
        assert_eq!(arity.len(), expected.len());
        for ((name, n), (ename, en)) in arity.iter().zip(expected) {
            assert_eq!((name.as_str(), *n), (ename, en));
        }
    }
}
