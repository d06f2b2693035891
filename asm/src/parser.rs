use arch::{
    cond::Cond,
    inst::Inst,
    op::{Arg, OpKind},
    reg::Reg,
};
use color_print::cformat;

use crate::{error::AssembleError, error::ParseError, label::Labels};

// ----------------------------------------------------------------------------
// Source

/// Every line of one source file, each parsed on its own.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: String,
    pub lines: Vec<Line>,
}

impl Source {
    pub fn parse(path: &str, text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(idx, raw)| Line::parse(idx, raw))
            .collect();
        Source {
            path: path.to_string(),
            lines,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = (&Line, &ParseError)> {
        self.lines
            .iter()
            .filter_map(|line| line.stmts.as_ref().err().map(|err| (line, err)))
    }

    pub fn has_error(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Entries of the lines that parsed, in source order.
    pub fn stmts(&self) -> Vec<Stmt> {
        self.lines
            .iter()
            .filter_map(|line| line.stmts.as_ref().ok())
            .flatten()
            .cloned()
            .collect()
    }
}

// ----------------------------------------------------------------------------
// Line

#[derive(Debug, Clone)]
pub struct Line {
    pub idx: usize,
    pub raw: String,
    pub comment: Option<String>,
    pub stmts: Result<Vec<Stmt>, ParseError>,
}

impl Line {
    pub fn parse(idx: usize, raw: &str) -> Self {
        let (code, comment) = split_comment(raw);
        Line {
            idx,
            raw: raw.to_string(),
            comment: comment.map(str::to_string),
            stmts: Stmt::parse(code),
        }
    }

    /// `(file, line index, raw line)` for diagnostics.
    pub fn info<'a>(&'a self, path: &'a str) -> (&'a str, usize, &'a str) {
        (path, self.idx, &self.raw)
    }
}

/// Split off a `;` comment that is not inside a `'x'` literal.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i].1 {
            '\'' if chars.get(i + 2).map(|(_, c)| *c) == Some('\'') => i += 3,
            ';' => {
                let at = chars[i].0;
                return (&line[..at], Some(&line[at + 1..]));
            }
            _ => i += 1,
        }
    }
    (line, None)
}

// ----------------------------------------------------------------------------
// Statement

/// Assembly-time entry. An instruction or immediate takes one slot, a label none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Inst(Inst),
    Imm(Imm),
    Label(String),
}

impl Stmt {
    /// Parse one line of code (comment already removed).
    pub fn parse(code: &str) -> Result<Vec<Stmt>, ParseError> {
        let code = code.trim();

        if code.is_empty() {
            return Ok(vec![]);
        }

        // main:
        if let Some(label) = code.strip_suffix(':') {
            return Ok(vec![Stmt::Label(label.trim().to_string())]);
        }

        let (op, rest) = match code.split_once(char::is_whitespace) {
            Some((op, rest)) => (op, rest),
            None => (code, ""),
        };
        let kind = OpKind::parse(op).ok_or_else(|| ParseError::UnknownInstruction(op.to_string()))?;

        let args = split_args(rest);
        let fields = kind.arg_field();
        if args.len() != fields.len() {
            return Err(ParseError::ArityMismatch {
                op: kind.to_string(),
                expected: fields.len(),
                found: args.len(),
            });
        }

        // Get argument by index and parse as Type
        // Example: arg!(0, Reg) -> Reg
        macro_rules! arg {
            ($index:expr, Reg) => {
                parse_reg(&args[$index])?
            };
            ($index:expr, Cond) => {
                parse_cond(&args[$index])?
            };
            ($index:expr, Addr) => {
                parse_addr(&args[$index])?
            };
            ($index:expr, Imm) => {
                Imm::parse(&args[$index])?
            };
        }

        let stmts = match kind {
            OpKind::NOP => vec![Stmt::Inst(Inst::NOP)],
            OpKind::SET => vec![
                Stmt::Inst(Inst::SET(arg!(0, Reg))),
                Stmt::Imm(arg!(1, Imm)),
            ],
            OpKind::MV => vec![Stmt::Inst(Inst::MV(arg!(0, Reg), arg!(1, Reg)))],
            OpKind::ADD => vec![Stmt::Inst(Inst::ADD(arg!(0, Reg), arg!(1, Reg)))],
            OpKind::SUB => vec![Stmt::Inst(Inst::SUB(arg!(0, Reg), arg!(1, Reg)))],
            OpKind::JCND => vec![Stmt::Inst(Inst::JCND(arg!(0, Cond), arg!(1, Reg)))],
            OpKind::JLNKCND => vec![Stmt::Inst(Inst::JLNKCND(arg!(0, Cond), arg!(1, Reg)))],
            OpKind::LD => {
                let reg1 = arg!(0, Reg);
                let (ofs, reg2) = arg!(1, Addr);
                vec![Stmt::Inst(Inst::LD(reg1, reg2, ofs))]
            }
            OpKind::ST => {
                let reg1 = arg!(0, Reg);
                let (ofs, reg2) = arg!(1, Addr);
                vec![Stmt::Inst(Inst::ST(reg1, reg2, ofs))]
            }
            unary => {
                debug_assert_eq!(fields, vec![Arg::Reg]);
                let inst = Inst::unary(unary, arg!(0, Reg))
                    .ok_or_else(|| ParseError::UnknownInstruction(op.to_string()))?;
                vec![Stmt::Inst(inst)]
            }
        };
        Ok(stmts)
    }
}

/// Split operands on commas. A `'x'` literal is one token even without a comma around it.
fn split_args(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut args = vec![];
    let mut cur = String::new();
    let flush = |cur: &mut String, args: &mut Vec<String>| {
        let tok = cur.trim();
        if !tok.is_empty() {
            args.push(tok.to_string());
        }
        cur.clear();
    };
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\'' if chars.get(i + 2) == Some(&'\'') => {
                flush(&mut cur, &mut args);
                args.push(chars[i..i + 3].iter().collect());
                i += 3;
            }
            ',' => {
                flush(&mut cur, &mut args);
                i += 1;
            }
            c => {
                cur.push(c);
                i += 1;
            }
        }
    }
    flush(&mut cur, &mut args);
    args
}

fn parse_reg(s: &str) -> Result<Reg, ParseError> {
    Reg::parse(s).ok_or_else(|| ParseError::InvalidRegister(s.to_string()))
}

fn parse_cond(s: &str) -> Result<Cond, ParseError> {
    Cond::parse(s).ok_or_else(|| ParseError::InvalidCondition(s.to_string()))
}

/// `2[r1]` or `-2[r1]` -> (2, R1)
fn parse_addr(s: &str) -> Result<(u8, Reg), ParseError> {
    let invalid = || ParseError::InvalidAddressSyntax(s.to_string());
    let body = s.strip_prefix('-').unwrap_or(s);
    let (ofs, rest) = body.split_once('[').ok_or_else(invalid)?;
    let reg = rest.strip_suffix(']').ok_or_else(invalid)?;
    if ofs.is_empty() || !ofs.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if reg.is_empty() || !reg.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(invalid());
    }
    let ofs = ofs.parse::<u8>().ok().filter(|ofs| *ofs < 4).ok_or_else(invalid)?;
    Ok((ofs, parse_reg(reg)?))
}

// ----------------------------------------------------------------------------
// Immediate

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imm {
    Literal(u8),
    Ident(String),
}

impl Imm {
    pub fn parse(s: &str) -> Result<Imm, ParseError> {
        let invalid = || ParseError::InvalidImmediate(s.to_string());
        let head = s.chars().next().ok_or_else(invalid)?;

        // 'A'
        if head == '\'' {
            let chars: Vec<char> = s.chars().collect();
            return match chars.as_slice() {
                ['\'', c, '\''] => Ok(Imm::Literal((*c as u32 & 0xFF) as u8)),
                _ => Err(invalid()),
            };
        }

        if head.is_ascii_digit() || head == '-' {
            return parse_number(s).map(Imm::Literal).ok_or_else(invalid);
        }

        Ok(Imm::Ident(s.to_string()))
    }

    pub fn resolve(&self, labels: &Labels) -> Result<u8, AssembleError> {
        match self {
            Imm::Literal(v) => Ok(*v),
            Imm::Ident(s) => match labels.get_val(s) {
                Some(v) => Ok((v & 0xFF) as u8),
                None => Err(AssembleError::UnresolvedLabel(s.clone())),
            },
        }
    }

    pub fn cformat(&self, labels: &Labels) -> String {
        match self {
            Imm::Ident(s) => match labels.get_val(s) {
                Some(v) => cformat!("<g>{}({})</>", v, s),
                None => cformat!("<r,u>{}</>", s),
            },
            Imm::Literal(v) => cformat!("<y>{}</>", v),
        }
    }
}

/// Decimal, `0x`/`0b`/`0o` prefix, `h`/`b`/`o` suffix, or leading-zero octal.
/// The value is taken modulo 256, whatever its length.
fn parse_number(s: &str) -> Option<u8> {
    let s = s.to_ascii_lowercase();
    let (neg, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.as_str()),
    };

    let (digits, radix) = if let Some(d) = s.strip_prefix("0x") {
        (d, 16)
    } else if let Some(d) = s.strip_suffix('h') {
        (d, 16)
    } else if let Some(d) = s.strip_prefix("0b") {
        (d, 2)
    } else if let Some(d) = s.strip_suffix('b') {
        (d, 2)
    } else if let Some(d) = s.strip_prefix("0o") {
        (d, 8)
    } else if let Some(d) = s.strip_suffix('o') {
        (d, 8)
    } else if s.len() > 1 && s.starts_with('0') {
        (s, 8)
    } else {
        (s, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let v = digits.chars().fold(0u8, |acc, c| {
        let d = c.to_digit(radix).unwrap_or(0) as u8;
        acc.wrapping_mul(radix as u8).wrapping_add(d)
    });
    Some(if neg { v.wrapping_neg() } else { v })
}

// ----------------------------------------------------------------------------

impl Stmt {
    pub fn cformat(&self, labels: &Labels) -> String {
        match self {
            Stmt::Inst(inst) => inst.cformat(),
            Stmt::Imm(imm) => imm.cformat(labels),
            Stmt::Label(key) => cformat!("<g>{}:</>", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! case {
        ($($name:ident: $code:expr => $stmts:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Stmt::parse($code), Ok($stmts));
                }
            )*
        }
    }

    macro_rules! fail {
        ($($name:ident: $code:expr => $err:pat,)*) => {
            $(
                #[test]
                fn $name() {
                    let res = Stmt::parse($code);
                    assert!(matches!(res, Err($err)), "{:?}", res);
                }
            )*
        }
    }

    case! {
        blank: "   " => vec![],
        label: "loop:" => vec![Stmt::Label("loop".to_string())],
        nop: "nop" => vec![Stmt::Inst(Inst::NOP)],
        nop_upper: "NOP" => vec![Stmt::Inst(Inst::NOP)],
        inc: "inc r0" => vec![Stmt::Inst(Inst::INC(Reg::R0))],
        inc_alias: "INC B" => vec![Stmt::Inst(Inst::INC(Reg::R1))],
        out_code: "out 11" => vec![Stmt::Inst(Inst::OUT(Reg::R3))],
        and_sp: "and sp" => vec![Stmt::Inst(Inst::AND(Reg::R3))],
        set_dec: "set r0, 10" => vec![
            Stmt::Inst(Inst::SET(Reg::R0)),
            Stmt::Imm(Imm::Literal(10)),
        ],
        set_label: "set r1, loop" => vec![
            Stmt::Inst(Inst::SET(Reg::R1)),
            Stmt::Imm(Imm::Ident("loop".to_string())),
        ],
        set_char: "set r2, 'A'" => vec![
            Stmt::Inst(Inst::SET(Reg::R2)),
            Stmt::Imm(Imm::Literal(65)),
        ],
        set_comma_char: "set r2, ','" => vec![
            Stmt::Inst(Inst::SET(Reg::R2)),
            Stmt::Imm(Imm::Literal(44)),
        ],
        set_char_no_comma: "set r2 'a'" => vec![
            Stmt::Inst(Inst::SET(Reg::R2)),
            Stmt::Imm(Imm::Literal(97)),
        ],
        mv: "mv a, d" => vec![Stmt::Inst(Inst::MV(Reg::R0, Reg::R3))],
        add: "add r1,r2" => vec![Stmt::Inst(Inst::ADD(Reg::R1, Reg::R2))],
        sub: "sub  fp ,  sp" => vec![Stmt::Inst(Inst::SUB(Reg::R2, Reg::R3))],
        jcnd: "jcnd z, r3" => vec![Stmt::Inst(Inst::JCND(Cond::Z, Reg::R3))],
        jlnkcnd: "jlnkcnd 01, a" => vec![Stmt::Inst(Inst::JLNKCND(Cond::C, Reg::R0))],
        ld: "ld r0, 2[r1]" => vec![Stmt::Inst(Inst::LD(Reg::R0, Reg::R1, 2))],
        ld_neg: "ld r0, -3[sp]" => vec![Stmt::Inst(Inst::LD(Reg::R0, Reg::R3, 3))],
        st: "st r2, 0[fp]" => vec![Stmt::Inst(Inst::ST(Reg::R2, Reg::R2, 0))],
    }

    fail! {
        unknown: "hoge r0" => ParseError::UnknownInstruction(_),
        arity_few: "add r0" => ParseError::ArityMismatch { expected: 2, found: 1, .. },
        arity_many: "inc r0, r1" => ParseError::ArityMismatch { expected: 1, found: 2, .. },
        arity_nop: "nop r0" => ParseError::ArityMismatch { expected: 0, found: 1, .. },
        bad_reg: "inc r4" => ParseError::InvalidRegister(_),
        bad_cond: "jcnd q, r0" => ParseError::InvalidCondition(_),
        bad_hex: "set r0, 0xzz" => ParseError::InvalidImmediate(_),
        bad_octal: "set r0, 09" => ParseError::InvalidImmediate(_),
        bad_char: "set r0, 'ab'" => ParseError::InvalidImmediate(_),
        bad_addr: "ld r0, r1" => ParseError::InvalidAddressSyntax(_),
        bad_addr_ofs: "ld r0, 4[r1]" => ParseError::InvalidAddressSyntax(_),
        bad_addr_close: "st r0, 1[r1" => ParseError::InvalidAddressSyntax(_),
        bad_addr_reg: "st r0, 1[r9]" => ParseError::InvalidRegister(_),
    }

    macro_rules! number {
        ($($name:ident: $src:expr => $val:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Imm::parse($src), Ok(Imm::Literal($val)));
                }
            )*
        }
    }

    number! {
        num_dec: "42" => 42,
        num_neg: "-1" => 255,
        num_wrap: "300" => 44,
        num_huge: "99999999999999999999" => 255,
        num_huge_hex: "0x123456789abcdef0123" => 0x23,
        num_huge_neg: "-4294967297" => 255,
        num_hex: "0x1F" => 31,
        num_hex_suffix: "0ffh" => 255,
        num_bin: "0b101" => 5,
        num_bin_suffix: "110b" => 6,
        num_oct: "0o17" => 15,
        num_oct_suffix: "17o" => 15,
        num_oct_leading_zero: "017" => 15,
        num_zero: "0" => 0,
        num_char: "'0'" => 48,
    }

    #[test]
    fn label_reference() {
        assert_eq!(Imm::parse("Loop"), Ok(Imm::Ident("Loop".to_string())));
        assert!(Imm::parse("").is_err());
    }

    #[test]
    fn comment() {
        let line = Line::parse(0, "  inc r0 ; count up");
        assert_eq!(line.stmts, Ok(vec![Stmt::Inst(Inst::INC(Reg::R0))]));
        assert_eq!(line.comment.as_deref(), Some(" count up"));

        let line = Line::parse(1, "set r0, ';' ; semicolon");
        assert_eq!(
            line.stmts,
            Ok(vec![
                Stmt::Inst(Inst::SET(Reg::R0)),
                Stmt::Imm(Imm::Literal(b';')),
            ])
        );

        let line = Line::parse(2, "; whole line");
        assert_eq!(line.stmts, Ok(vec![]));
    }

    #[test]
    fn source_keeps_going_after_error() {
        let src = Source::parse("test.dk", "inc r0\nfoo\nadd r0\nout r0\n");
        let errors: Vec<usize> = src.errors().map(|(line, _)| line.idx).collect();
        assert_eq!(errors, vec![1, 2]);
        assert_eq!(
            src.stmts(),
            vec![Stmt::Inst(Inst::INC(Reg::R0)), Stmt::Inst(Inst::OUT(Reg::R0))]
        );
    }
}
