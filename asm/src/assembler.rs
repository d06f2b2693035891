use arch::inst::Slot;
use tracing::{debug, warn};

use crate::{error::AssembleError, label::Labels, parser::Imm, parser::Stmt};

/// Second pass: substitute label references and emit one slot per instruction or immediate.
pub fn assemble(stmts: &[Stmt]) -> Result<Vec<Slot>, AssembleError> {
    let labels = Labels::collect(stmts);
    resolve(stmts, &labels)
}

pub fn resolve(stmts: &[Stmt], labels: &Labels) -> Result<Vec<Slot>, AssembleError> {
    let mut program = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        match stmt {
            Stmt::Label(_) => {}
            Stmt::Inst(inst) => program.push(Slot::Inst(*inst)),
            Stmt::Imm(imm) => {
                let v = imm.resolve(labels)?;
                if let Imm::Ident(key) = imm {
                    debug!(label = %key, value = v, "resolve label");
                    if let Some(slot) = labels.get_val(key).filter(|slot| *slot > 0xFF) {
                        warn!(label = %key, slot, "label slot does not fit in a word, truncated");
                    }
                }
                program.push(Slot::Imm(v));
            }
        }
    }
    debug!(slots = program.len(), labels = labels.len(), "assembled");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Source;
    use arch::{cond::Cond, inst::Inst, reg::Reg};

    fn build(text: &str) -> Result<Vec<Slot>, AssembleError> {
        let src = Source::parse("test.dk", text);
        assert!(!src.has_error());
        assemble(&src.stmts())
    }

    #[test]
    fn set_expands_to_two_slots() {
        assert_eq!(
            build("set r0, 10\nout r0").unwrap(),
            vec![
                Slot::Inst(Inst::SET(Reg::R0)),
                Slot::Imm(10),
                Slot::Inst(Inst::OUT(Reg::R0)),
            ]
        );
    }

    #[test]
    fn backward_reference() {
        let program = build("loop:\n  inc r0\n  j r0\n  set r1, loop\n").unwrap();
        assert_eq!(
            program,
            vec![
                Slot::Inst(Inst::INC(Reg::R0)),
                Slot::Inst(Inst::J(Reg::R0)),
                Slot::Inst(Inst::SET(Reg::R1)),
                Slot::Imm(0),
            ]
        );
    }

    #[test]
    fn forward_reference() {
        let program = build("set r3, end\njcnd z, r3\nnop\nend:\nout r0\n").unwrap();
        assert_eq!(program[1], Slot::Imm(4));
        assert_eq!(program[2], Slot::Inst(Inst::JCND(Cond::Z, Reg::R3)));
    }

    #[test]
    fn unresolved() {
        assert_eq!(
            build("set r0, nowhere"),
            Err(AssembleError::UnresolvedLabel("nowhere".to_string()))
        );
    }

    #[test]
    fn empty() {
        assert_eq!(build("; nothing here\n\n"), Ok(vec![]));
    }
}
