use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid register: `{0}`")]
    InvalidRegister(String),

    #[error("Invalid condition: `{0}`")]
    InvalidCondition(String),

    #[error("Invalid immediate value: `{0}`")]
    InvalidImmediate(String),

    #[error("Invalid address: `{0}`, expected `<ofs>[<reg>]` with ofs in 0..=3")]
    InvalidAddressSyntax(String),

    #[error("`{op}` takes {expected} operand(s), found {found}")]
    ArityMismatch {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error("Unresolved label: `{0}`")]
    UnresolvedLabel(String),
}

/// Failure of a whole-program build: the first bad line, or a label that never got defined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {}: {source}", .line + 1)]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}
