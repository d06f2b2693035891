pub mod assembler;
pub mod error;
pub mod label;
pub mod msg;
pub mod parser;
pub mod util;

use arch::inst::Slot;

use crate::{error::Error, parser::Source};

/// Parse and assemble a whole program in one call. Fails on the first bad line.
pub fn assemble_source(text: &str) -> Result<Vec<Slot>, Error> {
    let src = Source::parse("", text);
    if let Some((line, err)) = src.errors().next() {
        return Err(Error::Parse {
            line: line.idx,
            source: err.clone(),
        });
    }
    Ok(assembler::assemble(&src.stmts())?)
}
