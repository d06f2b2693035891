pub mod codec;
pub mod cond;
pub mod error;
pub mod flag;
pub mod inst;
pub mod op;
pub mod reg;
