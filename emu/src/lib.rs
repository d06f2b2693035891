pub mod error;
pub mod hooks;
pub mod model;
pub mod xxd;
