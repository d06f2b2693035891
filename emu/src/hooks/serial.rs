use std::io::{Stdout, Write};

use color_print::cformat;
use tracing::warn;

use super::Hook;
use crate::model::Machine;

/// Echo bytes the program writes with `out`.
pub struct Serial<W: Write = Stdout> {
    style: bool,
    sent: usize,
    write_buf: W,
}

impl Serial {
    pub fn arg(style: bool) -> Serial {
        Serial::with_writer(style, std::io::stdout())
    }
}

impl<W: Write> Serial<W> {
    pub fn with_writer(style: bool, write_buf: W) -> Self {
        Serial {
            style,
            sent: 0,
            write_buf,
        }
    }

    pub fn writer(&self) -> &W {
        &self.write_buf
    }

    fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        for &b in bytes {
            let c = b as char;
            match self.style {
                true => writeln!(
                    self.write_buf,
                    "{}",
                    cformat!(" > <r,s>{}</> <dim>({:02X})</>", c.escape_default(), b)
                )?,
                false => write!(self.write_buf, "{}", c)?,
            }
        }
        // partial lines stay visible
        self.write_buf.flush()
    }
}

impl<W: Write> Hook for Serial<W> {
    fn init(&mut self, machine: &Machine) {
        self.sent = machine.output().len();
        println!(
            " * Serial: input {} byte(s)",
            machine.input_remaining().len()
        );
    }

    fn exec(&mut self, time: u64, _pc: usize, _word: u8, machine: &Machine) {
        let output = machine.output();
        let new = &output[self.sent.min(output.len())..];
        if new.is_empty() {
            return;
        }
        if let Err(err) = self.write(new) {
            warn!(time, "serial write failed: {}", err);
        }
        self.sent = output.len();
    }
}
