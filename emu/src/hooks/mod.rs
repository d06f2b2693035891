pub mod dump;
pub mod serial;

use crate::model::Machine;

/// Side effect run around the main loop. `exec` sees the machine after each step.
pub trait Hook {
    fn init(&mut self, machine: &Machine);
    fn exec(&mut self, time: u64, pc: usize, word: u8, machine: &Machine);
}
