use arch::{codec::fmt_word, flag::Flags, inst::Inst, inst::Slot, reg::Reg};
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use crate::error::RuntimeError;

pub const MEM_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Nothing loaded yet.
    Unloaded,
    Ready,
    /// A step failed. Only `reset` leaves this state.
    Halted,
}

pub struct Machine {
    program: Vec<Slot>,
    progmem: Vec<u8>,
    memory: [u8; MEM_SIZE],
    pc: usize,
    regs: [u8; 4],
    flags: Flags,
    lnk: usize,

    input: Vec<u8>,
    inputpos: usize,
    output: Vec<u8>,

    halt: Option<RuntimeError>,
    loaded: bool,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            program: vec![],
            progmem: vec![],
            memory: [0; MEM_SIZE],
            pc: 0,
            regs: [0; 4],
            flags: Flags::default(),
            lnk: 0,
            input: vec![],
            inputpos: 0,
            output: vec![],
            halt: None,
            loaded: false,
        }
    }

    /// Clear every register, flag, memory cell and buffer, then load `program` and `input`.
    pub fn reset(&mut self, program: &[Slot], input: &str) {
        self.pc = 0;
        self.flags.clear();
        self.lnk = 0;
        self.regs = [0; 4];
        self.memory = [0; MEM_SIZE];

        self.input = input.as_bytes().to_vec();
        self.inputpos = 0;
        self.output.clear();

        self.program = program.to_vec();
        self.progmem = program.iter().map(Slot::to_bin).collect();

        self.halt = None;
        self.loaded = true;
        info!(
            words = self.progmem.len(),
            input = self.input.len(),
            "reset"
        );
    }

    /// Execute one instruction. Returns the pc it was fetched from and the raw word.
    pub fn step(&mut self) -> Result<(usize, u8), RuntimeError> {
        if let Some(err) = &self.halt {
            return Err(err.clone());
        }

        let pc = self.pc;
        let fetched = match self.progmem.get(pc) {
            Some(word) => Inst::from_bin(*word)
                .map(|inst| (*word, inst))
                .map_err(RuntimeError::from),
            None => Err(RuntimeError::OutOfProgram {
                pc,
                len: self.progmem.len(),
            }),
        };
        let (word, inst) = match fetched {
            Ok(ok) => ok,
            Err(err) => {
                warn!(pc, "halt: {}", err);
                self.halt = Some(err.clone());
                return Err(err);
            }
        };

        trace!(pc, word = %fmt_word(word), inst = %inst, "step");
        self.exec(inst);
        Ok((pc, word))
    }

    /// Step until an error or until `max_steps` have run. Returns the number of steps taken.
    pub fn run(&mut self, max_steps: u64) -> Result<u64, RuntimeError> {
        for _ in 0..max_steps {
            self.step()?;
        }
        Ok(max_steps)
    }

    fn exec(&mut self, inst: Inst) {
        // fallthrough / link address of branches, wraps
        let next = (self.pc + 1) % self.progmem.len().max(1);

        match inst {
            Inst::NOP => {}
            Inst::INC(r) => {
                let v = self.reg(r).wrapping_add(1);
                self.set_reg(r, v);
                self.flags.set_zn(v);
                self.flags.set(Flags::C, v == 0);
            }
            Inst::DEC(r) => {
                let v = self.reg(r).wrapping_sub(1);
                self.set_reg(r, v);
                self.flags.set_zn(v);
                self.flags.set(Flags::C, v == 0xFF);
            }
            Inst::MVLNK(r) => self.set_reg(r, (self.lnk & 0xFF) as u8),
            Inst::J(r) => {
                self.pc = self.reg(r) as usize;
                return;
            }
            Inst::JLNK(r) => {
                self.lnk = next;
                self.pc = self.reg(r) as usize;
                return;
            }
            Inst::IN(r) => {
                let v = self.fetch_input();
                self.set_reg(r, v);
                self.flags.set_zn(v);
            }
            Inst::OUT(r) => {
                let v = self.reg(r);
                self.output.push(v);
            }
            Inst::LSHFT(r) => {
                let v = self.reg(r) << 1;
                self.set_reg(r, v);
                self.flags.set_zn(v);
            }
            Inst::RSHFT(r) => {
                let v = self.reg(r) >> 1;
                self.set_reg(r, v);
                self.flags.set_zn(v);
            }
            Inst::AND(r) => {
                let k = Reg::from_bits(r.bits() + 1);
                let src = self.reg(r);
                let v = src & self.reg(k);
                self.set_reg(k, v);
                // N follows the source register, not the result
                self.flags.set(Flags::Z, v == 0);
                self.flags.set(Flags::N, src & 0x80 != 0);
            }
            Inst::SET(r) => {
                let v = self.progmem[next];
                self.set_reg(r, v);
                self.pc += 2;
                return;
            }
            Inst::MV(r1, r2) => self.set_reg(r1, self.reg(r2)),
            Inst::ADD(r1, r2) => {
                let sum = self.reg(r1) as u16 + self.reg(r2) as u16;
                let v = (sum & 0xFF) as u8;
                self.set_reg(r1, v);
                self.flags.set_zn(v);
                self.flags.set(Flags::C, sum > 0xFF);
            }
            Inst::SUB(r1, r2) => {
                let (a, b) = (self.reg(r1), self.reg(r2));
                let v = a.wrapping_sub(b);
                self.set_reg(r1, v);
                self.flags.set_zn(v);
                self.flags.set(Flags::C, a < b);
            }
            Inst::JCND(c, r) => {
                self.pc = if self.flags.test(c) {
                    self.reg(r) as usize
                } else {
                    next
                };
                return;
            }
            Inst::JLNKCND(c, r) => {
                if self.flags.test(c) {
                    self.lnk = next;
                    self.pc = self.reg(r) as usize;
                } else {
                    self.pc = next;
                }
                return;
            }
            Inst::LD(r1, r2, ofs) => {
                let v = self.memory[self.addr(r2, ofs)];
                self.set_reg(r1, v);
                self.flags.set_zn(v);
            }
            Inst::ST(r1, r2, ofs) => {
                let addr = self.addr(r2, ofs);
                self.memory[addr] = self.reg(r1);
            }
        }
        self.pc += 1;
    }

    fn addr(&self, base: Reg, ofs: u8) -> usize {
        self.reg(base).wrapping_sub(ofs) as usize
    }

    fn fetch_input(&mut self) -> u8 {
        match self.input.get(self.inputpos) {
            Some(v) => {
                self.inputpos += 1;
                *v
            }
            None => 0,
        }
    }

    fn set_reg(&mut self, reg: Reg, val: u8) {
        self.regs[reg.idx()] = val;
    }
}

// Queries
impl Machine {
    pub fn status(&self) -> Status {
        match (self.loaded, &self.halt) {
            (false, _) => Status::Unloaded,
            (true, None) => Status::Ready,
            (true, Some(_)) => Status::Halted,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn lnk(&self) -> usize {
        self.lnk
    }

    pub fn reg(&self, reg: Reg) -> u8 {
        self.regs[reg.idx()]
    }

    pub fn regs(&self) -> [u8; 4] {
        self.regs
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn progmem(&self) -> &[u8] {
        &self.progmem
    }

    pub fn program(&self) -> &[Slot] {
        &self.program
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn input_consumed(&self) -> &[u8] {
        &self.input[..self.inputpos]
    }

    pub fn input_remaining(&self) -> &[u8] {
        &self.input[self.inputpos..]
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status(),
            pc: self.pc,
            lnk: self.lnk,
            regs: self.regs,
            flags: self.flags.to_string(),
            memory: self.memory.to_vec(),
            progmem: self.progmem.iter().map(|w| fmt_word(*w)).collect(),
            output: self.output.clone(),
            input_consumed: self.input_consumed().to_vec(),
            input_remaining: self.input_remaining().to_vec(),
        }
    }
}

/// Observable state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: Status,
    pub pc: usize,
    pub lnk: usize,
    pub regs: [u8; 4],
    pub flags: String,
    pub memory: Vec<u8>,
    pub progmem: Vec<String>,
    pub output: Vec<u8>,
    pub input_consumed: Vec<u8>,
    pub input_remaining: Vec<u8>,
}
