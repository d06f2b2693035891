use arch::reg::Reg;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use strum::IntoEnumIterator;

use crate::{error::ConfigError, model::Machine};

use super::Hook;

#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

/// pc -> what to print after the instruction at that pc runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct List(pub HashMap<usize, Config>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub regs: bool,
    #[serde(default)]
    pub memory: Vec<u8>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, ConfigError> {
        let list = match &file {
            Some(path) => {
                let f = File::open(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::parse(BufReader::new(f)).map_err(|source| ConfigError::Yaml {
                    path: path.clone(),
                    source,
                })?
            }
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    pub fn parse(reader: impl std::io::Read) -> Result<List, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    fn get(&self, pc: usize) -> Option<&Config> {
        self.list.0.get(&pc)
    }
}

impl Hook for Dump {
    fn init(&mut self, _machine: &Machine) {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
    }

    fn exec(&mut self, _time: u64, pc: usize, _word: u8, machine: &Machine) {
        if let Some(cfg) = self.get(pc) {
            if cfg.regs || self.all {
                print_reg(machine);
            }
            print_memory(machine, &cfg.memory);
        } else if self.all {
            print_reg(machine);
        }
    }
}

pub fn print_reg(machine: &Machine) {
    println!(" +---------+---------+---------+---------+");
    let regs = Reg::iter()
        .map(|r| format!(" {}: {:02X}  ", r, machine.reg(r)))
        .collect::<Vec<_>>()
        .join("|");
    println!(" |{}|", regs);
    println!(
        " |{:<9}|{:<9}|{:<19}|",
        format!(" pc: {}", machine.pc()),
        format!(" lnk: {}", machine.lnk()),
        format!(" flags: {}", machine.flags())
    );
    println!(" +---------+---------+---------+---------+");
}

pub fn print_memory(machine: &Machine, addrs: &[u8]) {
    if addrs.is_empty() {
        return;
    }
    for addr in addrs {
        let val = machine.memory()[*addr as usize];
        println!(" | {:<38}|", format!("{:02X} : {:02X}", addr, val));
    }
    println!(" +---------------------------------------+");
}
