use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::parser::Stmt;

/// Label name -> slot index of the entry that follows it.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    labels: IndexMap<String, usize>,
}

impl Labels {
    pub fn new() -> Self {
        Labels {
            labels: IndexMap::new(),
        }
    }

    /// First pass: walk the entries once, counting slots and recording every label.
    pub fn collect(stmts: &[Stmt]) -> Self {
        let mut labels = Labels::new();
        let mut pc = 0;
        for stmt in stmts {
            match stmt {
                Stmt::Label(key) => {
                    debug!(label = %key, slot = pc, "define label");
                    if let Some(prev) = labels.insert(key.clone(), pc) {
                        warn!(label = %key, prev, slot = pc, "label redefined, later definition wins");
                    }
                }
                Stmt::Inst(_) | Stmt::Imm(_) => pc += 1,
            }
        }
        labels
    }

    /// Returns the previous slot when `name` was already defined.
    pub fn insert(&mut self, name: String, slot: usize) -> Option<usize> {
        self.labels.insert(name, slot)
    }

    pub fn get_val(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
