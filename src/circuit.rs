use crate::error::{Result, SimError};
use crate::instructions::Operation;
use crate::runtime::quantum_state::QuantumState;
use log::{debug, info};
use std::collections::HashMap;

/// Default ceiling on the register size; 2^24 amplitudes is already 256 MiB.
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Hard ceiling a configured limit cannot exceed. Keeps the `1 << count`
/// dimension computation well inside the shift width; 2^32 amplitudes is
/// already past practical memory anyway.
pub const HARD_MAX_QUBITS: usize = 32;

/// A circuit: one exclusively owned state vector plus the append-only
/// operation log that produced it.
///
/// `execute` is atomic per operation: a failing operation mutates nothing
/// and is not appended. The log is never reordered or pruned, so replaying
/// it against a fresh state reconstructs the circuit exactly (including
/// measurement outcomes, when the same seed is used).
pub struct Circuit {
    state: QuantumState,
    log: Vec<Operation>,
    classical: HashMap<usize, bool>,
    max_qubits: usize,
    seed: Option<u64>,
}

impl Circuit {
    pub fn new(seed: Option<u64>) -> Self {
        Circuit {
            state: QuantumState::new(seed),
            log: Vec::new(),
            classical: HashMap::new(),
            max_qubits: DEFAULT_MAX_QUBITS,
            seed,
        }
    }

    pub fn with_max_qubits(seed: Option<u64>, max_qubits: usize) -> Self {
        let mut circuit = Circuit::new(seed);
        circuit.max_qubits = max_qubits.min(HARD_MAX_QUBITS);
        circuit
    }

    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// The ordered operation log.
    pub fn history(&self) -> &[Operation] {
        &self.log
    }

    /// Classical bits written by measurements so far.
    pub fn classical_register(&self) -> &HashMap<usize, bool> {
        &self.classical
    }

    /// Validate and apply one operation, appending it to the log on
    /// success. Returns the outcome for measurements, `None` otherwise.
    pub fn execute(&mut self, op: Operation) -> Result<Option<bool>> {
        let outcome = match &op {
            Operation::AllocateQubits(count) => {
                if self.state.is_allocated() {
                    return Err(SimError::AlreadyAllocated);
                }
                if *count > self.max_qubits {
                    // rejected before any memory is committed
                    return Err(SimError::QubitLimitExceeded {
                        requested: *count,
                        limit: self.max_qubits,
                    });
                }
                self.state.allocate(*count)?;
                info!("circuit allocated {} qubits", count);
                None
            }
            Operation::ApplyGate { gate, target } => {
                self.state.apply_gate(*gate, *target)?;
                None
            }
            Operation::ApplyControlledGate {
                gate,
                control,
                target,
            } => {
                self.state.apply_controlled_gate(*gate, *control, *target)?;
                None
            }
            Operation::Measure {
                target,
                classical_bit,
            } => {
                let result = self.state.measure(*target)?;
                if let Some(bit) = classical_bit {
                    // a reused classical bit is overwritten
                    self.classical.insert(*bit, result);
                }
                Some(result)
            }
        };
        debug!("executed {:?}", op);
        self.log.push(op);
        Ok(outcome)
    }

    /// Reset to an empty circuit and execute `operations` in order.
    ///
    /// The state vector is rebuilt from scratch with the circuit's base
    /// seed, so a seeded circuit replays its measurement outcomes
    /// deterministically. The replay is staged against a fresh circuit and
    /// swapped in only when every operation succeeds; on failure the
    /// existing circuit is left untouched.
    pub fn replay(&mut self, operations: &[Operation]) -> Result<()> {
        let mut staged = Circuit::with_max_qubits(self.seed, self.max_qubits);
        for op in operations {
            staged.execute(op.clone())?;
        }
        self.state = staged.state;
        self.log = staged.log;
        self.classical = staged.classical;
        info!("replayed {} operation(s)", self.log.len());
        Ok(())
    }
}
