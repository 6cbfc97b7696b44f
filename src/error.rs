use thiserror::Error;

/// Errors raised anywhere between the command parser and the state vector.
///
/// The shell recovers every variant of this; only a missing startup circuit
/// file is allowed to terminate the process.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid qubit index {index} for {num_qubits}-qubit register")]
    InvalidQubit { index: usize, num_qubits: usize },

    #[error("unknown gate '{0}' (expected one of X, Y, Z, H, S, T)")]
    InvalidGate(String),

    #[error("qubits already allocated for this circuit")]
    AlreadyAllocated,

    #[error("no qubits allocated yet (run 'add <n>' first)")]
    NotAllocated,

    #[error("measured a zero-probability state, cannot renormalize")]
    MeasurementOfZeroProbabilityState,

    #[error("qubit count {requested} exceeds the configured limit of {limit}")]
    QubitLimitExceeded { requested: usize, limit: usize },

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("invalid circuit file at line {line}: {reason}")]
    InvalidFileFormat { line: usize, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
