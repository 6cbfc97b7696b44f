// the circuit file operation set and its line grammar

use crate::error::SimError;
use crate::gates::GateKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One entry in a circuit's operation log.
///
/// Operations are immutable once appended; the log is the authoritative
/// replay script for reconstructing a state vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Fixes the register size. Only valid as the first operation.
    AllocateQubits(usize),
    ApplyGate {
        gate: GateKind,
        target: usize,
    },
    ApplyControlledGate {
        gate: GateKind,
        control: usize,
        target: usize,
    },
    Measure {
        target: usize,
        classical_bit: Option<usize>,
    },
}

impl Operation {
    /// Encode as one line of the circuit file format.
    pub fn encode(&self) -> String {
        match self {
            Operation::AllocateQubits(count) => format!("QUBITS {}", count),
            Operation::ApplyGate { gate, target } => format!("GATE {} {}", gate, target),
            Operation::ApplyControlledGate {
                gate: GateKind::X,
                control,
                target,
            } => format!("CNOT {} {}", control, target),
            Operation::ApplyControlledGate {
                gate,
                control,
                target,
            } => format!("CGATE {} {} {}", gate, control, target),
            Operation::Measure {
                target,
                classical_bit: Some(bit),
            } => format!("MEASURE {} {}", target, bit),
            Operation::Measure {
                target,
                classical_bit: None,
            } => format!("MEASURE {}", target),
        }
    }
}

/// Parse one circuit file line into an operation.
///
/// The caller is expected to have skipped blank lines and `#` comments;
/// this only sees candidate operation lines.
pub fn parse_operation(line: &str) -> Result<Operation, SimError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(SimError::MalformedCommand("empty operation line".into()));
    }

    let parse_index = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| SimError::MalformedCommand(format!("invalid index '{}'", s)))
    };
    let expect_args = |n: usize| {
        if tokens.len() - 1 != n {
            Err(SimError::MalformedCommand(format!(
                "{} expects {} argument(s), got {}",
                tokens[0].to_uppercase(),
                n,
                tokens.len() - 1
            )))
        } else {
            Ok(())
        }
    };

    let opcode = tokens[0].to_uppercase();
    match opcode.as_str() {
        "QUBITS" => {
            expect_args(1)?;
            Ok(Operation::AllocateQubits(parse_index(tokens[1])?))
        }
        "GATE" => {
            expect_args(2)?;
            Ok(Operation::ApplyGate {
                gate: GateKind::from_str(tokens[1])?,
                target: parse_index(tokens[2])?,
            })
        }
        "CNOT" => {
            expect_args(2)?;
            Ok(Operation::ApplyControlledGate {
                gate: GateKind::X,
                control: parse_index(tokens[1])?,
                target: parse_index(tokens[2])?,
            })
        }
        "CGATE" => {
            expect_args(3)?;
            Ok(Operation::ApplyControlledGate {
                gate: GateKind::from_str(tokens[1])?,
                control: parse_index(tokens[2])?,
                target: parse_index(tokens[3])?,
            })
        }
        "MEASURE" => {
            if tokens.len() < 2 || tokens.len() > 3 {
                return Err(SimError::MalformedCommand(format!(
                    "MEASURE expects 1 or 2 arguments, got {}",
                    tokens.len() - 1
                )));
            }
            let classical_bit = match tokens.get(2) {
                Some(s) => Some(parse_index(s)?),
                None => None,
            };
            Ok(Operation::Measure {
                target: parse_index(tokens[1])?,
                classical_bit,
            })
        }
        other => Err(SimError::MalformedCommand(format!(
            "unknown operation '{}'",
            other
        ))),
    }
}
