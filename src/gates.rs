// all supported single-qubit gates

use crate::error::SimError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

/// The closed set of single-qubit gates. Controlled variants are not
/// separate matrices; they restrict the same matrix to the subspace where
/// the control bit is 1 (see `QuantumState::apply_controlled_gate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    X,
    Y,
    Z,
    H,
    S,
    T,
}

impl GateKind {
    /// The fixed 2x2 unitary for this gate, row-major over (|0>, |1>).
    pub fn matrix(self) -> [[Complex64; 2]; 2] {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            GateKind::X => [[zero, one], [one, zero]],
            GateKind::Y => [[zero, -i], [i, zero]],
            GateKind::Z => [[one, zero], [zero, -one]],
            GateKind::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            GateKind::S => [[one, zero], [zero, i]],
            // e^(i*pi/4) on |1>
            GateKind::T => [[one, zero], [zero, Complex64::new(0.0, FRAC_PI_4).exp()]],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::H => "H",
            GateKind::S => "S",
            GateKind::T => "T",
        }
    }
}

impl FromStr for GateKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "X" => Ok(GateKind::X),
            "Y" => Ok(GateKind::Y),
            "Z" => Ok(GateKind::Z),
            "H" => Ok(GateKind::H),
            "S" => Ok(GateKind::S),
            "T" => Ok(GateKind::T),
            other => Err(SimError::InvalidGate(other.to_string())),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
