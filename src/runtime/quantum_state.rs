use crate::error::{Result, SimError};
use crate::gates::GateKind;
use log::debug;
use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tolerance for the normalization invariant: after every completed
/// operation the squared magnitudes must sum to 1.0 within this bound.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Retained probability below this is treated as a zero-probability
/// measurement outcome rather than divided through.
const ZERO_PROBABILITY: f64 = 1e-12;

/// Joint state vector for an n-qubit register.
///
/// Owns 2^n amplitudes indexed by basis state, qubit 0 in the
/// least-significant bit. The RNG driving measurement collapse is owned by
/// the state and seedable, so a seeded run replays deterministically.
#[derive(Debug, Clone)]
pub struct QuantumState {
    n: usize,
    amps: Vec<Complex64>,
    allocated: bool,
    rng: ChaCha8Rng,
}

impl QuantumState {
    /// Fresh unallocated state: dimension 1, holding amplitude 1+0i.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        QuantumState {
            n: 0,
            amps: vec![Complex64::new(1.0, 0.0)],
            allocated: false,
            rng,
        }
    }

    /// Resize to 2^count amplitudes and reset to |0...0>.
    pub fn allocate(&mut self, count: usize) -> Result<()> {
        if self.allocated {
            return Err(SimError::AlreadyAllocated);
        }
        let mut amps = vec![Complex64::new(0.0, 0.0); 1 << count];
        amps[0] = Complex64::new(1.0, 0.0);
        self.n = count;
        self.amps = amps;
        self.allocated = true;
        debug!("allocated {} qubits ({} amplitudes)", count, 1usize << count);
        Ok(())
    }

    pub fn num_qubits(&self) -> usize {
        self.n
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Read-only view of the current amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    fn check_qubit(&self, q: usize) -> Result<()> {
        if !self.allocated {
            return Err(SimError::NotAllocated);
        }
        if q >= self.n {
            return Err(SimError::InvalidQubit {
                index: q,
                num_qubits: self.n,
            });
        }
        Ok(())
    }

    /// Apply a single-qubit gate to `target`.
    ///
    /// Every index pair differing only in the target bit is replaced with
    /// the matrix-vector product of the gate and the pair. Both old values
    /// are read before either slot is written, so the linear combination is
    /// never computed from a partially updated vector.
    pub fn apply_gate(&mut self, gate: GateKind, target: usize) -> Result<()> {
        self.check_qubit(target)?;
        let mask = 1 << target;
        let m = gate.matrix();
        for i in 0..self.amps.len() {
            if i & mask == 0 {
                let a = self.amps[i];
                let b = self.amps[i | mask];
                self.amps[i] = m[0][0] * a + m[0][1] * b;
                self.amps[i | mask] = m[1][0] * a + m[1][1] * b;
            }
        }
        debug!("applied {} to qubit {}", gate, target);
        Ok(())
    }

    /// Apply `gate` to `target` within the subspace where `control` is 1.
    ///
    /// Amplitudes whose control bit is 0 are left untouched; restricting
    /// the update this way is what lets CNOT produce entangled states.
    pub fn apply_controlled_gate(
        &mut self,
        gate: GateKind,
        control: usize,
        target: usize,
    ) -> Result<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(SimError::InvalidQubit {
                index: target,
                num_qubits: self.n,
            });
        }
        let c_mask = 1 << control;
        let t_mask = 1 << target;
        let m = gate.matrix();
        for i in 0..self.amps.len() {
            if (i & c_mask) != 0 && (i & t_mask) == 0 {
                let a = self.amps[i];
                let b = self.amps[i | t_mask];
                self.amps[i] = m[0][0] * a + m[0][1] * b;
                self.amps[i | t_mask] = m[1][0] * a + m[1][1] * b;
            }
        }
        debug!(
            "applied {} to qubit {} controlled by {}",
            gate, target, control
        );
        Ok(())
    }

    /// Probability of observing 1 on `target`, without measuring.
    pub fn probability_of_one(&self, target: usize) -> Result<f64> {
        self.check_qubit(target)?;
        let mask = 1 << target;
        Ok(self
            .amps
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum())
    }

    /// Measure `target`, collapse the state, and return the outcome.
    ///
    /// The outcome is 1 iff a uniform draw in [0,1) lands below P(1).
    /// Collapse zeroes every amplitude inconsistent with the outcome and
    /// divides the survivors by the square root of the retained
    /// probability. If the retained probability is numerically zero the
    /// state is left unchanged and an error is returned.
    pub fn measure(&mut self, target: usize) -> Result<bool> {
        let prob_one = self.probability_of_one(target)?;
        let r: f64 = self.rng.gen();
        let outcome = r < prob_one;

        let retained = if outcome { prob_one } else { 1.0 - prob_one };
        if retained <= ZERO_PROBABILITY {
            return Err(SimError::MeasurementOfZeroProbabilityState);
        }

        let mask = 1 << target;
        let norm = retained.sqrt();
        for (i, amp) in self.amps.iter_mut().enumerate() {
            if ((i & mask) != 0) != outcome {
                *amp = Complex64::new(0.0, 0.0);
            } else {
                *amp /= norm;
            }
        }
        debug!("measured qubit {}: {}", target, outcome as u8);
        Ok(outcome)
    }

    /// Check the state for non-finite amplitudes and for normalization.
    pub fn validate_state(&self) -> std::result::Result<(), String> {
        if self
            .amps
            .iter()
            .any(|amp| amp.re.is_nan() || amp.im.is_nan())
        {
            return Err("state contains NaN amplitudes".to_string());
        }
        if self
            .amps
            .iter()
            .any(|amp| amp.re.is_infinite() || amp.im.is_infinite())
        {
            return Err("state contains infinite amplitudes".to_string());
        }
        let norm_sqr_sum: f64 = self.amps.iter().map(|amp| amp.norm_sqr()).sum();
        if (norm_sqr_sum - 1.0).abs() > NORM_TOLERANCE {
            return Err(format!(
                "state is not normalized, norm squared: {}",
                norm_sqr_sum
            ));
        }
        Ok(())
    }
}
