//! Line-oriented command interpreter for interactive sessions.
//!
//! A pure translation layer: command lines become [`Operation`] values or
//! meta-commands, and the circuit does the rest. A failing command prints
//! its error and the session continues; nothing here aborts.

use crate::circuit::Circuit;
use crate::codec;
use crate::error::{Result, SimError};
use crate::gates::GateKind;
use crate::instructions::Operation;
use log::info;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

const HELP: &str = "\
commands:
  add <n>           allocate n qubits
  gate <g> <t>      apply gate g (X|Y|Z|H|S|T) to qubit t
  cnot <c> <t>      apply controlled-X with control c, target t
  cgate <g> <c> <t> apply controlled gate g with control c, target t
  measure <q> [c]   measure qubit q, optionally into classical bit c
  show              print current amplitude vector
  history           print the operation log
  save <file>       persist operation log to file
  load <file>       reset circuit and replay operation log from file
  help              print this summary
  quit              exit";

/// One parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Op(Operation),
    Show,
    History,
    Save(String),
    Load(String),
    Help,
    Quit,
}

/// Parse one command line. `Ok(None)` means the line was blank or a
/// comment and should be ignored.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    let parse_index = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| SimError::MalformedCommand(format!("invalid index '{}'", s)))
    };
    let expect_args = |n: usize| {
        if tokens.len() - 1 != n {
            Err(SimError::MalformedCommand(format!(
                "'{}' expects {} argument(s), got {}",
                tokens[0],
                n,
                tokens.len() - 1
            )))
        } else {
            Ok(())
        }
    };

    let command = match tokens[0].to_lowercase().as_str() {
        "add" => {
            expect_args(1)?;
            Command::Op(Operation::AllocateQubits(parse_index(tokens[1])?))
        }
        "gate" => {
            expect_args(2)?;
            Command::Op(Operation::ApplyGate {
                gate: GateKind::from_str(tokens[1])?,
                target: parse_index(tokens[2])?,
            })
        }
        "cnot" => {
            expect_args(2)?;
            Command::Op(Operation::ApplyControlledGate {
                gate: GateKind::X,
                control: parse_index(tokens[1])?,
                target: parse_index(tokens[2])?,
            })
        }
        "cgate" => {
            expect_args(3)?;
            Command::Op(Operation::ApplyControlledGate {
                gate: GateKind::from_str(tokens[1])?,
                control: parse_index(tokens[2])?,
                target: parse_index(tokens[3])?,
            })
        }
        "measure" => {
            if tokens.len() < 2 || tokens.len() > 3 {
                return Err(SimError::MalformedCommand(format!(
                    "'measure' expects 1 or 2 arguments, got {}",
                    tokens.len() - 1
                )));
            }
            let classical_bit = match tokens.get(2) {
                Some(s) => Some(parse_index(s)?),
                None => None,
            };
            Command::Op(Operation::Measure {
                target: parse_index(tokens[1])?,
                classical_bit,
            })
        }
        "show" => {
            expect_args(0)?;
            Command::Show
        }
        "history" => {
            expect_args(0)?;
            Command::History
        }
        "save" => {
            expect_args(1)?;
            Command::Save(tokens[1].to_string())
        }
        "load" => {
            expect_args(1)?;
            Command::Load(tokens[1].to_string())
        }
        "help" => {
            expect_args(0)?;
            Command::Help
        }
        "quit" | "exit" => {
            expect_args(0)?;
            Command::Quit
        }
        other => return Err(SimError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Interactive session driver over a circuit.
pub struct Shell {
    circuit: Circuit,
}

impl Shell {
    pub fn new(circuit: Circuit) -> Self {
        Shell { circuit }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Replay a circuit file into the owned circuit. Used both for the
    /// `load` command and for a startup circuit argument.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let operations = codec::load(path)?;
        self.circuit.replay(&operations)
    }

    /// Run the session until `quit` or end of input. Command failures are
    /// reported on `output` and never end the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> std::io::Result<()> {
        writeln!(output, "qcsim interactive session ('help' for commands)")?;
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(e) = self.dispatch(command, output) {
                        writeln!(output, "error: {}", e)?;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(output, "error: {}", e)?,
            }
        }
        info!("session ended");
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, command: Command, output: &mut W) -> Result<()> {
        match command {
            Command::Op(op) => {
                if let Some(outcome) = self.circuit.execute(op)? {
                    writeln!(output, "{}", outcome as u8)?;
                }
            }
            Command::Show => self.show(output)?,
            Command::History => {
                for op in self.circuit.history() {
                    writeln!(output, "{}", op.encode())?;
                }
            }
            Command::Save(path) => {
                codec::save(Path::new(&path), self.circuit.history())?;
                writeln!(output, "saved {}", path)?;
            }
            Command::Load(path) => {
                self.load_file(Path::new(&path))?;
                writeln!(output, "loaded {}", path)?;
            }
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    /// Print the current amplitude vector and classical bits. Entries with
    /// |amp|^2 below 1e-8 are skipped; 2^24 lines is not a useful display.
    pub fn show<W: Write>(&self, output: &mut W) -> Result<()> {
        let state = self.circuit.state();
        if !state.is_allocated() {
            writeln!(output, "no qubits allocated")?;
            return Ok(());
        }
        writeln!(output, "state ({} qubits):", state.num_qubits())?;
        let width = state.num_qubits();
        for (i, amp) in state.amplitudes().iter().enumerate() {
            // skip entries too small to display
            if amp.norm_sqr() > 1e-8 {
                writeln!(
                    output,
                    "|{:0width$b}>: {:.4} {:+.4}i (prob {:.4})",
                    i,
                    amp.re,
                    amp.im,
                    amp.norm_sqr(),
                    width = width
                )?;
            }
        }
        let classical = self.circuit.classical_register();
        if !classical.is_empty() {
            let mut bits: Vec<_> = classical.iter().collect();
            bits.sort();
            for (bit, value) in bits {
                writeln!(output, "c{} = {}", bit, *value as u8)?;
            }
        }
        Ok(())
    }
}
