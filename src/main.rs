use clap::Parser;
use log::info;
use qcsim::circuit::{Circuit, DEFAULT_MAX_QUBITS};
use qcsim::codec;
use qcsim::error::SimError;
use qcsim::shell::Shell;
use std::io;
use std::path::Path;

const QCSIM_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "qcsim", version = QCSIM_VERSION,
    about = "qcsim - an interactive quantum circuit simulator.\n\
             Use 'qcsim help <command>' for more information on a specific command.",
    args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Circuit file to preload into an interactive session.
    circuit: Option<String>,

    /// Seed for the measurement RNG (deterministic replay).
    #[arg(long)]
    seed: Option<u64>,

    /// Ceiling on the number of qubits a circuit may allocate (capped at 32).
    #[arg(long, default_value_t = DEFAULT_MAX_QUBITS)]
    max_qubits: usize,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Starts an interactive session, optionally preloading a circuit file.
    Shell {
        /// Circuit file to preload.
        circuit: Option<String>,
        /// Seed for the measurement RNG (deterministic replay).
        #[arg(long)]
        seed: Option<u64>,
        /// Ceiling on the number of qubits a circuit may allocate (capped at 32).
        #[arg(long, default_value_t = DEFAULT_MAX_QUBITS)]
        max_qubits: usize,
    },
    /// Executes a circuit file and prints the final state.
    Run {
        /// Circuit file to execute.
        circuit: String,
        /// Seed for the measurement RNG (deterministic replay).
        #[arg(long)]
        seed: Option<u64>,
        /// Ceiling on the number of qubits a circuit may allocate (capped at 32).
        #[arg(long, default_value_t = DEFAULT_MAX_QUBITS)]
        max_qubits: usize,
    },
    /// Converts a circuit file into a .json operation list.
    ExportJson {
        /// Source circuit file path.
        source: String,
        /// Output .json file path.
        output: String,
    },
    /// Prints the qcsim version.
    Version,
}

fn run_shell(
    circuit_file: Option<String>,
    seed: Option<u64>,
    max_qubits: usize,
) -> Result<(), SimError> {
    let mut shell = Shell::new(Circuit::with_max_qubits(seed, max_qubits));
    if let Some(path) = circuit_file {
        // a missing startup circuit is the one unrecoverable error
        shell.load_file(Path::new(&path))?;
        info!("preloaded circuit from {}", path);
    }
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout)?;
    Ok(())
}

fn run_circuit(circuit_file: &str, seed: Option<u64>, max_qubits: usize) -> Result<(), SimError> {
    let operations = codec::load(Path::new(circuit_file))?;
    let mut circuit = Circuit::with_max_qubits(seed, max_qubits);
    circuit.replay(&operations)?;
    let shell = Shell::new(circuit);
    let mut stdout = io::stdout();
    shell.show(&mut stdout)?;
    Ok(())
}

fn export_json(source: &str, output: &str) -> Result<(), SimError> {
    let operations = codec::load(Path::new(source))?;
    codec::save_json(Path::new(output), &operations)?;
    println!("exported {} to {}", source, output);
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Shell {
            circuit,
            seed,
            max_qubits,
        }) => run_shell(circuit, seed, max_qubits),
        Some(Commands::Run {
            circuit,
            seed,
            max_qubits,
        }) => run_circuit(&circuit, seed, max_qubits),
        Some(Commands::ExportJson { source, output }) => export_json(&source, &output),
        Some(Commands::Version) => {
            println!("qcsim version {}", QCSIM_VERSION);
            Ok(())
        }
        None => run_shell(cli.circuit, cli.seed, cli.max_qubits),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
