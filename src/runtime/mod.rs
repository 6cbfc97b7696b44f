pub mod quantum_state;
