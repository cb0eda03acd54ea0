//! Circuit model
//!
//! A circuit is an ordered list of operations over a qubit register and a
//! classical register. Only the gates the coin flip games need are modelled.

use serde::{Deserialize, Serialize};
use shared::{BackendError, MAX_SIMULATED_QUBITS};
use std::fmt::Write as _;

/// A single circuit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Hadamard gate
    H { qubit: usize },
    /// Pauli-X (NOT) gate
    X { qubit: usize },
    /// Non-unitary reset of a qubit to |0>
    Reset { qubit: usize },
    /// Measure a qubit into a classical bit
    Measure { qubit: usize, clbit: usize },
}

/// Quantum circuit with `num_qubits` qubits and `num_clbits` classical bits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            operations: Vec::new(),
        }
    }

    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.operations.push(Operation::H { qubit });
        self
    }

    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.operations.push(Operation::X { qubit });
        self
    }

    pub fn reset(&mut self, qubit: usize) -> &mut Self {
        self.operations.push(Operation::Reset { qubit });
        self
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> &mut Self {
        self.operations.push(Operation::Measure { qubit, clbit });
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Check register sizes and operand indices before execution
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.num_qubits == 0 || self.num_qubits > MAX_SIMULATED_QUBITS {
            return Err(BackendError::Misconfigured(format!(
                "circuit has {} qubits (supported: 1..={})",
                self.num_qubits, MAX_SIMULATED_QUBITS
            )));
        }
        if !self
            .operations
            .iter()
            .any(|op| matches!(op, Operation::Measure { .. }))
        {
            return Err(BackendError::Misconfigured(
                "circuit has no measurement".to_string(),
            ));
        }

        for op in &self.operations {
            let (qubit, clbit) = match *op {
                Operation::H { qubit } | Operation::X { qubit } | Operation::Reset { qubit } => {
                    (qubit, None)
                }
                Operation::Measure { qubit, clbit } => (qubit, Some(clbit)),
            };
            if qubit >= self.num_qubits {
                return Err(BackendError::Misconfigured(format!(
                    "operation {:?} addresses qubit {} of a {}-qubit register",
                    op, qubit, self.num_qubits
                )));
            }
            if let Some(clbit) = clbit {
                if clbit >= self.num_clbits {
                    return Err(BackendError::Misconfigured(format!(
                        "operation {:?} addresses classical bit {} of a {}-bit register",
                        op, clbit, self.num_clbits
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize to OpenQASM 2.0, the format accepted by the remote service
    pub fn to_qasm(&self) -> String {
        let mut qasm = String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");
        // Writing into a String cannot fail.
        let _ = writeln!(qasm, "qreg q[{}];", self.num_qubits);
        let _ = writeln!(qasm, "creg c[{}];", self.num_clbits);

        for op in &self.operations {
            let _ = match op {
                Operation::H { qubit } => writeln!(qasm, "h q[{}];", qubit),
                Operation::X { qubit } => writeln!(qasm, "x q[{}];", qubit),
                Operation::Reset { qubit } => writeln!(qasm, "reset q[{}];", qubit),
                Operation::Measure { qubit, clbit } => {
                    writeln!(qasm, "measure q[{}] -> c[{}];", qubit, clbit)
                }
            };
        }

        qasm
    }
}
