//! Wavefunction files.
//!
//! Numeric wavefunctions are stored as JSON with parallel real and imaginary
//! arrays:
//!
//! ```json
//! {
//!   "schema": "qwave-wavefunction",
//!   "n_qubits": 1,
//!   "amplitudes": { "real": [1.0, 0.0], "imag": [0.0, 0.0] }
//! }
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::wavefunction::Wavefunction;

/// Schema tag written into every wavefunction document.
pub const WAVEFUNCTION_SCHEMA: &str = "qwave-wavefunction";

#[derive(Debug, Serialize, Deserialize)]
struct ComplexArray {
    real: Vec<f64>,
    imag: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WavefunctionDocument {
    schema: String,
    n_qubits: usize,
    amplitudes: ComplexArray,
}

impl WavefunctionDocument {
    fn from_wavefunction(wavefunction: &Wavefunction) -> StateResult<Self> {
        let amplitudes = wavefunction
            .as_array()
            .ok_or(StateError::SymbolicState("save_wavefunction"))?;
        Ok(Self {
            schema: WAVEFUNCTION_SCHEMA.to_string(),
            n_qubits: wavefunction.n_qubits(),
            amplitudes: ComplexArray {
                real: amplitudes.iter().map(|a| a.re).collect(),
                imag: amplitudes.iter().map(|a| a.im).collect(),
            },
        })
    }

    fn into_wavefunction(self) -> StateResult<Wavefunction> {
        if self.schema != WAVEFUNCTION_SCHEMA {
            return Err(StateError::InvalidDocument(format!(
                "unexpected schema '{}'",
                self.schema
            )));
        }
        let ComplexArray { real, imag } = self.amplitudes;
        if real.len() != imag.len() {
            return Err(StateError::InvalidDocument(format!(
                "{} real parts but {} imaginary parts",
                real.len(),
                imag.len()
            )));
        }
        let wavefunction = Wavefunction::new(
            real.into_iter()
                .zip(imag)
                .map(|(re, im)| Complex64::new(re, im))
                .collect(),
        )?;
        if wavefunction.n_qubits() != self.n_qubits {
            return Err(StateError::InvalidDocument(format!(
                "n_qubits is {} but the amplitudes describe {} qubits",
                self.n_qubits,
                wavefunction.n_qubits()
            )));
        }
        Ok(wavefunction)
    }
}

/// Serialize a numeric wavefunction to a JSON string.
pub fn wavefunction_to_json(wavefunction: &Wavefunction) -> StateResult<String> {
    let doc = WavefunctionDocument::from_wavefunction(wavefunction)?;
    Ok(serde_json::to_string(&doc)?)
}

/// Parse a wavefunction from a JSON string.
pub fn wavefunction_from_json(json: &str) -> StateResult<Wavefunction> {
    let doc: WavefunctionDocument = serde_json::from_str(json)?;
    doc.into_wavefunction()
}

/// Write a numeric wavefunction to `path`.
pub fn save_wavefunction(wavefunction: &Wavefunction, path: impl AsRef<Path>) -> StateResult<()> {
    let path = path.as_ref();
    let doc = WavefunctionDocument::from_wavefunction(wavefunction)?;
    write_document(&doc, BufWriter::new(File::create(path)?))?;
    debug!(path = %path.display(), n_qubits = doc.n_qubits, "saved wavefunction");
    Ok(())
}

fn write_document(doc: &WavefunctionDocument, mut writer: impl Write) -> StateResult<()> {
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.flush()?;
    Ok(())
}

/// Read a wavefunction written by [`save_wavefunction`].
pub fn load_wavefunction(path: impl AsRef<Path>) -> StateResult<Wavefunction> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let doc: WavefunctionDocument = serde_json::from_reader(reader)?;
    debug!(path = %path.display(), n_qubits = doc.n_qubits, "loading wavefunction");
    doc.into_wavefunction()
}
