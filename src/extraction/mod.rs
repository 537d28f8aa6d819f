//! Cable parameter extraction from recognized datasheet text.
//!
//! Detectors run independently over a header window or the full text and
//! each yields an optional candidate; [`resolve::resolve`] folds them into a
//! single [`CableParameterRecord`]. Extraction never fails once the
//! detectors are compiled: anything that cannot be recognized stays `None`.

mod detectors;
mod lines;
mod materials;
mod resolve;
#[cfg(test)]
mod tests;

use anyhow::Result;
use tracing::debug;

use detectors::FieldDetectors;
use lines::{HEADER_WINDOW_LINES, segment};
use resolve::{FieldCandidates, resolve};

pub use resolve::CableParameterRecord;

/// Immutable extraction pipeline; share one instance across threads.
#[derive(Debug)]
pub struct CableParameterExtractor {
    detectors: FieldDetectors,
}

impl CableParameterExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            detectors: FieldDetectors::new()?,
        })
    }

    pub fn extract(&self, text: &str) -> CableParameterRecord {
        let candidates = self.detect(text);
        debug!(
            header_voltage_kv = ?candidates.header_voltage_kv,
            rated_voltage_count = candidates.rated_voltages.len(),
            header_conductor = ?candidates.header_conductor,
            global_conductor = ?candidates.global_conductor,
            header_material = ?candidates.header_material,
            "collected field candidates"
        );
        resolve(candidates)
    }

    fn detect(&self, text: &str) -> FieldCandidates {
        let window = segment(text, HEADER_WINDOW_LINES);
        let detectors = &self.detectors;

        let (header_voltage_kv, header_material) = detectors.header_voltage_and_material(&window);
        let (insulation, outer_sheath) = detectors.insulation_and_outer_sheath(&window);
        let (header_conductor, sheath) = detectors.header_conductor_and_sheath(&window);

        FieldCandidates {
            header_voltage_kv,
            header_material,
            header_conductor,
            global_conductor: detectors.global_conductor(text),
            sheath,
            insulation,
            outer_sheath,
            rated_voltages: detectors.rated_voltages(text),
            scc_ka: detectors.short_circuit_current(text),
            time_sec: detectors.short_circuit_duration(text),
        }
    }
}
