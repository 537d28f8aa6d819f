use serde::{Deserialize, Serialize};
use tracing::debug;

use super::materials::{ConductorMaterial, InsulationMaterial, SheathMaterial, lookup};

/// System voltages (kV) preferred as the main voltage, highest priority first.
pub const STANDARD_SYSTEM_VOLTAGES_KV: [f64; 6] = [400.0, 220.0, 132.0, 66.0, 33.0, 11.0];
const VOLTAGE_MATCH_TOLERANCE: f64 = 1e-6;

/// Raw output of every detector for one document, before resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCandidates {
    pub header_voltage_kv: Option<f64>,
    pub header_material: Option<ConductorMaterial>,
    pub header_conductor: Option<ConductorMaterial>,
    pub global_conductor: Option<ConductorMaterial>,
    pub sheath: Option<SheathMaterial>,
    pub insulation: Option<InsulationMaterial>,
    pub outer_sheath: Option<InsulationMaterial>,
    pub rated_voltages: Vec<f64>,
    pub scc_ka: Option<f64>,
    pub time_sec: Option<f64>,
}

type ConductorSource = fn(&FieldCandidates) -> Option<ConductorMaterial>;

/// Conductor sources in precedence order; the first present candidate wins.
pub const CONDUCTOR_PRECEDENCE: [(&str, ConductorSource); 3] = [
    ("header_conductor_phrase", header_conductor),
    ("global_conductor", global_conductor),
    ("header_material_hint", header_material),
];

fn header_conductor(candidates: &FieldCandidates) -> Option<ConductorMaterial> {
    candidates.header_conductor
}

fn global_conductor(candidates: &FieldCandidates) -> Option<ConductorMaterial> {
    candidates.global_conductor
}

fn header_material(candidates: &FieldCandidates) -> Option<ConductorMaterial> {
    candidates.header_material
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableParameterRecord {
    pub voltage_kv: Option<f64>,
    pub scc_ka: Option<f64>,
    pub time_sec: Option<f64>,
    pub conductor_material: Option<ConductorMaterial>,
    pub sheath_material: Option<SheathMaterial>,
    pub insulation_material: Option<InsulationMaterial>,
    pub outer_sheath_material: Option<InsulationMaterial>,
    pub rated_voltages: Vec<f64>,
    pub k_value: Option<f64>,
    pub beta: Option<f64>,
}

pub fn resolve(candidates: FieldCandidates) -> CableParameterRecord {
    let conductor_material = resolve_conductor(&candidates);
    let voltage_kv = choose_main_voltage(candidates.header_voltage_kv, &candidates.rated_voltages);
    let constants = conductor_material.and_then(|material| lookup(material.as_str()));

    CableParameterRecord {
        voltage_kv,
        scc_ka: candidates.scc_ka,
        time_sec: candidates.time_sec,
        conductor_material,
        sheath_material: candidates.sheath,
        insulation_material: candidates.insulation,
        outer_sheath_material: candidates.outer_sheath,
        rated_voltages: candidates.rated_voltages,
        k_value: constants.map(|value| value.k),
        beta: constants.map(|value| value.beta),
    }
}

pub fn resolve_conductor(candidates: &FieldCandidates) -> Option<ConductorMaterial> {
    CONDUCTOR_PRECEDENCE.iter().find_map(|(source, pick)| {
        let material = pick(candidates)?;
        debug!(source = *source, material = %material, "resolved conductor material");
        Some(material)
    })
}

/// Prefers a standard system voltage from the rated list, then the list
/// maximum, then the title voltage.
pub fn choose_main_voltage(header_voltage_kv: Option<f64>, rated_voltages: &[f64]) -> Option<f64> {
    if rated_voltages.is_empty() {
        return header_voltage_kv;
    }

    STANDARD_SYSTEM_VOLTAGES_KV
        .iter()
        .find_map(|standard| {
            rated_voltages
                .iter()
                .copied()
                .find(|value| (value - standard).abs() < VOLTAGE_MATCH_TOLERANCE)
        })
        .or_else(|| rated_voltages.iter().copied().reduce(f64::max))
}
