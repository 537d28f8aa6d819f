use anyhow::{Context, Result};
use regex::Regex;

use super::lines::{
    INSULATION_HEADER_LINES, LineWindow, MATERIAL_HEADER_LINES, VOLTAGE_HEADER_LINES,
};
use super::materials::{ConductorMaterial, InsulationMaterial, SheathMaterial};

const SHORT_CIRCUIT_KEYWORDS: [&str; 5] = ["short", "circuit", "fault", "ik", "isc"];
const OUTER_SHEATH_WHITELIST: [&str; 5] = ["PE", "PVC", "XLPE", "EPR", "OIL"];
const SCC_CANDIDATE_MAX_KA: f64 = 1000.0;

/// Independent field heuristics. Every detector is a pure function of its
/// input and treats a missing or unparsable match as absence.
#[derive(Debug)]
pub struct FieldDetectors {
    header_voltage: Regex,
    outer_sheath: Regex,
    copper_conductor: Regex,
    aluminium_conductor: Regex,
    sheath_materials: Vec<(SheathMaterial, Regex)>,
    strong_copper: Regex,
    strong_aluminium: Regex,
    rated_voltage: Regex,
    decimal_token: Regex,
    duration: Regex,
}

impl FieldDetectors {
    pub fn new() -> Result<Self> {
        let sheath_patterns = [
            (SheathMaterial::Aluminium, r"\b(?:aluminium|aluminum)\b[^,\n]*\bsheath"),
            (SheathMaterial::Copper, r"\bcopper\b[^,\n]*\bsheath"),
            (SheathMaterial::Lead, r"\blead\b[^,\n]*\bsheath"),
            (SheathMaterial::Steel, r"\bsteel\b[^,\n]*\bsheath"),
            (SheathMaterial::Bronze, r"\bbronze\b[^,\n]*\bsheath"),
        ];
        let mut sheath_materials = Vec::with_capacity(sheath_patterns.len());
        for (material, pattern) in sheath_patterns {
            let regex = Regex::new(pattern)
                .with_context(|| format!("failed to compile {material} sheath regex"))?;
            sheath_materials.push((material, regex));
        }

        Ok(Self {
            header_voltage: Regex::new(r"(\d+(?:\.\d+)?)\s*kv")
                .context("failed to compile header voltage regex")?,
            outer_sheath: Regex::new(r"\b([a-z]+)\s+outer\s+sheath")
                .context("failed to compile outer sheath regex")?,
            copper_conductor: Regex::new(r"\b(?:copper|cu)\b[^,\n]*\bconductor")
                .context("failed to compile copper conductor regex")?,
            aluminium_conductor: Regex::new(r"\b(?:aluminium|aluminum|al)\b[^,\n]*\bconductor")
                .context("failed to compile aluminium conductor regex")?,
            sheath_materials,
            strong_copper: Regex::new(r"(?:copper|cu) conductor")
                .context("failed to compile copper conductor phrase regex")?,
            strong_aluminium: Regex::new(r"(?:aluminium|aluminum|al) conductor")
                .context("failed to compile aluminium conductor phrase regex")?,
            rated_voltage: Regex::new(
                r"(?i)rated[ \t]+voltage[ \t]*:[ \t]*([0-9/ \t.]+?)[ \t]*kv",
            )
            .context("failed to compile rated voltage regex")?,
            decimal_token: Regex::new(r"\d+(?:[.,]\d+)?")
                .context("failed to compile decimal token regex")?,
            duration: Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:seconds|second|secs|sec|s)")
                .context("failed to compile duration regex")?,
        })
    }

    /// Voltage and a coarse conductor hint from the title lines.
    pub fn header_voltage_and_material(
        &self,
        window: &LineWindow,
    ) -> (Option<f64>, Option<ConductorMaterial>) {
        let header = window.joined_lowercase(VOLTAGE_HEADER_LINES);

        let voltage_kv = self
            .header_voltage
            .captures(&header)
            .and_then(|captures| captures.get(1))
            .and_then(|value| parse_decimal(value.as_str()));

        let material = if header.contains("copper") || header.contains(" cu ") {
            Some(ConductorMaterial::Copper)
        } else if header.contains("aluminium")
            || header.contains("aluminum")
            || header.contains(" al ")
        {
            Some(ConductorMaterial::Aluminium)
        } else {
            None
        };

        (voltage_kv, material)
    }

    pub fn insulation_and_outer_sheath(
        &self,
        window: &LineWindow,
    ) -> (Option<InsulationMaterial>, Option<InsulationMaterial>) {
        let header = window.joined_lowercase(INSULATION_HEADER_LINES);

        let insulation = if header.contains("xlpe") {
            Some(InsulationMaterial::Xlpe)
        } else if header.contains("epr") {
            Some(InsulationMaterial::Epr)
        } else if header.contains("pvc") {
            Some(InsulationMaterial::Pvc)
        } else if header.contains(" pe ")
            || header.contains("pe insulation")
            || header.contains("pe insulated")
        {
            Some(InsulationMaterial::Pe)
        } else if header.contains("oil filled") || header.contains("oil-filled") {
            Some(InsulationMaterial::Oil)
        } else {
            None
        };

        let outer_sheath = self
            .outer_sheath
            .captures(&header)
            .and_then(|captures| captures.get(1))
            .map(|word| word.as_str().to_ascii_uppercase())
            .filter(|word| OUTER_SHEATH_WHITELIST.contains(&word.as_str()))
            .and_then(|word| word.parse::<InsulationMaterial>().ok());

        (insulation, outer_sheath)
    }

    pub fn header_conductor_and_sheath(
        &self,
        window: &LineWindow,
    ) -> (Option<ConductorMaterial>, Option<SheathMaterial>) {
        let header = window.joined_lowercase(MATERIAL_HEADER_LINES);

        let conductor = if self.copper_conductor.is_match(&header) {
            Some(ConductorMaterial::Copper)
        } else if self.aluminium_conductor.is_match(&header) {
            Some(ConductorMaterial::Aluminium)
        } else {
            None
        };

        let sheath = self
            .sheath_materials
            .iter()
            .find(|(_, regex)| regex.is_match(&header))
            .map(|(material, _)| *material);

        (conductor, sheath)
    }

    /// Whole-document conductor fallback: an explicit "<material> conductor"
    /// phrase wins, otherwise a material mentioned without its rival.
    pub fn global_conductor(&self, text: &str) -> Option<ConductorMaterial> {
        let folded = text.to_lowercase();

        if self.strong_copper.is_match(&folded) {
            return Some(ConductorMaterial::Copper);
        }
        if self.strong_aluminium.is_match(&folded) {
            return Some(ConductorMaterial::Aluminium);
        }

        let mentions_copper = folded.contains("copper") || folded.contains(" cu ");
        let mentions_aluminium = folded.contains("aluminium")
            || folded.contains("aluminum")
            || folded.contains(" al ");

        match (mentions_copper, mentions_aluminium) {
            (true, false) => Some(ConductorMaterial::Copper),
            (false, true) => Some(ConductorMaterial::Aluminium),
            _ => None,
        }
    }

    pub fn rated_voltages(&self, text: &str) -> Vec<f64> {
        let Some(group) = self
            .rated_voltage
            .captures(text)
            .and_then(|captures| captures.get(1))
        else {
            return Vec::new();
        };

        self.decimal_token
            .find_iter(group.as_str())
            .filter_map(|token| parse_decimal(token.as_str()))
            .collect()
    }

    /// Largest plausible kA figure on lines that look like a current rating.
    pub fn short_circuit_current(&self, text: &str) -> Option<f64> {
        let rating_lines = text
            .lines()
            .map(str::to_lowercase)
            .filter(|line| line.contains('k') && line.contains('a'))
            .collect::<Vec<String>>();

        let keyword_lines = rating_lines
            .iter()
            .filter(|line| mentions_short_circuit(line))
            .map(String::as_str);
        if let Some(value) = self.max_current_candidate(keyword_lines) {
            return Some(value);
        }

        self.max_current_candidate(rating_lines.iter().map(String::as_str))
    }

    pub fn short_circuit_duration(&self, text: &str) -> Option<f64> {
        let keyword_match = text
            .lines()
            .filter(|line| mentions_short_circuit(&line.to_lowercase()))
            .find_map(|line| self.first_duration(line));

        keyword_match.or_else(|| self.first_duration(text))
    }

    fn max_current_candidate<'a>(&self, lines: impl Iterator<Item = &'a str>) -> Option<f64> {
        lines
            .flat_map(|line| self.decimal_token.find_iter(line))
            .filter_map(|token| parse_decimal(token.as_str()))
            .filter(|value| *value > 0.0 && *value < SCC_CANDIDATE_MAX_KA)
            .reduce(f64::max)
    }

    fn first_duration(&self, haystack: &str) -> Option<f64> {
        self.duration
            .captures_iter(haystack)
            .filter_map(|captures| captures.get(1))
            .find_map(|value| parse_decimal(value.as_str()))
    }
}

fn mentions_short_circuit(folded_line: &str) -> bool {
    SHORT_CIRCUIT_KEYWORDS
        .iter()
        .any(|keyword| folded_line.contains(keyword))
}

fn parse_decimal(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
