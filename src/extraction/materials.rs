use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConductorMaterial {
    Copper,
    Aluminium,
}

impl ConductorMaterial {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copper => "Copper",
            Self::Aluminium => "Aluminium",
        }
    }

    pub fn constants(self) -> Option<MaterialConstants> {
        MATERIAL_CONSTANTS
            .iter()
            .find(|row| row.material == self)
            .map(|row| row.constants)
    }
}

impl FromStr for ConductorMaterial {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "copper" | "cu" => Ok(Self::Copper),
            "aluminium" | "aluminum" | "al" => Ok(Self::Aluminium),
            other => bail!("unknown conductor material: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheathMaterial {
    Copper,
    Aluminium,
    Lead,
    Steel,
    Bronze,
}

impl SheathMaterial {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copper => "Copper",
            Self::Aluminium => "Aluminium",
            Self::Lead => "Lead",
            Self::Steel => "Steel",
            Self::Bronze => "Bronze",
        }
    }
}

impl FromStr for SheathMaterial {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "copper" => Ok(Self::Copper),
            "aluminium" | "aluminum" => Ok(Self::Aluminium),
            "lead" => Ok(Self::Lead),
            "steel" => Ok(Self::Steel),
            "bronze" => Ok(Self::Bronze),
            other => bail!("unknown sheath material: {other}"),
        }
    }
}

/// Insulation compounds; the outer-sheath field draws from the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsulationMaterial {
    #[serde(rename = "XLPE")]
    Xlpe,
    #[serde(rename = "EPR")]
    Epr,
    #[serde(rename = "PVC")]
    Pvc,
    #[serde(rename = "PE")]
    Pe,
    Oil,
}

impl InsulationMaterial {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xlpe => "XLPE",
            Self::Epr => "EPR",
            Self::Pvc => "PVC",
            Self::Pe => "PE",
            Self::Oil => "Oil",
        }
    }
}

impl FromStr for InsulationMaterial {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xlpe" => Ok(Self::Xlpe),
            "epr" => Ok(Self::Epr),
            "pvc" => Ok(Self::Pvc),
            "pe" => Ok(Self::Pe),
            "oil" => Ok(Self::Oil),
            other => bail!("unknown insulation material: {other}"),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_as_str!(ConductorMaterial, SheathMaterial, InsulationMaterial);

/// Short-circuit thermal constants: K in A·s½/mm², β in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialConstants {
    pub k: f64,
    pub beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialConstantRow {
    pub material: ConductorMaterial,
    pub constants: MaterialConstants,
}

pub const MATERIAL_CONSTANTS: [MaterialConstantRow; 2] = [
    MaterialConstantRow {
        material: ConductorMaterial::Copper,
        constants: MaterialConstants {
            k: 226.0,
            beta: 234.5,
        },
    },
    MaterialConstantRow {
        material: ConductorMaterial::Aluminium,
        constants: MaterialConstants {
            k: 148.0,
            beta: 228.0,
        },
    },
];

pub fn lookup(material: &str) -> Option<MaterialConstants> {
    material.parse::<ConductorMaterial>().ok()?.constants()
}
