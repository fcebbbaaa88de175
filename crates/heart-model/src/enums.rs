//! Type-safe enumerations for the categorical form fields.
//!
//! Each categorical field is one-hot encoded downstream. The wire value
//! returned by [`Categorical::as_str`] is exactly the suffix used in the
//! one-hot column name, and [`Categorical::PREFIX`] is the column prefix,
//! so `ChestPainType::Asy` lands in column `ChestPainType_ASY`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A categorical form field with a fixed, enumerated set of values.
pub trait Categorical: Copy + Sized + 'static {
    /// Column prefix used by the feature schema for this field.
    const PREFIX: &'static str;

    /// Human-readable field name, used in error messages.
    const FIELD: &'static str;

    /// Every value of the field, in form order.
    const ALL: &'static [Self];

    /// The wire value, as it appears after the underscore in a one-hot column.
    fn as_str(&self) -> &'static str;
}

/// Implements `Display` and `FromStr` for a categorical enum.
///
/// `FromStr` is case-insensitive and accepts the extra spellings listed
/// after each variant's wire value.
macro_rules! categorical {
    ($ty:ident { $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase();
                $(
                    if normalized == $wire.to_ascii_uppercase()
                        $(|| normalized == $alias.to_ascii_uppercase())*
                    {
                        return Ok($ty::$variant);
                    }
                )+
                Err(ModelError::UnknownCategory {
                    field: <$ty as Categorical>::FIELD,
                    value: s.to_string(),
                })
            }
        }
    };
}

/// Biological sex as captured by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Long display label ("Male" / "Female").
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl Categorical for Gender {
    const PREFIX: &'static str = "Gender";
    const FIELD: &'static str = "gender";
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

categorical!(Gender {
    Male => "M" | "MALE",
    Female => "F" | "FEMALE",
});

/// Chest pain type.
///
/// - `ATA`: atypical angina
/// - `NAP`: non-anginal pain
/// - `TA`: typical angina
/// - `ASY`: asymptomatic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChestPainType {
    Ata,
    Nap,
    Ta,
    Asy,
}

impl ChestPainType {
    pub fn label(&self) -> &'static str {
        match self {
            ChestPainType::Ata => "Atypical angina",
            ChestPainType::Nap => "Non-anginal pain",
            ChestPainType::Ta => "Typical angina",
            ChestPainType::Asy => "Asymptomatic",
        }
    }
}

impl Categorical for ChestPainType {
    const PREFIX: &'static str = "ChestPainType";
    const FIELD: &'static str = "chest pain type";
    const ALL: &'static [Self] = &[
        ChestPainType::Ata,
        ChestPainType::Nap,
        ChestPainType::Ta,
        ChestPainType::Asy,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ChestPainType::Ata => "ATA",
            ChestPainType::Nap => "NAP",
            ChestPainType::Ta => "TA",
            ChestPainType::Asy => "ASY",
        }
    }
}

categorical!(ChestPainType {
    Ata => "ATA" | "ATYPICAL ANGINA",
    Nap => "NAP" | "NON-ANGINAL PAIN",
    Ta => "TA" | "TYPICAL ANGINA",
    Asy => "ASY" | "ASYMPTOMATIC",
});

/// Resting electrocardiogram result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestingEcg {
    Normal,
    /// ST-T wave abnormality.
    #[serde(rename = "ST")]
    St,
    /// Left ventricular hypertrophy.
    #[serde(rename = "LVH")]
    Lvh,
}

impl Categorical for RestingEcg {
    const PREFIX: &'static str = "RestingECG";
    const FIELD: &'static str = "resting ECG";
    const ALL: &'static [Self] = &[RestingEcg::Normal, RestingEcg::St, RestingEcg::Lvh];

    fn as_str(&self) -> &'static str {
        match self {
            RestingEcg::Normal => "Normal",
            RestingEcg::St => "ST",
            RestingEcg::Lvh => "LVH",
        }
    }
}

categorical!(RestingEcg {
    Normal => "Normal",
    St => "ST",
    Lvh => "LVH",
});

/// Exercise-induced angina flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseAngina {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl ExerciseAngina {
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseAngina::Yes => "Yes",
            ExerciseAngina::No => "No",
        }
    }
}

impl Categorical for ExerciseAngina {
    const PREFIX: &'static str = "ExerciseAngina";
    const FIELD: &'static str = "exercise angina";
    const ALL: &'static [Self] = &[ExerciseAngina::Yes, ExerciseAngina::No];

    fn as_str(&self) -> &'static str {
        match self {
            ExerciseAngina::Yes => "Y",
            ExerciseAngina::No => "N",
        }
    }
}

categorical!(ExerciseAngina {
    Yes => "Y" | "YES",
    No => "N" | "NO",
});

/// Slope of the peak exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

impl Categorical for StSlope {
    const PREFIX: &'static str = "ST_Slope";
    const FIELD: &'static str = "ST slope";
    const ALL: &'static [Self] = &[StSlope::Up, StSlope::Flat, StSlope::Down];

    fn as_str(&self) -> &'static str {
        match self {
            StSlope::Up => "Up",
            StSlope::Flat => "Flat",
            StSlope::Down => "Down",
        }
    }
}

categorical!(StSlope {
    Up => "Up" | "UPSLOPING",
    Flat => "Flat",
    Down => "Down" | "DOWNSLOPING",
});
