//! Display options offered in the sidebar: humor level and interpretation style.
//! Both serialize as their Korean label, which is also what the form posts back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InterpretError;

/// How funny the interpretation should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HumorLevel {
    #[default]
    Slight,
    Very,
    FullGag,
    Creative,
}

impl HumorLevel {
    /// Select-box order.
    pub const ALL: [HumorLevel; 4] = [Self::Slight, Self::Very, Self::FullGag, Self::Creative];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Slight => "약간 유머러스",
            Self::Very => "매우 유머러스",
            Self::FullGag => "완전 개그",
            Self::Creative => "창의적 해석",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|l| l.label() == label)
    }
}

/// Which angle the interpretation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpretationStyle {
    #[default]
    Everyday,
    Imaginative,
    Historical,
    Modern,
    Metaphorical,
}

impl InterpretationStyle {
    /// Select-box order.
    pub const ALL: [InterpretationStyle; 5] = [
        Self::Everyday,
        Self::Imaginative,
        Self::Historical,
        Self::Modern,
        Self::Metaphorical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Everyday => "일상적 관점",
            Self::Imaginative => "창의적 상상",
            Self::Historical => "역사적 관점",
            Self::Modern => "현대적 해석",
            Self::Metaphorical => "비유적 설명",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

macro_rules! label_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = InterpretError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(s).ok_or_else(|| InterpretError::UnknownOption(s.trim().to_string()))
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

label_impls!(HumorLevel);
label_impls!(InterpretationStyle);
