use crate::utils::constants::{SCHEMA_COS_HYD, SCHEMA_SOIL_LAYERS};
use serde::{Deserialize, Serialize};

/// How the files of a family are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyKind {
    /// One row per grid cell with `i, j, x, y` and data columns
    Tabular,
    /// A bare matrix per layer, aligned with the tabular grid
    Gridded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SoilFamily {
    CosRawl,
    HydRawl,
    HydClap,
    HydCosb,
    StexTab,
    SoilText,
    Txdm1,
    Pcnts,
}

impl SoilFamily {
    pub const ALL: [SoilFamily; 8] = [
        SoilFamily::CosRawl,
        SoilFamily::HydRawl,
        SoilFamily::HydClap,
        SoilFamily::HydCosb,
        SoilFamily::StexTab,
        SoilFamily::SoilText,
        SoilFamily::Txdm1,
        SoilFamily::Pcnts,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_uppercase();
        Self::ALL.into_iter().find(|f| f.name() == upper)
    }

    /// File name token used by the archive
    pub fn name(&self) -> &'static str {
        match self {
            SoilFamily::CosRawl => "COS_RAWL",
            SoilFamily::HydRawl => "HYD_RAWL",
            SoilFamily::HydClap => "HYD_CLAP",
            SoilFamily::HydCosb => "HYD_COSB",
            SoilFamily::StexTab => "STEX_TAB",
            SoilFamily::SoilText => "SOILTEXT",
            SoilFamily::Txdm1 => "TXDM1",
            SoilFamily::Pcnts => "PCNTS",
        }
    }

    pub fn kind(&self) -> FamilyKind {
        match self {
            SoilFamily::CosRawl
            | SoilFamily::HydRawl
            | SoilFamily::HydClap
            | SoilFamily::HydCosb
            | SoilFamily::StexTab => FamilyKind::Tabular,
            SoilFamily::SoilText | SoilFamily::Txdm1 | SoilFamily::Pcnts => FamilyKind::Gridded,
        }
    }

    /// Metadata schema holding the column layout of a tabular family
    pub fn schema(&self) -> Option<&'static str> {
        match self {
            SoilFamily::CosRawl
            | SoilFamily::HydRawl
            | SoilFamily::HydClap
            | SoilFamily::HydCosb => Some(SCHEMA_COS_HYD),
            SoilFamily::StexTab => Some(SCHEMA_SOIL_LAYERS),
            _ => None,
        }
    }

    /// Whether rasters of this family define the grid for gridded families
    pub fn provides_grid(&self) -> bool {
        matches!(self, SoilFamily::CosRawl)
    }

    pub fn is_tabular(&self) -> bool {
        self.kind() == FamilyKind::Tabular
    }

    /// Case-insensitive, so local files match the links they were downloaded from
    pub fn matches_file(&self, filename: &str) -> bool {
        filename.to_ascii_uppercase().contains(self.name())
    }

    /// Case-insensitive match used on archive links
    pub fn matches_link(&self, link: &str) -> bool {
        link.to_ascii_uppercase().contains(self.name())
    }
}

impl std::fmt::Display for SoilFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
