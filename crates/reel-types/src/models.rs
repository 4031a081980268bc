use serde::{Deserialize, Serialize};

/// Encoded quality of a stored video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    /// 720p
    #[serde(rename = "HD")]
    Hd,
    /// 1080p
    #[serde(rename = "FHD")]
    Fhd,
    /// 2160p
    #[serde(rename = "UHD")]
    Uhd,
}

impl Quality {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HD" => Some(Self::Hd),
            "FHD" => Some(Self::Fhd),
            "UHD" => Some(Self::Uhd),
            _ => None,
        }
    }
}
