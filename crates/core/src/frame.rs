//! Frame types and their construction families.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Frame type as supplied by the catalogue or the customer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    FullRimPlastic,
    FullRimMetal,
    HalfRim,
    SemiRimless,
    Rimless,
    Drilled,
    #[serde(other)]
    Other,
}

/// Construction family; keys the index and safety tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameFamily {
    FullRim,
    HalfRim,
    Rimless,
    Other,
}

impl FrameType {
    pub fn family(self) -> FrameFamily {
        match self {
            FrameType::FullRimPlastic | FrameType::FullRimMetal => FrameFamily::FullRim,
            FrameType::HalfRim | FrameType::SemiRimless => FrameFamily::HalfRim,
            FrameType::Rimless | FrameType::Drilled => FrameFamily::Rimless,
            FrameType::Other => FrameFamily::Other,
        }
    }

    /// Lenient parse: case, hyphens, spaces and underscores are ignored. Unknown names are
    /// [`FrameType::Other`].
    pub fn parse(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "fullrimplastic" => FrameType::FullRimPlastic,
            "fullrimmetal" => FrameType::FullRimMetal,
            "halfrim" => FrameType::HalfRim,
            "semirimless" => FrameType::SemiRimless,
            "rimless" => FrameType::Rimless,
            "drilled" => FrameType::Drilled,
            _ => FrameType::Other,
        }
    }
}

impl FromStr for FrameType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
