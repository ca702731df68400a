//! Paper sizes for rendered diagrams

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Paper size a view is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSize {
    #[serde(rename = "A6_Portrait")]
    A6Portrait,
    #[serde(rename = "A6_Landscape")]
    A6Landscape,
    #[serde(rename = "A5_Portrait")]
    A5Portrait,
    #[serde(rename = "A5_Landscape")]
    A5Landscape,
    #[serde(rename = "A4_Portrait")]
    A4Portrait,
    #[serde(rename = "A4_Landscape")]
    A4Landscape,
    #[serde(rename = "A3_Portrait")]
    A3Portrait,
    #[serde(rename = "A3_Landscape")]
    A3Landscape,
    #[serde(rename = "A2_Portrait")]
    A2Portrait,
    #[serde(rename = "A2_Landscape")]
    A2Landscape,
    #[serde(rename = "A1_Portrait")]
    A1Portrait,
    #[serde(rename = "A1_Landscape")]
    A1Landscape,
    #[serde(rename = "A0_Portrait")]
    A0Portrait,
    #[serde(rename = "A0_Landscape")]
    A0Landscape,
    #[serde(rename = "Letter_Portrait")]
    LetterPortrait,
    #[serde(rename = "Letter_Landscape")]
    LetterLandscape,
    #[serde(rename = "Legal_Portrait")]
    LegalPortrait,
    #[serde(rename = "Legal_Landscape")]
    LegalLandscape,
    #[serde(rename = "Slide_4_3")]
    Slide4x3,
    #[serde(rename = "Slide_16_9")]
    Slide16x9,
    #[serde(rename = "Slide_16_10")]
    Slide16x10,
}

impl PaperSize {
    pub const ALL: [PaperSize; 21] = [
        PaperSize::A6Portrait,
        PaperSize::A6Landscape,
        PaperSize::A5Portrait,
        PaperSize::A5Landscape,
        PaperSize::A4Portrait,
        PaperSize::A4Landscape,
        PaperSize::A3Portrait,
        PaperSize::A3Landscape,
        PaperSize::A2Portrait,
        PaperSize::A2Landscape,
        PaperSize::A1Portrait,
        PaperSize::A1Landscape,
        PaperSize::A0Portrait,
        PaperSize::A0Landscape,
        PaperSize::LetterPortrait,
        PaperSize::LetterLandscape,
        PaperSize::LegalPortrait,
        PaperSize::LegalLandscape,
        PaperSize::Slide4x3,
        PaperSize::Slide16x9,
        PaperSize::Slide16x10,
    ];

    /// Returns the wire name, e.g. `A4_Landscape`
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::A6Portrait => "A6_Portrait",
            PaperSize::A6Landscape => "A6_Landscape",
            PaperSize::A5Portrait => "A5_Portrait",
            PaperSize::A5Landscape => "A5_Landscape",
            PaperSize::A4Portrait => "A4_Portrait",
            PaperSize::A4Landscape => "A4_Landscape",
            PaperSize::A3Portrait => "A3_Portrait",
            PaperSize::A3Landscape => "A3_Landscape",
            PaperSize::A2Portrait => "A2_Portrait",
            PaperSize::A2Landscape => "A2_Landscape",
            PaperSize::A1Portrait => "A1_Portrait",
            PaperSize::A1Landscape => "A1_Landscape",
            PaperSize::A0Portrait => "A0_Portrait",
            PaperSize::A0Landscape => "A0_Landscape",
            PaperSize::LetterPortrait => "Letter_Portrait",
            PaperSize::LetterLandscape => "Letter_Landscape",
            PaperSize::LegalPortrait => "Legal_Portrait",
            PaperSize::LegalLandscape => "Legal_Landscape",
            PaperSize::Slide4x3 => "Slide_4_3",
            PaperSize::Slide16x9 => "Slide_16_9",
            PaperSize::Slide16x10 => "Slide_16_10",
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PaperSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown paper size: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_matches_serde() {
        for size in PaperSize::ALL {
            let json = serde_json::to_string(&size).unwrap();
            assert_eq!(json, format!("\"{}\"", size.as_str()));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("a5_landscape".parse::<PaperSize>(), Ok(PaperSize::A5Landscape));
        assert!("A9".parse::<PaperSize>().is_err());
    }

    #[test]
    fn large_and_widescreen_sizes_parse() {
        for name in ["A1_Landscape", "A0_Portrait", "Slide_16_10"] {
            let size: PaperSize = serde_json::from_str(&format!("\"{}\"", name)).unwrap();
            assert_eq!(size.as_str(), name);
        }
    }
}
