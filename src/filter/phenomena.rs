//! Ice and overgrowth phenomenon codes reported by hydro stations

use serde::Serialize;

/// Ice phenomenon codes with their Polish descriptions
pub const ICE_PHENOMENA: &[(&str, &str)] = &[
    ("01", "Śryż"),
    ("02", "Kra"),
    ("03", "Lód brzegowy"),
    ("04", "Pokrywa lodowa"),
    ("05", "Zator lodowy"),
    ("06", "Lód brzegowy i śryż"),
    ("07", "Lód brzegowy i kra"),
    ("08", "Śryż i kra"),
    ("09", "Zator śryżowy"),
    ("32", "Lód zatokowy"),
    ("41", "Woda na lodzie"),
    ("42", "Lód pływający (wolny od brzegów)"),
    ("43", "Lód zmurszały (dziurawy)"),
];

pub fn ice_description(code: u32) -> Option<&'static str> {
    ICE_PHENOMENA
        .iter()
        .find(|(key, _)| key.parse::<u32>().ok() == Some(code))
        .map(|(_, desc)| *desc)
}

/// Overgrowth code in `dpw` notation: one digit each for bottom (d),
/// floating (p) and emergent (w) vegetation, each a degree from 0 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthCode {
    pub bottom: u8,
    pub floating: u8,
    pub emergent: u8,
}

impl GrowthCode {
    pub fn decode(code: u32) -> Option<Self> {
        if code > 333 {
            return None;
        }
        let digit = |n: u32| -> Option<u8> { (n <= 3).then_some(n as u8) };
        Some(Self {
            bottom: digit(code / 100)?,
            floating: digit(code / 10 % 10)?,
            emergent: digit(code % 10)?,
        })
    }

    pub fn describe(&self) -> String {
        format!(
            "denna: {}, pływająca: {}, wystająca: {}",
            degree_label(self.bottom),
            degree_label(self.floating),
            degree_label(self.emergent)
        )
    }
}

fn degree_label(degree: u8) -> &'static str {
    match degree {
        0 => "brak",
        1 => "1/3",
        2 => "2/3",
        _ => "całkowite",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ice_codes_match_numerically() {
        assert_eq!(ice_description(4), Some("Pokrywa lodowa"));
        assert_eq!(ice_description(42), Some("Lód pływający (wolny od brzegów)"));
        assert_eq!(ice_description(10), None);
    }

    #[test]
    fn test_growth_code_decoding() {
        let code = GrowthCode::decode(112).unwrap();
        assert_eq!((code.bottom, code.floating, code.emergent), (1, 1, 2));
        assert_eq!(code.describe(), "denna: 1/3, pływająca: 1/3, wystająca: 2/3");

        assert_eq!(GrowthCode::decode(3), Some(GrowthCode { bottom: 0, floating: 0, emergent: 3 }));
        assert!(GrowthCode::decode(140).is_none());
        assert!(GrowthCode::decode(400).is_none());
    }
}
