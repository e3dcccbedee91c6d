use serde::{Deserialize, Serialize};

/// Which currency the entered amount is denominated in.
///
/// The rate is always quoted as "1 CNY = rate RUB", so the direction decides
/// whether the amount is multiplied or divided by it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Amount is in yuan, result in rubles.
    #[default]
    CnyToRub,
    /// Amount is in rubles, result in yuan.
    RubToCny,
}

impl Direction {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::CnyToRub => Self::RubToCny,
            Self::RubToCny => Self::CnyToRub,
        }
    }

    /// Currency the amount is entered in.
    pub fn source_currency(self) -> &'static str {
        match self {
            Self::CnyToRub => "CNY",
            Self::RubToCny => "RUB",
        }
    }

    /// Currency the converted values are expressed in.
    pub fn target_currency(self) -> &'static str {
        self.toggled().source_currency()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}→{}", self.source_currency(), self.target_currency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_both_ways() {
        assert_eq!(Direction::CnyToRub.toggled(), Direction::RubToCny);
        assert_eq!(Direction::RubToCny.toggled(), Direction::CnyToRub);
    }

    #[test]
    fn test_currencies() {
        assert_eq!(Direction::CnyToRub.source_currency(), "CNY");
        assert_eq!(Direction::CnyToRub.target_currency(), "RUB");
        assert_eq!(Direction::RubToCny.source_currency(), "RUB");
        assert_eq!(Direction::RubToCny.target_currency(), "CNY");
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Direction::CnyToRub.to_string(), "CNY→RUB");
        assert_eq!(
            serde_json::to_string(&Direction::RubToCny).unwrap(),
            "\"RUB_TO_CNY\""
        );
        let parsed: Direction = serde_json::from_str("\"CNY_TO_RUB\"").unwrap();
        assert_eq!(parsed, Direction::CnyToRub);
    }
}
