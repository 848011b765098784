use std::fmt;

use crate::schema::category;

/// Coarse industry grouping derived from the free-text `NIC_Name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndustryCategory {
    Agriculture,
    Manufacturing,
    RetailTrade,
    PoultryLivestock,
    Mining,
    Other,
}

/// Keyword rules in priority order. First rule with a matching keyword wins,
/// so a name mentioning both "farm" and "factory" is Agriculture.
const RULES: [(&[&str], IndustryCategory); 5] = [
    (
        &["crop", "animal", "farm", "agriculture"],
        IndustryCategory::Agriculture,
    ),
    (
        &["manufactur", "factory", "production"],
        IndustryCategory::Manufacturing,
    ),
    (&["retail", "trade", "shop"], IndustryCategory::RetailTrade),
    (
        &["poultry", "cattle", "livestock"],
        IndustryCategory::PoultryLivestock,
    ),
    (&["mining", "quarry", "coal"], IndustryCategory::Mining),
];

impl IndustryCategory {
    pub const ALL: [IndustryCategory; 6] = [
        Self::Agriculture,
        Self::Manufacturing,
        Self::RetailTrade,
        Self::PoultryLivestock,
        Self::Mining,
        Self::Other,
    ];

    /// Classify an industry name. Missing names fall into `Other`.
    pub fn classify(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Self::Other;
        };
        let name = name.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
            .map(|(_, category)| *category)
            .unwrap_or(Self::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Agriculture => category::AGRICULTURE,
            Self::Manufacturing => category::MANUFACTURING,
            Self::RetailTrade => category::RETAIL_TRADE,
            Self::PoultryLivestock => category::POULTRY_LIVESTOCK,
            Self::Mining => category::MINING,
            Self::Other => category::OTHER,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for IndustryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(
            IndustryCategory::classify(Some("Growing of CROPS")),
            IndustryCategory::Agriculture
        );
        assert_eq!(
            IndustryCategory::classify(Some("Steel Manufacturing Ltd")),
            IndustryCategory::Manufacturing
        );
        assert_eq!(
            IndustryCategory::classify(Some("Retail Shop Co")),
            IndustryCategory::RetailTrade
        );
        assert_eq!(
            IndustryCategory::classify(Some("Cattle breeding")),
            IndustryCategory::PoultryLivestock
        );
        assert_eq!(
            IndustryCategory::classify(Some("Coal Quarry")),
            IndustryCategory::Mining
        );
        assert_eq!(
            IndustryCategory::classify(Some("Software services")),
            IndustryCategory::Other
        );
    }

    #[test]
    fn earlier_rule_wins_on_multiple_matches() {
        assert_eq!(
            IndustryCategory::classify(Some("Farm equipment factory")),
            IndustryCategory::Agriculture
        );
        // "animal" precedes the livestock rule
        assert_eq!(
            IndustryCategory::classify(Some("Animal and poultry feed")),
            IndustryCategory::Agriculture
        );
        assert_eq!(
            IndustryCategory::classify(Some("Coal trade")),
            IndustryCategory::RetailTrade
        );
    }

    #[test]
    fn substring_match_inside_words() {
        assert_eq!(
            IndustryCategory::classify(Some("Manufacture of textiles")),
            IndustryCategory::Manufacturing
        );
        assert_eq!(
            IndustryCategory::classify(Some("Workshop")),
            IndustryCategory::RetailTrade
        );
    }

    #[test]
    fn missing_name_is_other() {
        assert_eq!(IndustryCategory::classify(None), IndustryCategory::Other);
        assert_eq!(IndustryCategory::classify(Some("")), IndustryCategory::Other);
    }

    #[test]
    fn labels_round_trip() {
        for c in IndustryCategory::ALL {
            assert_eq!(IndustryCategory::from_label(c.label()), Some(c));
        }
        assert_eq!(IndustryCategory::RetailTrade.to_string(), "Retail & Trade");
        assert_eq!(IndustryCategory::from_label("Fishing"), None);
    }
}
