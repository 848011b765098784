/// Column-name constants for the census workforce schema.
/// Single source of truth - exported to Python via PyO3.

// ── Raw census columns ──────────────────────────────────────────────────────
pub mod source {
    pub const NIC_NAME: &str = "NIC_Name";
    pub const MAIN_TOTAL_PERSONS: &str = "Main_Workers_Total_Persons";
    pub const MARGINAL_TOTAL_PERSONS: &str = "Marginal_Workers_Total_Persons";
    pub const MAIN_TOTAL_FEMALES: &str = "Main_Workers_Total_Females";
    pub const MARGINAL_TOTAL_FEMALES: &str = "Marginal_Workers_Total_Females";
    pub const MAIN_URBAN_PERSONS: &str = "Main_Workers_Urban_Persons";
    pub const MARGINAL_URBAN_PERSONS: &str = "Marginal_Workers_Urban_Persons";
    pub const MAIN_RURAL_PERSONS: &str = "Main_Workers_Rural_Persons";
    pub const MARGINAL_RURAL_PERSONS: &str = "Marginal_Workers_Rural_Persons";
    pub const MAIN_TOTAL_MALES: &str = "Main_Workers_Total_Males";
    pub const MARGINAL_TOTAL_MALES: &str = "Marginal_Workers_Total_Males";

    /// Counts coerced to numbers by the transformer.
    pub const NUMERIC: [&str; 10] = [
        MAIN_TOTAL_PERSONS,
        MARGINAL_TOTAL_PERSONS,
        MAIN_TOTAL_FEMALES,
        MARGINAL_TOTAL_FEMALES,
        MAIN_URBAN_PERSONS,
        MARGINAL_URBAN_PERSONS,
        MAIN_RURAL_PERSONS,
        MARGINAL_RURAL_PERSONS,
        MAIN_TOTAL_MALES,
        MARGINAL_TOTAL_MALES,
    ];

    /// Every column an upload must carry, in reporting order.
    pub const REQUIRED: [&str; 11] = [
        NIC_NAME,
        MAIN_TOTAL_PERSONS,
        MARGINAL_TOTAL_PERSONS,
        MAIN_TOTAL_FEMALES,
        MARGINAL_TOTAL_FEMALES,
        MAIN_URBAN_PERSONS,
        MARGINAL_URBAN_PERSONS,
        MAIN_RURAL_PERSONS,
        MARGINAL_RURAL_PERSONS,
        MAIN_TOTAL_MALES,
        MARGINAL_TOTAL_MALES,
    ];
}

// ── Derived per-row columns ─────────────────────────────────────────────────
pub mod derived {
    pub const TOTAL_WORKERS: &str = "Total Workers";
    pub const FEMALE_RATIO: &str = "Female Ratio";
    pub const URBAN_RATIO: &str = "Urban Ratio";
    pub const INDUSTRY_CATEGORY: &str = "Industry Category";
}

// ── Aggregate-only columns ──────────────────────────────────────────────────
pub mod aggregate {
    pub const GROWTH_SCORE: &str = "Growth Score";
    /// Percent of all workers in the frame.
    pub const SHARE: &str = "Share";

    pub const URBAN_WEIGHT: f64 = 0.4;
    pub const FEMALE_WEIGHT: f64 = 0.6;
}

// ── Geography ───────────────────────────────────────────────────────────────
pub mod geography {
    /// A column whose name contains one of these is the geography dimension.
    pub const HINTS: [&str; 2] = ["Division", "State"];
}

// ── Category labels ─────────────────────────────────────────────────────────
pub mod category {
    pub const AGRICULTURE: &str = "Agriculture";
    pub const MANUFACTURING: &str = "Manufacturing";
    pub const RETAIL_TRADE: &str = "Retail & Trade";
    pub const POULTRY_LIVESTOCK: &str = "Poultry & Livestock";
    pub const MINING: &str = "Mining";
    pub const OTHER: &str = "Other";
}
