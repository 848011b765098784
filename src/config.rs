/// Display limits and caching behaviour for a [`crate::Dashboard`].
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Categories shown in the workforce distribution chart.
    pub top_categories: usize,
    /// Categories shown in the growth-potential chart.
    pub top_growth: usize,
    /// Industries (by `NIC_Name`) shown in the industry table.
    pub top_industries: usize,
    /// Categories shown in the gender-by-category chart.
    pub gender_breakdown: usize,
    /// Rows returned by the raw-data preview.
    pub preview_rows: usize,
    /// Memoize derived tables by upload fingerprint.
    pub cache: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_categories: 10,
            top_growth: 8,
            top_industries: 15,
            gender_breakdown: 10,
            preview_rows: 100,
            cache: true,
        }
    }
}
