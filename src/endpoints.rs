//! The API endpoint URIs.

/// The route serving the weekly day-of-week series for charts.
pub const WEEKLY_SERIES: &str = "/api/dashboard/weekly";
/// The route serving the per-category expense summary.
pub const CATEGORY_SUMMARY: &str = "/api/dashboard/categories";
/// The route to create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route serving the most recent transactions for the activity feed.
pub const RECENT_TRANSACTIONS: &str = "/api/transactions/recent";
