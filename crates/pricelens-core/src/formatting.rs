//! Formatting utilities shared by every view
//!
//! Table rows, cards, the comparison table and the calculators all format
//! prices, costs and context sizes the same way.

// ============================================================================
// Truncation utilities
// ============================================================================

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// Format a context window: `1.0M`, `128K`, or the raw count below 1000
pub fn format_context(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.0}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

/// Per-1M-token price, two decimals
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Estimated cost, four decimals so sub-cent totals stay visible
pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

/// ROI rounded to a whole number, halves away from zero
pub fn format_roi(roi: f64) -> String {
    format!("{:.0}", roi.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a long model name", 10), "a long ...");
        // multi-byte characters are counted, not bytes
        assert_eq!(truncate_str("Название модели", 8), "Назва...");
    }

    #[test]
    fn test_format_context() {
        assert_eq!(format_context(0), "0");
        assert_eq!(format_context(512), "512");
        assert_eq!(format_context(8_192), "8K");
        assert_eq!(format_context(128_000), "128K");
        assert_eq!(format_context(1_000_000), "1.0M");
        assert_eq!(format_context(2_097_152), "2.1M");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_price(2.5), "$2.50");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_cost(0.00016), "$0.0002");
        assert_eq!(format_cost(12.0), "$12.0000");
    }

    #[test]
    fn test_format_roi() {
        assert_eq!(format_roi(466.666), "467");
        assert_eq!(format_roi(0.0), "0");
        assert_eq!(format_roi(2.5), "3");
        assert_eq!(format_roi(0.5), "1");
    }
}
