/// Human-readable token count: 1.2K, 3.4M, plain below 1000.
pub fn format_tokens(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("{}", count)
    }
}

/// Dollar amount with cent precision; sub-cent costs keep four decimals
/// so tiny per-request numbers don't render as $0.00.
pub fn format_usd(amount: f64) -> String {
    if amount != 0.0 && amount.abs() < 0.01 {
        format!("${:.4}", amount)
    } else {
        format!("${:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tokens_scales() {
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1_500), "1.5K");
        assert_eq!(format_tokens(2_400_000), "2.4M");
    }

    #[test]
    fn format_usd_cent_precision() {
        assert_eq!(format_usd(12.345), "$12.35");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn format_usd_subcent_keeps_detail() {
        assert_eq!(format_usd(0.0042), "$0.0042");
    }
}
