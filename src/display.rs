//! Text helpers shared by the terminal cards and plain CLI output.

/// Renders a 0–5 rating as stars, e.g. `4.5` → `★★★★½`.
#[must_use]
pub fn rating_stars(rating: f32) -> String {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor();
    let half = rating - full >= 0.5;
    // Clamped to 0..=5 above
    #[allow(clippy::cast_sign_loss)]
    let full = full as usize;
    let empty = 5 - full - usize::from(half);

    format!(
        "{}{}{}",
        "★".repeat(full),
        if half { "½" } else { "" },
        "☆".repeat(empty)
    )
}

/// Shortens `text` to at most `max_chars` characters, ending with `...` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head.trim_end())
}

/// Formats a price without currency symbols; whole amounts drop the decimals.
#[must_use]
pub fn plain_price(price: f64) -> String {
    if price.fract().abs() < f64::EPSILON {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(5.0), "★★★★★");
        assert_eq!(rating_stars(4.5), "★★★★½");
        assert_eq!(rating_stars(3.2), "★★★☆☆");
        assert_eq!(rating_stars(0.0), "☆☆☆☆☆");
        assert_eq!(rating_stars(9.0), "★★★★★");
        assert_eq!(rating_stars(-1.0), "☆☆☆☆☆");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Cardamom", 20), "Cardamom");
        assert_eq!(truncate("Freshly roasted beans", 8), "Freshly...");
        assert_eq!(truncate("تحميص غامق جدا", 5), "تحميص...");
    }

    #[test]
    fn test_plain_price() {
        assert_eq!(plain_price(15000.0), "15000");
        assert_eq!(plain_price(12.5), "12.50");
    }
}
