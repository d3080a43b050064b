//! Token amount and cooldown formatting helpers

use alloy::primitives::U256;

/// Format raw token units as a human-readable decimal, trimming trailing zeros.
///
/// Exact for the full `U256` range and every `u8` decimals value:
/// `1000000000000000000` with 18 decimals is `"1"`, `1500000000000000000` is
/// `"1.5"`. Past 77 decimals `10^decimals` exceeds `U256`, so every amount
/// is purely fractional.
pub fn format_token_amount(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    let (whole, frac) = match U256::from(10u8).checked_pow(U256::from(decimals)) {
        Some(divisor) => (raw / divisor, raw % divisor),
        None => (U256::ZERO, raw),
    };

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Serialize `U256` as a decimal string instead of alloy's default hex encoding
pub fn serialize_decimal<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

/// Clamp a contract integer to u64 (timestamps and durations)
pub fn to_u64_saturating(value: U256) -> u64 {
    value.try_into().unwrap_or(u64::MAX)
}

/// Render the time left until `last_claim_at + cooldown`.
///
/// Returns `"a moment"` once the cooldown has elapsed. Otherwise whole hours
/// and minutes (`"2h 5m"`, `"30m"`), or seconds alone when both are zero.
pub fn format_cooldown(last_claim_at: u64, cooldown: u64, now: u64) -> String {
    let ready_at = last_claim_at.saturating_add(cooldown);
    if now >= ready_at {
        return "a moment".to_string();
    }

    let remaining = ready_at - now;
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if hours == 0 && minutes == 0 {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}
