use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Synthesize a payment id for bookings that need to be marked paid without
/// one (partner imports in particular). Format:
/// `PAY-<YYYYMMDD>-<HHMMSS>-<6 alphanumerics>`. Uniqueness is best-effort;
/// the timestamp plus random suffix makes collisions astronomically
/// unlikely but nothing enforces it at generation time.
pub fn generate_payment_id() -> String {
    let now = Utc::now();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("PAY-{}-{}-{}", now.format("%Y%m%d"), now.format("%H%M%S"), suffix)
}

/// Trim a caller-supplied payment id. Empty, whitespace-only and the
/// literal string "null" (any casing, a common artifact of stringly-typed
/// clients) all count as absent.
pub fn normalize_payment_id(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(s.to_string())
}
