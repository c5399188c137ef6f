//! Portable backup codec.
//!
//! Backups travel as a single copy-pasteable string: compact JSON run
//! through standard base64. The alphabet is ASCII-only with no
//! structural delimiters, so manual copy/paste through chat clients and
//! email survives intact. Decoding is deliberately infallible at the
//! API level: any malformed input yields `None` so callers can fall
//! back to treating the text as plain JSON.

use crate::models::BackupPayload;
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};

/// Encode a payload into its transport-safe string form.
pub fn encode(payload: &BackupPayload) -> Result<String> {
    let json = serde_json::to_string(payload).context("Failed to serialize backup payload")?;
    Ok(general_purpose::STANDARD.encode(json.as_bytes()))
}

/// Reverse of [`encode`]. Returns `None` on any malformed input.
pub fn decode(encoded: &str) -> Option<BackupPayload> {
    let text = decode_text(encoded)?;
    serde_json::from_str(&text).ok()
}

/// Reverse only the transport transform, yielding the inner text.
///
/// Used by the import reconciler, which tolerates both encoded backups
/// and raw JSON pasted directly.
pub fn decode_text(encoded: &str) -> Option<String> {
    let bytes = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealPlan, MealPlanEntry, MealSlot, Recipe};
    use chrono::NaiveDate;

    fn sample_payload() -> BackupPayload {
        let mut recipe = Recipe::new("Paella");
        recipe.id = Some("r1".to_string());
        recipe.ingredients = vec!["rice".into(), "saffron".into(), "chicken".into()];
        recipe.instructions = "Step 1: fry.\nStep 2: simmer.".into();
        recipe.time = "60 min".into();

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let entry = MealPlanEntry::new(date, MealSlot::First, "Paella");
        let mut plan = MealPlan::new();
        plan.insert(entry.key().to_string(), entry);

        BackupPayload::snapshot(vec![recipe], plan)
    }

    #[test]
    fn test_decode_inverts_encode() {
        let payload = sample_payload();
        let encoded = encode(&payload).unwrap();
        assert!(encoded.is_ascii());
        assert_eq!(decode(&encoded), Some(payload));
    }

    #[test]
    fn test_decode_inverts_encode_for_empty_state() {
        let payload = BackupPayload::snapshot(vec![], MealPlan::new());
        let encoded = encode(&payload).unwrap();
        assert_eq!(decode(&encoded), Some(payload));
    }

    #[test]
    fn test_decode_handles_unicode_titles() {
        let mut payload = sample_payload();
        payload.recipes[0].title = "Tortilla española 🥘".into();
        let encoded = encode(&payload).unwrap();
        assert!(encoded.is_ascii());
        assert_eq!(decode(&encoded), Some(payload));
    }

    #[test]
    fn test_malformed_input_yields_none() {
        assert_eq!(decode("not base64 at all!!!"), None);
        // Valid base64 of something that is not a payload.
        let garbage = general_purpose::STANDARD.encode(b"hello");
        assert_eq!(decode(&garbage), None);
        assert_eq!(decode(""), None);
    }

    #[test]
    fn test_decode_text_tolerates_surrounding_whitespace() {
        let encoded = format!("  {}\n", encode(&sample_payload()).unwrap());
        assert!(decode_text(&encoded).is_some());
    }
}
