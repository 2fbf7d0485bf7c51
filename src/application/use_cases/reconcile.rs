use std::collections::HashMap;

use crate::domain::submission::SubmissionRecord;

/// Returns the subset of `candidates` that is new or materially changed
/// relative to `existing`, matched by the `(date, participant number)`
/// composite key.
///
/// Output preserves candidate order (spreadsheet row order). Duplicate keys
/// within `existing` resolve last-write-wins; duplicates within `candidates`
/// are the caller's problem, the batch is only deduplicated against the
/// stored set.
pub fn reconcile(
    candidates: &[SubmissionRecord],
    existing: &[SubmissionRecord],
) -> Vec<SubmissionRecord> {
    let by_key: HashMap<(String, i64), &SubmissionRecord> = existing
        .iter()
        .map(|record| (record.composite_key(), record))
        .collect();

    candidates
        .iter()
        .filter(|candidate| is_new_or_updated(candidate, &by_key))
        .cloned()
        .collect()
}

fn is_new_or_updated(
    candidate: &SubmissionRecord,
    by_key: &HashMap<(String, i64), &SubmissionRecord>,
) -> bool {
    match by_key.get(&candidate.composite_key()) {
        None => true,
        Some(stored) => tracked_fields_differ(candidate, stored),
    }
}

fn tracked_fields_differ(candidate: &SubmissionRecord, stored: &SubmissionRecord) -> bool {
    candidate.product_description != stored.product_description
        || candidate.thickness != stored.thickness
        || candidate.product_size != stored.product_size
        || !eq_ignore_case(&candidate.product_image, &stored.product_image)
        || !eq_ignore_case(
            &candidate.business_registration_file,
            &stored.business_registration_file,
        )
}

// The resolved reference fields are URLs whose letter case varies between
// exports; compare them case-insensitively. Absent compares equal to absent.
fn eq_ignore_case(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, participant: i64) -> SubmissionRecord {
        SubmissionRecord {
            response_date: date.to_string(),
            participant_number: participant,
            name_or_company: "아크릴 공방".to_string(),
            contact: "010-1234-5678".to_string(),
            email: Some("shop@example.com".to_string()),
            business_registration_file: Some("https://files.example.com/reg.pdf".to_string()),
            privacy_agreement: true,
            first_time_buyer: false,
            product_description: "아크릴 명판".to_string(),
            product_size: "200x100".to_string(),
            thickness: "3mm".to_string(),
            material: "투명 아크릴".to_string(),
            color: "투명".to_string(),
            quantity: Some("10".to_string()),
            desired_delivery: "다음주".to_string(),
            product_image: Some("https://files.example.com/Image.png".to_string()),
            product_drawing: None,
            inquiry: String::new(),
            referral_source: None,
        }
    }

    #[test]
    fn test_all_new_when_existing_empty() {
        let candidates = vec![record("2024-03-14", 1), record("2024-03-14", 2)];
        let result = reconcile(&candidates, &[]);
        assert_eq!(result, candidates);
    }

    #[test]
    fn test_noop_on_identical_data() {
        let candidates = vec![record("2024-03-14", 1), record("2024-03-15", 2)];
        let result = reconcile(&candidates, &candidates.clone());
        assert!(result.is_empty());
    }

    #[test]
    fn test_idempotent_against_own_output() {
        let candidates = vec![record("2024-03-14", 1), record("2024-03-15", 2)];
        let first_pass = reconcile(&candidates, &[]);
        let second_pass = reconcile(&candidates, &first_pass);
        assert!(second_pass.is_empty());
    }

    #[test]
    fn test_detects_thickness_change() {
        let stored = record("2024-03-14", 1);
        let mut candidate = stored.clone();
        candidate.thickness = "5mm".to_string();

        let result = reconcile(&[candidate.clone()], &[stored]);
        assert_eq!(result, vec![candidate]);
    }

    #[test]
    fn test_detects_description_and_size_changes() {
        let stored = record("2024-03-14", 1);

        let mut changed_description = stored.clone();
        changed_description.product_description = "아크릴 트로피".to_string();
        assert_eq!(reconcile(&[changed_description], &[stored.clone()]).len(), 1);

        let mut changed_size = stored.clone();
        changed_size.product_size = "300x150".to_string();
        assert_eq!(reconcile(&[changed_size], &[stored]).len(), 1);
    }

    #[test]
    fn test_reference_comparison_is_case_insensitive() {
        let stored = record("2024-03-14", 1);
        let mut candidate = stored.clone();
        candidate.product_image = Some("https://files.example.com/IMAGE.PNG".to_string());
        candidate.business_registration_file =
            Some("https://files.example.com/REG.pdf".to_string());

        assert!(reconcile(&[candidate], &[stored]).is_empty());
    }

    #[test]
    fn test_reference_becoming_absent_is_a_change() {
        let stored = record("2024-03-14", 1);
        let mut candidate = stored.clone();
        candidate.product_image = None;

        assert_eq!(reconcile(&[candidate], &[stored]).len(), 1);
    }

    #[test]
    fn test_same_participant_different_date_are_distinct() {
        let stored = record("2024-03-14", 1);
        let candidate = record("2024-03-15", 1);

        let result = reconcile(&[candidate.clone()], &[stored]);
        assert_eq!(result, vec![candidate]);
    }

    #[test]
    fn test_key_matches_across_date_normalization() {
        let stored = record("2024-03-14", 1);
        let mut candidate = stored.clone();
        candidate.response_date = "2024-03-14 09:15:47".to_string();

        assert!(reconcile(&[candidate], &[stored]).is_empty());
    }

    #[test]
    fn test_untracked_field_change_is_ignored() {
        let stored = record("2024-03-14", 1);
        let mut candidate = stored.clone();
        candidate.contact = "010-9999-9999".to_string();
        candidate.inquiry = "빠른 납품 부탁드립니다".to_string();
        candidate.color = "검정".to_string();

        assert!(reconcile(&[candidate], &[stored]).is_empty());
    }

    #[test]
    fn test_output_preserves_row_order() {
        let stored = record("2024-03-14", 2);
        let mut changed = stored.clone();
        changed.thickness = "5mm".to_string();

        let candidates = vec![record("2024-03-14", 1), changed, record("2024-03-14", 3)];
        let result = reconcile(&candidates, &[stored]);

        let participants: Vec<i64> = result.iter().map(|r| r.participant_number).collect();
        assert_eq!(participants, vec![1, 2, 3]);
    }
}
