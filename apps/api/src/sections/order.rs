use crate::sections::kind::SectionKind;
use crate::validate::ValidationErrors;

/// Resolves a stored section order into the full rendering order.
///
/// Rules:
/// - `None` or empty storage means the default order.
/// - Identifiers that no longer parse as a kind are dropped.
/// - Duplicates keep their first occurrence.
/// - Kinds absent from the stored list are appended in default order, so
///   every section type always has a rendering position.
pub fn resolve_order(stored: Option<&[String]>) -> Vec<SectionKind> {
    let mut order: Vec<SectionKind> = Vec::with_capacity(SectionKind::ALL.len());

    if let Some(stored) = stored {
        for raw in stored {
            if let Some(kind) = SectionKind::parse(raw) {
                if !order.contains(&kind) {
                    order.push(kind);
                }
            }
        }
    }

    for kind in SectionKind::ALL {
        if !order.contains(kind) {
            order.push(*kind);
        }
    }

    order
}

/// Validates a client-submitted order before it is persisted.
///
/// Unknown identifiers are a validation failure (they are filtered on read,
/// but never accepted on write). Duplicates collapse to the first occurrence.
pub fn validate_order(requested: &[String]) -> Result<Vec<SectionKind>, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut order: Vec<SectionKind> = Vec::with_capacity(requested.len());

    for (i, raw) in requested.iter().enumerate() {
        match SectionKind::parse(raw) {
            Some(kind) => {
                if !order.contains(&kind) {
                    order.push(kind);
                }
            }
            None => errors.push(
                format!("order[{i}]"),
                format!("'{raw}' is not a section type"),
            ),
        }
    }

    errors.into_result()?;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(kinds: &[SectionKind]) -> Vec<String> {
        kinds.iter().map(|k| k.as_str().to_string()).collect()
    }

    #[test]
    fn test_empty_storage_gives_default_order() {
        assert_eq!(resolve_order(None), SectionKind::ALL.to_vec());
        assert_eq!(resolve_order(Some(&[])), SectionKind::ALL.to_vec());
    }

    #[test]
    fn test_full_permutation_roundtrips_exactly() {
        let mut permuted = SectionKind::ALL.to_vec();
        permuted.reverse();
        let stored = strings(&permuted);
        assert_eq!(resolve_order(Some(&stored)), permuted);
    }

    #[test]
    fn test_unknown_ids_are_dropped_not_rendered() {
        let stored = vec![
            "projects".to_string(),
            "mixtapes".to_string(),
            "awards".to_string(),
        ];
        let resolved = resolve_order(Some(&stored));
        assert_eq!(resolved[0], SectionKind::Projects);
        assert_eq!(resolved[1], SectionKind::Awards);
        assert_eq!(resolved.len(), SectionKind::ALL.len());
    }

    #[test]
    fn test_missing_kinds_fall_back_to_default_positions() {
        let stored = vec!["education".to_string(), "links".to_string()];
        let resolved = resolve_order(Some(&stored));
        assert_eq!(resolved[0], SectionKind::Education);
        assert_eq!(resolved[1], SectionKind::Links);
        // Remainder follows the default order with the listed two removed.
        let expected_tail: Vec<SectionKind> = SectionKind::ALL
            .iter()
            .copied()
            .filter(|k| *k != SectionKind::Education && *k != SectionKind::Links)
            .collect();
        assert_eq!(&resolved[2..], expected_tail.as_slice());
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let stored = vec![
            "awards".to_string(),
            "projects".to_string(),
            "awards".to_string(),
        ];
        let resolved = resolve_order(Some(&stored));
        assert_eq!(resolved[0], SectionKind::Awards);
        assert_eq!(resolved[1], SectionKind::Projects);
        assert_eq!(
            resolved.iter().filter(|k| **k == SectionKind::Awards).count(),
            1
        );
    }

    #[test]
    fn test_validate_order_accepts_permutation() {
        let mut permuted = SectionKind::ALL.to_vec();
        permuted.rotate_left(5);
        let validated = validate_order(&strings(&permuted)).unwrap();
        assert_eq!(validated, permuted);
    }

    #[test]
    fn test_validate_order_rejects_unknown_with_position() {
        let err = validate_order(&[
            "projects".to_string(),
            "mixtapes".to_string(),
        ])
        .unwrap_err();
        assert_eq!(err.fields.len(), 1);
        assert_eq!(err.fields[0].field, "order[1]");
    }

    #[test]
    fn test_validate_then_resolve_is_identity_for_permutations() {
        let mut permuted = SectionKind::ALL.to_vec();
        permuted.swap(0, 11);
        permuted.swap(3, 7);
        let validated = validate_order(&strings(&permuted)).unwrap();
        let stored = strings(&validated);
        assert_eq!(resolve_order(Some(&stored)), permuted);
    }
}
