use leadscout_core::Lead;
use uuid::Uuid;

/// Length of the id prefix shown in tables.
pub(crate) const SHORT_ID_LEN: usize = 8;

/// Resolve a user-typed reference to a lead id within `leads`.
///
/// Accepted forms: a 1-based row number as printed in the table, a full
/// UUID, or an unambiguous prefix of the id's hex form. A reference at least
/// as long as the short id shown in tables is matched as an id prefix
/// first, so an all-digit short id is never read as a row number.
pub(crate) fn resolve_lead_ref(leads: &[Lead], reference: &str) -> anyhow::Result<Uuid> {
    let reference = reference.trim();
    if reference.is_empty() {
        anyhow::bail!("expected a row number or lead id");
    }

    let prefix = reference.to_ascii_lowercase().replace('-', "");
    let matches = prefix_matches(leads, &prefix);
    if prefix.len() >= SHORT_ID_LEN {
        if let [id] = matches.as_slice() {
            return Ok(*id);
        }
    }

    if let Ok(row) = reference.parse::<usize>() {
        if let Some(lead) = row.checked_sub(1).and_then(|i| leads.get(i)) {
            return Ok(lead.id);
        }
    }

    if let Ok(id) = Uuid::parse_str(reference) {
        if leads.iter().any(|l| l.id == id) {
            return Ok(id);
        }
        anyhow::bail!("no lead with id {id}");
    }

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => anyhow::bail!("no lead matches '{reference}'"),
        many => anyhow::bail!(
            "'{reference}' matches {} leads; use more of the id",
            many.len()
        ),
    }
}

fn prefix_matches(leads: &[Lead], prefix: &str) -> Vec<Uuid> {
    leads
        .iter()
        .map(|l| l.id)
        .filter(|id| id.simple().to_string().starts_with(prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use leadscout_core::BusinessListing;

    use super::*;

    fn lead(name: &str) -> Lead {
        Lead::from_listing(
            BusinessListing {
                name: name.to_string(),
                phone: "1".to_string(),
                address: "a".to_string(),
                cuisine: String::new(),
                maps_url: "u".to_string(),
            },
            "Reno",
            Utc::now(),
        )
    }

    fn lead_with_id(name: &str, id: u128) -> Lead {
        Lead {
            id: Uuid::from_u128(id),
            ..lead(name)
        }
    }

    #[test]
    fn row_number_is_one_based() {
        let leads = vec![lead("A"), lead("B")];
        assert_eq!(resolve_lead_ref(&leads, "2").unwrap(), leads[1].id);
    }

    #[test]
    fn full_uuid_resolves() {
        let leads = vec![lead("A"), lead("B")];
        let id = leads[0].id.to_string();
        assert_eq!(resolve_lead_ref(&leads, &id).unwrap(), leads[0].id);
    }

    #[test]
    fn unknown_uuid_is_error() {
        let leads = vec![lead_with_id("A", 0xaaaa_0000_0000_4000_8000_0000_0000_0001)];
        let other = Uuid::from_u128(0xbbbb_0000_0000_4000_8000_0000_0000_0001);
        assert!(resolve_lead_ref(&leads, &other.to_string()).is_err());
    }

    #[test]
    fn hex_prefix_resolves() {
        let leads = vec![lead("A")];
        let prefix: String = leads[0]
            .id
            .simple()
            .to_string()
            .chars()
            .take(SHORT_ID_LEN)
            .collect();
        assert_eq!(resolve_lead_ref(&leads, &prefix).unwrap(), leads[0].id);
    }

    #[test]
    fn out_of_range_row_falls_back_to_prefix() {
        let zero = lead_with_id("Zero", 0x0abc_0000_0000_4000_8000_0000_0000_0001);
        let hex = lead_with_id("Hex", 0xabcd_0000_0000_4000_8000_0000_0000_0001);

        // "0" is never a row, so it can only match an id starting with 0
        assert_eq!(resolve_lead_ref(&[zero.clone()], "0").unwrap(), zero.id);
        assert!(resolve_lead_ref(&[hex], "0").is_err());
    }

    #[test]
    fn all_digit_short_id_beats_row_number() {
        let target = lead_with_id("Target", 0x0000_0002_0000_4000_8000_0000_0000_0001);
        let leads = vec![
            target.clone(),
            lead_with_id("Second row", 0xffff_0000_0000_4000_8000_0000_0000_0001),
        ];

        assert_eq!(resolve_lead_ref(&leads, "00000002").unwrap(), target.id);
        assert_eq!(resolve_lead_ref(&leads, "2").unwrap(), leads[1].id);
    }

    #[test]
    fn ambiguous_prefix_is_error() {
        let leads = vec![
            lead_with_id("A", 0xabcd_0000_0000_4000_8000_0000_0000_0001),
            lead_with_id("B", 0xabcd_1111_0000_4000_8000_0000_0000_0001),
        ];
        let err = resolve_lead_ref(&leads, "abcd").unwrap_err();
        assert!(err.to_string().contains("matches 2 leads"));
    }

    #[test]
    fn blank_reference_is_error() {
        assert!(resolve_lead_ref(&[lead("A")], "  ").is_err());
    }

    #[test]
    fn non_hex_reference_matches_nothing() {
        assert!(resolve_lead_ref(&[lead("A")], "zzz").is_err());
    }
}
