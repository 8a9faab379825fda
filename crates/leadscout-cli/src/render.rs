//! Plain-text tables for the search and saved-leads views.

use std::fmt::Write as _;

use leadscout_core::Lead;

use crate::lookup::SHORT_ID_LEN;

const NAME_WIDTH: usize = 34;
const PHONE_WIDTH: usize = 20;

/// Which table a row belongs to; the saved view adds notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Search,
    Leads,
}

/// Clip to `max` characters, marking the cut with `...`.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        s.to_string()
    }
}

fn short_id(lead: &Lead) -> String {
    lead.id.simple().to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Render `leads` as a numbered table for `view`.
///
/// Each lead takes two lines (three with notes in the saved view): call
/// status, business and contact on the first; cuisine badge, address and
/// the Maps verification link on the second.
pub(crate) fn render_table(leads: &[Lead], view: View) -> String {
    if leads.is_empty() {
        return match view {
            View::Search => "No prospects found in this area.\n\
                 Try a different neighborhood or be more specific with the city name.\n"
                .to_string(),
            View::Leads => {
                "No saved leads yet. Run a search and save the promising results.\n".to_string()
            }
        };
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5}{:<10}{:<8}  {:<NAME_WIDTH$}  {:<PHONE_WIDTH$}  DIAL",
        "#", "STATUS", "ID", "BUSINESS", "PHONE"
    );
    for (i, lead) in leads.iter().enumerate() {
        let status = if lead.called { "[x] called" } else { "[ ]" };
        let _ = writeln!(
            out,
            "{:<5}{:<10}{:<8}  {:<NAME_WIDTH$}  {:<PHONE_WIDTH$}  {}",
            i + 1,
            status,
            short_id(lead),
            clip(&lead.name, NAME_WIDTH),
            clip(&lead.phone, PHONE_WIDTH),
            lead.dial_uri(),
        );

        let badge = if lead.cuisine.is_empty() {
            "NO WEBSITE".to_string()
        } else {
            format!("{} | NO WEBSITE", lead.cuisine)
        };
        let _ = writeln!(
            out,
            "{:<25}{:<NAME_WIDTH$}  {}",
            "",
            clip(&badge, NAME_WIDTH),
            lead.address
        );
        let _ = writeln!(out, "{:<25}maps: {}", "", lead.maps_url);

        if view == View::Leads && !lead.notes.is_empty() {
            let _ = writeln!(out, "{:<25}notes: {}", "", lead.notes);
        }
    }
    out
}

/// The inline error block shown above the results.
pub(crate) fn render_search_error(message: &str) -> String {
    format!("Search Interrupted\n  {message}\n")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use leadscout_core::BusinessListing;

    use super::*;

    fn lead(name: &str, cuisine: &str) -> Lead {
        Lead::from_listing(
            BusinessListing {
                name: name.to_string(),
                phone: "(206) 555-0199".to_string(),
                address: "1520 Pike Pl, Seattle, WA".to_string(),
                cuisine: cuisine.to_string(),
                maps_url: "https://maps.google.com/?cid=5".to_string(),
            },
            "Seattle",
            Utc::now(),
        )
    }

    #[test]
    fn empty_search_view_shows_hint() {
        assert!(render_table(&[], View::Search).contains("No prospects found"));
        assert!(render_table(&[], View::Leads).contains("No saved leads"));
    }

    #[test]
    fn rows_show_status_badge_dial_and_maps() {
        let mut called = lead("Pike Noodle", "Ramen");
        called.called = true;
        let table = render_table(&[lead("Chowder Hut", ""), called], View::Search);

        assert!(table.contains("1    [ ]"));
        assert!(table.contains("2    [x] called"));
        assert!(table.contains("Ramen | NO WEBSITE"));
        assert!(table.contains("tel:2065550199"));
        assert!(table.contains("maps: https://maps.google.com/?cid=5"));
    }

    #[test]
    fn notes_only_render_in_leads_view() {
        let mut noted = lead("Chowder Hut", "Seafood");
        noted.notes = "owner back Friday".to_string();

        assert!(!render_table(&[noted.clone()], View::Search).contains("owner back Friday"));
        assert!(render_table(&[noted], View::Leads).contains("notes: owner back Friday"));
    }

    #[test]
    fn long_names_are_clipped() {
        let long = "A".repeat(80);
        let table = render_table(&[lead(&long, "")], View::Search);
        assert!(!table.contains(&long));
        assert!(table.contains("..."));
    }

    #[test]
    fn short_id_is_uuid_prefix() {
        let l = lead("X", "");
        assert!(l.id.simple().to_string().starts_with(&short_id(&l)));
        assert_eq!(short_id(&l).len(), SHORT_ID_LEN);
    }
}
