use std::collections::HashMap;

use crate::store::MemberRecord;

/// Discord caps embed descriptions at 4096 characters.
pub const DESCRIPTION_CEILING: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roster {
    Empty,
    Rendered(String),
    /// The rendered listing would not fit in one embed. The list is refused
    /// outright rather than truncated.
    TooLong,
}

/// Renders one line per record. `mentions` maps the user IDs of members still
/// in the guild to their mention string; everyone else gets a placeholder
/// carrying their raw user ID.
pub fn render_roster(entries: &[(u64, &MemberRecord)], mentions: &HashMap<u64, String>) -> Roster {
    if entries.is_empty() {
        return Roster::Empty;
    }

    let mut description = String::new();
    for (user_id, record) in entries {
        match mentions.get(user_id) {
            Some(mention) => {
                description.push_str(&format!("**#{}**: {}\n", record.id_str, mention))
            }
            None => description.push_str(&format!(
                "**#{}**: User left (ID: {})\n",
                record.id_str, user_id
            )),
        }
    }

    if description.len() > DESCRIPTION_CEILING {
        return Roster::TooLong;
    }
    Roster::Rendered(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u16) -> MemberRecord {
        MemberRecord::new(id, "someone", None)
    }

    #[test]
    fn no_records_is_empty() {
        assert_eq!(render_roster(&[], &HashMap::new()), Roster::Empty);
    }

    #[test]
    fn present_and_departed_members_render_differently() {
        let a = record(5);
        let b = record(6);
        let entries = vec![(100u64, &a), (200u64, &b)];
        let mentions = HashMap::from([(100u64, "<@100>".to_string())]);

        let Roster::Rendered(text) = render_roster(&entries, &mentions) else {
            panic!("expected a rendered roster");
        };
        assert_eq!(text, "**#005**: <@100>\n**#006**: User left (ID: 200)\n");
    }

    #[test]
    fn oversized_roster_is_refused_not_truncated() {
        let records: Vec<MemberRecord> = (0..300).map(record).collect();
        let entries: Vec<(u64, &MemberRecord)> = records
            .iter()
            .enumerate()
            .map(|(n, r)| (n as u64, r))
            .collect();
        // No mentions resolve, so every line carries the long placeholder;
        // 300 lines comfortably clear the 4096-character ceiling.
        assert_eq!(render_roster(&entries, &HashMap::new()), Roster::TooLong);
    }
}
