//! Flag records and the shapes they take on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored flag submission. Write-once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub id: Uuid,
    /// Value of the trusted client-IP header, if the request carried one.
    pub submitter_ip: Option<String>,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// One color at a position within a flag.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColorEntry {
    pub flag_id: String,
    pub color: String,
    pub position: i64,
}

/// A flag together with every color the client submitted, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlag {
    pub flag: Flag,
    pub colors: Vec<String>,
}

impl NewFlag {
    /// Color rows for this flag, positioned by array index.
    pub fn entries(&self) -> impl Iterator<Item = ColorEntry> + '_ {
        let flag_id = self.flag.id.to_string();
        self.colors
            .iter()
            .enumerate()
            .map(move |(position, color)| ColorEntry {
                flag_id: flag_id.clone(),
                color: color.clone(),
                position: position as i64,
            })
    }
}

/// A flag as listed by `GET /flags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub id: String,
    pub colors: Vec<String>,
}

/// Body of `GET /flags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPage {
    pub flags: Vec<FlagSummary>,
    /// `None` when the query value has no leading integer.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Count of all flags, regardless of the page.
    pub total: i64,
}

/// Raw pagination parameters.
///
/// Kept as the caller sent them: the store receives the strings untouched
/// and decides what they mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub offset: String,
    pub limit: String,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            offset: "0".to_string(),
            limit: "10".to_string(),
        }
    }
}

impl PageParams {
    pub fn limit_value(&self) -> Option<i64> {
        leading_int(&self.limit)
    }

    pub fn offset_value(&self) -> Option<i64> {
        leading_int(&self.offset)
    }
}

/// Parse the integer prefix of `raw`: leading whitespace, an optional sign,
/// then decimal digits. `"10abc"` is 10, `"abc"` is `None`.
pub fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Fold joined color rows into flags, keeping row order.
///
/// Rows of one flag must be contiguous, as the page query orders them.
/// A flag id that reappears after another flag starts a new summary.
pub fn group_entries(rows: Vec<ColorEntry>) -> Vec<FlagSummary> {
    let mut flags: Vec<FlagSummary> = Vec::new();
    for row in rows {
        match flags.last_mut() {
            Some(flag) if flag.id == row.flag_id => flag.colors.push(row.color),
            _ => flags.push(FlagSummary {
                id: row.flag_id,
                colors: vec![row.color],
            }),
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(flag_id: &str, color: &str, position: i64) -> ColorEntry {
        ColorEntry {
            flag_id: flag_id.into(),
            color: color.into(),
            position,
        }
    }

    #[test]
    fn test_group_entries_keeps_row_order() {
        let rows = vec![
            row("b", "ff0000", 0),
            row("b", "00ff00", 1),
            row("b", "zz", 2),
            row("a", "0000ff", 0),
        ];

        let flags = group_entries(rows);
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].id, "b");
        assert_eq!(flags[0].colors, vec!["ff0000", "00ff00", "zz"]);
        assert_eq!(flags[1].id, "a");
        assert_eq!(flags[1].colors, vec!["0000ff"]);
    }

    #[test]
    fn test_group_entries_large_page() {
        let rows: Vec<_> = (0..20_000)
            .flat_map(|i| {
                let id = format!("flag-{i:05}");
                (0..3).map(move |n| row(&id, &format!("{n:06x}"), n))
            })
            .collect();

        let flags = group_entries(rows);
        assert_eq!(flags.len(), 20_000);
        assert_eq!(flags[0].id, "flag-00000");
        assert_eq!(flags[19_999].id, "flag-19999");
        assert!(flags
            .iter()
            .all(|f| f.colors == vec!["000000", "000001", "000002"]));
    }

    #[test]
    fn test_group_entries_empty() {
        assert!(group_entries(Vec::new()).is_empty());
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("10"), Some(10));
        assert_eq!(leading_int("  7"), Some(7));
        assert_eq!(leading_int("10abc"), Some(10));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("+4"), Some(4));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
    }

    #[test]
    fn test_new_flag_entries_are_positioned() {
        let id = Uuid::new_v4();
        let new_flag = NewFlag {
            flag: Flag {
                id,
                submitter_ip: None,
                timestamp: 1,
            },
            colors: vec!["ff0000".into(), "nope".into()],
        };

        let entries: Vec<_> = new_flag.entries().collect();
        assert_eq!(entries[0], row(&id.to_string(), "ff0000", 0));
        assert_eq!(entries[1], row(&id.to_string(), "nope", 1));
    }

    #[test]
    fn test_page_serializes_unparsable_limit_as_null() {
        let page = FlagPage {
            flags: Vec::new(),
            limit: None,
            offset: Some(0),
            total: 0,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "flags": [], "limit": null, "offset": 0, "total": 0 })
        );
    }
}
