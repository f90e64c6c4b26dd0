use std::{cmp::Reverse, fmt, str::FromStr};

use anyhow::anyhow;

use crate::Suggestion;

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Board {
    /// Everyone can read and comment
    #[default]
    Public,

    /// Only the submitting session can read it back
    Private,
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::Public => write!(f, "public"),
            Board::Private => write!(f, "private"),
        }
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Board> {
        match s {
            "public" => Ok(Board::Public),
            "private" => Ok(Board::Private),
            _ => Err(anyhow!("unknown board {s:?}, expected public or private")),
        }
    }
}

/// Sorts suggestions for display, most recent first
///
/// The sort is stable, so suggestions submitted at the same instant keep their submission order.
pub fn newest_first(suggestions: &mut [Suggestion]) {
    suggestions.sort_by_key(|s| Reverse(s.date))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::SuggestionId;

    fn suggestion(body: &str, secs: i64) -> Suggestion {
        Suggestion {
            id: SuggestionId(uuid::Uuid::new_v4()),
            author: String::from("alice"),
            body: String::from(body),
            date: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs),
            comments: Vec::new(),
        }
    }

    fn bodies(s: &[Suggestion]) -> Vec<&str> {
        s.iter().map(|s| &s.body as &str).collect()
    }

    #[test]
    fn most_recent_first() {
        let mut s = vec![suggestion("t1", 1), suggestion("t3", 3), suggestion("t2", 2)];
        newest_first(&mut s);
        assert_eq!(bodies(&s), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn ties_keep_submission_order() {
        let mut s = vec![suggestion("a", 0), suggestion("b", 0), suggestion("c", 5)];
        newest_first(&mut s);
        assert_eq!(bodies(&s), vec!["c", "a", "b"]);
    }

    #[test]
    fn board_names() {
        assert_eq!("public".parse::<Board>().unwrap(), Board::Public);
        assert_eq!("private".parse::<Board>().unwrap(), Board::Private);
        assert!("secret".parse::<Board>().is_err());
        assert_eq!(Board::Private.to_string(), "private");
        assert_eq!(serde_json::to_string(&Board::Public).unwrap(), r#""public""#);
    }
}
