use std::fmt;

use uuid::Uuid;

use crate::{resolve_author, validate_body, validate_string, Board, Comment, Error, Time, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct SuggestionId(pub Uuid);

impl SuggestionId {
    pub fn stub() -> SuggestionId {
        SuggestionId(STUB_UUID)
    }
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub author: String,
    pub body: String,
    pub date: Time,

    /// Comments in the order they were posted
    pub comments: Vec<Comment>,
}

impl Suggestion {
    pub fn display_date(&self) -> String {
        self.date.format(crate::DATE_FORMAT).to_string()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewSuggestion {
    pub board: Board,
    pub anonymous: bool,
    pub author: String,
    pub body: String,
}

impl NewSuggestion {
    /// Validates the submission and turns it into a fresh suggestion dated `date`
    pub fn build(self, date: Time) -> Result<Suggestion, Error> {
        let body = validate_body(&self.body)?;
        validate_string(&self.author)?;
        Ok(Suggestion {
            id: SuggestionId(Uuid::new_v4()),
            author: resolve_author(&self.author, self.anonymous),
            body,
            date,
            comments: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::ANONYMOUS;

    fn new_suggestion(anonymous: bool, author: &str, body: &str) -> NewSuggestion {
        NewSuggestion {
            board: Board::Public,
            anonymous,
            author: String::from(author),
            body: String::from(body),
        }
    }

    #[test]
    fn build_trims_and_dates() {
        let now = Utc::now();
        let s = new_suggestion(false, "alice", "  fix the coffee machine\n")
            .build(now)
            .expect("valid suggestion");
        assert_eq!(s.author, "alice");
        assert_eq!(s.body, "fix the coffee machine");
        assert_eq!(s.date, now);
        assert!(s.comments.is_empty());
    }

    #[test]
    fn build_hides_anonymous_author() {
        let s = new_suggestion(true, "alice", "more plants")
            .build(Utc::now())
            .expect("valid suggestion");
        assert_eq!(s.author, ANONYMOUS);
    }

    #[test]
    fn build_rejects_blank_body() {
        assert_eq!(
            new_suggestion(false, "alice", "   ").build(Utc::now()),
            Err(Error::EmptyBody)
        );
    }

    #[test]
    fn blank_body_is_reported_before_bad_author() {
        assert_eq!(
            new_suggestion(false, "ali\0ce", "  ").build(Utc::now()),
            Err(Error::EmptyBody)
        );
        assert_eq!(
            new_suggestion(false, "ali\0ce", "ok").build(Utc::now()),
            Err(Error::NullByteInString(String::from("ali\0ce")))
        );
    }

    #[test]
    fn ids_are_fresh() {
        let a = new_suggestion(false, "", "a").build(Utc::now()).unwrap();
        let b = new_suggestion(false, "", "a").build(Utc::now()).unwrap();
        assert_ne!(a.id, b.id);
    }
}
