use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Display name used when the author chose not to reveal themselves
pub const ANONYMOUS: &str = "anonymous";

/// Format used to display suggestion dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

mod board;
pub use board::{newest_first, Board};

mod comment;
pub use comment::{Comment, NewComment};

mod error;
pub use error::Error;

mod session;
pub use session::SessionToken;

mod suggestion;
pub use suggestion::{NewSuggestion, Suggestion, SuggestionId};

/// Returns the name to store for an author, given what they typed and whether they asked to
/// stay anonymous
pub fn resolve_author(author: &str, anonymous: bool) -> String {
    let author = author.trim();
    if anonymous || author.is_empty() {
        String::from(ANONYMOUS)
    } else {
        String::from(author)
    }
}

/// Trims `body`, rejecting it if nothing is left
pub fn validate_body(body: &str) -> Result<String, Error> {
    validate_string(body)?;
    let body = body.trim();
    if body.is_empty() {
        return Err(Error::EmptyBody);
    }
    Ok(String::from(body))
}

pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(String::from(s))),
        false => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_flag_overrides_author() {
        assert_eq!(resolve_author("alice", true), ANONYMOUS);
        assert_eq!(resolve_author("", true), ANONYMOUS);
    }

    #[test]
    fn blank_author_is_anonymous() {
        assert_eq!(resolve_author("", false), ANONYMOUS);
        assert_eq!(resolve_author("   \t", false), ANONYMOUS);
        assert_eq!(resolve_author("  bob ", false), "bob");
    }

    #[test]
    fn body_validation() {
        assert_eq!(validate_body(""), Err(Error::EmptyBody));
        assert_eq!(validate_body(" \n\t "), Err(Error::EmptyBody));
        assert_eq!(validate_body("  more benches \n"), Ok(String::from("more benches")));
        assert_eq!(
            validate_body("a\0b"),
            Err(Error::NullByteInString(String::from("a\0b")))
        );
    }
}
