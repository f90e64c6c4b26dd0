use crate::{resolve_author, validate_body, validate_string, Error, SuggestionId};

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    /// Suggestion this comment answers to
    pub suggestion: SuggestionId,
    pub anonymous: bool,
    pub author: String,
    pub body: String,
}

impl NewComment {
    pub fn build(self) -> Result<Comment, Error> {
        let body = validate_body(&self.body)?;
        validate_string(&self.author)?;
        Ok(Comment {
            author: resolve_author(&self.author, self.anonymous),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ANONYMOUS;

    fn new_comment(anonymous: bool, author: &str, body: &str) -> NewComment {
        NewComment {
            suggestion: SuggestionId::stub(),
            anonymous,
            author: String::from(author),
            body: String::from(body),
        }
    }

    #[test]
    fn build_trims_author_and_body() {
        let c = new_comment(false, " bob ", "\tagreed \n").build().unwrap();
        assert_eq!(
            c,
            Comment {
                author: String::from("bob"),
                body: String::from("agreed"),
            }
        );
    }

    #[test]
    fn anonymous_comment_hides_author() {
        let c = new_comment(true, "bob", "agreed").build().unwrap();
        assert_eq!(c.author, ANONYMOUS);
        assert_eq!(c.body, "agreed");
    }

    #[test]
    fn build_rejects_blank_body() {
        assert_eq!(new_comment(true, "bob", " ").build(), Err(Error::EmptyBody));
        assert_eq!(new_comment(false, "b\0b", "").build(), Err(Error::EmptyBody));
        assert_eq!(
            new_comment(false, "b\0b", "agreed").build(),
            Err(Error::NullByteInString(String::from("b\0b")))
        );
    }
}
