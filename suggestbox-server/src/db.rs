use suggestbox_api::{
    newest_first, Board, Error, NewComment, NewSuggestion, Suggestion, SuggestionId, Time,
};

/// All the suggestions submitted during one session
#[derive(Debug, Default)]
pub struct Store {
    public: Vec<Suggestion>,
    private: Vec<Suggestion>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    fn board_mut(&mut self, board: Board) -> &mut Vec<Suggestion> {
        match board {
            Board::Public => &mut self.public,
            Board::Private => &mut self.private,
        }
    }

    pub fn submit_suggestion(&mut self, s: NewSuggestion, now: Time) -> Result<SuggestionId, Error> {
        let board = s.board;
        let s = s.build(now)?;
        let id = s.id;
        self.board_mut(board).push(s);
        tracing::debug!(?id, %board, "suggestion submitted");
        Ok(id)
    }

    /// Only suggestions on the public board can be commented on
    pub fn submit_comment(&mut self, c: NewComment) -> Result<(), Error> {
        let target = c.suggestion;
        let comment = c.build()?;
        let s = self
            .public
            .iter_mut()
            .find(|s| s.id == target)
            .ok_or(Error::UnknownSuggestion(target))?;
        s.comments.push(comment);
        tracing::debug!(suggestion = ?target, num_comments = s.comments.len(), "comment submitted");
        Ok(())
    }

    /// Returns the suggestions of `board` in display order, most recent first
    pub fn board(&self, board: Board) -> Vec<Suggestion> {
        let mut res = match board {
            Board::Public => self.public.clone(),
            Board::Private => self.private.clone(),
        };
        newest_first(&mut res);
        res
    }

    #[cfg(test)]
    pub fn len(&self, board: Board) -> usize {
        match board {
            Board::Public => self.public.len(),
            Board::Private => self.private.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use suggestbox_api::{Comment, ANONYMOUS};

    use super::*;

    fn time(secs: i64) -> Time {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn submission(board: Board, anonymous: bool, author: &str, body: &str) -> NewSuggestion {
        NewSuggestion {
            board,
            anonymous,
            author: String::from(author),
            body: String::from(body),
        }
    }

    fn comment(suggestion: SuggestionId, author: &str, body: &str) -> NewComment {
        NewComment {
            suggestion,
            anonymous: false,
            author: String::from(author),
            body: String::from(body),
        }
    }

    #[test]
    fn submission_lands_on_chosen_board() {
        let mut db = Store::new();
        db.submit_suggestion(submission(Board::Public, false, "alice", "hi"), time(0))
            .unwrap();
        assert_eq!((db.len(Board::Public), db.len(Board::Private)), (1, 0));

        let mut db = Store::new();
        db.submit_suggestion(submission(Board::Private, false, "alice", "hi"), time(0))
            .unwrap();
        assert_eq!((db.len(Board::Public), db.len(Board::Private)), (0, 1));
    }

    #[test]
    fn blank_submission_changes_nothing() {
        let mut db = Store::new();
        for board in [Board::Public, Board::Private] {
            assert_eq!(
                db.submit_suggestion(submission(board, false, "alice", " \n "), time(0)),
                Err(Error::EmptyBody)
            );
        }
        assert_eq!((db.len(Board::Public), db.len(Board::Private)), (0, 0));
    }

    #[test]
    fn anonymous_submission_hides_author() {
        let mut db = Store::new();
        db.submit_suggestion(submission(Board::Public, true, "alice", "hi"), time(0))
            .unwrap();
        assert_eq!(db.board(Board::Public)[0].author, ANONYMOUS);
    }

    #[test]
    fn public_board_is_newest_first() {
        let mut db = Store::new();
        db.submit_suggestion(submission(Board::Public, false, "", "t2"), time(2))
            .unwrap();
        db.submit_suggestion(submission(Board::Public, false, "", "t1"), time(1))
            .unwrap();
        db.submit_suggestion(submission(Board::Public, false, "", "t3"), time(3))
            .unwrap();
        let order = db
            .board(Board::Public)
            .into_iter()
            .map(|s| s.body)
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn comment_targets_only_its_suggestion() {
        let mut db = Store::new();
        let a = db
            .submit_suggestion(submission(Board::Public, false, "alice", "a"), time(1))
            .unwrap();
        let b = db
            .submit_suggestion(submission(Board::Public, false, "bob", "b"), time(2))
            .unwrap();
        db.submit_comment(comment(b, "carol", "first on b")).unwrap();
        let before = db.board(Board::Public);

        db.submit_comment(comment(a, "dave", " agreed ")).unwrap();

        let after = db.board(Board::Public);
        let find = |v: &Vec<Suggestion>, id: SuggestionId| {
            v.iter().find(|s| s.id == id).cloned().unwrap()
        };
        let (a_before, a_after) = (find(&before, a), find(&after, a));
        assert_eq!(
            a_after.comments,
            vec![Comment {
                author: String::from("dave"),
                body: String::from("agreed"),
            }]
        );
        assert_eq!(
            (&a_after.author, &a_after.body, a_after.date),
            (&a_before.author, &a_before.body, a_before.date)
        );
        assert_eq!(find(&before, b), find(&after, b));
    }

    #[test]
    fn comments_keep_insertion_order() {
        let mut db = Store::new();
        let a = db
            .submit_suggestion(submission(Board::Public, false, "", "a"), time(1))
            .unwrap();
        for body in ["one", "two", "three"] {
            db.submit_comment(comment(a, "", body)).unwrap();
        }
        let bodies = db.board(Board::Public)[0]
            .comments
            .iter()
            .map(|c| c.body.clone())
            .collect::<Vec<_>>();
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }

    #[test]
    fn blank_comment_changes_nothing() {
        let mut db = Store::new();
        let a = db
            .submit_suggestion(submission(Board::Public, false, "", "a"), time(1))
            .unwrap();
        assert_eq!(db.submit_comment(comment(a, "bob", "\t")), Err(Error::EmptyBody));
        assert!(db.board(Board::Public)[0].comments.is_empty());
    }

    #[test]
    fn private_suggestions_cannot_be_commented() {
        let mut db = Store::new();
        let p = db
            .submit_suggestion(submission(Board::Private, false, "", "secret"), time(1))
            .unwrap();
        assert_eq!(
            db.submit_comment(comment(p, "bob", "hello")),
            Err(Error::UnknownSuggestion(p))
        );
        assert_eq!(
            db.submit_comment(comment(SuggestionId::stub(), "bob", "hello")),
            Err(Error::UnknownSuggestion(SuggestionId::stub()))
        );
        assert!(db.board(Board::Private)[0].comments.is_empty());
    }

    #[test]
    fn rendering_twice_is_identical() {
        let mut db = Store::new();
        for (i, body) in ["x", "y", "z"].iter().enumerate() {
            db.submit_suggestion(submission(Board::Public, false, "", body), time(i as i64))
                .unwrap();
        }
        let view = |db: &Store| {
            db.board(Board::Public)
                .into_iter()
                .map(|s| (s.author.clone(), s.body.clone(), s.display_date(), s.comments.len()))
                .collect::<Vec<_>>()
        };
        assert_eq!(view(&db), view(&db));
    }
}
