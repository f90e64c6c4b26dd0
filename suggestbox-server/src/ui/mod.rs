use suggestbox_api::{Board, Suggestion, SuggestionId};

mod alert;
pub use alert::Alert;

mod app;
pub use app::{Page, PageProps};

mod submit_form;
pub use submit_form::SubmitForm;

mod suggestion_item;
pub use suggestion_item::SuggestionItem;

mod suggestion_list;
pub use suggestion_list::SuggestionList;

/// Outcome of the form that was just submitted, shown next to that form
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Nothing,
    Submitted(Board),
    SubmitFailed(String),
    Commented(SuggestionId),
    CommentFailed(SuggestionId, String),
}

/// Renders the whole page, with `public` being the public board in display order
pub async fn render_page(public: Vec<Suggestion>, notice: Notice) -> String {
    let body = yew::ServerRenderer::<Page>::with_props(move || PageProps {
        suggestions: public,
        notice,
    })
    .hydratable(false)
    .render()
    .await;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Suggestion box</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.2.3/dist/css/bootstrap.min.css">
</head>
<body>
{body}
</body>
</html>
"#
    )
}
