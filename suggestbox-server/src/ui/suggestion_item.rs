use suggestbox_api::Suggestion;
use yew::prelude::*;

use crate::ui::{Alert, Notice};

#[derive(Clone, PartialEq, Properties)]
pub struct SuggestionItemProps {
    pub suggestion: Suggestion,
    pub notice: Notice,
}

#[function_component(SuggestionItem)]
pub fn suggestion_item(p: &SuggestionItemProps) -> Html {
    let s = &p.suggestion;
    let anonymous_id = format!("anonymous-{}", s.id.0);
    html! {
        <div class="card mb-3" id={ format!("suggestion-{}", s.id.0) }>
            <div class="card-body">
                <h3 class="card-title h5">{ "🗣️ " }{ &s.author }</h3>
                <p class="card-subtitle text-muted mb-2">
                    <strong>{ "Date: " }</strong>{ s.display_date() }
                </p>
                <p class="card-text">{ &s.body }</p>
                <details>
                    <summary>{ format!("Comments ({})", s.comments.len()) }</summary>
                    { comment_list(s) }
                </details>
                <form method="post" action={ format!("/comment/{}", s.id.0) } class="mt-3">
                    <h4 class="h6">{ "Leave a comment" }</h4>
                    { comment_alert(s, &p.notice) }
                    <input
                        type="text"
                        class="form-control mb-2"
                        name="author"
                        placeholder="Your name"
                        aria-label="Name"
                    />
                    <div class="form-check mb-2">
                        <input
                            class="form-check-input"
                            type="checkbox"
                            name="anonymous"
                            id={ anonymous_id.clone() }
                        />
                        <label class="form-check-label" for={ anonymous_id }>
                            { "Comment anonymously" }
                        </label>
                    </div>
                    <textarea class="form-control mb-2" name="body" rows="2" aria-label="Comment" />
                    <button type="submit" class="btn btn-secondary btn-sm">{ "Post comment" }</button>
                </form>
            </div>
        </div>
    }
}

fn comment_list(s: &Suggestion) -> Html {
    if s.comments.is_empty() {
        return html! { <p class="text-muted">{ "No comments yet." }</p> };
    }
    html! {
        <ul class="list-group list-group-flush">
            { for s.comments.iter().map(|c| html! {
                <li class="list-group-item">
                    <strong>{ &c.author }</strong>{ ": " }{ &c.body }
                </li>
            }) }
        </ul>
    }
}

fn comment_alert(s: &Suggestion, notice: &Notice) -> Html {
    match notice {
        Notice::Commented(id) if *id == s.id => html! {
            <Alert success={ true } message="Your comment was posted!" />
        },
        Notice::CommentFailed(id, msg) if *id == s.id => html! {
            <Alert success={ false } message={ msg.clone() } />
        },
        _ => html! {},
    }
}
