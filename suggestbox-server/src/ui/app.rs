use suggestbox_api::Suggestion;
use yew::prelude::*;

use crate::ui::{Alert, Notice, SubmitForm, SuggestionList};

#[derive(Clone, PartialEq, Properties)]
pub struct PageProps {
    pub suggestions: Vec<Suggestion>,
    pub notice: Notice,
}

#[function_component(Page)]
pub fn page(p: &PageProps) -> Html {
    // Comment failures are shown on their suggestion, unless it is not on the board
    let orphan_alert = match &p.notice {
        Notice::CommentFailed(id, msg) if !p.suggestions.iter().any(|s| s.id == *id) => html! {
            <Alert success={ false } message={ msg.clone() } />
        },
        _ => html! {},
    };
    html! {
        <div class="container my-4">
            { orphan_alert }
            <h1>{ "Suggestion box 📝" }</h1>
            <p class="lead">{ "Let us know what you think." }</p>
            <section class="mb-5">
                <h2>{ "New suggestion" }</h2>
                <SubmitForm notice={ p.notice.clone() } />
            </section>
            <section>
                <h2>{ "Public board" }</h2>
                <SuggestionList suggestions={ p.suggestions.clone() } notice={ p.notice.clone() } />
            </section>
        </div>
    }
}
