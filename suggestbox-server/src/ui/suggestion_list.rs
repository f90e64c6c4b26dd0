use suggestbox_api::Suggestion;
use yew::prelude::*;

use crate::ui::{Notice, SuggestionItem};

#[derive(Clone, PartialEq, Properties)]
pub struct SuggestionListProps {
    pub suggestions: Vec<Suggestion>,
    pub notice: Notice,
}

#[function_component(SuggestionList)]
pub fn suggestion_list(p: &SuggestionListProps) -> Html {
    if p.suggestions.is_empty() {
        return html! {
            <div class="alert alert-info" role="status">
                { "No public suggestions yet. Be the first to share one!" }
            </div>
        };
    }
    html! {
        <div class="suggestion-list">
            { for p.suggestions.iter().map(|s| html! {
                <SuggestionItem suggestion={ s.clone() } notice={ p.notice.clone() } />
            }) }
        </div>
    }
}
