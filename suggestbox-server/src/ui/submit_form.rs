use suggestbox_api::Board;
use yew::prelude::*;

use crate::ui::{Alert, Notice};

#[derive(Clone, PartialEq, Properties)]
pub struct SubmitFormProps {
    pub notice: Notice,
}

#[function_component(SubmitForm)]
pub fn submit_form(p: &SubmitFormProps) -> Html {
    let alert = match &p.notice {
        Notice::Submitted(Board::Public) => html! {
            <Alert
                success={ true }
                message="Your suggestion is on the public board. Have a look at what others suggested too!"
            />
        },
        Notice::Submitted(Board::Private) => html! {
            <Alert
                success={ true }
                message="Your suggestion was submitted privately. Only you can see it."
            />
        },
        Notice::SubmitFailed(msg) => html! {
            <Alert success={ false } message={ msg.clone() } />
        },
        _ => html! {},
    };
    html! {
        <form method="post" action="/submit">
            { alert }
            <fieldset class="mb-3">
                <legend class="fs-6">{ "Which board should your suggestion go to?" }</legend>
                <div class="form-check">
                    <input
                        class="form-check-input"
                        type="radio"
                        name="board"
                        id="board-public"
                        value="public"
                        checked={ true }
                    />
                    <label class="form-check-label" for="board-public">
                        { "Public board (everyone can see it)" }
                    </label>
                </div>
                <div class="form-check">
                    <input
                        class="form-check-input"
                        type="radio"
                        name="board"
                        id="board-private"
                        value="private"
                    />
                    <label class="form-check-label" for="board-private">
                        { "Private board (only you can see it)" }
                    </label>
                </div>
            </fieldset>
            <div class="form-check mb-3">
                <input class="form-check-input" type="checkbox" name="anonymous" id="anonymous" />
                <label class="form-check-label" for="anonymous">{ "Submit anonymously" }</label>
            </div>
            <div class="mb-3">
                <label class="form-label" for="author">{ "Name" }</label>
                <input
                    type="text"
                    class="form-control"
                    id="author"
                    name="author"
                    placeholder="Your name"
                />
            </div>
            <div class="mb-3">
                <label class="form-label" for="body">{ "Suggestion" }</label>
                <textarea
                    class="form-control"
                    id="body"
                    name="body"
                    rows="6"
                    placeholder="What would you like to suggest?"
                />
            </div>
            <button type="submit" class="btn btn-primary">{ "Submit" }</button>
        </form>
    }
}
