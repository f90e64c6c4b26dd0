use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct AlertProps {
    pub success: bool,
    pub message: String,
}

#[function_component(Alert)]
pub fn alert(p: &AlertProps) -> Html {
    let kind = match p.success {
        true => "alert-success",
        false => "alert-danger",
    };
    html! {
        <div class={ classes!("alert", kind) } role="alert">
            { &p.message }
        </div>
    }
}
