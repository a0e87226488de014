use yew::prelude::*;
use web_sys::HtmlInputElement;

#[derive(Properties, PartialEq)]
pub struct AuthProps {
    pub on_login: Callback<String>,
    #[prop_or_default]
    pub error: Option<String>,
}

/// Login is mocked: any email-shaped address is accepted.
#[function_component(Auth)]
pub fn auth(props: &AuthProps) -> Html {
    let email = use_state(String::new);

    let on_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_login.emit((*email).clone());
        })
    };

    let css = r#"
        .auth { height: 100vh; display: flex; align-items: center; justify-content: center; }
        .auth form { width: 320px; display: flex; flex-direction: column; gap: 12px; }
        .auth .error { color: var(--danger-color); font-size: 0.85rem; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="auth">
                <form onsubmit={on_submit}>
                    <h2>{ "BotWave" }</h2>
                    <input class="form-input" type="email" placeholder="you@example.com" value={(*email).clone()} oninput={on_input} />
                    <input class="form-input" type="password" placeholder="Password" />
                    <button class="btn btn-primary" type="submit">{ "Sign in" }</button>
                    if let Some(error) = &props.error {
                        <div class="error">{ error }</div>
                    }
                </form>
            </div>
        </>
    }
}
