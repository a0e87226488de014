use yew::prelude::*;
use web_sys::{HtmlElement, HtmlTextAreaElement};

use crate::config::AppConfig;
use crate::models::{AICollaborator, ChatMessage, ChatSession, MessageRole, UserProfile};
use crate::utils::render_markdown;

#[derive(Properties, PartialEq)]
pub struct ChatWindowProps {
    pub session: Option<ChatSession>,
    pub user: UserProfile,
    pub config: AppConfig,
    pub on_send: Callback<(String, Option<String>)>,
    pub on_toggle_collab: Callback<String>,
    /// Rewrites a session's whole message list.
    pub on_rewrite: Callback<(String, Vec<ChatMessage>)>,
    pub on_open_upgrade: Callback<()>,
    pub on_toggle_menu: Callback<()>,
}

#[function_component(ChatWindow)]
pub fn chat_window(props: &ChatWindowProps) -> Html {
    let input_text = use_state(String::new);
    let scroll_ref = use_node_ref();

    // Keep the newest message in view.
    {
        let div_ref = scroll_ref.clone();
        let len = props.session.as_ref().map(|s| s.messages.len()).unwrap_or(0);
        use_effect_with(len, move |_| {
            if let Some(div) = div_ref.cast::<HtmlElement>() {
                div.set_scroll_top(div.scroll_height());
            }
        });
    }

    let send = {
        let text = input_text.clone();
        let on_send = props.on_send.clone();
        move || {
            let value = text.trim().to_string();
            if !value.is_empty() {
                on_send.emit((value, None));
                text.set(String::new());
            }
        }
    };

    let on_submit = {
        let send = send.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            send();
        })
    };

    let on_keydown = Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" && !e.shift_key() {
            e.prevent_default();
            send();
        }
    });

    let on_input = {
        let text = input_text.clone();
        Callback::from(move |e: InputEvent| {
            let i: HtmlTextAreaElement = e.target_unchecked_into();
            text.set(i.value());
        })
    };

    let Some(session) = &props.session else {
        return html! {
            <div class="messages-container">
                <p style="color: var(--text-secondary);">{ "Start a new wave from the menu." }</p>
            </div>
        };
    };

    let on_undo = {
        let on_rewrite = props.on_rewrite.clone();
        let id = session.id.clone();
        let mut messages = session.messages.clone();
        messages.pop();
        Callback::from(move |_| on_rewrite.emit((id.clone(), messages.clone())))
    };

    let css = r#"
        .chat-header { padding: 10px 20px; border-bottom: 1px solid var(--border-color); display: flex; gap: 10px; align-items: center; height: 60px; }
        .chat-header h2 { font-size: 1rem; margin: 0; flex-grow: 1; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }
        .collab.on { background: var(--accent-color); color: white; }
        .messages-container { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 12px; }
        .message-row { display: flex; gap: 8px; }
        .message-row.user { flex-direction: row-reverse; }
        .message-row img.avatar { width: 28px; height: 28px; border-radius: 50%; }
        .msg-bubble { padding: 10px 14px; border-radius: 12px; background: #161616; max-width: 80%; overflow-wrap: anywhere; }
        .input-area { display: flex; gap: 8px; padding: 12px 20px; border-top: 1px solid var(--border-color); }
        .input-area textarea { flex-grow: 1; resize: none; height: 44px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="chat-header">
                <button class="btn" onclick={props.on_toggle_menu.reform(|_| ())}>{ "☰" }</button>
                <h2>{ &session.title }</h2>
                { for AICollaborator::roster_for(session, &props.config).into_iter().map(|collab| {
                    let cb = props.on_toggle_collab.clone();
                    let id = collab.id.clone();
                    html! {
                        <button class={classes!("btn", "collab", collab.is_active.then_some("on"))}
                                title={format!("{}: {}", collab.role, collab.instruction)}
                                onclick={Callback::from(move |_| cb.emit(id.clone()))}>
                            { collab.name }
                        </button>
                    }
                })}
                if !session.messages.is_empty() {
                    <button class="btn" onclick={on_undo} title="Remove last message">{ "↶" }</button>
                }
                if !props.user.is_pro {
                    <button class="btn btn-primary" onclick={props.on_open_upgrade.reform(|_| ())}>{ "Go Pro" }</button>
                }
            </div>

            <div class="messages-container" ref={scroll_ref}>
                { for session.messages.iter().map(|msg| {
                    let role_class = match msg.role {
                        MessageRole::User => "user",
                        MessageRole::Bot => "bot",
                    };
                    html! {
                        <div class={classes!("message-row", role_class)} key={msg.id.clone()}>
                            if let Some(avatar) = &msg.content.sender_avatar {
                                <img class="avatar" src={avatar.clone()} title={msg.content.sender_name.clone()} />
                            }
                            <div class="msg-bubble">
                                { render_markdown(msg.text()) }
                                if let Some(image) = &msg.content.image {
                                    <img src={image.clone()} style="max-width: 100%;" />
                                }
                            </div>
                        </div>
                    }
                })}
            </div>

            <form class="input-area" onsubmit={on_submit}>
                <textarea class="form-input" value={(*input_text).clone()} oninput={on_input} onkeydown={on_keydown} placeholder="Send a wave..." />
                <button class="btn btn-primary" type="submit">{ "Send" }</button>
            </form>
        </>
    }
}
