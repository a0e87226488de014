use yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlSelectElement};

use crate::models::{ChatSession, UserProfile, VoiceName};

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub open: bool,
    pub sessions: Vec<ChatSession>,
    pub current_session_id: Option<String>,
    pub user: UserProfile,
    #[prop_or_default]
    pub email: Option<String>,
    pub on_select: Callback<String>,
    pub on_delete: Callback<(MouseEvent, String)>,
    pub on_new: Callback<()>,
    pub on_update_user: Callback<String>,
    pub on_update_avatar: Callback<String>,
    pub on_update_voice: Callback<VoiceName>,
    pub on_logout: Callback<()>,
    pub on_open_upgrade: Callback<()>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let width = if props.open { "280px" } else { "0px" };

    let on_name_change = {
        let cb = props.on_update_user.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let name = input.value().trim().to_string();
            if !name.is_empty() {
                cb.emit(name);
            }
        })
    };

    let on_avatar_change = {
        let cb = props.on_update_avatar.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(input.value());
        })
    };

    let on_voice_change = {
        let cb = props.on_update_voice.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(voice) = VoiceName::from_name(&select.value()) {
                cb.emit(voice);
            }
        })
    };

    let css = r#"
        .sidebar { background: var(--bg-sidebar); border-right: 1px solid var(--border-color); display: flex; flex-direction: column; transition: width 0.3s; overflow: hidden; flex-shrink: 0; }
        .sidebar-content { width: 280px; height: 100%; display: flex; flex-direction: column; padding: 10px; gap: 10px; }
        .chat-list { flex-grow: 1; overflow-y: auto; }
        .chat-item { padding: 10px; border-radius: 6px; cursor: pointer; display: flex; justify-content: space-between; align-items: center; margin-bottom: 2px; font-size: 0.9rem; }
        .chat-item.active { background: #1f1f1f; font-weight: 500; }
        .chat-item .del-btn { border: none; background: none; color: var(--text-secondary); cursor: pointer; }
        .profile { border-top: 1px solid var(--border-color); padding-top: 10px; display: flex; flex-direction: column; gap: 6px; }
        .profile img { width: 40px; height: 40px; border-radius: 50%; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="sidebar" style={format!("width: {};", width)}>
                <div class="sidebar-content">
                    <button class="btn" onclick={props.on_new.reform(|_| ())}>{ "+ New Wave" }</button>
                    <div class="chat-list">
                        { for props.sessions.iter().map(|session| {
                            let id = session.id.clone();
                            let is_active = props.current_session_id.as_deref() == Some(id.as_str());
                            let active_class = if is_active { "active" } else { "" };
                            let on_sel = props.on_select.clone();
                            let on_del = props.on_delete.clone();
                            let id_c = id.clone();

                            html! {
                                <div class={format!("chat-item {}", active_class)} onclick={Callback::from(move |_| on_sel.emit(id.clone()))}>
                                    <span style="overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">{ &session.title }</span>
                                    <button class="del-btn" onclick={Callback::from(move |e| on_del.emit((e, id_c.clone())))}>{ "×" }</button>
                                </div>
                            }
                        })}
                    </div>

                    <div class="profile">
                        <img src={props.user.avatar.clone()} alt="avatar" />
                        if let Some(email) = &props.email {
                            <span style="color: var(--text-secondary); font-size: 0.8rem;">{ email }</span>
                        }
                        <input class="form-input" type="text" value={props.user.username.clone()} onchange={on_name_change} />
                        <input class="form-input" type="text" value={props.user.avatar.clone()} onchange={on_avatar_change} placeholder="Avatar URL" />
                        <select class="form-input" onchange={on_voice_change}>
                            { for VoiceName::ALL.iter().map(|v| html! {
                                <option value={v.as_str()} selected={*v == props.user.preferred_voice}>{ v.as_str() }</option>
                            })}
                        </select>
                        if props.user.is_pro {
                            <span>{ "Pro" }</span>
                        } else {
                            <button class="btn btn-primary" onclick={props.on_open_upgrade.reform(|_| ())}>{ "Upgrade" }</button>
                        }
                        <button class="btn" onclick={props.on_logout.reform(|_| ())}>{ "Log out" }</button>
                    </div>
                </div>
            </div>
        </>
    }
}
