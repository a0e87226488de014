use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use yew::prelude::*;

use crate::components::{
    auth::Auth, chat_window::ChatWindow, sidebar::Sidebar, subscription::SubscriptionModal,
};
use crate::config::AppConfig;
use crate::error::BotWaveError;
use crate::models::{ChatMessage, SubscriptionPlan, VoiceName};
use crate::services::controller::Controller;
use crate::services::storage::{KeyValueStore, LocalStorage};
use crate::services::sync::BroadcastChannelTransport;

type BrowserController = Controller<LocalStorage, BroadcastChannelTransport>;

const GLOBAL_STYLES: &str = r#"
    :root {
        --bg-app: #000000;
        --bg-sidebar: #0d0d0d;
        --border-color: #222;
        --text-primary: #e5e5e5;
        --text-secondary: #888;
        --accent-color: #6366f1;
        --danger-color: #ef4444;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; color: var(--text-primary); background: var(--bg-app); }

    .app-container { display: flex; height: 100vh; overflow: hidden; }
    .main-content { flex-grow: 1; display: flex; flex-direction: column; position: relative; }
    .btn { cursor: pointer; border: 1px solid var(--border-color); background: transparent; padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; color: var(--text-primary); }
    .btn-primary { background: var(--accent-color); border-color: transparent; color: white; }
    .form-input { width: 100%; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; background: #111; color: var(--text-primary); }
    .fatal { padding: 40px; color: var(--danger-color); }
"#;

/// Shared handle on the tab's controller; equal when it is the same instance.
#[derive(Clone)]
pub struct SharedController(Rc<RefCell<BrowserController>>);

impl PartialEq for SharedController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Starts the controller, discarding stored entries that no longer parse.
fn boot(config: &AppConfig) -> anyhow::Result<BrowserController> {
    // one retry per storage key at most
    for _ in 0..=4 {
        let transport = BroadcastChannelTransport::open(&config.channel_name)
            .context("failed to open the sync channel")?;
        match Controller::start(config.clone(), LocalStorage, transport) {
            Err(BotWaveError::Corrupt { key, message }) => {
                tracing::error!("discarding corrupted '{}': {}", key, message);
                LocalStorage.remove(&key);
            }
            started => return started.context("failed to start"),
        }
    }
    anyhow::bail!("stored data stayed unreadable")
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: AppConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let booted = use_memo(props.config.clone(), |config| {
        boot(config)
            .map(|c| SharedController(Rc::new(RefCell::new(c))))
            .map_err(|e| format!("{:#}", e))
    });

    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            {
                match &*booted {
                    Ok(controller) => html! { <Workspace controller={controller.clone()} config={props.config.clone()} /> },
                    Err(message) => html! { <div class="fatal">{ message }</div> },
                }
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct WorkspaceProps {
    controller: SharedController,
    config: AppConfig,
}

/// Callback that runs `f` against the controller, then re-renders.
fn action<IN: 'static>(
    controller: &SharedController,
    redraw: &UseForceUpdateHandle,
    f: impl Fn(&mut BrowserController, IN) + 'static,
) -> Callback<IN> {
    let controller = controller.clone();
    let redraw = redraw.clone();
    Callback::from(move |input: IN| {
        f(&mut controller.0.borrow_mut(), input);
        redraw.force_update();
    })
}

#[function_component(Workspace)]
fn workspace(props: &WorkspaceProps) -> Html {
    let redraw = use_force_update();
    let show_upgrade = use_state(|| false);
    let sidebar_open = use_state(|| true);
    let login_error = use_state(|| None::<String>);
    let ctl = &props.controller;

    // Other tabs' events; the channel is closed when the workspace goes away.
    {
        let ctl = ctl.clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            let inbox = ctl.clone();
            ctl.0.borrow().transport().subscribe(move |event| {
                inbox.0.borrow_mut().handle_incoming(event);
                redraw.force_update();
            });
            move || ctl.0.borrow().shutdown()
        });
    }

    let on_login = {
        let ctl = ctl.clone();
        let redraw = redraw.clone();
        let login_error = login_error.clone();
        Callback::from(move |email: String| {
            let mut result = ctl.0.borrow_mut().log_in(&email);
            let corrupted = match &result {
                Err(BotWaveError::Corrupt { key, message }) => {
                    tracing::error!("discarding corrupted '{}': {}", key, message);
                    Some(key.clone())
                }
                _ => None,
            };
            if let Some(key) = corrupted {
                LocalStorage.remove(&key);
                result = ctl.0.borrow_mut().log_in(&email);
            }
            match result {
                Ok(()) => login_error.set(None),
                Err(e) => {
                    tracing::warn!("login rejected: {}", e);
                    login_error.set(Some(e.to_string()));
                }
            }
            redraw.force_update();
        })
    };

    let on_select = action(ctl, &redraw, |c, id: String| c.select_session(&id));
    let on_new = action(ctl, &redraw, |c, _: ()| c.create_session());
    let on_delete = action(ctl, &redraw, |c, (e, id): (MouseEvent, String)| {
        e.stop_propagation();
        c.delete_session(&id);
    });
    let on_update_user = action(ctl, &redraw, |c, name: String| c.update_username(name));
    let on_update_avatar = action(ctl, &redraw, |c, avatar: String| c.update_avatar(avatar));
    let on_update_voice = action(ctl, &redraw, |c, voice: VoiceName| c.update_voice(voice));
    let on_logout = action(ctl, &redraw, |c, _: ()| c.log_out());
    let on_send = action(ctl, &redraw, |c, (text, image): (String, Option<String>)| {
        c.send_message(text, image)
    });
    let on_toggle_collab = action(ctl, &redraw, |c, id: String| c.toggle_collaborator(&id));
    let on_rewrite = action(ctl, &redraw, |c, (id, messages): (String, Vec<ChatMessage>)| {
        c.replace_messages(&id, messages)
    });

    let on_subscribe = {
        let show_upgrade = show_upgrade.clone();
        action(ctl, &redraw, move |c, plan: SubscriptionPlan| {
            c.subscribe(plan);
            show_upgrade.set(false);
        })
    };
    let open_upgrade = {
        let show_upgrade = show_upgrade.clone();
        Callback::from(move |_: ()| show_upgrade.set(true))
    };
    let close_upgrade = {
        let show_upgrade = show_upgrade.clone();
        Callback::from(move |_: ()| show_upgrade.set(false))
    };
    let toggle_sidebar = {
        let sidebar_open = sidebar_open.clone();
        Callback::from(move |_: ()| sidebar_open.set(!*sidebar_open))
    };

    let controller = ctl.0.borrow();
    if !controller.is_logged_in() {
        return html! { <Auth on_login={on_login} error={(*login_error).clone()} /> };
    }

    html! {
        <div class="app-container">
            <Sidebar
                open={*sidebar_open}
                sessions={controller.sessions().to_vec()}
                current_session_id={controller.current_session_id().map(str::to_string)}
                user={controller.profile().clone()}
                email={controller.email()}
                on_select={on_select}
                on_new={on_new}
                on_delete={on_delete}
                on_update_user={on_update_user}
                on_update_avatar={on_update_avatar}
                on_update_voice={on_update_voice}
                on_logout={on_logout}
                on_open_upgrade={open_upgrade.clone()}
            />

            <div class="main-content">
                <ChatWindow
                    session={controller.current_session().cloned()}
                    user={controller.profile().clone()}
                    config={props.config.clone()}
                    on_send={on_send}
                    on_toggle_collab={on_toggle_collab}
                    on_rewrite={on_rewrite}
                    on_open_upgrade={open_upgrade}
                    on_toggle_menu={toggle_sidebar}
                />
            </div>

            if *show_upgrade {
                <SubscriptionModal on_subscribe={on_subscribe} on_close={close_upgrade} />
            }
        </div>
    }
}
