use yew::prelude::*;

use crate::models::SubscriptionPlan;

#[derive(Properties, PartialEq)]
pub struct SubscriptionProps {
    pub on_subscribe: Callback<SubscriptionPlan>,
    pub on_close: Callback<()>,
}

#[function_component(SubscriptionModal)]
pub fn subscription_modal(props: &SubscriptionProps) -> Html {
    let css = r#"
        .sub-backdrop { position: fixed; inset: 0; background: rgba(0,0,0,0.6); z-index: 99; }
        .sub-panel { position: fixed; top: 20%; left: 50%; transform: translateX(-50%); width: 340px; background: #111; border: 1px solid var(--border-color); border-radius: 8px; padding: 20px; z-index: 100; display: flex; flex-direction: column; gap: 12px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="sub-backdrop" onclick={props.on_close.reform(|_| ())}></div>
            <div class="sub-panel">
                <h3>{ "BotWave Pro" }</h3>
                <button class="btn btn-primary" onclick={props.on_subscribe.reform(|_| SubscriptionPlan::Monthly)}>{ "Monthly" }</button>
                <button class="btn btn-primary" onclick={props.on_subscribe.reform(|_| SubscriptionPlan::Yearly)}>{ "Yearly" }</button>
                <button class="btn" onclick={props.on_close.reform(|_| ())}>{ "Not now" }</button>
            </div>
        </>
    }
}
