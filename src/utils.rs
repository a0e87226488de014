use pulldown_cmark::{html, Event as MdEvent, Options, Parser};
use yew::{AttrValue, Html};

pub fn set_panic_hook() {
    // Better error messages in the browser console if our code ever panics.
    // https://github.com/rustwasm/console_error_panic_hook#readme
    console_error_panic_hook::set_once();
}

pub fn init_tracing(level: tracing::Level) {
    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(level)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

pub fn render_markdown(text: &str) -> Html {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        MdEvent::SoftBreak => MdEvent::HardBreak,
        _ => event,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let styled_html = format!(r#"<div class="markdown-body">{}</div>"#, html_output);
    Html::from_html_unchecked(AttrValue::from(styled_html))
}
