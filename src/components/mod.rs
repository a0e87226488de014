pub mod auth;
pub mod chat_window;
pub mod sidebar;
pub mod subscription;
