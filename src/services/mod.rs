pub mod controller;
pub mod profile_store;
pub mod session_store;
pub mod storage;
pub mod sync;
