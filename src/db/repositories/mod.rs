mod kv;
pub mod logs;
mod points;
mod sessions;
