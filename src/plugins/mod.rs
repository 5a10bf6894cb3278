//! Plugins: adapters turning third-party events into records

pub mod http;
pub mod plugin;

pub use http::{classify, normalise_ip, HttpExchange, HttpPlugin, HTTP_SOURCE};
pub use plugin::{Listener, Plugin, PluginAdapter};
