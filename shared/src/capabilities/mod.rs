mod kv;

pub use self::kv::{KvError, KvReadResult, KvWriteResult, StorageKey, MAX_KEY_LENGTH};

pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

// The derive names the app type `App`.
#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub key_value: KeyValue<Event>,
}
