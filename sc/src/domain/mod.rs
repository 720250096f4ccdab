//! Domain types shared by the codec, broker and coordinator

mod status;

pub use status::StatusEvent;
