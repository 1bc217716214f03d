//! Audio source discovery.
//!
//! The pipeline itself never touches audio — recognition runs in the webview
//! and delivers finished text. This module only backs the microphone picker:
//! it enumerates input devices and flags the ones a streamer is unlikely to
//! want (system-playback captures, virtual cables).

pub mod device;
