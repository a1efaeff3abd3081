// SPDX-License-Identifier: LGPL-3.0-only
//! Services around the maprender core => See `maprender` crate.

/// Contains log dispatch and the on-screen log buffer.
pub mod logging;

pub use logging::{
    ListenerId, LogBuffer, LogDispatcher, LogEvent, LogListener, PanelLayout, SharedError, TextColors,
};
