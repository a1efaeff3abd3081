// SPDX-License-Identifier: LGPL-3.0-only

//! The model behind an on-screen log panel.

use log::{Level, LevelFilter};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vello::peniko::Color;

use super::{ListenerId, LogDispatcher, LogEvent, LogListener, SharedError};

/// Size of the log panel, which decides how many entries fit on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Panel width in pixels. Kept for drawing the panel; it does not
    /// change how many entries fit.
    pub width: f64,
    /// Panel height in pixels.
    pub height: f64,
    /// Height of one line of text.
    pub text_size: f64,
    /// Vertical padding around each line.
    pub padding_y: f64,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            width: 250.0,
            height: 142.0,
            text_size: 12.0,
            padding_y: 2.0,
        }
    }
}

impl PanelLayout {
    /// Number of entries that fit into the panel.
    pub fn max_entries(&self) -> usize {
        let line_height = self.text_size + self.padding_y;
        if line_height <= 0.0 {
            return 0;
        }

        let lines = ((self.height - self.padding_y) / line_height).floor();
        if lines.is_finite() && lines > 0.0 {
            lines as usize
        } else {
            0
        }
    }
}

/// Text colors of the log panel by severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    /// Color of errors.
    pub error: Color,
    /// Color of warnings.
    pub warning: Color,
    /// Color of every other level.
    pub information: Color,
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            error: Color::from_rgb8(255, 0, 0),
            warning: Color::from_rgb8(255, 165, 0),
            information: Color::BLACK,
        }
    }
}

struct BufferState {
    entries: VecDeque<LogEvent>,
    filter: LevelFilter,
    layout: PanelLayout,
    colors: TextColors,
}

impl BufferState {
    fn trim(&mut self) {
        let max = self.layout.max_entries();
        while self.entries.len() > max {
            self.entries.pop_front();
        }
    }
}

/// Keeps the most recent log events that pass a level filter and fit on a
/// panel.
///
/// Entries are kept oldest first. When there are more entries than the
/// [PanelLayout] has room for, the oldest ones are dropped.
pub struct LogBuffer {
    state: Mutex<BufferState>,
    attached: Mutex<Option<ListenerId>>,
}

impl LogBuffer {
    /// Create a buffer with the default layout and an `Info` filter.
    pub fn new() -> Self {
        Self::with_layout(PanelLayout::default())
    }

    /// Create a buffer with the given layout and an `Info` filter.
    pub fn with_layout(layout: PanelLayout) -> Self {
        Self {
            state: Mutex::new(BufferState {
                entries: VecDeque::with_capacity(layout.max_entries()),
                filter: LevelFilter::Info,
                layout,
                colors: TextColors::default(),
            }),
            attached: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an event if it passes the filter.
    pub fn push(&self, event: LogEvent) {
        let mut state = self.lock();
        if event.level > state.filter {
            return;
        }

        state.entries.push_back(event);
        state.trim();
    }

    /// Record an event built from its parts.
    pub fn log(&self, level: Level, message: impl Into<String>, error: Option<SharedError>) {
        self.push(LogEvent {
            level,
            message: message.into(),
            error,
        });
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// The current level filter.
    pub fn filter(&self) -> LevelFilter {
        self.lock().filter
    }

    /// Change the level filter, dropping entries that no longer pass it.
    pub fn set_filter(&self, filter: LevelFilter) {
        let mut state = self.lock();
        if state.filter == filter {
            return;
        }

        state.filter = filter;
        state.entries.retain(|entry| entry.level <= filter);
    }

    /// The current panel layout.
    pub fn layout(&self) -> PanelLayout {
        self.lock().layout
    }

    /// Change the panel layout, dropping the oldest entries that no longer fit.
    pub fn set_layout(&self, layout: PanelLayout) {
        let mut state = self.lock();
        state.layout = layout;
        state.trim();
    }

    /// Maximum number of entries for the current layout.
    pub fn max_entries(&self) -> usize {
        self.lock().layout.max_entries()
    }

    /// The current text colors.
    pub fn text_colors(&self) -> TextColors {
        self.lock().colors
    }

    /// Change the text colors.
    pub fn set_text_colors(&self, colors: TextColors) {
        self.lock().colors = colors;
    }

    /// Text color for an entry of the given level.
    pub fn text_color(&self, level: Level) -> Color {
        let colors = self.lock().colors;
        match level {
            Level::Error => colors.error,
            Level::Warn => colors.warning,
            _ => colors.information,
        }
    }

    /// Snapshot of the entries, oldest first.
    pub fn entries(&self) -> Vec<LogEvent> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The panel text, one line per entry.
    pub fn text(&self) -> String {
        let state = self.lock();
        let lines: Vec<String> = state.entries.iter().map(|entry| entry.to_string()).collect();
        lines.join("\n")
    }

    /// Start receiving events from `dispatcher`. Does nothing if already
    /// attached.
    pub fn attach(self: &Arc<Self>, dispatcher: &LogDispatcher) {
        let mut attached = self.attached.lock().unwrap_or_else(PoisonError::into_inner);
        if attached.is_none() {
            let listener: Arc<dyn LogListener> = self.clone();
            *attached = Some(dispatcher.register(listener));
        }
    }

    /// Stop receiving events from `dispatcher`. Returns `false` if the buffer
    /// was not attached.
    pub fn detach(&self, dispatcher: &LogDispatcher) -> bool {
        let mut attached = self.attached.lock().unwrap_or_else(PoisonError::into_inner);
        match attached.take() {
            Some(id) => dispatcher.unregister(id),
            None => false,
        }
    }

    /// Whether the buffer is registered with a dispatcher.
    pub fn is_attached(&self) -> bool {
        self.attached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogListener for LogBuffer {
    fn on_log(&self, event: &LogEvent) {
        self.push(event.clone());
    }
}
