use std::collections::HashSet;

/// Fixed step applied by each progress tick while a generation runs.
const PROGRESS_STEP: u8 = 10;

/// Ceiling for the simulated ramp; only a real completion reaches 100.
const PROGRESS_CAP: u8 = 90;

/// In-memory state for one storyboard editing session.
///
/// Owns everything the UI layer displays: the sequence being generated,
/// the saved sequences (newest first), the frame selection set, the
/// loading flag with its simulated progress ramp, the video popup
/// target, and the last user-visible error. Nothing here touches the
/// network — the session consumes the values the generation clients
/// return, and nothing survives the session (no persistence).
///
/// The progress value is a UI-only ramp advanced in fixed steps; it is
/// not derived from real provider progress.
#[derive(Debug, Default)]
pub struct StoryboardSession {
    current_sequence: Vec<String>,
    saved_sequences: Vec<Vec<String>>,
    selected: HashSet<String>,
    loading: bool,
    progress: u8,
    last_error: Option<String>,
    video_popup: Option<String>,
    generated_video: Option<String>,
}

impl StoryboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Sequence generation lifecycle ───────────────────────────────

    /// Mark a sequence generation as started.
    pub fn begin_generation(&mut self) {
        self.loading = true;
        self.progress = 0;
        self.last_error = None;
    }

    /// Advance the simulated progress ramp one fixed step.
    ///
    /// Has no effect unless a generation is in flight; never reaches
    /// 100 on its own.
    pub fn tick_progress(&mut self) {
        if self.loading {
            self.progress = (self.progress + PROGRESS_STEP).min(PROGRESS_CAP);
        }
    }

    /// Record a finished sequence. Clears the loading state.
    pub fn finish_generation(&mut self, frames: Vec<String>) {
        self.current_sequence = frames;
        self.loading = false;
        self.progress = 100;
    }

    /// Record a failed generation. Clears the loading state.
    ///
    /// The loading flag never survives a terminal outcome, success or
    /// failure.
    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.loading = false;
        self.progress = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Sequences ───────────────────────────────────────────────────

    pub fn current_sequence(&self) -> &[String] {
        &self.current_sequence
    }

    pub fn saved_sequences(&self) -> &[Vec<String>] {
        &self.saved_sequences
    }

    /// Save the current sequence (newest first) and clear it.
    /// Saving an empty sequence is a no-op.
    pub fn save_current(&mut self) {
        if self.current_sequence.is_empty() {
            return;
        }
        let sequence = std::mem::take(&mut self.current_sequence);
        self.saved_sequences.insert(0, sequence);
    }

    /// Discard the current in-progress sequence.
    pub fn delete_current(&mut self) {
        self.current_sequence.clear();
    }

    /// Delete a saved sequence by position. Out-of-range is a no-op.
    pub fn delete_saved(&mut self, index: usize) {
        if index < self.saved_sequences.len() {
            self.saved_sequences.remove(index);
        }
    }

    // ── Frame selection ─────────────────────────────────────────────

    /// Toggle a frame in or out of the selection set.
    ///
    /// Selection is by URL value; the same frame appearing in several
    /// sequences is one selection entry.
    pub fn toggle_selection(&mut self, frame_url: &str) {
        if !self.selected.remove(frame_url) {
            self.selected.insert(frame_url.to_string());
        }
    }

    pub fn is_selected(&self, frame_url: &str) -> bool {
        self.selected.contains(frame_url)
    }

    pub fn selected_frames(&self) -> &HashSet<String> {
        &self.selected
    }

    // ── Video popup ─────────────────────────────────────────────────

    /// Open the video generation dialog for a frame.
    pub fn open_video_popup(&mut self, frame_url: impl Into<String>) {
        self.video_popup = Some(frame_url.into());
    }

    /// Close the dialog without generating.
    pub fn close_video_popup(&mut self) {
        self.video_popup = None;
    }

    /// The frame the dialog is open for, if any.
    pub fn video_popup_target(&self) -> Option<&str> {
        self.video_popup.as_deref()
    }

    /// Store a generated video URL and close the dialog.
    pub fn record_video(&mut self, video_url: impl Into<String>) {
        self.generated_video = Some(video_url.into());
        self.video_popup = None;
    }

    /// Record a failed video generation, keeping the dialog open so the
    /// user can retry with a different prompt.
    pub fn fail_video(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn generated_video(&self) -> Option<&str> {
        self.generated_video.as_deref()
    }
}
