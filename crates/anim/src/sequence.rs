use glint_common::TexRegion;
use serde::{Deserialize, Serialize};

/// What happens when accumulated time runs past the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Hold on the last frame; the sequence can finish.
    Once,
    /// Wrap around forever; the sequence never finishes.
    Loop,
}

/// An immutable animation sequence: frames at a fixed per-frame duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    frames: Vec<TexRegion>,
    frame_duration: f32,
    mode: PlayMode,
}

impl Animation {
    pub fn new(frames: Vec<TexRegion>, frame_duration: f32, mode: PlayMode) -> Self {
        assert!(!frames.is_empty(), "animation needs at least one frame");
        assert!(frame_duration > 0.0, "frame_duration must be positive");
        Self {
            frames,
            frame_duration,
            mode,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Total duration of one pass over the sequence.
    pub fn duration(&self) -> f32 {
        self.frame_duration * self.frames.len() as f32
    }

    /// Frame index for the given accumulated time (0-based).
    pub fn frame_index(&self, time: f32) -> usize {
        let raw = (time.max(0.0) / self.frame_duration) as usize;
        match self.mode {
            PlayMode::Once => raw.min(self.frames.len() - 1),
            PlayMode::Loop => raw % self.frames.len(),
        }
    }

    /// Texture region for the given accumulated time.
    pub fn frame_at(&self, time: f32) -> TexRegion {
        self.frames[self.frame_index(time)]
    }

    /// First frame of the sequence.
    pub fn first_frame(&self) -> TexRegion {
        self.frames[0]
    }

    /// Whether the sequence has run out at the given accumulated time.
    /// Looping sequences never finish.
    pub fn is_finished(&self, time: f32) -> bool {
        match self.mode {
            PlayMode::Once => time >= self.duration(),
            PlayMode::Loop => false,
        }
    }
}

/// Mutable playback state for one animation instance.
///
/// States: Playing and Paused. `advance` only moves the accumulator while
/// playing; `reset` pauses and rewinds to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playhead {
    time: f32,
    playing: bool,
}

impl Playhead {
    /// A playhead at time zero, already playing.
    pub fn new() -> Self {
        Self {
            time: 0.0,
            playing: true,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Jump the accumulator to an absolute time.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze the accumulator in place.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pause and rewind to time zero.
    pub fn reset(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    /// Advance by a delta. Returns true when the accumulator moved.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.playing {
            return false;
        }
        self.time += delta;
        true
    }
}

impl Default for Playhead {
    fn default() -> Self {
        Self::new()
    }
}
