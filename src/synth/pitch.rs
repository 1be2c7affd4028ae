/*
Color → Pitch
=============

Each particle carries a color value. The active shade decides which slice of
the color wheel particles are drawn from and which scale that slice is mapped
onto:

    shade   color range    scale           pitch classes
    red     [216, 360]     diatonic        0 2 4 5 7 9 11
    blue    [150, 270]     pentatonic      0 2 4 7 9
    green   [30, 215]      whole tone      0 2 4 6 8 10

The color range is cut into N equal bins, one per pitch class:

    index = floor((color - min) × (N - 0.01) / (max - min))

The 0.01 keeps color == max inside the last bin instead of one past it. The
result is clamped to [0, N-1] anyway, so colors from outside the range (a
shade change races a particle update) still land on a real note.

The pitch class is added to the root note (MIDI 36..=47, one random octave
of C2..B2) and converted with 12-TET, A4 = 440 Hz:

    f = 440 × 2^((midi - 69) / 12)

Finally the oscillator plays a random harmonic k ∈ 1..=10 of that pitch at
amplitude 1/k, so high partials are quiet.
*/

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ROOT_NOTE_MIN: u8 = 36;
pub const ROOT_NOTE_MAX: u8 = 47;
pub const MAX_HARMONIC: u32 = 10;

const DIATONIC: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const PENTATONIC: [u8; 5] = [0, 2, 4, 7, 9];
const WHOLE_TONE: [u8; 6] = [0, 2, 4, 6, 8, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shade {
    #[default]
    Red,
    Green,
    Blue,
}

impl Shade {
    /// Inclusive color range `(min, max)` this shade draws from.
    pub fn color_range(self) -> (f32, f32) {
        match self {
            Shade::Red => (216.0, 360.0),
            Shade::Blue => (150.0, 270.0),
            Shade::Green => (30.0, 215.0),
        }
    }

    /// Pitch classes (semitones above the root).
    pub fn scale(self) -> &'static [u8] {
        match self {
            Shade::Red => &DIATONIC,
            Shade::Blue => &PENTATONIC,
            Shade::Green => &WHOLE_TONE,
        }
    }

    /// Map a hue in `[0, 1]` onto this shade's color range.
    pub fn color_from_hue(self, hue: f32) -> f32 {
        let (min, max) = self.color_range();
        min + hue.clamp(0.0, 1.0) * (max - min)
    }

    /// Bin index of `color` in this shade's scale, always a valid index.
    pub fn scale_index(self, color: f32) -> usize {
        let (min, max) = self.color_range();
        let n = self.scale().len();

        let raw = ((color - min) * (n as f32 - 0.01) / (max - min)).floor();
        if raw.is_nan() || raw < 0.0 {
            0
        } else {
            (raw as usize).min(n - 1)
        }
    }

    pub fn pitch_class(self, color: f32) -> u8 {
        self.scale()[self.scale_index(color)]
    }

    pub fn name(self) -> &'static str {
        match self {
            Shade::Red => "red",
            Shade::Green => "green",
            Shade::Blue => "blue",
        }
    }
}

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Uniform root note in `[ROOT_NOTE_MIN, ROOT_NOTE_MAX]`.
pub fn random_root<R: Rng>(rng: &mut R) -> u8 {
    rng.gen_range(ROOT_NOTE_MIN..=ROOT_NOTE_MAX)
}

/// Uniform harmonic number in `1..=MAX_HARMONIC`.
pub fn random_harmonic<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(1..=MAX_HARMONIC)
}

/// Oscillator frequency and amplitude for one voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch {
    pub frequency: f32,
    pub amplitude: f32,
}

impl Pitch {
    pub fn new(color: f32, shade: Shade, root: u8, harmonic: u32) -> Self {
        let harmonic = harmonic.max(1);
        let note = root.saturating_add(shade.pitch_class(color));
        Self {
            frequency: midi_note_to_freq(note) * harmonic as f32,
            amplitude: 1.0 / harmonic as f32,
        }
    }
}
