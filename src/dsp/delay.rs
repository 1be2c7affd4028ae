/*
Fractional Delay Line
=====================

A delay line remembers the last N samples in a circular buffer and lets you
read any of them back. Delay times that fall between two stored samples are
read with linear interpolation, which is what makes smoothly modulated delays
(chorus, flanger) possible without zipper noise.

    write ──→ [ s0 | s1 | s2 | s3 | ... | sN ] ──→ read(delay)
                           ↑ write_pos wraps around

The buffer is allocated once, at construction, for the maximum delay time.
Nothing after that allocates, so the line is safe to run on the audio thread.

Read After Write
----------------

The contract is `write(sample)` first, then `read_interpolated(delay)`:

    delay = 0 samples    → the sample just written
    delay = 1 sample     → the one before it
    delay = 2.5 samples  → halfway between the 2nd and 3rd most recent

Delay times outside [0, max_delay] are clamped, never rejected.
*/

pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    sample_rate: f32,
    max_delay_seconds: f32,
    delay_seconds: f32,
}

impl DelayLine {
    /// Allocate a delay line able to hold `max_delay_seconds` of audio.
    pub fn new(max_delay_seconds: f32, sample_rate: f32) -> Self {
        let max_delay_seconds = max_delay_seconds.max(0.0);
        // Two guard slots so the maximum delay can still interpolate.
        let capacity = (max_delay_seconds * sample_rate).ceil() as usize + 2;

        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            sample_rate,
            max_delay_seconds,
            delay_seconds: 0.0,
        }
    }

    /// Push one sample into the line.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Read a past sample `delay_seconds` behind the most recent write.
    #[inline]
    pub fn read_interpolated(&self, delay_seconds: f32) -> f32 {
        let delay_seconds = delay_seconds.clamp(0.0, self.max_delay_seconds);
        self.read_samples(delay_seconds * self.sample_rate)
    }

    /// Same as [`read_interpolated`](Self::read_interpolated) with the delay
    /// given in (fractional) samples.
    #[inline]
    pub fn read_samples(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(0.0, (len - 2) as f32);

        let whole = delay_samples.floor();
        let frac = delay_samples - whole;
        let whole = whole as usize;

        // Most recent sample sits just behind write_pos.
        let newest = self.write_pos + len - 1;
        let a = self.buffer[(newest - whole) % len];
        let b = self.buffer[(newest - whole - 1 + len) % len];

        a + (b - a) * frac
    }

    /// Set the stored delay time used by [`read`](Self::read).
    pub fn set_delay(&mut self, delay_seconds: f32) {
        self.delay_seconds = delay_seconds.clamp(0.0, self.max_delay_seconds);
    }

    pub fn delay(&self) -> f32 {
        self.delay_seconds
    }

    pub fn max_delay(&self) -> f32 {
        self.max_delay_seconds
    }

    /// Read at the stored delay time.
    #[inline]
    pub fn read(&self) -> f32 {
        self.read_interpolated(self.delay_seconds)
    }

    /// Write then read at the stored delay time.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.write(sample);
        self.read()
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
