// Purpose: per-particle voices, the voice pool and its render half
// The control side writes parameter slots; the renderer reads them once per block

pub mod params;
pub mod pitch;
pub mod pool;
pub mod renderer;
pub mod voice;

pub use params::{AmpSource, Mode, SharedParams, VoiceParams};
pub use pitch::Shade;
pub use pool::VoicePool;
pub use renderer::PoolRenderer;
pub use voice::{RenderVoice, Voice};
