//! Visual benchmark suite for a widget toolkit.
//!
//! The suite cycles through a fixed catalog of rendering scenes — flat fills,
//! image blitting, rotation, text layout, alpha compositing, scrolling — on a
//! repeating timer, and mirrors the toolkit's performance samples into an
//! overlay readout. The toolkit itself is consumed through the
//! [`toolkit::Toolkit`] trait; [`headless::HeadlessToolkit`] is the
//! deterministic in-memory backend used by tests and the CLI.

pub mod headless;
pub mod readout;
pub mod scenes;
pub mod sequence;
pub mod session;
pub mod toolkit;

pub use headless::{DisplaySpec, HeadlessToolkit};
pub use sequence::SequenceGenerator;
pub use session::{BenchmarkSession, ExhaustedPolicy, SessionConfig};
pub use toolkit::{
    Animation, AnimationHandle, AnimationKind, Color, PerfSample, TimerHandle, Toolkit,
    ToolkitEvent, WidgetId,
};
