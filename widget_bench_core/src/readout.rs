//! Live performance readout: projects a published sample into the overlay
//! label text.

use crate::toolkit::PerfSample;

/// Two-line summary shown in the title overlay: frame rate and CPU load,
/// then the refresh-time breakdown.
pub fn format_sample(sample: &PerfSample) -> String {
    format!(
        "{} FPS, {}% CPU\nrefr. {} ms = {} ms render + {} ms flush",
        sample.fps,
        sample.cpu_percent,
        sample.render_time_ms + sample.flush_time_ms,
        sample.render_time_ms,
        sample.flush_time_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_both_lines() {
        let sample = PerfSample {
            fps: 58,
            cpu_percent: 42,
            render_time_ms: 9,
            flush_time_ms: 3,
        };
        assert_eq!(
            format_sample(&sample),
            "58 FPS, 42% CPU\nrefr. 12 ms = 9 ms render + 3 ms flush"
        );
    }
}
