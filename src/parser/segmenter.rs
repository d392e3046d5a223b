//! Split a raw log into per-CPU margin segments.
//!
//! A CPU's segment is every line strictly between a line containing
//! `START_RMT_N{c}` and the next line containing `STOP_RMT_N{c}`. Marker
//! lines are never part of a segment. A repeated start marker keeps the
//! current recording open; a second start/stop pair appends to the same
//! segment.

use super::schema::Cpu;
use crate::utils::config::{START_MARKER_PREFIX, STOP_MARKER_PREFIX};
use log::debug;

/// Margin text of both CPUs of one log file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuSegments {
    cpu0: String,
    cpu1: String,
    /// Start marker seen, indexed by CPU
    started: [bool; 2],
}

impl CpuSegments {
    /// Whether the CPU's start marker appeared anywhere in the log
    pub fn has_start(&self, cpu: Cpu) -> bool {
        self.started[usize::from(cpu.index())]
    }

    pub fn get(&self, cpu: Cpu) -> &str {
        match cpu {
            Cpu::Cpu0 => &self.cpu0,
            Cpu::Cpu1 => &self.cpu1,
        }
    }

    fn get_mut(&mut self, cpu: Cpu) -> &mut String {
        match cpu {
            Cpu::Cpu0 => &mut self.cpu0,
            Cpu::Cpu1 => &mut self.cpu1,
        }
    }
}

/// Tracks whether lines are currently being recorded for one CPU
struct Recorder {
    start: String,
    stop: String,
    recording: bool,
    seen_start: bool,
}

impl Recorder {
    fn new(cpu: Cpu) -> Self {
        Self {
            start: format!("{}{}", START_MARKER_PREFIX, cpu.index()),
            stop: format!("{}{}", STOP_MARKER_PREFIX, cpu.index()),
            recording: false,
            seen_start: false,
        }
    }

    /// Returns true when `line` belongs to the segment
    fn accept(&mut self, line: &str) -> bool {
        let is_start = line.contains(&self.start);
        let is_stop = line.contains(&self.stop);

        if is_start {
            self.recording = true;
            self.seen_start = true;
        }
        if is_stop {
            self.recording = false;
        }

        self.recording && !is_start && !is_stop
    }
}

/// Segment a sequence of lines
///
/// **Public** - main entry point for segmentation
///
/// Lines are appended verbatim, so callers that want line terminators in the
/// segment must keep them on the lines they pass in.
pub fn segment_lines<'a, I>(lines: I) -> CpuSegments
where
    I: IntoIterator<Item = &'a str>,
{
    let mut segments = CpuSegments::default();
    let mut recorders = Cpu::ALL.map(|cpu| (cpu, Recorder::new(cpu)));

    for line in lines {
        for (cpu, recorder) in recorders.iter_mut() {
            if recorder.accept(line) {
                segments.get_mut(*cpu).push_str(line);
            }
        }
    }

    for (cpu, recorder) in &recorders {
        segments.started[usize::from(cpu.index())] = recorder.seen_start;
    }

    debug!(
        "Segmented log: CPU0 {} bytes, CPU1 {} bytes",
        segments.cpu0.len(),
        segments.cpu1.len()
    );

    segments
}

/// Segment a whole log text, keeping each line's terminator
pub fn segment_text(text: &str) -> CpuSegments {
    segment_lines(text.split_inclusive('\n'))
}
