//! Synthetic RMT log helpers shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const VARIABLES: [&str; 4] = ["RxDqs-", "RxDqs+", "RxV-", "RxV+"];
pub const RANKS: usize = 2;
pub const LANES: usize = 4;

fn header() -> String {
    format!("                  {}", VARIABLES.join("  "))
}

/// One CPU section; every value is shifted by `offset`
pub fn cpu_section(cpu: u8, offset: i32) -> Vec<String> {
    let mut lines = vec![
        format!("START_RMT_N{}", cpu),
        "Rank Margin".to_string(),
        header(),
    ];
    for rank in 0..RANKS as i32 {
        lines.push(format!(
            "N{}.C00.D0.R{}    {}  {}  {}  {}",
            cpu,
            rank,
            -(10 + rank + offset),
            11 + rank + offset,
            -(30 + rank),
            31
        ));
    }
    lines.push("IoLevel 0".to_string());
    lines.push("Lane Margin".to_string());
    lines.push(header());
    for rank in 0..RANKS as i32 {
        for lane in 0..LANES as i32 {
            lines.push(format!(
                "N{}.C00.D0.R{}.L{:02}:  {}  {}  {}  {}",
                cpu,
                rank,
                lane,
                -(10 + lane + offset),
                11 + lane + offset,
                -(30 + rank),
                31
            ));
        }
    }
    lines.push("IoLevel 0".to_string());
    lines.push("CA Lane Margin".to_string());
    lines.push(format!("N{}.C00 CA0 12", cpu));
    lines.push(format!("STOP_RMT_N{}", cpu));
    lines
}

/// A complete log holding both CPU sections
pub fn rmt_log(offset: i32) -> String {
    let mut lines = vec!["BIOS boot".to_string(), "Memory training done".to_string()];
    lines.extend(cpu_section(0, offset));
    lines.extend(cpu_section(1, offset));
    lines.push("RMT complete".to_string());
    lines.join("\n") + "\n"
}

/// Create a vendor folder under `root` holding one log per offset
pub fn write_vendor(root: &Path, folder: &str, offsets: &[i32]) -> PathBuf {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    for (i, offset) in offsets.iter().enumerate() {
        fs::write(dir.join(format!("rmt_{:02}.log", i)), rmt_log(*offset)).unwrap();
    }
    dir
}
