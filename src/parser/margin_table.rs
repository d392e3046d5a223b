//! Build rank/lane margin tables from one CPU segment.
//!
//! Layout inside a segment:
//!
//! ```text
//! Rank Margin
//!            RxDqs- RxDqs+ RxV- RxV+ ...      <- variable header
//! N0.C00.D0.R0  -12  13  -40  42 ...          <- rows (prefix N{cpu})
//! IoLevel ...                                 <- end of rows
//! Lane Margin
//! N0.C00.D0.R0.L00:  -11  12 ...
//! IoLevel ...
//! CA Lane Margin
//! ```

use super::schema::{Cpu, CpuMargins, MarginKind, MarginRow, MarginTable, MarginType, VariableList};
use crate::utils::config::{
    CA_LANE_MARGIN_MARKER, IO_LEVEL_MARKER, LANE_MARGIN_MARKER, RANK_MARGIN_MARKER,
    VARIABLE_HEADER_MARKER,
};
use crate::utils::error::ParseError;
use log::debug;

/// Parse both margin tables of a CPU segment
///
/// **Public** - main entry point for table building
///
/// # Arguments
/// * `segment` - Text produced by the segmenter for `cpu`
/// * `cpu` - CPU the segment belongs to (selects the `N{cpu}` row prefix)
///
/// # Errors
/// * `ParseError::MissingMarker` - A section marker, the variable header,
///   the first row or the closing `IoLevel` line is absent
/// * `ParseError::MalformedRow` - A row does not have one value per variable
pub fn build_cpu_margins(segment: &str, cpu: Cpu) -> Result<CpuMargins, ParseError> {
    let sections = locate_sections(segment, cpu)?;

    let rank_block = &segment[sections.rank..sections.lane];
    let lane_block = &segment[sections.lane..sections.ca_lane];

    let variables = extract_variables(rank_block, cpu)?;
    debug!("{}: {} variables: {:?}", cpu, variables.len(), variables.names());

    let rank = extract_table(
        segment,
        sections.rank,
        rank_block,
        MarginKind::new(cpu, MarginType::Rank),
        &variables,
    )?;
    let lane = extract_table(
        segment,
        sections.lane,
        lane_block,
        MarginKind::new(cpu, MarginType::Lane),
        &variables,
    )?;

    debug!("{}: {} rank rows, {} lane rows", cpu, rank.len(), lane.len());

    Ok(CpuMargins {
        cpu,
        variables,
        rank,
        lane,
    })
}

/// Byte offsets of the three section markers
struct Sections {
    rank: usize,
    lane: usize,
    ca_lane: usize,
}

fn missing(cpu: Cpu, marker: &str) -> ParseError {
    ParseError::MissingMarker {
        cpu: cpu.index(),
        marker: marker.to_string(),
    }
}

fn locate_sections(segment: &str, cpu: Cpu) -> Result<Sections, ParseError> {
    let rank = segment
        .find(RANK_MARGIN_MARKER)
        .ok_or_else(|| missing(cpu, RANK_MARGIN_MARKER))?;

    let lane = segment[rank..]
        .find(LANE_MARGIN_MARKER)
        .map(|offset| rank + offset)
        .ok_or_else(|| missing(cpu, LANE_MARGIN_MARKER))?;

    // The first "Lane Margin" being the tail of "CA Lane Margin" means the
    // lane section itself is absent.
    let ca_prefix_len = CA_LANE_MARGIN_MARKER.len() - LANE_MARGIN_MARKER.len();
    if lane >= ca_prefix_len && segment[lane - ca_prefix_len..].starts_with(CA_LANE_MARGIN_MARKER) {
        return Err(missing(cpu, LANE_MARGIN_MARKER));
    }

    let search_from = lane + LANE_MARGIN_MARKER.len();
    let ca_lane = segment[search_from..]
        .find(CA_LANE_MARGIN_MARKER)
        .map(|offset| search_from + offset)
        .ok_or_else(|| missing(cpu, CA_LANE_MARGIN_MARKER))?;

    Ok(Sections {
        rank,
        lane,
        ca_lane,
    })
}

/// Column names: tokens from `RxDqs-` up to the first `N{cpu}` row
fn extract_variables(rank_block: &str, cpu: Cpu) -> Result<VariableList, ParseError> {
    let header_start = rank_block
        .find(VARIABLE_HEADER_MARKER)
        .ok_or_else(|| missing(cpu, VARIABLE_HEADER_MARKER))?;

    let header = &rank_block[header_start..];
    let row_marker = format!("\n{}", cpu.row_prefix());
    let header_end = header
        .find(&row_marker)
        .ok_or_else(|| missing(cpu, &cpu.row_prefix()))?;

    let names = header[..header_end]
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(VariableList::new(names))
}

/// Tokenize the rows of one block
///
/// Rows run from the first line starting with `N{cpu}` to the last line
/// starting with `IoLevel` (exclusive). Blank lines are skipped.
fn extract_table(
    segment: &str,
    block_offset: usize,
    block: &str,
    kind: MarginKind,
    variables: &VariableList,
) -> Result<MarginTable, ParseError> {
    let cpu = kind.cpu;
    let prefix = cpu.row_prefix();
    let lines: Vec<&str> = block.lines().collect();

    let first = lines
        .iter()
        .position(|line| line.trim_start().starts_with(&prefix))
        .ok_or_else(|| missing(cpu, &prefix))?;

    let end = lines
        .iter()
        .rposition(|line| line.trim_start().starts_with(IO_LEVEL_MARKER))
        .filter(|&end| end > first)
        .ok_or_else(|| missing(cpu, IO_LEVEL_MARKER))?;

    // 1-based line number of the block's first line within the segment
    let base_line = segment[..block_offset].matches('\n').count() + 1;
    let expected = variables.row_width();

    let mut rows = Vec::with_capacity(end - first);
    for (index, line) in lines.iter().enumerate().take(end).skip(first) {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            continue;
        }

        if tokens.len() != expected {
            return Err(ParseError::MalformedRow {
                cpu: cpu.index(),
                table: kind.margin_type.to_string(),
                line: base_line + index,
                expected,
                found: tokens.len(),
            });
        }

        if let Some(row) = MarginRow::from_tokens(tokens) {
            rows.push(row);
        }
    }

    Ok(MarginTable { kind, rows })
}
