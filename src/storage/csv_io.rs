//! CSV encoding of group standings.
//!
//! Exports carry the derived columns in ranked order. Imports only need the
//! raw counters; derived columns in an imported file are ignored because they
//! are always recomputed on read.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{StorageConfig, StorageError};
use crate::calculate::derive_ranked;
use crate::error::LeagueError;
use crate::models::TeamRecord;
use crate::store::Store;

/// Columns an import must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Team", "Matches", "Wins", "Losses", "RoundsWon"];

/// Columns written by an export.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "Team",
    "Matches",
    "Wins",
    "Losses",
    "RoundsWon",
    "PD",
    "PDT",
    "Total",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render teams as a ranked CSV table.
pub fn export_teams_csv(teams: &[TeamRecord]) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;

    for row in derive_ranked(teams) {
        writer.write_record([
            row.team,
            row.matches_played.to_string(),
            row.wins.to_string(),
            row.losses.to_string(),
            row.rounds_won.to_string(),
            row.pd.to_string(),
            row.pdt.to_string(),
            row.total.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| StorageError::Io(e.into_error()))
}

/// Render a group's ranked standings as CSV.
pub fn export_group_csv(store: &Store, group_name: &str) -> Result<Vec<u8>, StorageError> {
    let group = store.require_group(group_name)?;
    export_teams_csv(&group.teams)
}

/// Parse a CSV team table.
///
/// Every data row becomes one team, in file order. Missing or unparseable
/// counters become 0 and a blank team cell becomes an empty name.
pub fn parse_teams_csv(bytes: &[u8]) -> Result<Vec<TeamRecord>, LeagueError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| LeagueError::MalformedCsv(e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(LeagueError::MalformedCsv("no header row".to_string()));
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|&c| column(c).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(LeagueError::MissingColumns(missing));
    }

    // All required columns are present past this point.
    let [team_col, matches_col, wins_col, losses_col, rounds_col] =
        REQUIRED_COLUMNS.map(|c| column(c).unwrap_or_default());

    let mut teams = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LeagueError::MalformedCsv(e.to_string()))?;
        // Line 1 is the header.
        let line = i + 2;

        if record.len() > headers.len() {
            return Err(LeagueError::MalformedCsv(format!(
                "line {}: expected {} fields, found {}",
                line,
                headers.len(),
                record.len()
            )));
        }

        let name = record.get(team_col).unwrap_or_default();
        if name.is_empty() {
            warn!("CSV line {} has a blank team name", line);
        }

        let counter = |idx: usize| parse_counter(record.get(idx).unwrap_or_default());
        teams.push(TeamRecord::new(name).with_counters(
            counter(matches_col),
            counter(wins_col),
            counter(losses_col),
            counter(rounds_col),
        ));
    }

    Ok(teams)
}

/// Replace a group's teams with the contents of a CSV file.
///
/// Returns the number of imported teams. On any error the group is left as
/// it was.
pub fn import_group_csv(
    store: &mut Store,
    group_name: &str,
    bytes: &[u8],
) -> Result<usize, LeagueError> {
    let teams = parse_teams_csv(bytes)?;
    let count = teams.len();
    store.replace_teams(group_name, teams)?;
    info!("Imported {} teams into '{}'", count, group_name);
    Ok(count)
}

/// Lenient counter parsing: integers, integral floats ("3.0"), else 0.
fn parse_counter(cell: &str) -> u32 {
    if let Ok(v) = cell.parse::<u32>() {
        return v;
    }
    match cell.parse::<f64>() {
        Ok(v) if (0.0..=f64::from(u32::MAX)).contains(&v) => v.trunc() as u32,
        _ => 0,
    }
}

/// Download file name for a group export, e.g. `Group_A_points.csv`.
pub fn export_file_name(group_name: &str) -> String {
    format!("{}_points.csv", group_name.replace(' ', "_"))
}

/// Write a group export under the exports directory.
pub fn write_group_export(
    config: &StorageConfig,
    store: &Store,
    group_name: &str,
) -> Result<PathBuf, StorageError> {
    let bytes = export_group_csv(store, group_name)?;
    let dir = config.exports_dir();
    fs::create_dir_all(&dir)?;

    let path = dir.join(export_file_name(group_name));
    fs::write(&path, bytes)?;
    info!("Exported '{}' to {:?}", group_name, path);
    Ok(path)
}

/// Read a team table from a CSV file.
pub fn read_teams_file(path: &Path) -> Result<Vec<TeamRecord>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(parse_teams_csv(&bytes)?)
}

/// Write teams to a CSV file in export format.
pub fn write_teams_file(path: &Path, teams: &[TeamRecord]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, export_teams_csv(teams)?)?;
    info!("Wrote {} teams to {:?}", teams.len(), path);
    Ok(())
}
