use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::models::StudentRecord;
use crate::sanitize::{sanitize_float, sanitize_int};

pub const ROLL_COLUMN: &str = "Roll Number";
pub const CGPA_COLUMN: &str = "CGPA";
pub const BACKLOG_COLUMN: &str = "Total Backlogs";
pub const LEETCODE_COLUMN: &str = "Leet code links";
pub const HACKERRANK_COLUMN: &str = "Hackerrank profile link";

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("student data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("error reading student data from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error loading student data: {0}")]
    Malformed(#[from] csv::Error),

    #[error("student data is missing the '{0}' column")]
    MissingColumn(&'static str),
}

#[derive(Deserialize)]
struct RosterRow {
    #[serde(rename = "Roll Number")]
    roll_number: String,
    #[serde(rename = "CGPA")]
    cgpa: Option<String>,
    #[serde(rename = "Total Backlogs")]
    backlogs: Option<String>,
    #[serde(rename = "Leet code links", default)]
    leetcode_url: Option<String>,
    #[serde(rename = "Hackerrank profile link", default)]
    hackerrank_url: Option<String>,
}

/// Immutable snapshot of the student table.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    columns: Vec<String>,
    records: Vec<StudentRecord>,
}

impl Roster {
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let file = std::fs::File::open(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => RosterError::NotFound(path.to_path_buf()),
            _ => RosterError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self, RosterError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(RosterError::MissingColumn(name))
        };
        let roll_idx = column(ROLL_COLUMN)?;
        let cgpa_idx = column(CGPA_COLUMN)?;
        let backlog_idx = column(BACKLOG_COLUMN)?;
        for link in [LEETCODE_COLUMN, HACKERRANK_COLUMN] {
            if column(link).is_err() {
                tracing::warn!(column = link, "roster has no link column, lookups will be skipped");
            }
        }

        let mut records = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let raw = result?;
            let row: RosterRow = raw.deserialize(Some(&headers))?;

            let roll_number = row.roll_number.trim().to_string();
            if roll_number.is_empty() {
                tracing::warn!(row = line + 1, "skipping roster row without a roll number");
                continue;
            }

            let cgpa = parse_cgpa(row.cgpa.as_deref());
            let backlog_count =
                u32::try_from(sanitize_int(row.backlogs.as_deref())).unwrap_or(0);

            let mut source_fields: Vec<String> = raw.iter().map(String::from).collect();
            source_fields[roll_idx] = roll_number.clone();
            source_fields[cgpa_idx] = cgpa.map(|v| format!("{v:?}")).unwrap_or_default();
            source_fields[backlog_idx] = backlog_count.to_string();

            records.push(StudentRecord {
                roll_number,
                cgpa,
                backlog_count,
                leetcode_url: non_blank(row.leetcode_url),
                hackerrank_url: non_blank(row.hackerrank_url),
                source_fields,
            });
        }

        Ok(Self {
            columns: headers.iter().map(String::from).collect(),
            records,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_records(columns: Vec<String>, records: Vec<StudentRecord>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-insensitive exact match on the roll number.
    pub fn find_by_roll(&self, roll: &str) -> Option<&StudentRecord> {
        let roll = roll.trim();
        self.records
            .iter()
            .find(|r| r.roll_number.eq_ignore_ascii_case(roll))
    }
}

/// Blank, non-numeric and `NaN` text coerce to 0; infinities are dropped by
/// the sanitizer.
fn parse_cgpa(value: Option<&str>) -> Option<f64> {
    let parsed = value
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0);
    sanitize_float(Some(parsed))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads the roster on first use and hands out the cached snapshot.
///
/// A failed load is not cached, so the next caller retries the file.
#[derive(Debug)]
pub struct RosterSource {
    path: PathBuf,
    cached: OnceCell<Arc<Roster>>,
}

impl RosterSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn preloaded(roster: Roster) -> Self {
        Self {
            path: PathBuf::new(),
            cached: OnceCell::from(Arc::new(roster)),
        }
    }

    pub async fn snapshot(&self) -> Result<Arc<Roster>, RosterError> {
        let roster = self
            .cached
            .get_or_try_init(|| async {
                let roster = Roster::load(&self.path)?;
                tracing::info!(
                    path = %self.path.display(),
                    students = roster.len(),
                    "roster loaded"
                );
                Ok::<_, RosterError>(Arc::new(roster))
            })
            .await?;
        Ok(Arc::clone(roster))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const SAMPLE_CSV: &str = "\
 Roll Number , CGPA,Total Backlogs , Leet code links ,Hackerrank profile link
DS101,8.5,0,https://leetcode.com/alice,
DS102,abc,2.0,,https://www.hackerrank.com/bob
DS103,NaN,x,https://leetcode.com/profile,https://www.hackerrank.com/carol/
";

    pub(crate) fn sample_roster() -> Roster {
        Roster::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn trims_column_names() {
        let roster = sample_roster();
        assert_eq!(
            roster.columns(),
            &[
                ROLL_COLUMN,
                CGPA_COLUMN,
                BACKLOG_COLUMN,
                LEETCODE_COLUMN,
                HACKERRANK_COLUMN
            ]
        );
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn coerces_numeric_columns() {
        let roster = sample_roster();
        let all = roster.all();

        assert_eq!(all[0].cgpa, Some(8.5));
        assert_eq!(all[0].backlog_count, 0);

        assert_eq!(all[1].cgpa, Some(0.0));
        assert_eq!(all[1].backlog_count, 2);
        assert_eq!(all[1].source_fields[1], "0.0");
        assert_eq!(all[1].source_fields[2], "2");

        assert_eq!(all[2].cgpa, Some(0.0));
        assert_eq!(all[2].source_fields[1], "0.0");
        assert_eq!(all[2].backlog_count, 0);
    }

    #[test]
    fn invalid_cgpa_cells_share_one_default() {
        let csv = "Roll Number,CGPA,Total Backlogs\nA1,NaN,0\nA2,,0\nA3,n/a,0\nA4,inf,0\nA5,9,0\n";
        let roster = Roster::from_reader(csv.as_bytes()).unwrap();
        let cgpas: Vec<_> = roster.all().iter().map(|r| r.cgpa).collect();
        assert_eq!(
            cgpas,
            vec![Some(0.0), Some(0.0), Some(0.0), None, Some(9.0)]
        );

        let cells: Vec<_> = roster
            .all()
            .iter()
            .map(|r| r.source_fields[1].as_str())
            .collect();
        assert_eq!(cells, vec!["0.0", "0.0", "0.0", "", "9.0"]);
    }

    #[test]
    fn blank_links_become_none() {
        let roster = sample_roster();
        assert_eq!(roster.all()[0].hackerrank_url, None);
        assert_eq!(roster.all()[1].leetcode_url, None);
        assert_eq!(
            roster.all()[1].hackerrank_url.as_deref(),
            Some("https://www.hackerrank.com/bob")
        );
    }

    #[test]
    fn finds_roll_case_insensitively() {
        let roster = sample_roster();
        let found = roster.find_by_roll("ds101").unwrap();
        assert_eq!(found.roll_number, "DS101");
        assert!(roster.find_by_roll(" Ds102 ").is_some());
        assert!(roster.find_by_roll("DS999").is_none());
    }

    #[test]
    fn skips_rows_without_roll_number() {
        let csv = "Roll Number,CGPA,Total Backlogs\n,9.0,0\nDS200,7.0,1\n";
        let roster = Roster::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.all()[0].roll_number, "DS200");
    }

    #[test]
    fn header_only_file_is_empty() {
        let csv = "Roll Number,CGPA,Total Backlogs\n";
        let roster = Roster::from_reader(csv.as_bytes()).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Roll Number,Total Backlogs\nDS1,0\n";
        let err = Roster::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::MissingColumn(CGPA_COLUMN)));
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let csv = "Roll Number,CGPA,Total Backlogs\nDS1,9.0\n";
        let err = Roster::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RosterError::Malformed(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Roster::load(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));
    }

    #[tokio::test]
    async fn source_caches_after_first_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let source = RosterSource::from_path(file.path());
        let first = source.snapshot().await.unwrap();
        let second = source.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);
    }

    #[tokio::test]
    async fn source_retries_after_failed_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        let source = RosterSource::from_path(&path);

        assert!(matches!(
            source.snapshot().await,
            Err(RosterError::NotFound(_))
        ));

        std::fs::write(&path, SAMPLE_CSV).unwrap();
        assert_eq!(source.snapshot().await.unwrap().len(), 3);
    }
}
