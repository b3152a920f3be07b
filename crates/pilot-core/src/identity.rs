//! Run identity
//!
//! Every run gets a unique run number and an output area derived from the
//! experiment, the model and that run number.

use chrono::{DateTime, Local};
use pilot_fs::NormalizedPath;

/// Timestamp suffix appended to every run number.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%6f";

/// Names and places fixed for a run at configure time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    pub experiment_name: String,
    pub run_number: String,
    pub output_area: NormalizedPath,
    pub working_area: NormalizedPath,
}

/// Build the run number for a run started at `started`.
///
/// A supplied name is kept and the timestamp is appended to it, so two
/// runs never share a number.
pub fn run_number(supplied: Option<&str>, started: DateTime<Local>) -> String {
    let stamp = started.format(RUN_TIMESTAMP_FORMAT);
    match supplied.filter(|s| !s.is_empty()) {
        Some(name) => format!("{name}_{stamp}"),
        None => stamp.to_string(),
    }
}

/// `<runs_root>/<experiment>/<model>/<run_number>`, skipping empty parts.
pub fn default_output_area(
    runs_root: &NormalizedPath,
    experiment: &str,
    model: Option<&str>,
    run_number: &str,
) -> NormalizedPath {
    let mut area = runs_root.clone();
    for part in [Some(experiment), model].into_iter().flatten() {
        let part = slug(part);
        if !part.is_empty() {
            area = area.join(part);
        }
    }
    area.join(run_number)
}

fn slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn started() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 5, 14, 7, 9)
            .single()
            .unwrap()
    }

    #[test]
    fn run_number_is_a_timestamp() {
        assert_eq!(run_number(None, started()), "20240305_140709000000");
        assert_eq!(run_number(Some(""), started()), "20240305_140709000000");
    }

    #[test]
    fn supplied_run_number_keeps_timestamp() {
        assert_eq!(
            run_number(Some("baseline"), started()),
            "baseline_20240305_140709000000"
        );
    }

    #[test]
    fn output_area_is_composed_from_parts() {
        let area = default_output_area(
            &NormalizedPath::new("runs"),
            "Calo Challenge",
            Some("vae"),
            "r1",
        );
        assert_eq!(area.as_str(), "runs/calo_challenge/vae/r1");
    }

    #[test]
    fn empty_parts_are_skipped() {
        let area = default_output_area(&NormalizedPath::new("/tmp/runs"), "", None, "r1");
        assert_eq!(area.as_str(), "/tmp/runs/r1");
    }
}
