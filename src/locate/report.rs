//! Console report for match results.

use vicino::MatchResult;

/// One line per query point, in match order
pub fn report_lines(matches: &[MatchResult<'_>]) -> Vec<String> {
    matches.iter().map(report_line).collect()
}

fn report_line(m: &MatchResult<'_>) -> String {
    match m.matched() {
        Some((facility, distance_km)) => format!(
            "For {}: Nearest hospital is {} at a distance of {} km.",
            m.query.name, facility.name, distance_km
        ),
        None => format!("For {}: no hospital available to match.", m.query.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vicino::{match_all, Facility, GeoPoint, QueryPoint};

    #[test]
    fn test_report_lines() {
        let catalog = vec![Facility::new(1, "A", GeoPoint::new(41.9020, 12.5010).unwrap())];
        let queries = vec![QueryPoint::reference("Roma Termini", 41.9016577, 12.5007858).unwrap()];

        let lines = report_lines(&match_all(&queries, &catalog));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("For Roma Termini: Nearest hospital is A at a distance of 0.0"));

        let empty = report_lines(&match_all(&queries, &[]));
        assert_eq!(empty[0], "For Roma Termini: no hospital available to match.");
    }
}
