use crate::config::{MAX_ALERT_DAYS, MAX_CELLS};
use crate::models::Lookup;

/// Validation result with error message
pub type ValidationResult = Result<(), &'static str>;

/// Validate that a label is not empty
pub fn validate_label(label: &str) -> ValidationResult {
    if label.trim().is_empty() {
        return Err("Label cannot be empty");
    }
    Ok(())
}

fn collides(label: &str, existing: &[Lookup]) -> bool {
    let label = label.trim();
    existing
        .iter()
        .any(|l| !l.deleted && l.label.eq_ignore_ascii_case(label))
}

/// Validate a lookup label for creation
///
/// Returns Ok(()) if valid, or Err with a message explaining why it's invalid.
pub fn validate_new_lookup_label(label: &str, existing: &[Lookup]) -> ValidationResult {
    validate_label(label)?;
    if collides(label, existing) {
        return Err("Label already exists");
    }
    Ok(())
}

/// Validate a lookup label for update
///
/// Same as new lookup validation but allows the lookup to keep its existing label.
pub fn validate_update_lookup_label(
    label: &str,
    existing: &[Lookup],
    current_label: &str,
) -> ValidationResult {
    validate_label(label)?;
    if !label.trim().eq_ignore_ascii_case(current_label) && collides(label, existing) {
        return Err("Label already exists");
    }
    Ok(())
}

/// Parse and validate a cell count
pub fn parse_cells(input: &str) -> Result<u32, &'static str> {
    match input.trim().parse::<u32>() {
        Ok(cells) if (1..=MAX_CELLS).contains(&cells) => Ok(cells),
        Ok(_) => Err("Cell count must be between 1 and 24"),
        Err(_) => Err("Cell count must be a number"),
    }
}

/// Parse and validate a capacity in mAh
pub fn parse_capacity(input: &str) -> Result<u32, &'static str> {
    match input.trim().parse::<u32>() {
        Ok(0) => Err("Capacity must be greater than zero"),
        Ok(capacity) => Ok(capacity),
        Err(_) => Err("Capacity must be a number"),
    }
}

/// Parse space or comma separated per-cell readings, one per cell
pub fn parse_resistance(input: &str, cells: u32) -> Result<Vec<f64>, &'static str> {
    let readings = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| "Readings must be numbers"))
        .collect::<Result<Vec<f64>, _>>()?;

    if readings.iter().any(|r| !r.is_finite() || *r < 0.0) {
        return Err("Readings must be non-negative");
    }
    if readings.len() != cells as usize {
        return Err("Enter one reading per cell");
    }
    Ok(readings)
}

/// Validate the alert threshold in days
pub fn validate_alert_days(days: i64) -> ValidationResult {
    if days < 1 {
        return Err("Alert days must be at least 1");
    }
    if days > MAX_ALERT_DAYS {
        return Err("Alert days must be at most 3650");
    }
    Ok(())
}

/// Validate a "#RRGGBB" color
pub fn validate_color(color: &str) -> ValidationResult {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err("Color must look like #RRGGBB");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LookupId;

    fn make_lookups() -> Vec<Lookup> {
        vec![
            Lookup {
                id: LookupId::new(1),
                label: "Acme".to_string(),
                color: None,
                enabled: true,
                deleted: false,
            },
            Lookup {
                id: LookupId::new(2),
                label: "Retired".to_string(),
                color: None,
                enabled: true,
                deleted: true,
            },
        ]
    }

    #[test]
    fn test_validate_label_empty() {
        assert_eq!(validate_label(""), Err("Label cannot be empty"));
        assert_eq!(validate_label("  \t"), Err("Label cannot be empty"));
        assert_eq!(validate_label("Pack 1"), Ok(()));
    }

    #[test]
    fn test_validate_new_lookup_label_duplicate() {
        let lookups = make_lookups();
        assert_eq!(
            validate_new_lookup_label("acme", &lookups),
            Err("Label already exists")
        );
        assert_eq!(validate_new_lookup_label("Zeta", &lookups), Ok(()));
    }

    #[test]
    fn test_deleted_labels_can_be_reused() {
        let lookups = make_lookups();
        assert_eq!(validate_new_lookup_label("Retired", &lookups), Ok(()));
    }

    #[test]
    fn test_validate_update_lookup_label() {
        let lookups = make_lookups();
        assert_eq!(
            validate_update_lookup_label("Acme", &lookups, "Acme"),
            Ok(())
        );
        assert_eq!(
            validate_update_lookup_label("Acme", &lookups, "Other"),
            Err("Label already exists")
        );
    }

    #[test]
    fn test_parse_cells() {
        assert_eq!(parse_cells("4"), Ok(4));
        assert!(parse_cells("0").is_err());
        assert!(parse_cells("25").is_err());
        assert!(parse_cells("four").is_err());
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity(" 1500 "), Ok(1500));
        assert!(parse_capacity("0").is_err());
        assert!(parse_capacity("-5").is_err());
    }

    #[test]
    fn test_parse_resistance() {
        assert_eq!(parse_resistance("2.5, 3 3.5", 3), Ok(vec![2.5, 3.0, 3.5]));
        assert_eq!(
            parse_resistance("2.5 3", 3),
            Err("Enter one reading per cell")
        );
        assert_eq!(
            parse_resistance("2.5 -1 3", 3),
            Err("Readings must be non-negative")
        );
        assert_eq!(parse_resistance("x", 1), Err("Readings must be numbers"));
    }

    #[test]
    fn test_validate_alert_days() {
        assert!(validate_alert_days(0).is_err());
        assert_eq!(validate_alert_days(1), Ok(()));
        assert_eq!(validate_alert_days(MAX_ALERT_DAYS), Ok(()));
        assert_eq!(
            validate_alert_days(MAX_ALERT_DAYS + 1),
            Err("Alert days must be at most 3650")
        );
        assert!(validate_alert_days(5_000_000_000_000_000_000).is_err());
    }

    #[test]
    fn test_validate_color() {
        assert_eq!(validate_color("#A0b1C2"), Ok(()));
        assert!(validate_color("A0B1C2").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#GGGGGG").is_err());
    }
}
