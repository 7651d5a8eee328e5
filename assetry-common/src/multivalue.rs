//! multi-value text fields (serial numbers, barcodes)

pub const MULTIVALUE_ERROR: &str =
    "Field can't be empty. Please put the items separated by new line or comma.";

/// Splits on commas when the text has any, otherwise on new lines.
pub fn split_multivalue(text: &str) -> Vec<String> {
    let text = text.trim();
    let sep = if text.contains(',') { ',' } else { '\n' };
    text.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate_multivalue(text: &str) -> Result<(), &'static str> {
    let text = text.trim();
    if text.is_empty() || text.find(' ').is_some_and(|pos| pos > 0) {
        return Err(MULTIVALUE_ERROR);
    }
    if split_multivalue(text).is_empty() {
        return Err(MULTIVALUE_ERROR);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefers_comma() {
        assert_eq!(split_multivalue("sn1,sn2,,sn3"), vec!["sn1", "sn2", "sn3"]);
        assert_eq!(split_multivalue("sn1\nsn2\n\n"), vec!["sn1", "sn2"]);
        assert_eq!(split_multivalue("sn1,sn2\nsn3"), vec!["sn1", "sn2\nsn3"]);
    }

    #[test]
    fn validate_rules() {
        assert!(validate_multivalue("sn1\nsn2").is_ok());
        assert!(validate_multivalue("  sn1  ").is_ok());
        assert_eq!(validate_multivalue("   "), Err(MULTIVALUE_ERROR));
        assert_eq!(validate_multivalue("sn1 sn2"), Err(MULTIVALUE_ERROR));
        assert_eq!(validate_multivalue(",,,"), Err(MULTIVALUE_ERROR));
    }
}
