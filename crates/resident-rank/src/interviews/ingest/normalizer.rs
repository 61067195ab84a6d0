/// Parses a cell as a number. Anything unparseable, blank or non-finite is `None`.
pub fn coerce_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Numeric REDCap completion code for a completed form.
const COMPLETE_CODE: f64 = 2.0;

/// How the completion column encodes "complete".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompletionRule {
    /// Raw REDCap export: 0 incomplete, 1 unverified, 2 complete.
    NumericCode,
    /// Labelled export: "Complete", "Incomplete", "Unverified".
    Label,
}

impl CompletionRule {
    /// A column is numeric when every non-blank cell parses and at least one exists.
    pub(crate) fn detect<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut saw_value = false;
        for cell in cells {
            if cell.trim().is_empty() {
                continue;
            }
            if coerce_numeric(cell).is_none() {
                return Self::Label;
            }
            saw_value = true;
        }

        if saw_value {
            Self::NumericCode
        } else {
            Self::Label
        }
    }

    pub(crate) fn is_complete(self, value: &str) -> bool {
        match self {
            Self::NumericCode => coerce_numeric(value) == Some(COMPLETE_CODE),
            Self::Label => {
                let lowered = value.to_lowercase();
                lowered.contains("complete") && !lowered.contains("incomplete")
            }
        }
    }
}
