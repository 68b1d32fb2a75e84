//! Lightweight SMILES syntax check.
//!
//! This only screens input before it is handed to a structure renderer:
//! allowed characters, balanced branches and bracket atoms, and paired
//! ring-closure labels. It does not parse chemistry.

use crate::error::{ExplorerError, Result};
use std::collections::HashSet;

const ALLOWED_PUNCT: &str = "()[]=#$:/\\.+-@%*";

fn invalid(smiles: &str, why: &str) -> ExplorerError {
    ExplorerError::InvalidInput(format!("Invalid SMILES '{}': {}", smiles, why))
}

/// Check that a string is syntactically plausible SMILES.
pub fn validate_smiles(smiles: &str) -> Result<()> {
    let s = smiles.trim();
    if s.is_empty() {
        return Err(invalid(smiles, "empty"));
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || ALLOWED_PUNCT.contains(*c)))
    {
        return Err(invalid(smiles, &format!("unexpected character '{}'", c)));
    }

    let chars: Vec<char> = s.chars().collect();
    let mut depth = 0usize;
    let mut in_bracket = false;
    let mut open_rings: HashSet<u32> = HashSet::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_bracket {
            match c {
                ']' => in_bracket = false,
                '[' => return Err(invalid(smiles, "nested bracket atom")),
                _ => {}
            }
            i += 1;
            continue;
        }
        match c {
            '[' => in_bracket = true,
            ']' => return Err(invalid(smiles, "unmatched ']'")),
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid(smiles, "unmatched ')'"))?;
            }
            '%' => {
                let label: String = chars.iter().skip(i + 1).take(2).collect();
                if label.len() != 2 || !label.chars().all(|d| d.is_ascii_digit()) {
                    return Err(invalid(smiles, "'%' must be followed by two digits"));
                }
                let n: u32 = label.parse().map_err(|_| invalid(smiles, "bad ring label"))?;
                toggle(&mut open_rings, n + 100);
                i += 2;
            }
            d if d.is_ascii_digit() => {
                toggle(&mut open_rings, d.to_digit(10).unwrap_or(0));
            }
            _ => {}
        }
        i += 1;
    }

    if in_bracket {
        return Err(invalid(smiles, "unclosed '['"));
    }
    if depth != 0 {
        return Err(invalid(smiles, "unclosed '('"));
    }
    if !open_rings.is_empty() {
        return Err(invalid(smiles, "unpaired ring closure"));
    }
    Ok(())
}

fn toggle(open: &mut HashSet<u32>, label: u32) {
    if !open.remove(&label) {
        open.insert(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        validate_smiles("CCCS(=O)(=O)Nc1ccc(F)c(C(=O)c2c[nH]c3ncc(Cl)cc23)c1F").unwrap();
        validate_smiles("C1CC%10CC1CC%10").unwrap();
        validate_smiles("[Na+].[Cl-]").unwrap();
        validate_smiles("C/C=C\\C").unwrap();
    }

    #[test]
    fn test_invalid() {
        assert!(validate_smiles("").is_err());
        assert!(validate_smiles("CC(C").is_err());
        assert!(validate_smiles("CC)C").is_err());
        assert!(validate_smiles("c1ccccc").is_err());
        assert!(validate_smiles("C[NH").is_err());
        assert!(validate_smiles("C C").is_err());
        assert!(validate_smiles("C%1").is_err());
    }
}
