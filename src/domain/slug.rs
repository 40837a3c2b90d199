//! Team identifier slugs
//!
//! Team identity is a deterministic ASCII slug of `ageGroup-groupName`.
//! Names are Greek in practice ("Κ10", "Α"), so the slug transliterates
//! Greek letters before the usual lowercase/hyphen normalization. The
//! same input always yields the same slug; uniqueness conflicts surface
//! as errors at the access layer, never as silently distinct teams.

use super::error::DomainError;

/// Transliterate one lowercase character to its ASCII slug form.
///
/// Greek is mapped to the common Latin transcription; accented vowels
/// fold to their base letter. Anything that remains non-alphanumeric
/// becomes a hyphen candidate.
fn transliterate(c: char) -> &'static str {
    match c {
        'α' | 'ά' => "a",
        'β' => "v",
        'γ' => "g",
        'δ' => "d",
        'ε' | 'έ' => "e",
        'ζ' => "z",
        'η' | 'ή' => "i",
        'θ' => "th",
        'ι' | 'ί' | 'ϊ' | 'ΐ' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' | 'ό' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' | 'ύ' | 'ϋ' | 'ΰ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' | 'ώ' => "o",
        _ => "",
    }
}

/// Normalize one human-readable part into slug characters.
fn slugify_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut prev_hyphen = true; // suppress leading hyphen
    for c in part.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_hyphen = false;
        } else {
            let mapped = transliterate(c);
            if mapped.is_empty() {
                if !prev_hyphen {
                    out.push('-');
                    prev_hyphen = true;
                }
            } else {
                out.push_str(mapped);
                prev_hyphen = false;
            }
        }
    }
    out.trim_matches('-').to_string()
}

/// Derive the deterministic team id from age group and group name.
pub fn team_slug(age_group: &str, group_name: &str) -> Result<String, DomainError> {
    let age = slugify_part(age_group);
    let group = slugify_part(group_name);

    if age.is_empty() && group.is_empty() {
        return Err(DomainError::InvalidSlug(format!(
            "{}-{}",
            age_group, group_name
        )));
    }

    let slug = match (age.is_empty(), group.is_empty()) {
        (false, false) => format!("{}-{}", age, group),
        (false, true) => age,
        (true, false) => group,
        (true, true) => unreachable!(),
    };
    Ok(slug)
}

/// Validate a stored slug: lowercase ASCII alphanumeric plus single
/// hyphens, no leading/trailing hyphen.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() || slug.len() > 64 {
        return Err(DomainError::InvalidSlug(slug.to_string()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(DomainError::InvalidSlug(slug.to_string()));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(DomainError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_age_group_and_letter() {
        assert_eq!(team_slug("Κ10", "Α").unwrap(), "k10-a");
        assert_eq!(team_slug("Κ12", "Β").unwrap(), "k12-v");
    }

    #[test]
    fn test_deterministic() {
        let a = team_slug("Κ10", "Α").unwrap();
        let b = team_slug("Κ10", "Α").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_accents_fold() {
        assert_eq!(team_slug("Νέοι", "Ακαδημία").unwrap(), "neoi-akadimia");
    }

    #[test]
    fn test_latin_passthrough() {
        assert_eq!(team_slug("U15", "Red").unwrap(), "u15-red");
    }

    #[test]
    fn test_spaces_collapse_to_hyphens() {
        assert_eq!(team_slug("K 10", "Group  A").unwrap(), "k-10-group-a");
    }

    #[test]
    fn test_empty_parts_rejected() {
        assert!(team_slug("", "").is_err());
        assert!(team_slug("!!", "??").is_err());
        // One usable part is enough
        assert_eq!(team_slug("Κ10", "").unwrap(), "k10");
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("k10-a").is_ok());
        assert!(validate_slug("123").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("-k10").is_err());
        assert!(validate_slug("k10-").is_err());
        assert!(validate_slug("k10--a").is_err());
        assert!(validate_slug("K10-A").is_err());
        assert!(validate_slug("κ10").is_err());
        assert!(validate_slug(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_derived_slug_always_validates() {
        for (age, group) in [("Κ10", "Α"), ("Κ8", "Γ"), ("U15", "Red"), ("K 10", "A B")] {
            let slug = team_slug(age, group).unwrap();
            assert!(validate_slug(&slug).is_ok(), "slug {:?} failed", slug);
        }
    }
}
