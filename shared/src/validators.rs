//! Pure form validators and formatters.
//!
//! Document and phone helpers follow Brazilian conventions: CPF, CNPJ,
//! CEP and `(99) 99999-9999` phone numbers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{NewsError, NewsResult},
    models::Tag,
};

/// Minimum prompt length (trimmed, in characters) for AI generation.
pub const PROMPT_MIN_CHARS: usize = 10;
/// Maximum prompt length (trimmed, in characters) for AI generation.
pub const PROMPT_MAX_CHARS: usize = 2000;
/// Longest accepted tag title in a comma separated tag list.
pub const TAG_MAX_CHARS: usize = 50;
/// Largest accepted image upload.
pub const IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn digit_values(digits: &str) -> Vec<u32> {
    digits.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Validate a CPF (individual taxpayer number). Punctuation is ignored.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits = digit_values(&digits_only(cpf));
    if digits.len() != 11 || all_same(&digits) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let digit = 11 - (sum % 11);
        if digit >= 10 {
            0
        } else {
            digit
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Validate a CNPJ (company taxpayer number). Punctuation is ignored.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits = digit_values(&digits_only(cnpj));
    if digits.len() != 14 || all_same(&digits) {
        return false;
    }

    let check = |len: usize| {
        // weights run 5..2 then 9..2 for the first digit, 6..2 then 9..2 for the second
        let mut weight = len as u32 - 7;
        let mut sum = 0;
        for d in &digits[..len] {
            sum += d * weight;
            weight -= 1;
            if weight < 2 {
                weight = 9;
            }
        }
        if sum % 11 < 2 {
            0
        } else {
            11 - sum % 11
        }
    };

    check(12) == digits[12] && check(13) == digits[13]
}

/// Loose `local@domain.tld` check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Phone numbers with area code have 10 or 11 digits.
pub fn validate_phone(phone: &str) -> bool {
    (10..=11).contains(&digits_only(phone).len())
}

/// `(99) 99999-9999` or `(99) 9999-9999`; anything else is returned as is.
pub fn format_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => phone.to_string(),
    }
}

/// CPF as `999.999.999-99`, CNPJ as `99.999.999/9999-99`.
pub fn format_document(document: &str) -> String {
    let digits = digits_only(document);
    match digits.len() {
        11 => format!("{}.{}.{}-{}", &digits[..3], &digits[3..6], &digits[6..9], &digits[9..]),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..]
        ),
        _ => document.to_string(),
    }
}

/// CEP as `99999-999`.
pub fn format_zip_code(zip_code: &str) -> String {
    let digits = digits_only(zip_code);
    if digits.len() == 8 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        zip_code.to_string()
    }
}

/// Which character classes a password must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Shortest accepted password.
    pub min_length: usize,
    /// Require an uppercase letter.
    pub require_uppercase: bool,
    /// Require a lowercase letter.
    pub require_lowercase: bool,
    /// Require a digit.
    pub require_numbers: bool,
    /// Require one of `!@#$%^&*(),.?":{}|<>`.
    pub require_special_chars: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_special_chars: true,
        }
    }
}

/// Outcome of [`validate_password_strength`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0 (weak) to 4 (strong).
    pub score: u8,
    /// One line per unmet requirement.
    pub feedback: Vec<String>,
    /// True when every requirement is met.
    pub is_valid: bool,
}

/// Score a password and list what the policy still requires.
pub fn validate_password_strength(password: &str, policy: &PasswordPolicy) -> PasswordStrength {
    let mut feedback = Vec::new();
    let mut score: u8 = 0;

    let length = password.chars().count();
    if length < policy.min_length {
        feedback.push(format!(
            "Password must be at least {} characters long",
            policy.min_length
        ));
    } else {
        score += 1;
        if length >= 12 {
            score += 1;
        }
    }

    let classes: [(bool, bool, &str); 4] = [
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            policy.require_uppercase,
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            policy.require_lowercase,
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            policy.require_numbers,
            "Password must contain at least one number",
        ),
        (
            password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)),
            policy.require_special_chars,
            "Password must contain at least one special character",
        ),
    ];
    for (present, required, message) in classes {
        if present {
            score += 1;
        } else if required {
            feedback.push(message.to_string());
        }
    }

    PasswordStrength {
        score: score.min(4),
        is_valid: feedback.is_empty(),
        feedback,
    }
}

/// Join tag titles as `a, b, c`.
pub fn tags_to_string(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a comma separated tag list, dropping blank entries.
pub fn string_to_tags_preview(tag_list: &str) -> Vec<String> {
    tag_list
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check an AI prompt: required, and between 10 and 2000 characters once
/// trimmed.
pub fn validate_prompt(prompt: &str) -> NewsResult<()> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(NewsError::validation("Prompt is required"));
    }
    let length = trimmed.chars().count();
    if length < PROMPT_MIN_CHARS {
        return Err(NewsError::validation(format!(
            "Prompt must be at least {PROMPT_MIN_CHARS} characters long"
        )));
    }
    if length > PROMPT_MAX_CHARS {
        return Err(NewsError::validation(format!(
            "Prompt must be less than {PROMPT_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

/// Check a comma separated tag list and return the parsed titles.
///
/// A blank list is valid and yields no tags. Bare extra commas (`a,,b`)
/// are dropped, but a segment holding only whitespace is an error.
pub fn validate_tag_list(tag_list: &str) -> NewsResult<Vec<String>> {
    if tag_list.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tags = string_to_tags_preview(tag_list);
    if tags.is_empty() {
        return Err(NewsError::validation(
            "Invalid tag format. Use comma-separated values.",
        ));
    }

    if tag_list
        .split(',')
        .any(|segment| !segment.is_empty() && segment.trim().is_empty())
    {
        return Err(NewsError::validation("Tags cannot be empty. Remove extra commas."));
    }

    if tags.iter().any(|tag| tag.chars().count() > TAG_MAX_CHARS) {
        return Err(NewsError::validation(format!(
            "Individual tags must be less than {TAG_MAX_CHARS} characters"
        )));
    }
    Ok(tags)
}

/// Check an image before uploading it: `image/*` content, at most 5 MiB.
pub fn validate_image_upload(content_type: &str, size: u64) -> NewsResult<()> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(NewsError::validation("Please select an image file"));
    }
    if size > IMAGE_MAX_BYTES {
        return Err(NewsError::validation("Image must be smaller than 5MB"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_checks_digits_and_rejects_repeats() {
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("52998224725"));
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("11111111111"));
        assert!(!validate_cpf("5299822472"));
        assert!(!validate_cpf("529982247251"));
        assert!(!validate_cpf("not a number"));
    }

    #[test]
    fn cnpj_checks_digits() {
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(!validate_cnpj("11.222.333/0001-80"));
        assert!(!validate_cnpj("00000000000000"));
        assert!(!validate_cnpj("1122233300018"));
    }

    #[test]
    fn email_and_phone() {
        assert!(validate_email("editor@news.com.br"));
        assert!(!validate_email("editor@news"));
        assert!(!validate_email("editor @news.com"));
        assert!(validate_phone("(11) 98765-4321"));
        assert!(validate_phone("1133334444"));
        assert!(!validate_phone("98765-4321"));
    }

    #[test]
    fn formatters_only_touch_known_lengths() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_phone("12345"), "12345");
        assert_eq!(format_document("52998224725"), "529.982.247-25");
        assert_eq!(format_document("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_zip_code("01310100"), "01310-100");
        assert_eq!(format_zip_code("0131"), "0131");
    }

    #[test]
    fn password_strength_scores_and_feedback() {
        let policy = PasswordPolicy::default();
        let strong = validate_password_strength("Sup3r$ecretPass", &policy);
        assert!(strong.is_valid);
        assert_eq!(strong.score, 4);

        let weak = validate_password_strength("abc", &policy);
        assert!(!weak.is_valid);
        assert_eq!(weak.feedback.len(), 4);
        assert_eq!(weak.score, 1);

        let relaxed = PasswordPolicy {
            require_special_chars: false,
            ..PasswordPolicy::default()
        };
        assert!(validate_password_strength("Abcdefg1", &relaxed).is_valid);
    }

    #[test]
    fn prompt_bounds_apply_to_trimmed_text() {
        assert!(validate_prompt("").is_err());
        assert!(validate_prompt("     ").is_err());
        assert!(validate_prompt("  123456789  ").is_err());
        assert!(validate_prompt("  1234567890  ").is_ok());
        assert!(validate_prompt(&"a".repeat(PROMPT_MAX_CHARS)).is_ok());
        assert!(validate_prompt(&"a".repeat(PROMPT_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn tag_list_rules() {
        assert_eq!(validate_tag_list("  ").expect("blank is valid"), Vec::<String>::new());
        assert_eq!(
            validate_tag_list("rust, wasm ,backend").expect("valid list"),
            vec!["rust".to_string(), "wasm".to_string(), "backend".to_string()]
        );
        assert_eq!(
            validate_tag_list("rust,,wasm,").expect("bare commas are dropped"),
            vec!["rust".to_string(), "wasm".to_string()]
        );
        assert_eq!(
            validate_tag_list(",,").expect_err("no tags").message(),
            "Invalid tag format. Use comma-separated values."
        );
        assert_eq!(
            validate_tag_list("rust, ,wasm").expect_err("whitespace tag").message(),
            "Tags cannot be empty. Remove extra commas."
        );
        assert!(validate_tag_list(&"x".repeat(TAG_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn tags_join_and_split() {
        let tags = vec![Tag::new("Tech"), Tag::new("Rust")];
        assert_eq!(tags_to_string(&tags), "Tech, Rust");
        assert_eq!(string_to_tags_preview(" a,, b ,"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn image_upload_limits() {
        assert!(validate_image_upload("image/png", 1024).is_ok());
        assert!(validate_image_upload("application/pdf", 1024).is_err());
        assert!(validate_image_upload("image/jpeg", IMAGE_MAX_BYTES + 1).is_err());
    }
}
