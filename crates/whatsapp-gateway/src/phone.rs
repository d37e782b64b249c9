//! Phone number and JID helpers.

/// Brazilian country calling code.
pub const COUNTRY_CODE: &str = "55";

/// Suffix of a user JID.
pub const USER_JID_SUFFIX: &str = "@s.whatsapp.net";

/// Suffix of a group JID.
pub const GROUP_JID_SUFFIX: &str = "@g.us";

/// Format a phone number the way the gateway expects it.
///
/// Keeps the digits of the part before any `@domain`, drops trunk `0`
/// prefixes, adds the country code to 10/11 digit national numbers and
/// repairs the `550…` mistake. Formatting is idempotent.
pub fn format_phone(raw: &str) -> String {
    let local = raw.split('@').next().unwrap_or_default();
    let digits: String = local.chars().filter(|c| c.is_ascii_digit()).collect();
    let mut formatted = digits.trim_start_matches('0').to_string();

    if !formatted.starts_with(COUNTRY_CODE) && matches!(formatted.len(), 10 | 11) {
        formatted = format!("{}{}", COUNTRY_CODE, formatted);
    }

    while let Some(rest) = formatted.strip_prefix("550") {
        formatted = format!("{}{}", COUNTRY_CODE, rest);
    }

    formatted
}

/// Alternate encodings to try after the gateway rejected `formatted`.
///
/// In order: the JID form, then the number without the country code.
pub fn alternate_recipients(formatted: &str) -> Vec<String> {
    let mut alternates = vec![format!("{}{}", formatted, USER_JID_SUFFIX)];
    if let Some(national) = formatted.strip_prefix(COUNTRY_CODE) {
        if !national.is_empty() {
            alternates.push(national.to_string());
        }
    }
    alternates
}

/// Extract the phone digits from a JID such as `5511999999999@s.whatsapp.net`.
pub fn phone_from_jid(jid: &str) -> String {
    jid.split('@')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

/// Whether the JID identifies a group conversation.
pub fn is_group_jid(jid: &str) -> bool {
    jid.contains(GROUP_JID_SUFFIX)
}
