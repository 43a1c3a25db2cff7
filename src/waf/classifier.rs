use crate::catalog::VendorProfile;
use crate::probe::ProbeResponse;

/// Notes value when nothing could be extracted.
pub const NO_NOTES: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub blocked: bool,
    pub notes: String,
}

/// Decide blocked/not-blocked and pull diagnostic ids out of a block page.
///
/// An absent response is never blocked; callers record it as unreachable so it stays
/// distinguishable from a response that went through.
pub fn classify(response: Option<&ProbeResponse>, profile: &VendorProfile) -> Verdict {
    let Some(response) = response else {
        return Verdict { blocked: false, notes: NO_NOTES.to_string() };
    };

    let blocked = is_blocked(&response.body, profile);
    let notes = if blocked {
        extract_block_info(&response.body, profile).unwrap_or_else(|| NO_NOTES.to_string())
    } else {
        NO_NOTES.to_string()
    };
    Verdict { blocked, notes }
}

/// Literal, case-sensitive containment of any block signature.
pub fn is_blocked(body: &str, profile: &VendorProfile) -> bool {
    profile.block_signatures.iter().any(|sig| body.contains(sig.as_str()))
}

/// `label: group1` for every pattern that matched, joined with ` | `.
pub fn extract_block_info(body: &str, profile: &VendorProfile) -> Option<String> {
    let notes: Vec<String> = profile
        .extraction_patterns
        .iter()
        .filter_map(|(label, re)| {
            re.captures(body)
                .and_then(|caps| caps.get(1))
                .map(|m| format!("{}: {}", label, m.as_str()))
        })
        .collect();

    if notes.is_empty() {
        None
    } else {
        Some(notes.join(" | "))
    }
}
