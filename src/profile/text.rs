use super::Profile;

const NO_BIO: &str = "No bio provided.";
const NO_QUALIFICATION: &str = "No qualification listed.";

/// Render a profile as the single descriptive document that gets embedded.
pub fn synthesize(profile: &Profile) -> String {
    let known = profile.skills_known.join(", ");
    let learn = profile.skills_to_learn.join(", ");
    let bio = non_empty(profile.bio.as_deref()).unwrap_or(NO_BIO);
    let qualification = non_empty(profile.qualification.as_deref()).unwrap_or(NO_QUALIFICATION);

    format!(
        "Can Teach: {known}. Wants to Learn: {learn}. Bio: {bio}. Qualification: {qualification}."
    )
}

// A blank form field counts as unset.
fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Frame a free-text search so the model embeds it as a query.
pub fn query_text(query: &str) -> String {
    format!("Search query: {query}")
}
