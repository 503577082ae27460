use serde::Deserialize;

const MAX_EXPERIENCE_YEARS: i32 = 80;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub industry: String,
    pub experience: Option<i32>,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Checks the request and returns it with skills trimmed and de-duplicated.
/// The industry itself is validated by the insight service.
pub fn validate_profile(request: ProfileRequest) -> Result<ProfileRequest, String> {
    if let Some(years) = request.experience {
        if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
            return Err(format!(
                "experience must be between 0 and {MAX_EXPERIENCE_YEARS} years"
            ));
        }
    }

    let mut skills: Vec<String> = Vec::with_capacity(request.skills.len());
    for skill in request.skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            skills.push(skill.to_string());
        }
    }

    let bio = request
        .bio
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());

    Ok(ProfileRequest {
        skills,
        bio,
        ..request
    })
}
