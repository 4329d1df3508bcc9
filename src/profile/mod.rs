pub mod text;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use text::synthesize;

/// Age assumed for a profile that never filled one in.
pub const DEFAULT_AGE: i32 = 25;

/// Rating assumed for a profile with no reviews yet.
pub const DEFAULT_RATING: f64 = 0.0;

/// A user profile as held by the profile store.
///
/// Fields the engine doesn't read are kept in `extra` and written back out
/// unchanged, so a ranked result carries the whole stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills_known: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills_to_learn: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<i32>,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Age, or `default` when the profile has none.
    pub fn age_or(&self, default: i32) -> i32 {
        self.age.unwrap_or(default)
    }

    /// Rating on the 0..=5 scale, or [`DEFAULT_RATING`] when unrated.
    pub fn rating_or_default(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }
}

/// A candidate profile with its 0..=100 match score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub profile: Profile,
    pub match_score: f64,
}

impl ScoredCandidate {
    pub fn new(profile: Profile, match_score: f64) -> Self {
        Self {
            profile,
            match_score,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.profile.user_id
    }
}

/// Numbers as they arrive from profile forms: a JSON number, a numeric
/// string, or "".
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Age parsed the way form input is read: the leading integer of a string,
/// the integer part of a number. Zero and anything unparseable count as
/// absent.
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Int(n)) => i32::try_from(n).ok(),
        Some(Lenient::Float(f)) if f.is_finite() => i32::try_from(f.trunc() as i64).ok(),
        Some(Lenient::Text(s)) => leading_integer(&s),
        _ => None,
    };
    Ok(age.filter(|&a| a != 0))
}

/// Rating as a number or numeric string. Blank, unparseable and non-finite
/// values count as unrated.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Int(n)) => Some(n as f64),
        Some(Lenient::Float(f)) => Some(f),
        Some(Lenient::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(rating.filter(|r| r.is_finite()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn leading_integer(s: &str) -> Option<i32> {
    let s = s.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    format!("{sign}{digits}").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_camel_case_document() {
        let profile: Profile = serde_json::from_value(json!({
            "userId": "u1",
            "name": "Sarah Chen",
            "skillsKnown": ["React", "TypeScript"],
            "skillsToLearn": ["Python"],
            "bio": "Frontend dev",
            "age": 31,
            "rating": 4.8
        }))
        .unwrap();
        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.skills_known, vec!["React", "TypeScript"]);
        assert_eq!(profile.age, Some(31));
        assert_eq!(profile.rating, Some(4.8));
        assert!(profile.qualification.is_none());
        assert!(profile.extra.is_empty());
    }

    #[test]
    fn age_accepts_strings_and_blanks() {
        let from = |v: Value| -> Option<i32> {
            serde_json::from_value::<Profile>(json!({ "userId": "u", "age": v }))
                .unwrap()
                .age
        };
        assert_eq!(from(json!("27")), Some(27));
        assert_eq!(from(json!(" 42 years")), Some(42));
        assert_eq!(from(json!("")), None);
        assert_eq!(from(json!("n/a")), None);
        assert_eq!(from(json!(null)), None);
        assert_eq!(from(json!(29.9)), Some(29));
        assert_eq!(from(json!(0)), None);
        assert_eq!(from(json!("0")), None);
        assert_eq!(from(json!("-5")), Some(-5));
        assert_eq!(from(json!(-3)), Some(-3));
    }

    #[test]
    fn rating_accepts_numeric_strings() {
        let from = |v: Value| -> Option<f64> {
            serde_json::from_value::<Profile>(json!({ "userId": "u", "rating": v }))
                .unwrap()
                .rating
        };
        assert_eq!(from(json!("4.5")), Some(4.5));
        assert_eq!(from(json!(" 3 ")), Some(3.0));
        assert_eq!(from(json!(4)), Some(4.0));
        assert_eq!(from(json!("")), None);
        assert_eq!(from(json!("great")), None);
        assert_eq!(from(json!("NaN")), None);
        assert_eq!(from(json!(null)), None);
    }

    #[test]
    fn null_skill_lists_read_as_empty() {
        let profile: Profile = serde_json::from_value(json!({
            "userId": "u",
            "skillsKnown": null,
            "skillsToLearn": null
        }))
        .unwrap();
        assert!(profile.skills_known.is_empty());
        assert!(profile.skills_to_learn.is_empty());
    }

    #[test]
    fn missing_fields_use_documented_defaults() {
        let profile = Profile::new("u1");
        assert_eq!(profile.age_or(DEFAULT_AGE), 25);
        assert_eq!(profile.rating_or_default(), 0.0);
        assert!(profile.skills_known.is_empty());
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let doc = json!({
            "userId": "u2",
            "skillsKnown": [],
            "skillsToLearn": [],
            "languages": ["English", "Spanish"],
            "gender": "female"
        });
        let profile: Profile = serde_json::from_value(doc).unwrap();
        assert_eq!(profile.extra["languages"], json!(["English", "Spanish"]));

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["gender"], "female");
        assert_eq!(out["userId"], "u2");
    }

    #[test]
    fn scored_candidate_serializes_flat() {
        let mut profile = Profile::new("u3");
        profile.rating = Some(4.0);
        let scored = ScoredCandidate::new(profile, 87.5);

        let out = serde_json::to_value(&scored).unwrap();
        assert_eq!(out["userId"], "u3");
        assert_eq!(out["rating"], 4.0);
        assert_eq!(out["matchScore"], 87.5);
        assert!(out.get("profile").is_none());
    }
}
