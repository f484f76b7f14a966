use serde::{Deserialize, Serialize};

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
    #[serde(default)]
    pub supabase: Option<SupabaseSecret>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SupabaseSecret {
    pub url: String,
    pub key: String,
}

/// Root structure of `config.toml`, the course catalog file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct CatalogConfig {
    #[serde(rename = "course", default)]
    pub courses: Vec<CourseConfig>,
}

/// One catalog entry: a display name plus the document file behind it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CourseConfig {
    pub name: String,
    pub document: String,
}
