// Page handlers for HTML rendering with Askama

use axum::response::{Html, IntoResponse};
use askama::Template;

use crate::encoding::{vocabulary, CategoricalField};

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub districts: Vec<&'static str>,
    pub soil_colors: Vec<&'static str>,
    pub crops: Vec<&'static str>,
}

impl HomeTemplate {
    fn new() -> Self {
        Self {
            title: "Fertilizer Recommendation".to_string(),
            districts: vocabulary(CategoricalField::District),
            soil_colors: vocabulary(CategoricalField::SoilColor),
            crops: vocabulary(CategoricalField::Crop),
        }
    }
}

pub async fn home_page() -> impl IntoResponse {
    let template = HomeTemplate::new();
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}
