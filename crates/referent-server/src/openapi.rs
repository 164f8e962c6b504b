use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Referent API",
        version = "0.1.0",
        description = "Article extraction with LLM-powered translation, summaries, theses, posts and illustrations."
    ),
    paths(
        crate::routes::parse,
        crate::routes::translate,
        crate::routes::summarize,
        crate::routes::theses,
        crate::routes::telegram_post,
        crate::routes::image_prompt,
        crate::routes::generate_image,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::ParseRequest,
        crate::dto::ParseResponse,
        crate::dto::TranslateRequest,
        crate::dto::TranslateResponse,
        crate::dto::ArticleTaskRequest,
        crate::dto::SummaryResponse,
        crate::dto::ThesesResponse,
        crate::dto::PostResponse,
        crate::dto::ImagePromptResponse,
        crate::dto::GenerateImageRequest,
        crate::dto::GenerateImageResponse,
        crate::dto::ProviderStatus,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "articles", description = "Article extraction"),
        (name = "generation", description = "Text generation over article content"),
        (name = "images", description = "Illustration generation"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .description(Some(
                            "Optional API key. Enforced only when REFERENT_SERVER_API_KEY is set.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
