use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use referent_core::{
    AppError, ArticleExtractor, Fetcher, GeneratorFactory, ImageGenerator, Provider, Task,
    TaskInput, dispatch,
};

use crate::auth::require_api_key;
use crate::dto::{
    ArticleTaskRequest, GenerateImageRequest, GenerateImageResponse, HealthResponse,
    ImagePromptResponse, ParseRequest, ParseResponse, PostResponse, ProviderStatus,
    SummaryResponse, ThesesResponse, TranslateRequest, TranslateResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

const ARTICLE_CONTENT_REQUIRED: &str = "Article content is required";

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/parse", post(parse))
        .route("/translate", post(translate))
        .route("/summarize", post(summarize))
        .route("/theses", post(theses))
        .route("/telegram-post", post(telegram_post))
        .route("/image-prompt", post(image_prompt))
        .route("/generate-image", post(generate_image))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

/// A required string field: absent, non-string or blank values are rejected.
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::App(AppError::ValidationError(message.to_string())))
}

/// Resolve the requested provider and run one task against it.
async fn run_task(
    state: &AppState,
    task: Task,
    provider: Option<&str>,
    input: TaskInput<'_>,
) -> Result<String, ApiError> {
    let provider = Provider::from_name(provider);
    let generator = state.chat.create(provider)?;
    let output = dispatch(&generator, task, &input, &state.config.target_language).await?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/parse",
    request_body = ParseRequest,
    responses(
        (status = 200, description = "Extracted article", body = ParseResponse),
        (status = 400, description = "Missing or invalid URL", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Page could not be fetched", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "articles"
)]
pub async fn parse(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<ParseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let url = required(body.url, "URL is required")?;

    let html = state.fetcher.fetch(&url).await?;
    let article = state.extractor.extract(&html, &url);

    Ok(axum::Json(ParseResponse::from(article)))
}

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslateResponse),
        (status = 400, description = "Missing content", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Provider not configured or unreachable", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "generation"
)]
pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<TranslateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let content = required(body.content, "Content to translate is required")?;

    let translation = run_task(
        &state,
        Task::Translate,
        body.provider.as_deref(),
        TaskInput::new(&content),
    )
    .await?;

    Ok(axum::Json(TranslateResponse { translation }))
}

#[utoipa::path(
    post,
    path = "/summarize",
    request_body = ArticleTaskRequest,
    responses(
        (status = 200, description = "Article summary", body = SummaryResponse),
        (status = 400, description = "Missing content", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Provider not configured or unreachable", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "generation"
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<ArticleTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let content = required(body.content, ARTICLE_CONTENT_REQUIRED)?;

    let input = TaskInput::new(&content).with_title(body.title.as_deref());
    let summary = run_task(&state, Task::Summarize, body.provider.as_deref(), input).await?;

    Ok(axum::Json(SummaryResponse { summary }))
}

#[utoipa::path(
    post,
    path = "/theses",
    request_body = ArticleTaskRequest,
    responses(
        (status = 200, description = "Key theses", body = ThesesResponse),
        (status = 400, description = "Missing content", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Provider not configured or unreachable", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "generation"
)]
pub async fn theses(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<ArticleTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let content = required(body.content, ARTICLE_CONTENT_REQUIRED)?;

    let input = TaskInput::new(&content).with_title(body.title.as_deref());
    let theses = run_task(&state, Task::Theses, body.provider.as_deref(), input).await?;

    Ok(axum::Json(ThesesResponse { theses }))
}

#[utoipa::path(
    post,
    path = "/telegram-post",
    request_body = ArticleTaskRequest,
    responses(
        (status = 200, description = "Ready-to-publish post", body = PostResponse),
        (status = 400, description = "Missing content", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Provider not configured or unreachable", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "generation"
)]
pub async fn telegram_post(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<ArticleTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let content = required(body.content, ARTICLE_CONTENT_REQUIRED)?;

    let input = TaskInput::new(&content)
        .with_title(body.title.as_deref())
        .with_date(body.date.as_deref());
    let post = run_task(&state, Task::TelegramPost, body.provider.as_deref(), input).await?;

    Ok(axum::Json(PostResponse { post }))
}

#[utoipa::path(
    post,
    path = "/image-prompt",
    request_body = ArticleTaskRequest,
    responses(
        (status = 200, description = "Image prompt", body = ImagePromptResponse),
        (status = 400, description = "Missing content", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Provider not configured or unreachable", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "generation"
)]
pub async fn image_prompt(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<ArticleTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let content = required(body.content, ARTICLE_CONTENT_REQUIRED)?;

    let input = TaskInput::new(&content).with_title(body.title.as_deref());
    let prompt = run_task(&state, Task::ImagePrompt, body.provider.as_deref(), input).await?;

    Ok(axum::Json(ImagePromptResponse { prompt }))
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/generate-image",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Generated image as a data URI", body = GenerateImageResponse),
        (status = 400, description = "Missing prompt", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Provider not configured or returned no image", body = crate::dto::ErrorResponse),
        (status = 503, description = "Model is still loading", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "images"
)]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<GenerateImageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload?;
    let prompt = required(body.prompt, "Prompt is required")?;

    let image = state.images.generate(&prompt).await?;

    Ok(axum::Json(GenerateImageResponse {
        image: image.to_data_uri(),
        prompt,
    }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;

    let response = HealthResponse {
        status: "ok",
        providers: ProviderStatus {
            openai: config.is_configured(Provider::OpenAi),
            perplexity: config.is_configured(Provider::Perplexity),
            openrouter: config.is_configured(Provider::OpenRouter),
        },
        image: config.image.api_key.is_some(),
    };

    axum::Json(response)
}
