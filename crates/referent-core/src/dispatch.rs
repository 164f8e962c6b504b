use crate::error::AppError;
use crate::task::{Task, TaskInput};
use crate::traits::Generator;

/// Run one task against one generator.
///
/// Makes exactly one upstream call. An empty answer is replaced by the
/// task's placeholder instead of failing. Content length is not checked
/// here: gating short articles is the caller's job.
pub async fn dispatch<G: Generator>(
    generator: &G,
    task: Task,
    input: &TaskInput<'_>,
    language: &str,
) -> Result<String, AppError> {
    let request = task.build_request(input, language);
    tracing::info!(
        task = task.name(),
        prompt_chars = request.user_prompt.chars().count(),
        "Dispatching generation task"
    );

    let output = generator
        .complete(&request)
        .await?
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| task.placeholder().to_string());

    if task.trims_output() {
        Ok(output.trim().to_string())
    } else {
        Ok(output)
    }
}
