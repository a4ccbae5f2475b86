//! AI-assisted article generation.
//!
//! [`ArticleGenerator`] holds the state of a "generate with AI" dialog:
//! the prompt, the image flag, whether a request is running and the
//! message to show. Handles are cheap to clone and share that state, so
//! one task can run [`ArticleGenerator::generate`] while another reads
//! progress or tries to close the dialog.

use std::{fmt, sync::Arc};

use nnews_shared::{validators::validate_prompt, AiArticleRequest, Article, NewsError, NewsResult};
use parking_lot::Mutex;

use crate::api::ArticleApi;

const GENERATION_FAILED: &str = "Failed to generate article with AI. Please try again.";

/// Whether a generation writes a new article or rewrites one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Write a new article from the prompt.
    Create,
    /// Rewrite an existing article following the prompt.
    Update,
}

/// Progress reported while a generation request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationProgress {
    /// Waiting for the article text.
    Writing(GenerationMode),
    /// Waiting for the article text and its cover image.
    WritingWithImage,
}

impl GenerationProgress {
    /// Status line shown while the request runs.
    pub fn message(self) -> &'static str {
        match self {
            GenerationProgress::Writing(GenerationMode::Create) => "Creating article with AI...",
            GenerationProgress::Writing(GenerationMode::Update) => "Updating article with AI...",
            GenerationProgress::WritingWithImage => {
                "Generating content and image with AI... This may take a few moments."
            },
        }
    }
}

impl fmt::Display for GenerationProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

type SuccessCallback = Arc<dyn Fn(&Article) + Send + Sync>;

struct GeneratorState {
    article_id: Option<i64>,
    prompt: String,
    generate_image: bool,
    open: bool,
    loading: bool,
    error: Option<String>,
    progress: Option<GenerationProgress>,
}

impl GeneratorState {
    fn reset_form(&mut self) {
        self.prompt.clear();
        self.generate_image = false;
        self.error = None;
    }
}

/// Clears the loading flag even if the request future is dropped.
struct Busy<'a>(&'a Mutex<GeneratorState>);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.loading = false;
        state.progress = None;
    }
}

/// State of the "write with AI" dialog.
///
/// Clones share state, so a UI can watch `loading()` and `progress()` while
/// another task awaits [`ArticleGenerator::generate`].
#[derive(Clone)]
pub struct ArticleGenerator {
    api: ArticleApi,
    mode: GenerationMode,
    state: Arc<Mutex<GeneratorState>>,
    on_success: Option<SuccessCallback>,
}

impl ArticleGenerator {
    /// Closed dialog in `mode` with an empty prompt.
    pub fn new(api: ArticleApi, mode: GenerationMode) -> Self {
        Self {
            api,
            mode,
            state: Arc::new(Mutex::new(GeneratorState {
                article_id: None,
                prompt: String::new(),
                generate_image: false,
                open: false,
                loading: false,
                error: None,
                progress: None,
            })),
            on_success: None,
        }
    }

    /// Generator for rewriting `article_id`.
    pub fn for_update(api: ArticleApi, article_id: i64) -> Self {
        let generator = Self::new(api, GenerationMode::Update);
        generator.state.lock().article_id = Some(article_id);
        generator
    }

    /// Called with the generated article after every successful run.
    pub fn on_success(mut self, callback: impl Fn(&Article) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Create or update.
    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Article an update rewrites.
    pub fn set_article_id(&self, article_id: Option<i64>) {
        self.state.lock().article_id = article_id;
    }

    /// Replace the prompt.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.state.lock().prompt = prompt.into();
    }

    /// Ask for a cover image as well.
    pub fn set_generate_image(&self, generate_image: bool) {
        self.state.lock().generate_image = generate_image;
    }

    /// Show the dialog, clearing any previous error.
    pub fn open(&self) {
        self.state.lock().open = true;
    }

    /// Close and reset the form. Refused while a request is running.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.loading {
            return false;
        }
        state.reset_form();
        state.open = false;
        true
    }

    /// Current prompt.
    pub fn prompt(&self) -> String {
        self.state.lock().prompt.clone()
    }

    /// Whether a cover image is requested.
    pub fn generate_image(&self) -> bool {
        self.state.lock().generate_image
    }

    /// True while the dialog is shown.
    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// True while a request runs.
    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Message of the last failed generation.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// What the running request is doing.
    pub fn progress(&self) -> Option<GenerationProgress> {
        self.state.lock().progress
    }

    /// Validate the form and send exactly one generation request.
    ///
    /// Each progress step is also handed to `on_progress`. On success the
    /// success callback runs, the form resets and the dialog closes. On
    /// failure the error message is kept and the dialog stays open.
    pub async fn generate(
        &self,
        mut on_progress: impl FnMut(GenerationProgress),
    ) -> NewsResult<Article> {
        let (request, steps) = {
            let mut state = self.state.lock();
            if state.loading {
                return Err(NewsError::validation("A generation request is already running"));
            }
            let request = match self.build_request(&state) {
                Ok(request) => request,
                Err(err) => {
                    state.error = Some(err.message().to_string());
                    return Err(err);
                },
            };

            let mut steps = vec![GenerationProgress::Writing(self.mode)];
            if state.generate_image {
                steps.push(GenerationProgress::WritingWithImage);
            }
            state.loading = true;
            state.error = None;
            state.progress = steps.last().copied();
            (request, steps)
        };
        let busy = Busy(&self.state);
        for step in steps {
            on_progress(step);
        }

        tracing::debug!(mode = ?self.mode, generate_image = ?request.generate_image, "generating article");
        let result = match self.mode {
            GenerationMode::Create => self.api.create_article_with_ai(&request).await,
            GenerationMode::Update => self.api.update_article_with_ai(&request).await,
        };
        drop(busy);

        match result {
            Ok(article) => {
                if let Some(callback) = &self.on_success {
                    callback(&article);
                }
                let mut state = self.state.lock();
                state.reset_form();
                state.open = false;
                Ok(article)
            },
            Err(err) => {
                tracing::warn!("article generation failed: {err}");
                let message = match err.message().trim() {
                    "" => GENERATION_FAILED.to_string(),
                    message => message.to_string(),
                };
                self.state.lock().error = Some(message);
                Err(err)
            },
        }
    }

    fn build_request(&self, state: &GeneratorState) -> NewsResult<AiArticleRequest> {
        validate_prompt(&state.prompt)?;
        let article_id = match self.mode {
            GenerationMode::Create => None,
            GenerationMode::Update => Some(state.article_id.ok_or_else(|| {
                NewsError::validation("Article ID is required for update mode")
            })?),
        };
        Ok(AiArticleRequest {
            article_id,
            prompt: state.prompt.trim().to_string(),
            generate_image: Some(state.generate_image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_messages() {
        assert_eq!(
            GenerationProgress::Writing(GenerationMode::Create).message(),
            "Creating article with AI..."
        );
        assert_eq!(
            GenerationProgress::Writing(GenerationMode::Update).to_string(),
            "Updating article with AI..."
        );
        assert!(GenerationProgress::WritingWithImage
            .message()
            .starts_with("Generating content and image"));
    }
}
