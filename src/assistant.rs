//! AI customer-service collaborator
//!
//! The till treats the assistant as an opaque question→answer service
//! behind the [`Assistant`] trait. Typing the reserved sentinel at any
//! prompt opens a blocking chat sub-session; when the user leaves it,
//! control returns to the exact prompt that was interrupted. A failing
//! assistant call is reported inside the chat and never corrupts the
//! field being entered.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{Console, InputError, Interceptor};

/// Reserved trigger: input that case-folds and strips to this string opens
/// the chat sub-session instead of answering the current field.
const TRIGGER: &str = "halomas";

/// Keywords that leave the chat sub-session.
const EXIT_KEYWORDS: [&str; 3] = ["keluar", "exit", "quit"];

/// Keyword that prints the about blurb inside the chat.
const ABOUT_KEYWORD: &str = "pelajari masyud";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const SYSTEM_INSTRUCTION: &str = "Kamu adalah customer service untuk Roda Rent. \
     Jawablah hanya seputar layanan rental kendaraan ini.";

/// Errors from the assistant boundary.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key was configured for this run.
    #[error("assistant API key is not configured")]
    NotConfigured,

    /// Transport-level failure (network, auth, HTTP status).
    #[error("assistant request failed")]
    Transport(#[from] reqwest::Error),

    /// The reply payload carried no usable text.
    #[error("assistant reply contained no text")]
    EmptyReply,
}

/// Errors raised while loading the context document at startup.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The document is missing or unreadable. This is fatal: the process
    /// cannot start without it.
    #[error("context document `{path}` could not be read")]
    Unreadable {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Loads the service context document handed to the assistant with every
/// question.
///
/// # Errors
///
/// Returns [`ContextError::Unreadable`] when the document cannot be read.
pub fn load_context_doc(path: &Path) -> Result<String, ContextError> {
    fs::read_to_string(path).map_err(|source| ContextError::Unreadable {
        path: path.display().to_string(),
        source,
    })
}

/// Opaque question→answer service.
pub trait Assistant {
    /// Answers one user question against the service context document.
    ///
    /// # Errors
    ///
    /// Returns an [`AssistantError`] when the collaborator cannot produce
    /// an answer; callers report it and continue.
    fn answer(&self, context: &str, question: &str) -> Result<String, AssistantError>;
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiReplyContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let content = candidate.content?;
        let text = content.parts.into_iter().next()?.text;

        if text.is_empty() { None } else { Some(text) }
    }
}

/// Blocking Gemini-backed assistant client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The API key stays out of debug output.
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client for the default model.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    fn build_prompt(context: &str, question: &str) -> String {
        format!(
            "{context}\n\n\
             Tolong jawab pertanyaan user berdasarkan data di atas.\n\
             Jika ada perhitungan harga (jumlah hari, pajak, diskon), lakukan perhitungan langsung.\n\
             Gunakan format rupiah dengan titik pemisah ribuan. Jangan jawab di luar data.\n\n\
             User: {question}"
        )
    }
}

impl Assistant for GeminiClient {
    fn answer(&self, context: &str, question: &str) -> Result<String, AssistantError> {
        let url = format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Self::build_prompt(context, question),
                }],
            }],
        };

        let response: GeminiResponse = self
            .http
            .post(url)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        response.first_text().ok_or(AssistantError::EmptyReply)
    }
}

/// Assistant used when no API key is configured: the chat still opens, but
/// every question is answered with [`AssistantError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredAssistant;

impl Assistant for UnconfiguredAssistant {
    fn answer(&self, _context: &str, _question: &str) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}

/// Runs the blocking chat sub-session until the user types an exit keyword.
///
/// Assistant failures are reported in-session and the loop continues; only
/// console I/O failures abort.
///
/// # Errors
///
/// Returns an [`InputError`] if console I/O fails.
pub fn chat_session(
    console: &mut dyn Console,
    assistant: &dyn Assistant,
    context: &str,
) -> Result<(), InputError> {
    let rule = "=".repeat(120);

    console.say("")?;
    console.say(&rule)?;
    console.say("Roda Rent | Masyud AI customer service")?;
    console.say(
        "Anda memasuki mode AI customer service. AI bersifat eksperimental dan mungkin akan \
         membuat kesalahan.\nHarap periksa info penting. Ketik 'Pelajari Masyud' untuk info \
         lebih lanjut.",
    )?;
    console.say("Ketik 'keluar', 'exit', 'quit' untuk berhenti interaksi.")?;
    console.say(&rule)?;
    console.say("Masyud: Halo! Mau tanya apa seputar penyewaan?")?;

    loop {
        let question = console.ask("Anda: ")?;
        let lowered = question.trim().to_lowercase();

        if EXIT_KEYWORDS.contains(&lowered.as_str()) {
            console.say("Masyud: Oke, sampai jumpa!")?;

            return Ok(());
        }

        if lowered == ABOUT_KEYWORD {
            console.say(&rule)?;
            console.say(
                "Masyud adalah AI yang mungkin akan membuat kesalahan. Pertanyaan anda \
                 diteruskan apa adanya ke penyedia model; kami tidak menyimpan data apapun \
                 dari percakapan ini.",
            )?;
            console.say(&rule)?;

            continue;
        }

        console.say("Masyud: [berfikir...]")?;

        match assistant.answer(context, question.trim()) {
            Ok(reply) => console.say(&format!("Masyud: {reply}"))?,
            Err(error) => {
                tracing::warn!(%error, "assistant call failed");
                console.say("Masyud: Maaf, layanan sedang tidak tersedia. Coba lagi nanti.")?;
            }
        }
    }
}

/// Interceptor that watches every prompt for the reserved trigger and
/// hands control to the chat sub-session, then re-prompts the same field.
pub struct AssistantInterceptor<'a> {
    assistant: &'a dyn Assistant,
    context: &'a str,
}

impl fmt::Debug for AssistantInterceptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantInterceptor").finish_non_exhaustive()
    }
}

impl<'a> AssistantInterceptor<'a> {
    /// Creates the interceptor over an assistant and the loaded context
    /// document.
    #[must_use]
    pub fn new(assistant: &'a dyn Assistant, context: &'a str) -> Self {
        Self { assistant, context }
    }
}

impl Interceptor for AssistantInterceptor<'_> {
    fn intercept(&mut self, raw: &str, console: &mut dyn Console) -> Result<bool, InputError> {
        let normalized: String = raw.to_lowercase().split_whitespace().collect();

        if normalized != TRIGGER {
            return Ok(false);
        }

        tracing::debug!("assistant trigger detected, opening chat sub-session");
        chat_session(console, self.assistant, self.context)?;

        Ok(true)
    }
}
