//! The greeter: a person's name plus a greeting that can be translated and
//! written to a page.
//!
//! Identity (first and last name) is fixed at construction. The current
//! message and its language live behind one lock, so a language change commits
//! both together. Operations that may wait on a translation return a
//! [`Pending`]; nothing coordinates overlapping translations, so the last one
//! to finish wins.

use crate::config::Config;
use crate::console::{Console, TracingConsole};
use crate::display::Page;
use crate::error::{GreeterError, Result};
use crate::pending::Pending;
use crate::translation::{GoogleTranslator, Translator};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Language every greeting level is written in.
pub const CANONICAL_LANGUAGE: &str = "en";

pub const INFORMAL_LEVEL: &str = "Hello";
pub const FORMAL_LEVEL: &str = "Greetings";
pub const LOGGED_IN_LEVEL: &str = "Logged in";

pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct State {
    language: String,
    message: String,
}

pub struct Greeter {
    first_name: String,
    last_name: String,
    state: Arc<Mutex<State>>,
    translator: Arc<dyn Translator>,
    page: Option<Arc<dyn Page>>,
    console: Arc<dyn Console>,
    display_delay: Duration,
}

impl Greeter {
    /// Create a greeter. An empty `language` means English.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        language: impl Into<String>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let language = language.into();
        let language = if language.is_empty() {
            CANONICAL_LANGUAGE.to_string()
        } else {
            language
        };

        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            state: Arc::new(Mutex::new(State {
                language,
                message: INFORMAL_LEVEL.to_string(),
            })),
            translator,
            page: None,
            console: Arc::new(TracingConsole),
            display_delay: DEFAULT_DISPLAY_DELAY,
        }
    }

    /// Create a greeter backed by Google Translate, in the configured language.
    pub fn from_config(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        config: &Config,
    ) -> Self {
        let translator = GoogleTranslator::from_config(reqwest::Client::new(), config);
        Self::new(first_name, last_name, config.language.clone(), Arc::new(translator))
            .with_display_delay(config.display_delay)
    }

    pub fn with_page(mut self, page: Arc<dyn Page>) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn with_display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn language(&self) -> String {
        self.state().language.clone()
    }

    pub fn message(&self) -> String {
        self.state().message.clone()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Switch the greeting to `level`.
    ///
    /// English greeters update the message immediately and return a ready
    /// handle. Any other language starts a translation; the message changes
    /// only once it succeeds.
    pub fn set_greet_level(&self, level: &str) -> Pending<String> {
        let language = {
            let mut state = self.state();
            if state.language == CANONICAL_LANGUAGE {
                state.message = level.to_string();
                return Pending::ready(level.to_string());
            }
            state.language.clone()
        };

        Pending::spawn(translate_level(
            Arc::clone(&self.translator),
            Arc::clone(&self.state),
            level.to_string(),
            language,
        ))
    }

    /// Informal greeting. `callback` receives `"<text> <first name>"` as soon
    /// as the translated level is available, whether or not the returned
    /// handle is awaited.
    pub fn greeting<F>(&self, callback: F) -> Pending<String>
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let first_name = self.first_name.clone();
        self.set_greet_level(INFORMAL_LEVEL).then(move |text| {
            let greeting = format!("{} {}", text, first_name);
            callback(&greeting);
            greeting
        })
    }

    /// Formal greeting, composed from the message as it stands right now.
    ///
    /// The switch to the formal level is started but not awaited, so a
    /// non-English greeter returns the previous message here. Use
    /// [`Greeter::formal_greeting_settled`] to wait for the translation.
    pub fn formal_greeting(&self) -> String {
        drop(self.set_greet_level(FORMAL_LEVEL));
        format!("{} {}", self.message(), self.full_name())
    }

    /// Formal greeting composed after the formal level has been translated.
    pub async fn formal_greeting_settled(&self) -> Result<String> {
        let text = self.set_greet_level(FORMAL_LEVEL).await?;
        Ok(format!("{} {}", text, self.full_name()))
    }

    pub fn create_msg(&self, formal: bool) -> Pending<String> {
        if formal {
            Pending::ready(self.formal_greeting())
        } else {
            self.greeting(|_| {})
        }
    }

    /// Greet on the console with `"<text> <first name>"`.
    pub fn greet(&self, formal: bool) -> Pending<String> {
        let level = if formal { FORMAL_LEVEL } else { INFORMAL_LEVEL };
        let first_name = self.first_name.clone();
        let console = Arc::clone(&self.console);

        self.set_greet_level(level).then(move |text| {
            let line = format!("{} {}", text, first_name);
            console.line(&line);
            line
        })
    }

    /// Write `"<message>: <full name>"` to the console, then switch to the
    /// logged-in level.
    pub fn log(&self) -> &Self {
        let line = format!("{}: {}", self.message(), self.full_name());
        self.console.line(&line);
        drop(self.set_greet_level(LOGGED_IN_LEVEL));
        self
    }

    /// After the display delay, write `"<message> <full name>"` into every
    /// element matching `selector`.
    ///
    /// A missing page or empty selector is rejected before anything is
    /// scheduled. A selector that matches nothing when the write fires
    /// resolves the handle with [`GreeterError::ElementNotFound`].
    pub fn change_html_to_greeting(&self, selector: &str) -> Result<Pending<()>> {
        let page = self.page.clone().ok_or_else(|| {
            GreeterError::MissingDependency("no page attached to greeter".to_string())
        })?;
        if selector.trim().is_empty() {
            return Err(GreeterError::InvalidArgument("missing selector".to_string()));
        }

        Ok(Pending::spawn(write_greeting(
            page,
            Arc::clone(&self.state),
            selector.to_string(),
            self.full_name(),
            self.display_delay,
        )))
    }

    /// Translate the current message into `new_language`, then commit the
    /// translated message and the new language together.
    pub fn set_language(&self, new_language: &str) -> Result<Pending<String>> {
        let (old_language, message) = {
            let state = self.state();
            (state.language.clone(), state.message.clone())
        };

        if new_language == old_language {
            return Err(GreeterError::InvalidArgument(
                "must designate a new language".to_string(),
            ));
        }
        if new_language.trim().is_empty() {
            return Err(GreeterError::InvalidArgument("missing language".to_string()));
        }

        Ok(Pending::spawn(translate_language(
            Arc::clone(&self.translator),
            Arc::clone(&self.state),
            message,
            old_language,
            new_language.to_string(),
        )))
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }
}

impl std::fmt::Debug for Greeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Greeter")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("state", &*self.state())
            .field("has_page", &self.page.is_some())
            .field("display_delay", &self.display_delay)
            .finish()
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn translate_level(
    translator: Arc<dyn Translator>,
    state: Arc<Mutex<State>>,
    level: String,
    language: String,
) -> Result<String> {
    let translated = match translator.translate(&level, CANONICAL_LANGUAGE, &language).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to translate '{}' to {}: {}", level, language, e);
            return Err(e);
        }
    };

    lock(&state).message = translated.clone();
    Ok(translated)
}

async fn translate_language(
    translator: Arc<dyn Translator>,
    state: Arc<Mutex<State>>,
    message: String,
    old_language: String,
    new_language: String,
) -> Result<String> {
    let translated = match translator.translate(&message, &old_language, &new_language).await {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "Failed to switch language from {} to {}: {}",
                old_language, new_language, e
            );
            return Err(e);
        }
    };

    let mut state = lock(&state);
    state.message = translated.clone();
    state.language = new_language;
    Ok(translated)
}

async fn write_greeting(
    page: Arc<dyn Page>,
    state: Arc<Mutex<State>>,
    selector: String,
    full_name: String,
    delay: Duration,
) -> Result<()> {
    tokio::time::sleep(delay).await;

    if page.matches(&selector) == 0 {
        return Err(GreeterError::ElementNotFound(selector));
    }

    let message = lock(&state).message.clone();
    debug!("message: {}", message);
    page.set_inner_html(&selector, &format!("{} {}", message, full_name));
    Ok(())
}
