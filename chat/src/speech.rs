//! Speech input.
//!
//! A `SpeechSource` produces at most one transcript per start/stop cycle
//! and delivers it to the single handler registered for its lifetime.
//! `VoiceInput` is the listening toggle the front-end drives.

use std::fmt::Debug;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Channel end a source delivers transcripts into
pub type TranscriptSender = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No speech recogniser configured")]
    NotConfigured,
    #[error("Failed to start recogniser '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Speech adapter error: {0}")]
    Adapter(String),
}

pub type SpeechResult<T> = Result<T, SpeechError>;

#[async_trait]
pub trait SpeechSource: Send + Sync + Debug {
    /// Register (or with `None`, detach) the transcript handler
    fn set_handler(&self, handler: Option<TranscriptSender>);

    /// Begin capturing one utterance
    async fn start(&self, locale: &str) -> SpeechResult<()>;

    /// Abandon the current capture, if any
    async fn stop(&self) -> SpeechResult<()>;

    /// Stop capturing and detach the handler
    async fn destroy(&self) -> SpeechResult<()> {
        let stopped = self.stop().await;
        self.set_handler(None);
        stopped
    }
}

/// Platform gate for audio capture
#[async_trait]
pub trait MicrophonePermission: Send + Sync + Debug {
    async fn request(&self) -> bool;
}

/// Fixed answer, for platforms without a runtime permission prompt
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub bool);

impl StaticPermission {
    pub fn granted() -> Self {
        Self(true)
    }

    pub fn denied() -> Self {
        Self(false)
    }
}

#[async_trait]
impl MicrophonePermission for StaticPermission {
    async fn request(&self) -> bool {
        self.0
    }
}

/// Runs an external recogniser and treats its stdout as the transcript.
///
/// Any `{locale}` argument is replaced by the requested locale, which is
/// also exported as `SPEECH_LOCALE`. Only a successful exit with non-blank
/// output produces a transcript.
#[derive(Debug)]
pub struct CommandSpeechSource {
    program: String,
    args: Vec<String>,
    handler: Arc<Mutex<Option<TranscriptSender>>>,
    capture: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSpeechSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            handler: Arc::new(Mutex::new(None)),
            capture: Mutex::new(None),
        }
    }

    /// Build from a `[program, args...]` list
    pub fn from_command_line(command: &[String]) -> SpeechResult<Self> {
        let (program, args) = command.split_first().ok_or(SpeechError::NotConfigured)?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    fn cancel_capture(&self) -> SpeechResult<bool> {
        let mut capture = self
            .capture
            .lock()
            .map_err(|e| SpeechError::Adapter(format!("capture lock poisoned: {}", e)))?;
        Ok(match capture.take() {
            // A finished capture has already dropped its receiver
            Some(cancel) => cancel.send(()).is_ok(),
            None => false,
        })
    }
}

#[async_trait]
impl SpeechSource for CommandSpeechSource {
    fn set_handler(&self, handler: Option<TranscriptSender>) {
        match self.handler.lock() {
            Ok(mut slot) => *slot = handler,
            Err(e) => error!(error = %e, "Speech handler lock poisoned"),
        }
    }

    async fn start(&self, locale: &str) -> SpeechResult<()> {
        if self.cancel_capture()? {
            debug!("Replacing running speech capture");
        }

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{locale}", locale))
            .collect();

        let child = Command::new(&self.program)
            .args(&args)
            .env("SPEECH_LOCALE", locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        info!(program = %self.program, locale, "Speech capture started");

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.capture
            .lock()
            .map_err(|e| SpeechError::Adapter(format!("capture lock poisoned: {}", e)))?
            .replace(cancel_tx);

        let handler = self.handler.clone();
        tokio::spawn(async move {
            tokio::select! {
                output = child.wait_with_output() => match output {
                    Ok(output) if output.status.success() => {
                        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
                        if transcript.is_empty() {
                            debug!("Recogniser produced no speech");
                            return;
                        }
                        let sender = handler.lock().ok().and_then(|slot| slot.clone());
                        match sender {
                            Some(sender) => {
                                if sender.send(transcript).is_err() {
                                    warn!("Transcript handler is gone");
                                }
                            }
                            None => debug!("No transcript handler attached"),
                        }
                    }
                    Ok(output) => warn!(status = %output.status, "Recogniser exited unsuccessfully"),
                    Err(e) => error!(error = %e, "Failed waiting for recogniser"),
                },
                _ = cancel_rx => debug!("Speech capture cancelled"),
            }
        });

        Ok(())
    }

    async fn stop(&self) -> SpeechResult<()> {
        if self.cancel_capture()? {
            info!("Speech capture stopped");
        }
        Ok(())
    }
}

/// The voice toggle: idle or listening, never both
#[derive(Debug)]
pub struct VoiceInput {
    source: Arc<dyn SpeechSource>,
    permission: Arc<dyn MicrophonePermission>,
    locale: String,
    listening: bool,
}

impl VoiceInput {
    /// Register `handler` on `source` for the lifetime of this toggle
    pub fn attach(
        source: Arc<dyn SpeechSource>,
        permission: Arc<dyn MicrophonePermission>,
        locale: impl Into<String>,
        handler: TranscriptSender,
    ) -> Self {
        source.set_handler(Some(handler));
        Self {
            source,
            permission,
            locale: locale.into(),
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Ask for the microphone and start a capture. Returns the new state.
    pub async fn start_listening(&mut self) -> bool {
        if self.listening {
            return true;
        }
        if !self.permission.request().await {
            info!("Permission to use microphone denied");
            return false;
        }

        self.listening = true;
        if let Err(e) = self.source.start(&self.locale).await {
            error!(error = %e, "Error starting voice recognition");
            self.listening = false;
        }
        self.listening
    }

    pub async fn stop_listening(&mut self) {
        self.listening = false;
        if let Err(e) = self.source.stop().await {
            error!(error = %e, "Error stopping voice recognition");
        }
    }

    /// Flip between listening and idle. Returns the new state.
    pub async fn toggle(&mut self) -> bool {
        if self.listening {
            self.stop_listening().await;
            false
        } else {
            self.start_listening().await
        }
    }

    /// The source delivered its utterance and went idle
    pub fn transcript_received(&mut self) {
        self.listening = false;
    }

    /// Stop any capture and detach the handler
    pub async fn teardown(mut self) {
        self.listening = false;
        if let Err(e) = self.source.destroy().await {
            error!(error = %e, "Error tearing down voice recognition");
        }
    }
}
