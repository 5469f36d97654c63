// File: src/audio.rs
//! Speech synthesis boundary.
//!
//! Two requests are built per run: the spelled text as a baseline and an
//! eSpeak phoneme string derived from the ARPAbet tokens. AltEnglish glyphs are
//! never sent to the synthesizer.

use serde::Serialize;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::types::{Consonant, Phoneme, PhonemeToken, Stress, Vowel};
use crate::error::SynthesisError;
use crate::lexicon::Pronunciation;

pub const TRADITIONAL_FILE: &str = "traditional.wav";
pub const RESPELLED_FILE: &str = "new.wav";
pub const DEFAULT_VOICE: &str = "en";

const WORD_PAUSE: &str = "_";

/// eSpeak phoneme mnemonic for an ARPAbet phoneme.
pub fn espeak_phoneme(phoneme: Phoneme) -> &'static str {
    match phoneme {
        Phoneme::Consonant(c) => match c {
            Consonant::P => "p", Consonant::B => "b", Consonant::M => "m",
            Consonant::W => "w", Consonant::F => "f", Consonant::V => "v",
            Consonant::Th => "T", Consonant::Dh => "D",
            Consonant::T => "t", Consonant::D => "d", Consonant::S => "s",
            Consonant::Z => "z", Consonant::N => "n", Consonant::L => "l",
            Consonant::R => "r",
            Consonant::Sh => "S", Consonant::Zh => "Z", Consonant::Ch => "tS",
            Consonant::Jh => "dZ", Consonant::Y => "j",
            Consonant::K => "k", Consonant::G => "g", Consonant::Ng => "N",
            Consonant::Hh => "h",
        },
        Phoneme::Vowel(v) => match v {
            Vowel::Iy => "i:", Vowel::Ih => "I", Vowel::Uw => "u:", Vowel::Uh => "U",
            Vowel::Ey => "eI", Vowel::Eh => "E", Vowel::Ax => "@", Vowel::Er => "3:",
            Vowel::Ow => "oU", Vowel::Oy => "OI",
            Vowel::Ae => "a", Vowel::Aw => "aU", Vowel::Ah => "V", Vowel::Ay => "aI",
            Vowel::Aa => "A:", Vowel::Ao => "O:",
        },
    }
}

/// eSpeak form of one token; stress marks precede the vowel.
pub fn espeak_token(token: &PhonemeToken) -> String {
    let stress = match token.stress() {
        Stress::Unstressed => "",
        Stress::Primary => "'",
        Stress::Secondary => ",",
    };
    format!("{stress}{}", espeak_phoneme(token.phoneme()))
}

/// A `[[...]]` phoneme string plus the raw tokens that had to be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhonemeRendering {
    pub text: Option<String>,
    pub missing: Vec<String>,
}

/// Renders one or more words worth of ARPAbet into eSpeak notation.
/// `text` is `None` when nothing could be rendered.
pub fn espeak_phoneme_string(groups: &[Pronunciation], pause_between_words: bool) -> PhonemeRendering {
    let mut parts: Vec<String> = Vec::new();
    let mut missing = Vec::new();
    for group in groups {
        if pause_between_words && !parts.is_empty() {
            parts.push(WORD_PAUSE.to_string());
        }
        for raw in group {
            match PhonemeToken::parse(raw) {
                Ok(token) => parts.push(espeak_token(&token)),
                Err(_) => missing.push(raw.trim().to_string()),
            }
        }
    }
    if parts.last().map(String::as_str) == Some(WORD_PAUSE) {
        parts.pop();
    }

    let text = if parts.is_empty() {
        None
    } else {
        Some(format!("[[{}]]", parts.join(" ")))
    };
    PhonemeRendering { text, missing }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SynthesisInput {
    /// Ordinary spelling, pronounced by the backend's own rules.
    Text(String),
    /// Backend phoneme notation.
    Phonemes(String),
}

impl SynthesisInput {
    pub fn as_str(&self) -> &str {
        match self {
            SynthesisInput::Text(s) | SynthesisInput::Phonemes(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisRequest {
    pub input: SynthesisInput,
    pub output: PathBuf,
}

/// Both requests for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioPlan {
    pub traditional: SynthesisRequest,
    pub respelled: Option<SynthesisRequest>,
    pub missing: Vec<String>,
}

pub fn build_requests(
    text: &str,
    groups: &[Pronunciation],
    output_dir: &Path,
    pause_between_words: bool,
) -> AudioPlan {
    let rendering = espeak_phoneme_string(groups, pause_between_words);
    AudioPlan {
        traditional: SynthesisRequest {
            input: SynthesisInput::Text(text.trim().to_string()),
            output: output_dir.join(TRADITIONAL_FILE),
        },
        respelled: rendering.text.map(|phonemes| SynthesisRequest {
            input: SynthesisInput::Phonemes(phonemes),
            output: output_dir.join(RESPELLED_FILE),
        }),
        missing: rendering.missing,
    }
}

pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;
    fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError>;
}

/// Runs `espeak-ng` (or `espeak`) as a child process.
#[derive(Clone, Debug)]
pub struct EspeakSynthesizer {
    program: PathBuf,
    voice: String,
}

impl EspeakSynthesizer {
    pub fn new(program: impl Into<PathBuf>, voice: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice: voice.into(),
        }
    }

    /// Prefers `espeak-ng`, falls back to `espeak`.
    pub fn locate(voice: &str) -> Result<Self, SynthesisError> {
        ["espeak-ng", "espeak"]
            .into_iter()
            .find_map(find_on_path)
            .map(|program| Self::new(program, voice))
            .ok_or_else(|| SynthesisError::Unavailable {
                reason: "espeak-ng/espeak not found on PATH".to_string(),
            })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `-v <voice> -w <wav> -- <input>`; the `--` keeps text such as
    /// `-q hello` from being read as options.
    fn command_args(&self, request: &SynthesisRequest) -> Vec<OsString> {
        vec![
            "-v".into(),
            self.voice.as_str().into(),
            "-w".into(),
            request.output.clone().into_os_string(),
            "--".into(),
            request.input.as_str().into(),
        ]
    }
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn name(&self) -> &str {
        "espeak"
    }

    fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        if let Some(parent) = request.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let output = Command::new(&self.program)
            .args(self.command_args(request))
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SynthesisError::Unavailable {
                    reason: format!("{} could not be started", self.program.display()),
                },
                _ => SynthesisError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                program = %self.program.display(),
                code = ?output.status.code(),
                stderr = %stderr.trim(),
                "speech synthesis command failed"
            );
            return Err(SynthesisError::Failed {
                program: self.program.display().to_string(),
                code: output.status.code(),
            });
        }
        Ok(())
    }
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// Outcome for one audio file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AudioStatus {
    Written(PathBuf),
    Skipped(String),
}

impl AudioStatus {
    pub fn path(&self) -> Option<&Path> {
        match self {
            AudioStatus::Written(path) => Some(path),
            AudioStatus::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioReport {
    pub traditional: AudioStatus,
    pub respelled: AudioStatus,
    /// Raw tokens left out of the phoneme request.
    pub missing: Vec<String>,
}

/// Runs audio plans against a backend, turning every failure into a report
/// entry instead of an error.
pub struct AudioRenderer {
    backend: Result<Box<dyn SpeechSynthesizer>, String>,
    output_dir: PathBuf,
    pause_between_words: bool,
}

impl AudioRenderer {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Ok(synthesizer),
            output_dir: output_dir.into(),
            pause_between_words: true,
        }
    }

    /// A renderer that skips everything, for when no backend could be found.
    pub fn unavailable(reason: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Err(reason.into()),
            output_dir: output_dir.into(),
            pause_between_words: true,
        }
    }

    /// Locates eSpeak; a missing binary yields an `unavailable` renderer.
    pub fn espeak(voice: &str, output_dir: impl Into<PathBuf>) -> Self {
        match EspeakSynthesizer::locate(voice) {
            Ok(espeak) => {
                tracing::debug!(program = %espeak.program().display(), "speech backend located");
                Self::new(Box::new(espeak), output_dir)
            }
            Err(err) => Self::unavailable(err.to_string(), output_dir),
        }
    }

    pub fn with_word_pauses(mut self, pause_between_words: bool) -> Self {
        self.pause_between_words = pause_between_words;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_ok()
    }

    pub fn render(&self, text: &str, groups: &[Pronunciation]) -> AudioReport {
        let plan = build_requests(text, groups, &self.output_dir, self.pause_between_words);
        if !plan.missing.is_empty() {
            tracing::warn!(missing = ?plan.missing, "phonemes left out of the phoneme request");
        }

        let backend = match &self.backend {
            Ok(backend) => backend,
            Err(reason) => {
                tracing::warn!(%reason, "audio generation skipped");
                return AudioReport {
                    traditional: AudioStatus::Skipped(reason.clone()),
                    respelled: AudioStatus::Skipped(reason.clone()),
                    missing: plan.missing,
                };
            }
        };

        let traditional = run_request(backend.as_ref(), &plan.traditional);
        let respelled = match &plan.respelled {
            Some(request) => run_request(backend.as_ref(), request),
            None => AudioStatus::Skipped("no phonemes available".to_string()),
        };
        AudioReport {
            traditional,
            respelled,
            missing: plan.missing,
        }
    }
}

fn run_request(backend: &dyn SpeechSynthesizer, request: &SynthesisRequest) -> AudioStatus {
    match backend.synthesize(request) {
        Ok(()) => AudioStatus::Written(request.output.clone()),
        Err(err) => {
            tracing::warn!(backend = backend.name(), %err, output = %request.output.display(), "synthesis failed");
            AudioStatus::Skipped(err.to_string())
        }
    }
}
