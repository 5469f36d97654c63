use altenglish_core::audio::{AudioRenderer, AudioReport, AudioStatus};
use altenglish_core::config::AppConfig;
use altenglish_core::core::engine::{AltEnglishEngine, SentenceRun, WordEntry, WordRun};
use altenglish_core::core::text::words;
use altenglish_core::{transliterate, CmuDict, LexiconError, Transliteration};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Transliterate the first word only.
    Word,
    /// Transliterate every word, keeping spacing.
    Sentence,
}

#[derive(Debug, Parser)]
#[command(name = "altenglish", version, about = "Transliterate English words into the AltEnglish feature script")]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Mode::Word)]
    mode: Mode,
    /// ARPAbet phonemes to transliterate directly, e.g. "DH IH1 S".
    #[arg(long, conflicts_with = "text")]
    phones: Option<String>,
    /// CMUdict file (also ALTENGLISH_DICT).
    #[arg(long)]
    dict: Option<PathBuf>,
    /// Binary cache of the parsed dictionary.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// JSON config file (also ALTENGLISH_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where traditional.wav and new.wav are written.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// eSpeak voice.
    #[arg(long)]
    voice: Option<String>,
    /// Skip WAV generation.
    #[arg(long)]
    no_audio: bool,
    /// Keep punctuation in sentence output.
    #[arg(long, overrides_with = "no_preserve_punctuation")]
    preserve_punctuation: bool,
    /// Replace punctuation with spaces in sentence output.
    #[arg(long, overrides_with = "preserve_punctuation")]
    no_preserve_punctuation: bool,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
    /// Input word or sentence; prompts when empty.
    text: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli, &mut stdout().lock()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    let phonemes = altenglish_core::self_check().context("feature table self-check failed")?;
    tracing::debug!(phonemes, "feature table validated");

    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    if let Some(dict) = &cli.dict {
        config.dictionary = Some(dict.clone());
    }
    if let Some(snapshot) = &cli.snapshot {
        config.snapshot = Some(snapshot.clone());
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(voice) = &cli.voice {
        config.voice = voice.clone();
    }
    if cli.no_audio {
        config.audio = false;
    }
    if cli.no_preserve_punctuation {
        config.preserve_punctuation = false;
    } else if cli.preserve_punctuation {
        config.preserve_punctuation = true;
    }

    if let Some(line) = &cli.phones {
        let phones: Vec<&str> = line.split_whitespace().collect();
        let result = transliterate(&phones);
        if cli.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        } else {
            writeln!(out, "\n{} {}", "Phones:".bold(), phones.join(" "))?;
            print_symbols(out, &result)?;
            writeln!(out, "\nAudio generation skipped (no spelled word with --phones).")?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let raw_text = if cli.text.is_empty() {
        prompt(cli.mode)?
    } else {
        cli.text.join(" ")
    };
    let raw_text = raw_text.trim();
    if raw_text.is_empty() {
        writeln!(out, "No input.")?;
        return Ok(ExitCode::SUCCESS);
    }
    let input_words = words(raw_text);
    if input_words.is_empty() {
        writeln!(out, "No valid words found in input.")?;
        return Ok(ExitCode::SUCCESS);
    }

    let engine = load_engine(&config)?;
    let renderer = config.audio.then(|| {
        AudioRenderer::espeak(&config.voice, config.output_dir.clone())
            .with_word_pauses(config.pause_between_words)
    });

    match cli.mode {
        Mode::Word => {
            let word = input_words[0];
            if input_words.len() > 1 {
                eprintln!("{}", "Warning: multiple words detected. Using the first word only.".yellow());
            }
            match engine.run_word(word, renderer.as_ref()) {
                Ok(run) if cli.json => writeln!(out, "{}", serde_json::to_string_pretty(&run)?)?,
                Ok(run) => print_word(out, &run)?,
                Err(LexiconError::NotFound { word }) => {
                    eprintln!("Could not find '{word}' in CMUdict.");
                    eprintln!("Tip: try a different spelling.");
                    return Ok(ExitCode::from(1));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Mode::Sentence => {
            let run = engine.run_sentence(raw_text, config.preserve_punctuation, renderer.as_ref());
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&run)?)?;
            } else {
                print_sentence(out, &run)?;
            }
        }
    }

    if !cli.json {
        writeln!(out, "\nDone.")?;
        print_audio_summary(out, renderer.is_some())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn prompt(mode: Mode) -> Result<String> {
    let label = match mode {
        Mode::Word => "Enter an English word: ",
        Mode::Sentence => "Enter an English sentence: ",
    };
    print!("{label}");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input).context("reading input")?;
    Ok(input)
}

fn load_engine(config: &AppConfig) -> Result<AltEnglishEngine> {
    let source = config
        .dictionary
        .as_deref()
        .ok_or(LexiconError::MissingSource)
        .context("pass --dict or set ALTENGLISH_DICT to a CMUdict file")?;
    let dict = CmuDict::open(source, config.snapshot.as_deref())
        .with_context(|| format!("loading {}", source.display()))?;
    Ok(AltEnglishEngine::new(dict))
}

fn print_symbols(out: &mut impl Write, result: &Transliteration) -> Result<()> {
    writeln!(out, "{} {}", "AltEnglish symbols:".bold(), result.to_display_string())?;
    let unknown = result.unknown_codes();
    if !unknown.is_empty() {
        writeln!(out, "{} {:?}", "Unmapped phones (need adding):".yellow(), unknown)?;
    }
    for diag in &result.diagnostics {
        tracing::debug!(position = diag.position, raw = %diag.raw, error = %diag.error, "diagnostic");
    }
    Ok(())
}

fn print_word(out: &mut impl Write, run: &WordRun) -> Result<()> {
    writeln!(out, "\n{} {}", "CMUdict phones:".bold(), run.report.phones.join(" "))?;
    print_symbols(out, &run.report.transliteration)?;
    if let Some(audio) = &run.audio {
        print_audio(out, audio)?;
    }
    Ok(())
}

fn print_sentence(out: &mut impl Write, run: &SentenceRun) -> Result<()> {
    let report = &run.report;
    writeln!(out, "\n{}", "CMUdict phones (by word):".bold())?;
    for entry in &report.words {
        match entry {
            WordEntry::Found(word) => writeln!(out, "  {}: {}", word.word, word.phones.join(" "))?,
            WordEntry::NotFound { word } => writeln!(out, "  {word}: <not found>")?,
        }
    }

    writeln!(out, "\n{}", "AltEnglish symbols (by word):".bold())?;
    for entry in &report.words {
        match entry {
            WordEntry::Found(word) => {
                writeln!(out, "  {}: {}", word.word, word.transliteration.to_display_string())?;
            }
            WordEntry::NotFound { word } => writeln!(out, "  {word}: <?>({word})")?,
        }
    }

    writeln!(out, "\n{}", "AltEnglish symbols (sentence):".bold())?;
    writeln!(out, "{}", report.rendered)?;

    if !report.missing_words.is_empty() {
        writeln!(out, "\n{} {:?}", "Words not found in CMUdict:".yellow(), report.missing_words)?;
    }
    if !report.unmapped.is_empty() {
        writeln!(out, "{} {:?}", "Unmapped phones (need adding):".yellow(), report.unmapped)?;
    }
    if let Some(audio) = &run.audio {
        print_audio(out, audio)?;
    }
    Ok(())
}

fn print_audio(out: &mut impl Write, audio: &AudioReport) -> Result<()> {
    if !audio.missing.is_empty() {
        writeln!(
            out,
            "\n{} {:?}",
            "[Audio] Warning: some phones missing for eSpeak phoneme mode:".yellow(),
            audio.missing
        )?;
        writeln!(out, "        The 'new.wav' may be approximate.")?;
    }
    for (label, status) in [("traditional", &audio.traditional), ("new", &audio.respelled)] {
        if let AudioStatus::Skipped(reason) = status {
            writeln!(out, "{} {label}: {reason}", "[Audio] skipped".yellow())?;
        }
    }
    let written: Vec<_> = [&audio.traditional, &audio.respelled]
        .into_iter()
        .filter_map(AudioStatus::path)
        .collect();
    if !written.is_empty() {
        writeln!(out, "\nAudio files written to:")?;
        for path in written {
            writeln!(out, "  - {}", path.display())?;
        }
    }
    Ok(())
}

fn print_audio_summary(out: &mut impl Write, enabled: bool) -> Result<()> {
    if !enabled {
        writeln!(out, "\nAudio generation skipped (--no-audio).")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_cli(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(std::iter::once("altenglish").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn write_dict(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("cmudict.dict");
        std::fs::write(&path, "this DH IH1 S\nis IH1 Z\n").unwrap();
        path.display().to_string()
    }

    #[test]
    fn json_word_output_is_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir);
        let out = run_cli(&["--dict", &dict, "--no-audio", "--json", "this"]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["report"]["word"], "this");
        assert_eq!(value["report"]["transliteration"]["symbols"][0], "∆~·");
        assert!(value["audio"].is_null());
    }

    #[test]
    fn json_sentence_output_is_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir);
        let out = run_cli(&["-m", "sentence", "--dict", &dict, "--no-audio", "--json", "this", "is", "odd"]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["report"]["missing_words"], serde_json::json!(["odd"]));
    }

    #[test]
    fn json_phones_output_is_one_document() {
        let out = run_cli(&["--json", "--phones", "DH IH1 S"]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["symbols"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn text_output_ends_with_done() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir);
        let out = run_cli(&["--dict", &dict, "--no-audio", "this"]);
        assert!(out.contains("Done."));
        assert!(out.contains("DH IH1 S"));
    }
}
