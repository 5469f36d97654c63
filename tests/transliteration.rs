use altenglish_core::audio::{AudioRenderer, AudioStatus, SpeechSynthesizer, SynthesisInput, SynthesisRequest};
use altenglish_core::core::modifiers::PRIMARY_STRESS;
use altenglish_core::{
    compose, transliterate, AltEnglishEngine, CmuDict, LexiconError, PhonemeToken, SynthesisError,
};
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<SynthesisRequest>>>,
}

impl SpeechSynthesizer for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn synthesize(&self, request: &SynthesisRequest) -> Result<(), SynthesisError> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(())
    }
}

const DICT: &str = ";;; test dictionary
language  L AE1 NG G W AH0 JH
language(2)  L AE1 NG G W IH0 JH
this  DH IH1 S
is  IH1 Z
";

fn write_dict(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("cmudict.dict");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(DICT.as_bytes()).unwrap();
    path
}

#[test]
fn language_has_one_symbol_per_phoneme() {
    let result = transliterate(&["L", "AE1", "NG", "G", "W", "IH0", "JH"]);
    assert_eq!(result.len(), 7);
    assert!(result.is_clean());

    let primary = compose(&PhonemeToken::parse("AE1").unwrap()).unwrap();
    let unstressed = compose(&PhonemeToken::parse("AE0").unwrap()).unwrap();
    assert_eq!(result.symbols[1], primary);
    assert_eq!(
        primary.as_str(),
        format!("{}{}", unstressed.as_str(), PRIMARY_STRESS)
    );
}

#[test]
fn stress_levels_differ_only_in_the_stress_fragment() {
    let forms: Vec<String> = ["AE0", "AE1", "AE2"]
        .iter()
        .map(|raw| compose(&PhonemeToken::parse(raw).unwrap()).unwrap().to_string())
        .collect();
    assert_ne!(forms[0], forms[1]);
    assert_ne!(forms[1], forms[2]);
    assert!(forms[1].starts_with(&forms[0]));
    assert!(forms[2].starts_with(&forms[0]));
}

#[test]
fn this_transliterates_cleanly() {
    let result = transliterate(&["DH", "IH1", "S"]);
    assert_eq!(result.len(), 3);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn output_is_deterministic_and_ordered() {
    let input = ["S", "T", "AA1", "P"];
    let first = transliterate(&input);
    let second = transliterate(&input);
    assert_eq!(first, second);

    let reversed: Vec<&str> = input.iter().rev().copied().collect();
    let backwards = transliterate(&reversed);
    let mut expected = first.symbols.clone();
    expected.reverse();
    assert_eq!(backwards.symbols, expected);
}

#[test]
fn unknown_tokens_degrade_to_placeholders() {
    let result = transliterate(&["K", "QQ1", "T"]);
    assert_eq!(result.len(), 3);
    assert_eq!(result.symbols[1].as_str(), "<?>(QQ1)");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].position, 1);
    assert_eq!(result.unknown_codes(), vec!["QQ"]);
}

#[test]
fn dictionary_file_drives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dict(&dir);
    let dict = CmuDict::open(&path, Some(&dir.path().join("cmudict.bin"))).unwrap();
    assert_eq!(dict.len(), 3);

    let engine = AltEnglishEngine::new(dict);
    let report = engine.transliterate_word("Language").unwrap();
    assert_eq!(report.variants, 2);
    assert_eq!(report.phones, vec!["L", "AE1", "NG", "G", "W", "AH0", "JH"]);
    assert_eq!(report.transliteration.len(), 7);

    // Second open is served from the snapshot.
    assert!(dir.path().join("cmudict.bin").exists());
    let cached = CmuDict::open(&path, Some(&dir.path().join("cmudict.bin"))).unwrap();
    assert!(cached.contains("this"));
}

#[test]
fn missing_word_never_reaches_the_synthesizer() {
    let dir = tempfile::tempdir().unwrap();
    let engine = AltEnglishEngine::new(CmuDict::from_path(&write_dict(&dir)).unwrap());
    let recorder = Recorder::default();
    let renderer = AudioRenderer::new(Box::new(recorder.clone()), dir.path().join("output"));

    let err = engine.run_word("zzyzx", Some(&renderer)).unwrap_err();
    assert!(matches!(err, LexiconError::NotFound { .. }));
    assert!(recorder.calls.lock().unwrap().is_empty());
}

#[test]
fn found_word_requests_both_recordings() {
    let dir = tempfile::tempdir().unwrap();
    let engine = AltEnglishEngine::new(CmuDict::from_path(&write_dict(&dir)).unwrap());
    let recorder = Recorder::default();
    let renderer = AudioRenderer::new(Box::new(recorder.clone()), dir.path().join("output"));

    let run = engine.run_word("this", Some(&renderer)).unwrap();
    let audio = run.audio.unwrap();
    assert_eq!(audio.traditional, AudioStatus::Written(dir.path().join("output/traditional.wav")));
    assert_eq!(audio.respelled, AudioStatus::Written(dir.path().join("output/new.wav")));

    let calls = recorder.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].input, SynthesisInput::Text("this".to_string()));
    assert_eq!(calls[1].input, SynthesisInput::Phonemes("[[D 'I s]]".to_string()));
}

#[test]
fn sentence_run_skips_audio_without_a_backend() {
    let dir = tempfile::tempdir().unwrap();
    let engine = AltEnglishEngine::new(CmuDict::from_path(&write_dict(&dir)).unwrap());
    let renderer = AudioRenderer::unavailable("espeak not installed", dir.path());

    let run = engine.run_sentence("This is language.", true, Some(&renderer));
    assert!(run.report.missing_words.is_empty());
    assert!(run.report.rendered.ends_with('.'));
    let audio = run.audio.unwrap();
    assert!(audio.traditional.path().is_none());
    assert!(audio.respelled.path().is_none());
}
