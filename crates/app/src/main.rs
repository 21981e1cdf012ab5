//! NovaVox command-line adapter
//!
//! Thin boundary layer over the inference runtime: wires the three sessions,
//! the vocabulary tables, and the vocoder together, and exposes the boundary
//! operations (load / transcribe / generate / synthesize / status /
//! unload-all) over files. All real behavior lives in the library crates.

mod audio_io;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use novavox_audio::Vocoder;
use novavox_foundation::{ModelKind, RuntimeConfig};
use novavox_llm::{GenerationPipeline, GenerationRequest, LlmSession, SamplingParams};
use novavox_session::{
    ManagedSession, InferenceSession, ModelRegistry, NullBackend, SessionConfig,
};
use novavox_stt::{SttSession, TranscriptionPipeline};
use novavox_tts::{SynthesisPipeline, SynthesisRequest, TtsSession, Voice};
use novavox_vocab::Vocabulary;

#[derive(Parser)]
#[command(name = "novavox", about = "On-device STT / LLM / TTS inference runtime")]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(long, default_value = "novavox.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load one model and report the outcome
    Load {
        /// Model kind: stt, llm, or tts
        kind: ModelKind,
        /// Model artifact path (defaults to the configured path)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Transcribe a PCM or WAV file to text
    Transcribe {
        /// Input audio: raw PCM16 mono 16 kHz, or a matching .wav
        input: PathBuf,
    },
    /// Generate a completion for a prompt
    Generate {
        prompt: String,
        #[arg(long, default_value = "You are a helpful voice assistant.")]
        system: String,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        top_p: Option<f32>,
    },
    /// Synthesize text to audio
    Synthesize {
        text: String,
        /// Output path: .wav for a container, anything else for raw PCM
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        voice: Option<String>,
        #[arg(long)]
        speed: Option<f32>,
        /// Synthesize sentence-by-sentence via the streaming path
        #[arg(long)]
        stream: bool,
    },
    /// Load configured models (best-effort) and print loaded-status
    Status,
    /// Unload every session, best-effort, and print the resulting status
    UnloadAll,
}

/// The three sessions plus the registry aggregating them.
struct Runtime {
    config: RuntimeConfig,
    stt: Arc<SttSession>,
    llm: Arc<LlmSession>,
    tts: Arc<TtsSession>,
    registry: ModelRegistry,
}

impl Runtime {
    fn new(config: RuntimeConfig) -> Self {
        let base = SessionConfig {
            busy_policy: config.busy_policy,
            ..SessionConfig::default()
        };
        let llm_config = SessionConfig {
            context_size: config.llm.context_size,
            n_threads: config.llm.n_threads,
            ..base.clone()
        };

        let stt: Arc<SttSession> = Arc::new(InferenceSession::new(
            ModelKind::Stt,
            base.clone(),
            Box::new(NullBackend::new()),
        ));
        let llm: Arc<LlmSession> = Arc::new(InferenceSession::new(
            ModelKind::Llm,
            llm_config,
            Box::new(NullBackend::new()),
        ));
        let tts: Arc<TtsSession> = Arc::new(InferenceSession::new(
            ModelKind::Tts,
            base,
            Box::new(NullBackend::new()),
        ));

        let mut registry = ModelRegistry::new();
        registry.register(stt.clone() as Arc<dyn ManagedSession>);
        registry.register(llm.clone() as Arc<dyn ManagedSession>);
        registry.register(tts.clone() as Arc<dyn ManagedSession>);

        Self {
            config,
            stt,
            llm,
            tts,
            registry,
        }
    }

    fn load_kind(&self, kind: ModelKind, path: Option<&PathBuf>) -> Result<()> {
        let configured;
        let path = match path {
            Some(p) => p,
            None => {
                configured = match kind {
                    ModelKind::Stt => self.config.stt.model_path.clone(),
                    ModelKind::Llm => self.config.llm.model_path.clone(),
                    ModelKind::Tts => self.config.tts.model_path.clone(),
                };
                &configured
            }
        };
        match kind {
            ModelKind::Stt => self.stt.load(path)?,
            ModelKind::Llm => self.llm.load(path)?,
            ModelKind::Tts => self.tts.load(path)?,
        }
        Ok(())
    }

    /// Best-effort bulk load for status reporting; failures are logged, not
    /// fatal.
    fn load_all_best_effort(&self) {
        for kind in ModelKind::ALL {
            if let Err(e) = self.load_kind(kind, None) {
                tracing::debug!(kind = %kind, error = %e, "model not loaded");
            }
        }
    }

    fn print_status(&self) -> Result<()> {
        let report = serde_json::json!({
            "status": self.registry.status(),
            "sessions": self.registry.describe(),
            "audio": {
                "sample_rate_hz": novavox_audio::SAMPLE_RATE_HZ,
                "hop_length": novavox_audio::HOP_LENGTH,
                "n_mels": novavox_audio::N_MELS,
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RuntimeConfig::load(&cli.config)?;
    let runtime = Runtime::new(config);

    match cli.command {
        Command::Load { kind, path } => {
            runtime.load_kind(kind, path.as_ref())?;
            println!("{}", serde_json::json!({ "kind": kind, "loaded": true }));
        }
        Command::Transcribe { input } => {
            runtime.load_kind(ModelKind::Stt, None)?;
            let vocab = Vocabulary::from_path(&runtime.config.stt.vocab_path)?.shared();
            let pipeline = TranscriptionPipeline::new(runtime.stt.clone(), vocab);
            let pcm = audio_io::read_pcm(&input)?;
            let text = pipeline.transcribe(&pcm)?;
            println!("{text}");
        }
        Command::Generate {
            prompt,
            system,
            max_tokens,
            temperature,
            top_p,
        } => {
            runtime.load_kind(ModelKind::Llm, None)?;
            let defaults = SamplingParams::default();
            let request = GenerationRequest {
                prompt,
                system_prompt: system,
                history: Vec::new(),
                params: SamplingParams {
                    max_tokens: max_tokens.unwrap_or(defaults.max_tokens),
                    temperature: temperature.unwrap_or(defaults.temperature),
                    top_p: top_p.unwrap_or(defaults.top_p),
                },
            };
            let pipeline = GenerationPipeline::new(runtime.llm.clone());
            println!("{}", pipeline.generate(&request)?);
        }
        Command::Synthesize {
            text,
            output,
            voice,
            speed,
            stream,
        } => {
            runtime.load_kind(ModelKind::Tts, None)?;
            let vocab = Vocabulary::from_path(&runtime.config.tts.vocab_path)?.shared();
            let pipeline =
                SynthesisPipeline::new(runtime.tts.clone(), vocab, Vocoder::default());
            let voice = Voice::from_name(voice.as_deref().unwrap_or(&runtime.config.tts.voice));
            let speed = speed.unwrap_or(runtime.config.tts.speed);

            let pcm = if stream {
                let mut pcm = Vec::new();
                for buffer in pipeline.synthesize_stream(&text, voice, speed) {
                    pcm.extend(novavox_audio::codec::float_to_pcm16(buffer?.samples()));
                }
                pcm
            } else {
                pipeline.synthesize_pcm(&SynthesisRequest::new(text, voice, speed))?
            };
            audio_io::write_pcm(&output, &pcm)?;
            tracing::info!(path = %output.display(), bytes = pcm.len(), "audio written");
        }
        Command::Status => {
            runtime.load_all_best_effort();
            runtime.print_status()?;
        }
        Command::UnloadAll => {
            runtime.load_all_best_effort();
            if let Err(e) = runtime.registry.unload_all() {
                runtime.print_status()?;
                return Err(e).context("unload-all completed with failures");
            }
            runtime.print_status()?;
        }
    }
    Ok(())
}
