//! Phonemizer - grapheme-to-phoneme conversion for TTS datasets.
//!
//! Converts plain text or JSONL manifests into phoneme token sequences using
//! ARPABET (CMUdict), IPA, or pinyin pronouncing dictionaries, and produces
//! seeded train/val/test manifest splits.

use std::path::Path;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use phonemizer::config::{AppConfig, Engine};
use phonemizer::g2p::{ChineseG2p, EnglishG2p, G2p, IpaG2p};
use phonemizer::manifest::{self, SplitSpec};

/// Construct the configured G2P engine.
fn build_engine(config: &AppConfig) -> Result<Box<dyn G2p>> {
    let g2p: Box<dyn G2p> = match config.engine {
        Engine::Arpabet => {
            let mut builder = EnglishG2p::builder().ignore_ambiguous_words(!config.keep_ambiguous);
            if let Some(ref path) = config.phoneme_dict {
                builder = builder.phoneme_dict(path);
            }
            if let Some(ref path) = config.heteronyms {
                builder = builder.heteronyms(path);
            }
            if let Some(p) = config.phoneme_probability {
                builder = builder.phoneme_probability(p);
            }
            Box::new(builder.build()?)
        }
        Engine::Ipa => {
            let Some(ref dict) = config.phoneme_dict else {
                anyhow::bail!("The ipa engine has no built-in dictionary: pass --phoneme-dict");
            };
            let mut builder = IpaG2p::builder(dict)
                .locale(config.locale.as_str())
                .ignore_ambiguous_words(!config.keep_ambiguous)
                .use_stresses(!config.no_stresses)
                .grapheme_case(config.grapheme_case)
                .grapheme_prefix(config.grapheme_prefix.as_str());
            if let Some(ref path) = config.heteronyms {
                builder = builder.heteronyms(path);
            }
            if let Some(p) = config.phoneme_probability {
                builder = builder.phoneme_probability(p);
            }
            Box::new(builder.build()?)
        }
        Engine::Pinyin => {
            let Some(ref dict) = config.phoneme_dict else {
                anyhow::bail!("The pinyin engine has no built-in dictionary: pass --phoneme-dict");
            };
            Box::new(ChineseG2p::builder(dict).build()?)
        }
    };

    Ok(g2p)
}

/// Phonemize every entry of a JSONL manifest into a new manifest.
fn phonemize_manifest_file(config: &AppConfig, g2p: &dyn G2p, input: &Path, output: &Path) -> Result<()> {
    let mut entries = manifest::read_manifest(input)?;
    manifest::phonemize_manifest(
        &mut entries,
        g2p,
        config.field.as_deref(),
        &config.dest_field,
        &config.separator,
    )?;
    manifest::write_manifest(output, &entries)?;

    info!("✅ Phonemized {} entries into {}", entries.len(), output.display());
    Ok(())
}

/// Split a JSONL manifest into train/val/test manifests under a directory.
fn split_manifest_file(config: &AppConfig, input: &Path, out_dir: &Path) -> Result<()> {
    let entries = manifest::read_manifest(input)?;
    let spec = SplitSpec {
        val_size: config.val_size,
        test_size: config.test_size,
        seed: config.split_seed,
    };
    let (train, val, test) = manifest::split_manifest(entries, spec)?;

    manifest::write_manifest(&out_dir.join("train_manifest.json"), &train)?;
    manifest::write_manifest(&out_dir.join("val_manifest.json"), &val)?;
    manifest::write_manifest(&out_dir.join("test_manifest.json"), &test)?;

    info!("✅ Split {} into {}", input.display(), out_dir.display());
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Initialize logging with time-only format.
    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🔤 Phonemizer v{}", phonemizer::VERSION);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        error!("Run with --help for usage.");
        std::process::exit(1);
    }

    config.log_config();

    // Split mode reorders existing manifests, no engine needed
    if config.split {
        if let (Some(input), Some(out_dir)) = (&config.input, &config.output) {
            split_manifest_file(&config, input, out_dir)?;
        }
        return Ok(());
    }

    let g2p = build_engine(&config)?;

    if let Some(ref text) = config.text {
        // One-shot mode writes tokens to stdout, logs stay on stderr
        let tokens = g2p.convert(text)?;
        println!("{}", tokens.join(&config.separator));
    } else if let (Some(input), Some(output)) = (&config.input, &config.output) {
        phonemize_manifest_file(&config, g2p.as_ref(), input, output)?;
    }

    Ok(())
}
