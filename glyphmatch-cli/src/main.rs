use clap::{Parser, Subcommand};
use glyphmatch::io::load_gray_image;
use glyphmatch::{
    LabelAggregation, MatchConfig, PreprocessConfig, Recognizer, RecognizerConfig, RejectConfig,
    SegmentConfig, StoreConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Glyphmatch captcha CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file. Library defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
    /// Write the JSON result here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recognize the characters of a captcha image.
    Recognize {
        /// Captcha image to read.
        image: PathBuf,
    },
    /// Split a labeled captcha into glyphs and store them as templates.
    AddTemplate {
        /// One character per glyph, left to right.
        #[arg(short, long)]
        label: String,
        /// Captcha image to split.
        image: PathBuf,
    },
    /// Load the template directory and report what it contains.
    Inspect,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AggregationConfig {
    #[default]
    Min,
    TopMean,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RejectConfigJson {
    max_score: f32,
    min_margin: f32,
}

impl Default for RejectConfigJson {
    fn default() -> Self {
        let cfg = RejectConfig::default();
        Self {
            max_score: cfg.max_score,
            min_margin: cfg.min_margin,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    aggregation: AggregationConfig,
    top_n: usize,
    parallel: bool,
    reject: Option<RejectConfigJson>,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            aggregation: AggregationConfig::Min,
            top_n: 3,
            parallel: cfg.parallel,
            reject: None,
        }
    }
}

impl From<MatchConfigJson> for MatchConfig {
    fn from(value: MatchConfigJson) -> Self {
        let aggregation = match value.aggregation {
            AggregationConfig::Min => LabelAggregation::Min,
            AggregationConfig::TopMean => LabelAggregation::TopMean(value.top_n),
        };
        Self {
            aggregation,
            parallel: value.parallel,
            reject: value.reject.map(|r| RejectConfig {
                max_score: r.max_score,
                min_margin: r.min_margin,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    template_dir: PathBuf,
    extension: String,
    num_chars: usize,
    glyph_width: usize,
    glyph_height: usize,
    debug_dir: Option<PathBuf>,
    alternatives: usize,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        let store = StoreConfig::default();
        let segment = SegmentConfig::default();
        let preprocess = PreprocessConfig::default();
        Self {
            template_dir: store.template_dir,
            extension: store.extension,
            num_chars: segment.num_chars,
            glyph_width: preprocess.width,
            glyph_height: preprocess.height,
            debug_dir: segment.debug_dir,
            alternatives: 3,
            match_cfg: MatchConfigJson::default(),
        }
    }
}

impl Config {
    fn recognizer_config(self) -> RecognizerConfig {
        RecognizerConfig {
            preprocess: PreprocessConfig {
                width: self.glyph_width,
                height: self.glyph_height,
            },
            segment: SegmentConfig {
                num_chars: self.num_chars,
                debug_dir: self.debug_dir,
            },
            store: StoreConfig {
                template_dir: self.template_dir,
                extension: self.extension,
            },
            matching: self.match_cfg.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Alternative {
    label: String,
    score: f32,
}

#[derive(Debug, Serialize)]
struct GlyphRecord {
    symbol: String,
    score: Option<f32>,
    confidence: f32,
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Serialize)]
struct RecognizeOutput {
    text: String,
    confidence: u8,
    glyphs: Vec<GlyphRecord>,
}

#[derive(Debug, Serialize)]
struct AddTemplateOutput {
    files: Vec<String>,
    templates: usize,
    labels: usize,
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    template_dir: String,
    templates: usize,
    labels: usize,
    skipped: usize,
    per_label: BTreeMap<String, usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("glyphmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }
    let Some(command) = cli.command else {
        return Err("a subcommand is required (recognize, add-template, inspect)".into());
    };

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let alternatives = config.alternatives;
    let recognizer = Recognizer::open(config.recognizer_config())?;

    let json = match command {
        Command::Recognize { image } => {
            let image = load_gray_image(&image)?;
            let (recognition, rankings) = recognizer.recognize_ranked(image.view(), alternatives)?;
            let records = recognition
                .glyphs
                .iter()
                .zip(rankings)
                .map(|(result, ranked)| GlyphRecord {
                    symbol: result.symbol().to_string(),
                    score: result.score,
                    confidence: result.confidence,
                    alternatives: ranked
                        .into_iter()
                        .map(|r| Alternative {
                            label: r.label.to_string(),
                            score: r.score,
                        })
                        .collect(),
                })
                .collect();
            serde_json::to_string_pretty(&RecognizeOutput {
                text: recognition.text,
                confidence: recognition.confidence,
                glyphs: records,
            })?
        }
        Command::AddTemplate { label, image } => {
            let image = load_gray_image(&image)?;
            let files = recognizer.add_templates(&label, image.view())?;
            let set = recognizer.templates();
            serde_json::to_string_pretty(&AddTemplateOutput {
                files,
                templates: set.num_templates(),
                labels: set.num_labels(),
            })?
        }
        Command::Inspect => {
            let report = recognizer.reload()?;
            let set = recognizer.templates();
            let per_label = set
                .iter()
                .map(|(label, templates)| (label.to_string(), templates.len()))
                .collect();
            serde_json::to_string_pretty(&InspectOutput {
                template_dir: recognizer.store_config().template_dir.display().to_string(),
                templates: report.templates,
                labels: report.labels,
                skipped: report.skipped,
                per_label,
            })?
        }
    };

    match cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
