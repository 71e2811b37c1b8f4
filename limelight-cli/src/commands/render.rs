//! Render command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, sidecar_path, FileReader};
use crate::output::{HtmlFormatter, JsonFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::{Args, ValueEnum};
use limelight_api::{Annotation, Config, Highlighter, Input, Output, SourceKind};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Chapter files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Annotation file for every chapter (default: `<chapter>.annotations.json`)
    #[arg(short, long, value_name = "FILE")]
    pub annotations: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else html)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// How chapters are read (default: from the file extension)
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only highlight these mention types
    #[arg(long, value_name = "TYPE", value_delimiter = ',')]
    pub mention_type: Vec<String>,

    /// Only highlight these entity types
    #[arg(long, value_name = "TYPE", value_delimiter = ',')]
    pub entity_type: Vec<String>,

    /// Hide annotations below this confidence
    #[arg(long, value_name = "SCORE")]
    pub min_confidence: Option<f64>,

    /// Embedded block rule set
    #[arg(long, value_name = "NAME", conflicts_with = "rules")]
    pub rule_set: Option<String>,

    /// Block rule file
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Skip block classification
    #[arg(long, conflicts_with_all = ["rule_set", "rules"])]
    pub no_classify: bool,

    /// Do not sanitize markup input
    #[arg(long)]
    pub trusted: bool,

    /// Number of worker threads (default: all cores)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Highlighted markup
    Html,
    /// JSON array with the structured render of each chapter
    Json,
    /// Plain text with `[[mention|entity]]` markers
    Text,
}

/// How a chapter file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Canonical text, annotation offsets trusted
    Text,
    /// Canonical text split into paragraphs
    Paragraphs,
    /// Chapter markup, mentions located by their extraction text
    Markup,
}

impl From<Mode> for SourceKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Text => SourceKind::Text,
            Mode::Paragraphs => SourceKind::Paragraphs,
            Mode::Markup => SourceKind::Markup,
        }
    }
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Starting chapter rendering");
        log::debug!("Arguments: {:?}", self);

        let settings = CliConfig::load(self.config.as_deref())?;
        let format = self.output_format(&settings)?;
        let mode = self.source_kind(&settings)?;

        let jobs: Vec<(PathBuf, SourceKind)> = resolve_patterns(&self.input)?
            .into_iter()
            .map(|path| {
                let kind = mode.unwrap_or_else(|| limelight_api::source_kind_for(&path));
                (path, kind)
            })
            .collect();
        log::info!("Found {} chapter(s)", jobs.len());

        let mut highlighters = HashMap::new();
        for (_, kind) in &jobs {
            if !highlighters.contains_key(kind) {
                let config = self.build_config(&settings, *kind)?;
                let highlighter = Highlighter::with_config(config).map_err(CliError::from)?;
                highlighters.insert(*kind, highlighter);
            }
        }

        let shared = self
            .annotations
            .as_deref()
            .map(FileReader::read_annotations)
            .transpose()?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(jobs.len() as u64);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.thread_count(&settings))
            .build()?;
        let results: Vec<Result<Output>> = pool.install(|| {
            jobs.par_iter()
                .map(|(path, kind)| {
                    let result = render_chapter(path, &highlighters[kind], shared.as_deref());
                    progress.file_completed(&path.display().to_string());
                    result
                })
                .collect()
        });
        progress.finish();

        let mut formatter = self.formatter(format, &settings)?;
        for ((path, _), result) in jobs.iter().zip(results) {
            formatter.format_output(path, &result?)?;
        }
        formatter.finish()?;

        log::info!("Rendering complete");
        Ok(())
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }

    fn output_format(&self, settings: &CliConfig) -> Result<OutputFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        let name = &settings.output.default_format;
        OutputFormat::from_str(name, true)
            .map_err(|_| CliError::ConfigError(format!("unknown output format '{name}'")).into())
    }

    /// Source kind forced for every chapter, if any
    fn source_kind(&self, settings: &CliConfig) -> Result<Option<SourceKind>> {
        if let Some(mode) = self.mode {
            return Ok(Some(mode.into()));
        }
        settings
            .render
            .mode
            .as_deref()
            .map(|name| name.parse::<SourceKind>().map_err(CliError::ConfigError))
            .transpose()
            .map_err(Into::into)
    }

    fn thread_count(&self, settings: &CliConfig) -> usize {
        self.threads
            .filter(|&n| n > 0)
            .or(Some(settings.performance.worker_threads).filter(|&n| n > 0))
            .unwrap_or_else(num_cpus::get)
    }

    /// Highlighter configuration for one source kind; flags win over the file
    pub fn build_config(&self, settings: &CliConfig, kind: SourceKind) -> Result<Config> {
        let mut builder = Config::builder()
            .source_kind(kind)
            .min_anchor_chars(settings.render.min_anchor_chars)
            .trusted_markup(self.trusted || settings.render.trusted_markup);

        let mention_types = if self.mention_type.is_empty() {
            &settings.filter.mention_types
        } else {
            &self.mention_type
        };
        if !mention_types.is_empty() {
            builder = builder.mention_types(mention_types).map_err(CliError::from)?;
        }

        let entity_types = if self.entity_type.is_empty() {
            &settings.filter.entity_types
        } else {
            &self.entity_type
        };
        builder = builder
            .entity_types(entity_types)
            .min_confidence(self.min_confidence.unwrap_or(settings.filter.min_confidence));

        builder = if self.no_classify || !settings.render.classify_blocks {
            builder.no_classification()
        } else if let Some(path) = &self.rules {
            builder.rules_file(path.clone())
        } else if let Some(name) = &self.rule_set {
            builder.rule_set(name.clone())
        } else if let Some(path) = &settings.render.rules_file {
            builder.rules_file(path.clone())
        } else {
            builder.rule_set(settings.render.rule_set.clone())
        };

        Ok(builder.build().map_err(CliError::from)?)
    }

    fn formatter(
        &self,
        format: OutputFormat,
        settings: &CliConfig,
    ) -> Result<Box<dyn OutputFormatter>> {
        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .map_err(|e| CliError::FileNotFound(format!("{}: {e}", path.display())))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };

        let include_metadata = settings.output.include_metadata;
        Ok(match format {
            OutputFormat::Html => {
                Box::new(HtmlFormatter::new(writer).include_metadata(include_metadata))
            }
            OutputFormat::Json => Box::new(
                JsonFormatter::new(writer)
                    .pretty(settings.output.pretty_json)
                    .include_metadata(include_metadata),
            ),
            OutputFormat::Text => {
                Box::new(TextFormatter::new(writer).include_metadata(include_metadata))
            }
        })
    }
}

/// Render one chapter with its annotations
fn render_chapter(
    path: &Path,
    highlighter: &Highlighter,
    shared: Option<&[Annotation]>,
) -> Result<Output> {
    let sidecar;
    let annotations = match shared {
        Some(annotations) => annotations,
        None => {
            let path = sidecar_path(path);
            if !path.is_file() {
                return Err(CliError::MissingAnnotations(path.display().to_string()).into());
            }
            sidecar = FileReader::read_annotations(&path)?;
            &sidecar
        }
    };

    let source = FileReader::read_text(path)?;
    let output = highlighter
        .render(Input::from_text(source), annotations)
        .map_err(CliError::from)?;

    let meta = &output.metadata;
    log::info!(
        "{}: {} highlights from {} annotations ({} filtered, {} dropped)",
        path.display(),
        meta.highlights,
        meta.annotations_total,
        meta.annotations_filtered,
        meta.annotations_dropped
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse(args: &[&str]) -> RenderArgs {
        TestCli::try_parse_from(std::iter::once("limelight").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_flags_override_config_file() {
        let settings = CliConfig::from_toml(
            r#"
[render]
rule_set = "plain"

[filter]
mention_types = ["pronoun"]
min_confidence = 0.9
"#,
        )
        .unwrap();

        let args = parse(&["-i", "ch1.txt", "--mention-type", "direct_name,alias"]);
        let config = args.build_config(&settings, SourceKind::Text).unwrap();
        let filter = &config.engine().filter;
        assert_eq!(filter.mention_types.len(), 2);
        assert_eq!(filter.min_confidence, 0.9);
        assert_eq!(
            config.engine().rules,
            limelight_engine::RuleSource::Embedded("plain".into())
        );

        let args = parse(&["-i", "ch1.txt", "--no-classify", "--min-confidence", "0.2"]);
        let config = args.build_config(&settings, SourceKind::Text).unwrap();
        assert_eq!(config.engine().rules, limelight_engine::RuleSource::Disabled);
        assert_eq!(config.engine().filter.min_confidence, 0.2);
    }

    #[test]
    fn test_unknown_mention_type_is_config_error() {
        let args = parse(&["-i", "ch1.txt", "--mention-type", "nickname"]);
        let err = args
            .build_config(&CliConfig::default(), SourceKind::Markup)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigError(_))
        ));
    }

    #[test]
    fn test_format_and_mode_defaults() {
        let args = parse(&["-i", "ch1.txt"]);
        let settings = CliConfig::default();
        assert_eq!(args.output_format(&settings).unwrap(), OutputFormat::Html);
        assert_eq!(args.source_kind(&settings).unwrap(), None);

        let settings =
            CliConfig::from_toml("[render]\nmode = \"html\"\n[output]\ndefault_format = \"json\"\n")
                .unwrap();
        assert_eq!(args.output_format(&settings).unwrap(), OutputFormat::Json);
        assert_eq!(
            args.source_kind(&settings).unwrap(),
            Some(SourceKind::Markup)
        );

        let args = parse(&["-i", "ch1.txt", "-m", "paragraphs", "-f", "text"]);
        assert_eq!(args.output_format(&settings).unwrap(), OutputFormat::Text);
        assert_eq!(
            args.source_kind(&settings).unwrap(),
            Some(SourceKind::Paragraphs)
        );

        let bad = CliConfig::from_toml("[output]\ndefault_format = \"pdf\"\n").unwrap();
        assert_eq!(args.output_format(&bad).unwrap(), OutputFormat::Text);
        assert!(parse(&["-i", "x"]).output_format(&bad).is_err());
    }

    #[test]
    fn test_conflicting_rule_flags() {
        let result = TestCli::try_parse_from([
            "limelight",
            "-i",
            "ch1.txt",
            "--rules",
            "r.toml",
            "--rule-set",
            "plain",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_sidecar() {
        let dir = tempfile::TempDir::new().unwrap();
        let chapter = dir.path().join("ch1.txt");
        std::fs::write(&chapter, "Mira smiled.").unwrap();

        let highlighter = Highlighter::new().unwrap();
        let err = render_chapter(&chapter, &highlighter, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingAnnotations(_))
        ));

        let shared = [Annotation::new("Mira", "character", 0, 4)];
        let output = render_chapter(&chapter, &highlighter, Some(&shared)).unwrap();
        assert_eq!(output.metadata.highlights, 1);
    }
}
