use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lens_core::constants::{DEFAULT_LOG_DIRECTIVE, POSITIONAL_AXIS_ENV};
use lens_core::tokens::parse_decimal;
use lens_core::{
    positional_axis_recovery_from_env_value, render_json, se, AdvisorConfig, AdvisoryRequest,
    LensAdvisor, ManualEntry, PrescriptionSource,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lens")]
#[command(about = "Prescription interpretation and lens specification CLI")]
struct Cli {
    /// Disable axis recovery from the third positional number after two decimals
    #[arg(long, global = true)]
    no_positional_axis: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse recognised prescription text into structured values
    Parse {
        /// Recognised text (reads stdin when neither this nor --file is given)
        text: Option<String>,
        /// File containing recognised text
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Produce a full lens specification
    Advise {
        /// Recognised text (reads stdin when no other source is given)
        text: Option<String>,
        /// File containing recognised text
        #[arg(long, conflicts_with_all = ["text", "manual"])]
        file: Option<PathBuf>,
        /// JSON file with manually entered values
        #[arg(long, conflicts_with = "text")]
        manual: Option<PathBuf>,
        /// Frame type (full_rim_plastic, full_rim_metal, half_rim, semi_rimless, rimless, drilled)
        #[arg(long, default_value = "other")]
        frame: String,
        /// Stated vision need (distance, near, both, zero_power)
        #[arg(long)]
        need: String,
        /// Customer age in years
        #[arg(long)]
        age: Option<i64>,
        /// Customer reports an existing near addition
        #[arg(long)]
        has_add: bool,
    },
    /// Spherical equivalent of a sphere and optional cylinder
    Se {
        /// Sphere in dioptres
        #[arg(allow_negative_numbers = true)]
        sph: String,
        /// Cylinder in dioptres
        #[arg(allow_negative_numbers = true)]
        cyl: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(DEFAULT_LOG_DIRECTIVE.parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let positional_axis_recovery = !cli.no_positional_axis
        && positional_axis_recovery_from_env_value(std::env::var(POSITIONAL_AXIS_ENV).ok())
            .with_context(|| format!("reading {POSITIONAL_AXIS_ENV}"))?;
    let advisor = LensAdvisor::new(Arc::new(AdvisorConfig::new(positional_axis_recovery)));
    tracing::debug!(positional_axis_recovery, "advisor configured");

    match cli.command {
        Some(Commands::Parse { text, file }) => {
            let text = read_text(text, file.as_deref())?;
            println!("{}", render_json(&advisor.parse(&text))?);
        }
        Some(Commands::Advise {
            text,
            file,
            manual,
            frame,
            need,
            age,
            has_add,
        }) => {
            let source = match manual {
                Some(path) => PrescriptionSource::Manual(read_manual(&path)?),
                None => PrescriptionSource::Text(read_text(text, file.as_deref())?),
            };
            let request = AdvisoryRequest::from_inputs(source, age, &need, &frame, has_add)?;
            println!("{}", render_json(&advisor.advise(&request))?);
        }
        Some(Commands::Se { sph, cyl }) => {
            println!("{}", se_value(&sph, cyl.as_deref())?);
        }
        None => {
            println!("Use 'lens --help' for commands");
        }
    }

    Ok(())
}

fn read_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading recognised text from {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading recognised text from stdin")?;
    Ok(buf)
}

fn read_manual(path: &Path) -> Result<ManualEntry> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading manual entry from {}", path.display()))?;
    ManualEntry::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn se_value(sph: &str, cyl: Option<&str>) -> Result<String> {
    let sph = parse_decimal(sph).with_context(|| format!("'{sph}' is not a sphere value"))?;
    let cyl = cyl
        .map(|c| parse_decimal(c).with_context(|| format!("'{c}' is not a cylinder value")))
        .transpose()?;
    Ok(se(Some(sph), cyl).normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_advise_arguments() {
        let cli = Cli::try_parse_from([
            "lens",
            "advise",
            "OD -2.00",
            "--frame",
            "half_rim",
            "--need",
            "both",
            "--age",
            "45",
            "--has-add",
        ])
        .expect("parse args");

        match cli.command {
            Some(Commands::Advise {
                text,
                frame,
                need,
                age,
                has_add,
                ..
            }) => {
                assert_eq!(text.as_deref(), Some("OD -2.00"));
                assert_eq!(frame, "half_rim");
                assert_eq!(need, "both");
                assert_eq!(age, Some(45));
                assert!(has_add);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!cli.no_positional_axis);
    }

    #[test]
    fn advise_requires_a_vision_need() {
        assert!(Cli::try_parse_from(["lens", "advise", "OD -2.00"]).is_err());
    }

    #[test]
    fn manual_conflicts_with_text() {
        let result = Cli::try_parse_from([
            "lens", "advise", "OD -2.00", "--manual", "rx.json", "--need", "near",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flag_disables_positional_axis() {
        let cli = Cli::try_parse_from(["lens", "parse", "OD -2.00", "--no-positional-axis"])
            .expect("parse args");
        assert!(cli.no_positional_axis);
    }

    #[test]
    fn out_of_range_age_is_a_range_error() {
        let source = PrescriptionSource::Text("OD -2.00".into());
        let err = AdvisoryRequest::from_inputs(source, Some(-3), "near", "other", false)
            .expect_err("negative age");
        assert!(matches!(err, lens_core::LensError::Range(_)), "{err:?}");
    }

    #[test]
    fn se_accepts_negative_values() {
        let cli = Cli::try_parse_from(["lens", "se", "-2.00", "-0.50"]).expect("parse args");
        match cli.command {
            Some(Commands::Se { sph, cyl }) => {
                assert_eq!(se_value(&sph, cyl.as_deref()).expect("se"), "-2.25");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn se_rejects_unreadable_values() {
        let err = se_value("abc", None).expect_err("should reject");
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn text_argument_wins_over_stdin() {
        let text = read_text(Some("RE: -2.00".into()), None).expect("read text");
        assert_eq!(text, "RE: -2.00");
    }
}
