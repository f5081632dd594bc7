use crate::error::{Result, RiceFertError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Largest plant age accepted from the command line
pub const MAX_AGE_DAYS: u32 = 365;

#[derive(Parser)]
#[command(
    name = "ricefert",
    version,
    about = "Rice fertilizer recommendation TUI with fuzzy inference and leaf color analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute an NPK recommendation
    Recommend(RecommendArgs),
    /// Estimate the Leaf Color Chart index of a photo
    Lcc {
        /// Image file (PNG, JPEG or WebP)
        path: PathBuf,
    },
    /// List saved recommendations
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Show a single saved recommendation
        #[arg(long, conflicts_with = "limit")]
        id: Option<i64>,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and open the history database
    Check,
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("leaf")
        .required(true)
        .args(["lcc", "image"]),
))]
pub struct RecommendArgs {
    /// Days after planting
    #[arg(short, long)]
    pub age: u32,

    /// Leaf Color Chart reading (1-10)
    #[arg(short, long)]
    pub lcc: Option<f64>,

    /// Leaf photo to estimate the LCC from
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Monthly rainfall in mm (defaults to the configured value)
    #[arg(short, long)]
    pub rainfall: Option<f64>,

    /// Soil type: loam, clay, sand or organic (defaults to the configured value)
    #[arg(short, long)]
    pub soil: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not record the result in history
    #[arg(long)]
    pub no_save: bool,
}

impl RecommendArgs {
    /// Reject inputs outside the domains the fuzzy sets are defined on.
    pub fn validate(&self) -> Result<()> {
        if self.age > MAX_AGE_DAYS {
            return Err(RiceFertError::InvalidData(format!(
                "age must be at most {} days, got {}",
                MAX_AGE_DAYS, self.age
            )));
        }
        if let Some(lcc) = self.lcc {
            validate_lcc(lcc)?;
        }
        if let Some(rainfall) = self.rainfall {
            validate_rainfall(rainfall)?;
        }
        Ok(())
    }
}

pub fn validate_lcc(lcc: f64) -> Result<()> {
    if !(1.0..=10.0).contains(&lcc) {
        return Err(RiceFertError::InvalidData(format!(
            "LCC must be between 1 and 10, got {}",
            lcc
        )));
    }
    Ok(())
}

pub fn validate_rainfall(rainfall_mm: f64) -> Result<()> {
    if !rainfall_mm.is_finite() || rainfall_mm < 0.0 {
        return Err(RiceFertError::InvalidData(format!(
            "rainfall must be a non-negative number of mm, got {}",
            rainfall_mm
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn recommend_requires_a_leaf_source() {
        assert!(Cli::try_parse_from(["ricefert", "recommend", "--age", "30"]).is_err());
        assert!(Cli::try_parse_from([
            "ricefert", "recommend", "--age", "30", "--lcc", "4", "--image", "a.jpg"
        ])
        .is_err());
    }

    #[test]
    fn parses_recommend_arguments() {
        let cli = Cli::try_parse_from([
            "ricefert", "-vv", "recommend", "--age", "30", "--lcc", "4.5", "--soil", "pasir",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Recommend(args)) => {
                assert_eq!(args.age, 30);
                assert_eq!(args.lcc, Some(4.5));
                assert_eq!(args.soil.as_deref(), Some("pasir"));
                assert!(args.json);
                assert!(!args.no_save);
                assert!(args.rainfall.is_none());
            }
            _ => panic!("expected recommend command"),
        }
    }

    fn recommend_args(argv: &[&str]) -> RecommendArgs {
        let mut full = vec!["ricefert", "recommend"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Some(Commands::Recommend(args)) => args,
            _ => panic!("expected recommend command"),
        }
    }

    #[test]
    fn validation_accepts_domain_edges() {
        assert!(recommend_args(&["--age", "0", "--lcc", "1"]).validate().is_ok());
        assert!(recommend_args(&["--age", "365", "--lcc", "10", "--rainfall", "0"])
            .validate()
            .is_ok());
        assert!(recommend_args(&["--age", "30", "--image", "leaf.jpg"]).validate().is_ok());
    }

    #[test]
    fn validation_rejects_out_of_domain_inputs() {
        let invalid = |args: RecommendArgs| {
            matches!(args.validate(), Err(RiceFertError::InvalidData(_)))
        };
        assert!(invalid(recommend_args(&["--age", "366", "--lcc", "4"])));
        assert!(invalid(recommend_args(&["--age", "30", "--lcc", "0.5"])));
        assert!(invalid(recommend_args(&["--age", "30", "--lcc", "11"])));
        assert!(invalid(recommend_args(&["--age", "30", "--lcc", "NaN"])));
        assert!(invalid(recommend_args(&[
            "--age", "30", "--lcc", "4", "--rainfall=-5"
        ])));
        assert!(invalid(recommend_args(&[
            "--age", "30", "--lcc", "4", "--rainfall", "inf"
        ])));
    }

    #[test]
    fn history_accepts_limit_or_id() {
        match Cli::try_parse_from(["ricefert", "history"]).unwrap().command {
            Some(Commands::History { limit, id }) => {
                assert_eq!(limit, 20);
                assert!(id.is_none());
            }
            _ => panic!("expected history command"),
        }
        match Cli::try_parse_from(["ricefert", "history", "--id", "7"]).unwrap().command {
            Some(Commands::History { id, .. }) => assert_eq!(id, Some(7)),
            _ => panic!("expected history command"),
        }
        assert!(Cli::try_parse_from(["ricefert", "history", "--id", "7", "--limit", "3"]).is_err());
    }

    #[test]
    fn no_subcommand_launches_tui() {
        let cli = Cli::try_parse_from(["ricefert"]).unwrap();
        assert!(cli.command.is_none());
    }
}
