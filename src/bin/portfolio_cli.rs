//! Portfolio CLI - the form, on the command line
//!
//! Commands: validate, build
//! Outputs JSON to stdout, logs to stderr
//! Exit codes: 0 success, 2 validation failure, 1 anything else

use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use portfolio_builder::{
    logging, FixedSelection, LayoutSettings, PathSelector, PortfolioBuilder, ProfileInput,
    PromptSelection,
};

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(about = "Portfolio Builder - turn a profile and a photo into a one-page PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Args)]
struct ProfileArgs {
    /// JSON payload (ProfileInput); individual flags override its fields
    #[arg(short, long)]
    payload: Option<String>,

    #[arg(long)]
    name: Option<String>,

    /// Phone number, digits only
    #[arg(long)]
    number: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    qualification: Option<String>,

    /// Skills; may span several lines
    #[arg(long)]
    skills: Option<String>,
}

impl ProfileArgs {
    fn into_profile(self) -> Result<ProfileInput, String> {
        let mut profile = match &self.payload {
            Some(payload) => serde_json::from_str::<ProfileInput>(payload)
                .map_err(|e| format!("Invalid payload: {}", e))?,
            None => ProfileInput::default(),
        };
        if let Some(v) = self.name { profile.name = v; }
        if let Some(v) = self.number { profile.phone_number = v; }
        if let Some(v) = self.email { profile.email = v; }
        if let Some(v) = self.qualification { profile.qualification = v; }
        if let Some(v) = self.skills { profile.skills = v; }
        Ok(profile.normalized())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a profile without building anything
    Validate {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Report every failure instead of the first one
        #[arg(long)]
        all: bool,
    },

    /// Validate and build the portfolio PDF
    Build {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Photo to embed (.jpg, .jpeg, .png); asked for when omitted
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Where to save the PDF; asked for when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page size: letter or a4
        #[arg(long)]
        page_size: Option<String>,

        /// Thumbnail JPEG quality, 1-100
        #[arg(long)]
        jpeg_quality: Option<u8>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Validate { profile, all } => {
            let input = match profile.into_profile() {
                Ok(p) => p,
                Err(e) => return fail(&e),
            };

            let builder = PortfolioBuilder::default();
            let result = if all {
                builder.validate_all(&input)
            } else {
                builder.validate(&input)
            };

            print_json(&result);
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Build { profile, photo, output, page_size, jpeg_quality } => {
            let input = match profile.into_profile() {
                Ok(p) => p,
                Err(e) => return fail(&e),
            };
            let settings = match LayoutSettings::from_user(page_size.as_deref(), jpeg_quality) {
                Ok(s) => s,
                Err(e) => return fail(&e),
            };
            let builder = PortfolioBuilder::new(settings);

            let mut selector = CliSelector {
                fixed: FixedSelection { photo, destination: output },
                interactive: io::stdin().is_terminal(),
            };

            match builder.submit(&input, &mut selector) {
                Ok(report) => {
                    let output = serde_json::json!({
                        "success": true,
                        "message": report.user_message(),
                        "report": report,
                    });
                    print_json(&output);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "build failed");
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    print_json(&output);
                    if e.is_validation() {
                        ExitCode::from(2)
                    } else {
                        ExitCode::FAILURE
                    }
                }
            }
        }
    }
}

/// Flags first; a terminal prompt for whatever was not given.
struct CliSelector {
    fixed: FixedSelection,
    interactive: bool,
}

impl CliSelector {
    fn prompt(&self) -> Option<PromptSelection<io::StdinLock<'static>, io::Stderr>> {
        self.interactive
            .then(|| PromptSelection::new(io::stdin().lock(), io::stderr()))
    }
}

impl PathSelector for CliSelector {
    fn choose_photo(&mut self) -> Option<PathBuf> {
        self.fixed
            .choose_photo()
            .or_else(|| self.prompt()?.choose_photo())
    }

    fn choose_destination(&mut self) -> Option<PathBuf> {
        self.fixed
            .choose_destination()
            .or_else(|| self.prompt()?.choose_destination())
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("cannot serialize output: {}", e),
    }
}

fn fail(message: &str) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": message,
    });
    print_json(&output);
    ExitCode::FAILURE
}
