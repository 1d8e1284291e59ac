// CLI commands

use std::cell::Cell;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use rand::Rng;
use rand::rngs::OsRng;

use crate::analytics::{Analytics, EventKind};
use crate::assessment::{AssessmentReport, AssessmentState, MoneyProperty, ReferenceProfile, Verdict};
use crate::keys::{
    AddressValidator, Base58CheckValidator, KeyProvider, MockKeyProvider, PrefixValidator,
    Secp256k1KeyProvider,
};
use crate::seed::{
    SeedError, SeedPhraseWorkflow, Stage, Verification, Wordlist, CANONICAL_WORDLIST_SIZE, PHRASE_LEN,
};

#[derive(Parser)]
#[command(name = "bitcoin-learn")]
#[command(about = "Interactive Bitcoin and money lessons", long_about = None)]
pub struct Cli {
    /// Print session analytics before exiting
    #[arg(long, global = true)]
    pub stats: bool,

    /// Write session analytics events to a JSON file
    #[arg(long, global = true, value_name = "FILE")]
    pub analytics_out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Practice writing down and verifying a seed phrase
    Seed {
        /// Wordlist file, one word per line (uses a short built-in list if not specified)
        #[arg(long, value_name = "FILE")]
        wordlist: Option<PathBuf>,
    },

    /// Rate a money type on the ten properties of money
    Assess {
        /// Money type to assess (e.g. bitcoin, gold, fiat)
        money: String,
        /// JSON file with reference profiles
        #[arg(long, value_name = "FILE")]
        profiles: Option<PathBuf>,
        /// A rating, e.g. "Self Custody=8" (unrated properties stay at 5)
        #[arg(short, long = "guess", value_name = "PROPERTY=N")]
        guesses: Vec<String>,
    },

    /// List reference profiles
    Profiles {
        /// JSON file with reference profiles
        #[arg(long, value_name = "FILE")]
        profiles: Option<PathBuf>,
    },

    /// Generate a keypair
    Keys {
        /// Use real secp256k1 keys instead of placeholders
        #[arg(long)]
        real: bool,
    },

    /// Check a Bitcoin address
    Address {
        /// Address to check
        address: String,
        /// Verify Base58Check encoding instead of only the prefix
        #[arg(long)]
        strict: bool,
    },
}

/// CLI handler
pub struct CliHandler {
    analytics: Analytics,
    stats: bool,
    analytics_out: Option<PathBuf>,
}

impl CliHandler {
    /// Create a handler; analytics only record when something will report them
    pub fn new(stats: bool, analytics_out: Option<PathBuf>) -> Self {
        let analytics = if stats || analytics_out.is_some() {
            Analytics::new()
        } else {
            Analytics::disabled()
        };

        Self {
            analytics,
            stats,
            analytics_out,
        }
    }

    /// Session analytics so far
    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Handle CLI command
    pub fn handle(&mut self, command: Commands) -> Result<(), String> {
        match command {
            Commands::Seed { wordlist } => self.seed(wordlist),
            Commands::Assess {
                money,
                profiles,
                guesses,
            } => self.assess(&money, profiles, &guesses),
            Commands::Profiles { profiles } => self.profiles(profiles),
            Commands::Keys { real } => self.keys(real),
            Commands::Address { address, strict } => self.address(&address, strict),
        }
    }

    /// Report analytics as requested on the command line
    pub fn finish(&self) -> Result<(), String> {
        if self.stats {
            println!("{}", self.analytics.summary());
        }
        if let Some(path) = &self.analytics_out {
            self.analytics.save(path)?;
        }
        Ok(())
    }

    /// Run the interactive seed phrase exercise
    fn seed(&mut self, wordlist: Option<PathBuf>) -> Result<(), String> {
        let wordlist = match wordlist {
            Some(path) => Wordlist::load(path)?,
            None => Wordlist::illustrative(),
        };

        let completed = Rc::new(Cell::new(false));
        let flag = completed.clone();
        let mut workflow = SeedPhraseWorkflow::new(wordlist).with_completion(move || flag.set(true));

        if !workflow.wordlist().is_canonical_size() {
            println!(
                "Practice wordlist of {} words; real phrases draw from {}.",
                workflow.wordlist().len(),
                CANONICAL_WORDLIST_SIZE
            );
        }

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        run_seed_session(
            &mut workflow,
            &mut OsRng,
            stdin.lock(),
            &mut stdout,
            &mut self.analytics,
        )?;

        if completed.get() {
            println!("Lesson complete. Keep real seed phrases offline and never share them.");
        }
        Ok(())
    }

    /// Grade guesses for one money type
    fn assess(
        &mut self,
        money: &str,
        profiles: Option<PathBuf>,
        guesses: &[String],
    ) -> Result<(), String> {
        let profile = load_profile(money, profiles)?;
        let mut state = AssessmentState::new(profile).with_completion(|report| {
            println!(
                "Finished the {} assessment. Try another money type to compare.",
                report.money_type()
            );
        });

        for guess in guesses {
            let (property, value) = parse_guess(guess)?;
            state.set_guess(property, value).map_err(|e| e.to_string())?;
        }

        let report = state.submit().map_err(|e| e.to_string())?;
        print_report(report);
        self.analytics
            .track(EventKind::AssessmentGraded, report.money_type());

        state.proceed().map_err(|e| e.to_string())
    }

    /// List reference profiles
    fn profiles(&self, profiles: Option<PathBuf>) -> Result<(), String> {
        let profiles = match profiles {
            Some(path) => ReferenceProfile::load_all(path)?,
            None => ReferenceProfile::builtins(),
        };

        for profile in profiles {
            println!("{}:", profile.money_type);
            for property in MoneyProperty::ALL {
                match profile.reference(property) {
                    Some(score) => println!("  {:<22} {:>2}", property.name(), score),
                    None => println!("  {:<22}  -", property.name()),
                }
            }
        }
        Ok(())
    }

    /// Generate and print a keypair
    fn keys(&mut self, real: bool) -> Result<(), String> {
        let provider: Box<dyn KeyProvider> = if real {
            Box::new(Secp256k1KeyProvider)
        } else {
            Box::new(MockKeyProvider)
        };

        let keys = provider.generate();
        println!("Keys ({}):", provider.name());
        println!("  Private key: {}", keys.private_key_hex);
        println!("  Public key:  {}", keys.public_key_hex);
        println!("  Address:     {}", keys.address);
        if !real {
            println!("  These are random placeholders, not a usable key pair.");
        }

        self.analytics.track(EventKind::KeysGenerated, provider.name());
        Ok(())
    }

    /// Check an address
    fn address(&mut self, address: &str, strict: bool) -> Result<(), String> {
        let validator: Box<dyn AddressValidator> = if strict {
            Box::new(Base58CheckValidator)
        } else {
            Box::new(PrefixValidator)
        };

        match validator.validate(address) {
            Ok(kind) => println!("✓ {} looks like a {} address", address, kind),
            Err(e) => println!("✗ {}: {}", address, e),
        }

        let label = if strict { "base58check" } else { "prefix" };
        self.analytics.track(EventKind::AddressChecked, label);
        Ok(())
    }
}

/// Pick a profile from a file or the built-ins
fn load_profile(money: &str, profiles: Option<PathBuf>) -> Result<ReferenceProfile, String> {
    let profiles = match profiles {
        Some(path) => ReferenceProfile::load_all(path)?,
        None => ReferenceProfile::builtins(),
    };
    let available: Vec<String> = profiles.iter().map(|p| p.money_type.clone()).collect();

    ReferenceProfile::find(profiles, money).ok_or_else(|| {
        format!(
            "Unknown money type '{}'. Available: {}",
            money,
            available.join(", ")
        )
    })
}

/// Parse "Property=N"
pub fn parse_guess(arg: &str) -> Result<(MoneyProperty, u8), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("Expected PROPERTY=N, got '{}'", arg))?;

    let property: MoneyProperty = name.parse().map_err(|e| format!("{}", e))?;
    let value: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid rating for {}: '{}'", property, value.trim()))?;

    Ok((property, value))
}

fn print_report(report: &AssessmentReport) {
    println!("{} assessment:", report.money_type());
    for outcome in report.outcomes() {
        let reference = outcome
            .reference
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mark = match outcome.verdict {
            Verdict::Correct => "✓",
            Verdict::Incorrect { .. } => "✗",
            Verdict::Ungraded => "?",
        };
        println!(
            "  {} {:<22} you: {:>2}  reference: {:>2}",
            mark,
            outcome.property.name(),
            outcome.guess,
            reference
        );
        if let Some(hint) = outcome.hint() {
            println!("      Hint: {}", hint);
        }
    }

    match report.score_percent() {
        Some(percent) => println!(
            "Score: {}/{} ({:.0}%)",
            report.correct_count(),
            report.graded_count(),
            percent
        ),
        None => println!("No reference scores to grade against"),
    }
}

/// Command typed during the seed exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeedCommand {
    Reveal(usize),
    RevealAll,
    Verify,
    Pick(usize),
    Check,
    New,
    Help,
    Quit,
}

/// Parse a 1-based word or slot number
fn parse_position(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Expected a number from 1 to {}, got '{}'", PHRASE_LEN, s.trim())),
    }
}

fn parse_seed_command(line: &str) -> Result<SeedCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    match word.to_ascii_lowercase().as_str() {
        "reveal" | "r" => parse_position(rest).map(SeedCommand::Reveal),
        "all" => Ok(SeedCommand::RevealAll),
        "next" | "verify" => Ok(SeedCommand::Verify),
        "check" | "c" => Ok(SeedCommand::Check),
        "new" => Ok(SeedCommand::New),
        "help" | "h" | "?" => Ok(SeedCommand::Help),
        "quit" | "q" | "exit" => Ok(SeedCommand::Quit),
        _ if word.chars().all(|c| c.is_ascii_digit()) && !word.is_empty() => {
            parse_position(word).map(SeedCommand::Pick)
        }
        _ => Err(format!("Unknown command '{}'. Type 'help' for commands.", line)),
    }
}

fn write_help<W: Write>(output: &mut W, stage: Stage) -> std::io::Result<()> {
    match stage {
        Stage::Verify => writeln!(
            output,
            "  <n>        pick or unpick word <n> from the pool\n  check      check your order\n  new        start over with a new phrase\n  quit       leave the exercise"
        ),
        _ => writeln!(
            output,
            "  reveal <n> show word <n>\n  all        show every word\n  next       continue to verification once every word is shown\n  new        start over with a new phrase\n  quit       leave the exercise"
        ),
    }
}

fn render<W: Write>(workflow: &SeedPhraseWorkflow, output: &mut W) -> std::io::Result<()> {
    match workflow.stage() {
        Stage::Reveal => {
            let Some(phrase) = workflow.phrase() else {
                return Ok(());
            };
            writeln!(
                output,
                "Your recovery phrase ({}/{} revealed):",
                workflow.revealed_count(),
                PHRASE_LEN
            )?;
            for row in 0..PHRASE_LEN / 4 {
                let cells: Vec<String> = (row * 4..row * 4 + 4)
                    .map(|i| {
                        let word = if workflow.is_revealed(i) {
                            phrase.word(i).unwrap_or_default()
                        } else {
                            "••••••"
                        };
                        format!("{:>2}. {:<10}", i + 1, word)
                    })
                    .collect();
                writeln!(output, "  {}", cells.join(" "))?;
            }
        }
        Stage::Verify => {
            let pool = workflow.shuffled_pool().unwrap_or_default();
            writeln!(output, "Pick the words in the original order:")?;
            for (row, chunk) in pool.chunks(4).enumerate() {
                let cells: Vec<String> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, word)| {
                        let slot = row * 4 + col;
                        let mark = if workflow.is_slot_selected(slot) { "x" } else { " " };
                        format!("[{}] {:>2}. {:<10}", mark, slot + 1, word)
                    })
                    .collect();
                writeln!(output, "  {}", cells.join(" "))?;
            }
            writeln!(
                output,
                "Selected ({}/{}): {}",
                workflow.selected_slots().len(),
                PHRASE_LEN,
                workflow.selection().join(" ")
            )?;
        }
        Stage::Generate | Stage::Complete => {}
    }
    Ok(())
}

/// Drive a seed exercise from line-based input.
///
/// Returns when the phrase is verified, the learner quits, or input ends.
pub fn run_seed_session<R, W, G>(
    workflow: &mut SeedPhraseWorkflow,
    rng: &mut G,
    input: R,
    output: &mut W,
    analytics: &mut Analytics,
) -> Result<(), String>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let io_err = |e: std::io::Error| format!("I/O error: {}", e);

    if workflow.stage() == Stage::Generate {
        workflow.generate(rng);
        analytics.track(EventKind::PhraseGenerated, "seed");
    }

    let mut lines = input.lines();
    loop {
        if workflow.stage() == Stage::Complete {
            writeln!(output, "✓ Correct! Your seed phrase is verified.").map_err(io_err)?;
            return Ok(());
        }

        render(workflow, output).map_err(io_err)?;
        write!(output, "> ").map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let Some(line) = lines.next() else {
            writeln!(output).map_err(io_err)?;
            return Ok(());
        };
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_seed_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                writeln!(output, "  {}", msg).map_err(io_err)?;
                continue;
            }
        };

        let result: Result<(), SeedError> = match command {
            SeedCommand::Reveal(index) => workflow.reveal_word(index).map(|_| {
                analytics.track(EventKind::WordRevealed, (index + 1).to_string());
            }),
            SeedCommand::RevealAll => workflow.reveal_all().map(|_| {
                analytics.track(EventKind::WordRevealed, "all");
            }),
            SeedCommand::Verify => workflow.begin_verification(rng).map(|_| ()),
            SeedCommand::Pick(slot) => workflow.toggle_word(slot).map(|_| ()),
            SeedCommand::Check => match workflow.check_verification() {
                Ok(outcome) => {
                    analytics.track(EventKind::VerificationAttempted, "seed");
                    match outcome {
                        Verification::Complete => {
                            analytics.track(EventKind::VerificationSucceeded, "seed");
                        }
                        Verification::Mismatch => {
                            writeln!(output, "✗ Not quite. The selection was cleared, try again.")
                                .map_err(io_err)?;
                        }
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            SeedCommand::New => {
                workflow.generate(rng);
                analytics.track(EventKind::PhraseGenerated, "seed");
                Ok(())
            }
            SeedCommand::Help => {
                write_help(output, workflow.stage()).map_err(io_err)?;
                Ok(())
            }
            SeedCommand::Quit => return Ok(()),
        };

        if let Err(e) = result {
            writeln!(output, "  {}", describe_seed_error(&e)).map_err(io_err)?;
        }
    }
}

/// Learner-facing wording; positions are typed 1-based
fn describe_seed_error(err: &SeedError) -> String {
    match err {
        SeedError::IndexOutOfRange { index, len } => {
            format!("Expected a number from 1 to {}, got {}", len, index + 1)
        }
        _ => err.to_string(),
    }
}
