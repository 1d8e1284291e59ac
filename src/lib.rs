// Bitcoin learning tools
// Seed phrase practice, money assessment, and placeholder key/address utilities

pub mod analytics;
pub mod assessment;
pub mod cli;
pub mod keys;
pub mod seed;

// Re-exports for convenience
pub use analytics::{Analytics, AnalyticsSummary, Event, EventKind};
pub use assessment::{
    grade, AssessmentError, AssessmentReport, AssessmentState, MoneyProperty, Rating,
    ReferenceProfile,
};
pub use cli::{Cli, CliHandler};
pub use keys::{
    AddressError, AddressKind, AddressValidator, Base58CheckValidator, GeneratedKeys,
    KeyProvider, MockKeyProvider, PrefixValidator, Secp256k1KeyProvider,
};
pub use seed::{Mnemonic, SeedError, SeedPhraseWorkflow, Stage, Wordlist};
